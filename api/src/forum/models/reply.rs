use serde::Serialize;
use serde_json::Value;

use super::{ensure_present, required_string};
use crate::forum::{date::RawDate, error::ForumError, masking::ContentStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReply {
    pub content: String,
}

impl TryFrom<Value> for NewReply {
    type Error = ForumError;

    fn try_from(payload: Value) -> Result<Self, Self::Error> {
        Ok(NewReply {
            content: required_string(&payload, "new reply", "content")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddedReply {
    pub id: String,
    pub content: String,
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRow {
    pub id: String,
    pub username: String,
    pub date: RawDate,
    pub content: String,
    pub status: ContentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyDetail {
    id: String,
    content: String,
    date: String,
    username: String,
}

impl ReplyDetail {
    pub fn new(
        id: String,
        content: String,
        date: String,
        username: String,
    ) -> Result<Self, ForumError> {
        ensure_present(
            "reply detail",
            &[
                ("id", id.as_str()),
                ("date", date.as_str()),
                ("username", username.as_str()),
            ],
        )?;

        Ok(ReplyDetail {
            id,
            content,
            date,
            username,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}
