use serde::Serialize;
use serde_json::Value;

use super::{CommentDetail, ensure_present, required_string};
use crate::forum::{date::RawDate, error::ForumError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewThread {
    pub title: String,
    pub body: String,
}

impl TryFrom<Value> for NewThread {
    type Error = ForumError;

    fn try_from(payload: Value) -> Result<Self, Self::Error> {
        Ok(NewThread {
            title: required_string(&payload, "new thread", "title")?,
            body: required_string(&payload, "new thread", "body")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddedThread {
    pub id: String,
    pub title: String,
    pub owner: String,
}

/// A thread as it comes out of storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadRow {
    pub id: String,
    pub title: String,
    pub body: String,
    pub date: RawDate,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadDetail {
    id: String,
    title: String,
    body: String,
    date: String,
    username: String,
    comments: Vec<CommentDetail>,
}

impl ThreadDetail {
    pub fn new(
        id: String,
        title: String,
        body: String,
        date: String,
        username: String,
        comments: Vec<CommentDetail>,
    ) -> Result<Self, ForumError> {
        ensure_present(
            "thread detail",
            &[
                ("id", id.as_str()),
                ("date", date.as_str()),
                ("username", username.as_str()),
            ],
        )?;

        Ok(ThreadDetail {
            id,
            title,
            body,
            date,
            username,
            comments,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn comments(&self) -> &[CommentDetail] {
        &self.comments
    }
}
