use serde::Serialize;
use serde_json::Value;

use super::{ReplyDetail, ensure_present, required_string};
use crate::forum::{date::RawDate, error::ForumError, masking::ContentStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub content: String,
}

impl TryFrom<Value> for NewComment {
    type Error = ForumError;

    fn try_from(payload: Value) -> Result<Self, Self::Error> {
        Ok(NewComment {
            content: required_string(&payload, "new comment", "content")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddedComment {
    pub id: String,
    pub content: String,
    pub owner: String,
}

/// A comment as it comes out of storage, joined with its author's username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRow {
    pub id: String,
    pub username: String,
    pub date: RawDate,
    pub content: String,
    pub status: ContentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDetail {
    id: String,
    username: String,
    date: String,
    content: String,
    replies: Vec<ReplyDetail>,
    like_count: u64,
}

impl CommentDetail {
    pub fn new(
        id: String,
        username: String,
        date: String,
        content: String,
        replies: Vec<ReplyDetail>,
        like_count: u64,
    ) -> Result<Self, ForumError> {
        ensure_present(
            "comment detail",
            &[
                ("id", id.as_str()),
                ("username", username.as_str()),
                ("date", date.as_str()),
            ],
        )?;

        Ok(CommentDetail {
            id,
            username,
            date,
            content,
            replies,
            like_count,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn replies(&self) -> &[ReplyDetail] {
        &self.replies
    }

    pub fn like_count(&self) -> u64 {
        self.like_count
    }
}
