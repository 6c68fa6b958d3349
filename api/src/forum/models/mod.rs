pub mod comment;
pub mod reply;
pub mod thread;

pub use comment::{AddedComment, CommentDetail, CommentRow, NewComment};
pub use reply::{AddedReply, NewReply, ReplyDetail, ReplyRow};
pub use thread::{AddedThread, NewThread, ThreadDetail, ThreadRow};

use serde_json::Value;

use super::error::ForumError;

/// Pulls a required, non-blank string field out of a request payload.
fn required_string(payload: &Value, entity: &str, field: &str) -> Result<String, ForumError> {
    match payload.get(field) {
        None | Some(Value::Null) => Err(ForumError::Validation(format!(
            "{entity} must contain `{field}`"
        ))),
        Some(Value::String(s)) if s.trim().is_empty() => Err(ForumError::Validation(format!(
            "{entity} must contain `{field}`"
        ))),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ForumError::Validation(format!(
            "`{field}` of {entity} must be a string"
        ))),
    }
}

/// Read models refuse to be built with blank identifying fields.
fn ensure_present(entity: &str, fields: &[(&str, &str)]) -> Result<(), ForumError> {
    match fields.iter().find(|(_, value)| value.is_empty()) {
        Some((name, _)) => Err(ForumError::Validation(format!(
            "{entity} must contain `{name}`"
        ))),
        None => Ok(()),
    }
}
