use serde::Serialize;

pub const DELETED_COMMENT_PLACEHOLDER: &str = "**comment has been deleted**";
pub const DELETED_REPLY_PLACEHOLDER: &str = "**reply has been deleted**";

/// Soft-delete state of a comment or reply. Rows are never removed, only
/// flipped to `Deleted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Active,
    Deleted,
}

impl From<bool> for ContentStatus {
    /// Maps the stored `is_delete` column.
    fn from(is_deleted: bool) -> Self {
        if is_deleted {
            ContentStatus::Deleted
        } else {
            ContentStatus::Active
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Comment,
    Reply,
}

impl ContentKind {
    pub fn placeholder(&self) -> &'static str {
        match self {
            ContentKind::Comment => DELETED_COMMENT_PLACEHOLDER,
            ContentKind::Reply => DELETED_REPLY_PLACEHOLDER,
        }
    }
}

pub fn mask(content: String, status: ContentStatus, kind: ContentKind) -> String {
    match status {
        ContentStatus::Active => content,
        ContentStatus::Deleted => kind.placeholder().to_string(),
    }
}
