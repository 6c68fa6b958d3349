use std::fmt;

/// The kinds of entity a guard or repository can report on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Thread,
    Comment,
    Reply,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Thread => "thread",
            EntityKind::Comment => "comment",
            EntityKind::Reply => "reply",
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ForumError {
    #[error("{kind} `{id}` not found")]
    NotFound { kind: EntityKind, id: String },

    #[error("you are not the owner of {kind} `{id}`")]
    Forbidden { kind: EntityKind, id: String },

    #[error("{0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ForumError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        ForumError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn forbidden(kind: EntityKind, id: impl Into<String>) -> Self {
        ForumError::Forbidden {
            kind,
            id: id.into(),
        }
    }
}

impl From<diesel::result::Error> for ForumError {
    fn from(e: diesel::result::Error) -> Self {
        ForumError::Storage(Box::new(e))
    }
}

impl From<diesel_async::pooled_connection::deadpool::PoolError> for ForumError {
    fn from(e: diesel_async::pooled_connection::deadpool::PoolError) -> Self {
        ForumError::Storage(Box::new(e))
    }
}
