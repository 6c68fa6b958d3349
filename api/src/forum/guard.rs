//! Existence and ownership checks run before every mutation.
//!
//! A use case lists its guards from the outermost entity inwards (thread,
//! then comment, then reply, then ownership) and [`ensure`] stops at the first
//! one that fails, so nothing is written unless the whole chain holds.

use super::{error::ForumError, repository::Repositories};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard<'a> {
    Thread(&'a str),
    Comment(&'a str),
    Reply(&'a str),
    CommentOwner { id: &'a str, user_id: &'a str },
    ReplyOwner { id: &'a str, user_id: &'a str },
}

impl Guard<'_> {
    async fn check(&self, repos: &Repositories) -> Result<(), ForumError> {
        match *self {
            Guard::Thread(id) => repos.threads.check_availability(id).await,
            Guard::Comment(id) => repos.comments.check_availability(id).await,
            Guard::Reply(id) => repos.replies.check_availability(id).await,
            Guard::CommentOwner { id, user_id } => repos.comments.verify_owner(id, user_id).await,
            Guard::ReplyOwner { id, user_id } => repos.replies.verify_owner(id, user_id).await,
        }
    }
}

pub async fn ensure(repos: &Repositories, guards: &[Guard<'_>]) -> Result<(), ForumError> {
    for guard in guards {
        if let Err(e) = guard.check(repos).await {
            tracing::debug!(?guard, error = %e, "guard rejected request");
            return Err(e);
        }
    }

    Ok(())
}
