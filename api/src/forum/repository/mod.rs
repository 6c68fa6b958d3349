//! Persistence contracts consumed by the forum use cases.
//!
//! Every method is a single round trip to storage. Availability checks ignore
//! the soft-delete flag: a deleted comment still exists for the purpose of
//! replying to it or liking it.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use super::{
    error::ForumError,
    models::{
        AddedComment, AddedReply, AddedThread, CommentRow, NewComment, NewReply, NewThread,
        ReplyRow, ThreadRow,
    },
};

/// Produces the opaque unique part of new ids. Repositories prefix it with the
/// entity kind, e.g. `comment-<id>`.
pub type IdGenerator = Arc<dyn Fn() -> String + Send + Sync>;

pub fn uuid_id_generator() -> IdGenerator {
    Arc::new(|| uuid::Uuid::new_v4().simple().to_string())
}

/// Authors without a `users` row show up under their id rather than vanishing
/// from the thread.
fn display_name(username: Option<String>, owner: String) -> String {
    username.unwrap_or(owner)
}

#[async_trait]
pub trait ThreadRepository: Send + Sync {
    async fn add_thread(&self, owner: &str, thread: &NewThread) -> Result<AddedThread, ForumError>;

    /// Fails with `NotFound` when no thread has this id.
    async fn get_thread_by_id(&self, id: &str) -> Result<ThreadRow, ForumError>;

    async fn check_availability(&self, id: &str) -> Result<(), ForumError>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn add_comment(
        &self,
        thread_id: &str,
        owner: &str,
        comment: &NewComment,
    ) -> Result<AddedComment, ForumError>;

    /// Comments of a thread in creation order, soft-deleted ones included.
    async fn get_comments_by_thread_id(
        &self,
        thread_id: &str,
    ) -> Result<Vec<CommentRow>, ForumError>;

    async fn check_availability(&self, id: &str) -> Result<(), ForumError>;

    /// `NotFound` if the comment does not exist, `Forbidden` if it belongs to
    /// someone else.
    async fn verify_owner(&self, id: &str, user_id: &str) -> Result<(), ForumError>;

    /// Soft delete: flips the status, the row stays.
    async fn delete_comment(&self, id: &str) -> Result<(), ForumError>;
}

#[async_trait]
pub trait ReplyRepository: Send + Sync {
    async fn add_reply(
        &self,
        comment_id: &str,
        owner: &str,
        reply: &NewReply,
    ) -> Result<AddedReply, ForumError>;

    /// Replies of a comment in creation order, soft-deleted ones included.
    async fn get_replies_by_comment_id(
        &self,
        comment_id: &str,
    ) -> Result<Vec<ReplyRow>, ForumError>;

    async fn check_availability(&self, id: &str) -> Result<(), ForumError>;

    async fn verify_owner(&self, id: &str, user_id: &str) -> Result<(), ForumError>;

    async fn delete_reply(&self, id: &str) -> Result<(), ForumError>;
}

/// Likes are hard deleted. Storage must keep at most one like per
/// `(comment, user)` pair.
#[async_trait]
pub trait CommentLikeRepository: Send + Sync {
    async fn add_like(&self, comment_id: &str, user_id: &str) -> Result<(), ForumError>;

    async fn delete_like(&self, comment_id: &str, user_id: &str) -> Result<(), ForumError>;

    async fn check_like_status(
        &self,
        comment_id: &str,
        user_id: &str,
    ) -> Result<bool, ForumError>;

    /// Counted on every call, there is no materialized counter.
    async fn get_like_count_by_comment_id(&self, comment_id: &str) -> Result<u64, ForumError>;
}

/// Resolves a session token handed out by the (external) authentication
/// service to the id of the user it belongs to.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn find_user_by_token(&self, token: &str) -> Result<Option<String>, ForumError>;
}

#[derive(Clone)]
pub struct Repositories {
    pub threads: Arc<dyn ThreadRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub replies: Arc<dyn ReplyRepository>,
    pub likes: Arc<dyn CommentLikeRepository>,
    pub sessions: Arc<dyn SessionRepository>,
}
