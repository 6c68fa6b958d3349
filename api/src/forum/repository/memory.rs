//! In-process storage used by the test suite, the benches and `STORAGE=memory`
//! development runs. Rows are kept in insertion order, which stands in for the
//! creation order Postgres sorts by.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{
    CommentLikeRepository, CommentRepository, IdGenerator, ReplyRepository, Repositories,
    SessionRepository, ThreadRepository, display_name,
};
use crate::{
    config::DevSession,
    forum::{
        date::RawDate,
        error::{EntityKind, ForumError},
        masking::ContentStatus,
        models::{
            AddedComment, AddedReply, AddedThread, CommentRow, NewComment, NewReply, NewThread,
            ReplyRow, ThreadRow,
        },
    },
};

struct StoredThread {
    id: String,
    title: String,
    body: String,
    owner: String,
    date: RawDate,
}

struct StoredContent {
    id: String,
    parent_id: String,
    owner: String,
    content: String,
    date: RawDate,
    status: ContentStatus,
}

#[derive(Default)]
struct Tables {
    usernames: HashMap<String, String>,
    threads: Vec<StoredThread>,
    comments: Vec<StoredContent>,
    replies: Vec<StoredContent>,
    /// `(comment_id, user_id)`
    likes: Vec<(String, String)>,
}

impl Tables {
    fn username(&self, owner: &str) -> String {
        display_name(self.usernames.get(owner).cloned(), owner.to_string())
    }

    fn find_content<'a>(
        rows: &'a [StoredContent],
        kind: EntityKind,
        id: &str,
    ) -> Result<&'a StoredContent, ForumError> {
        rows.iter()
            .find(|r| r.id == id)
            .ok_or_else(|| ForumError::not_found(kind, id))
    }

    fn soft_delete(
        rows: &mut [StoredContent],
        kind: EntityKind,
        id: &str,
    ) -> Result<(), ForumError> {
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ForumError::not_found(kind, id))?;
        row.status = ContentStatus::Deleted;
        Ok(())
    }

    fn verify_owner(
        rows: &[StoredContent],
        kind: EntityKind,
        id: &str,
        user_id: &str,
    ) -> Result<(), ForumError> {
        let row = Self::find_content(rows, kind, id)?;
        if row.owner != user_id {
            return Err(ForumError::forbidden(kind, id));
        }
        Ok(())
    }
}

pub struct MemoryRepository {
    tables: Mutex<Tables>,
    sessions: scc::HashMap<String, String>,
    id_generator: IdGenerator,
}

impl MemoryRepository {
    pub fn new(id_generator: IdGenerator) -> Self {
        MemoryRepository {
            tables: Mutex::new(Tables::default()),
            sessions: scc::HashMap::new(),
            id_generator,
        }
    }

    /// Hands the same store out behind every repository contract.
    pub fn repositories(self: &Arc<Self>) -> Repositories {
        Repositories {
            threads: self.clone(),
            comments: self.clone(),
            replies: self.clone(),
            likes: self.clone(),
            sessions: self.clone(),
        }
    }

    pub async fn add_user(&self, id: &str, username: &str) {
        self.tables
            .lock()
            .await
            .usernames
            .insert(id.to_string(), username.to_string());
    }

    /// Registers `token` for `user_id`, replacing whoever held it before.
    pub async fn add_session(&self, token: &str, user_id: &str) {
        self.sessions
            .upsert_async(token.to_string(), user_id.to_string())
            .await;
    }

    /// Registers the users and tokens a development run starts with.
    pub async fn seed_dev_sessions(&self, sessions: &[DevSession]) {
        for session in sessions {
            self.add_user(&session.user_id, &session.username).await;
            self.add_session(&session.token, &session.user_id).await;
        }
    }

    /// Inserts a thread with a caller-chosen id and stored date.
    pub async fn seed_thread(
        &self,
        id: &str,
        owner: &str,
        title: &str,
        body: &str,
        date: impl Into<RawDate>,
    ) {
        self.tables.lock().await.threads.push(StoredThread {
            id: id.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            owner: owner.to_string(),
            date: date.into(),
        });
    }

    pub async fn seed_comment(
        &self,
        id: &str,
        thread_id: &str,
        owner: &str,
        content: &str,
        date: impl Into<RawDate>,
        status: ContentStatus,
    ) {
        self.tables.lock().await.comments.push(StoredContent {
            id: id.to_string(),
            parent_id: thread_id.to_string(),
            owner: owner.to_string(),
            content: content.to_string(),
            date: date.into(),
            status,
        });
    }

    pub async fn seed_reply(
        &self,
        id: &str,
        comment_id: &str,
        owner: &str,
        content: &str,
        date: impl Into<RawDate>,
        status: ContentStatus,
    ) {
        self.tables.lock().await.replies.push(StoredContent {
            id: id.to_string(),
            parent_id: comment_id.to_string(),
            owner: owner.to_string(),
            content: content.to_string(),
            date: date.into(),
            status,
        });
    }

    /// Number of stored like rows for the pair, for asserting uniqueness.
    pub async fn like_rows(&self, comment_id: &str, user_id: &str) -> usize {
        self.tables
            .lock()
            .await
            .likes
            .iter()
            .filter(|(c, u)| c == comment_id && u == user_id)
            .count()
    }

    pub async fn comment_status(&self, id: &str) -> Option<ContentStatus> {
        let tables = self.tables.lock().await;
        tables
            .comments
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.status)
    }

    pub async fn reply_status(&self, id: &str) -> Option<ContentStatus> {
        let tables = self.tables.lock().await;
        tables.replies.iter().find(|r| r.id == id).map(|r| r.status)
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", (self.id_generator)())
    }
}

#[async_trait]
impl ThreadRepository for MemoryRepository {
    async fn add_thread(&self, owner: &str, thread: &NewThread) -> Result<AddedThread, ForumError> {
        let id = self.next_id("thread");
        self.tables.lock().await.threads.push(StoredThread {
            id: id.clone(),
            title: thread.title.clone(),
            body: thread.body.clone(),
            owner: owner.to_string(),
            date: Utc::now().into(),
        });

        Ok(AddedThread {
            id,
            title: thread.title.clone(),
            owner: owner.to_string(),
        })
    }

    async fn get_thread_by_id(&self, id: &str) -> Result<ThreadRow, ForumError> {
        let tables = self.tables.lock().await;
        let thread = tables
            .threads
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| ForumError::not_found(EntityKind::Thread, id))?;

        Ok(ThreadRow {
            id: thread.id.clone(),
            title: thread.title.clone(),
            body: thread.body.clone(),
            date: thread.date.clone(),
            username: tables.username(&thread.owner),
        })
    }

    async fn check_availability(&self, id: &str) -> Result<(), ForumError> {
        let tables = self.tables.lock().await;
        if !tables.threads.iter().any(|t| t.id == id) {
            return Err(ForumError::not_found(EntityKind::Thread, id));
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for MemoryRepository {
    async fn add_comment(
        &self,
        thread_id: &str,
        owner: &str,
        comment: &NewComment,
    ) -> Result<AddedComment, ForumError> {
        let id = self.next_id("comment");
        self.tables.lock().await.comments.push(StoredContent {
            id: id.clone(),
            parent_id: thread_id.to_string(),
            owner: owner.to_string(),
            content: comment.content.clone(),
            date: Utc::now().into(),
            status: ContentStatus::Active,
        });

        Ok(AddedComment {
            id,
            content: comment.content.clone(),
            owner: owner.to_string(),
        })
    }

    async fn get_comments_by_thread_id(
        &self,
        thread_id: &str,
    ) -> Result<Vec<CommentRow>, ForumError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.parent_id == thread_id)
            .map(|c| CommentRow {
                id: c.id.clone(),
                username: tables.username(&c.owner),
                date: c.date.clone(),
                content: c.content.clone(),
                status: c.status,
            })
            .collect())
    }

    async fn check_availability(&self, id: &str) -> Result<(), ForumError> {
        let tables = self.tables.lock().await;
        Tables::find_content(&tables.comments, EntityKind::Comment, id).map(|_| ())
    }

    async fn verify_owner(&self, id: &str, user_id: &str) -> Result<(), ForumError> {
        let tables = self.tables.lock().await;
        Tables::verify_owner(&tables.comments, EntityKind::Comment, id, user_id)
    }

    async fn delete_comment(&self, id: &str) -> Result<(), ForumError> {
        let mut tables = self.tables.lock().await;
        Tables::soft_delete(&mut tables.comments, EntityKind::Comment, id)
    }
}

#[async_trait]
impl ReplyRepository for MemoryRepository {
    async fn add_reply(
        &self,
        comment_id: &str,
        owner: &str,
        reply: &NewReply,
    ) -> Result<AddedReply, ForumError> {
        let id = self.next_id("reply");
        self.tables.lock().await.replies.push(StoredContent {
            id: id.clone(),
            parent_id: comment_id.to_string(),
            owner: owner.to_string(),
            content: reply.content.clone(),
            date: Utc::now().into(),
            status: ContentStatus::Active,
        });

        Ok(AddedReply {
            id,
            content: reply.content.clone(),
            owner: owner.to_string(),
        })
    }

    async fn get_replies_by_comment_id(
        &self,
        comment_id: &str,
    ) -> Result<Vec<ReplyRow>, ForumError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .replies
            .iter()
            .filter(|r| r.parent_id == comment_id)
            .map(|r| ReplyRow {
                id: r.id.clone(),
                username: tables.username(&r.owner),
                date: r.date.clone(),
                content: r.content.clone(),
                status: r.status,
            })
            .collect())
    }

    async fn check_availability(&self, id: &str) -> Result<(), ForumError> {
        let tables = self.tables.lock().await;
        Tables::find_content(&tables.replies, EntityKind::Reply, id).map(|_| ())
    }

    async fn verify_owner(&self, id: &str, user_id: &str) -> Result<(), ForumError> {
        let tables = self.tables.lock().await;
        Tables::verify_owner(&tables.replies, EntityKind::Reply, id, user_id)
    }

    async fn delete_reply(&self, id: &str) -> Result<(), ForumError> {
        let mut tables = self.tables.lock().await;
        Tables::soft_delete(&mut tables.replies, EntityKind::Reply, id)
    }
}

#[async_trait]
impl CommentLikeRepository for MemoryRepository {
    async fn add_like(&self, comment_id: &str, user_id: &str) -> Result<(), ForumError> {
        let mut tables = self.tables.lock().await;
        let exists = tables
            .likes
            .iter()
            .any(|(c, u)| c == comment_id && u == user_id);

        // same outcome as the unique index in Postgres
        if !exists {
            tables
                .likes
                .push((comment_id.to_string(), user_id.to_string()));
        }
        Ok(())
    }

    async fn delete_like(&self, comment_id: &str, user_id: &str) -> Result<(), ForumError> {
        self.tables
            .lock()
            .await
            .likes
            .retain(|(c, u)| !(c == comment_id && u == user_id));
        Ok(())
    }

    async fn check_like_status(&self, comment_id: &str, user_id: &str) -> Result<bool, ForumError> {
        Ok(self.like_rows(comment_id, user_id).await > 0)
    }

    async fn get_like_count_by_comment_id(&self, comment_id: &str) -> Result<u64, ForumError> {
        let tables = self.tables.lock().await;
        Ok(tables.likes.iter().filter(|(c, _)| c == comment_id).count() as u64)
    }
}

#[async_trait]
impl SessionRepository for MemoryRepository {
    async fn find_user_by_token(&self, token: &str) -> Result<Option<String>, ForumError> {
        Ok(self
            .sessions
            .read_async(token, |_, user_id| user_id.clone())
            .await)
    }
}
