use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl, pooled_connection::deadpool::Pool};

use super::{
    CommentLikeRepository, CommentRepository, IdGenerator, ReplyRepository, Repositories,
    SessionRepository, ThreadRepository, display_name,
};
use crate::{
    forum::{
        error::{EntityKind, ForumError},
        masking::ContentStatus,
        models::{
            AddedComment, AddedReply, AddedThread, CommentRow, NewComment, NewReply, NewThread,
            ReplyRow, ThreadRow,
        },
    },
    schema::{comment_likes, comments, replies, sessions, threads, users},
};

pub type DbPool = Pool<AsyncPgConnection>;

pub fn repositories(pool: DbPool, id_generator: IdGenerator) -> Repositories {
    Repositories {
        threads: Arc::new(PgThreadRepository {
            pool: pool.clone(),
            id_generator: id_generator.clone(),
        }),
        comments: Arc::new(PgCommentRepository {
            pool: pool.clone(),
            id_generator: id_generator.clone(),
        }),
        replies: Arc::new(PgReplyRepository {
            pool: pool.clone(),
            id_generator: id_generator.clone(),
        }),
        likes: Arc::new(PgCommentLikeRepository {
            pool: pool.clone(),
            id_generator,
        }),
        sessions: Arc::new(PgSessionRepository { pool }),
    }
}

#[derive(Insertable)]
#[diesel(table_name = threads)]
struct NewThreadRecord<'a> {
    id: &'a str,
    title: &'a str,
    body: &'a str,
    owner: &'a str,
    date: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = comments)]
struct NewCommentRecord<'a> {
    id: &'a str,
    thread_id: &'a str,
    owner: &'a str,
    content: &'a str,
    date: DateTime<Utc>,
    is_delete: bool,
}

#[derive(Insertable)]
#[diesel(table_name = replies)]
struct NewReplyRecord<'a> {
    id: &'a str,
    comment_id: &'a str,
    owner: &'a str,
    content: &'a str,
    date: DateTime<Utc>,
    is_delete: bool,
}

#[derive(Insertable)]
#[diesel(table_name = comment_likes)]
struct NewCommentLikeRecord<'a> {
    id: &'a str,
    comment_id: &'a str,
    owner: &'a str,
}

/// `(id, title, body, date, owner, username)`
type ThreadTuple = (String, String, String, DateTime<Utc>, String, Option<String>);

/// `(id, owner, username, date, content, is_delete)` as selected for comments
/// and replies. Left joined, so authors without a `users` row stay.
type ContentTuple = (String, String, Option<String>, DateTime<Utc>, String, bool);

pub struct PgThreadRepository {
    pool: DbPool,
    id_generator: IdGenerator,
}

#[async_trait]
impl ThreadRepository for PgThreadRepository {
    async fn add_thread(&self, owner: &str, thread: &NewThread) -> Result<AddedThread, ForumError> {
        let mut conn = self.pool.get().await?;
        let id = format!("thread-{}", (self.id_generator)());

        let (id, title, owner) = diesel::insert_into(threads::table)
            .values(NewThreadRecord {
                id: &id,
                title: &thread.title,
                body: &thread.body,
                owner,
                date: Utc::now(),
            })
            .returning((threads::id, threads::title, threads::owner))
            .get_result::<(String, String, String)>(&mut conn)
            .await?;

        Ok(AddedThread { id, title, owner })
    }

    async fn get_thread_by_id(&self, id: &str) -> Result<ThreadRow, ForumError> {
        let mut conn = self.pool.get().await?;

        let row = threads::table
            .left_join(users::table)
            .filter(threads::id.eq(id))
            .select((
                threads::id,
                threads::title,
                threads::body,
                threads::date,
                threads::owner,
                users::username.nullable(),
            ))
            .first::<ThreadTuple>(&mut conn)
            .await
            .optional()?;

        let (id, title, body, date, owner, username) =
            row.ok_or_else(|| ForumError::not_found(EntityKind::Thread, id))?;

        Ok(ThreadRow {
            id,
            title,
            body,
            date: date.into(),
            username: display_name(username, owner),
        })
    }

    async fn check_availability(&self, id: &str) -> Result<(), ForumError> {
        let mut conn = self.pool.get().await?;

        let exists = diesel::select(diesel::dsl::exists(
            threads::table.filter(threads::id.eq(id)),
        ))
        .get_result::<bool>(&mut conn)
        .await?;

        if !exists {
            return Err(ForumError::not_found(EntityKind::Thread, id));
        }

        Ok(())
    }
}

pub struct PgCommentRepository {
    pool: DbPool,
    id_generator: IdGenerator,
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn add_comment(
        &self,
        thread_id: &str,
        owner: &str,
        comment: &NewComment,
    ) -> Result<AddedComment, ForumError> {
        let mut conn = self.pool.get().await?;
        let id = format!("comment-{}", (self.id_generator)());

        let (id, content, owner) = diesel::insert_into(comments::table)
            .values(NewCommentRecord {
                id: &id,
                thread_id,
                owner,
                content: &comment.content,
                date: Utc::now(),
                is_delete: false,
            })
            .returning((comments::id, comments::content, comments::owner))
            .get_result::<(String, String, String)>(&mut conn)
            .await?;

        Ok(AddedComment { id, content, owner })
    }

    async fn get_comments_by_thread_id(
        &self,
        thread_id: &str,
    ) -> Result<Vec<CommentRow>, ForumError> {
        let mut conn = self.pool.get().await?;

        let rows = comments::table
            .left_join(users::table)
            .filter(comments::thread_id.eq(thread_id))
            .order((comments::date.asc(), comments::id.asc()))
            .select((
                comments::id,
                comments::owner,
                users::username.nullable(),
                comments::date,
                comments::content,
                comments::is_delete,
            ))
            .load::<ContentTuple>(&mut conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, owner, username, date, content, is_delete)| CommentRow {
                id,
                username: display_name(username, owner),
                date: date.into(),
                content,
                status: ContentStatus::from(is_delete),
            })
            .collect())
    }

    async fn check_availability(&self, id: &str) -> Result<(), ForumError> {
        let mut conn = self.pool.get().await?;

        let exists = diesel::select(diesel::dsl::exists(
            comments::table.filter(comments::id.eq(id)),
        ))
        .get_result::<bool>(&mut conn)
        .await?;

        if !exists {
            return Err(ForumError::not_found(EntityKind::Comment, id));
        }

        Ok(())
    }

    async fn verify_owner(&self, id: &str, user_id: &str) -> Result<(), ForumError> {
        let mut conn = self.pool.get().await?;

        let owner = comments::table
            .filter(comments::id.eq(id))
            .select(comments::owner)
            .first::<String>(&mut conn)
            .await
            .optional()?;

        match owner {
            None => Err(ForumError::not_found(EntityKind::Comment, id)),
            Some(owner) if owner != user_id => Err(ForumError::forbidden(EntityKind::Comment, id)),
            Some(_) => Ok(()),
        }
    }

    async fn delete_comment(&self, id: &str) -> Result<(), ForumError> {
        let mut conn = self.pool.get().await?;

        let updated = diesel::update(comments::table.filter(comments::id.eq(id)))
            .set(comments::is_delete.eq(true))
            .execute(&mut conn)
            .await?;

        if updated == 0 {
            return Err(ForumError::not_found(EntityKind::Comment, id));
        }

        Ok(())
    }
}

pub struct PgReplyRepository {
    pool: DbPool,
    id_generator: IdGenerator,
}

#[async_trait]
impl ReplyRepository for PgReplyRepository {
    async fn add_reply(
        &self,
        comment_id: &str,
        owner: &str,
        reply: &NewReply,
    ) -> Result<AddedReply, ForumError> {
        let mut conn = self.pool.get().await?;
        let id = format!("reply-{}", (self.id_generator)());

        let (id, content, owner) = diesel::insert_into(replies::table)
            .values(NewReplyRecord {
                id: &id,
                comment_id,
                owner,
                content: &reply.content,
                date: Utc::now(),
                is_delete: false,
            })
            .returning((replies::id, replies::content, replies::owner))
            .get_result::<(String, String, String)>(&mut conn)
            .await?;

        Ok(AddedReply { id, content, owner })
    }

    async fn get_replies_by_comment_id(
        &self,
        comment_id: &str,
    ) -> Result<Vec<ReplyRow>, ForumError> {
        let mut conn = self.pool.get().await?;

        let rows = replies::table
            .left_join(users::table)
            .filter(replies::comment_id.eq(comment_id))
            .order((replies::date.asc(), replies::id.asc()))
            .select((
                replies::id,
                replies::owner,
                users::username.nullable(),
                replies::date,
                replies::content,
                replies::is_delete,
            ))
            .load::<ContentTuple>(&mut conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, owner, username, date, content, is_delete)| ReplyRow {
                id,
                username: display_name(username, owner),
                date: date.into(),
                content,
                status: ContentStatus::from(is_delete),
            })
            .collect())
    }

    async fn check_availability(&self, id: &str) -> Result<(), ForumError> {
        let mut conn = self.pool.get().await?;

        let exists = diesel::select(diesel::dsl::exists(
            replies::table.filter(replies::id.eq(id)),
        ))
        .get_result::<bool>(&mut conn)
        .await?;

        if !exists {
            return Err(ForumError::not_found(EntityKind::Reply, id));
        }

        Ok(())
    }

    async fn verify_owner(&self, id: &str, user_id: &str) -> Result<(), ForumError> {
        let mut conn = self.pool.get().await?;

        let owner = replies::table
            .filter(replies::id.eq(id))
            .select(replies::owner)
            .first::<String>(&mut conn)
            .await
            .optional()?;

        match owner {
            None => Err(ForumError::not_found(EntityKind::Reply, id)),
            Some(owner) if owner != user_id => Err(ForumError::forbidden(EntityKind::Reply, id)),
            Some(_) => Ok(()),
        }
    }

    async fn delete_reply(&self, id: &str) -> Result<(), ForumError> {
        let mut conn = self.pool.get().await?;

        let updated = diesel::update(replies::table.filter(replies::id.eq(id)))
            .set(replies::is_delete.eq(true))
            .execute(&mut conn)
            .await?;

        if updated == 0 {
            return Err(ForumError::not_found(EntityKind::Reply, id));
        }

        Ok(())
    }
}

pub struct PgCommentLikeRepository {
    pool: DbPool,
    id_generator: IdGenerator,
}

#[async_trait]
impl CommentLikeRepository for PgCommentLikeRepository {
    async fn add_like(&self, comment_id: &str, user_id: &str) -> Result<(), ForumError> {
        let mut conn = self.pool.get().await?;
        let id = format!("like-{}", (self.id_generator)());

        // relies on the unique (comment_id, owner) index
        diesel::insert_into(comment_likes::table)
            .values(NewCommentLikeRecord {
                id: &id,
                comment_id,
                owner: user_id,
            })
            .on_conflict((comment_likes::comment_id, comment_likes::owner))
            .do_nothing()
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    async fn delete_like(&self, comment_id: &str, user_id: &str) -> Result<(), ForumError> {
        let mut conn = self.pool.get().await?;

        diesel::delete(
            comment_likes::table
                .filter(comment_likes::comment_id.eq(comment_id))
                .filter(comment_likes::owner.eq(user_id)),
        )
        .execute(&mut conn)
        .await?;

        Ok(())
    }

    async fn check_like_status(&self, comment_id: &str, user_id: &str) -> Result<bool, ForumError> {
        let mut conn = self.pool.get().await?;

        let liked = diesel::select(diesel::dsl::exists(
            comment_likes::table
                .filter(comment_likes::comment_id.eq(comment_id))
                .filter(comment_likes::owner.eq(user_id)),
        ))
        .get_result::<bool>(&mut conn)
        .await?;

        Ok(liked)
    }

    async fn get_like_count_by_comment_id(&self, comment_id: &str) -> Result<u64, ForumError> {
        let mut conn = self.pool.get().await?;

        let count = comment_likes::table
            .filter(comment_likes::comment_id.eq(comment_id))
            .count()
            .get_result::<i64>(&mut conn)
            .await?;

        u64::try_from(count).map_err(|e| ForumError::Storage(Box::new(e)))
    }
}

pub struct PgSessionRepository {
    pool: DbPool,
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn find_user_by_token(&self, token: &str) -> Result<Option<String>, ForumError> {
        let mut conn = self.pool.get().await?;
        let now = Utc::now();

        let user_id = sessions::table
            .filter(sessions::token.eq(token))
            .filter(sessions::active.eq(true))
            .filter(sessions::expires_at.gt(now))
            .filter(sessions::issued_at.le(now))
            .select(sessions::user_id)
            .first::<String>(&mut conn)
            .await
            .optional()?;

        Ok(user_id)
    }
}
