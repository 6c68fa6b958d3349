use axum::extract::{Path, State};

use crate::{
    App,
    error::AppError,
    forum::{
        error::ForumError,
        guard::{Guard, ensure},
        repository::Repositories,
    },
    identity::AuthUser,
    json::{Success, success_empty},
};

pub async fn delete_reply(
    repos: &Repositories,
    user_id: &str,
    thread_id: &str,
    comment_id: &str,
    reply_id: &str,
) -> Result<(), ForumError> {
    ensure(
        repos,
        &[
            Guard::Thread(thread_id),
            Guard::Comment(comment_id),
            Guard::Reply(reply_id),
            Guard::ReplyOwner {
                id: reply_id,
                user_id,
            },
        ],
    )
    .await?;

    repos.replies.delete_reply(reply_id).await?;
    tracing::info!(reply_id, user_id, "reply soft deleted");
    Ok(())
}

pub async fn handle_delete_reply(
    State(ctx): State<App>,
    Path((thread_id, comment_id, reply_id)): Path<(String, String, String)>,
    AuthUser(user_id): AuthUser,
) -> Result<axum::Json<Success<()>>, AppError> {
    delete_reply(&ctx.repos, &user_id, &thread_id, &comment_id, &reply_id).await?;
    Ok(success_empty())
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use super::*;
    use crate::forum::{
        error::EntityKind, masking::ContentStatus, repository::memory::MemoryRepository,
    };

    async fn setup() -> Arc<MemoryRepository> {
        let store = Arc::new(MemoryRepository::new(Arc::new(|| "123".to_string())));
        store
            .seed_thread("thread-123", "user-1", "t", "b", "2021-08-08T07:19:09.775Z")
            .await;
        store
            .seed_comment(
                "comment-123",
                "thread-123",
                "user-1",
                "A comment",
                "2021-08-08T07:22:33.555Z",
                ContentStatus::Active,
            )
            .await;
        store
            .seed_reply(
                "reply-123",
                "comment-123",
                "user-2",
                "A reply",
                "2021-08-08T07:59:48.766Z",
                ContentStatus::Active,
            )
            .await;
        store
    }

    #[tokio::test]
    async fn test_owner_soft_deletes_reply() {
        let store = setup().await;

        delete_reply(
            &store.repositories(),
            "user-2",
            "thread-123",
            "comment-123",
            "reply-123",
        )
        .await
        .unwrap();

        assert_eq!(
            store.reply_status("reply-123").await,
            Some(ContentStatus::Deleted)
        );
    }

    #[tokio::test]
    async fn test_comment_owner_cannot_delete_someone_elses_reply() {
        let store = setup().await;

        let err = delete_reply(
            &store.repositories(),
            "user-1",
            "thread-123",
            "comment-123",
            "reply-123",
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            ForumError::Forbidden {
                kind: EntityKind::Reply,
                ..
            }
        ));
        assert_eq!(
            store.reply_status("reply-123").await,
            Some(ContentStatus::Active)
        );
    }

    #[tokio::test]
    async fn test_existence_chain_runs_top_down() {
        let store = setup().await;
        let repos = store.repositories();

        let err = delete_reply(&repos, "user-2", "thread-123", "comment-404", "reply-404")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ForumError::NotFound {
                kind: EntityKind::Comment,
                ..
            }
        ));

        let err = delete_reply(&repos, "user-2", "thread-123", "comment-123", "reply-404")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ForumError::NotFound {
                kind: EntityKind::Reply,
                ..
            }
        ));
    }
}
