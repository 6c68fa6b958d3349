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

pub async fn delete_comment(
    repos: &Repositories,
    user_id: &str,
    thread_id: &str,
    comment_id: &str,
) -> Result<(), ForumError> {
    ensure(
        repos,
        &[
            Guard::Thread(thread_id),
            Guard::Comment(comment_id),
            Guard::CommentOwner {
                id: comment_id,
                user_id,
            },
        ],
    )
    .await?;

    repos.comments.delete_comment(comment_id).await?;
    tracing::info!(comment_id, user_id, "comment soft deleted");
    Ok(())
}

pub async fn handle_delete_comment(
    State(ctx): State<App>,
    Path((thread_id, comment_id)): Path<(String, String)>,
    AuthUser(user_id): AuthUser,
) -> Result<axum::Json<Success<()>>, AppError> {
    delete_comment(&ctx.repos, &user_id, &thread_id, &comment_id).await?;
    Ok(success_empty())
}

#[cfg(test)]
mod test {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;

    use super::*;
    use crate::forum::{
        error::EntityKind,
        masking::ContentStatus,
        models::{AddedComment, CommentRow, NewComment},
        repository::{CommentRepository, memory::MemoryRepository},
    };

    /// Counts how often storage is asked to delete a comment.
    struct CountingDeletes {
        inner: Arc<MemoryRepository>,
        deletes: AtomicUsize,
    }

    #[async_trait]
    impl CommentRepository for CountingDeletes {
        async fn add_comment(
            &self,
            thread_id: &str,
            owner: &str,
            comment: &NewComment,
        ) -> Result<AddedComment, ForumError> {
            self.inner.add_comment(thread_id, owner, comment).await
        }

        async fn get_comments_by_thread_id(
            &self,
            thread_id: &str,
        ) -> Result<Vec<CommentRow>, ForumError> {
            self.inner.get_comments_by_thread_id(thread_id).await
        }

        async fn check_availability(&self, id: &str) -> Result<(), ForumError> {
            CommentRepository::check_availability(self.inner.as_ref(), id).await
        }

        async fn verify_owner(&self, id: &str, user_id: &str) -> Result<(), ForumError> {
            CommentRepository::verify_owner(self.inner.as_ref(), id, user_id).await
        }

        async fn delete_comment(&self, id: &str) -> Result<(), ForumError> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.inner.delete_comment(id).await
        }
    }

    fn counting(store: &Arc<MemoryRepository>) -> (Repositories, Arc<CountingDeletes>) {
        let counting = Arc::new(CountingDeletes {
            inner: store.clone(),
            deletes: AtomicUsize::new(0),
        });
        let mut repos = store.repositories();
        repos.comments = counting.clone();
        (repos, counting)
    }

    async fn setup() -> Arc<MemoryRepository> {
        let store = Arc::new(MemoryRepository::new(Arc::new(|| "123".to_string())));
        store
            .seed_thread("thread-123", "user-v", "t", "b", "2021-08-08T07:19:09.775Z")
            .await;
        store
            .seed_comment(
                "comment-123",
                "thread-123",
                "user-v",
                "A comment",
                "2021-08-08T07:22:33.555Z",
                ContentStatus::Active,
            )
            .await;
        store
    }

    #[tokio::test]
    async fn test_owner_soft_deletes_comment() {
        let store = setup().await;

        delete_comment(&store.repositories(), "user-v", "thread-123", "comment-123")
            .await
            .unwrap();

        assert_eq!(
            store.comment_status("comment-123").await,
            Some(ContentStatus::Deleted)
        );
    }

    #[tokio::test]
    async fn test_non_owner_is_forbidden_and_comment_stays() {
        let store = setup().await;

        let err = delete_comment(&store.repositories(), "user-u", "thread-123", "comment-123")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ForumError::Forbidden {
                kind: EntityKind::Comment,
                ..
            }
        ));
        assert_eq!(
            store.comment_status("comment-123").await,
            Some(ContentStatus::Active)
        );
    }

    #[tokio::test]
    async fn test_missing_comment_is_rejected_before_any_delete() {
        let store = setup().await;
        let (repos, counting) = counting(&store);

        let err = delete_comment(&repos, "user-v", "thread-123", "comment-404")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ForumError::NotFound {
                kind: EntityKind::Comment,
                ..
            }
        ));
        assert_eq!(counting.deletes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_non_owner_never_reaches_delete() {
        let store = setup().await;
        let (repos, counting) = counting(&store);

        let err = delete_comment(&repos, "user-u", "thread-123", "comment-123")
            .await
            .unwrap_err();

        assert!(matches!(err, ForumError::Forbidden { .. }));
        assert_eq!(counting.deletes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_thread_is_checked_first() {
        let store = setup().await;

        let err = delete_comment(&store.repositories(), "user-u", "thread-404", "comment-123")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ForumError::NotFound {
                kind: EntityKind::Thread,
                ..
            }
        ));
        assert_eq!(
            store.comment_status("comment-123").await,
            Some(ContentStatus::Active)
        );
    }
}
