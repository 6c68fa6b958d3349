use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde_json::{Value, json};

use crate::{
    App,
    error::AppError,
    forum::{
        error::ForumError,
        models::{AddedThread, NewThread},
        repository::Repositories,
    },
    identity::AuthUser,
    json::{Json, success},
};

pub async fn add_thread(
    repos: &Repositories,
    owner: &str,
    payload: Value,
) -> Result<AddedThread, ForumError> {
    let new_thread = NewThread::try_from(payload)?;
    let added = repos.threads.add_thread(owner, &new_thread).await?;
    tracing::info!(thread_id = %added.id, owner, "thread created");
    Ok(added)
}

pub async fn handle_add_thread(
    State(ctx): State<App>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let added_thread = add_thread(&ctx.repos, &user_id, payload).await?;
    Ok((
        StatusCode::CREATED,
        success(json!({ "addedThread": added_thread })),
    ))
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use super::*;
    use crate::forum::repository::memory::MemoryRepository;

    #[tokio::test]
    async fn test_add_thread_persists_and_returns_added_thread() {
        let store = Arc::new(MemoryRepository::new(Arc::new(|| "123".to_string())));
        let repos = store.repositories();

        let added = add_thread(
            &repos,
            "user-123",
            json!({ "title": "A Thread", "body": "A Body" }),
        )
        .await
        .unwrap();

        assert_eq!(
            added,
            AddedThread {
                id: "thread-123".into(),
                title: "A Thread".into(),
                owner: "user-123".into(),
            }
        );
        assert!(repos.threads.check_availability("thread-123").await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_payload_writes_nothing() {
        let store = Arc::new(MemoryRepository::new(Arc::new(|| "123".to_string())));
        let repos = store.repositories();

        let err = add_thread(&repos, "user-123", json!({ "title": "A Thread" }))
            .await
            .unwrap_err();

        assert!(matches!(err, ForumError::Validation(_)));
        assert!(repos.threads.check_availability("thread-123").await.is_err());
    }
}
