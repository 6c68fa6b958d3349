use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Value, json};

use crate::{
    App,
    error::AppError,
    forum::{
        error::ForumError,
        guard::{Guard, ensure},
        models::{AddedComment, NewComment},
        repository::Repositories,
    },
    identity::AuthUser,
    json::{Json, success},
};

pub async fn add_comment(
    repos: &Repositories,
    user_id: &str,
    thread_id: &str,
    payload: Value,
) -> Result<AddedComment, ForumError> {
    // validate before touching storage
    let new_comment = NewComment::try_from(payload)?;
    ensure(repos, &[Guard::Thread(thread_id)]).await?;

    repos
        .comments
        .add_comment(thread_id, user_id, &new_comment)
        .await
}

pub async fn handle_add_comment(
    State(ctx): State<App>,
    Path(thread_id): Path<String>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let added_comment = add_comment(&ctx.repos, &user_id, &thread_id, payload).await?;
    Ok((
        StatusCode::CREATED,
        success(json!({ "addedComment": added_comment })),
    ))
}
