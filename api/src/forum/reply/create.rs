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
        models::{AddedReply, NewReply},
        repository::Repositories,
    },
    identity::AuthUser,
    json::{Json, success},
};

/// Replying to a soft-deleted comment is allowed, the comment still exists.
pub async fn add_reply(
    repos: &Repositories,
    user_id: &str,
    thread_id: &str,
    comment_id: &str,
    payload: Value,
) -> Result<AddedReply, ForumError> {
    let new_reply = NewReply::try_from(payload)?;
    ensure(repos, &[Guard::Thread(thread_id), Guard::Comment(comment_id)]).await?;

    repos
        .replies
        .add_reply(comment_id, user_id, &new_reply)
        .await
}

pub async fn handle_add_reply(
    State(ctx): State<App>,
    Path((thread_id, comment_id)): Path<(String, String)>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let added_reply = add_reply(&ctx.repos, &user_id, &thread_id, &comment_id, payload).await?;
    Ok((
        StatusCode::CREATED,
        success(json!({ "addedReply": added_reply })),
    ))
}
