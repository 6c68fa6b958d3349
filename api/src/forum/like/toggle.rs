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

/// Flips the user's like on a comment. Anyone may like any comment, their own
/// and soft-deleted ones included.
///
/// This reads the current state and then writes the opposite, without a lock.
/// Two concurrent toggles by the same user can both read the same state; the
/// `(comment, user)` uniqueness enforced by storage keeps that from producing
/// a duplicate row, so the pair always settles to liked or not liked.
pub async fn toggle_like(
    repos: &Repositories,
    user_id: &str,
    thread_id: &str,
    comment_id: &str,
) -> Result<(), ForumError> {
    ensure(repos, &[Guard::Thread(thread_id), Guard::Comment(comment_id)]).await?;

    if repos.likes.check_like_status(comment_id, user_id).await? {
        repos.likes.delete_like(comment_id, user_id).await?;
        tracing::debug!(comment_id, user_id, "like removed");
    } else {
        repos.likes.add_like(comment_id, user_id).await?;
        tracing::debug!(comment_id, user_id, "like added");
    }

    Ok(())
}

pub async fn handle_toggle_like(
    State(ctx): State<App>,
    Path((thread_id, comment_id)): Path<(String, String)>,
    AuthUser(user_id): AuthUser,
) -> Result<axum::Json<Success<()>>, AppError> {
    toggle_like(&ctx.repos, &user_id, &thread_id, &comment_id).await?;
    Ok(success_empty())
}
