use axum::extract::{Path, State};
use futures::future::try_join_all;
use serde_json::{Value, json};

use crate::{
    App,
    error::AppError,
    forum::{
        error::ForumError,
        masking::{ContentKind, mask},
        models::{CommentDetail, CommentRow, ReplyDetail, ReplyRow, ThreadDetail},
        repository::Repositories,
    },
    json::{Success, success},
};

/// Assembles a thread, its comments and their replies into one tree.
///
/// Only a missing thread is an error of its own; a thread without comments or
/// a comment without replies or likes is a normal result. Replies and like
/// counts are fetched concurrently for every comment, but comments keep the
/// order the repository returned them in. If any of those fetches fails the
/// whole call fails.
pub async fn get_thread_detail(
    repos: &Repositories,
    thread_id: &str,
) -> Result<ThreadDetail, ForumError> {
    let thread = repos.threads.get_thread_by_id(thread_id).await?;
    let comments = repos.comments.get_comments_by_thread_id(thread_id).await?;

    tracing::debug!(
        thread_id,
        comments = comments.len(),
        "assembling thread detail"
    );

    // try_join_all yields results in input order, not completion order
    let comments = try_join_all(
        comments
            .into_iter()
            .map(|comment| comment_detail(repos, comment)),
    )
    .await?;

    ThreadDetail::new(
        thread.id,
        thread.title,
        thread.body,
        thread.date.normalize()?,
        thread.username,
        comments,
    )
}

async fn comment_detail(
    repos: &Repositories,
    comment: CommentRow,
) -> Result<CommentDetail, ForumError> {
    let (replies, like_count) = tokio::try_join!(
        repos.replies.get_replies_by_comment_id(&comment.id),
        repos.likes.get_like_count_by_comment_id(&comment.id),
    )?;

    let replies = replies
        .into_iter()
        .map(reply_detail)
        .collect::<Result<Vec<_>, _>>()?;

    CommentDetail::new(
        comment.id,
        comment.username,
        comment.date.normalize()?,
        mask(comment.content, comment.status, ContentKind::Comment),
        replies,
        like_count,
    )
}

fn reply_detail(reply: ReplyRow) -> Result<ReplyDetail, ForumError> {
    ReplyDetail::new(
        reply.id,
        mask(reply.content, reply.status, ContentKind::Reply),
        reply.date.normalize()?,
        reply.username,
    )
}

pub async fn handle_get_thread(
    State(ctx): State<App>,
    Path(thread_id): Path<String>,
) -> Result<axum::Json<Success<Value>>, AppError> {
    let thread = get_thread_detail(&ctx.repos, &thread_id).await?;
    Ok(success(json!({ "thread": thread })))
}
