use std::sync::Arc;

use axum::{extract::Path, http::StatusCode, Extension, Json};
use sqlx::SqlitePool;

use crate::{
    authentication::MaybeUser,
    data_formats::{CommentRequest, CommentResponse, CommentWrapper, MultipleCommentsWrapper},
    db_helpers::{
        add_comment_to_article_in_db, delete_comment_in_db, get_comments_for_article_in_db,
        thread_comments,
    },
    errors::RequestError,
};

use super::JsonResult;

// ----------------- Comment Handlers -----------------

pub async fn get_comments(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
) -> JsonResult<MultipleCommentsWrapper> {
    let comments = get_comments_for_article_in_db(&pool, &slug).await?;
    let threads = thread_comments(comments);
    let comments = threads
        .iter()
        .map(|(parent, replies)| {
            let replies = replies
                .iter()
                .map(|reply| CommentResponse::new(reply, Vec::new()))
                .collect();
            CommentResponse::new(parent, replies)
        })
        .collect();
    Ok(Json(MultipleCommentsWrapper { comments }))
}

pub async fn add_comment(
    Extension(pool): Extension<Arc<SqlitePool>>,
    MaybeUser(maybe_user): MaybeUser,
    Path(slug): Path<String>,
    Json(CommentWrapper { comment: request }): Json<CommentWrapper<CommentRequest>>,
) -> Result<(StatusCode, Json<CommentWrapper<CommentResponse>>), RequestError> {
    let user_id = match maybe_user {
        Some(auth_user) => auth_user.id,
        None => return Err(RequestError::NotAuthorized("Need to be authorized")),
    };
    if request.body.trim().is_empty() {
        return Err(RequestError::Validation("Comment body must not be empty"));
    }

    let comment = add_comment_to_article_in_db(&pool, user_id, &slug, &request).await?;
    Ok((
        StatusCode::CREATED,
        Json(CommentWrapper {
            comment: CommentResponse::new(&comment, Vec::new()),
        }),
    ))
}

pub async fn delete_comment(
    Extension(pool): Extension<Arc<SqlitePool>>,
    MaybeUser(maybe_user): MaybeUser,
    Path((slug, comment_id)): Path<(String, i64)>,
) -> Result<StatusCode, RequestError> {
    let user_id = match maybe_user {
        Some(auth_user) => auth_user.id,
        None => return Err(RequestError::NotAuthorized("Need to be authorized")),
    };
    delete_comment_in_db(&pool, user_id, &slug, comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
