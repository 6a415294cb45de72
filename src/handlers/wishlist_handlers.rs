use std::sync::Arc;

use axum::{extract::Path, http::StatusCode, Extension, Json};
use sqlx::SqlitePool;

use crate::{
    authentication::MaybeUser,
    data_formats::{WishlistAddRequest, WishlistWrapper},
    db_helpers::{add_to_wishlist_in_db, get_wishlist_in_db, remove_from_wishlist_in_db},
    errors::RequestError,
};

use super::JsonResult;

fn require_user(maybe_user: Option<crate::authentication::AuthUser>) -> Result<i64, RequestError> {
    match maybe_user {
        Some(auth_user) => Ok(auth_user.id),
        None => Err(RequestError::NotAuthorized("Need to be authorized")),
    }
}

async fn wishlist_response(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Json<WishlistWrapper>, RequestError> {
    let rows = get_wishlist_in_db(pool, user_id).await?;
    Ok(Json(WishlistWrapper {
        wishlist: rows.into_iter().map(Into::into).collect(),
    }))
}

// ----------------- Wishlist Handlers -----------------

pub async fn get_wishlist(
    Extension(pool): Extension<Arc<SqlitePool>>,
    MaybeUser(maybe_user): MaybeUser,
) -> JsonResult<WishlistWrapper> {
    let user_id = require_user(maybe_user)?;
    wishlist_response(&pool, user_id).await
}

pub async fn add_to_wishlist(
    Extension(pool): Extension<Arc<SqlitePool>>,
    MaybeUser(maybe_user): MaybeUser,
    Json(request): Json<WishlistAddRequest>,
) -> Result<(StatusCode, Json<WishlistWrapper>), RequestError> {
    let user_id = require_user(maybe_user)?;
    add_to_wishlist_in_db(&pool, user_id, request.product_id).await?;
    Ok((StatusCode::CREATED, wishlist_response(&pool, user_id).await?))
}

pub async fn remove_from_wishlist(
    Extension(pool): Extension<Arc<SqlitePool>>,
    MaybeUser(maybe_user): MaybeUser,
    Path(product_id): Path<i64>,
) -> JsonResult<WishlistWrapper> {
    let user_id = require_user(maybe_user)?;
    remove_from_wishlist_in_db(&pool, user_id, product_id).await?;
    wishlist_response(&pool, user_id).await
}
