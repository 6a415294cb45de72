use std::sync::Arc;

use axum::{Extension, Json};
use sqlx::SqlitePool;

use crate::{
    authentication::{
        get_jwt_token, hash_password_argon2, verify_password_argon2, AuthUser, MaybeUser,
    },
    data_formats::{LoginRequest, RegisterRequest, UpdateUserRequest, UserResponse, UserWrapper},
    db_helpers::{get_user_by_email, get_user_by_id, insert_user_in_db, update_user_in_db},
    errors::RequestError,
};

use super::JsonResult;

type UserJson = UserWrapper<UserResponse>;

// ----------------- User Handlers -----------------
pub async fn login_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(UserWrapper { user: request }): Json<UserWrapper<LoginRequest>>,
) -> JsonResult<UserJson> {
    let user = match get_user_by_email(&pool, &request.email).await? {
        Some(user) => user,
        None => return Err(RequestError::NotAuthorized("Email not found")),
    };

    let is_password_correct = verify_password_argon2(request.password, user.password.clone())
        .await
        .map_err(|_| RequestError::ServerError)?;
    if !is_password_correct {
        return Err(RequestError::NotAuthorized("Incorrect password"));
    }

    let token = get_jwt_token(user.id).map_err(|_| RequestError::ServerError)?;
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, token,
    ))))
}

pub async fn register_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(UserWrapper { user: request }): Json<UserWrapper<RegisterRequest>>,
) -> JsonResult<UserJson> {
    if request.username.trim().is_empty() || request.email.trim().is_empty() {
        return Err(RequestError::Validation("Username and email are required"));
    }
    if request.password.len() < 8 {
        return Err(RequestError::Validation(
            "Password must be at least 8 characters",
        ));
    }

    let hashed_password = hash_password_argon2(request.password)
        .await
        .map_err(|_| RequestError::ServerError)?;
    let user = insert_user_in_db(&pool, &request.username, &request.email, &hashed_password).await?;

    let token = get_jwt_token(user.id).map_err(|_| RequestError::ServerError)?;
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, token,
    ))))
}

pub async fn get_current_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    MaybeUser(maybe_user): MaybeUser,
) -> JsonResult<UserJson> {
    let AuthUser { id, token } = match maybe_user {
        Some(auth_user) => auth_user,
        None => return Err(RequestError::NotAuthorized("Need to be authorized")),
    };
    let user = match get_user_by_id(&pool, id).await? {
        Some(user) => user,
        None => return Err(RequestError::NotAuthorized("Need to be authorized")),
    };
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, token,
    ))))
}

pub async fn update_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    MaybeUser(maybe_user): MaybeUser,
    Json(UserWrapper { user: request }): Json<UserWrapper<UpdateUserRequest>>,
) -> JsonResult<UserJson> {
    let AuthUser { id, token } = match maybe_user {
        Some(auth_user) => auth_user,
        None => return Err(RequestError::NotAuthorized("Need to be authorized")),
    };

    let hashed_password = match request.password {
        Some(password) => Some(
            hash_password_argon2(password)
                .await
                .map_err(|_| RequestError::ServerError)?,
        ),
        None => None,
    };
    let user = update_user_in_db(
        &pool,
        id,
        request.username.as_deref(),
        request.email.as_deref(),
        hashed_password.as_deref(),
        request.bio.as_deref(),
        request.image.as_deref(),
    )
    .await?;
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, token,
    ))))
}
