use sqlx::SqlitePool;

use crate::{errors::RequestError, models::User};

use super::{get_user_by_email, get_user_by_id};

pub async fn insert_user_in_db(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    hashed_password: &str,
) -> Result<User, RequestError> {
    let result = sqlx::query("INSERT INTO users (username, email, password) VALUES (?, ?, ?)")
        .bind(username)
        .bind(email)
        .bind(hashed_password)
        .execute(pool)
        .await
        .map_err(RequestError::from);
    if let Err(error) = result {
        if error.is_unique_violation() {
            return Err(RequestError::Validation("Email or username already taken"));
        }
        return Err(error);
    }

    match get_user_by_email(pool, email).await? {
        Some(user) => Ok(user),
        None => Err(RequestError::ServerError),
    }
}

pub async fn update_user_in_db(
    pool: &SqlitePool,
    user_id: i64,
    username: Option<&str>,
    email: Option<&str>,
    hashed_password: Option<&str>,
    bio: Option<&str>,
    image: Option<&str>,
) -> Result<User, RequestError> {
    let result = sqlx::query(
        r#"UPDATE users
              SET username = COALESCE(?, username),
                  email = COALESCE(?, email),
                  password = COALESCE(?, password),
                  bio = COALESCE(?, bio),
                  image = COALESCE(?, image)
            WHERE id = ?"#,
    )
    .bind(username)
    .bind(email)
    .bind(hashed_password)
    .bind(bio)
    .bind(image)
    .bind(user_id)
    .execute(pool)
    .await
    .map_err(RequestError::from);
    if let Err(error) = result {
        if error.is_unique_violation() {
            return Err(RequestError::Validation("Email or username already taken"));
        }
        return Err(error);
    }

    match get_user_by_id(pool, user_id).await? {
        Some(user) => Ok(user),
        None => Err(RequestError::NotFound("User not found")),
    }
}
