use sqlx::{Sqlite, SqlitePool};

use crate::{errors::RequestError, models::User};

mod article_helpers;
mod category_helpers;
mod comment_helpers;
mod product_helpers;
mod user_helpers;
mod wishlist_helpers;

pub use article_helpers::*;
pub use category_helpers::*;
pub use comment_helpers::*;
pub use product_helpers::*;
pub use user_helpers::*;
pub use wishlist_helpers::*;

/// `?, ?, ?` for an IN list of `n` values.
fn placeholders(n: usize) -> String {
    let mut out = String::new();
    for i in 0..n {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('?');
    }
    out
}

// ----------------- Helper Functions -----------------

const USER_COLUMNS: &str =
    "id, username, email, password, image, bio, role, created_at";

pub async fn get_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<User>, RequestError> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
    let result = sqlx::query_as::<Sqlite, User>(&query)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, RequestError> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
    let result = sqlx::query_as::<Sqlite, User>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

pub async fn get_article_id_by_slug_in_db(
    pool: &SqlitePool,
    slug: &str,
) -> Result<i64, RequestError> {
    let article = sqlx::query_scalar::<Sqlite, i64>("SELECT id FROM articles WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    match article {
        Some(id) => Ok(id),
        None => Err(RequestError::NotFound("Article not found")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_lists() {
        assert_eq!(placeholders(0), "");
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?, ?, ?");
    }
}
