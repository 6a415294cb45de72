use sqlx::{Sqlite, SqlitePool};

use crate::{errors::RequestError, models::WishlistRow};

pub async fn get_wishlist_in_db(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<WishlistRow>, RequestError> {
    let result = sqlx::query_as::<Sqlite, WishlistRow>(
        r#"SELECT wishlist.id,
                  wishlist.product_id,
                  wishlist.added_at,
                  products.title,
                  products.image,
                  products.price,
                  products.mrp,
                  products.amazon_link,
                  products.flipkart_link
             FROM wishlist
             JOIN products ON products.id = wishlist.product_id
            WHERE wishlist.user_id = ?
            ORDER BY wishlist.id DESC"#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(result)
}

pub async fn add_to_wishlist_in_db(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
) -> Result<(), RequestError> {
    let exists = sqlx::query_scalar::<Sqlite, i64>("SELECT id FROM products WHERE id = ?")
        .bind(product_id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(RequestError::NotFound("Product not found"));
    }

    let result = sqlx::query("INSERT INTO wishlist (user_id, product_id) VALUES (?, ?)")
        .bind(user_id)
        .bind(product_id)
        .execute(pool)
        .await
        .map_err(RequestError::from);
    if let Err(error) = result {
        if error.is_unique_violation() {
            return Err(RequestError::Validation("Product already in wishlist"));
        }
        return Err(error);
    }
    Ok(())
}

pub async fn remove_from_wishlist_in_db(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
) -> Result<(), RequestError> {
    let result = sqlx::query("DELETE FROM wishlist WHERE user_id = ? AND product_id = ?")
        .bind(user_id)
        .bind(product_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Wishlist item not found"));
    }
    Ok(())
}
