use sqlx::{Sqlite, SqlitePool};

use crate::{
    errors::RequestError,
    models::{Category, TopSale},
};

/// Categories for the navigation and the search form. The fallback
/// bucket for orphaned articles stays out of the list.
pub async fn list_categories_in_db(pool: &SqlitePool) -> Result<Vec<Category>, RequestError> {
    let result = sqlx::query_as::<Sqlite, Category>(
        "SELECT id, name, slug FROM categories WHERE name != 'Uncategorized' ORDER BY name ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(result)
}

pub async fn get_category_by_slug_in_db(
    pool: &SqlitePool,
    slug: &str,
) -> Result<Category, RequestError> {
    let category = sqlx::query_as::<Sqlite, Category>(
        "SELECT id, name, slug FROM categories WHERE LOWER(slug) = LOWER(?)",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;
    match category {
        Some(category) => Ok(category),
        None => Err(RequestError::NotFound("Category not found")),
    }
}

/// The five best-selling models of a category, returned smallest of
/// the five first so a bar chart can draw them left to right.
pub async fn get_top_sales_for_category_in_db(
    pool: &SqlitePool,
    category_id: i64,
) -> Result<Vec<TopSale>, RequestError> {
    let mut sales = sqlx::query_as::<Sqlite, TopSale>(
        r#"SELECT model_name, sales_count
             FROM top_sales
            WHERE category_id = ?
            ORDER BY sales_count DESC
            LIMIT 5"#,
    )
    .bind(category_id)
    .fetch_all(pool)
    .await?;
    sales.reverse();
    Ok(sales)
}
