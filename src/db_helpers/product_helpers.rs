use sqlx::{Sqlite, SqlitePool};

use crate::{
    data_formats::{CreateProductRequest, UpdateProductRequest},
    errors::RequestError,
    models::{PriceChange, Product, ProductRow},
    slugify,
};

const PRODUCT_QUERY: &str = r#"
    SELECT id, title, slug, image, short_description, pros, cons, tags,
           amazon_link, flipkart_link, badge, category_id,
           price, mrp, discount_percent, created_at, updated_at
      FROM products
"#;

/// A deal needs at least this much off the MRP to make the page.
const DEAL_DISCOUNT_FLOOR: f64 = 25.0;
const DEAL_PAGE_SIZE: i64 = 12;

/// How many products the price tracker watches, and how much history
/// each shows.
const TRACKED_PRODUCT_LIMIT: i64 = 5;
const PRICE_HISTORY_LIMIT: i64 = 10;

fn encode_string_list(list: &[String]) -> Result<String, RequestError> {
    serde_json::to_string(list).map_err(|e| {
        tracing::error!("failed to encode list column: {}", e);
        RequestError::ServerError
    })
}

pub async fn get_product_by_slug_in_db(
    pool: &SqlitePool,
    slug: &str,
) -> Result<Product, RequestError> {
    let query = format!("{PRODUCT_QUERY} WHERE slug = ?");
    let row = sqlx::query_as::<Sqlite, ProductRow>(&query)
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    match row {
        Some(row) => Product::try_from(row),
        None => Err(RequestError::NotFound("Product not found")),
    }
}

pub async fn list_products_in_db(pool: &SqlitePool) -> Result<Vec<Product>, RequestError> {
    let query = format!("{PRODUCT_QUERY} ORDER BY title ASC");
    let rows = sqlx::query_as::<Sqlite, ProductRow>(&query)
        .fetch_all(pool)
        .await?;
    rows.into_iter().map(Product::try_from).collect()
}

pub async fn get_deals_in_db(pool: &SqlitePool) -> Result<Vec<Product>, RequestError> {
    let query = format!(
        "{PRODUCT_QUERY} WHERE discount_percent >= ? ORDER BY discount_percent DESC LIMIT ?"
    );
    let rows = sqlx::query_as::<Sqlite, ProductRow>(&query)
        .bind(DEAL_DISCOUNT_FLOOR)
        .bind(DEAL_PAGE_SIZE)
        .fetch_all(pool)
        .await?;
    rows.into_iter().map(Product::try_from).collect()
}

pub async fn create_product_in_db(
    pool: &SqlitePool,
    request: CreateProductRequest,
) -> Result<Product, RequestError> {
    let slug = request
        .slug
        .clone()
        .unwrap_or_else(|| slugify(&request.title));
    let result = sqlx::query(
        r#"INSERT INTO products
               (title, slug, image, short_description, pros, cons, tags,
                amazon_link, flipkart_link, badge, category_id, price, mrp, discount_percent)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&request.title)
    .bind(&slug)
    .bind(&request.image)
    .bind(&request.short_description)
    .bind(encode_string_list(&request.pros)?)
    .bind(encode_string_list(&request.cons)?)
    .bind(encode_string_list(&request.tags)?)
    .bind(&request.amazon_link)
    .bind(&request.flipkart_link)
    .bind(&request.badge)
    .bind(request.category_id)
    .bind(request.price)
    .bind(request.mrp)
    .bind(request.discount_percent)
    .execute(pool)
    .await
    .map_err(RequestError::from);

    if let Err(error) = result {
        if error.is_unique_violation() {
            return Err(RequestError::Validation("Slug already in use"));
        }
        return Err(error);
    }

    get_product_by_slug_in_db(pool, &slug).await
}

/// Updates a product and, when the price moved, records the old and
/// new price in the same transaction so the history can never miss a
/// change the product row shows.
pub async fn update_product_in_db(
    pool: &SqlitePool,
    slug: &str,
    request: UpdateProductRequest,
) -> Result<Product, RequestError> {
    let mut tx = pool.begin().await?;
    let current = sqlx::query_as::<Sqlite, (i64, f64)>(
        "SELECT id, price FROM products WHERE slug = ?",
    )
    .bind(slug)
    .fetch_optional(&mut tx)
    .await?;
    let (product_id, old_price) = match current {
        Some(row) => row,
        None => return Err(RequestError::NotFound("Product not found")),
    };

    let pros = request.pros.as_deref().map(encode_string_list).transpose()?;
    let cons = request.cons.as_deref().map(encode_string_list).transpose()?;
    let tags = request.tags.as_deref().map(encode_string_list).transpose()?;

    sqlx::query(
        r#"UPDATE products
              SET title = COALESCE(?, title),
                  image = COALESCE(?, image),
                  short_description = COALESCE(?, short_description),
                  pros = COALESCE(?, pros),
                  cons = COALESCE(?, cons),
                  tags = COALESCE(?, tags),
                  amazon_link = COALESCE(?, amazon_link),
                  flipkart_link = COALESCE(?, flipkart_link),
                  badge = COALESCE(?, badge),
                  category_id = COALESCE(?, category_id),
                  price = COALESCE(?, price),
                  mrp = COALESCE(?, mrp),
                  discount_percent = COALESCE(?, discount_percent),
                  updated_at = CURRENT_TIMESTAMP
            WHERE id = ?"#,
    )
    .bind(&request.title)
    .bind(&request.image)
    .bind(&request.short_description)
    .bind(pros)
    .bind(cons)
    .bind(tags)
    .bind(&request.amazon_link)
    .bind(&request.flipkart_link)
    .bind(&request.badge)
    .bind(request.category_id)
    .bind(request.price)
    .bind(request.mrp)
    .bind(request.discount_percent)
    .bind(product_id)
    .execute(&mut tx)
    .await?;

    if let Some(new_price) = request.price {
        if new_price != old_price {
            sqlx::query(
                "INSERT INTO price_history (product_id, old_price, new_price) VALUES (?, ?, ?)",
            )
            .bind(product_id)
            .bind(old_price)
            .bind(new_price)
            .execute(&mut tx)
            .await?;
        }
    }
    tx.commit().await?;

    get_product_by_slug_in_db(pool, slug).await
}

pub async fn get_price_history_in_db(
    pool: &SqlitePool,
    product_id: i64,
) -> Result<Vec<PriceChange>, RequestError> {
    let result = sqlx::query_as::<Sqlite, PriceChange>(
        r#"SELECT old_price, new_price, changed_at
             FROM price_history
            WHERE product_id = ?
            ORDER BY changed_at DESC, id DESC
            LIMIT ?"#,
    )
    .bind(product_id)
    .bind(PRICE_HISTORY_LIMIT)
    .fetch_all(pool)
    .await?;
    Ok(result)
}

pub async fn get_tracked_products_in_db(
    pool: &SqlitePool,
) -> Result<Vec<(Product, Vec<PriceChange>)>, RequestError> {
    let query = format!("{PRODUCT_QUERY} ORDER BY id ASC LIMIT ?");
    let rows = sqlx::query_as::<Sqlite, ProductRow>(&query)
        .bind(TRACKED_PRODUCT_LIMIT)
        .fetch_all(pool)
        .await?;

    let mut tracked = Vec::with_capacity(rows.len());
    for row in rows {
        let product = Product::try_from(row)?;
        let history = get_price_history_in_db(pool, product.id).await?;
        tracked.push((product, history));
    }
    Ok(tracked)
}

/// Lowest price ever seen for a product: the current price or any
/// price the history has recorded, whichever is smaller.
pub fn lowest_recorded_price(current: f64, history: &[PriceChange]) -> f64 {
    history
        .iter()
        .map(|change| change.new_price)
        .fold(current, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn change(new_price: f64) -> PriceChange {
        PriceChange {
            old_price: 0.0,
            new_price,
            changed_at: NaiveDateTime::from_timestamp_opt(0, 0).unwrap(),
        }
    }

    #[test]
    fn lowest_price_includes_current() {
        let history = vec![change(1299.0), change(1499.0)];
        assert_eq!(lowest_recorded_price(999.0, &history), 999.0);
        assert_eq!(lowest_recorded_price(1399.0, &history), 1299.0);
    }

    #[test]
    fn lowest_price_with_no_history_is_current() {
        assert_eq!(lowest_recorded_price(799.0, &[]), 799.0);
    }
}
