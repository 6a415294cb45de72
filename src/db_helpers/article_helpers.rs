use sqlx::{Sqlite, SqlitePool};

use crate::{
    data_formats::{CreateArticleRequest, RelatedArticleEntry, UpdateArticleRequest},
    errors::RequestError,
    models::{Article, ArticleRow, ArticleStatus, Product, ProductRow, RankedProduct, RelatedArticle},
    slugify,
};

use super::{get_article_id_by_slug_in_db, placeholders};

// ----------------- Article Queries -----------------

const ARTICLE_QUERY: &str = r#"
    SELECT articles.id,
           articles.title,
           articles.slug,
           articles.content,
           articles.excerpt,
           articles.featured_image,
           articles.author,
           articles.status,
           articles.views,
           articles.price,
           articles.category_id,
           categories.name AS category_name,
           (SELECT group_concat(tags.name)
              FROM tags
              JOIN article_tags ON article_tags.tag_id = tags.id
             WHERE article_tags.article_id = articles.id) AS tag_list,
           articles.created_at,
           articles.updated_at
      FROM articles
      LEFT JOIN categories ON categories.id = articles.category_id
"#;

fn collect_articles(rows: Vec<ArticleRow>) -> Result<Vec<Article>, RequestError> {
    rows.into_iter().map(Article::try_from).collect()
}

/// Published articles for the search pipeline, already narrowed by
/// category and tag overlap. Price, age and sort are applied in
/// memory by the caller; rows come back in insertion order so the
/// sort stage starts from a stable base.
pub async fn search_published_articles_in_db(
    pool: &SqlitePool,
    category_slug: Option<&str>,
    tags: &[String],
) -> Result<Vec<Article>, RequestError> {
    let category_id = match category_slug {
        Some(slug) => {
            let id = sqlx::query_scalar::<Sqlite, i64>(
                "SELECT id FROM categories WHERE LOWER(slug) = LOWER(?)",
            )
            .bind(slug)
            .fetch_optional(pool)
            .await?;
            match id {
                Some(id) => Some(id),
                // Unknown category matches nothing rather than everything
                None => return Ok(Vec::new()),
            }
        }
        None => None,
    };

    let mut query = format!("{ARTICLE_QUERY} WHERE articles.status = 'published'");
    if category_id.is_some() {
        query.push_str(" AND articles.category_id = ?");
    }
    if !tags.is_empty() {
        query.push_str(&format!(
            " AND EXISTS (SELECT 1 FROM article_tags
                            JOIN tags ON tags.id = article_tags.tag_id
                           WHERE article_tags.article_id = articles.id
                             AND tags.name IN ({}))",
            placeholders(tags.len())
        ));
    }
    query.push_str(" ORDER BY articles.id ASC");

    let mut result = sqlx::query_as::<Sqlite, ArticleRow>(&query);
    if let Some(id) = category_id {
        result = result.bind(id);
    }
    for tag in tags {
        result = result.bind(tag);
    }
    collect_articles(result.fetch_all(pool).await?)
}

pub async fn get_published_article_by_slug_in_db(
    pool: &SqlitePool,
    slug: &str,
) -> Result<Article, RequestError> {
    let query = format!("{ARTICLE_QUERY} WHERE articles.slug = ? AND articles.status = 'published'");
    let row = sqlx::query_as::<Sqlite, ArticleRow>(&query)
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    match row {
        Some(row) => Article::try_from(row),
        None => Err(RequestError::NotFound("Article not found")),
    }
}

/// Admin view: drafts included.
pub async fn get_article_by_slug_in_db(
    pool: &SqlitePool,
    slug: &str,
) -> Result<Article, RequestError> {
    let query = format!("{ARTICLE_QUERY} WHERE articles.slug = ?");
    let row = sqlx::query_as::<Sqlite, ArticleRow>(&query)
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    match row {
        Some(row) => Article::try_from(row),
        None => Err(RequestError::NotFound("Article not found")),
    }
}

pub async fn list_articles_for_admin_in_db(
    pool: &SqlitePool,
) -> Result<Vec<Article>, RequestError> {
    let query = format!("{ARTICLE_QUERY} ORDER BY articles.updated_at DESC");
    let rows = sqlx::query_as::<Sqlite, ArticleRow>(&query)
        .fetch_all(pool)
        .await?;
    collect_articles(rows)
}

/// Single in-place UPDATE, so two concurrent reads never lose a count.
pub async fn increment_article_views_in_db(
    pool: &SqlitePool,
    slug: &str,
) -> Result<(), RequestError> {
    sqlx::query("UPDATE articles SET views = views + 1 WHERE slug = ? AND status = 'published'")
        .bind(slug)
        .execute(pool)
        .await?;
    Ok(())
}

// ----------------- Article Detail Pieces -----------------

#[derive(sqlx::FromRow)]
struct RankedProductRow {
    rank: i64,
    id: i64,
    title: String,
    slug: String,
    image: Option<String>,
    short_description: Option<String>,
    pros: Option<String>,
    cons: Option<String>,
    tags: Option<String>,
    amazon_link: Option<String>,
    flipkart_link: Option<String>,
    badge: Option<String>,
    category_id: Option<i64>,
    price: f64,
    mrp: Option<f64>,
    discount_percent: Option<f64>,
    created_at: chrono::NaiveDateTime,
    updated_at: chrono::NaiveDateTime,
}

impl TryFrom<RankedProductRow> for RankedProduct {
    type Error = RequestError;

    fn try_from(row: RankedProductRow) -> Result<Self, Self::Error> {
        let rank = row.rank;
        let product = Product::try_from(ProductRow {
            id: row.id,
            title: row.title,
            slug: row.slug,
            image: row.image,
            short_description: row.short_description,
            pros: row.pros,
            cons: row.cons,
            tags: row.tags,
            amazon_link: row.amazon_link,
            flipkart_link: row.flipkart_link,
            badge: row.badge,
            category_id: row.category_id,
            price: row.price,
            mrp: row.mrp,
            discount_percent: row.discount_percent,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })?;
        Ok(RankedProduct { rank, product })
    }
}

const RANKED_PRODUCT_QUERY: &str = r#"
    SELECT article_products.rank,
           products.id,
           products.title,
           products.slug,
           products.image,
           products.short_description,
           products.pros,
           products.cons,
           products.tags,
           products.amazon_link,
           products.flipkart_link,
           products.badge,
           products.category_id,
           products.price,
           products.mrp,
           products.discount_percent,
           products.created_at,
           products.updated_at
      FROM article_products
      JOIN products ON products.id = article_products.product_id
     WHERE article_products.article_id = ?
     ORDER BY article_products.rank ASC
"#;

pub async fn get_ranked_products_in_db(
    pool: &SqlitePool,
    article_id: i64,
) -> Result<Vec<RankedProduct>, RequestError> {
    let rows = sqlx::query_as::<Sqlite, RankedProductRow>(RANKED_PRODUCT_QUERY)
        .bind(article_id)
        .fetch_all(pool)
        .await?;
    rows.into_iter().map(RankedProduct::try_from).collect()
}

pub async fn get_smart_pick_in_db(
    pool: &SqlitePool,
    article_id: i64,
) -> Result<Option<String>, RequestError> {
    let result = sqlx::query_scalar::<Sqlite, String>(
        "SELECT recommendation FROM smart_picks WHERE article_id = ?",
    )
    .bind(article_id)
    .fetch_optional(pool)
    .await?;
    Ok(result)
}

pub async fn get_related_articles_in_db(
    pool: &SqlitePool,
    article_id: i64,
) -> Result<Vec<RelatedArticle>, RequestError> {
    let result = sqlx::query_as::<Sqlite, RelatedArticle>(
        "SELECT id, title, url FROM related_articles WHERE article_id = ? ORDER BY id ASC",
    )
    .bind(article_id)
    .fetch_all(pool)
    .await?;
    Ok(result)
}

// ----------------- Article Mutations -----------------

pub async fn create_article_in_db(
    pool: &SqlitePool,
    request: CreateArticleRequest,
) -> Result<Article, RequestError> {
    let slug = request
        .slug
        .clone()
        .unwrap_or_else(|| slugify(&request.title));
    let status = request.status.unwrap_or(ArticleStatus::Draft);

    let mut tx = pool.begin().await?;
    let insert = sqlx::query(
        r#"INSERT INTO articles
               (title, slug, content, excerpt, featured_image, author, category_id, status, price)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&request.title)
    .bind(&slug)
    .bind(&request.content)
    .bind(&request.excerpt)
    .bind(&request.featured_image)
    .bind(&request.author)
    .bind(request.category_id)
    .bind(status.as_str())
    .bind(request.price)
    .execute(&mut tx)
    .await;

    let article_id = match insert {
        Ok(result) => result.last_insert_rowid(),
        Err(error) => {
            let error = RequestError::from(error);
            if error.is_unique_violation() {
                return Err(RequestError::Validation("Slug already in use"));
            }
            return Err(error);
        }
    };

    set_article_tags(&mut tx, article_id, &request.tags).await?;
    tx.commit().await?;

    get_article_by_slug_in_db(pool, &slug).await
}

pub async fn update_article_in_db(
    pool: &SqlitePool,
    slug: &str,
    request: UpdateArticleRequest,
) -> Result<Article, RequestError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query(
        r#"UPDATE articles
              SET title = COALESCE(?, title),
                  slug = COALESCE(?, slug),
                  content = COALESCE(?, content),
                  excerpt = COALESCE(?, excerpt),
                  featured_image = COALESCE(?, featured_image),
                  author = COALESCE(?, author),
                  category_id = COALESCE(?, category_id),
                  status = COALESCE(?, status),
                  price = COALESCE(?, price),
                  updated_at = CURRENT_TIMESTAMP
            WHERE slug = ?"#,
    )
    .bind(&request.title)
    .bind(&request.slug)
    .bind(&request.content)
    .bind(&request.excerpt)
    .bind(&request.featured_image)
    .bind(&request.author)
    .bind(request.category_id)
    .bind(request.status.map(|status| status.as_str()))
    .bind(request.price)
    .bind(slug)
    .execute(&mut tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Article not found"));
    }

    let effective_slug = request.slug.as_deref().unwrap_or(slug);
    if let Some(tags) = &request.tags {
        let article_id =
            sqlx::query_scalar::<Sqlite, i64>("SELECT id FROM articles WHERE slug = ?")
                .bind(effective_slug)
                .fetch_one(&mut tx)
                .await?;
        sqlx::query("DELETE FROM article_tags WHERE article_id = ?")
            .bind(article_id)
            .execute(&mut tx)
            .await?;
        set_article_tags(&mut tx, article_id, tags).await?;
    }
    tx.commit().await?;

    get_article_by_slug_in_db(pool, effective_slug).await
}

async fn set_article_tags(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    article_id: i64,
    tags: &[String],
) -> Result<(), RequestError> {
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        let tag_id = sqlx::query_scalar::<Sqlite, i64>(
            r#"INSERT INTO tags (name) VALUES (?)
               ON CONFLICT (name) DO UPDATE SET name = excluded.name
               RETURNING id"#,
        )
        .bind(tag)
        .fetch_one(&mut *tx)
        .await?;
        sqlx::query("INSERT OR IGNORE INTO article_tags (article_id, tag_id) VALUES (?, ?)")
            .bind(article_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;
    }
    Ok(())
}

pub async fn delete_article_in_db(pool: &SqlitePool, slug: &str) -> Result<(), RequestError> {
    let result = sqlx::query("DELETE FROM articles WHERE slug = ?")
        .bind(slug)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Article not found"));
    }
    Ok(())
}

/// Swaps an article's product list in one transaction. Ranks are
/// re-assigned 1..N from the order of `product_ids`, so the stored
/// set is always contiguous and a failed save leaves the old list
/// untouched.
pub async fn replace_article_products_in_db(
    pool: &SqlitePool,
    slug: &str,
    product_ids: &[i64],
) -> Result<Vec<RankedProduct>, RequestError> {
    let article_id = get_article_id_by_slug_in_db(pool, slug).await?;

    if !product_ids.is_empty() {
        let query = format!(
            "SELECT COUNT(*) FROM products WHERE id IN ({})",
            placeholders(product_ids.len())
        );
        let mut count = sqlx::query_scalar::<Sqlite, i64>(&query);
        for id in product_ids {
            count = count.bind(id);
        }
        if count.fetch_one(pool).await? != product_ids.len() as i64 {
            return Err(RequestError::Validation("Unknown product in list"));
        }
    }

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM article_products WHERE article_id = ?")
        .bind(article_id)
        .execute(&mut tx)
        .await?;
    for (position, product_id) in product_ids.iter().enumerate() {
        sqlx::query("INSERT INTO article_products (article_id, product_id, rank) VALUES (?, ?, ?)")
            .bind(article_id)
            .bind(product_id)
            .bind(position as i64 + 1)
            .execute(&mut tx)
            .await?;
    }
    tx.commit().await?;

    get_ranked_products_in_db(pool, article_id).await
}

pub async fn upsert_smart_pick_in_db(
    pool: &SqlitePool,
    slug: &str,
    recommendation: &str,
) -> Result<(), RequestError> {
    let article_id = get_article_id_by_slug_in_db(pool, slug).await?;
    sqlx::query(
        r#"INSERT INTO smart_picks (article_id, recommendation) VALUES (?, ?)
           ON CONFLICT (article_id) DO UPDATE SET recommendation = excluded.recommendation"#,
    )
    .bind(article_id)
    .bind(recommendation)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn replace_related_articles_in_db(
    pool: &SqlitePool,
    slug: &str,
    related: &[RelatedArticleEntry],
) -> Result<Vec<RelatedArticle>, RequestError> {
    let article_id = get_article_id_by_slug_in_db(pool, slug).await?;
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM related_articles WHERE article_id = ?")
        .bind(article_id)
        .execute(&mut tx)
        .await?;
    for entry in related {
        sqlx::query("INSERT INTO related_articles (article_id, title, url) VALUES (?, ?, ?)")
            .bind(article_id)
            .bind(&entry.title)
            .bind(&entry.url)
            .execute(&mut tx)
            .await?;
    }
    tx.commit().await?;

    get_related_articles_in_db(pool, article_id).await
}
