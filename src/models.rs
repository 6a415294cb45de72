use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::RequestError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub role: String,
    pub created_at: NaiveDateTime,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Draft,
    Published,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Published => "published",
        }
    }

    pub fn parse(value: &str) -> Result<Self, RequestError> {
        match value {
            "draft" => Ok(ArticleStatus::Draft),
            "published" => Ok(ArticleStatus::Published),
            _ => Err(RequestError::InvalidData("unknown article status")),
        }
    }
}

/// Raw article row as the store returns it. `tag_list` is a
/// group_concat string and `status` is unvalidated text; both are
/// parsed into [`Article`] before anything else touches them.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArticleRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub author: Option<String>,
    pub status: String,
    pub views: i64,
    pub price: Option<f64>,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub tag_list: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub author: Option<String>,
    pub status: ArticleStatus,
    pub views: i64,
    pub price: Option<f64>,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub tags: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<ArticleRow> for Article {
    type Error = RequestError;

    fn try_from(row: ArticleRow) -> Result<Self, Self::Error> {
        let status = ArticleStatus::parse(&row.status)?;
        let tags = row
            .tag_list
            .map(|list| list.split(',').map(|s| s.to_string()).collect())
            .unwrap_or_default();
        Ok(Article {
            id: row.id,
            title: row.title,
            slug: row.slug,
            content: row.content,
            excerpt: row.excerpt,
            featured_image: row.featured_image,
            author: row.author,
            status,
            views: row.views,
            price: row.price,
            category_id: row.category_id,
            category_name: row.category_name,
            tags,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Raw product row. `pros`, `cons` and `tags` hold JSON array text.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub image: Option<String>,
    pub short_description: Option<String>,
    pub pros: Option<String>,
    pub cons: Option<String>,
    pub tags: Option<String>,
    pub amazon_link: Option<String>,
    pub flipkart_link: Option<String>,
    pub badge: Option<String>,
    pub category_id: Option<i64>,
    pub price: f64,
    pub mrp: Option<f64>,
    pub discount_percent: Option<f64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub image: Option<String>,
    pub short_description: Option<String>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub tags: Vec<String>,
    pub amazon_link: Option<String>,
    pub flipkart_link: Option<String>,
    pub badge: Option<String>,
    pub category_id: Option<i64>,
    pub price: f64,
    pub mrp: Option<f64>,
    pub discount_percent: Option<f64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn parse_string_list(
    raw: Option<String>,
    field: &'static str,
) -> Result<Vec<String>, RequestError> {
    match raw {
        None => Ok(Vec::new()),
        Some(text) if text.trim().is_empty() => Ok(Vec::new()),
        Some(text) => serde_json::from_str(&text).map_err(|e| {
            tracing::error!("failed to parse {} column: {}", field, e);
            RequestError::InvalidData("malformed list column")
        }),
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = RequestError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product {
            id: row.id,
            title: row.title,
            slug: row.slug,
            image: row.image,
            short_description: row.short_description,
            pros: parse_string_list(row.pros, "pros")?,
            cons: parse_string_list(row.cons, "cons")?,
            tags: parse_string_list(row.tags, "tags")?,
            amazon_link: row.amazon_link,
            flipkart_link: row.flipkart_link,
            badge: row.badge,
            category_id: row.category_id,
            price: row.price,
            mrp: row.mrp,
            discount_percent: row.discount_percent,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A product attached to an article at a display position.
#[derive(Debug, Clone)]
pub struct RankedProduct {
    pub rank: i64,
    pub product: Product,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PriceChange {
    pub old_price: f64,
    pub new_price: f64,
    pub changed_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub article_id: i64,
    pub user_id: i64,
    pub username: String,
    pub body: String,
    pub parent_comment_id: Option<i64>,
    pub created_at: NaiveDateTime,
}

/// One bar of the per-category sales chart on an article page.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TopSale {
    pub model_name: String,
    pub sales_count: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RelatedArticle {
    pub id: i64,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WishlistRow {
    pub id: i64,
    pub product_id: i64,
    pub added_at: NaiveDateTime,
    pub title: String,
    pub image: Option<String>,
    pub price: f64,
    pub mrp: Option<f64>,
    pub amazon_link: Option<String>,
    pub flipkart_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_row(pros: Option<&str>) -> ProductRow {
        ProductRow {
            id: 1,
            title: "Elica 90cm Auto Clean".to_string(),
            slug: "elica-90cm-auto-clean".to_string(),
            image: None,
            short_description: None,
            pros: pros.map(|s| s.to_string()),
            cons: None,
            tags: None,
            amazon_link: None,
            flipkart_link: None,
            badge: None,
            category_id: None,
            price: 12999.0,
            mrp: None,
            discount_percent: None,
            created_at: chrono::NaiveDateTime::from_timestamp_opt(0, 0).unwrap(),
            updated_at: chrono::NaiveDateTime::from_timestamp_opt(0, 0).unwrap(),
        }
    }

    #[test]
    fn parses_json_list_columns() {
        let product = Product::try_from(product_row(Some(r#"["Quiet","Easy to clean"]"#))).unwrap();
        assert_eq!(product.pros, vec!["Quiet", "Easy to clean"]);
        assert!(product.cons.is_empty());
    }

    #[test]
    fn malformed_list_column_fails_closed() {
        let result = Product::try_from(product_row(Some("not json")));
        assert!(matches!(result, Err(RequestError::InvalidData(_))));
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(ArticleStatus::parse("archived").is_err());
        assert_eq!(
            ArticleStatus::parse("published").unwrap(),
            ArticleStatus::Published
        );
    }
}
