use serde::{Deserialize, Serialize};

use crate::errors::RequestError;
use crate::models::ArticleStatus;

// ----------------- User Requests -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

// ----------------- Article Requests -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct CreateArticleRequest {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub status: Option<ArticleStatus>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateArticleRequest {
    /// Required-field checks happen here, before the store is touched.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.title.trim().is_empty() {
            return Err(RequestError::Validation("Title must not be empty"));
        }
        if self.content.trim().is_empty() {
            return Err(RequestError::Validation("Content must not be empty"));
        }
        if let Some(slug) = &self.slug {
            if slug.trim().is_empty() {
                return Err(RequestError::Validation("Slug must not be empty"));
            }
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub author: Option<String>,
    pub category_id: Option<i64>,
    pub status: Option<ArticleStatus>,
    pub price: Option<f64>,
    pub tags: Option<Vec<String>>,
}

/// Replacement product list for an article's "Top N". Order is the
/// display order; ranks are re-assigned 1..N on save.
#[derive(Deserialize, Serialize, Debug)]
pub struct ReplaceProductsRequest {
    pub product_ids: Vec<i64>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct SmartPickSaveRequest {
    pub recommendation: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct RelatedArticleEntry {
    pub title: String,
    pub url: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ReplaceRelatedRequest {
    pub related: Vec<RelatedArticleEntry>,
}

// ----------------- Product Requests -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct CreateProductRequest {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub amazon_link: Option<String>,
    #[serde(default)]
    pub flipkart_link: Option<String>,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    pub price: f64,
    #[serde(default)]
    pub mrp: Option<f64>,
    #[serde(default)]
    pub discount_percent: Option<f64>,
}

impl CreateProductRequest {
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.title.trim().is_empty() {
            return Err(RequestError::Validation("Title must not be empty"));
        }
        if self.price < 0.0 {
            return Err(RequestError::Validation("Price must not be negative"));
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub image: Option<String>,
    pub short_description: Option<String>,
    pub pros: Option<Vec<String>>,
    pub cons: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub amazon_link: Option<String>,
    pub flipkart_link: Option<String>,
    pub badge: Option<String>,
    pub category_id: Option<i64>,
    pub price: Option<f64>,
    pub mrp: Option<f64>,
    pub discount_percent: Option<f64>,
}

// ----------------- Comment / Wishlist Requests -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct CommentRequest {
    pub body: String,
    #[serde(default)]
    pub parent_comment_id: Option<i64>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct WishlistAddRequest {
    pub product_id: i64,
}
