use serde::{Deserialize, Serialize};

use super::response::{
    ArticleSummaryResponse, CategoryResponse, CommentResponse, ProductResponse,
    RankedProductResponse, RelatedArticleResponse, TrackedProductResponse, WishlistItemResponse,
};
use crate::catalog::FilterGroup;

#[derive(Debug, Deserialize, Serialize)]
pub struct UserWrapper<T> {
    pub user: T,
}

impl<T> UserWrapper<T> {
    pub fn wrap_with_user_data(request: T) -> UserWrapper<T> {
        UserWrapper { user: request }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ArticleWrapper<T> {
    pub article: T,
}

/// A page of search results plus the numbers the pager needs.
#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleArticlesWrapper {
    pub articles: Vec<ArticleSummaryResponse>,
    #[serde(rename = "articlesCount")]
    pub articles_count: usize,
    pub page: usize,
    #[serde(rename = "totalPages")]
    pub total_pages: usize,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleCategoriesWrapper {
    pub categories: Vec<CategoryResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SuggestionsWrapper {
    pub suggestions: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct FilterGuideWrapper {
    pub category: String,
    pub groups: Vec<FilterGroup>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RecommendationWrapper {
    pub recommendation: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CommentWrapper<T> {
    pub comment: T,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleCommentsWrapper {
    pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ProductWrapper<T> {
    pub product: T,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleProductsWrapper {
    pub products: Vec<ProductResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RankedProductsWrapper {
    pub products: Vec<RankedProductResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RelatedArticlesWrapper {
    #[serde(rename = "relatedArticles")]
    pub related_articles: Vec<RelatedArticleResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct WishlistWrapper {
    pub wishlist: Vec<WishlistItemResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TrackedProductsWrapper {
    pub products: Vec<TrackedProductResponse>,
}
