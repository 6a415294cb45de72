use serde::{Deserialize, Serialize};

use crate::models::{
    Article, Category, Comment, PriceChange, Product, RankedProduct, RelatedArticle, TopSale, User,
    WishlistRow,
};

#[derive(Deserialize, Serialize, Debug)]
pub struct UserResponse {
    pub email: String,
    pub token: String,
    pub username: String,
    pub bio: String,
    pub image: Option<String>,
}

impl UserResponse {
    pub fn new(
        User {
            username,
            email,
            bio,
            image,
            ..
        }: User,
        token: String,
    ) -> Self {
        UserResponse {
            username,
            email,
            bio: bio.unwrap_or_default(),
            image,
            token,
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl From<Category> for CategoryResponse {
    fn from(Category { id, name, slug }: Category) -> Self {
        CategoryResponse { id, name, slug }
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ArticleSummaryResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    #[serde(rename = "featuredImage")]
    pub featured_image: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
    pub views: i64,
    pub price: Option<f64>,
    pub tags: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl From<&Article> for ArticleSummaryResponse {
    fn from(article: &Article) -> Self {
        ArticleSummaryResponse {
            id: article.id,
            title: article.title.clone(),
            slug: article.slug.clone(),
            excerpt: article.excerpt.clone(),
            featured_image: article.featured_image.clone(),
            category: article.category_name.clone(),
            author: article.author.clone(),
            views: article.views,
            price: article.price,
            tags: article.tags.clone(),
            created_at: article.created_at.to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ProductResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub image: Option<String>,
    #[serde(rename = "shortDescription")]
    pub short_description: Option<String>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub tags: Vec<String>,
    #[serde(rename = "amazonLink")]
    pub amazon_link: Option<String>,
    #[serde(rename = "flipkartLink")]
    pub flipkart_link: Option<String>,
    pub badge: Option<String>,
    pub price: f64,
    pub mrp: Option<f64>,
    #[serde(rename = "discountPercent")]
    pub discount_percent: Option<f64>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        ProductResponse {
            id: product.id,
            title: product.title,
            slug: product.slug,
            image: product.image,
            short_description: product.short_description,
            pros: product.pros,
            cons: product.cons,
            tags: product.tags,
            amazon_link: product.amazon_link,
            flipkart_link: product.flipkart_link,
            badge: product.badge,
            price: product.price,
            mrp: product.mrp,
            discount_percent: product.discount_percent,
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct RankedProductResponse {
    pub rank: i64,
    #[serde(flatten)]
    pub product: ProductResponse,
}

impl From<RankedProduct> for RankedProductResponse {
    fn from(RankedProduct { rank, product }: RankedProduct) -> Self {
        RankedProductResponse {
            rank,
            product: product.into(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct RelatedArticleResponse {
    pub title: String,
    pub url: String,
}

impl From<RelatedArticle> for RelatedArticleResponse {
    fn from(RelatedArticle { title, url, .. }: RelatedArticle) -> Self {
        RelatedArticleResponse { title, url }
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct TopSaleResponse {
    #[serde(rename = "modelName")]
    pub model_name: String,
    #[serde(rename = "salesCount")]
    pub sales_count: i64,
}

impl From<TopSale> for TopSaleResponse {
    fn from(
        TopSale {
            model_name,
            sales_count,
        }: TopSale,
    ) -> Self {
        TopSaleResponse {
            model_name,
            sales_count,
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ArticleDetailResponse {
    #[serde(flatten)]
    pub summary: ArticleSummaryResponse,
    pub content: String,
    pub products: Vec<RankedProductResponse>,
    #[serde(rename = "smartPick")]
    pub smart_pick: Option<String>,
    #[serde(rename = "relatedArticles")]
    pub related_articles: Vec<RelatedArticleResponse>,
    #[serde(rename = "topSales")]
    pub top_sales: Vec<TopSaleResponse>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CommentResponse {
    pub id: i64,
    pub username: String,
    pub body: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    pub replies: Vec<CommentResponse>,
}

impl CommentResponse {
    pub fn new(comment: &Comment, replies: Vec<CommentResponse>) -> Self {
        CommentResponse {
            id: comment.id,
            username: comment.username.clone(),
            body: comment.body.clone(),
            created_at: comment.created_at.to_string(),
            replies,
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct WishlistItemResponse {
    pub id: i64,
    #[serde(rename = "productId")]
    pub product_id: i64,
    pub title: String,
    pub image: Option<String>,
    pub price: f64,
    pub mrp: Option<f64>,
    #[serde(rename = "amazonLink")]
    pub amazon_link: Option<String>,
    #[serde(rename = "flipkartLink")]
    pub flipkart_link: Option<String>,
    #[serde(rename = "addedAt")]
    pub added_at: String,
}

impl From<WishlistRow> for WishlistItemResponse {
    fn from(row: WishlistRow) -> Self {
        WishlistItemResponse {
            id: row.id,
            product_id: row.product_id,
            title: row.title,
            image: row.image,
            price: row.price,
            mrp: row.mrp,
            amazon_link: row.amazon_link,
            flipkart_link: row.flipkart_link,
            added_at: row.added_at.to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct PriceChangeResponse {
    #[serde(rename = "oldPrice")]
    pub old_price: f64,
    #[serde(rename = "newPrice")]
    pub new_price: f64,
    #[serde(rename = "changedAt")]
    pub changed_at: String,
}

impl From<&PriceChange> for PriceChangeResponse {
    fn from(change: &PriceChange) -> Self {
        PriceChangeResponse {
            old_price: change.old_price,
            new_price: change.new_price,
            changed_at: change.changed_at.to_string(),
        }
    }
}

/// A product on the price-tracker page: current price, the lowest
/// price ever recorded (current price included) and the recent
/// history, newest change first.
#[derive(Deserialize, Serialize, Debug)]
pub struct TrackedProductResponse {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    #[serde(rename = "currentPrice")]
    pub current_price: f64,
    #[serde(rename = "lowestPrice")]
    pub lowest_price: f64,
    #[serde(rename = "lastChange")]
    pub last_change: Option<PriceChangeResponse>,
    pub history: Vec<PriceChangeResponse>,
}
