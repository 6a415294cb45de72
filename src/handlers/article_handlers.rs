use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};
use sqlx::SqlitePool;

use crate::{
    authentication::AdminUser,
    catalog::{apply_filters, paginate, SearchFilters},
    data_formats::{
        ArticleDetailResponse, ArticleSummaryResponse, ArticleWrapper, CategoryResponse,
        CreateArticleRequest, MultipleArticlesWrapper, MultipleCategoriesWrapper,
        RankedProductsWrapper, RecommendationWrapper, RelatedArticlesWrapper,
        ReplaceProductsRequest, ReplaceRelatedRequest, SearchQueryParams, SmartPickSaveRequest,
        UpdateArticleRequest,
    },
    db_helpers::{
        create_article_in_db, delete_article_in_db, get_article_by_slug_in_db,
        get_published_article_by_slug_in_db, get_ranked_products_in_db, get_related_articles_in_db,
        get_smart_pick_in_db, get_top_sales_for_category_in_db, increment_article_views_in_db,
        list_articles_for_admin_in_db, list_categories_in_db, replace_article_products_in_db,
        replace_related_articles_in_db,
        search_published_articles_in_db, update_article_in_db, upsert_smart_pick_in_db,
    },
    errors::RequestError,
    models::Article,
};

use super::JsonResult;

// ----------------- Article Handlers -----------------

/// `GET /api/articles`. The store narrows by category and tag overlap,
/// then price ceiling, age window, sort and pagination run in memory
/// in that order.
pub async fn list_articles(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Query(params): Query<SearchQueryParams>,
) -> JsonResult<MultipleArticlesWrapper> {
    let tags = params.tag_list();
    let articles =
        search_published_articles_in_db(&pool, params.category.as_deref(), &tags).await?;

    let filters = SearchFilters {
        price_ceiling: params.max_price,
        age_window_months: params.age_months,
        sort: params.sort_key()?,
    };
    let filtered = apply_filters(articles, &filters, chrono::Utc::now().naive_utc());
    let (page_items, total_pages) = paginate(&filtered, params.page);

    Ok(Json(MultipleArticlesWrapper {
        articles: page_items.iter().map(ArticleSummaryResponse::from).collect(),
        articles_count: filtered.len(),
        page: params.page.max(1),
        total_pages,
    }))
}

async fn build_article_detail(
    pool: &SqlitePool,
    article: Article,
) -> Result<ArticleDetailResponse, RequestError> {
    let products = get_ranked_products_in_db(pool, article.id).await?;
    let smart_pick = get_smart_pick_in_db(pool, article.id).await?;
    let related = get_related_articles_in_db(pool, article.id).await?;
    let top_sales = match article.category_id {
        Some(category_id) => get_top_sales_for_category_in_db(pool, category_id).await?,
        None => Vec::new(),
    };

    Ok(ArticleDetailResponse {
        summary: ArticleSummaryResponse::from(&article),
        content: article.content,
        products: products.into_iter().map(Into::into).collect(),
        smart_pick,
        related_articles: related.into_iter().map(Into::into).collect(),
        top_sales: top_sales.into_iter().map(Into::into).collect(),
    })
}

pub async fn get_article(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
) -> JsonResult<ArticleWrapper<ArticleDetailResponse>> {
    increment_article_views_in_db(&pool, &slug).await?;
    let article = get_published_article_by_slug_in_db(&pool, &slug).await?;
    let detail = build_article_detail(&pool, article).await?;
    Ok(Json(ArticleWrapper { article: detail }))
}

pub async fn list_categories(
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> JsonResult<MultipleCategoriesWrapper> {
    let categories = list_categories_in_db(&pool).await?;
    Ok(Json(MultipleCategoriesWrapper {
        categories: categories.into_iter().map(CategoryResponse::from).collect(),
    }))
}

// ----------------- Admin Article Handlers -----------------

pub async fn admin_list_articles(
    _admin: AdminUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> JsonResult<MultipleArticlesWrapper> {
    let articles = list_articles_for_admin_in_db(&pool).await?;
    Ok(Json(MultipleArticlesWrapper {
        articles_count: articles.len(),
        articles: articles.iter().map(ArticleSummaryResponse::from).collect(),
        page: 1,
        total_pages: 1,
    }))
}

pub async fn create_article(
    _admin: AdminUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(ArticleWrapper { article: request }): Json<ArticleWrapper<CreateArticleRequest>>,
) -> Result<(StatusCode, Json<ArticleWrapper<ArticleDetailResponse>>), RequestError> {
    request.validate()?;
    let article = create_article_in_db(&pool, request).await?;
    let detail = build_article_detail(&pool, article).await?;
    Ok((StatusCode::CREATED, Json(ArticleWrapper { article: detail })))
}

pub async fn update_article(
    _admin: AdminUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
    Json(ArticleWrapper { article: request }): Json<ArticleWrapper<UpdateArticleRequest>>,
) -> JsonResult<ArticleWrapper<ArticleDetailResponse>> {
    let article = update_article_in_db(&pool, &slug, request).await?;
    let detail = build_article_detail(&pool, article).await?;
    Ok(Json(ArticleWrapper { article: detail }))
}

pub async fn get_article_for_admin(
    _admin: AdminUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
) -> JsonResult<ArticleWrapper<ArticleDetailResponse>> {
    let article = get_article_by_slug_in_db(&pool, &slug).await?;
    let detail = build_article_detail(&pool, article).await?;
    Ok(Json(ArticleWrapper { article: detail }))
}

pub async fn delete_article(
    _admin: AdminUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
) -> Result<StatusCode, RequestError> {
    delete_article_in_db(&pool, &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn replace_article_products(
    _admin: AdminUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
    Json(request): Json<ReplaceProductsRequest>,
) -> JsonResult<RankedProductsWrapper> {
    let products = replace_article_products_in_db(&pool, &slug, &request.product_ids).await?;
    Ok(Json(RankedProductsWrapper {
        products: products.into_iter().map(Into::into).collect(),
    }))
}

pub async fn save_smart_pick(
    _admin: AdminUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
    Json(request): Json<SmartPickSaveRequest>,
) -> JsonResult<RecommendationWrapper> {
    if request.recommendation.trim().is_empty() {
        return Err(RequestError::Validation("Recommendation must not be empty"));
    }
    upsert_smart_pick_in_db(&pool, &slug, &request.recommendation).await?;
    Ok(Json(RecommendationWrapper {
        recommendation: request.recommendation,
    }))
}

pub async fn replace_related_articles(
    _admin: AdminUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
    Json(request): Json<ReplaceRelatedRequest>,
) -> JsonResult<RelatedArticlesWrapper> {
    let related = replace_related_articles_in_db(&pool, &slug, &request.related).await?;
    Ok(Json(RelatedArticlesWrapper {
        related_articles: related.into_iter().map(Into::into).collect(),
    }))
}
