use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use sqlx::SqlitePool;

use crate::{
    catalog::{recommend, CatalogData},
    data_formats::{
        FilterGuideWrapper, RecommendationWrapper, SmartPickQueryParams, SuggestionQueryParams,
        SuggestionsWrapper,
    },
    db_helpers::{get_article_id_by_slug_in_db, get_category_by_slug_in_db, get_smart_pick_in_db},
};

use super::JsonResult;

// ----------------- Catalog Handlers -----------------

/// `GET /api/suggestions?q=...`. Substring match over the keyword
/// index; an empty or blank query suggests nothing.
pub async fn get_suggestions(
    Extension(catalog): Extension<Arc<CatalogData>>,
    Query(params): Query<SuggestionQueryParams>,
) -> JsonResult<SuggestionsWrapper> {
    Ok(Json(SuggestionsWrapper {
        suggestions: catalog.keywords.suggest(&params.q),
    }))
}

/// `GET /api/categories/:slug/filter-guide`. The guide is keyed by
/// display name, so the slug is resolved against the store first.
pub async fn get_filter_guide(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Extension(catalog): Extension<Arc<CatalogData>>,
    Path(slug): Path<String>,
) -> JsonResult<FilterGuideWrapper> {
    let category = get_category_by_slug_in_db(&pool, &slug).await?;
    let groups = catalog.filter_guide.groups(&category.name).to_vec();
    Ok(Json(FilterGuideWrapper {
        category: category.name,
        groups,
    }))
}

/// `GET /api/articles/:slug/smart-pick`. Runs the decision table over
/// the chosen facets, falling back to the article's stored
/// recommendation when no rule fires.
pub async fn get_smart_pick_recommendation(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
    Query(params): Query<SmartPickQueryParams>,
) -> JsonResult<RecommendationWrapper> {
    let facets = params.facets()?;
    let article_id = get_article_id_by_slug_in_db(&pool, &slug).await?;
    let stored = get_smart_pick_in_db(&pool, article_id).await?;
    Ok(Json(RecommendationWrapper {
        recommendation: recommend(&facets, stored.as_deref()),
    }))
}
