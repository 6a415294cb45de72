use std::sync::Arc;

use axum::{extract::Path, http::StatusCode, Extension, Json};
use sqlx::SqlitePool;

use crate::{
    authentication::AdminUser,
    data_formats::{
        CreateProductRequest, MultipleProductsWrapper, PriceChangeResponse, ProductResponse,
        ProductWrapper, TrackedProductResponse, TrackedProductsWrapper, UpdateProductRequest,
    },
    db_helpers::{
        create_product_in_db, get_deals_in_db, get_product_by_slug_in_db,
        get_tracked_products_in_db, list_products_in_db, lowest_recorded_price,
        update_product_in_db,
    },
    errors::RequestError,
};

use super::JsonResult;

// ----------------- Product Handlers -----------------

pub async fn get_product(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
) -> JsonResult<ProductWrapper<ProductResponse>> {
    let product = get_product_by_slug_in_db(&pool, &slug).await?;
    Ok(Json(ProductWrapper {
        product: product.into(),
    }))
}

/// `GET /api/deals`: products at 25% or more off, steepest first.
pub async fn get_deals(
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> JsonResult<MultipleProductsWrapper> {
    let products = get_deals_in_db(&pool).await?;
    Ok(Json(MultipleProductsWrapper {
        products: products.into_iter().map(Into::into).collect(),
    }))
}

pub async fn get_price_tracker(
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> JsonResult<TrackedProductsWrapper> {
    let tracked = get_tracked_products_in_db(&pool).await?;
    let products = tracked
        .into_iter()
        .map(|(product, history)| TrackedProductResponse {
            id: product.id,
            title: product.title,
            image: product.image,
            current_price: product.price,
            lowest_price: lowest_recorded_price(product.price, &history),
            last_change: history.first().map(PriceChangeResponse::from),
            history: history.iter().map(PriceChangeResponse::from).collect(),
        })
        .collect();
    Ok(Json(TrackedProductsWrapper { products }))
}

// ----------------- Admin Product Handlers -----------------

pub async fn admin_list_products(
    _admin: AdminUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> JsonResult<MultipleProductsWrapper> {
    let products = list_products_in_db(&pool).await?;
    Ok(Json(MultipleProductsWrapper {
        products: products.into_iter().map(Into::into).collect(),
    }))
}

pub async fn create_product(
    _admin: AdminUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(ProductWrapper { product: request }): Json<ProductWrapper<CreateProductRequest>>,
) -> Result<(StatusCode, Json<ProductWrapper<ProductResponse>>), RequestError> {
    request.validate()?;
    let product = create_product_in_db(&pool, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ProductWrapper {
            product: product.into(),
        }),
    ))
}

pub async fn update_product(
    _admin: AdminUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
    Json(ProductWrapper { product: request }): Json<ProductWrapper<UpdateProductRequest>>,
) -> JsonResult<ProductWrapper<ProductResponse>> {
    if let Some(price) = request.price {
        if price < 0.0 {
            return Err(RequestError::Validation("Price must not be negative"));
        }
    }
    let product = update_product_in_db(&pool, &slug, request).await?;
    Ok(Json(ProductWrapper {
        product: product.into(),
    }))
}
