pub mod authentication;
pub mod catalog;
pub mod data_formats;
pub mod db_helpers;
pub mod errors;
mod handlers;
pub mod models;

use anyhow::Context;
pub use anyhow::Result;
use axum::http::StatusCode;
use axum::{routing::*, Extension, Json, Router};
pub use catalog::CatalogData;
pub use data_formats::*;
use handlers::*;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::{
    net::{SocketAddr, TcpListener},
    sync::Arc,
};

pub type JsonResponse<T> = (StatusCode, Json<T>);

pub async fn run_app(app: Router, address: SocketAddr) -> Result<()> {
    let db = init_db().await?;
    let catalog = load_catalog_data()?;
    let app = app
        .layer(Extension(Arc::new(db)))
        .layer(Extension(Arc::new(catalog)));
    axum::Server::bind(&address)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

pub async fn init_db() -> Result<SqlitePool> {
    let db_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let options = SqliteConnectOptions::from_str(&db_url)
        .context("Invalid DATABASE_URL")?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    tracing::info!("running migrations");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("migrations completed");
    Ok(pool)
}

/// Loads the keyword index and filter guide from the data directory
/// (`APNILIST_DATA_DIR`, default `data/`).
pub fn load_catalog_data() -> Result<CatalogData> {
    let dir = std::env::var("APNILIST_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    CatalogData::load(&PathBuf::from(dir))
}

pub fn get_random_free_port() -> (u16, SocketAddr) {
    let listener = TcpListener::bind("localhost:0").unwrap();
    match listener.local_addr() {
        Ok(addr) => (addr.port(), addr),
        Err(_) => panic!("Could not get a free port"),
    }
}

/// Lowercased, hyphen-separated form of a title, safe for URLs.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_was_hyphen = true;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

pub fn make_router() -> Router {
    Router::new()
        .route("/check_health", get(alive))
        // users
        .route("/api/users/login", post(login_user))
        .route("/api/users", post(register_user))
        .route("/api/user", get(get_current_user).put(update_user))
        // catalog
        .route("/api/categories", get(list_categories))
        .route("/api/categories/:slug/filter-guide", get(get_filter_guide))
        .route("/api/suggestions", get(get_suggestions))
        // articles
        .route("/api/articles", get(list_articles))
        .route("/api/articles/:slug", get(get_article))
        .route(
            "/api/articles/:slug/smart-pick",
            get(get_smart_pick_recommendation),
        )
        .route(
            "/api/articles/:slug/comments",
            get(get_comments).post(add_comment),
        )
        .route("/api/articles/:slug/comments/:id", delete(delete_comment))
        // products
        .route("/api/products/:slug", get(get_product))
        .route("/api/deals", get(get_deals))
        .route("/api/price-tracker", get(get_price_tracker))
        // wishlist
        .route("/api/wishlist", get(get_wishlist).post(add_to_wishlist))
        .route("/api/wishlist/:product_id", delete(remove_from_wishlist))
        // admin CMS
        .route(
            "/api/admin/articles",
            get(admin_list_articles).post(create_article),
        )
        .route(
            "/api/admin/articles/:slug",
            get(get_article_for_admin)
                .put(update_article)
                .delete(delete_article),
        )
        .route(
            "/api/admin/articles/:slug/products",
            put(replace_article_products),
        )
        .route("/api/admin/articles/:slug/smart-pick", put(save_smart_pick))
        .route(
            "/api/admin/articles/:slug/related",
            put(replace_related_articles),
        )
        .route(
            "/api/admin/products",
            get(admin_list_products).post(create_product),
        )
        .route("/api/admin/products/:slug", put(update_product))
        .fallback(not_found)
}
