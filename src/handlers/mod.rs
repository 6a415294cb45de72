use axum::{http::StatusCode, http::Uri, Json};

use crate::errors::RequestError;

mod article_handlers;
mod catalog_handlers;
mod comment_handlers;
mod product_handlers;
mod user_handlers;
mod wishlist_handlers;

pub use article_handlers::*;
pub use catalog_handlers::*;
pub use comment_handlers::*;
pub use product_handlers::*;
pub use user_handlers::*;
pub use wishlist_handlers::*;

pub type JsonResult<T> = Result<Json<T>, RequestError>;

// ----------------- Helper Handlers -----------------
pub async fn alive() -> &'static str {
    "alive"
}

pub async fn not_found(uri: Uri) -> Result<(), (StatusCode, String)> {
    Err((
        StatusCode::NOT_FOUND,
        format!("URL {} provided was not found", uri),
    ))
}
