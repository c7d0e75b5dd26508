//! 产品资源

pub mod handler;
pub mod model;
pub mod query;
pub mod service;
pub mod store;

use axum::{routing::get, Router};

use super::AppState;

/// 产品资源路由，挂载在 `/api/products`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_products).post(handler::create_product))
        .route(
            "/:id",
            get(handler::get_product)
                .put(handler::update_product)
                .delete(handler::delete_product),
        )
}
