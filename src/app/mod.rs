//! 应用层：状态与路由装配

pub mod products;

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
};

use crate::core::{error::ApiError, middleware::request_logging_middleware, response::panic_response};
use crate::infrastructure::config::AppConfig;
use products::service::ProductService;

/// 处理器共享状态
#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            products: ProductService::new(),
            config: Arc::new(config),
        }
    }
}

/// 组装完整路由
pub fn build_router(state: AppState) -> Router {
    with_layers(routes(), state)
}

/// 全部业务路由（未加中间件）
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(welcome))
        .nest("/api/products", products::routes())
        .fallback(route_not_found)
}

/// 挂上中间件并注入状态
///
/// 自内向外：CORS → 超时 → panic 捕获 → 请求日志，超时和 panic 的请求同样会被记录。
pub fn with_layers(router: Router<AppState>, state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.http.timeout_seconds);

    router
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TimeoutLayer::new(timeout))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(request_logging_middleware))
        .with_state(state)
}

async fn welcome() -> &'static str {
    "Welcome to the Product REST API"
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
