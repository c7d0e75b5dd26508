//! 产品处理器
//!
//! 写操作的顺序固定为：API key → 请求体校验 → 修改存储。

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde_json::Value;

use super::model::{validate_new_product, validate_product_patch, Product};
use super::query::{ListParams, ListQuery, Listing};
use crate::app::AppState;
use crate::core::{auth::require_api_key, error::ApiError, response::MessageResponse};

fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::ValidationFailed(rejection.body_text()))
}

/// GET / — 过滤、搜索、分页
pub async fn list_products(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Listing>, ApiError> {
    let Query(params) =
        params.map_err(|rejection| ApiError::ValidationFailed(rejection.body_text()))?;
    let query = ListQuery::try_from(params)?;
    Ok(Json(state.products.list(&query)))
}

/// GET /:id
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.products.get(&id)?))
}

/// POST / — 需要 API key
pub async fn create_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    require_api_key(&headers, &state.config.auth)?;
    let payload = validate_new_product(json_body(body)?)?;

    let product = state.products.create(payload);
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /:id — 需要 API key，浅合并
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    require_api_key(&headers, &state.config.auth)?;
    let patch = validate_product_patch(json_body(body)?)?;

    Ok(Json(state.products.update(&id, patch)?))
}

/// DELETE /:id — 需要 API key
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    require_api_key(&headers, &state.config.auth)?;
    state.products.delete(&id)?;

    Ok(Json(MessageResponse::new("Product deleted successfully")))
}
