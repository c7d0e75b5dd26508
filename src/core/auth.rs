//! API key 校验

use axum::http::HeaderMap;
use subtle::ConstantTimeEq;
use tracing::warn;

use super::error::ApiError;
use crate::infrastructure::config::AuthConfig;

/// 校验请求头中的共享密钥，失败返回 `Unauthorized`
///
/// 在处理器主体之前显式调用，先于请求体校验和任何存储修改。
pub fn require_api_key(headers: &HeaderMap, auth: &AuthConfig) -> Result<(), ApiError> {
    let presented = headers
        .get(auth.header.as_str())
        .and_then(|value| value.to_str().ok());

    match presented {
        Some(key) if bool::from(key.as_bytes().ct_eq(auth.api_key.as_bytes())) => Ok(()),
        Some(_) => {
            warn!("API key 不匹配");
            Err(ApiError::Unauthorized)
        }
        None => {
            warn!("缺少 API key 请求头: {}", auth.header);
            Err(ApiError::Unauthorized)
        }
    }
}
