//! 产品数据模型与请求体校验

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::core::error::ApiError;

/// 由系统分配、请求体不得携带的字段
pub const RESERVED_ID_FIELD: &str = "id";

/// 产品记录：固定字段加上调用方提供的任意附加字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// 创建请求体
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewProduct {
    #[validate(length(
        min = 1,
        max = 200,
        message = "name must be a non-empty string of at most 200 characters"
    ))]
    pub name: String,

    #[validate(length(
        min = 1,
        max = 100,
        message = "category must be a non-empty string of at most 100 characters"
    ))]
    pub category: String,

    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// 更新请求体，所有字段可选
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProductPatch {
    #[validate(length(
        min = 1,
        max = 200,
        message = "name must be a non-empty string of at most 200 characters"
    ))]
    pub name: Option<String>,

    #[validate(length(
        min = 1,
        max = 100,
        message = "category must be a non-empty string of at most 100 characters"
    ))]
    pub category: Option<String>,

    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Product {
    pub fn new(id: String, payload: NewProduct) -> Self {
        let mut attributes = payload.attributes;
        attributes.remove(RESERVED_ID_FIELD);

        Self {
            id,
            name: payload.name,
            category: payload.category,
            attributes,
        }
    }

    /// 浅合并：补丁中出现的字段覆盖同名旧字段，其余保留，`id` 不变
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        for (key, value) in patch.attributes {
            if key == RESERVED_ID_FIELD {
                continue;
            }
            self.attributes.insert(key, value);
        }
    }
}

/// 校验创建请求体
pub fn validate_new_product(body: Value) -> Result<NewProduct, ApiError> {
    let object = check_body_shape(body)?;
    let payload: NewProduct = serde_json::from_value(Value::Object(object))
        .map_err(|e| ApiError::ValidationFailed(format!("invalid product body: {}", e)))?;
    payload.validate()?;
    Ok(payload)
}

/// 校验更新请求体
pub fn validate_product_patch(body: Value) -> Result<ProductPatch, ApiError> {
    let object = check_body_shape(body)?;
    let patch: ProductPatch = serde_json::from_value(Value::Object(object))
        .map_err(|e| ApiError::ValidationFailed(format!("invalid product body: {}", e)))?;
    patch.validate()?;
    Ok(patch)
}

/// 创建与更新共用的检查：必须是 JSON 对象，不得携带 `id`，已知附加字段类型正确
fn check_body_shape(body: Value) -> Result<Map<String, Value>, ApiError> {
    let object = match body {
        Value::Object(object) => object,
        _ => {
            return Err(ApiError::ValidationFailed(
                "request body must be a JSON object".to_string(),
            ))
        }
    };

    if object.contains_key(RESERVED_ID_FIELD) {
        return Err(ApiError::ValidationFailed(
            "id is assigned by the server and cannot be set".to_string(),
        ));
    }

    if let Some(price) = object.get("price") {
        match price.as_f64() {
            Some(p) if p >= 0.0 => {}
            _ => {
                return Err(ApiError::ValidationFailed(
                    "price must be a non-negative number".to_string(),
                ))
            }
        }
    }

    if let Some(in_stock) = object.get("inStock") {
        if !in_stock.is_boolean() {
            return Err(ApiError::ValidationFailed(
                "inStock must be a boolean".to_string(),
            ));
        }
    }

    Ok(object)
}
