//! 列表查询：分类过滤、名称搜索与分页

use serde::{Deserialize, Serialize};

use super::model::Product;
use crate::core::error::ApiError;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 5;
pub const MAX_LIMIT: usize = 100;

/// 原始查询参数，数值字段以字符串接收再统一解析
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// 解析后的列表查询
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: usize,
    pub limit: usize,
}

/// 列表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    /// 过滤后、分页前的数量
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub products: Vec<Product>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            category: None,
            search: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl TryFrom<ListParams> for ListQuery {
    type Error = ApiError;

    /// 空字符串视同未提供；`page`/`limit` 必须是正整数，`limit` 不超过 [`MAX_LIMIT`]
    fn try_from(params: ListParams) -> Result<Self, Self::Error> {
        let page = parse_positive("page", params.page.as_deref(), DEFAULT_PAGE)?;
        let limit = parse_positive("limit", params.limit.as_deref(), DEFAULT_LIMIT)?;
        if limit > MAX_LIMIT {
            return Err(ApiError::ValidationFailed(format!(
                "limit must not exceed {}",
                MAX_LIMIT
            )));
        }

        Ok(Self {
            category: non_empty(params.category),
            search: non_empty(params.search),
            page,
            limit,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_positive(name: &str, raw: Option<&str>, default: usize) -> Result<usize, ApiError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(default),
        Some(raw) => raw,
    };

    match raw.parse::<usize>() {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(ApiError::ValidationFailed(format!(
            "{} must be a positive integer",
            name
        ))),
    }
}

impl ListQuery {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if product.category.to_lowercase() != category.to_lowercase() {
                return false;
            }
        }
        if let Some(search) = &self.search {
            if !product
                .name
                .to_lowercase()
                .contains(&search.to_lowercase())
            {
                return false;
            }
        }
        true
    }

    /// 在快照上执行过滤与分页，保持插入顺序
    pub fn run(&self, snapshot: Vec<Product>) -> Listing {
        let filtered: Vec<Product> = snapshot.into_iter().filter(|p| self.matches(p)).collect();
        let total = filtered.len();
        let start = (self.page - 1).saturating_mul(self.limit);

        let products = filtered.into_iter().skip(start).take(self.limit).collect();

        Listing {
            total,
            page: self.page,
            limit: self.limit,
            products,
        }
    }
}
