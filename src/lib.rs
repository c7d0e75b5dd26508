//! # 产品 REST API
//!
//! 基于 Axum 的内存产品 CRUD 服务：
//! - `app`：产品模型、存储、查询与处理器
//! - `core`：错误类型、API key 校验、标识生成、中间件
//! - `infrastructure`：配置加载与日志初始化

pub mod app;
pub mod core;
pub mod infrastructure;

pub use app::{build_router, AppState};
pub use infrastructure::config::AppConfig;
