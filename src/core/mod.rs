//! 核心层：错误、认证、标识生成、中间件与响应

pub mod auth;
pub mod error;
pub mod id;
pub mod middleware;
pub mod response;
