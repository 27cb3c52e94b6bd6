//! marginiq-bootstrap - 统一服务启动骨架
//!
//! 配置加载、日志初始化、健康检查 / metrics 端点与 HTTP 服务启动

mod health;
mod metrics;
mod runtime;
mod starter;

pub use health::*;
pub use metrics::*;
pub use runtime::*;
pub use starter::*;
