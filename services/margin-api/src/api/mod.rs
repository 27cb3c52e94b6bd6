//! HTTP API 层

mod analysis;
mod chat;
mod dashboard;
mod envelope;
mod kpis;
pub mod params;
mod products;
mod suggestions;

use std::sync::Arc;

use axum::Router;

use crate::application::ServiceHandler;

pub use envelope::{ApiJson, ApiResponse, ApiResult, ok};

/// 路由共享状态
pub type AppState = Arc<ServiceHandler>;

/// 业务路由（`/api/*`）
pub fn router(handler: Arc<ServiceHandler>) -> Router {
    Router::new()
        .nest("/api/products", products::routes())
        .nest("/api/dashboard", dashboard::routes())
        .nest("/api/suggestions", suggestions::routes())
        .nest("/api/kpis", kpis::routes())
        .nest("/api/analysis", analysis::routes())
        .nest("/api/chat", chat::routes())
        .fallback(envelope::fallback)
        .with_state(handler)
}
