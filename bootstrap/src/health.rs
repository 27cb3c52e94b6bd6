//! 健康检查模块
//!
//! 提供 /health、/ready 和 /metrics 端点

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::metrics::MetricsRecorder;

/// 健康检查状态
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub checks: Vec<ComponentHealth>,
}

/// 组件健康状态
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            checks: vec![],
        }
    }

    pub fn add_check(&mut self, check: ComponentHealth) {
        if check.status != "healthy" {
            self.status = "unhealthy".to_string();
        }
        self.checks.push(check);
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: "healthy".to_string(),
            message: None,
        }
    }

    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: "unhealthy".to_string(),
            message: Some(message.into()),
        }
    }
}

/// 就绪检查探针
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    fn name(&self) -> &str;

    async fn check(&self) -> Result<(), String>;
}

/// 健康检查器
#[derive(Default)]
pub struct HealthChecker {
    probes: RwLock<Vec<Arc<dyn ReadinessProbe>>>,
}

impl HealthChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册就绪探针
    pub async fn register(&self, probe: Arc<dyn ReadinessProbe>) {
        self.probes.write().await.push(probe);
    }

    /// 执行存活检查（liveness）
    ///
    /// 只检查服务是否在运行，不检查依赖
    pub async fn liveness(&self) -> HealthStatus {
        HealthStatus::healthy()
    }

    /// 执行就绪检查（readiness）
    ///
    /// 逐个执行已注册的探针
    pub async fn readiness(&self) -> HealthStatus {
        let probes = self.probes.read().await.clone();
        let mut status = HealthStatus::healthy();
        for probe in probes {
            let check = match probe.check().await {
                Ok(()) => ComponentHealth::healthy(probe.name()),
                Err(message) => ComponentHealth::unhealthy(probe.name(), message),
            };
            status.add_check(check);
        }
        status
    }
}

/// 健康检查路由状态
#[derive(Clone)]
struct HealthState {
    checker: Arc<HealthChecker>,
    metrics: Arc<MetricsRecorder>,
}

/// 健康检查与 metrics 路由
pub fn health_routes(checker: Arc<HealthChecker>, metrics: Arc<MetricsRecorder>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(HealthState { checker, metrics })
}

/// Liveness 端点处理器
async fn health_handler(State(state): State<HealthState>) -> impl IntoResponse {
    let status = state.checker.liveness().await;
    (StatusCode::OK, Json(status))
}

/// Readiness 端点处理器
async fn ready_handler(State(state): State<HealthState>) -> impl IntoResponse {
    let status = state.checker.readiness().await;
    let code = if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}

/// Metrics 端点处理器
async fn metrics_handler(State(state): State<HealthState>) -> impl IntoResponse {
    let metrics = state.metrics.render();
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        metrics,
    )
}
