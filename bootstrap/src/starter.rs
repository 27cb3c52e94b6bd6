//! 服务启动器
//!
//! 提供统一的 HTTP 服务启动模式

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use marginiq_config::AppConfig;
use marginiq_errors::AppResult;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::health::{HealthChecker, health_routes};
use crate::metrics::{MetricsRecorder, track_http_metrics};
use crate::runtime::{init_runtime, shutdown_signal};

/// 运行 HTTP 服务
///
/// 这是服务的统一入口点。它负责：
/// 1. 加载配置
/// 2. 初始化运行时（日志）
/// 3. 安装 Prometheus 记录器
/// 4. 调用用户提供的闭包构建业务路由（可注册就绪探针）
/// 5. 合并 /health、/ready、/metrics 路由并挂载 trace / CORS / metrics 中间件
/// 6. 启动服务器并处理 graceful shutdown
///
/// # 示例
///
/// ```ignore
/// use marginiq_bootstrap::run;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     run("config", |config, health| async move {
///         Ok(my_routes(config))
///     }).await
/// }
/// ```
pub async fn run<F, Fut>(config_dir: &str, app_builder: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(AppConfig, Arc<HealthChecker>) -> Fut,
    Fut: Future<Output = AppResult<Router>>,
{
    // 1. 加载配置
    let config = AppConfig::load(config_dir)?;

    // 2. 初始化运行时
    init_runtime(&config);

    info!("Starting {} service", config.app_name);

    // 3. 初始化 Metrics 记录器
    let metrics = Arc::new(MetricsRecorder::install()?);

    // 4. 构建业务路由
    let health_checker = Arc::new(HealthChecker::new());
    let app = app_builder(config.clone(), health_checker.clone()).await?;

    // 5. 合并运维路由并挂载中间件
    let app = app
        .merge(health_routes(health_checker, metrics))
        .layer(middleware::from_fn(track_http_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // 6. 启动服务器
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(%addr, "HTTP server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let shutdown = shutdown_signal()?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Service stopped");

    Ok(())
}
