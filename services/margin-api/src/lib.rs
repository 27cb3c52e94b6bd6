//! margin-api - 毛利分析 REST 服务
//!
//! 商品查询、仪表盘、优化建议、KPI、毛利分析与对话助手

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;

use std::sync::Arc;

use axum::Router;
use chrono::Utc;
use marginiq_bootstrap::HealthChecker;
use marginiq_config::AppConfig;
use marginiq_errors::AppResult;
use marginiq_ports::LlmClient;
use tracing::{info, warn};

use application::ServiceHandler;
use domain::repositories::{KpiRepository, ProductRepository, SuggestionRepository};
use infrastructure::{CannedAssistant, GeminiClient, InMemoryRepository, RepositoryProbe, seed};

/// 组装仓储、助手与路由，并注册就绪探针
pub async fn build_app(config: AppConfig, health: Arc<HealthChecker>) -> AppResult<Router> {
    info!("Initializing margin-api service...");

    let products = match &config.data.products_file {
        Some(path) => seed::load_products_file(path).await?,
        None => seed::products(),
    };
    info!(count = products.len(), "Product catalogue loaded");

    let product_repo: Arc<ProductRepository> = Arc::new(InMemoryRepository::new(products));
    let suggestion_repo: Arc<SuggestionRepository> =
        Arc::new(InMemoryRepository::new(seed::suggestions()));
    let kpi_repo: Arc<KpiRepository> = Arc::new(InMemoryRepository::new(seed::kpis()));
    info!("Repositories initialized");

    let assistant: Arc<dyn LlmClient> = match GeminiClient::from_config(&config.llm)? {
        Some(client) => Arc::new(client),
        None => {
            warn!("llm.api_key not set, falling back to canned replies");
            Arc::new(CannedAssistant)
        }
    };
    info!(backend = assistant.name(), "Assistant ready");

    health
        .register(Arc::new(RepositoryProbe::new("products", product_repo.clone())))
        .await;
    health
        .register(Arc::new(RepositoryProbe::new(
            "suggestions",
            suggestion_repo.clone(),
        )))
        .await;
    health
        .register(Arc::new(RepositoryProbe::new("kpis", kpi_repo.clone())))
        .await;

    let handler = Arc::new(ServiceHandler::new(
        product_repo,
        suggestion_repo,
        kpi_repo,
        assistant,
        seed::reference(Utc::now()),
    ));

    Ok(api::router(handler))
}
