//! /api/dashboard

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};

use super::params::ProductListParams;
use super::products::{ProductList, list_products_from};
use super::{ApiResult, AppState, ok};
use crate::application::{DashboardView, ListKpisQuery};
use crate::domain::{Alert, KpiMetric};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(overview))
        .route("/kpis", get(kpis))
        .route("/products", get(products))
        .route("/alerts", get(alerts))
}

async fn overview(State(handler): State<AppState>) -> ApiResult<DashboardView> {
    Ok(ok(handler.dashboard().await?))
}

async fn kpis(State(handler): State<AppState>) -> ApiResult<Vec<KpiMetric>> {
    Ok(ok(handler.list_kpis(&ListKpisQuery::default()).await?))
}

async fn products(
    State(handler): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> ApiResult<ProductList> {
    list_products_from(&handler, params, "dashboard").await
}

async fn alerts(State(handler): State<AppState>) -> ApiResult<Vec<Alert>> {
    Ok(ok(handler.alerts()))
}
