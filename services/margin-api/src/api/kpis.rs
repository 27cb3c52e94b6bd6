//! /api/kpis

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use marginiq_errors::AppError;
use serde::Deserialize;
use serde_json::Value;

use super::params::{KpiListParams, KpiTrendsParams};
use super::{ApiJson, ApiResult, AppState, ok};
use crate::application::{CalculateKpisCommand, KpiTrendsView, UpdateKpiTargetCommand};
use crate::domain::{CalculatedKpis, KpiMetric, KpiSummary};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_kpis))
        .route("/trends", get(trends))
        .route("/summary", get(summary))
        .route("/calculate", post(calculate))
        .route("/{slug}", get(get_kpi).put(update_target))
}

#[derive(Debug, Default, Deserialize)]
pub struct TargetBody {
    pub target: Option<f64>,
}

/// 商品数组保持原始 JSON，便于区分“缺失”与“格式错误”
#[derive(Debug, Default, Deserialize)]
pub struct CalculateBody {
    pub products: Option<Value>,
}

impl CalculateBody {
    fn into_command(self) -> Result<CalculateKpisCommand, AppError> {
        let Some(Value::Array(items)) = self.products else {
            return Ok(CalculateKpisCommand::default());
        };
        let margins = items
            .iter()
            .map(|item| {
                item.get("margin")
                    .and_then(Value::as_f64)
                    .ok_or_else(|| AppError::validation("Each product requires a numeric margin"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CalculateKpisCommand {
            margins: Some(margins),
        })
    }
}

async fn list_kpis(
    State(handler): State<AppState>,
    Query(params): Query<KpiListParams>,
) -> ApiResult<Vec<KpiMetric>> {
    Ok(ok(handler.list_kpis(&params.into_query()).await?))
}

async fn get_kpi(
    State(handler): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<KpiMetric> {
    Ok(ok(handler.get_kpi(&slug).await?))
}

async fn update_target(
    State(handler): State<AppState>,
    Path(slug): Path<String>,
    ApiJson(body): ApiJson<TargetBody>,
) -> ApiResult<KpiMetric> {
    let cmd = UpdateKpiTargetCommand {
        slug,
        target: body.target,
    };
    Ok(ok(handler.update_kpi_target(cmd).await?))
}

async fn trends(
    State(handler): State<AppState>,
    Query(params): Query<KpiTrendsParams>,
) -> ApiResult<KpiTrendsView> {
    Ok(ok(handler.kpi_trends(params.into_query())))
}

async fn summary(State(handler): State<AppState>) -> ApiResult<KpiSummary> {
    Ok(ok(handler.kpi_summary().await?))
}

async fn calculate(
    State(handler): State<AppState>,
    ApiJson(body): ApiJson<CalculateBody>,
) -> ApiResult<CalculatedKpis> {
    let cmd = body.into_command()?;
    Ok(ok(handler.calculate_kpis(cmd)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn command(body: Value) -> Result<CalculateKpisCommand, AppError> {
        serde_json::from_value::<CalculateBody>(body)
            .unwrap()
            .into_command()
    }

    #[test]
    fn test_missing_or_non_array_products() {
        assert!(command(json!({})).unwrap().margins.is_none());
        assert!(command(json!({ "products": "all" })).unwrap().margins.is_none());
        assert!(command(json!({ "products": null })).unwrap().margins.is_none());
    }

    #[test]
    fn test_margins_extracted() {
        let cmd = command(json!({ "products": [{ "margin": 1.5, "name": "a" }, { "margin": -2 }] }))
            .unwrap();
        assert_eq!(cmd.margins, Some(vec![1.5, -2.0]));
    }

    #[test]
    fn test_non_numeric_margin_rejected() {
        let err = command(json!({ "products": [{ "margin": "high" }] })).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
