//! /api/analysis

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use marginiq_domain_core::ProductId;
use serde::Deserialize;

use super::{ApiJson, ApiResult, AppState, ok};
use crate::application::GenerateAnalysisCommand;
use crate::domain::{AnalysisTrends, MarginAnalysis};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/trends", get(trends))
        .route("/generate", post(generate))
        .route("/{product_id}", get(product_analysis))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    pub product_id: Option<String>,
    pub analysis_type: Option<String>,
}

async fn product_analysis(
    State(handler): State<AppState>,
    Path(product_id): Path<String>,
) -> ApiResult<MarginAnalysis> {
    Ok(ok(handler.product_analysis(&ProductId(product_id)).await?))
}

async fn generate(
    State(handler): State<AppState>,
    ApiJson(body): ApiJson<GenerateBody>,
) -> ApiResult<MarginAnalysis> {
    let cmd = GenerateAnalysisCommand {
        product_id: body.product_id,
        analysis_type: body.analysis_type,
    };
    Ok(ok(handler.generate_analysis(cmd).await?))
}

async fn trends(State(handler): State<AppState>) -> ApiResult<AnalysisTrends> {
    Ok(ok(handler.analysis_trends()))
}
