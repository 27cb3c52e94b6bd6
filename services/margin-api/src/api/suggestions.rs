//! /api/suggestions

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use marginiq_common::PagedResult;
use serde::{Deserialize, Serialize};

use super::params::SuggestionListParams;
use super::{ApiJson, ApiResult, AppState, ok};
use crate::application::{
    ApproveSuggestionCommand, GenerateSuggestionsCommand, RejectSuggestionCommand,
};
use crate::domain::{Suggestion, SuggestionId, SuggestionStats};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_suggestions))
        .route("/stats", get(stats))
        .route("/generate", post(generate))
        .route("/{id}", get(get_suggestion))
        .route("/{id}/approve", put(approve))
        .route("/{id}/reject", put(reject))
}

#[derive(Debug, Serialize)]
pub struct SuggestionList {
    pub suggestions: Vec<Suggestion>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

impl From<PagedResult<Suggestion>> for SuggestionList {
    fn from(page: PagedResult<Suggestion>) -> Self {
        Self {
            suggestions: page.items,
            total: page.total,
            limit: page.limit,
            offset: page.offset,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ApproveBody {
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RejectBody {
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    pub product_id: Option<String>,
    pub analysis_type: Option<String>,
}

async fn list_suggestions(
    State(handler): State<AppState>,
    Query(params): Query<SuggestionListParams>,
) -> ApiResult<SuggestionList> {
    let page = handler.list_suggestions(&params.into_query()).await?;
    Ok(ok(page.into()))
}

async fn get_suggestion(
    State(handler): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Suggestion> {
    Ok(ok(handler.get_suggestion(&SuggestionId(id)).await?))
}

async fn approve(
    State(handler): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ApproveBody>,
) -> ApiResult<Suggestion> {
    let cmd = ApproveSuggestionCommand {
        suggestion_id: SuggestionId(id),
        notes: body.notes,
    };
    Ok(ok(handler.approve_suggestion(cmd).await?))
}

async fn reject(
    State(handler): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<RejectBody>,
) -> ApiResult<Suggestion> {
    let cmd = RejectSuggestionCommand {
        suggestion_id: SuggestionId(id),
        reason: body.reason,
    };
    Ok(ok(handler.reject_suggestion(cmd).await?))
}

async fn generate(
    State(handler): State<AppState>,
    ApiJson(body): ApiJson<GenerateBody>,
) -> ApiResult<Vec<Suggestion>> {
    let cmd = GenerateSuggestionsCommand {
        product_id: body.product_id,
        analysis_type: body.analysis_type,
    };
    Ok(ok(handler.generate_suggestions(cmd).await?))
}

async fn stats(State(handler): State<AppState>) -> ApiResult<SuggestionStats> {
    Ok(ok(handler.suggestion_stats().await?))
}
