//! /api/chat

use axum::{
    Router,
    extract::{Query, State},
    routing::{get, post},
};
use marginiq_common::PagedResult;
use serde::{Deserialize, Serialize};

use super::params::PageParams;
use super::{ApiJson, ApiResult, AppState, ok};
use crate::application::SendMessageCommand;
use crate::domain::ChatMessage;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/message", post(send_message))
        .route("/history", get(history))
        .route("/suggestions", get(suggested_questions))
}

#[derive(Debug, Default, Deserialize)]
pub struct MessageBody {
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageList {
    pub messages: Vec<ChatMessage>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

impl From<PagedResult<ChatMessage>> for MessageList {
    fn from(page: PagedResult<ChatMessage>) -> Self {
        Self {
            messages: page.items,
            total: page.total,
            limit: page.limit,
            offset: page.offset,
        }
    }
}

async fn send_message(
    State(handler): State<AppState>,
    ApiJson(body): ApiJson<MessageBody>,
) -> ApiResult<ChatMessage> {
    let cmd = SendMessageCommand {
        message: body.message,
    };
    Ok(ok(handler.send_message(cmd).await?))
}

async fn history(
    State(handler): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<MessageList> {
    Ok(ok(handler.chat_history(params.into_page()).into()))
}

async fn suggested_questions(State(handler): State<AppState>) -> ApiResult<Vec<String>> {
    Ok(ok(handler.suggested_questions()))
}
