//! 响应信封与请求体提取

use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use marginiq_errors::AppError;
use serde::{Serialize, de::DeserializeOwned};

/// 成功信封 `{ "success": true, "data": ... }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

pub fn ok<T>(data: T) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data,
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// JSON 请求体
///
/// 空请求体按 `{}` 处理；解析失败返回 400 失败信封
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        let raw: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &body
        };

        serde_json::from_slice(raw)
            .map(ApiJson)
            .map_err(|e| AppError::validation(format!("Invalid JSON body: {e}")))
    }
}

/// 未匹配路由
pub async fn fallback() -> AppError {
    AppError::not_found("Route not found")
}
