//! Gemini REST 客户端

use std::time::Duration;

use async_trait::async_trait;
use marginiq_config::LlmConfig;
use marginiq_errors::{AppError, AppResult};
use marginiq_ports::{LlmClient, Prompt};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// 取第一个候选的第一段文本
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// 调用 `models/{model}:generateContent` 的单次生成客户端
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Secret<String>,
    url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: Secret<String>,
        endpoint: &str,
        model: &str,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key,
            url: format!(
                "{}/models/{}:generateContent",
                endpoint.trim_end_matches('/'),
                model
            ),
        })
    }

    /// 未配置 API key 时返回 `None`
    pub fn from_config(config: &LlmConfig) -> AppResult<Option<Self>> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };
        Self::new(
            api_key,
            &config.endpoint,
            &config.model,
            Duration::from_secs(config.timeout_secs),
        )
        .map(Some)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, prompt: &Prompt) -> AppResult<String> {
        let text = prompt.render();
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: &text }],
            }],
        };

        let response = self
            .http
            .post(&self.url)
            .query(&[("key", self.api_key.expose_secret().as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("gemini request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(format!(
                "gemini returned status {status}"
            )));
        }

        let reply: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::external_service(format!("invalid gemini response: {e}")))?;

        reply
            .into_text()
            .ok_or_else(|| AppError::external_service("gemini response contained no text"))
    }
}
