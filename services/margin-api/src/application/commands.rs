//! 写操作命令

use chrono::{DateTime, Utc};
use marginiq_domain_core::{Product, ProductId, ProductStatus};
use marginiq_errors::{AppError, AppResult};
use serde::Deserialize;

use crate::domain::SuggestionId;

/// 商品部分更新；`id` 不可修改
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub region: Option<String>,
    pub price: Option<f64>,
    pub cogs: Option<f64>,
    pub margin: Option<f64>,
    pub margin_delta: Option<f64>,
    pub tariff_impact: Option<f64>,
    pub shrink_rate: Option<f64>,
    pub supplier: Option<String>,
    pub status: Option<ProductStatus>,
}

impl ProductPatch {
    /// 合并到商品上，并刷新 `lastUpdated`
    pub fn apply_to(self, product: &mut Product, now: DateTime<Utc>) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut product.sku, self.sku);
        set(&mut product.name, self.name);
        set(&mut product.category, self.category);
        set(&mut product.region, self.region);
        set(&mut product.price, self.price);
        set(&mut product.cogs, self.cogs);
        set(&mut product.margin, self.margin);
        set(&mut product.margin_delta, self.margin_delta);
        set(&mut product.tariff_impact, self.tariff_impact);
        set(&mut product.shrink_rate, self.shrink_rate);
        set(&mut product.supplier, self.supplier);
        set(&mut product.status, self.status);
        product.last_updated = now;
    }
}

/// 更新商品命令
#[derive(Debug, Clone)]
pub struct UpdateProductCommand {
    pub product_id: ProductId,
    pub patch: ProductPatch,
}

/// 批准建议命令
#[derive(Debug, Clone)]
pub struct ApproveSuggestionCommand {
    pub suggestion_id: SuggestionId,
    pub notes: Option<String>,
}

/// 驳回建议命令
#[derive(Debug, Clone)]
pub struct RejectSuggestionCommand {
    pub suggestion_id: SuggestionId,
    pub reason: Option<String>,
}

impl RejectSuggestionCommand {
    /// 校验并取出驳回理由
    pub fn reason(&self) -> AppResult<String> {
        match self.reason.as_deref().map(str::trim) {
            Some(reason) if !reason.is_empty() => Ok(reason.to_string()),
            _ => Err(AppError::validation("Rejection reason is required")),
        }
    }
}

fn required_product_id(product_id: &Option<String>) -> AppResult<ProductId> {
    match product_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => Ok(ProductId::from(id)),
        _ => Err(AppError::validation("Product ID is required")),
    }
}

/// 生成建议命令
#[derive(Debug, Clone, Default)]
pub struct GenerateSuggestionsCommand {
    pub product_id: Option<String>,
    pub analysis_type: Option<String>,
}

impl GenerateSuggestionsCommand {
    pub fn product_id(&self) -> AppResult<ProductId> {
        required_product_id(&self.product_id)
    }
}

/// 默认分析类型
pub const DEFAULT_ANALYSIS_TYPE: &str = "comprehensive";

/// 生成分析命令
#[derive(Debug, Clone, Default)]
pub struct GenerateAnalysisCommand {
    pub product_id: Option<String>,
    pub analysis_type: Option<String>,
}

impl GenerateAnalysisCommand {
    pub fn product_id(&self) -> AppResult<ProductId> {
        required_product_id(&self.product_id)
    }

    pub fn analysis_type(&self) -> String {
        self.analysis_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_ANALYSIS_TYPE)
            .to_string()
    }
}

/// 更新 KPI 目标值命令
#[derive(Debug, Clone)]
pub struct UpdateKpiTargetCommand {
    pub slug: String,
    pub target: Option<f64>,
}

/// 由商品毛利计算 KPI；`None` 表示请求未提供商品数组
#[derive(Debug, Clone, Default)]
pub struct CalculateKpisCommand {
    pub margins: Option<Vec<f64>>,
}

/// 发送对话消息命令
#[derive(Debug, Clone, Default)]
pub struct SendMessageCommand {
    pub message: Option<String>,
}

impl SendMessageCommand {
    pub fn message(&self) -> AppResult<&str> {
        match self.message.as_deref() {
            Some(message) if !message.trim().is_empty() => Ok(message),
            _ => Err(AppError::validation("Message is required")),
        }
    }
}
