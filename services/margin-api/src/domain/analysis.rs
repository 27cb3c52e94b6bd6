//! 毛利分析、告警与趋势

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use marginiq_domain_core::ProductId;
use serde::{Deserialize, Serialize};

use super::Suggestion;

/// 根因变化方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CauseTrend {
    Increasing,
    Decreasing,
    Stable,
}

/// 毛利变化根因
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootCause {
    pub factor: String,
    pub impact: f64,
    pub description: String,
    pub trend: CauseTrend,
}

/// 单个商品的毛利分析
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginAnalysis {
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_type: Option<String>,
    pub analysis: String,
    pub suggestions: Vec<Suggestion>,
    pub root_causes: Vec<RootCause>,
    pub timestamp: DateTime<Utc>,
}

/// 最近分析摘要（仪表盘）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentAnalysis {
    pub product_id: ProductId,
    pub analysis: String,
    pub timestamp: DateTime<Utc>,
}

/// 告警级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Critical,
    Warning,
    Info,
}

/// 仪表盘告警
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub level: AlertLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub product_id: ProductId,
}

/// 毛利走势
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginTrend {
    Declining,
    Stable,
    Improving,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentTrend {
    pub trend: MarginTrend,
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallTrend {
    pub trend: MarginTrend,
    pub change: f64,
    pub period: String,
}

/// 按品类 / 区域拆分的毛利走势
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisTrends {
    pub overall: OverallTrend,
    pub by_category: BTreeMap<String, SegmentTrend>,
    pub by_region: BTreeMap<String, SegmentTrend>,
}
