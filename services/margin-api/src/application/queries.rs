//! 查询与只读视图

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use marginiq_common::PageRequest;
use marginiq_domain_core::Product;
use serde::Serialize;

use crate::domain::{KpiMetric, RecentAnalysis, Suggestion, TrendPoint};

/// 建议列表查询（精确匹配）
#[derive(Debug, Clone, Default)]
pub struct ListSuggestionsQuery {
    pub status: Option<String>,
    pub suggestion_type: Option<String>,
    pub product_id: Option<String>,
    pub page: PageRequest,
}

impl ListSuggestionsQuery {
    pub fn matches(&self, suggestion: &Suggestion) -> bool {
        let eq = |wanted: &Option<String>, actual: &str| {
            wanted.as_deref().is_none_or(|wanted| wanted == actual)
        };
        eq(&self.status, suggestion.status.as_str())
            && eq(&self.suggestion_type, suggestion.suggestion_type.as_str())
            && eq(&self.product_id, suggestion.product_id.as_str())
    }
}

/// KPI 列表查询：名称子串（不区分大小写）
#[derive(Debug, Clone, Default)]
pub struct ListKpisQuery {
    pub category: Option<String>,
}

/// 默认趋势时间窗
pub const DEFAULT_TIMEFRAME: &str = "30d";

/// KPI 趋势查询
#[derive(Debug, Clone)]
pub struct KpiTrendsQuery {
    /// KPI 名称（原样匹配）
    pub kpi: Option<String>,
    pub timeframe: String,
}

impl Default for KpiTrendsQuery {
    fn default() -> Self {
        Self {
            kpi: None,
            timeframe: DEFAULT_TIMEFRAME.to_string(),
        }
    }
}

/// 趋势序列：全部，或单个 KPI（未知时为 `null`）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TrendSeries {
    All(BTreeMap<String, Vec<TrendPoint>>),
    One(Option<Vec<TrendPoint>>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiTrendsView {
    pub timeframe: String,
    pub trends: TrendSeries,
}

/// 仪表盘总览
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub kpis: Vec<KpiMetric>,
    pub products: Vec<Product>,
    /// margin < 5 的商品
    pub top_issues: Vec<Product>,
    pub recent_analyses: Vec<RecentAnalysis>,
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::seed;

    #[test]
    fn test_suggestion_filter_is_exact() {
        let all = seed::suggestions();
        let count = |query: ListSuggestionsQuery| all.iter().filter(|s| query.matches(s)).count();

        assert_eq!(count(ListSuggestionsQuery::default()), 5);
        assert_eq!(
            count(ListSuggestionsQuery {
                status: Some("pending".to_string()),
                ..Default::default()
            }),
            3
        );
        assert_eq!(
            count(ListSuggestionsQuery {
                status: Some("Pending".to_string()),
                ..Default::default()
            }),
            0
        );
        assert_eq!(
            count(ListSuggestionsQuery {
                suggestion_type: Some("price_adjustment".to_string()),
                product_id: Some("2".to_string()),
                ..Default::default()
            }),
            1
        );
    }

    #[test]
    fn test_trend_series_shape() {
        let missing = serde_json::to_value(TrendSeries::One(None)).unwrap();
        assert!(missing.is_null());

        let all = serde_json::to_value(TrendSeries::All(BTreeMap::new())).unwrap();
        assert!(all.is_object());
    }
}
