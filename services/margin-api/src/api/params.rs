//! 查询字符串解码
//!
//! 所有字段先按原始字符串接收，再逐项解析；解析失败一律回退到默认值

use marginiq_common::{DEFAULT_LIMIT, PageRequest};
use marginiq_domain_core::{ProductFilter, QueryParams, SortField, SortOrder};
use serde::Deserialize;

use crate::application::{DEFAULT_TIMEFRAME, KpiTrendsQuery, ListKpisQuery, ListSuggestionsQuery};

/// 空串视为未提供
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// 仅接受有限数值
fn finite(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn flag(value: Option<&str>) -> bool {
    value == Some("true")
}

fn signed(value: Option<&str>, default: i64) -> i64 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(default)
}

fn page(limit: Option<&str>, offset: Option<&str>) -> PageRequest {
    PageRequest::clamped(signed(limit, DEFAULT_LIMIT as i64), signed(offset, 0))
}

/// 分页参数
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl PageParams {
    pub fn into_page(self) -> PageRequest {
        page(self.limit.as_deref(), self.offset.as_deref())
    }
}

/// 商品列表参数
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListParams {
    pub category: Option<String>,
    pub region: Option<String>,
    pub supplier: Option<String>,
    pub status: Option<String>,
    pub margin_threshold: Option<String>,
    pub show_only_negative: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ProductListParams {
    pub fn into_query(self) -> QueryParams {
        let filter = ProductFilter {
            category: present(self.category),
            region: present(self.region),
            supplier: present(self.supplier),
            status: present(self.status),
            margin_threshold: finite(self.margin_threshold.as_deref()),
            negative_only: flag(self.show_only_negative.as_deref()),
        };
        let sort_by = self
            .sort_by
            .as_deref()
            .map(SortField::parse_or_default)
            .unwrap_or_default();
        let sort_order = self
            .sort_order
            .as_deref()
            .and_then(SortOrder::parse)
            .unwrap_or_default();

        QueryParams::default()
            .with_filter(filter)
            .sorted_by(sort_by, sort_order)
            .with_page(page(self.limit.as_deref(), self.offset.as_deref()))
    }
}

/// 建议列表参数
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionListParams {
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub suggestion_type: Option<String>,
    pub product_id: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl SuggestionListParams {
    pub fn into_query(self) -> ListSuggestionsQuery {
        ListSuggestionsQuery {
            status: present(self.status),
            suggestion_type: present(self.suggestion_type),
            product_id: present(self.product_id),
            page: page(self.limit.as_deref(), self.offset.as_deref()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct KpiListParams {
    pub category: Option<String>,
    pub timeframe: Option<String>,
}

impl KpiListParams {
    pub fn into_query(self) -> ListKpisQuery {
        ListKpisQuery {
            category: present(self.category),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct KpiTrendsParams {
    pub kpi: Option<String>,
    pub timeframe: Option<String>,
}

impl KpiTrendsParams {
    pub fn into_query(self) -> KpiTrendsQuery {
        KpiTrendsQuery {
            kpi: present(self.kpi),
            timeframe: present(self.timeframe).unwrap_or_else(|| DEFAULT_TIMEFRAME.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn products(pairs: &[(&str, &str)]) -> QueryParams {
        let encoded = pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        let uri: axum::http::Uri = format!("/?{encoded}").parse().unwrap();
        let raw: axum::extract::Query<ProductListParams> =
            axum::extract::Query::try_from_uri(&uri).unwrap();
        raw.0.into_query()
    }

    #[test]
    fn test_defaults() {
        let q = products(&[]);
        assert_eq!(q, QueryParams::default());
        assert_eq!(q.sort_by, SortField::Margin);
        assert_eq!(q.sort_order, SortOrder::Desc);
        assert_eq!(q.page, PageRequest::new(50, 0));
    }

    #[test]
    fn test_full_decode() {
        let q = products(&[
            ("category", "dairy"),
            ("supplier", "farms"),
            ("status", "Active"),
            ("marginThreshold", "5.5"),
            ("showOnlyNegative", "true"),
            ("sortBy", "shrinkRate"),
            ("sortOrder", "asc"),
            ("limit", "10"),
            ("offset", "20"),
        ]);
        assert_eq!(q.filter.category.as_deref(), Some("dairy"));
        assert_eq!(q.filter.supplier.as_deref(), Some("farms"));
        assert_eq!(q.filter.status.as_deref(), Some("Active"));
        assert_eq!(q.filter.margin_threshold, Some(5.5));
        assert!(q.filter.negative_only);
        assert_eq!(q.sort_by, SortField::ShrinkRate);
        assert_eq!(q.sort_order, SortOrder::Asc);
        assert_eq!(q.page, PageRequest::new(10, 20));
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let q = products(&[
            ("marginThreshold", "abc"),
            ("showOnlyNegative", "yes"),
            ("sortBy", "bogus"),
            ("sortOrder", "sideways"),
            ("limit", "ten"),
            ("offset", "-3"),
        ]);
        assert_eq!(q.filter.margin_threshold, None);
        assert!(!q.filter.negative_only);
        assert_eq!(q.sort_by, SortField::Margin);
        assert_eq!(q.sort_order, SortOrder::Desc);
        assert_eq!(q.page, PageRequest::new(50, 0));
    }

    #[test]
    fn test_non_finite_threshold_is_ignored() {
        assert_eq!(products(&[("marginThreshold", "NaN")]).filter.margin_threshold, None);
        assert_eq!(products(&[("marginThreshold", "inf")]).filter.margin_threshold, None);
    }

    #[test]
    fn test_flag_is_literal_true() {
        assert!(!products(&[("showOnlyNegative", "TRUE")]).filter.negative_only);
        assert!(!products(&[("showOnlyNegative", "1")]).filter.negative_only);
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let q = products(&[("category", ""), ("region", ""), ("limit", "")]);
        assert!(q.filter.category.is_none());
        assert!(q.filter.region.is_none());
        assert_eq!(q.page.limit, 50);
    }

    #[test]
    fn test_negative_limit_clamps_to_zero() {
        assert_eq!(products(&[("limit", "-1")]).page.limit, 0);
    }

    #[test]
    fn test_suggestion_params() {
        let raw = SuggestionListParams {
            status: Some("pending".to_string()),
            suggestion_type: Some(String::new()),
            product_id: Some("1".to_string()),
            limit: Some("2".to_string()),
            offset: None,
        };
        let q = raw.into_query();
        assert_eq!(q.status.as_deref(), Some("pending"));
        assert!(q.suggestion_type.is_none());
        assert_eq!(q.page, PageRequest::new(2, 0));
    }

    #[test]
    fn test_trends_default_timeframe() {
        let q = KpiTrendsParams::default().into_query();
        assert_eq!(q.timeframe, "30d");
        assert!(q.kpi.is_none());
    }
}
