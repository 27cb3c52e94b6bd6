//! 统计汇总

use marginiq_domain_core::{Product, ProductStatus};
use serde::Serialize;

use super::{AT_RISK_MARGIN, Suggestion, SuggestionStatus};

fn average(sum: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// 商品统计
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub total: usize,
    pub active: usize,
    pub discontinued: usize,
    pub negative_margin: usize,
    /// 0 <= margin < 5
    pub low_margin: usize,
    pub average_margin: f64,
    pub total_tariff_impact: f64,
    pub average_shrink_rate: f64,
}

impl ProductStats {
    pub fn from_products(products: &[Product]) -> Self {
        let count_status =
            |status: ProductStatus| products.iter().filter(|p| p.status == status).count();

        Self {
            total: products.len(),
            active: count_status(ProductStatus::Active),
            discontinued: count_status(ProductStatus::Discontinued),
            negative_margin: products.iter().filter(|p| p.is_negative_margin()).count(),
            low_margin: products
                .iter()
                .filter(|p| p.margin >= 0.0 && p.margin < AT_RISK_MARGIN)
                .count(),
            average_margin: average(products.iter().map(|p| p.margin).sum(), products.len()),
            total_tariff_impact: products.iter().map(|p| p.tariff_impact).sum(),
            average_shrink_rate: average(
                products.iter().map(|p| p.shrink_rate).sum(),
                products.len(),
            ),
        }
    }
}

/// 建议统计
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    /// 仅统计已批准建议
    pub total_impact: f64,
    pub average_confidence: f64,
}

impl SuggestionStats {
    pub fn from_suggestions(suggestions: &[Suggestion]) -> Self {
        let count_status = |status: SuggestionStatus| {
            suggestions.iter().filter(|s| s.status == status).count()
        };

        Self {
            total: suggestions.len(),
            pending: count_status(SuggestionStatus::Pending),
            approved: count_status(SuggestionStatus::Approved),
            rejected: count_status(SuggestionStatus::Rejected),
            total_impact: suggestions
                .iter()
                .filter(|s| s.status == SuggestionStatus::Approved)
                .map(|s| s.impact)
                .sum(),
            average_confidence: average(
                suggestions.iter().map(|s| s.confidence).sum(),
                suggestions.len(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::seed;

    #[test]
    fn test_product_stats_on_seed() {
        let stats = ProductStats::from_products(&seed::products());
        assert_eq!(stats.total, 4);
        assert_eq!(stats.active, 4);
        assert_eq!(stats.discontinued, 0);
        assert_eq!(stats.negative_margin, 1);
        assert_eq!(stats.low_margin, 1);
        assert!((stats.average_margin - 11.175).abs() < 1e-9);
        assert!((stats.total_tariff_impact - 2.9).abs() < 1e-9);
        assert!((stats.average_shrink_rate - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_product_stats_empty() {
        let stats = ProductStats::from_products(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_margin, 0.0);
        assert_eq!(stats.average_shrink_rate, 0.0);
    }

    #[test]
    fn test_suggestion_stats_on_seed() {
        let stats = SuggestionStats::from_suggestions(&seed::suggestions());
        assert_eq!(stats.total, 5);
        assert_eq!(stats.pending, 3);
        assert_eq!(stats.approved, 1);
        assert_eq!(stats.rejected, 1);
        assert!((stats.total_impact - 0.5).abs() < 1e-9);
        assert!((stats.average_confidence - 0.836).abs() < 1e-9);
    }
}
