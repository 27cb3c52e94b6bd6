//! 内置演示数据

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use marginiq_errors::{AppError, AppResult};

use crate::domain::{
    Alert, AlertLevel, AnalysisTrends, CauseTrend, ChatMessage, KpiMetric, KpiStatus, KpiTrend,
    MarginTrend, MessageRole, OverallTrend, Product, ProductId, ProductStatus, RecentAnalysis,
    ReferenceData, RootCause, SegmentTrend, Suggestion, SuggestionId, SuggestionStatus,
    SuggestionType, TrendPoint,
};

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    sku: &str,
    name: &str,
    category: &str,
    region: &str,
    (price, cogs, margin, margin_delta): (f64, f64, f64, f64),
    (tariff_impact, shrink_rate): (f64, f64),
    supplier: &str,
    last_updated: DateTime<Utc>,
) -> Product {
    Product {
        id: ProductId::from(id),
        sku: sku.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        region: region.to_string(),
        price,
        cogs,
        margin,
        margin_delta,
        tariff_impact,
        shrink_rate,
        supplier: supplier.to_string(),
        last_updated,
        status: ProductStatus::Active,
    }
}

/// 演示商品目录
pub fn products() -> Vec<Product> {
    vec![
        product(
            "1",
            "44577",
            "Great Value Olive Oil",
            "Pantry",
            "Northeast",
            (3.98, 3.45, 13.3, -2.1),
            (0.8, 1.2),
            "Mediterranean Imports",
            at(10, 30),
        ),
        product(
            "2",
            "89234",
            "Organic Milk 1/2 Gallon",
            "Dairy",
            "Southeast",
            (4.29, 4.15, 3.3, -1.8),
            (0.0, 3.5),
            "Local Dairy Co",
            at(9, 15),
        ),
        product(
            "3",
            "15678",
            "Premium Coffee Beans",
            "Beverages",
            "West",
            (12.99, 8.50, 34.6, 1.2),
            (2.1, 0.8),
            "Global Coffee Inc",
            at(11, 45),
        ),
        product(
            "4",
            "33456",
            "Fresh Strawberries",
            "Produce",
            "Southwest",
            (3.99, 4.25, -6.5, -8.2),
            (0.0, 12.5),
            "Berry Farms LLC",
            at(8, 20),
        ),
    ]
}

/// 从 JSON 文件加载商品（数组格式）
pub async fn load_products_file(path: impl AsRef<Path>) -> AppResult<Vec<Product>> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::config(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| AppError::config(format!("invalid product file {}: {e}", path.display())))
}

#[allow(clippy::too_many_arguments)]
fn suggestion(
    id: &str,
    suggestion_type: SuggestionType,
    title: &str,
    description: &str,
    (impact, confidence): (f64, f64),
    action: &str,
    product_id: &str,
    created_at: DateTime<Utc>,
) -> Suggestion {
    Suggestion {
        id: SuggestionId::from(id),
        suggestion_type,
        title: title.to_string(),
        description: description.to_string(),
        impact,
        confidence,
        action: action.to_string(),
        status: SuggestionStatus::Pending,
        product_id: ProductId::from(product_id),
        created_at,
        approved_at: None,
        approval_notes: None,
        rejected_at: None,
        rejection_reason: None,
    }
}

/// 演示优化建议
pub fn suggestions() -> Vec<Suggestion> {
    let mut approved = suggestion(
        "4",
        SuggestionType::PriceAdjustment,
        "Increase price by $0.50",
        "Adjust price for organic milk to cover increased COGS",
        (0.50, 0.88),
        "price_adjustment",
        "2",
        at(9, 15),
    );
    approved.status = SuggestionStatus::Approved;
    approved.approved_at = Some(at(11, 0));

    let mut rejected = suggestion(
        "5",
        SuggestionType::BundleSuggestion,
        "Bundle with complementary product",
        "Bundle coffee beans with filters to increase overall margin",
        (0.25, 0.75),
        "bundle_creation",
        "3",
        at(11, 45),
    );
    rejected.status = SuggestionStatus::Rejected;
    rejected.rejected_at = Some(at(12, 30));
    rejected.rejection_reason = Some("Not feasible with current inventory system".to_string());

    vec![
        suggestion(
            "1",
            SuggestionType::PriceAdjustment,
            "Raise price from $3.98 → $4.28",
            "Increase price by 7.5% to maintain target margin for Great Value Olive Oil",
            (0.30, 0.85),
            "price_adjustment",
            "1",
            at(10, 30),
        ),
        suggestion(
            "2",
            SuggestionType::SupplierChange,
            "Use domestic supplier (save $0.40/unit)",
            "Switch to US-based supplier to avoid tariff impact for olive oil",
            (0.40, 0.92),
            "supplier_change",
            "1",
            at(10, 30),
        ),
        suggestion(
            "3",
            SuggestionType::PromotionAdjustment,
            "Remove current promotion",
            "Current promotion is hurting margin by 2.1% for dairy products",
            (0.08, 0.78),
            "promotion_removal",
            "2",
            at(9, 15),
        ),
        approved,
        rejected,
    ]
}

fn kpi(
    name: &str,
    (value, change, target): (f64, f64, f64),
    unit: &str,
    trend: KpiTrend,
    status: KpiStatus,
) -> KpiMetric {
    KpiMetric {
        name: name.to_string(),
        value,
        unit: unit.to_string(),
        change,
        trend,
        status,
        target,
        last_updated: at(12, 0),
    }
}

/// 演示 KPI
pub fn kpis() -> Vec<KpiMetric> {
    use KpiStatus::{Positive, Warning};
    use KpiTrend::{Down, Up};

    vec![
        kpi("Average Gross Margin", (12.4, 0.8, 15.0), "%", Up, Positive),
        kpi("At-Risk SKUs", (247.0, -12.0, 200.0), "items", Down, Positive),
        kpi("Tariff Impact", (2.1, 0.3, 1.5), "%", Up, Warning),
        kpi("Shrink Loss", (1.8, -0.2, 2.0), "%", Down, Positive),
        kpi("Total Revenue", (1_250_000.0, 45_000.0, 1_200_000.0), "$", Up, Positive),
        kpi(
            "Cost of Goods Sold",
            (1_095_000.0, 38_000.0, 1_050_000.0),
            "$",
            Up,
            Warning,
        ),
    ]
}

fn segment(trend: MarginTrend, change: f64) -> SegmentTrend {
    SegmentTrend { trend, change }
}

fn series(values: [f64; 4]) -> Vec<TrendPoint> {
    [1, 5, 10, 15]
        .into_iter()
        .zip(values)
        .map(|(d, value)| TrendPoint { date: day(d), value })
        .collect()
}

fn message(id: &str, role: MessageRole, content: &str, at: DateTime<Utc>) -> ChatMessage {
    ChatMessage {
        id: id.to_string(),
        role,
        content: content.to_string(),
        timestamp: at,
        metadata: None,
    }
}

const NEGATIVE_MARGIN_REPLY: &str = "Products currently with negative margins:\n\n🚨 **Critical Issues:**\n• Fresh Strawberries (-6.5% margin)\n• Organic Milk (-2.1% margin)\n• Imported Cheese (-1.8% margin)\n\n**Immediate Actions Needed:**\n1. Review pricing strategy\n2. Negotiate with suppliers\n3. Consider product discontinuation\n4. Implement shrink reduction measures";

/// 只读参考数据；对话历史的时间相对 `now` 计算
pub fn reference(now: DateTime<Utc>) -> ReferenceData {
    use MarginTrend::{Declining, Improving, Stable};

    let analysis_suggestions = vec![
        suggestion(
            "1",
            SuggestionType::PriceAdjustment,
            "Raise price from $3.98 → $4.28",
            "Increase price by 7.5% to maintain target margin",
            (0.30, 0.85),
            "price_adjustment",
            "",
            now,
        ),
        suggestion(
            "2",
            SuggestionType::SupplierChange,
            "Use domestic supplier (save $0.40/unit)",
            "Switch to US-based supplier to avoid tariff impact",
            (0.40, 0.92),
            "supplier_change",
            "",
            now,
        ),
        suggestion(
            "3",
            SuggestionType::PromotionAdjustment,
            "Remove current promotion",
            "Current promotion is hurting margin by 2.1%",
            (0.08, 0.78),
            "promotion_removal",
            "",
            now,
        ),
    ];

    let root_causes = vec![
        RootCause {
            factor: "Import Tariffs".to_string(),
            impact: 0.8,
            description: "12% increase in olive oil import duties from Italy".to_string(),
            trend: CauseTrend::Increasing,
        },
        RootCause {
            factor: "Shrink Rate".to_string(),
            impact: 1.2,
            description: "Higher than average shrink in refrigerated storage".to_string(),
            trend: CauseTrend::Stable,
        },
        RootCause {
            factor: "Supplier Costs".to_string(),
            impact: 0.5,
            description: "Supplier increased base cost by 3.2%".to_string(),
            trend: CauseTrend::Increasing,
        },
    ];

    let analysis_trends = AnalysisTrends {
        overall: OverallTrend {
            trend: Declining,
            change: -0.8,
            period: "30 days".to_string(),
        },
        by_category: BTreeMap::from([
            ("Dairy".to_string(), segment(Declining, -2.1)),
            ("Produce".to_string(), segment(Declining, -1.8)),
            ("Beverages".to_string(), segment(Stable, 0.2)),
            ("Pantry".to_string(), segment(Improving, 0.5)),
        ]),
        by_region: BTreeMap::from([
            ("Northeast".to_string(), segment(Declining, -1.2)),
            ("Southeast".to_string(), segment(Declining, -0.9)),
            ("West".to_string(), segment(Stable, 0.1)),
            ("Southwest".to_string(), segment(Improving, 0.3)),
        ]),
    };

    let kpi_trends = BTreeMap::from([
        (
            "Average Gross Margin".to_string(),
            series([12.1, 12.2, 12.3, 12.4]),
        ),
        (
            "At-Risk SKUs".to_string(),
            series([259.0, 255.0, 251.0, 247.0]),
        ),
        ("Tariff Impact".to_string(), series([1.8, 1.9, 2.0, 2.1])),
    ]);

    let chat_history = vec![
        message(
            "1",
            MessageRole::Assistant,
            "Hello! I'm MarginIQ, your AI assistant for margin analysis. I can help you understand margin trends, identify at-risk products, and suggest improvements. What would you like to know?",
            now - Duration::hours(1),
        ),
        message(
            "2",
            MessageRole::User,
            "Which products have negative margins?",
            now - Duration::minutes(30),
        ),
        message(
            "3",
            MessageRole::Assistant,
            NEGATIVE_MARGIN_REPLY,
            now - Duration::minutes(15),
        ),
    ];

    let suggested_questions = [
        "Which top 10 items lost margin this month?",
        "What categories are most affected by tariffs?",
        "Why are beverage margins falling in Florida?",
        "Show me products with negative margins",
        "What's the impact of recent tariff changes?",
        "Which suppliers have the highest cost increases?",
        "How are dairy margins trending?",
        "What's causing shrink in produce?",
        "Which regions have the best margins?",
        "How can we improve coffee bean margins?",
    ]
    .map(String::from)
    .to_vec();

    ReferenceData {
        alerts: vec![
            Alert {
                id: "1".to_string(),
                level: AlertLevel::Critical,
                message: "Strawberries margin dropped to -6.5%".to_string(),
                timestamp: at(8, 20),
                product_id: ProductId::from("4"),
            },
            Alert {
                id: "2".to_string(),
                level: AlertLevel::Warning,
                message: "Coffee beans tariff impact increased".to_string(),
                timestamp: at(11, 45),
                product_id: ProductId::from("3"),
            },
            Alert {
                id: "3".to_string(),
                level: AlertLevel::Info,
                message: "Olive oil margin improved by 2.1%".to_string(),
                timestamp: at(10, 30),
                product_id: ProductId::from("1"),
            },
        ],
        recent_analyses: vec![
            RecentAnalysis {
                product_id: ProductId::from("1"),
                analysis: "Margin fell due to 12% increase in import duty from Italy".to_string(),
                timestamp: at(10, 30),
            },
            RecentAnalysis {
                product_id: ProductId::from("2"),
                analysis: "Dairy margins impacted by increased wholesale milk prices".to_string(),
                timestamp: at(9, 15),
            },
        ],
        analysis_summary: "Margin fell due to 12% increase in import duty from Italy and higher shrink in refrigerated storage at 243 locations.".to_string(),
        analysis_suggestions,
        root_causes,
        analysis_trends,
        kpi_trends,
        chat_history,
        suggested_questions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marginiq_common::new_id;

    #[test]
    fn test_seed_ids_are_unique() {
        let ids: Vec<_> = products().into_iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 4);
        assert!(ids.windows(2).all(|w| w[0] != w[1]));
        assert_eq!(suggestions().len(), 5);
        assert_eq!(kpis().len(), 6);
    }

    #[test]
    fn test_reference_history_is_relative_to_now() {
        let now = Utc::now();
        let data = reference(now);
        assert_eq!(data.chat_history.len(), 3);
        assert_eq!(data.chat_history[0].timestamp, now - Duration::hours(1));
        assert!(data.chat_history.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert_eq!(data.suggested_questions.len(), 10);
    }

    #[test]
    fn test_reference_kpi_series_end_at_seed_values() {
        let data = reference(Utc::now());
        for kpi in kpis() {
            if let Some(points) = data.kpi_trends.get(&kpi.name) {
                assert_eq!(points.last().map(|p| p.value), Some(kpi.value));
            }
        }
    }

    #[tokio::test]
    async fn test_load_products_file() {
        let path = std::env::temp_dir().join(format!("marginiq-seed-{}.json", new_id()));
        let body = serde_json::to_string(&products()).unwrap();
        tokio::fs::write(&path, body).await.unwrap();

        let loaded = load_products_file(&path).await.unwrap();
        assert_eq!(loaded, products());

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_load_products_file_errors() {
        let err = load_products_file("/nonexistent/products.json")
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 500);

        let path = std::env::temp_dir().join(format!("marginiq-bad-{}.json", new_id()));
        tokio::fs::write(&path, "{ not json").await.unwrap();
        assert!(load_products_file(&path).await.is_err());
        tokio::fs::remove_file(&path).await.unwrap();
    }
}
