//! KPI 指标

use chrono::{DateTime, NaiveDate, Utc};
use marginiq_common::slugify;
use marginiq_domain_core::Entity;
use serde::{Deserialize, Serialize};

/// 变化方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiTrend {
    Up,
    Down,
    Stable,
}

/// 指标评价
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiStatus {
    Positive,
    Negative,
    Warning,
    Neutral,
}

/// KPI 指标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiMetric {
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub change: f64,
    pub trend: KpiTrend,
    pub status: KpiStatus,
    pub target: f64,
    pub last_updated: DateTime<Utc>,
}

impl KpiMetric {
    /// URL 中使用的 slug
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    pub fn matches_slug(&self, slug: &str) -> bool {
        self.slug() == slug.to_lowercase()
    }

    /// 上升趋势要求 value >= target，其余要求 value <= target
    pub fn is_on_target(&self) -> bool {
        match self.trend {
            KpiTrend::Up => self.value >= self.target,
            _ => self.value <= self.target,
        }
    }
}

impl Entity for KpiMetric {
    type Id = String;

    fn id(&self) -> &String {
        &self.name
    }
}

/// 趋势数据点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// KPI 汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    #[serde(rename = "totalKPIs")]
    pub total_kpis: usize,
    pub positive_trends: usize,
    pub negative_trends: usize,
    pub on_target: usize,
    pub last_updated: DateTime<Utc>,
}

impl KpiSummary {
    pub fn from_kpis(kpis: &[KpiMetric], now: DateTime<Utc>) -> Self {
        Self {
            total_kpis: kpis.len(),
            positive_trends: kpis.iter().filter(|k| k.trend == KpiTrend::Up).count(),
            negative_trends: kpis.iter().filter(|k| k.trend == KpiTrend::Down).count(),
            on_target: kpis.iter().filter(|k| k.is_on_target()).count(),
            last_updated: now,
        }
    }
}

/// 由原始商品数据计算出的单个 KPI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculatedKpi {
    pub value: f64,
    pub unit: String,
    pub change: f64,
    pub trend: KpiTrend,
    pub status: KpiStatus,
}

/// 由原始商品数据计算出的 KPI 集合
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculatedKpis {
    #[serde(rename = "Average Gross Margin")]
    pub average_gross_margin: CalculatedKpi,
    #[serde(rename = "At-Risk SKUs")]
    pub at_risk_skus: CalculatedKpi,
    #[serde(rename = "Total Products")]
    pub total_products: CalculatedKpi,
}

/// 低于该毛利率视为风险 SKU
pub const AT_RISK_MARGIN: f64 = 5.0;

impl CalculatedKpis {
    /// 空集合时平均毛利记为 0
    pub fn from_margins(margins: &[f64]) -> Self {
        let count = margins.len();
        let average = if count == 0 {
            0.0
        } else {
            margins.iter().sum::<f64>() / count as f64
        };
        let at_risk = margins.iter().filter(|m| **m < AT_RISK_MARGIN).count();

        Self {
            average_gross_margin: CalculatedKpi {
                value: average,
                unit: "%".to_string(),
                change: 0.5,
                trend: KpiTrend::Up,
                status: KpiStatus::Positive,
            },
            at_risk_skus: CalculatedKpi {
                value: at_risk as f64,
                unit: "items".to_string(),
                change: -5.0,
                trend: KpiTrend::Down,
                status: KpiStatus::Positive,
            },
            total_products: CalculatedKpi {
                value: count as f64,
                unit: "items".to_string(),
                change: 0.0,
                trend: KpiTrend::Stable,
                status: KpiStatus::Neutral,
            },
        }
    }
}
