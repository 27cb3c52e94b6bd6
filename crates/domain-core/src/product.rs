//! 商品记录

use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

use crate::Entity;

/// 商品 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
#[display("{_0}")]
pub struct ProductId(pub String);

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// 商品状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// 在售
    #[default]
    Active,
    /// 停售
    Discontinued,
    /// 促销
    Promotional,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Discontinued => "discontinued",
            ProductStatus::Promotional => "promotional",
        }
    }

    /// 不区分大小写解析
    pub fn parse(value: &str) -> Option<Self> {
        [Self::Active, Self::Discontinued, Self::Promotional]
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

/// 商品记录
///
/// `margin` 仅作展示用途，不会根据 `price` / `cogs` 重新计算。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub region: String,
    pub price: f64,
    pub cogs: f64,
    /// 毛利率（%）
    pub margin: f64,
    /// 毛利率周环比变化
    pub margin_delta: f64,
    /// 关税影响（%）
    pub tariff_impact: f64,
    /// 损耗率（%）
    pub shrink_rate: f64,
    pub supplier: String,
    pub last_updated: DateTime<Utc>,
    pub status: ProductStatus,
}

impl Product {
    pub fn is_negative_margin(&self) -> bool {
        self.margin < 0.0
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &ProductId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(ProductStatus::parse("ACTIVE"), Some(ProductStatus::Active));
        assert_eq!(
            ProductStatus::parse("Promotional"),
            Some(ProductStatus::Promotional)
        );
        assert_eq!(ProductStatus::parse("archived"), None);
    }

    #[test]
    fn test_product_json_shape() {
        let json = r#"{
            "id": "1",
            "sku": "44577",
            "name": "Great Value Olive Oil",
            "category": "Pantry",
            "region": "Northeast",
            "price": 3.98,
            "cogs": 3.45,
            "margin": 13.3,
            "marginDelta": -2.1,
            "tariffImpact": 0.8,
            "shrinkRate": 1.2,
            "supplier": "Mediterranean Imports",
            "lastUpdated": "2024-01-15T10:30:00Z",
            "status": "active"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::from("1"));
        assert_eq!(product.margin_delta, -2.1);
        assert_eq!(product.status, ProductStatus::Active);

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["id"], "1");
        assert_eq!(value["tariffImpact"], 0.8);
        assert_eq!(value["lastUpdated"], "2024-01-15T10:30:00Z");
    }

    #[test]
    fn test_margin_is_not_recomputed() {
        let json = r#"{
            "id": "9", "sku": "1", "name": "Odd", "category": "Misc", "region": "West",
            "price": 10.0, "cogs": 1.0, "margin": -50.0, "marginDelta": 0.0,
            "tariffImpact": 0.0, "shrinkRate": 0.0, "supplier": "S",
            "lastUpdated": "2024-01-01T00:00:00Z", "status": "discontinued"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.margin, -50.0);
        assert!(product.is_negative_margin());
    }
}
