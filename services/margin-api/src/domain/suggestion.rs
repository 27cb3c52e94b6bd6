//! 优化建议

use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use marginiq_domain_core::{Entity, ProductId};
use marginiq_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// 建议 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
#[display("{_0}")]
pub struct SuggestionId(pub String);

impl From<&str> for SuggestionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// 建议类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    PriceAdjustment,
    SupplierChange,
    PromotionAdjustment,
    BundleSuggestion,
}

impl SuggestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionType::PriceAdjustment => "price_adjustment",
            SuggestionType::SupplierChange => "supplier_change",
            SuggestionType::PromotionAdjustment => "promotion_adjustment",
            SuggestionType::BundleSuggestion => "bundle_suggestion",
        }
    }
}

/// 建议状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl SuggestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionStatus::Pending => "pending",
            SuggestionStatus::Approved => "approved",
            SuggestionStatus::Rejected => "rejected",
        }
    }
}

/// 优化建议
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: SuggestionId,
    #[serde(rename = "type")]
    pub suggestion_type: SuggestionType,
    pub title: String,
    pub description: String,
    pub impact: f64,
    pub confidence: f64,
    pub action: String,
    pub status: SuggestionStatus,
    pub product_id: ProductId,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl Suggestion {
    pub fn is_pending(&self) -> bool {
        self.status == SuggestionStatus::Pending
    }

    fn ensure_pending(&self) -> AppResult<()> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(AppError::validation("Suggestion is not pending approval"))
        }
    }

    /// 批准（仅 pending 状态）
    pub fn approve(&mut self, notes: Option<String>, at: DateTime<Utc>) -> AppResult<()> {
        self.ensure_pending()?;
        self.status = SuggestionStatus::Approved;
        self.approved_at = Some(at);
        if let Some(notes) = notes.filter(|n| !n.is_empty()) {
            self.approval_notes = Some(notes);
        }
        Ok(())
    }

    /// 驳回（仅 pending 状态）
    pub fn reject(&mut self, reason: String, at: DateTime<Utc>) -> AppResult<()> {
        self.ensure_pending()?;
        self.status = SuggestionStatus::Rejected;
        self.rejected_at = Some(at);
        self.rejection_reason = Some(reason);
        Ok(())
    }
}

impl Entity for Suggestion {
    type Id = SuggestionId;

    fn id(&self) -> &SuggestionId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> Suggestion {
        Suggestion {
            id: SuggestionId::from("1"),
            suggestion_type: SuggestionType::PriceAdjustment,
            title: "Raise price".to_string(),
            description: "Raise price to hold margin".to_string(),
            impact: 0.3,
            confidence: 0.85,
            action: "price_adjustment".to_string(),
            status: SuggestionStatus::Pending,
            product_id: ProductId::from("1"),
            created_at: Utc::now(),
            approved_at: None,
            approval_notes: None,
            rejected_at: None,
            rejection_reason: None,
        }
    }

    #[test]
    fn test_approve_pending() {
        let mut s = pending();
        s.approve(Some("ok by pricing".to_string()), Utc::now()).unwrap();
        assert_eq!(s.status, SuggestionStatus::Approved);
        assert!(s.approved_at.is_some());
        assert_eq!(s.approval_notes.as_deref(), Some("ok by pricing"));
    }

    #[test]
    fn test_approve_without_notes() {
        let mut s = pending();
        s.approve(None, Utc::now()).unwrap();
        assert!(s.approval_notes.is_none());
    }

    #[test]
    fn test_reject_pending() {
        let mut s = pending();
        s.reject("No inventory system support".to_string(), Utc::now())
            .unwrap();
        assert_eq!(s.status, SuggestionStatus::Rejected);
        assert_eq!(
            s.rejection_reason.as_deref(),
            Some("No inventory system support")
        );
    }

    #[test]
    fn test_only_pending_can_transition() {
        let mut s = pending();
        s.approve(None, Utc::now()).unwrap();

        let err = s.reject("late".to_string(), Utc::now()).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Suggestion is not pending approval");
        assert!(s.approve(None, Utc::now()).is_err());
        assert_eq!(s.status, SuggestionStatus::Approved);
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(pending()).unwrap();
        assert_eq!(value["type"], "price_adjustment");
        assert_eq!(value["status"], "pending");
        assert_eq!(value["productId"], "1");
        assert!(value.get("approvedAt").is_none());
    }
}
