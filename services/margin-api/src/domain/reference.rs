//! 只读参考数据
//!
//! 告警、分析模板、趋势序列、对话历史等不随请求变化的数据

use std::collections::BTreeMap;

use marginiq_domain_core::ProductId;

use super::{
    Alert, AnalysisTrends, ChatMessage, RecentAnalysis, RootCause, Suggestion, TrendPoint,
};

#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub alerts: Vec<Alert>,
    pub recent_analyses: Vec<RecentAnalysis>,
    pub analysis_summary: String,
    pub analysis_suggestions: Vec<Suggestion>,
    pub root_causes: Vec<RootCause>,
    pub analysis_trends: AnalysisTrends,
    pub kpi_trends: BTreeMap<String, Vec<TrendPoint>>,
    pub chat_history: Vec<ChatMessage>,
    pub suggested_questions: Vec<String>,
}

impl ReferenceData {
    /// 为指定商品生成分析建议副本
    pub fn suggestions_for(&self, product_id: &ProductId) -> Vec<Suggestion> {
        self.analysis_suggestions
            .iter()
            .cloned()
            .map(|mut s| {
                s.product_id = product_id.clone();
                s
            })
            .collect()
    }
}
