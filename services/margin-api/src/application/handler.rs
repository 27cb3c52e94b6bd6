//! 业务逻辑处理器

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use marginiq_bootstrap::record_product_query;
use marginiq_common::{PageRequest, PagedResult, new_id};
use marginiq_domain_core::{
    Product, ProductId, QueryParams, QueryResult, SortField, SortOrder, query,
};
use marginiq_errors::{AppError, AppResult};
use marginiq_ports::{LlmClient, Prompt};
use tracing::{debug, error, info};

use crate::domain::repositories::{KpiRepository, ProductRepository, SuggestionRepository};
use crate::domain::{
    AT_RISK_MARGIN, Alert, AnalysisTrends, CalculatedKpis, ChatMessage, ChatMetadata, KpiMetric,
    KpiSummary, MarginAnalysis, MessageRole, ProductStats, ReferenceData, Suggestion,
    SuggestionId, SuggestionStats, SuggestionStatus, SuggestionType,
};

use super::commands::*;
use super::queries::*;

/// 对话助手的角色设定
pub const ASSISTANT_PERSONA: &str = "You are MarginIQ, Walmart's margin intelligence assistant. Use the following data to answer the user's question.";

/// 对话上下文中列出的毛利损失商品数
pub const MARGIN_LOSS_CONTEXT_SIZE: usize = 10;

pub struct ServiceHandler {
    products: Arc<ProductRepository>,
    suggestions: Arc<SuggestionRepository>,
    kpis: Arc<KpiRepository>,
    assistant: Arc<dyn LlmClient>,
    reference: ReferenceData,
}

impl ServiceHandler {
    pub fn new(
        products: Arc<ProductRepository>,
        suggestions: Arc<SuggestionRepository>,
        kpis: Arc<KpiRepository>,
        assistant: Arc<dyn LlmClient>,
        reference: ReferenceData,
    ) -> Self {
        Self {
            products,
            suggestions,
            kpis,
            assistant,
            reference,
        }
    }

    // ========== 商品 ==========

    async fn run_query(&self, params: &QueryParams, source: &str) -> AppResult<QueryResult> {
        let snapshot = self.products.find_all().await?;

        let started = Instant::now();
        let result = query(&snapshot, params);
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        record_product_query(source, result.total, elapsed_ms);
        debug!(
            source,
            sort_by = params.sort_by.as_str(),
            total = result.total,
            returned = result.page.len(),
            "Product query executed"
        );
        Ok(result)
    }

    /// 商品列表（过滤 → 排序 → 分页）
    pub async fn list_products(
        &self,
        params: &QueryParams,
        source: &str,
    ) -> AppResult<PagedResult<Product>> {
        let result = self.run_query(params, source).await?;
        Ok(PagedResult::new(result.page, result.total, &params.page))
    }

    pub async fn get_product(&self, product_id: &ProductId) -> AppResult<Product> {
        self.products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| AppError::not_found("Product not found"))
    }

    /// 部分更新商品
    pub async fn update_product(&self, cmd: UpdateProductCommand) -> AppResult<Product> {
        info!(product_id = %cmd.product_id, "Updating product");

        let now = Utc::now();
        let patch = cmd.patch;
        self.products
            .modify(
                &cmd.product_id,
                Box::new(move |product: &mut Product| {
                    patch.apply_to(product, now);
                    Ok(())
                }),
            )
            .await?
            .ok_or_else(|| AppError::not_found("Product not found"))
    }

    async fn distinct_product_values(&self, field: fn(&Product) -> &str) -> AppResult<Vec<String>> {
        let products = self.products.find_all().await?;
        let mut seen = HashSet::new();
        Ok(products
            .iter()
            .map(field)
            .filter(|value| seen.insert(*value))
            .map(str::to_string)
            .collect())
    }

    /// 品类（首次出现顺序）
    pub async fn product_categories(&self) -> AppResult<Vec<String>> {
        self.distinct_product_values(|p| p.category.as_str()).await
    }

    pub async fn product_regions(&self) -> AppResult<Vec<String>> {
        self.distinct_product_values(|p| p.region.as_str()).await
    }

    pub async fn product_suppliers(&self) -> AppResult<Vec<String>> {
        self.distinct_product_values(|p| p.supplier.as_str()).await
    }

    pub async fn product_stats(&self) -> AppResult<ProductStats> {
        let products = self.products.find_all().await?;
        Ok(ProductStats::from_products(&products))
    }

    // ========== 仪表盘 ==========

    pub async fn dashboard(&self) -> AppResult<DashboardView> {
        let kpis = self.kpis.find_all().await?;
        let products = self.products.find_all().await?;
        let top_issues = products
            .iter()
            .filter(|p| p.margin < AT_RISK_MARGIN)
            .cloned()
            .collect();

        Ok(DashboardView {
            kpis,
            products,
            top_issues,
            recent_analyses: self.reference.recent_analyses.clone(),
            last_updated: Utc::now(),
        })
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.reference.alerts.clone()
    }

    // ========== 优化建议 ==========

    pub async fn list_suggestions(
        &self,
        query: &ListSuggestionsQuery,
    ) -> AppResult<PagedResult<Suggestion>> {
        let matched: Vec<Suggestion> = self
            .suggestions
            .find_all()
            .await?
            .into_iter()
            .filter(|s| query.matches(s))
            .collect();
        Ok(query.page.paginate(&matched))
    }

    pub async fn get_suggestion(&self, suggestion_id: &SuggestionId) -> AppResult<Suggestion> {
        self.suggestions
            .find_by_id(suggestion_id)
            .await?
            .ok_or_else(|| AppError::not_found("Suggestion not found"))
    }

    /// 批准建议（仅 pending）
    pub async fn approve_suggestion(&self, cmd: ApproveSuggestionCommand) -> AppResult<Suggestion> {
        info!(suggestion_id = %cmd.suggestion_id, "Approving suggestion");

        let now = Utc::now();
        let notes = cmd.notes;
        let approved = self
            .suggestions
            .modify(
                &cmd.suggestion_id,
                Box::new(move |s: &mut Suggestion| s.approve(notes, now)),
            )
            .await?
            .ok_or_else(|| AppError::not_found("Suggestion not found"))?;

        info!(suggestion_id = %approved.id, "Suggestion approved");
        Ok(approved)
    }

    /// 驳回建议：先校验理由，再查找
    pub async fn reject_suggestion(&self, cmd: RejectSuggestionCommand) -> AppResult<Suggestion> {
        let reason = cmd.reason()?;
        info!(suggestion_id = %cmd.suggestion_id, "Rejecting suggestion");

        let now = Utc::now();
        let rejected = self
            .suggestions
            .modify(
                &cmd.suggestion_id,
                Box::new(move |s: &mut Suggestion| s.reject(reason, now)),
            )
            .await?
            .ok_or_else(|| AppError::not_found("Suggestion not found"))?;

        info!(suggestion_id = %rejected.id, "Suggestion rejected");
        Ok(rejected)
    }

    /// 为商品生成一条待审批的定价建议并保存
    pub async fn generate_suggestions(
        &self,
        cmd: GenerateSuggestionsCommand,
    ) -> AppResult<Vec<Suggestion>> {
        let product_id = cmd.product_id()?;
        let product = self.get_product(&product_id).await?;
        info!(
            product_id = %product.id,
            analysis_type = cmd.analysis_type.as_deref().unwrap_or(DEFAULT_ANALYSIS_TYPE),
            "Generating suggestions"
        );

        let suggestion = Suggestion {
            id: SuggestionId(new_id().to_string()),
            suggestion_type: SuggestionType::PriceAdjustment,
            title: "Optimize pricing strategy".to_string(),
            description: "AI-generated suggestion based on market analysis".to_string(),
            impact: 0.25,
            confidence: 0.82,
            action: "price_optimization".to_string(),
            status: SuggestionStatus::Pending,
            product_id: product.id,
            created_at: Utc::now(),
            approved_at: None,
            approval_notes: None,
            rejected_at: None,
            rejection_reason: None,
        };
        self.suggestions.save(suggestion.clone()).await?;

        Ok(vec![suggestion])
    }

    pub async fn suggestion_stats(&self) -> AppResult<SuggestionStats> {
        let suggestions = self.suggestions.find_all().await?;
        Ok(SuggestionStats::from_suggestions(&suggestions))
    }

    // ========== KPI ==========

    pub async fn list_kpis(&self, query: &ListKpisQuery) -> AppResult<Vec<KpiMetric>> {
        let kpis = self.kpis.find_all().await?;
        let Some(category) = query.category.as_deref().map(str::to_lowercase) else {
            return Ok(kpis);
        };
        Ok(kpis
            .into_iter()
            .filter(|k| k.name.to_lowercase().contains(&category))
            .collect())
    }

    pub async fn get_kpi(&self, slug: &str) -> AppResult<KpiMetric> {
        let slug = slug.trim();
        self.kpis
            .find_all()
            .await?
            .into_iter()
            .find(|k| k.matches_slug(slug))
            .ok_or_else(|| AppError::not_found("KPI not found"))
    }

    /// 更新目标值：先确认 KPI 存在，再校验目标值
    pub async fn update_kpi_target(&self, cmd: UpdateKpiTargetCommand) -> AppResult<KpiMetric> {
        let kpi = self.get_kpi(&cmd.slug).await?;
        let target = cmd
            .target
            .ok_or_else(|| AppError::validation("Target value is required"))?;
        info!(kpi = %kpi.name, target, "Updating KPI target");

        let now = Utc::now();
        self.kpis
            .modify(
                &kpi.name,
                Box::new(move |k: &mut KpiMetric| {
                    k.target = target;
                    k.last_updated = now;
                    Ok(())
                }),
            )
            .await?
            .ok_or_else(|| AppError::not_found("KPI not found"))
    }

    pub fn kpi_trends(&self, query: KpiTrendsQuery) -> KpiTrendsView {
        let trends = match &query.kpi {
            None => TrendSeries::All(self.reference.kpi_trends.clone()),
            Some(name) => TrendSeries::One(self.reference.kpi_trends.get(name).cloned()),
        };
        KpiTrendsView {
            timeframe: query.timeframe,
            trends,
        }
    }

    pub async fn kpi_summary(&self) -> AppResult<KpiSummary> {
        let kpis = self.kpis.find_all().await?;
        Ok(KpiSummary::from_kpis(&kpis, Utc::now()))
    }

    pub fn calculate_kpis(&self, cmd: CalculateKpisCommand) -> AppResult<CalculatedKpis> {
        let margins = cmd
            .margins
            .ok_or_else(|| AppError::validation("Products array is required"))?;
        Ok(CalculatedKpis::from_margins(&margins))
    }

    // ========== 毛利分析 ==========

    fn analysis_for(&self, product_id: ProductId, analysis_type: Option<String>) -> MarginAnalysis {
        MarginAnalysis {
            suggestions: self.reference.suggestions_for(&product_id),
            product_id,
            analysis_type,
            analysis: self.reference.analysis_summary.clone(),
            root_causes: self.reference.root_causes.clone(),
            timestamp: Utc::now(),
        }
    }

    pub async fn product_analysis(&self, product_id: &ProductId) -> AppResult<MarginAnalysis> {
        let product = self.get_product(product_id).await?;
        Ok(self.analysis_for(product.id, None))
    }

    pub async fn generate_analysis(&self, cmd: GenerateAnalysisCommand) -> AppResult<MarginAnalysis> {
        let product = self.get_product(&cmd.product_id()?).await?;
        let analysis_type = cmd.analysis_type();
        info!(product_id = %product.id, %analysis_type, "Generating analysis");
        Ok(self.analysis_for(product.id, Some(analysis_type)))
    }

    pub fn analysis_trends(&self) -> AnalysisTrends {
        self.reference.analysis_trends.clone()
    }

    // ========== 对话 ==========

    /// 毛利损失最多的商品（毛利升序）
    async fn margin_loss_context(&self) -> AppResult<String> {
        let params = QueryParams::default()
            .sorted_by(SortField::Margin, SortOrder::Asc)
            .with_page(PageRequest::new(MARGIN_LOSS_CONTEXT_SIZE, 0));
        let result = self.run_query(&params, "chat").await?;

        let lines: Vec<String> = result
            .page
            .iter()
            .enumerate()
            .map(|(i, p)| {
                format!(
                    "{}. {} (Current margin: {}%, Change: {}%)",
                    i + 1,
                    p.name,
                    p.margin,
                    p.margin_delta
                )
            })
            .collect();
        Ok(format!(
            "Here are the top 10 items that lost margin this month:\n{}",
            lines.join("\n")
        ))
    }

    /// 构造发给助手的 prompt
    pub async fn build_prompt(&self, message: &str) -> AppResult<Prompt> {
        let prompt = Prompt::new(ASSISTANT_PERSONA, message);
        if !asks_for_margin_loss(message) {
            return Ok(prompt);
        }
        Ok(prompt.with_context(self.margin_loss_context().await?))
    }

    pub async fn send_message(&self, cmd: SendMessageCommand) -> AppResult<ChatMessage> {
        let prompt = self.build_prompt(cmd.message()?).await?;
        debug!(
            backend = self.assistant.name(),
            with_context = !prompt.context.is_empty(),
            "Forwarding chat message"
        );

        let content = self.assistant.generate(&prompt).await.map_err(|e| {
            error!(backend = self.assistant.name(), error = %e, "Assistant call failed");
            AppError::internal("Failed to process message")
        })?;

        Ok(ChatMessage {
            id: new_id().to_string(),
            role: MessageRole::Assistant,
            content,
            timestamp: Utc::now(),
            metadata: Some(ChatMetadata {
                query_type: Some("margin_analysis".to_string()),
                suggestions: Vec::new(),
            }),
        })
    }

    pub fn chat_history(&self, page: PageRequest) -> PagedResult<ChatMessage> {
        page.paginate(&self.reference.chat_history)
    }

    pub fn suggested_questions(&self) -> Vec<String> {
        self.reference.suggested_questions.clone()
    }
}

/// 问题是否在问毛利损失排行
fn asks_for_margin_loss(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("top")
        && message.contains("margin")
        && (message.contains("lost") || message.contains("loss"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{CannedAssistant, InMemoryRepository, seed};

    fn handler() -> ServiceHandler {
        ServiceHandler::new(
            Arc::new(InMemoryRepository::new(seed::products())),
            Arc::new(InMemoryRepository::new(seed::suggestions())),
            Arc::new(InMemoryRepository::new(seed::kpis())),
            Arc::new(CannedAssistant),
            seed::reference(Utc::now()),
        )
    }

    #[test]
    fn test_margin_loss_detection() {
        assert!(asks_for_margin_loss("Which top 10 items lost margin this month?"));
        assert!(asks_for_margin_loss("TOP margin LOSS"));
        assert!(!asks_for_margin_loss("top margin gains"));
        assert!(!asks_for_margin_loss("which items lost margin"));
    }

    #[tokio::test]
    async fn test_prompt_context_lists_lowest_margins_first() {
        let prompt = handler()
            .build_prompt("Which top 10 items lost margin this month?")
            .await
            .unwrap();

        let lines: Vec<&str> = prompt.context.lines().collect();
        assert_eq!(lines[0], "Here are the top 10 items that lost margin this month:");
        assert_eq!(
            lines[1],
            "1. Fresh Strawberries (Current margin: -6.5%, Change: -8.2%)"
        );
        assert_eq!(
            lines[2],
            "2. Organic Milk 1/2 Gallon (Current margin: 3.3%, Change: -1.8%)"
        );
        assert_eq!(lines.len(), 5);
    }

    #[tokio::test]
    async fn test_prompt_without_context() {
        let prompt = handler().build_prompt("hello").await.unwrap();
        assert!(prompt.context.is_empty());
        assert_eq!(prompt.question, "hello");
        assert_eq!(prompt.system, ASSISTANT_PERSONA);
    }

    #[tokio::test]
    async fn test_distinct_values_keep_first_seen_order() {
        let handler = handler();
        handler
            .update_product(UpdateProductCommand {
                product_id: ProductId::from("4"),
                patch: ProductPatch {
                    category: Some("Pantry".to_string()),
                    ..Default::default()
                },
            })
            .await
            .unwrap();

        assert_eq!(
            handler.product_categories().await.unwrap(),
            vec!["Pantry", "Dairy", "Beverages"]
        );
        assert_eq!(handler.product_suppliers().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_generate_suggestion_is_persisted() {
        let handler = handler();
        let created = handler
            .generate_suggestions(GenerateSuggestionsCommand {
                product_id: Some("3".to_string()),
                analysis_type: None,
            })
            .await
            .unwrap();

        assert_eq!(created.len(), 1);
        assert_eq!(created[0].status, SuggestionStatus::Pending);
        let stored = handler.get_suggestion(&created[0].id).await.unwrap();
        assert_eq!(stored, created[0]);
        assert_eq!(handler.suggestion_stats().await.unwrap().total, 6);
    }

    #[tokio::test]
    async fn test_generate_suggestion_for_unknown_product() {
        let err = handler()
            .generate_suggestions(GenerateSuggestionsCommand {
                product_id: Some("404".to_string()),
                analysis_type: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_kpi_target_checks_existence_first() {
        let handler = handler();
        let err = handler
            .update_kpi_target(UpdateKpiTargetCommand {
                slug: "nope".to_string(),
                target: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.message(), "KPI not found");

        let err = handler
            .update_kpi_target(UpdateKpiTargetCommand {
                slug: "shrink-loss".to_string(),
                target: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Target value is required");

        let updated = handler
            .update_kpi_target(UpdateKpiTargetCommand {
                slug: "shrink-loss".to_string(),
                target: Some(1.5),
            })
            .await
            .unwrap();
        assert_eq!(updated.target, 1.5);
        assert_eq!(handler.kpi_summary().await.unwrap().on_target, 3);
    }

    #[tokio::test]
    async fn test_kpi_summary_on_seed() {
        let summary = handler().kpi_summary().await.unwrap();
        assert_eq!(summary.total_kpis, 6);
        assert_eq!(summary.positive_trends, 4);
        assert_eq!(summary.negative_trends, 2);
        assert_eq!(summary.on_target, 4);
    }

    #[tokio::test]
    async fn test_kpi_trends_selection() {
        let handler = handler();
        let all = handler.kpi_trends(KpiTrendsQuery::default());
        assert_eq!(all.timeframe, "30d");
        assert!(matches!(all.trends, TrendSeries::All(ref map) if map.len() == 3));

        let missing = handler.kpi_trends(KpiTrendsQuery {
            kpi: Some("Shrink Loss".to_string()),
            timeframe: "7d".to_string(),
        });
        assert_eq!(missing.trends, TrendSeries::One(None));
    }

    #[tokio::test]
    async fn test_analysis_is_bound_to_product() {
        let analysis = handler()
            .product_analysis(&ProductId::from("2"))
            .await
            .unwrap();
        assert_eq!(analysis.product_id, ProductId::from("2"));
        assert_eq!(analysis.suggestions.len(), 3);
        assert!(analysis.suggestions.iter().all(|s| s.product_id == analysis.product_id));
        assert_eq!(analysis.root_causes.len(), 3);
    }
}
