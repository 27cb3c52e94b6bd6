//! 离线关键词应答
//!
//! 未配置大模型时使用；只看用户问题，不看数据上下文

use async_trait::async_trait;
use marginiq_errors::AppResult;
use marginiq_ports::{LlmClient, Prompt};

struct Rule {
    /// 全部命中才算匹配（小写）
    keywords: &'static [&'static str],
    reply: &'static str,
}

const RULES: &[Rule] = &[
    Rule {
        keywords: &["top", "lost margin"],
        reply: "Here are the top 10 items that lost margin this month:\n\n1. Fresh Strawberries (-6.5% margin)\n2. Organic Milk (-2.1% margin)\n3. Imported Cheese (-1.8% margin)\n4. Avocados (-1.5% margin)\n5. Bell Peppers (-1.2% margin)\n\nPrimary causes: Increased COGS due to supply chain issues and higher shrink rates in produce. I recommend reviewing pricing strategies and supplier contracts for these items.",
    },
    Rule {
        keywords: &["tariff", "affected"],
        reply: "Categories most affected by tariffs:\n\n• **Beverages** (2.1% tariff impact) - Coffee beans, tea imports\n• **Pantry** (1.8% tariff impact) - Olive oil, pasta, canned goods\n• **Electronics** (1.5% tariff impact) - Small appliances\n\nTotal tariff impact across all categories: $2.3M monthly. Consider sourcing alternatives or adjusting prices to offset these costs.",
    },
    Rule {
        keywords: &["beverage", "florida"],
        reply: "Beverage margins in Florida are falling due to:\n\n• **Increased transportation costs** (+15% fuel surcharges)\n• **Higher shrink rates** (3.2% vs 1.8% national average)\n• **Competitive pricing pressure** from local competitors\n• **Supply chain delays** affecting freshness\n\nRecommendations:\n- Review pricing strategy for Florida market\n- Optimize delivery routes to reduce fuel costs\n- Implement better inventory management to reduce shrink",
    },
    Rule {
        keywords: &["negative margin"],
        reply: "Products currently with negative margins:\n\n🚨 **Critical Issues:**\n• Fresh Strawberries (-6.5% margin)\n• Organic Milk (-2.1% margin)\n• Imported Cheese (-1.8% margin)\n\n**Immediate Actions Needed:**\n1. Review pricing strategy\n2. Negotiate with suppliers\n3. Consider product discontinuation\n4. Implement shrink reduction measures\n\nTotal potential loss: $45K monthly if not addressed.",
    },
    Rule {
        keywords: &["supplier", "cost increase"],
        reply: "Suppliers with highest cost increases:\n\n🏭 **Top Increases:**\n1. Mediterranean Imports (+12% - olive oil)\n2. Global Coffee Inc (+8% - coffee beans)\n3. Berry Farms LLC (+6% - fresh produce)\n4. Local Dairy Co (+5% - dairy products)\n\n**Root Causes:**\n• Raw material cost inflation\n• Transportation cost increases\n• Labor cost pressures\n• Currency fluctuations\n\n**Actions:**\n• Renegotiate contracts\n• Explore alternative suppliers\n• Consider bulk purchasing discounts",
    },
];

const FALLBACK_REPLY: &str = "I understand you're asking about margin analysis. I can help you with:\n\n• Product margin trends and analysis\n• Identifying at-risk items\n• Tariff impact assessment\n• Supplier cost analysis\n• Pricing recommendations\n• Shrink rate analysis\n\nPlease try asking a more specific question about margins, products, or categories.";

#[derive(Debug, Default, Clone, Copy)]
pub struct CannedAssistant;

impl CannedAssistant {
    pub fn reply_for(question: &str) -> &'static str {
        let question = question.to_lowercase();
        RULES
            .iter()
            .find(|rule| rule.keywords.iter().all(|k| question.contains(k)))
            .map_or(FALLBACK_REPLY, |rule| rule.reply)
    }
}

#[async_trait]
impl LlmClient for CannedAssistant {
    fn name(&self) -> &'static str {
        "canned"
    }

    async fn generate(&self, prompt: &Prompt) -> AppResult<String> {
        Ok(Self::reply_for(&prompt.question).to_string())
    }
}
