//! 大模型客户端 trait

use async_trait::async_trait;
use marginiq_errors::AppResult;

/// 一次对话请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// 角色设定
    pub system: String,
    /// 用户原始问题
    pub question: String,
    /// 附加的数据上下文，可为空
    pub context: String,
}

impl Prompt {
    pub fn new(system: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            question: question.into(),
            context: String::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// 拼接为单段文本
    pub fn render(&self) -> String {
        format!(
            "{}\n\nUser question: {}\n\nRelevant data:\n{}",
            self.system, self.question, self.context
        )
    }
}

/// 文本生成客户端
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 后端名称（用于日志）
    fn name(&self) -> &'static str;

    async fn generate(&self, prompt: &Prompt) -> AppResult<String>;
}
