//! ports - 抽象 trait 层
//!
//! 定义存储与外部大模型服务的抽象接口

mod llm;
mod repository;

pub use llm::*;
pub use repository::*;
