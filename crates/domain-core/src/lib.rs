//! domain-core - 跨模块共享的领域核心
//!
//! 商品记录与商品查询管线（过滤 → 排序 → 分页）

mod entity;
mod product;
pub mod query;

pub use entity::*;
pub use product::*;
pub use query::{ProductFilter, QueryParams, QueryResult, SortField, SortOrder, query};

// Re-export common types
pub use marginiq_common::{PageRequest, PagedResult};
