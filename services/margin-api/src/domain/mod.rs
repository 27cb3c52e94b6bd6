//! 领域层

pub mod analysis;
pub mod chat;
pub mod kpi;
pub mod reference;
pub mod repositories;
pub mod stats;
pub mod suggestion;

pub use analysis::*;
pub use chat::*;
pub use kpi::*;
pub use reference::*;
pub use stats::*;
pub use suggestion::*;

pub use marginiq_domain_core::{Product, ProductId, ProductStatus};
