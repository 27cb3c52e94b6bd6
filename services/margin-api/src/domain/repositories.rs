//! 仓储接口

use marginiq_domain_core::{Product, ProductId};
use marginiq_ports::Repository;

use super::{KpiMetric, Suggestion, SuggestionId};

/// 商品仓储
pub type ProductRepository = dyn Repository<Product, ProductId>;

/// 建议仓储
pub type SuggestionRepository = dyn Repository<Suggestion, SuggestionId>;

/// KPI 仓储（以名称为 ID）
pub type KpiRepository = dyn Repository<KpiMetric, String>;
