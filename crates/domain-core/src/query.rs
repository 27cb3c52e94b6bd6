//! 商品查询管线
//!
//! 过滤 → 稳定排序 → 分页。纯函数，不修改输入集合。

use std::cmp::Ordering;

use marginiq_common::PageRequest;
use serde::{Deserialize, Serialize};

use crate::{Product, ProductStatus};

/// 排序字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Id,
    Sku,
    Name,
    Category,
    Region,
    Supplier,
    Status,
    Price,
    Cogs,
    #[default]
    Margin,
    MarginDelta,
    TariffImpact,
    ShrinkRate,
    LastUpdated,
}

impl SortField {
    const ALL: [SortField; 14] = [
        SortField::Id,
        SortField::Sku,
        SortField::Name,
        SortField::Category,
        SortField::Region,
        SortField::Supplier,
        SortField::Status,
        SortField::Price,
        SortField::Cogs,
        SortField::Margin,
        SortField::MarginDelta,
        SortField::TariffImpact,
        SortField::ShrinkRate,
        SortField::LastUpdated,
    ];

    /// camelCase 字段名（与 JSON 一致）
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Sku => "sku",
            SortField::Name => "name",
            SortField::Category => "category",
            SortField::Region => "region",
            SortField::Supplier => "supplier",
            SortField::Status => "status",
            SortField::Price => "price",
            SortField::Cogs => "cogs",
            SortField::Margin => "margin",
            SortField::MarginDelta => "marginDelta",
            SortField::TariffImpact => "tariffImpact",
            SortField::ShrinkRate => "shrinkRate",
            SortField::LastUpdated => "lastUpdated",
        }
    }

    /// 解析字段名，接受 camelCase 与 snake_case
    pub fn parse(value: &str) -> Option<Self> {
        let wanted: String = value
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().to_ascii_lowercase() == wanted)
    }

    /// 未知字段回退到默认字段 `margin`
    pub fn parse_or_default(value: &str) -> Self {
        Self::parse(value).unwrap_or_default()
    }

    /// 按方向比较：数值字段按数值，字符串字段按字典序，时间按先后
    ///
    /// 数值字段中的 NaN 无论升序降序都排在末尾，彼此视为相等。
    pub fn compare(&self, a: &Product, b: &Product, order: SortOrder) -> Ordering {
        let numeric = |x: f64, y: f64| compare_f64(x, y, order);
        match self {
            SortField::Id => order.apply(a.id.as_str().cmp(b.id.as_str())),
            SortField::Sku => order.apply(a.sku.cmp(&b.sku)),
            SortField::Name => order.apply(a.name.cmp(&b.name)),
            SortField::Category => order.apply(a.category.cmp(&b.category)),
            SortField::Region => order.apply(a.region.cmp(&b.region)),
            SortField::Supplier => order.apply(a.supplier.cmp(&b.supplier)),
            SortField::Status => order.apply(a.status.as_str().cmp(b.status.as_str())),
            SortField::Price => numeric(a.price, b.price),
            SortField::Cogs => numeric(a.cogs, b.cogs),
            SortField::Margin => numeric(a.margin, b.margin),
            SortField::MarginDelta => numeric(a.margin_delta, b.margin_delta),
            SortField::TariffImpact => numeric(a.tariff_impact, b.tariff_impact),
            SortField::ShrinkRate => numeric(a.shrink_rate, b.shrink_rate),
            SortField::LastUpdated => order.apply(a.last_updated.cmp(&b.last_updated)),
        }
    }
}

// NaN 固定排在末尾，其余值按 total_cmp 比较，保证全序
fn compare_f64(a: f64, b: f64, order: SortOrder) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => order.apply(a.total_cmp(&b)),
    }
}

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// 商品过滤条件
///
/// 未设置的条件不做约束；字符串比较均不区分大小写。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    /// 品类（精确匹配）
    pub category: Option<String>,
    /// 区域（精确匹配）
    pub region: Option<String>,
    /// 供应商（子串匹配）
    pub supplier: Option<String>,
    /// 状态（精确匹配，未知状态不匹配任何商品）
    pub status: Option<String>,
    /// 保留 `margin <= threshold` 的商品
    pub margin_threshold: Option<f64>,
    /// 仅保留负毛利商品
    pub negative_only: bool,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        Matcher::new(self).matches(product)
    }
}

/// 预先小写化的过滤条件
struct Matcher<'a> {
    category: Option<String>,
    region: Option<String>,
    supplier: Option<String>,
    status: Option<Option<ProductStatus>>,
    filter: &'a ProductFilter,
}

impl<'a> Matcher<'a> {
    fn new(filter: &'a ProductFilter) -> Self {
        let lower = |value: &Option<String>| value.as_deref().map(str::to_lowercase);
        Self {
            category: lower(&filter.category),
            region: lower(&filter.region),
            supplier: lower(&filter.supplier),
            status: filter.status.as_deref().map(ProductStatus::parse),
            filter,
        }
    }

    fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if product.category.to_lowercase() != *category {
                return false;
            }
        }
        if let Some(region) = &self.region {
            if product.region.to_lowercase() != *region {
                return false;
            }
        }
        if let Some(supplier) = &self.supplier {
            if !product.supplier.to_lowercase().contains(supplier.as_str()) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if status != Some(product.status) {
                return false;
            }
        }
        if let Some(threshold) = self.filter.margin_threshold {
            match product.margin.partial_cmp(&threshold) {
                Some(Ordering::Less | Ordering::Equal) => {}
                _ => return false,
            }
        }
        if self.filter.negative_only && !product.is_negative_margin() {
            return false;
        }
        true
    }
}

/// 查询参数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pub filter: ProductFilter,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub page: PageRequest,
}

impl QueryParams {
    pub fn with_filter(mut self, filter: ProductFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn sorted_by(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_by = field;
        self.sort_order = order;
        self
    }

    pub fn with_page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }
}

/// 查询结果
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// 当前页
    pub page: Vec<Product>,
    /// 过滤后、分页前的总数
    pub total: usize,
}

/// 执行查询：过滤 → 稳定排序 → 分页
pub fn query(products: &[Product], params: &QueryParams) -> QueryResult {
    let matcher = Matcher::new(&params.filter);
    let mut matched: Vec<&Product> = products.iter().filter(|p| matcher.matches(p)).collect();

    // slice::sort_by 是稳定排序，相等元素保持输入顺序
    matched.sort_by(|a, b| params.sort_by.compare(a, b, params.sort_order));

    let total = matched.len();
    let page = params
        .page
        .slice(&matched)
        .into_iter()
        .cloned()
        .collect();

    QueryResult { page, total }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_field_parse() {
        assert_eq!(SortField::parse("margin"), Some(SortField::Margin));
        assert_eq!(SortField::parse("marginDelta"), Some(SortField::MarginDelta));
        assert_eq!(SortField::parse("margin_delta"), Some(SortField::MarginDelta));
        assert_eq!(SortField::parse("TariffImpact"), Some(SortField::TariffImpact));
        assert_eq!(SortField::parse("last_updated"), Some(SortField::LastUpdated));
        assert_eq!(SortField::parse("bogus"), None);
        assert_eq!(SortField::parse(""), None);
    }

    #[test]
    fn test_sort_field_fallback() {
        assert_eq!(SortField::parse_or_default("DROP TABLE"), SortField::Margin);
        assert_eq!(SortField::parse_or_default("price"), SortField::Price);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::parse("ASC"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::parse("desc"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::parse("up"), None);
        assert_eq!(SortOrder::default(), SortOrder::Desc);
    }

    #[test]
    fn test_sort_order_apply() {
        assert_eq!(SortOrder::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(SortOrder::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortOrder::Desc.apply(Ordering::Equal), Ordering::Equal);
    }

    #[test]
    fn test_compare_nan_sorts_last_in_both_directions() {
        for order in [SortOrder::Asc, SortOrder::Desc] {
            assert_eq!(compare_f64(f64::NAN, 1.0, order), Ordering::Greater);
            assert_eq!(compare_f64(-1.0, f64::NAN, order), Ordering::Less);
            assert_eq!(compare_f64(f64::NAN, f64::NAN, order), Ordering::Equal);
        }
        assert_eq!(compare_f64(1.0, 2.0, SortOrder::Asc), Ordering::Less);
        assert_eq!(compare_f64(1.0, 2.0, SortOrder::Desc), Ordering::Greater);
        assert_eq!(compare_f64(2.0, 2.0, SortOrder::Desc), Ordering::Equal);
    }
}
