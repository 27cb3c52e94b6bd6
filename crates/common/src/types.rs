//! 通用类型定义

use serde::{Deserialize, Serialize};

/// 默认每页条数
pub const DEFAULT_LIMIT: usize = 50;

/// 分页参数（limit / offset 语义）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl PageRequest {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// 从有符号值构造，负数截断为 0
    pub fn clamped(limit: i64, offset: i64) -> Self {
        Self {
            limit: usize::try_from(limit.max(0)).unwrap_or(usize::MAX),
            offset: usize::try_from(offset.max(0)).unwrap_or(usize::MAX),
        }
    }

    /// 取 `[offset, offset + limit)` 窗口
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        let start = self.offset.min(items.len());
        let end = start.saturating_add(self.limit).min(items.len());
        items[start..end].to_vec()
    }

    /// 对已过滤的完整序列分页
    pub fn paginate<T: Clone>(&self, items: &[T]) -> PagedResult<T> {
        PagedResult::new(self.slice(items), items.len(), self)
    }
}

/// 分页结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total: usize, page: &PageRequest) -> Self {
        Self {
            items,
            total,
            limit: page.limit,
            offset: page.offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_request() {
        let page = PageRequest::default();
        assert_eq!(page.limit, 50);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn test_clamped_negative_values() {
        let page = PageRequest::clamped(-5, -1);
        assert_eq!(page, PageRequest::new(0, 0));

        let page = PageRequest::clamped(10, 3);
        assert_eq!(page, PageRequest::new(10, 3));
    }

    #[test]
    fn test_slice_window() {
        let items = vec![1, 2, 3, 4, 5];
        assert_eq!(PageRequest::new(2, 1).slice(&items), vec![2, 3]);
        assert_eq!(PageRequest::new(10, 3).slice(&items), vec![4, 5]);
        assert!(PageRequest::new(2, 5).slice(&items).is_empty());
        assert!(PageRequest::new(2, 99).slice(&items).is_empty());
        assert!(PageRequest::new(0, 0).slice(&items).is_empty());
    }

    #[test]
    fn test_slice_huge_limit_does_not_overflow() {
        let items = vec!["a", "b"];
        let page = PageRequest::new(usize::MAX, 1);
        assert_eq!(page.slice(&items), vec!["b"]);
    }

    #[test]
    fn test_paginate_keeps_total() {
        let items: Vec<u32> = (0..7).collect();
        let result = PageRequest::new(3, 6).paginate(&items);
        assert_eq!(result.items, vec![6]);
        assert_eq!(result.total, 7);
        assert_eq!(result.limit, 3);
        assert_eq!(result.offset, 6);
    }

    #[test]
    fn test_paged_result_serializes_flat() {
        let result = PageRequest::new(1, 0).paginate(&["x", "y"]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["total"], 2);
        assert_eq!(json["items"][0], "x");
    }
}
