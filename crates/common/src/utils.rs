//! 通用工具函数

use uuid::Uuid;

/// 生成新的 UUID v7（时间有序）
pub fn new_id() -> Uuid {
    Uuid::now_v7()
}

/// 转为 URL slug：小写，连续空白替换为 `-`
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Average Gross Margin"), "average-gross-margin");
        assert_eq!(slugify("At-Risk  SKUs"), "at-risk-skus");
        assert_eq!(slugify("  Shrink Loss "), "shrink-loss");
    }
}
