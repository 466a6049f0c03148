// ==========================================
// 输电塔材料分解系统 - 领域类型定义
// ==========================================
// 职责: 筛选字段枚举 / 分部除法规则枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 筛选字段 (Filter Field)
// ==========================================
// 目录浏览与下拉选项使用的 6 个分类字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterField {
    Type,         // 塔型 (TIPO)
    Manufacturer, // 制造商 (FABRICANTE)
    Head,         // 塔头 (CABEZA)
    Division,     // 分部 (PARTE_DIVISION)
    Body,         // 塔身 (CUERPO)
    Section,      // 段 (TRAMO)
}

impl FilterField {
    /// 全部筛选字段（固定顺序，与下拉选项输出顺序一致）
    pub const ALL: [FilterField; 6] = [
        FilterField::Type,
        FilterField::Manufacturer,
        FilterField::Head,
        FilterField::Division,
        FilterField::Body,
        FilterField::Section,
    ];

    /// 计算接口使用的粗筛字段（塔型 × 制造商 × 塔头）
    pub const COARSE: [FilterField; 3] =
        [FilterField::Type, FilterField::Manufacturer, FilterField::Head];

    /// 解析调用方传入的筛选键
    ///
    /// 同时接受英文逻辑名与历史目录中的西语键名（大小写不敏感）。
    /// 无法识别的键返回 None，由调用方忽略。
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "type" | "tipo" => Some(FilterField::Type),
            "manufacturer" | "fabricante" => Some(FilterField::Manufacturer),
            "head" | "cabeza" => Some(FilterField::Head),
            "division" | "parte" | "parte_division" | "part" => Some(FilterField::Division),
            "body" | "cuerpo" => Some(FilterField::Body),
            "section" | "tramo" => Some(FilterField::Section),
            _ => None,
        }
    }

    /// 是否为大小写不敏感字段
    ///
    /// 历史业务规则：只有段 (TRAMO) 忽略大小写，其余字段严格相等。
    pub fn is_case_insensitive(&self) -> bool {
        matches!(self, FilterField::Section)
    }

    /// 对外输出的键名（下拉选项映射的 key）
    pub fn key(&self) -> &'static str {
        match self {
            FilterField::Type => "TIPO",
            FilterField::Manufacturer => "FABRICANTE",
            FilterField::Head => "CABEZA",
            FilterField::Division => "PARTE_DIVISION",
            FilterField::Body => "CUERPO",
            FilterField::Section => "TRAMO",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

// ==========================================
// 分部除法规则 (Division Rule)
// ==========================================
// 由分部名称所属的分类集合决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DivisionRule {
    Unit,       // 不除
    Halving,    // 除以 2，不取整
    Quartering, // 除以 4，向上取整
}

impl DivisionRule {
    /// 是否属于可除分部（二分或四分）
    pub fn is_divisible(&self) -> bool {
        !matches!(self, DivisionRule::Unit)
    }
}

impl fmt::Display for DivisionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DivisionRule::Unit => write!(f, "UNIT"),
            DivisionRule::Halving => write!(f, "HALVING"),
            DivisionRule::Quartering => write!(f, "QUARTERING"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_field_from_key_aliases() {
        assert_eq!(FilterField::from_key("tipo"), Some(FilterField::Type));
        assert_eq!(FilterField::from_key("TIPO"), Some(FilterField::Type));
        assert_eq!(FilterField::from_key("parte"), Some(FilterField::Division));
        assert_eq!(
            FilterField::from_key("PARTE_DIVISION"),
            Some(FilterField::Division)
        );
        assert_eq!(FilterField::from_key(" tramo "), Some(FilterField::Section));
        assert_eq!(FilterField::from_key("color"), None);
    }

    #[test]
    fn test_only_section_is_case_insensitive() {
        for field in FilterField::ALL {
            assert_eq!(field.is_case_insensitive(), field == FilterField::Section);
        }
    }

    #[test]
    fn test_division_rule_divisible() {
        assert!(!DivisionRule::Unit.is_divisible());
        assert!(DivisionRule::Halving.is_divisible());
        assert!(DivisionRule::Quartering.is_divisible());
    }
}
