// ==========================================
// 输电塔材料分解系统 - 目录筛选条件
// ==========================================
// 职责: 把调用方的稀疏键值筛选解析为 FilterSet，并给出行匹配判定
// 规则:
// - 空值不构成约束；无法识别的键直接忽略
// - 段 (TRAMO) 比较 TRIM + UPPER 后的值，其余字段严格相等（区分大小写）
// ==========================================

use crate::domain::inventory::{canonicalize, InventoryItem};
use crate::domain::types::FilterField;
use serde::Serialize;
use std::collections::BTreeMap;

/// 浏览列表的默认返回上限
pub const DEFAULT_SEARCH_CAP: usize = 500;

// ==========================================
// FilterSet - 生效的筛选条件
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSet {
    conditions: BTreeMap<FilterField, String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从调用方键值对解析
    ///
    /// 同一字段出现多次时以后出现的非空值为准。
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut set = Self::new();
        for (key, value) in pairs {
            match FilterField::from_key(key.as_ref()) {
                Some(field) => set.set(field, value.as_ref()),
                None => tracing::debug!(key = key.as_ref(), "忽略无法识别的筛选键"),
            }
        }
        set
    }

    /// 设置单个字段（空白值视为清除）
    pub fn set(&mut self, field: FilterField, value: &str) {
        if value.trim().is_empty() {
            self.conditions.remove(&field);
        } else {
            self.conditions.insert(field, value.to_string());
        }
    }

    /// 链式设置
    pub fn with(mut self, field: FilterField, value: &str) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: FilterField) -> Option<&str> {
        self.conditions.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// 按字段固定顺序遍历生效条件
    pub fn iter(&self) -> impl Iterator<Item = (FilterField, &str)> {
        self.conditions.iter().map(|(f, v)| (*f, v.as_str()))
    }

    /// 去掉某个字段自身的约束（下拉选项：字段自己的当前值不限制自己的候选）
    pub fn without(&self, field: FilterField) -> Self {
        let mut copy = self.clone();
        copy.conditions.remove(&field);
        copy
    }

    /// 只保留粗筛字段（塔型、制造商、塔头）
    pub fn coarse(&self) -> Self {
        let conditions = self
            .conditions
            .iter()
            .filter(|(field, _)| FilterField::COARSE.contains(field))
            .map(|(field, value)| (*field, value.clone()))
            .collect();
        Self { conditions }
    }

    /// 判定目录行是否满足全部条件
    pub fn matches(&self, item: &InventoryItem) -> bool {
        self.iter()
            .all(|(field, expected)| field_matches(field, item.field_value(field), expected))
    }
}

/// 单字段匹配规则
pub fn field_matches(field: FilterField, actual: &str, expected: &str) -> bool {
    if field.is_case_insensitive() {
        canonicalize(actual) == canonicalize(expected)
    } else {
        actual == expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(item_type: &str, section: &str) -> InventoryItem {
        InventoryItem {
            item_type: item_type.to_string(),
            section: section.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_pairs_ignores_unknown_and_empty() {
        let set = FilterSet::from_pairs(vec![
            ("tipo", "S2"),
            ("color", "rojo"),
            ("cuerpo", ""),
            ("tramo", "   "),
        ]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(FilterField::Type), Some("S2"));
    }

    #[test]
    fn test_empty_set_matches_everything() {
        assert!(FilterSet::new().matches(&item("S2", "A1")));
    }

    #[test]
    fn test_section_is_case_insensitive() {
        let set = FilterSet::new().with(FilterField::Section, "a1");
        assert!(set.matches(&item("S2", "A1")));
        assert!(set.matches(&item("S2", " a1 ")));
        assert!(!set.matches(&item("S2", "A2")));
    }

    #[test]
    fn test_type_is_case_sensitive() {
        let set = FilterSet::new().with(FilterField::Type, "a1");
        assert!(!set.matches(&item("A1", "")));
        assert!(set.matches(&item("a1", "")));
    }

    #[test]
    fn test_without_and_coarse() {
        let set = FilterSet::from_pairs(vec![
            ("tipo", "S2"),
            ("fabricante", "ACME"),
            ("cabeza", "H1"),
            ("cuerpo", "C3"),
            ("tramo", "A1"),
            ("parte", "BSUP"),
        ]);
        assert_eq!(set.len(), 6);

        let without_type = set.without(FilterField::Type);
        assert_eq!(without_type.get(FilterField::Type), None);
        assert_eq!(without_type.len(), 5);

        let coarse = set.coarse();
        assert_eq!(coarse.len(), 3);
        assert_eq!(coarse.get(FilterField::Head), Some("H1"));
        assert_eq!(coarse.get(FilterField::Section), None);
    }
}
