// ==========================================
// 输电塔材料分解系统 - 内存目录仓储
// ==========================================
// 用途: 测试与 JSON 快照场景，行为与 SQLite 仓储一致
// ==========================================

use crate::domain::inventory::InventoryItem;
use crate::domain::types::FilterField;
use crate::engine::inventory_filter::FilterSet;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::inventory_repo::{InventoryStore, InventoryWriter};
use std::collections::BTreeSet;
use std::sync::RwLock;

/// 内存目录（保持插入顺序）
#[derive(Debug, Default)]
pub struct InMemoryInventoryRepository {
    items: RwLock<Vec<InventoryItem>>,
}

impl InMemoryInventoryRepository {
    pub fn new(items: Vec<InventoryItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_items(&self) -> RepositoryResult<std::sync::RwLockReadGuard<'_, Vec<InventoryItem>>> {
        self.items
            .read()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl InventoryStore for InMemoryInventoryRepository {
    fn find_items(
        &self,
        filters: &FilterSet,
        limit: Option<usize>,
    ) -> RepositoryResult<Vec<InventoryItem>> {
        let items = self.read_items()?;
        let matched = items.iter().filter(|item| filters.matches(item)).cloned();
        Ok(match limit {
            Some(n) => matched.take(n).collect(),
            None => matched.collect(),
        })
    }

    fn distinct_values(
        &self,
        field: FilterField,
        filters: &FilterSet,
    ) -> RepositoryResult<Vec<String>> {
        let items = self.read_items()?;
        let values: BTreeSet<String> = items
            .iter()
            .filter(|item| filters.matches(item))
            .map(|item| item.field_value(field).trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect();
        Ok(values.into_iter().collect())
    }

    fn count_items(&self, filters: &FilterSet) -> RepositoryResult<usize> {
        let items = self.read_items()?;
        Ok(items.iter().filter(|item| filters.matches(item)).count())
    }
}

impl InventoryWriter for InMemoryInventoryRepository {
    fn replace_all(&self, items: &[InventoryItem], _batch_size: usize) -> RepositoryResult<usize> {
        let mut guard = self
            .items
            .write()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        *guard = items.to_vec();
        Ok(guard.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, division: &str, section: &str) -> InventoryItem {
        InventoryItem {
            id: id.to_string(),
            item_type: "S2".to_string(),
            division: division.to_string(),
            section: section.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_section_filter_is_case_insensitive() {
        let repo = InMemoryInventoryRepository::new(vec![
            item("P1", "BSUP", "a1"),
            item("P2", "BSUP", "A2"),
        ]);
        let filters = FilterSet::new().with(FilterField::Section, "A1 ");
        let found = repo.find_items(&filters, None).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "P1");
    }

    #[test]
    fn test_distinct_values_excludes_blank() {
        let repo = InMemoryInventoryRepository::new(vec![
            item("P1", "BSUP", "A1"),
            item("P2", "  ", "A1"),
            item("P3", "BINF ", "A1"),
            item("P4", "BINF", "A1"),
        ]);
        let values = repo
            .distinct_values(FilterField::Division, &FilterSet::new())
            .unwrap();
        assert_eq!(values, vec!["BINF".to_string(), "BSUP".to_string()]);
    }

    #[test]
    fn test_replace_all() {
        let repo = InMemoryInventoryRepository::default();
        assert!(repo.is_empty());
        let written = repo
            .replace_all(&[item("P1", "BSUP", "A1"), item("P2", "BINF", "A1")], 1)
            .unwrap();
        assert_eq!(written, 2);
        assert_eq!(repo.count_items(&FilterSet::new()).unwrap(), 2);
    }
}
