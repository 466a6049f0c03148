// ==========================================
// 输电塔材料分解系统 - 目录 API
// ==========================================
// 职责: 下拉选项 / 目录浏览 / 材料计算 / 目录概况
// 约定: 浏览列表受返回上限约束；计算不设上限，扫描全部粗筛结果
// ==========================================

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::config::CatalogConfigReader;
use crate::domain::calculation::{CalculationResult, SelectedPart};
use crate::domain::inventory::{canonicalize, InventoryItem};
use crate::domain::types::FilterField;
use crate::engine::inventory_filter::FilterSet;
use crate::engine::material_calc::MaterialCalcEngine;
use crate::repository::InventoryStore;

/// 下拉选项：字段键名 (TIPO / FABRICANTE / ...) → 去重排序后的候选值
pub type FilterOptions = BTreeMap<String, Vec<String>>;

// ==========================================
// CatalogSummary - 目录概况
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub total_rows: usize,         // 目录总行数
    pub matching_rows: usize,      // 满足条件的行数
    pub divisions: Vec<String>,    // 满足条件的行中出现的分部（规范化后，升序）
}

// ==========================================
// CatalogApi - 目录 API
// ==========================================
pub struct CatalogApi {
    store: Arc<dyn InventoryStore>,
    config: Arc<dyn CatalogConfigReader>,
    engine: MaterialCalcEngine,
}

impl CatalogApi {
    /// 创建新的CatalogApi实例
    ///
    /// # 参数
    /// - store: 目录读取仓储
    /// - config: 配置读取器（浏览上限）
    pub fn new(store: Arc<dyn InventoryStore>, config: Arc<dyn CatalogConfigReader>) -> Self {
        Self {
            store,
            config,
            engine: MaterialCalcEngine::new(),
        }
    }

    /// 下拉选项
    ///
    /// 每个字段的候选值只受其他字段当前条件约束，不受自身当前值约束。
    #[instrument(skip(self, filters), fields(conditions = filters.len()))]
    pub fn list_filter_options(&self, filters: &FilterSet) -> ApiResult<FilterOptions> {
        let mut options = FilterOptions::new();
        for field in FilterField::ALL {
            let values = self.store.distinct_values(field, &filters.without(field))?;
            options.insert(field.key().to_string(), values);
        }
        Ok(options)
    }

    /// 目录浏览（最多返回配置的上限行数）
    #[instrument(skip(self, filters), fields(conditions = filters.len()))]
    pub fn search(&self, filters: &FilterSet) -> ApiResult<Vec<InventoryItem>> {
        let cap = self.search_cap()?;
        debug!(filters = ?filters, cap = cap, "目录浏览条件");

        let items = self.store.find_items(filters, Some(cap))?;
        info!(returned = items.len(), "目录浏览完成");
        Ok(items)
    }

    /// 材料计算
    ///
    /// # 参数
    /// - filters: 调用方条件，只取粗筛字段（塔型 / 制造商 / 塔头）
    /// - parts: 选择的分部及倍数，不能为空
    ///
    /// # 返回
    /// - Ok(CalculationResult): 清单行 + 汇总
    /// - Err(ApiError::InvalidInput): 未选择任何分部（不读取目录）
    #[instrument(skip(self, filters, parts), fields(parts = parts.len()))]
    pub fn calculate(
        &self,
        filters: &FilterSet,
        parts: &[SelectedPart],
    ) -> ApiResult<CalculationResult> {
        if parts.is_empty() {
            return Err(ApiError::InvalidInput("至少需要选择一个分部".to_string()));
        }

        let coarse = filters.coarse();
        debug!(filters = ?coarse, "材料计算粗筛条件");

        let items = self.store.find_items(&coarse, None)?;
        Ok(self.engine.calculate(&items, parts))
    }

    /// 目录概况：总行数、满足条件的行数、出现的分部
    #[instrument(skip(self, filters), fields(conditions = filters.len()))]
    pub fn catalog_summary(&self, filters: &FilterSet) -> ApiResult<CatalogSummary> {
        let total_rows = self.store.count_items(&FilterSet::new())?;
        let divisions: BTreeSet<String> = self
            .store
            .distinct_values(FilterField::Division, filters)?
            .iter()
            .map(|d| canonicalize(d))
            .collect();
        let matching_rows = self.store.count_items(filters)?;

        Ok(CatalogSummary {
            total_rows,
            matching_rows,
            divisions: divisions.into_iter().collect(),
        })
    }

    fn search_cap(&self) -> ApiResult<usize> {
        self.config
            .get_search_result_cap()
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticConfig;
    use crate::repository::{InMemoryInventoryRepository, RepositoryResult};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 记录读取次数的目录仓储
    struct CountingStore {
        inner: InMemoryInventoryRepository,
        find_calls: AtomicUsize,
        scanned_rows: AtomicUsize,
    }

    impl InventoryStore for CountingStore {
        fn find_items(
            &self,
            filters: &FilterSet,
            limit: Option<usize>,
        ) -> RepositoryResult<Vec<InventoryItem>> {
            self.find_calls.fetch_add(1, Ordering::SeqCst);
            let items = self.inner.find_items(filters, limit)?;
            self.scanned_rows.fetch_add(items.len(), Ordering::SeqCst);
            Ok(items)
        }

        fn distinct_values(
            &self,
            field: FilterField,
            filters: &FilterSet,
        ) -> RepositoryResult<Vec<String>> {
            self.inner.distinct_values(field, filters)
        }

        fn count_items(&self, filters: &FilterSet) -> RepositoryResult<usize> {
            self.inner.count_items(filters)
        }
    }

    fn item(id: &str, item_type: &str, division: &str, section: &str, qty: f64) -> InventoryItem {
        InventoryItem {
            id: id.to_string(),
            item_type: item_type.to_string(),
            manufacturer: "ACME".to_string(),
            head: "H1".to_string(),
            division: division.to_string(),
            section: section.to_string(),
            quantity_per_tower: qty,
            unit_weight: 1.5,
            ..Default::default()
        }
    }

    fn api(items: Vec<InventoryItem>, cap: usize) -> CatalogApi {
        CatalogApi::new(
            Arc::new(InMemoryInventoryRepository::new(items)),
            Arc::new(StaticConfig {
                search_result_cap: cap,
                ..Default::default()
            }),
        )
    }

    #[test]
    fn test_calculate_rejects_empty_parts() {
        let api = api(vec![item("P1", "S2", "BSUP", "A1", 4.0)], 500);
        let err = api.calculate(&FilterSet::new(), &[]).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_calculate_empty_parts_reads_no_rows() {
        let store = Arc::new(CountingStore {
            inner: InMemoryInventoryRepository::new(vec![item("P1", "S2", "BSUP", "A1", 4.0)]),
            find_calls: AtomicUsize::new(0),
            scanned_rows: AtomicUsize::new(0),
        });
        let api = CatalogApi::new(store.clone(), Arc::new(StaticConfig::default()));

        let err = api
            .calculate(&FilterSet::new().with(FilterField::Type, "S2"), &[])
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
        assert_eq!(store.find_calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.scanned_rows.load(Ordering::SeqCst), 0);

        // 有分部时才读取目录
        api.calculate(&FilterSet::new(), &[SelectedPart::new("BSUP", 1)])
            .unwrap();
        assert_eq!(store.find_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.scanned_rows.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_calculate_ignores_fine_filters() {
        let api = api(
            vec![
                item("P1", "S2", "BSUP", "A1", 4.0),
                item("P2", "S2", "BSUP", "B2", 2.0),
            ],
            500,
        );
        let filters = FilterSet::new()
            .with(FilterField::Type, "S2")
            .with(FilterField::Section, "A1");
        let result = api
            .calculate(&filters, &[SelectedPart::new("bsup", 1)])
            .unwrap();

        assert_eq!(result.count(), 2);
        assert_eq!(result.totals.total_pieces, 3.0);
        assert_eq!(result.totals.total_weight, 4.5);
    }

    #[test]
    fn test_search_respects_cap() {
        let items = (0..10)
            .map(|i| item(&format!("P{}", i), "S2", "BSUP", "A1", 1.0))
            .collect();
        let api = api(items, 3);
        assert_eq!(api.search(&FilterSet::new()).unwrap().len(), 3);
    }

    #[test]
    fn test_options_exclude_own_field() {
        let api = api(
            vec![
                item("P1", "S2", "BSUP", "A1", 1.0),
                item("P2", "S3", "BINF", "A2", 1.0),
            ],
            500,
        );
        let filters = FilterSet::new().with(FilterField::Type, "S2");
        let options = api.list_filter_options(&filters).unwrap();

        assert_eq!(options["TIPO"], vec!["S2".to_string(), "S3".to_string()]);
        assert_eq!(options["PARTE_DIVISION"], vec!["BSUP".to_string()]);
        assert_eq!(options.len(), 6);
    }

    #[test]
    fn test_catalog_summary() {
        let api = api(
            vec![
                item("P1", "S2", "bsup ", "A1", 1.0),
                item("P2", "S2", "BSUP", "A1", 1.0),
                item("P3", "S3", "PATA 3", "A1", 1.0),
            ],
            500,
        );
        let summary = api
            .catalog_summary(&FilterSet::new().with(FilterField::Type, "S2"))
            .unwrap();
        assert_eq!(summary.total_rows, 3);
        assert_eq!(summary.matching_rows, 2);
        assert_eq!(summary.divisions, vec!["BSUP".to_string()]);
    }
}
