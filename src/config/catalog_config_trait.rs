// ==========================================
// 输电塔材料分解系统 - 目录配置读取 Trait
// ==========================================
// 职责: 定义 API / 导入层所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::config_manager::DEFAULT_IMPORT_BATCH_SIZE;
use crate::engine::inventory_filter::DEFAULT_SEARCH_CAP;
use std::error::Error;

// ==========================================
// CatalogConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）/ StaticConfig（固定值）
pub trait CatalogConfigReader {
    /// 浏览列表返回上限
    ///
    /// # 默认值
    /// - 500
    fn get_search_result_cap(&self) -> Result<usize, Box<dyn Error>>;

    /// 导入时每批写入行数
    ///
    /// # 默认值
    /// - 1000
    fn get_import_batch_size(&self) -> Result<usize, Box<dyn Error>>;
}

/// 固定配置（测试及无数据库场景）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticConfig {
    pub search_result_cap: usize,
    pub import_batch_size: usize,
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            search_result_cap: DEFAULT_SEARCH_CAP,
            import_batch_size: DEFAULT_IMPORT_BATCH_SIZE,
        }
    }
}

impl CatalogConfigReader for StaticConfig {
    fn get_search_result_cap(&self) -> Result<usize, Box<dyn Error>> {
        Ok(self.search_result_cap)
    }

    fn get_import_batch_size(&self) -> Result<usize, Box<dyn Error>> {
        Ok(self.import_batch_size)
    }
}

impl<T: CatalogConfigReader + ?Sized> CatalogConfigReader for std::sync::Arc<T> {
    fn get_search_result_cap(&self) -> Result<usize, Box<dyn Error>> {
        (**self).get_search_result_cap()
    }

    fn get_import_batch_size(&self) -> Result<usize, Box<dyn Error>> {
        (**self).get_import_batch_size()
    }
}
