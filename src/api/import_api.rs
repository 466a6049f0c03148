// ==========================================
// 输电塔材料分解系统 - 目录导入API
// ==========================================
// 职责: 封装目录导入（整表替换）
// ==========================================

use std::path::Path;
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::config::CatalogConfigReader;
use crate::importer::{CatalogImporter, ImportReport};
use crate::repository::InventoryWriter;

/// 导入API
pub struct ImportApi {
    writer: Arc<dyn InventoryWriter>,
    config: Arc<dyn CatalogConfigReader>,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    pub fn new(writer: Arc<dyn InventoryWriter>, config: Arc<dyn CatalogConfigReader>) -> Self {
        Self { writer, config }
    }

    /// 导入目录文件（.csv / .xlsx / .xls / .json）
    ///
    /// # 返回
    /// - Ok(ImportReport): 导入结果
    /// - Err(ApiError::ImportError): 文件不存在、格式不支持、内容为空等
    /// - Err(ApiError::DatabaseError): 写入失败（旧目录保持不变）
    pub fn import_catalog(&self, file_path: &str) -> ApiResult<ImportReport> {
        let file_path = file_path.trim();
        if file_path.is_empty() {
            return Err(ApiError::InvalidInput("文件路径不能为空".to_string()));
        }

        let importer = CatalogImporter::new(self.writer.clone(), self.config.clone());
        let report = importer.import_file(Path::new(file_path))?;

        tracing::info!(
            batch_id = %report.batch_id,
            imported = report.imported_rows,
            "目录导入成功"
        );
        Ok(report)
    }
}
