// ==========================================
// 输电塔材料分解系统 - 目录导入器
// ==========================================
// 职责: 整合导入流程，从文件到目录表
// 流程: 解析 → 映射 → 清洗 → 整表替换（单事务，分批写入）
// ==========================================

use crate::config::CatalogConfigReader;
use crate::domain::inventory::InventoryItem;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::repository::InventoryWriter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

// ==========================================
// ImportReport - 导入结果报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub batch_id: String,
    pub file: String,
    pub total_rows: usize,    // 解析出的非空行数
    pub imported_rows: usize, // 写入目录的行数
    pub skipped_rows: usize,  // 无物料号且无分部的行
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

// ==========================================
// CatalogImporter - 目录导入器
// ==========================================
pub struct CatalogImporter<W, C>
where
    W: InventoryWriter,
    C: CatalogConfigReader,
{
    writer: W,
    config: C,
    file_parser: UniversalFileParser,
    field_mapper: FieldMapper,
    data_cleaner: DataCleaner,
}

impl<W, C> CatalogImporter<W, C>
where
    W: InventoryWriter,
    C: CatalogConfigReader,
{
    /// 创建新的 CatalogImporter 实例
    ///
    /// # 参数
    /// - writer: 目录写入仓储
    /// - config: 配置读取器（批大小）
    pub fn new(writer: W, config: C) -> Self {
        Self {
            writer,
            config,
            file_parser: UniversalFileParser,
            field_mapper: FieldMapper,
            data_cleaner: DataCleaner,
        }
    }

    /// 从文件导入目录（CSV / Excel / JSON，按扩展名选择）
    ///
    /// 成功时旧目录被整体替换；没有任何有效行时报错且不改动旧目录。
    #[instrument(skip(self, file_path), fields(batch_id))]
    pub fn import_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ImportReport> {
        let started_at = Utc::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        let file = file_path.as_ref().display().to_string();
        info!(batch_id = %batch_id, file = %file, "开始导入目录");

        // === 步骤 1: 解析文件 ===
        let raw_rows = self.file_parser.parse(file_path.as_ref()).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;
        let total_rows = raw_rows.len();
        debug!(total_rows = total_rows, "文件解析完成");

        // === 步骤 2/3: 字段映射 + 清洗 ===
        let (items, skipped_rows) = self.map_and_clean(&raw_rows);
        if items.is_empty() {
            return Err(ImportError::EmptyCatalog(file));
        }

        // === 步骤 4: 落库 ===
        let batch_size = self
            .config
            .get_import_batch_size()
            .map_err(|e| ImportError::InternalError(format!("读取配置失败: {}", e)))?;
        let imported_rows = self.writer.replace_all(&items, batch_size)?;

        let report = ImportReport {
            batch_id,
            file,
            total_rows,
            imported_rows,
            skipped_rows,
            started_at,
            finished_at: Utc::now(),
        };
        info!(
            imported = report.imported_rows,
            skipped = report.skipped_rows,
            "目录导入完成"
        );
        Ok(report)
    }

    /// 映射 + 清洗，返回有效行与跳过行数
    fn map_and_clean(
        &self,
        raw_rows: &[crate::importer::file_parser::RawRecord],
    ) -> (Vec<InventoryItem>, usize) {
        let mut items = Vec::with_capacity(raw_rows.len());
        let mut skipped = 0;
        for (idx, row) in raw_rows.iter().enumerate() {
            // 行号从 2 开始（第 1 行为表头）
            let mapped = self.field_mapper.map_to_catalog_row(row, idx + 2);
            match self.data_cleaner.clean_row(&mapped) {
                Some(item) => items.push(item),
                None => {
                    debug!(row = mapped.row_number, "跳过无物料号且无分部的行");
                    skipped += 1;
                }
            }
        }
        (items, skipped)
    }
}
