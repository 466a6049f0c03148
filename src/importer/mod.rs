// ==========================================
// 输电塔材料分解系统 - 导入层
// ==========================================
// 职责: 外部目录文件导入,替换目录表
// 支持: Excel, CSV, JSON
// ==========================================

// 模块声明
pub mod catalog_importer;
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;

// 重导出核心类型
pub use catalog_importer::{CatalogImporter, ImportReport};
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{FieldMapper, RawCatalogRow};
pub use file_parser::{CsvParser, ExcelParser, FileParser, JsonParser, RawRecord, UniversalFileParser};
