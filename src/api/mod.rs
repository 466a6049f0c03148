// ==========================================
// 输电塔材料分解系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行调用
// ==========================================

pub mod catalog_api;
pub mod config_api;
pub mod error;
pub mod import_api;

// 重导出核心类型
pub use catalog_api::{CatalogApi, CatalogSummary, FilterOptions};
pub use config_api::ConfigApi;
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use import_api::ImportApi;
