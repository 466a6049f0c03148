// ==========================================
// 输电塔材料分解系统 - 应用层
// ==========================================
// 职责: 组装依赖,提供命令输出的响应封装
// ==========================================

pub mod response;
pub mod state;

// 重导出
pub use response::{
    CalculateResponse, ConfigResponse, ImportResponse, OptionsResponse, SearchResponse,
    SummaryResponse,
};
pub use state::{get_default_db_path, resolve_db_path, AppState, DB_PATH_ENV};
