// ==========================================
// 输电塔材料分解系统 - 应用状态
// ==========================================
// 职责: 进程启动时显式构造共享连接、仓储与 API 实例
// 约定: 不使用全局懒加载连接，所有依赖通过 AppState 注入
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::{CatalogApi, ConfigApi, ImportApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{ensure_catalog_schema, ensure_config_schema, open_sqlite_connection};
use crate::repository::{ColumnMapping, SqliteInventoryRepository};

/// 指定数据库路径的环境变量
pub const DB_PATH_ENV: &str = "TOWER_BREAKDOWN_DB_PATH";

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 目录列映射
    pub mapping: ColumnMapping,

    /// 目录API
    pub catalog_api: Arc<CatalogApi>,

    /// 目录导入API
    pub import_api: Arc<ImportApi>,

    /// 配置管理API
    pub config_api: Arc<ConfigApi>,
}

impl AppState {
    /// 创建新的AppState实例（历史 piezas 布局）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        Self::with_mapping(db_path, ColumnMapping::legacy())
    }

    /// 按指定列映射创建AppState
    ///
    /// 只有历史布局会自动建目录表，其他布局要求目录表已存在。
    pub fn with_mapping(db_path: String, mapping: ColumnMapping) -> Result<Self, String> {
        tracing::info!(db_path = %db_path, table = %mapping.table, "初始化AppState");

        // 创建数据库连接（共享连接）
        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        ensure_config_schema(&conn).map_err(|e| format!("配置表初始化失败: {}", e))?;
        if mapping == ColumnMapping::legacy() {
            ensure_catalog_schema(&conn).map_err(|e| format!("目录表初始化失败: {}", e))?;
        }
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let inventory_repo = Arc::new(
            SqliteInventoryRepository::from_connection(conn.clone(), mapping.clone())
                .map_err(|e| format!("无法创建目录仓储: {}", e))?,
        );

        // 配置管理器
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化API层
        // ==========================================
        let catalog_api = Arc::new(CatalogApi::new(
            inventory_repo.clone(),
            config_manager.clone(),
        ));
        let import_api = Arc::new(ImportApi::new(inventory_repo, config_manager.clone()));
        let config_api = Arc::new(ConfigApi::new(config_manager));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            mapping,
            catalog_api,
            import_api,
            config_api,
        })
    }
}

/// 解析数据库路径
///
/// 优先级: 环境变量 > 命令行参数 > 用户数据目录 > 当前目录
pub fn resolve_db_path(cli_path: Option<&str>) -> String {
    if let Some(path) = env_db_path() {
        return path;
    }
    match cli_path.map(str::trim).filter(|p| !p.is_empty()) {
        Some(path) => path.to_string(),
        None => get_default_db_path(),
    }
}

/// 获取默认数据库路径
pub fn get_default_db_path() -> String {
    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Some(path) = env_db_path() {
        return path;
    }

    let mut path = PathBuf::from("./tower_breakdown.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("tower-breakdown");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("tower_breakdown.db");
        }
    }

    path.to_string_lossy().to_string()
}

fn env_db_path() -> Option<String> {
    std::env::var(DB_PATH_ENV)
        .ok()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
}
