// ==========================================
// 输电塔材料分解系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)，目前只使用 global scope
// ==========================================

use crate::config::catalog_config_trait::CatalogConfigReader;
use crate::db::open_sqlite_connection;
use crate::engine::inventory_filter::DEFAULT_SEARCH_CAP;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// 导入时每批写入的默认行数
pub const DEFAULT_IMPORT_BATCH_SIZE: usize = 1000;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入（UPSERT）global scope 配置值
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let key = key.trim();
        if !config_keys::ALL.contains(&key) {
            return Err(format!("未知配置键: {}", key).into());
        }
        // 写入前按读取规则校验，避免写入后被静默回退为默认值
        parse_positive(value).ok_or_else(|| format!("配置值必须为正整数: {}", value))?;

        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value.trim()],
        )?;
        Ok(())
    }

    /// 获取所有配置的快照（JSON 格式，含未写入的默认值）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        config_map.insert(
            config_keys::SEARCH_RESULT_CAP.to_string(),
            self.get_search_result_cap()?.to_string(),
        );
        config_map.insert(
            config_keys::IMPORT_BATCH_SIZE.to_string(),
            self.get_import_batch_size()?.to_string(),
        );

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }

    /// 读取正整数配置，缺失或非法时回退默认值
    fn get_positive_or_default(&self, key: &str, default: usize) -> Result<usize, Box<dyn Error>> {
        match self.get_global_config_value(key)? {
            None => Ok(default),
            Some(raw) => match parse_positive(&raw) {
                Some(value) => Ok(value),
                None => {
                    warn!(key = key, value = %raw, default = default, "配置值非法，使用默认值");
                    Ok(default)
                }
            },
        }
    }
}

impl CatalogConfigReader for ConfigManager {
    fn get_search_result_cap(&self) -> Result<usize, Box<dyn Error>> {
        self.get_positive_or_default(config_keys::SEARCH_RESULT_CAP, DEFAULT_SEARCH_CAP)
    }

    fn get_import_batch_size(&self) -> Result<usize, Box<dyn Error>> {
        self.get_positive_or_default(config_keys::IMPORT_BATCH_SIZE, DEFAULT_IMPORT_BATCH_SIZE)
    }
}

fn parse_positive(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|v| *v > 0)
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 浏览
    pub const SEARCH_RESULT_CAP: &str = "search_result_cap";

    // 导入
    pub const IMPORT_BATCH_SIZE: &str = "import_batch_size";

    pub const ALL: [&str; 2] = [SEARCH_RESULT_CAP, IMPORT_BATCH_SIZE];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_defaults_when_missing() {
        let config = manager();
        assert_eq!(config.get_search_result_cap().unwrap(), 500);
        assert_eq!(config.get_import_batch_size().unwrap(), 1000);
    }

    #[test]
    fn test_set_and_read_back() {
        let config = manager();
        config.set_config_value("search_result_cap", "20").unwrap();
        config.set_config_value("search_result_cap", "25").unwrap();
        assert_eq!(config.get_search_result_cap().unwrap(), 25);

        let snapshot: BTreeMap<String, String> =
            serde_json::from_str(&config.get_config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot.get("search_result_cap"), Some(&"25".to_string()));
        assert_eq!(snapshot.get("import_batch_size"), Some(&"1000".to_string()));
    }

    #[test]
    fn test_set_rejects_unknown_key_and_bad_value() {
        let config = manager();
        assert!(config.set_config_value("season_mode", "AUTO").is_err());
        assert!(config.set_config_value("import_batch_size", "0").is_err());
        assert!(config.set_config_value("import_batch_size", "mil").is_err());
    }

    #[test]
    fn test_invalid_stored_value_falls_back() {
        let config = manager();
        {
            let conn = config.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', 'import_batch_size', 'abc')",
                [],
            )
            .unwrap();
        }
        assert_eq!(config.get_import_batch_size().unwrap(), 1000);
    }
}
