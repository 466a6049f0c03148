// ==========================================
// 输电塔材料分解系统 - 配置管理 API
// ==========================================
// 职责: 配置查询、更新
// ==========================================

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::{config_keys, ConfigManager};

/// 配置管理API
pub struct ConfigApi {
    config_manager: Arc<ConfigManager>,
}

impl ConfigApi {
    /// 创建新的ConfigApi实例
    pub fn new(config_manager: Arc<ConfigManager>) -> Self {
        Self { config_manager }
    }

    /// 查询全部配置（含默认值）
    pub fn list_configs(&self) -> ApiResult<BTreeMap<String, String>> {
        let snapshot = self
            .config_manager
            .get_config_snapshot()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        serde_json::from_str(&snapshot).map_err(|e| ApiError::InternalError(e.to_string()))
    }

    /// 查询单个配置
    pub fn get_config(&self, key: &str) -> ApiResult<String> {
        let key = key.trim();
        Self::check_key(key)?;
        self.list_configs()?
            .remove(key)
            .ok_or_else(|| ApiError::ConfigError(format!("配置快照缺少键: {}", key)))
    }

    /// 更新配置（仅正整数）
    pub fn update_config(&self, key: &str, value: &str) -> ApiResult<()> {
        let key = key.trim();
        Self::check_key(key)?;
        if value.trim().parse::<usize>().map(|v| v == 0).unwrap_or(true) {
            return Err(ApiError::InvalidInput(format!(
                "配置值必须为正整数: {}={}",
                key, value
            )));
        }

        self.config_manager
            .set_config_value(key, value)
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        tracing::info!(key = key, value = value, "配置已更新");
        Ok(())
    }

    fn check_key(key: &str) -> ApiResult<()> {
        if config_keys::ALL.contains(&key) {
            Ok(())
        } else {
            Err(ApiError::InvalidInput(format!(
                "未知配置键: {}（可用: {}）",
                key,
                config_keys::ALL.join(", ")
            )))
        }
    }
}
