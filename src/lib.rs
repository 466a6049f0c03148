// ==========================================
// 输电塔材料分解系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 目录筛选 + 按分部组合计算材料用量
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建库）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 依赖组装与响应封装
pub mod app;

// 材料清单导出
pub mod export;

// 命令行
pub mod cli;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DivisionRule, FilterField};

// 领域实体
pub use domain::{CalculatedLine, CalculationResult, InventoryItem, SelectedPart, Totals};

// 引擎
pub use engine::{FilterSet, MaterialCalcEngine};

// API
pub use api::{ApiError, CatalogApi, ImportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "输电塔材料分解系统";
