// ==========================================
// 输电塔材料分解系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供目录数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod column_mapping;
pub mod error;
pub mod inventory_repo;
pub mod memory_repo;
pub mod sql_builder;

// 重导出核心仓储
pub use column_mapping::ColumnMapping;
pub use error::{RepositoryError, RepositoryResult};
pub use inventory_repo::{InventoryStore, InventoryWriter, SqliteInventoryRepository};
pub use memory_repo::InMemoryInventoryRepository;
pub use sql_builder::SqlQueryBuilder;
