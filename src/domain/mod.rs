// ==========================================
// 输电塔材料分解系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod calculation;
pub mod inventory;
pub mod types;

// 重导出核心类型
pub use calculation::{CalculatedLine, CalculationResult, SelectedPart, Totals};
pub use inventory::{canonicalize, finite_or_zero, parse_number, InventoryItem};
pub use types::{DivisionRule, FilterField};
