// ==========================================
// 输电塔材料分解系统 - 引擎层
// ==========================================
// 职责: 实现业务规则引擎,不拼 SQL
// 红线: 引擎只处理已取出的目录行，不做 I/O
// ==========================================

pub mod aggregator;
pub mod division_rules;
pub mod inventory_filter;
pub mod material_calc;

// 重导出核心引擎
pub use aggregator::summarize;
pub use division_rules::{rule_for, HALVING_DIVISIONS, QUARTERING_DIVISIONS};
pub use inventory_filter::{FilterSet, DEFAULT_SEARCH_CAP};
pub use material_calc::{quantity_for, MaterialCalcEngine};
