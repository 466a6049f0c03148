// ==========================================
// 输电塔材料分解系统 - 分部分类集合
// ==========================================
// 职责: 判定分部名称属于二分集合、四分集合还是普通分部
// 数据: 人工维护的固定集合（规范化后的名称），两集合互不相交
// ==========================================

use crate::domain::inventory::canonicalize;
use crate::domain::types::DivisionRule;

/// 二分集合：对称结构的左右/前后面，单塔数量按 2 均分
pub const HALVING_DIVISIONS: [&str; 7] = [
    "BGDA", "BSUP", "BMED", "BINF", "BDER", "BIZQ", "BSUP/MED",
];

/// 四分集合：四腿塔脚分段，单塔数量按 4 均分后向上取整
///
/// 同时收录带 ".0" 后缀的写法，目录中两种写法并存。
pub const QUARTERING_DIVISIONS: [&str; 11] = [
    "PATA 0", "PATA 0.0", "PATA 1.5", "PATA 3", "PATA 3.0", "PATA 4.5", "PATA 6", "PATA 6.0",
    "PATA 7.5", "PATA 9", "PATA 9.0",
];

/// 查询分部名称对应的除法规则（输入先 TRIM + UPPER）
pub fn rule_for(division: &str) -> DivisionRule {
    let key = canonicalize(division);
    if HALVING_DIVISIONS.contains(&key.as_str()) {
        DivisionRule::Halving
    } else if QUARTERING_DIVISIONS.contains(&key.as_str()) {
        DivisionRule::Quartering
    } else {
        DivisionRule::Unit
    }
}

/// 是否属于二分集合
pub fn is_halving(division: &str) -> bool {
    rule_for(division) == DivisionRule::Halving
}

/// 是否属于四分集合
pub fn is_quartering(division: &str) -> bool {
    rule_for(division) == DivisionRule::Quartering
}
