// ==========================================
// 输电塔材料分解系统 - 汇总器
// ==========================================
// 职责: 材料清单行 → 总件数 / 总重量（纯归约，无副作用）
// ==========================================

use crate::domain::calculation::{CalculatedLine, Totals};
use crate::domain::inventory::finite_or_zero;

/// 汇总全部清单行（空列表返回 0）
pub fn summarize(lines: &[CalculatedLine]) -> Totals {
    let (pieces, weight) = lines.iter().fold((0.0_f64, 0.0_f64), |(p, w), line| {
        (p + line.calculated_quantity, w + line.total_weight)
    });

    Totals {
        total_pieces: finite_or_zero(pieces),
        total_weight: finite_or_zero(weight),
    }
}
