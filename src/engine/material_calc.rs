// ==========================================
// 输电塔材料分解系统 - 材料用量计算引擎
// ==========================================
// 职责: 目录行 × 选择的分部及倍数 → 材料清单行 + 汇总
// 输入: 已按粗筛条件取出的目录行（不设上限）、选择的分部列表
// 输出: CalculationResult（行顺序与输入目录顺序一致）
// 红线: 引擎不访问存储，输出中不得出现 NaN / Infinity
// ==========================================

use crate::domain::calculation::{CalculatedLine, CalculationResult, SelectedPart};
use crate::domain::inventory::{canonicalize, finite_or_zero, InventoryItem};
use crate::domain::types::DivisionRule;
use crate::engine::aggregator;
use crate::engine::division_rules;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

// ==========================================
// MaterialCalcEngine - 材料用量计算引擎
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct MaterialCalcEngine;

impl MaterialCalcEngine {
    pub fn new() -> Self {
        Self
    }

    /// 计算材料清单
    ///
    /// 规则（逐行）:
    /// 1) 分部名称 TRIM + UPPER 后为空 → 跳过
    /// 2) 对每个名称相同的选择项累加用量（同名多项各自计算后求和）
    /// 3) 累计用量 > 0 才输出，总重量 = 用量 × 单件重量
    #[instrument(skip(self, items, parts), fields(rows = items.len(), parts = parts.len()))]
    pub fn calculate(&self, items: &[InventoryItem], parts: &[SelectedPart]) -> CalculationResult {
        // 选择项名称只规范化一次
        let selections: Vec<(String, u32)> = parts
            .iter()
            .map(|p| (canonicalize(&p.part), p.quantity))
            .collect();

        let mut lines = Vec::new();
        let mut divisions_seen = BTreeSet::new();

        for item in items {
            let division = item.canonical_division();
            if division.is_empty() {
                continue;
            }
            divisions_seen.insert(division.clone());

            let original_quantity = item.original_quantity();
            let rule = division_rules::rule_for(&division);

            let calculated_quantity: f64 = selections
                .iter()
                .filter(|(name, _)| *name == division)
                .map(|(_, multiplier)| quantity_for(rule, original_quantity, *multiplier))
                .sum();
            let calculated_quantity = finite_or_zero(calculated_quantity);

            if calculated_quantity > 0.0 {
                let unit_weight = item.unit_weight_value();
                let total_weight = finite_or_zero(calculated_quantity * unit_weight);
                lines.push(CalculatedLine::from_item(
                    item,
                    original_quantity,
                    calculated_quantity,
                    unit_weight,
                    total_weight,
                ));
            }
        }

        debug!(divisions = ?divisions_seen, "目录中出现的分部");

        let totals = aggregator::summarize(&lines);
        info!(
            scanned = items.len(),
            with_quantity = lines.len(),
            total_pieces = totals.total_pieces,
            total_weight = %format!("{:.2}", totals.total_weight),
            "材料计算完成"
        );

        CalculationResult {
            results: lines,
            totals,
        }
    }
}

/// 单个选择项贡献的用量
///
/// 顺序（命中即返回）:
/// 1) 可除分部且单塔数量 = 1 → 数量 × 倍数（单件不可再分）
/// 2) 二分集合 → 数量 × 倍数 / 2（不取整）
/// 3) 四分集合 → ceil(数量 × 倍数 / 4)
/// 4) 普通分部 → 数量 × 倍数
pub fn quantity_for(rule: DivisionRule, original_quantity: f64, multiplier: u32) -> f64 {
    let gross = original_quantity * f64::from(multiplier);

    if rule.is_divisible() && original_quantity == 1.0 {
        return gross;
    }

    match rule {
        DivisionRule::Halving => gross / 2.0,
        DivisionRule::Quartering => (gross / 4.0).ceil(),
        DivisionRule::Unit => gross,
    }
}
