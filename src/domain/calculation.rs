// ==========================================
// 输电塔材料分解系统 - 材料计算模型
// ==========================================
// 用途: 单次计算请求内的临时对象，不落库、不跨请求共享
// ==========================================

use crate::domain::inventory::InventoryItem;
use serde::{Deserialize, Serialize};

// ==========================================
// SelectedPart - 用户选择的分部
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedPart {
    /// 分部名称（比较前规范化）
    pub part: String,
    /// 数量倍数（0 视为排除该分部）
    #[serde(default)]
    pub quantity: u32,
}

impl SelectedPart {
    pub fn new(part: impl Into<String>, quantity: u32) -> Self {
        Self {
            part: part.into(),
            quantity,
        }
    }
}

// ==========================================
// CalculatedLine - 材料清单行
// ==========================================
/// 一个目录零件在当前分部组合下的用量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedLine {
    // ===== 从目录行复制的描述字段 =====
    pub id: String,
    pub short_description: String,
    pub description: String,
    pub main_length: String,
    pub drawing: String,
    pub drawing_revision: String,
    pub item_type: String,
    pub manufacturer: String,
    pub head: String,
    pub division: String,
    pub body: String,
    pub section: String,
    pub position: String,

    // ===== 计算结果 =====
    pub original_quantity: f64,   // 单塔数量
    pub calculated_quantity: f64, // 计算数量
    pub unit_weight: f64,         // 单件重量
    pub total_weight: f64,        // 总重量 = 计算数量 × 单件重量
}

impl CalculatedLine {
    pub fn from_item(
        item: &InventoryItem,
        original_quantity: f64,
        calculated_quantity: f64,
        unit_weight: f64,
        total_weight: f64,
    ) -> Self {
        Self {
            id: item.id.clone(),
            short_description: item.short_description.clone(),
            description: item.description.clone(),
            main_length: item.main_length.clone(),
            drawing: item.drawing.clone(),
            drawing_revision: item.drawing_revision.clone(),
            item_type: item.item_type.clone(),
            manufacturer: item.manufacturer.clone(),
            head: item.head.clone(),
            division: item.division.clone(),
            body: item.body.clone(),
            section: item.section.clone(),
            position: item.position.clone(),
            original_quantity,
            calculated_quantity,
            unit_weight,
            total_weight,
        }
    }
}

// ==========================================
// Totals - 汇总
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub total_pieces: f64,
    pub total_weight: f64,
}

// ==========================================
// CalculationResult - 计算结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub results: Vec<CalculatedLine>,
    pub totals: Totals,
}

impl CalculationResult {
    pub fn count(&self) -> usize {
        self.results.len()
    }
}
