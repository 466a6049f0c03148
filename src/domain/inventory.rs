// ==========================================
// 输电塔材料分解系统 - 目录零件模型
// ==========================================
// 用途: 外部目录存储提供的只读行，导入层写入，引擎层只读
// 约定: 分类字段按原样存储，大小写规范化只在比较时进行
// ==========================================

use crate::domain::types::FilterField;
use serde::{Deserialize, Serialize};

// ==========================================
// InventoryItem - 目录零件
// ==========================================
/// 一行目录数据：某个零件在一种或多种塔中的使用情况
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryItem {
    // ===== 标识 =====
    pub id: String, // 物料号（同一目录版本内唯一）

    // ===== 描述字段 =====
    pub short_description: String, // 物料短文本
    pub description: String,       // 长描述
    pub main_length: String,       // 主长度 (Long 2)
    pub drawing: String,           // 图纸号
    pub drawing_revision: String,  // 图纸修订

    // ===== 分类字段 =====
    pub item_type: String,    // 塔型
    pub manufacturer: String, // 制造商
    pub head: String,         // 塔头
    pub division: String,     // 分部
    pub body: String,         // 塔身
    pub section: String,      // 段
    pub position: String,     // 位置号

    // ===== 数量字段（缺失/非数字一律为 0）=====
    pub quantity_per_tower: f64, // 单塔数量
    pub unit_weight: f64,        // 单件重量
}

impl InventoryItem {
    /// 读取某个筛选字段对应的值
    pub fn field_value(&self, field: FilterField) -> &str {
        match field {
            FilterField::Type => &self.item_type,
            FilterField::Manufacturer => &self.manufacturer,
            FilterField::Head => &self.head,
            FilterField::Division => &self.division,
            FilterField::Body => &self.body,
            FilterField::Section => &self.section,
        }
    }

    /// 规范化后的分部名称（TRIM + UPPER）
    pub fn canonical_division(&self) -> String {
        canonicalize(&self.division)
    }

    /// 单塔数量（保证有限数值）
    pub fn original_quantity(&self) -> f64 {
        finite_or_zero(self.quantity_per_tower)
    }

    /// 单件重量（保证有限数值）
    pub fn unit_weight_value(&self) -> f64 {
        finite_or_zero(self.unit_weight)
    }
}

// ==========================================
// 数值与文本规范化
// ==========================================

/// 分部名称规范化：去除首尾空白并转大写
pub fn canonicalize(value: &str) -> String {
    value.trim().to_uppercase()
}

/// 非有限数值（NaN / ±Infinity）统一视为 0
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// 文本转数值：无法解析或非有限时返回 0
pub fn parse_number(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .map(finite_or_zero)
        .unwrap_or(0.0)
}
