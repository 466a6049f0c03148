// ==========================================
// 输电塔材料分解系统 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 数值强制转换
// 规则: "" / NaN / null / undefined 视为空；数值非有限一律为 0
// ==========================================

use crate::domain::inventory::{parse_number, InventoryItem};
use crate::importer::field_mapper::RawCatalogRow;

pub struct DataCleaner;

impl DataCleaner {
    /// 文本清洗：TRIM，占位空值归一为空串
    pub fn clean_text(&self, value: &str) -> String {
        let trimmed = value.trim();
        match trimmed.to_lowercase().as_str() {
            "nan" | "null" | "undefined" | "none" => String::new(),
            _ => trimmed.to_string(),
        }
    }

    /// 数值清洗：无法解析 / 非有限 → 0
    pub fn clean_number(&self, value: &str) -> f64 {
        parse_number(&self.clean_text(value))
    }

    /// 清洗一行；完全没有物料号与分部的行返回 None（计入跳过数）
    pub fn clean_row(&self, row: &RawCatalogRow) -> Option<InventoryItem> {
        let item = InventoryItem {
            id: self.clean_text(&row.id),
            short_description: self.clean_text(&row.short_description),
            description: self.clean_text(&row.description),
            main_length: self.clean_text(&row.main_length),
            drawing: self.clean_text(&row.drawing),
            drawing_revision: self.clean_text(&row.drawing_revision),
            item_type: self.clean_text(&row.item_type),
            manufacturer: self.clean_text(&row.manufacturer),
            head: self.clean_text(&row.head),
            division: self.clean_text(&row.division),
            body: self.clean_text(&row.body),
            section: self.clean_text(&row.section),
            position: self.clean_text(&row.position),
            quantity_per_tower: self.clean_number(&row.quantity_per_tower),
            unit_weight: self.clean_number(&row.unit_weight),
        };

        if item.id.is_empty() && item.division.is_empty() {
            None
        } else {
            Some(item)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_placeholders() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.clean_text("  BSUP "), "BSUP");
        assert_eq!(cleaner.clean_text("NaN"), "");
        assert_eq!(cleaner.clean_text("undefined"), "");
        assert_eq!(cleaner.clean_text("null"), "");
    }

    #[test]
    fn test_clean_number() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.clean_number("4"), 4.0);
        assert_eq!(cleaner.clean_number("NaN"), 0.0);
        assert_eq!(cleaner.clean_number("Infinity"), 0.0);
        assert_eq!(cleaner.clean_number("doce"), 0.0);
    }

    #[test]
    fn test_clean_row_skips_blank_identity() {
        let cleaner = DataCleaner;
        let blank = RawCatalogRow {
            description: "solo descripción".to_string(),
            ..Default::default()
        };
        assert!(cleaner.clean_row(&blank).is_none());

        let row = RawCatalogRow {
            id: "P-001".to_string(),
            division: " BSUP ".to_string(),
            quantity_per_tower: "4".to_string(),
            unit_weight: "NaN".to_string(),
            ..Default::default()
        };
        let item = cleaner.clean_row(&row).unwrap();
        assert_eq!(item.division, "BSUP");
        assert_eq!(item.quantity_per_tower, 4.0);
        assert_eq!(item.unit_weight, 0.0);
    }
}
