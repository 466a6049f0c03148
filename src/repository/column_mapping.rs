// ==========================================
// 输电塔材料分解系统 - 目录列映射
// ==========================================
// 职责: 逻辑字段 → 存储列名 的对照表（含表名）
// 说明: 历史目录存在多套列命名（大写下划线 / 原始表头 / 小写下划线），
//       差异只体现在这里，引擎与筛选规则只有一份
// ==========================================

use crate::domain::types::FilterField;
use serde::{Deserialize, Serialize};

// ==========================================
// ColumnMapping - 列映射表
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub table: String,

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

    pub quantity_per_tower: String,
    pub unit_weight: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self::legacy()
    }
}

impl ColumnMapping {
    /// 历史 SQLite 目录（piezas 表，大写下划线列名），也是本系统建库的布局
    pub fn legacy() -> Self {
        Self {
            table: "piezas".to_string(),
            id: "ID_ITEM".to_string(),
            short_description: "TEXTO_BREVE_DEL_MATERIAL".to_string(),
            description: "DESCRIPCION".to_string(),
            main_length: "LONG_2_PRINCIPAL".to_string(),
            drawing: "PLANO".to_string(),
            drawing_revision: "MOD_PLANO".to_string(),
            item_type: "TIPO".to_string(),
            manufacturer: "FABRICANTE".to_string(),
            head: "CABEZA".to_string(),
            division: "PARTE_DIVISION".to_string(),
            body: "CUERPO".to_string(),
            section: "TRAMO".to_string(),
            position: "POSICION".to_string(),
            quantity_per_tower: "CANTIDAD_X_TORRE".to_string(),
            unit_weight: "PESO_UNITARIO".to_string(),
        }
    }

    /// 原始表头布局（Excel 导出的列名原样入库）
    pub fn spreadsheet_headers() -> Self {
        Self {
            table: "piezas".to_string(),
            id: "ID_Item".to_string(),
            short_description: "Texto_breve_del_material".to_string(),
            description: "Descripción".to_string(),
            main_length: "Long 2 (Principal)".to_string(),
            drawing: "PLANO".to_string(),
            drawing_revision: "mod_plano".to_string(),
            item_type: "TIPO".to_string(),
            manufacturer: "FABRICANTE".to_string(),
            head: "Cabeza".to_string(),
            division: "Parte (Division)".to_string(),
            body: "Cuerpo".to_string(),
            section: "Tramo".to_string(),
            position: "Posición".to_string(),
            quantity_per_tower: "Cantidad_x_Torre".to_string(),
            unit_weight: "Peso_Unitario".to_string(),
        }
    }

    /// 迁移后的小写下划线布局
    pub fn snake_case() -> Self {
        Self {
            table: "piezas".to_string(),
            id: "id_item".to_string(),
            short_description: "texto_breve".to_string(),
            description: "descripcion".to_string(),
            main_length: "long_2_principal".to_string(),
            drawing: "plano".to_string(),
            drawing_revision: "mod_plano".to_string(),
            item_type: "tipo".to_string(),
            manufacturer: "fabricante".to_string(),
            head: "cabeza".to_string(),
            division: "parte_division".to_string(),
            body: "cuerpo".to_string(),
            section: "tramo".to_string(),
            position: "posicion".to_string(),
            quantity_per_tower: "cantidad_x_torre".to_string(),
            unit_weight: "peso_unitario".to_string(),
        }
    }

    /// 按名称选择预置映射
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "legacy" => Some(Self::legacy()),
            "spreadsheet" | "spreadsheet_headers" => Some(Self::spreadsheet_headers()),
            "snake_case" | "snake" => Some(Self::snake_case()),
            _ => None,
        }
    }

    pub fn with_table(mut self, table: &str) -> Self {
        self.table = table.to_string();
        self
    }

    /// 筛选字段对应的存储列
    pub fn column_for(&self, field: FilterField) -> &str {
        match field {
            FilterField::Type => &self.item_type,
            FilterField::Manufacturer => &self.manufacturer,
            FilterField::Head => &self.head,
            FilterField::Division => &self.division,
            FilterField::Body => &self.body,
            FilterField::Section => &self.section,
        }
    }

    /// SELECT 列清单的固定顺序（与行解码顺序一致）
    pub fn ordered_columns(&self) -> [&str; 15] {
        [
            &self.id,
            &self.short_description,
            &self.description,
            &self.main_length,
            &self.drawing,
            &self.drawing_revision,
            &self.item_type,
            &self.manufacturer,
            &self.head,
            &self.division,
            &self.body,
            &self.section,
            &self.position,
            &self.quantity_per_tower,
            &self.unit_weight,
        ]
    }

    /// 已加引号的列清单
    pub fn select_list(&self) -> String {
        self.ordered_columns()
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// 已加引号的表名
    pub fn quoted_table(&self) -> String {
        quote_ident(&self.table)
    }
}

/// SQLite 标识符加引号（列名中可能含空格、括号、重音字符）
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("TIPO"), "\"TIPO\"");
        assert_eq!(quote_ident("Parte (Division)"), "\"Parte (Division)\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_column_for_each_preset() {
        assert_eq!(ColumnMapping::legacy().column_for(FilterField::Division), "PARTE_DIVISION");
        assert_eq!(
            ColumnMapping::spreadsheet_headers().column_for(FilterField::Division),
            "Parte (Division)"
        );
        assert_eq!(ColumnMapping::snake_case().column_for(FilterField::Section), "tramo");
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(ColumnMapping::preset("LEGACY"), Some(ColumnMapping::legacy()));
        assert_eq!(ColumnMapping::preset("snake"), Some(ColumnMapping::snake_case()));
        assert_eq!(ColumnMapping::preset("mongo"), None);
    }

    #[test]
    fn test_select_list_order() {
        let list = ColumnMapping::legacy().select_list();
        assert!(list.starts_with("\"ID_ITEM\", \"TEXTO_BREVE_DEL_MATERIAL\""));
        assert!(list.ends_with("\"CANTIDAD_X_TORRE\", \"PESO_UNITARIO\""));
    }
}
