// ==========================================
// 输电塔材料分解系统 - 字段映射器实现
// ==========================================
// 职责: 源表头 → 标准字段映射（多套历史命名的别名表）
// 约定: 表头比较前去掉首尾空白与包裹引号；空表头 / Unnamed* 列丢弃
// ==========================================

use crate::importer::file_parser::RawRecord;

// ==========================================
// RawCatalogRow - 映射后的原始目录行（尚未清洗）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCatalogRow {
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

    // 元信息
    pub row_number: usize,
}

// 标准字段 → 可接受的源表头
const ID_ALIASES: &[&str] = &["ID_Item", "ID_ITEM", "id_item", "Material", "material"];
const SHORT_DESCRIPTION_ALIASES: &[&str] = &[
    "Texto_breve_del_material",
    "TEXTO_BREVE_DEL_MATERIAL",
    "texto_breve_del_material",
    "texto_breve",
];
const DESCRIPTION_ALIASES: &[&str] = &["Descripción", "Descripcion", "DESCRIPCION", "descripcion"];
const MAIN_LENGTH_ALIASES: &[&str] = &[
    "Long 2 (Principal)",
    "LONG_2_PRINCIPAL",
    "long_2_principal",
    "Long 2",
];
const DRAWING_ALIASES: &[&str] = &["PLANO", "Plano", "plano"];
const DRAWING_REVISION_ALIASES: &[&str] = &["mod_plano", "MOD_PLANO", "Mod Plano", "Mod_Plano"];
const TYPE_ALIASES: &[&str] = &["TIPO", "Tipo", "tipo"];
const MANUFACTURER_ALIASES: &[&str] = &["FABRICANTE", "Fabricante", "fabricante"];
const HEAD_ALIASES: &[&str] = &["Cabeza", "CABEZA", "cabeza"];
const DIVISION_ALIASES: &[&str] = &[
    "Parte (Division)",
    "PARTE_DIVISION",
    "parte_division",
    "Parte",
    "parte",
];
const BODY_ALIASES: &[&str] = &["Cuerpo", "CUERPO", "cuerpo"];
const SECTION_ALIASES: &[&str] = &["Tramo", "TRAMO", "tramo"];
const POSITION_ALIASES: &[&str] = &["Posición", "Posicion", "POSICION", "posicion"];
const QUANTITY_ALIASES: &[&str] = &[
    "Cantidad_x_Torre",
    "CANTIDAD_X_TORRE",
    "cantidad_x_torre",
    "Cantidad",
];
const UNIT_WEIGHT_ALIASES: &[&str] = &[
    "Peso_Unitario",
    "PESO_UNITARIO",
    "peso_unitario",
    "Peso Unitario",
];

pub struct FieldMapper;

impl FieldMapper {
    /// 原始行 → 标准字段
    pub fn map_to_catalog_row(&self, row: &RawRecord, row_number: usize) -> RawCatalogRow {
        let row = normalize_headers(row);
        let get = |aliases: &[&str]| get_string(&row, aliases);

        RawCatalogRow {
            id: get(ID_ALIASES),
            short_description: get(SHORT_DESCRIPTION_ALIASES),
            description: get(DESCRIPTION_ALIASES),
            main_length: get(MAIN_LENGTH_ALIASES),
            drawing: get(DRAWING_ALIASES),
            drawing_revision: get(DRAWING_REVISION_ALIASES),
            item_type: get(TYPE_ALIASES),
            manufacturer: get(MANUFACTURER_ALIASES),
            head: get(HEAD_ALIASES),
            division: get(DIVISION_ALIASES),
            body: get(BODY_ALIASES),
            section: get(SECTION_ALIASES),
            position: get(POSITION_ALIASES),
            quantity_per_tower: get(QUANTITY_ALIASES),
            unit_weight: get(UNIT_WEIGHT_ALIASES),
            row_number,
        }
    }
}

/// 清理表头并丢弃无名列
fn normalize_headers(row: &RawRecord) -> RawRecord {
    row.iter()
        .filter_map(|(key, value)| {
            let clean = clean_header(key);
            if clean.is_empty() || clean.starts_with("Unnamed") {
                None
            } else {
                Some((clean, value.clone()))
            }
        })
        .collect()
}

/// 去掉首尾空白与包裹引号
pub fn clean_header(key: &str) -> String {
    key.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_string()
}

/// 按别名顺序取第一个非空值
fn get_string(row: &RawRecord, aliases: &[&str]) -> String {
    aliases
        .iter()
        .filter_map(|alias| row.get(*alias))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_spreadsheet_headers() {
        let row = raw(&[
            ("ID_Item", "P-001"),
            ("Parte (Division)", "BSUP"),
            ("Posición", "12"),
            ("Cantidad_x_Torre", "4"),
        ]);
        let mapped = FieldMapper.map_to_catalog_row(&row, 2);
        assert_eq!(mapped.id, "P-001");
        assert_eq!(mapped.division, "BSUP");
        assert_eq!(mapped.position, "12");
        assert_eq!(mapped.quantity_per_tower, "4");
        assert_eq!(mapped.row_number, 2);
    }

    #[test]
    fn test_legacy_and_snake_case_headers() {
        let legacy = raw(&[("PARTE_DIVISION", "BINF"), ("CANTIDAD_X_TORRE", "2")]);
        let snake = raw(&[("parte_division", "BINF"), ("cantidad_x_torre", "2")]);
        assert_eq!(
            FieldMapper.map_to_catalog_row(&legacy, 1).division,
            FieldMapper.map_to_catalog_row(&snake, 1).division
        );
    }

    #[test]
    fn test_quoted_and_unnamed_headers() {
        let row = raw(&[
            ("\"TIPO\" ", "S2"),
            ("Unnamed: 15", "basura"),
            ("", "x"),
        ]);
        let mapped = FieldMapper.map_to_catalog_row(&row, 1);
        assert_eq!(mapped.item_type, "S2");
        assert_eq!(mapped.description, "");
    }
}
