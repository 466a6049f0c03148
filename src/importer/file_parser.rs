// ==========================================
// 输电塔材料分解系统 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析，输出 表头 → 单元格文本 的原始行
// 支持: Excel (.xlsx/.xls) / CSV (.csv) / JSON (.json)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// 原始行：表头 → 单元格文本
pub type RawRecord = HashMap<String, String>;

// ==========================================
// FileParser Trait
// ==========================================
pub trait FileParser {
    /// 解析文件为原始行（已跳过完全空白的行）
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>>;
}

/// 检查文件存在且扩展名在允许范围内
fn check_file(path: &Path, allowed: &[&str]) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        let ext = ext.to_lowercase();
        if !allowed.contains(&ext.as_str()) {
            return Err(ImportError::UnsupportedFormat(ext));
        }
    }
    Ok(())
}

fn is_blank(record: &RawRecord) -> bool {
    record.values().all(|v| v.trim().is_empty())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>> {
        check_file(file_path, &["csv"])?;

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: RawRecord = headers
                .iter()
                .cloned()
                .zip(record.iter().map(|v| v.trim().to_string()))
                .collect();

            if is_blank(&row) {
                continue;
            }
            records.push(row);
        }

        Ok(records)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>> {
        check_file(file_path, &["xlsx", "xls"])?;

        let mut workbook = open_workbook_auto(file_path)?;

        // 只读第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut records = Vec::new();
        for data_row in rows {
            let row: RawRecord = headers
                .iter()
                .cloned()
                .zip(data_row.iter().map(|cell| cell.to_string().trim().to_string()))
                .collect();

            if is_blank(&row) {
                continue;
            }
            records.push(row);
        }

        debug!(sheet = %sheet_name, rows = records.len(), "Excel 解析完成");
        Ok(records)
    }
}

// ==========================================
// JSON Parser 实现
// ==========================================
// 导出的 JSON 里常见裸 NaN / Infinity / undefined，先替换为 null 再解析
pub struct JsonParser;

impl FileParser for JsonParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>> {
        check_file(file_path, &["json"])?;

        let content = std::fs::read_to_string(file_path)?;
        parse_json_text(&content)
    }
}

/// 解析 JSON 文本：顶层数组，或对象中的 data / records / 第一个数组字段
pub fn parse_json_text(content: &str) -> ImportResult<Vec<RawRecord>> {
    let cleaned = clean_json_text(content);
    let document: Value = serde_json::from_str(&cleaned)?;

    let documents = match document {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let key = ["data", "records"]
                .iter()
                .map(|k| k.to_string())
                .find(|k| matches!(map.get(k), Some(Value::Array(_))))
                .or_else(|| {
                    map.iter()
                        .find(|(_, v)| v.is_array())
                        .map(|(k, _)| k.clone())
                });
            match key.and_then(|k| map.remove(&k)) {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(ImportError::JsonParseError(
                        "JSON 中未找到记录数组".to_string(),
                    ))
                }
            }
        }
        _ => {
            return Err(ImportError::JsonParseError(
                "JSON 顶层必须是数组或对象".to_string(),
            ))
        }
    };

    let mut records = Vec::new();
    for doc in documents {
        let Value::Object(fields) = doc else {
            debug!("跳过非对象记录");
            continue;
        };
        let row: RawRecord = fields
            .into_iter()
            .map(|(key, value)| (key, json_cell_text(value)))
            .collect();
        if is_blank(&row) {
            continue;
        }
        records.push(row);
    }
    Ok(records)
}

fn json_cell_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// 把字符串字面量以外的裸 NaN / Infinity / -Infinity / undefined 替换为 null
pub fn clean_json_text(content: &str) -> String {
    const BARE_TOKENS: [&str; 4] = ["-Infinity", "Infinity", "NaN", "undefined"];

    let mut out = String::with_capacity(content.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = content;

    while let Some(ch) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
            continue;
        }

        if ch == '"' {
            in_string = true;
            out.push(ch);
            rest = &rest[1..];
            continue;
        }

        if let Some(token) = BARE_TOKENS.iter().find(|t| rest.starts_with(**t)) {
            out.push_str("null");
            rest = &rest[token.len()..];
            continue;
        }

        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    out
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<RawRecord>> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_to_raw_records(path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_records(path),
            "json" => JsonParser.parse_to_raw_records(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn temp_with_suffix(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let file = temp_with_suffix(
            ".csv",
            "ID_Item,TIPO,Parte (Division)\nP-001,S2,BSUP\nP-002,S2, PATA 3 \n",
        );
        let records = CsvParser.parse_to_raw_records(file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("ID_Item"), Some(&"P-001".to_string()));
        assert_eq!(records[1].get("Parte (Division)"), Some(&"PATA 3".to_string()));
    }

    #[test]
    fn test_csv_parser_skip_empty_rows() {
        let file = temp_with_suffix(".csv", "ID_Item,TIPO\nP-001,S2\n,\nP-002,S2\n");
        let records = CsvParser.parse_to_raw_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parser_file_not_found() {
        let result = CsvParser.parse_to_raw_records(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_universal_parser_rejects_unknown_extension() {
        let file = temp_with_suffix(".txt", "hola");
        let result = UniversalFileParser.parse(file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(ext)) if ext == "txt"));
    }

    #[test]
    fn test_clean_json_text_replaces_bare_tokens_only() {
        let cleaned = clean_json_text(
            r#"{"a": NaN, "b": -Infinity, "c": Infinity, "d": undefined, "e": "NaN value"}"#,
        );
        assert_eq!(
            cleaned,
            r#"{"a": null, "b": null, "c": null, "d": null, "e": "NaN value"}"#
        );
    }

    #[test]
    fn test_parse_json_text_variants() {
        let top_level = parse_json_text(r#"[{"TIPO": "S2", "Cantidad_x_Torre": 4}]"#).unwrap();
        assert_eq!(top_level.len(), 1);
        assert_eq!(top_level[0].get("Cantidad_x_Torre"), Some(&"4".to_string()));

        let wrapped = parse_json_text(
            r#"{"meta": 1, "items": [{"TIPO": "S2", "Peso_Unitario": NaN}, {}]}"#,
        )
        .unwrap();
        assert_eq!(wrapped.len(), 1);
        assert_eq!(wrapped[0].get("Peso_Unitario"), Some(&String::new()));

        assert!(matches!(
            parse_json_text(r#"{"meta": 1}"#),
            Err(ImportError::JsonParseError(_))
        ));
    }

    #[test]
    fn test_parse_json_text_first_array_in_document_order() {
        let records = parse_json_text(
            r#"{"zeta": [{"ID_Item": "Z-1"}], "alpha": [{"ID_Item": "A-1"}, {"ID_Item": "A-2"}]}"#,
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("ID_Item"), Some(&"Z-1".to_string()));

        // data / records 优先于文档顺序
        let records = parse_json_text(
            r#"{"zeta": [{"ID_Item": "Z-1"}], "records": [{"ID_Item": "R-1"}]}"#,
        )
        .unwrap();
        assert_eq!(records[0].get("ID_Item"), Some(&"R-1".to_string()));
    }
}
