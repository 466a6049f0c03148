// ==========================================
// 输电塔材料分解系统 - 材料清单 CSV 导出
// ==========================================
// 列顺序与历史导出一致；重量保留两位小数
// ==========================================

use crate::domain::calculation::CalculationResult;
use std::io::Write;

/// 导出表头
pub const BOM_HEADERS: [&str; 11] = [
    "Material",
    "Descripción",
    "Parte",
    "Posición",
    "Cant. Original",
    "Cant. Calculada",
    "Peso Unit.",
    "Peso Total",
    "Long 2",
    "Plano",
    "Mod Plano",
];

/// 写出材料清单
///
/// 返回写出的数据行数（不含表头）。
pub fn write_bom_csv<W: Write>(writer: W, result: &CalculationResult) -> csv::Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(BOM_HEADERS)?;

    for line in &result.results {
        csv_writer.write_record([
            line.id.as_str(),
            line.description.as_str(),
            line.division.as_str(),
            line.position.as_str(),
            &format_quantity(line.original_quantity),
            &format_quantity(line.calculated_quantity),
            &format!("{:.2}", line.unit_weight),
            &format!("{:.2}", line.total_weight),
            line.main_length.as_str(),
            line.drawing.as_str(),
            line.drawing_revision.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(result.results.len())
}

/// 整数数量不带小数位，二分得到的半数保留原样
fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
