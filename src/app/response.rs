// ==========================================
// 输电塔材料分解系统 - 响应封装
// ==========================================
// 职责: 命令输出的 JSON 信封（success + 数据）
// ==========================================

use serde::Serialize;

use crate::api::{CatalogSummary, FilterOptions};
use crate::domain::calculation::{CalculatedLine, CalculationResult, Totals};
use crate::domain::inventory::InventoryItem;
use crate::importer::ImportReport;

/// 目录浏览响应
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub count: usize,
    pub results: Vec<InventoryItem>,
}

impl From<Vec<InventoryItem>> for SearchResponse {
    fn from(results: Vec<InventoryItem>) -> Self {
        Self {
            success: true,
            count: results.len(),
            results,
        }
    }
}

/// 下拉选项响应
#[derive(Debug, Clone, Serialize)]
pub struct OptionsResponse {
    pub success: bool,
    pub options: FilterOptions,
}

impl From<FilterOptions> for OptionsResponse {
    fn from(options: FilterOptions) -> Self {
        Self {
            success: true,
            options,
        }
    }
}

/// 材料计算响应
#[derive(Debug, Clone, Serialize)]
pub struct CalculateResponse {
    pub success: bool,
    pub count: usize,
    pub results: Vec<CalculatedLine>,
    pub totals: Totals,
}

impl From<CalculationResult> for CalculateResponse {
    fn from(result: CalculationResult) -> Self {
        Self {
            success: true,
            count: result.count(),
            results: result.results,
            totals: result.totals,
        }
    }
}

/// 目录概况响应
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub success: bool,
    #[serde(flatten)]
    pub summary: CatalogSummary,
}

impl From<CatalogSummary> for SummaryResponse {
    fn from(summary: CatalogSummary) -> Self {
        Self {
            success: true,
            summary,
        }
    }
}

/// 导入响应
#[derive(Debug, Clone, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    pub report: ImportReport,
}

impl From<ImportReport> for ImportResponse {
    fn from(report: ImportReport) -> Self {
        Self {
            success: true,
            report,
        }
    }
}

/// 配置响应
#[derive(Debug, Clone, Serialize)]
pub struct ConfigResponse {
    pub success: bool,
    pub config: serde_json::Value,
}
