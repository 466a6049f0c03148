// ==========================================
// 输电塔材料分解系统 - 命令行定义与分发
// ==========================================
// 职责: clap 参数定义 → 调用 API → 返回 JSON 信封
// ==========================================

use std::fs::File;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::api::{ApiError, ApiResult};
use crate::app::{
    AppState, CalculateResponse, ConfigResponse, ImportResponse, OptionsResponse, SearchResponse,
    SummaryResponse,
};
use crate::domain::calculation::SelectedPart;
use crate::domain::types::FilterField;
use crate::engine::inventory_filter::FilterSet;
use crate::export::write_bom_csv;
use crate::repository::ColumnMapping;

#[derive(Parser, Debug)]
#[command(name = "tower-breakdown")]
#[command(version)]
#[command(about = "输电塔零件目录筛选与材料用量计算")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 数据库文件路径（环境变量 TOWER_BREAKDOWN_DB_PATH 优先）
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// 目录列布局: legacy / spreadsheet / snake_case
    #[arg(long, global = true, default_value = "legacy")]
    pub layout: String,

    /// 目录表名（默认 piezas）
    #[arg(long, global = true)]
    pub table: Option<String>,

    /// 以 JSON 格式输出日志（stderr）
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 导入目录文件（.csv / .xlsx / .xls / .json），整表替换
    Import {
        /// 目录文件路径
        file: PathBuf,
    },

    /// 列出各筛选字段的候选值
    Options(FilterArgs),

    /// 浏览目录（受返回上限约束）
    Search(FilterArgs),

    /// 按选择的分部计算材料用量
    Calculate {
        /// 塔型
        #[arg(long)]
        tipo: Option<String>,

        /// 制造商
        #[arg(long)]
        fabricante: Option<String>,

        /// 塔头
        #[arg(long)]
        cabeza: Option<String>,

        /// 分部及倍数，格式 NOMBRE=倍数（省略倍数时为 1），可重复
        #[arg(long = "part", short = 'p')]
        parts: Vec<String>,

        /// 同时导出材料清单 CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// 目录概况
    Summary(FilterArgs),

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// 查询配置（不指定 key 时列出全部）
    Get { key: Option<String> },

    /// 更新配置
    Set { key: String, value: String },
}

/// 六个筛选字段
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub tipo: Option<String>,

    #[arg(long)]
    pub fabricante: Option<String>,

    #[arg(long)]
    pub cabeza: Option<String>,

    #[arg(long)]
    pub parte: Option<String>,

    #[arg(long)]
    pub cuerpo: Option<String>,

    #[arg(long)]
    pub tramo: Option<String>,
}

impl FilterArgs {
    pub fn to_filter_set(&self) -> FilterSet {
        let mut filters = FilterSet::new();
        let pairs = [
            (FilterField::Type, &self.tipo),
            (FilterField::Manufacturer, &self.fabricante),
            (FilterField::Head, &self.cabeza),
            (FilterField::Division, &self.parte),
            (FilterField::Body, &self.cuerpo),
            (FilterField::Section, &self.tramo),
        ];
        for (field, value) in pairs {
            if let Some(value) = value {
                filters.set(field, value.trim());
            }
        }
        filters
    }
}

impl Cli {
    /// 按 --layout / --table 构造列映射
    pub fn column_mapping(&self) -> ApiResult<ColumnMapping> {
        let mapping = ColumnMapping::preset(&self.layout).ok_or_else(|| {
            ApiError::InvalidInput(format!(
                "未知目录布局: {}（可用: legacy / spreadsheet / snake_case）",
                self.layout
            ))
        })?;
        Ok(match self.table.as_deref().map(str::trim) {
            Some(table) if !table.is_empty() => mapping.with_table(table),
            _ => mapping,
        })
    }
}

/// 解析 "NOMBRE=倍数"
///
/// 倍数省略时为 1；负数或非整数为输入错误。
pub fn parse_selected_part(raw: &str) -> ApiResult<SelectedPart> {
    let (name, quantity) = match raw.rsplit_once('=') {
        Some((name, quantity)) => {
            let quantity = quantity.trim().parse::<u32>().map_err(|_| {
                ApiError::InvalidInput(format!("分部倍数必须为非负整数: {}", raw))
            })?;
            (name.trim(), quantity)
        }
        None => (raw.trim(), 1),
    };

    if name.is_empty() {
        return Err(ApiError::InvalidInput(format!("分部名称不能为空: {}", raw)));
    }
    Ok(SelectedPart::new(name, quantity))
}

/// 执行命令，返回输出的 JSON
pub fn execute(command: &Commands, state: &AppState) -> ApiResult<serde_json::Value> {
    match command {
        Commands::Import { file } => {
            let report = state.import_api.import_catalog(&file.to_string_lossy())?;
            to_json(&ImportResponse::from(report))
        }
        Commands::Options(args) => {
            let options = state.catalog_api.list_filter_options(&args.to_filter_set())?;
            to_json(&OptionsResponse::from(options))
        }
        Commands::Search(args) => {
            let items = state.catalog_api.search(&args.to_filter_set())?;
            to_json(&SearchResponse::from(items))
        }
        Commands::Calculate {
            tipo,
            fabricante,
            cabeza,
            parts,
            csv,
        } => {
            let filters = FilterArgs {
                tipo: tipo.clone(),
                fabricante: fabricante.clone(),
                cabeza: cabeza.clone(),
                ..Default::default()
            }
            .to_filter_set();
            let parts = parts
                .iter()
                .map(|raw| parse_selected_part(raw))
                .collect::<ApiResult<Vec<_>>>()?;

            let result = state.catalog_api.calculate(&filters, &parts)?;
            if let Some(path) = csv {
                let file = File::create(path).map_err(|e| {
                    ApiError::InvalidInput(format!("无法创建导出文件 {}: {}", path.display(), e))
                })?;
                let rows = write_bom_csv(file, &result)
                    .map_err(|e| ApiError::InternalError(format!("CSV 导出失败: {}", e)))?;
                tracing::info!(path = %path.display(), rows = rows, "材料清单已导出");
            }
            to_json(&CalculateResponse::from(result))
        }
        Commands::Summary(args) => {
            let summary = state.catalog_api.catalog_summary(&args.to_filter_set())?;
            to_json(&SummaryResponse::from(summary))
        }
        Commands::Config(ConfigCommands::Get { key }) => {
            let config = match key {
                Some(key) => serde_json::json!({ key.trim(): state.config_api.get_config(key)? }),
                None => to_json(&state.config_api.list_configs()?)?,
            };
            to_json(&ConfigResponse {
                success: true,
                config,
            })
        }
        Commands::Config(ConfigCommands::Set { key, value }) => {
            state.config_api.update_config(key, value)?;
            to_json(&ConfigResponse {
                success: true,
                config: serde_json::json!({ key.trim(): value.trim() }),
            })
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> ApiResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| ApiError::InternalError(e.to_string()))
}
