// ==========================================
// 输电塔材料分解系统 - 命令行主入口
// ==========================================
// 输出: stdout 为 JSON 信封；错误输出 ErrorResponse
// 退出码: 0 成功 / 2 输入错误 / 1 服务端错误
// ==========================================

use std::process::ExitCode;

use clap::Parser;
use tower_breakdown::api::{ApiError, ErrorResponse};
use tower_breakdown::app::{resolve_db_path, AppState};
use tower_breakdown::cli::{execute, Cli};
use tower_breakdown::logging;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::debug!("{} v{}", tower_breakdown::APP_NAME, tower_breakdown::VERSION);

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            if err.is_client_error() {
                tracing::warn!(code = err.code(), error = %err, "请求被拒绝");
            } else {
                tracing::error!(code = err.code(), error = %err, "命令执行失败");
            }
            let response = ErrorResponse::from(&err);
            match serde_json::to_string_pretty(&response) {
                Ok(json) => println!("{}", json),
                Err(_) => println!("{}", response.message),
            }
            if err.is_client_error() {
                ExitCode::from(2)
            } else {
                ExitCode::from(1)
            }
        }
    }
}

fn run(cli: &Cli) -> Result<String, ApiError> {
    let db_path = resolve_db_path(cli.db.as_deref());
    tracing::info!(db_path = %db_path, "使用数据库");

    let mapping = cli.column_mapping()?;
    let state = AppState::with_mapping(db_path, mapping).map_err(ApiError::DatabaseConnectionError)?;

    let output = execute(&cli.command, &state)?;
    serde_json::to_string_pretty(&output).map_err(|e| ApiError::InternalError(e.to_string()))
}
