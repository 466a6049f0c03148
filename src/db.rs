// ==========================================
// 输电塔材料分解系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发读写时的偶发 busy 错误
// - 建库：目录表（历史 piezas 布局）+ config_kv + schema_version
// ==========================================

use crate::domain::inventory::canonicalize;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 规范化比较函数名：canon(x) = TRIM + UPPER（Unicode 大小写）
pub const CANON_FUNCTION: &str = "canon";

/// 注册目录查询使用的标量函数
///
/// SQLite 内置 UPPER 只转换 ASCII，段 (TRAMO) 比较统一走 canon()，
/// 与内存中 `canonicalize` 的结果一致。NULL / BLOB 返回 NULL。
pub fn register_catalog_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        CANON_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text = match ctx.get_raw(0) {
                ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned(),
                ValueRef::Integer(i) => i.to_string(),
                ValueRef::Real(f) => f.to_string(),
                ValueRef::Null | ValueRef::Blob(_) => return Ok(None),
            };
            Ok(Some(canonicalize(&text)))
        },
    )
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建库（幂等）：配置表 + 目录表
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    ensure_config_schema(conn)?;
    ensure_catalog_schema(conn)
}

/// 配置相关表（schema_version + config_kv）
pub fn ensure_config_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}

/// 目录表
///
/// 沿用历史 `piezas` 表的列名，已有的历史库可以直接读取。
/// 数量列不声明类型，历史数据中混有文本/空值，读取时统一转换。
/// 其他列布局的历史库由列映射读取，不经过这里建表。
pub fn ensure_catalog_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS piezas (
            ID_ITEM TEXT,
            TEXTO_BREVE_DEL_MATERIAL TEXT,
            TIPO TEXT,
            FABRICANTE TEXT,
            CABEZA TEXT,
            PARTE_DIVISION TEXT,
            CUERPO TEXT,
            TRAMO TEXT,
            POSICION TEXT,
            DESCRIPCION TEXT,
            LONG_2_PRINCIPAL TEXT,
            CANTIDAD_X_TORRE,
            PESO_UNITARIO,
            PLANO TEXT,
            MOD_PLANO TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_piezas_tipo ON piezas (TIPO);
        CREATE INDEX IF NOT EXISTS idx_piezas_fabricante ON piezas (FABRICANTE);
        CREATE INDEX IF NOT EXISTS idx_piezas_cabeza ON piezas (CABEZA);
        CREATE INDEX IF NOT EXISTS idx_piezas_parte ON piezas (PARTE_DIVISION);
        CREATE INDEX IF NOT EXISTS idx_piezas_cuerpo ON piezas (CUERPO);
        CREATE INDEX IF NOT EXISTS idx_piezas_tramo ON piezas (TRAMO);
        CREATE INDEX IF NOT EXISTS idx_piezas_coarse ON piezas (TIPO, FABRICANTE, CABEZA);
        "#,
    )
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);

        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();

        assert_eq!(
            read_schema_version(&conn).unwrap(),
            Some(CURRENT_SCHEMA_VERSION)
        );
    }
}
