// ==========================================
// 输电塔材料分解系统 - 目录数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑，只负责数据访问
// 职责: 按筛选条件读取目录行 / 枚举去重值 / 计数 / 整表替换
// ==========================================

use crate::db::{open_sqlite_connection, register_catalog_functions};
use crate::domain::inventory::{finite_or_zero, parse_number, InventoryItem};
use crate::domain::types::FilterField;
use crate::engine::inventory_filter::FilterSet;
use crate::repository::column_mapping::{quote_ident, ColumnMapping};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_builder::SqlQueryBuilder;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

// ==========================================
// InventoryStore - 目录读取接口
// ==========================================
/// 计算核心依赖的外部目录能力
pub trait InventoryStore: Send + Sync {
    /// 读取满足条件的目录行（保持存储顺序）；limit 为 None 表示不设上限
    fn find_items(
        &self,
        filters: &FilterSet,
        limit: Option<usize>,
    ) -> RepositoryResult<Vec<InventoryItem>>;

    /// 某字段在条件下的去重值（TRIM 后非空，升序）
    fn distinct_values(
        &self,
        field: FilterField,
        filters: &FilterSet,
    ) -> RepositoryResult<Vec<String>>;

    /// 满足条件的行数
    fn count_items(&self, filters: &FilterSet) -> RepositoryResult<usize>;
}

// ==========================================
// InventoryWriter - 目录写入接口（导入层使用）
// ==========================================
pub trait InventoryWriter: Send + Sync {
    /// 用新目录整体替换旧目录，按 batch_size 分批写入；返回写入行数
    fn replace_all(&self, items: &[InventoryItem], batch_size: usize) -> RepositoryResult<usize>;
}

// 共享仓储（AppState 中以 Arc 持有）
impl<T: InventoryStore + ?Sized> InventoryStore for Arc<T> {
    fn find_items(
        &self,
        filters: &FilterSet,
        limit: Option<usize>,
    ) -> RepositoryResult<Vec<InventoryItem>> {
        (**self).find_items(filters, limit)
    }

    fn distinct_values(
        &self,
        field: FilterField,
        filters: &FilterSet,
    ) -> RepositoryResult<Vec<String>> {
        (**self).distinct_values(field, filters)
    }

    fn count_items(&self, filters: &FilterSet) -> RepositoryResult<usize> {
        (**self).count_items(filters)
    }
}

impl<T: InventoryWriter + ?Sized> InventoryWriter for Arc<T> {
    fn replace_all(&self, items: &[InventoryItem], batch_size: usize) -> RepositoryResult<usize> {
        (**self).replace_all(items, batch_size)
    }
}

// ==========================================
// SqliteInventoryRepository - SQLite 目录仓储
// ==========================================
pub struct SqliteInventoryRepository {
    conn: Arc<Mutex<Connection>>,
    mapping: ColumnMapping,
}

impl SqliteInventoryRepository {
    /// 创建新的 SqliteInventoryRepository 实例（历史 piezas 布局）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Self::from_connection(Arc::new(Mutex::new(conn)), ColumnMapping::legacy())
    }

    /// 从已有连接创建仓储实例（在该连接上注册 canon() 函数）
    pub fn from_connection(
        conn: Arc<Mutex<Connection>>,
        mapping: ColumnMapping,
    ) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            register_catalog_functions(&guard)
                .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        }
        Ok(Self { conn, mapping })
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 解码一行（列顺序见 ColumnMapping::ordered_columns）
    fn map_row(row: &Row<'_>) -> rusqlite::Result<InventoryItem> {
        Ok(InventoryItem {
            id: text_value(row.get(0)?),
            short_description: text_value(row.get(1)?),
            description: text_value(row.get(2)?),
            main_length: text_value(row.get(3)?),
            drawing: text_value(row.get(4)?),
            drawing_revision: text_value(row.get(5)?),
            item_type: text_value(row.get(6)?),
            manufacturer: text_value(row.get(7)?),
            head: text_value(row.get(8)?),
            division: text_value(row.get(9)?),
            body: text_value(row.get(10)?),
            section: text_value(row.get(11)?),
            position: text_value(row.get(12)?),
            quantity_per_tower: number_value(row.get(13)?),
            unit_weight: number_value(row.get(14)?),
        })
    }

    fn schema_error(&self, err: RepositoryError) -> RepositoryError {
        match err {
            RepositoryError::SchemaMismatch { message, .. } => RepositoryError::SchemaMismatch {
                table: self.mapping.table.clone(),
                message,
            },
            other => other,
        }
    }
}

impl InventoryStore for SqliteInventoryRepository {
    #[instrument(skip(self, filters), fields(conditions = filters.len()))]
    fn find_items(
        &self,
        filters: &FilterSet,
        limit: Option<usize>,
    ) -> RepositoryResult<Vec<InventoryItem>> {
        let (sql, params) = SqlQueryBuilder::new(&format!(
            "SELECT {} FROM {}",
            self.mapping.select_list(),
            self.mapping.quoted_table()
        ))
        .filters(filters, &self.mapping)
        .order_by("rowid")
        .limit_opt(limit)
        .build();
        debug!(sql = %sql, params = ?params, "目录查询");

        let conn = self.get_conn()?;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| self.schema_error(e.into()))?;
        let rows = stmt.query_map(params_from_iter(params.iter()), Self::map_row)?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    fn distinct_values(
        &self,
        field: FilterField,
        filters: &FilterSet,
    ) -> RepositoryResult<Vec<String>> {
        let column = quote_ident(self.mapping.column_for(field));
        let (sql, params) = SqlQueryBuilder::new(&format!(
            "SELECT DISTINCT TRIM({col}) FROM {table}",
            col = column,
            table = self.mapping.quoted_table()
        ))
        .where_clause(&format!("{col} IS NOT NULL AND TRIM({col}) != ''", col = column))
        .filters(filters, &self.mapping)
        .build();

        let conn = self.get_conn()?;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| self.schema_error(e.into()))?;
        let rows = stmt.query_map(params_from_iter(params.iter()), |row| {
            row.get::<_, Value>(0).map(text_value)
        })?;

        // 数值型列在 SQLite 中 TRIM 后仍可能重复，统一在此去重排序
        let mut values = BTreeSet::new();
        for row in rows {
            let value = row?;
            if !value.is_empty() {
                values.insert(value);
            }
        }
        Ok(values.into_iter().collect())
    }

    fn count_items(&self, filters: &FilterSet) -> RepositoryResult<usize> {
        let (sql, params) = SqlQueryBuilder::new(&format!(
            "SELECT COUNT(*) FROM {}",
            self.mapping.quoted_table()
        ))
        .filters(filters, &self.mapping)
        .build();

        let conn = self.get_conn()?;
        let count: i64 = conn
            .query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))
            .map_err(|e| self.schema_error(e.into()))?;
        Ok(count.max(0) as usize)
    }
}

impl InventoryWriter for SqliteInventoryRepository {
    #[instrument(skip(self, items), fields(rows = items.len()))]
    fn replace_all(&self, items: &[InventoryItem], batch_size: usize) -> RepositoryResult<usize> {
        let columns = self.mapping.select_list();
        let placeholders = (1..=15)
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let insert_sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.mapping.quoted_table(),
            columns,
            placeholders
        );

        let conn = self.get_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute(&format!("DELETE FROM {}", self.mapping.quoted_table()), [])
            .map_err(|e| self.schema_error(e.into()))?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(&insert_sql)?;
            for chunk in items.chunks(batch_size.max(1)) {
                for item in chunk {
                    stmt.execute(rusqlite::params![
                        item.id,
                        item.short_description,
                        item.description,
                        item.main_length,
                        item.drawing,
                        item.drawing_revision,
                        item.item_type,
                        item.manufacturer,
                        item.head,
                        item.division,
                        item.body,
                        item.section,
                        item.position,
                        finite_or_zero(item.quantity_per_tower),
                        finite_or_zero(item.unit_weight),
                    ])?;
                    count += 1;
                }
                debug!(inserted = count, total = items.len(), "目录写入进度");
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }
}

// ==========================================
// 动态列值转换
// ==========================================

/// 文本列：NULL / BLOB → 空串，数值转为文本
fn text_value(value: Value) -> String {
    match value {
        Value::Text(s) => s,
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Null | Value::Blob(_) => String::new(),
    }
}

/// 数值列：有限数值原样，文本尝试解析，其余为 0
fn number_value(value: Value) -> f64 {
    match value {
        Value::Integer(i) => i as f64,
        Value::Real(f) => finite_or_zero(f),
        Value::Text(s) => parse_number(&s),
        Value::Null | Value::Blob(_) => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;

    fn repo_with_rows(rows: &[(&str, &str, &str, &str)]) -> SqliteInventoryRepository {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        for (id, tipo, parte, tramo) in rows {
            conn.execute(
                "INSERT INTO piezas (ID_ITEM, TIPO, PARTE_DIVISION, TRAMO, CANTIDAD_X_TORRE, PESO_UNITARIO)
                 VALUES (?1, ?2, ?3, ?4, '4', 2.5)",
                rusqlite::params![id, tipo, parte, tramo],
            )
            .unwrap();
        }
        SqliteInventoryRepository::from_connection(
            Arc::new(Mutex::new(conn)),
            ColumnMapping::legacy(),
        )
        .unwrap()
    }

    #[test]
    fn test_text_and_number_values() {
        assert_eq!(text_value(Value::Null), "");
        assert_eq!(text_value(Value::Integer(7)), "7");
        assert_eq!(number_value(Value::Text("3".to_string())), 3.0);
        assert_eq!(number_value(Value::Text("n/a".to_string())), 0.0);
        assert_eq!(number_value(Value::Real(f64::NAN)), 0.0);
        assert_eq!(number_value(Value::Null), 0.0);
    }

    #[test]
    fn test_find_items_reads_text_quantities() {
        let repo = repo_with_rows(&[("P1", "S2", "BSUP", "A1")]);
        let items = repo.find_items(&FilterSet::new(), None).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity_per_tower, 4.0);
        assert_eq!(items[0].unit_weight, 2.5);
        assert_eq!(items[0].description, "");
    }

    #[test]
    fn test_find_items_limit_and_order() {
        let repo = repo_with_rows(&[
            ("P3", "S2", "BSUP", "A1"),
            ("P1", "S2", "BSUP", "A1"),
            ("P2", "S2", "BSUP", "A1"),
        ]);
        let items = repo.find_items(&FilterSet::new(), Some(2)).unwrap();
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["P3", "P1"]);
    }

    #[test]
    fn test_distinct_values_trimmed_and_sorted() {
        let repo = repo_with_rows(&[
            ("P1", "S2", " BSUP", "A1"),
            ("P2", "S2", "BSUP ", "A1"),
            ("P3", "S2", "", "A1"),
            ("P4", "S2", "BINF", "A1"),
        ]);
        let values = repo
            .distinct_values(FilterField::Division, &FilterSet::new())
            .unwrap();
        assert_eq!(values, vec!["BINF".to_string(), "BSUP".to_string()]);
    }

    #[test]
    fn test_missing_table_reports_schema_mismatch() {
        let conn = Connection::open_in_memory().unwrap();
        let repo = SqliteInventoryRepository::from_connection(
            Arc::new(Mutex::new(conn)),
            ColumnMapping::legacy(),
        )
        .unwrap();
        match repo.count_items(&FilterSet::new()) {
            Err(RepositoryError::SchemaMismatch { table, .. }) => assert_eq!(table, "piezas"),
            other => panic!("Expected SchemaMismatch, got {:?}", other),
        }
    }
}
