// ==========================================
// 输电塔材料分解系统 - SQL 构建工具
// ==========================================
// 职责: 把 FilterSet + 列映射翻译为参数化 WHERE 子句
// 约束: 所有值走参数绑定，列名/表名只来自列映射并加引号
// ==========================================

use crate::db::CANON_FUNCTION;
use crate::engine::inventory_filter::FilterSet;
use crate::repository::column_mapping::{quote_ident, ColumnMapping};

/// SQL 查询构建器（流式 API，带参数收集）
///
/// # 示例
/// ```
/// use tower_breakdown::repository::sql_builder::SqlQueryBuilder;
///
/// let (sql, params) = SqlQueryBuilder::new("SELECT * FROM piezas")
///     .filter("\"TIPO\" = ?", "S2")
///     .order_by("rowid")
///     .limit(500)
///     .build();
///
/// assert_eq!(sql, "SELECT * FROM piezas WHERE \"TIPO\" = ? ORDER BY rowid LIMIT 500");
/// assert_eq!(params, vec!["S2".to_string()]);
/// ```
#[derive(Debug, Clone)]
pub struct SqlQueryBuilder {
    select_clause: String,
    where_clauses: Vec<String>,
    params: Vec<String>,
    order_by_clause: Option<String>,
    limit_clause: Option<usize>,
}

impl SqlQueryBuilder {
    /// 创建新的 SQL 查询构建器
    pub fn new(select: &str) -> Self {
        Self {
            select_clause: select.to_string(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            order_by_clause: None,
            limit_clause: None,
        }
    }

    /// 添加不带参数的 WHERE 条件
    pub fn where_clause(mut self, condition: &str) -> Self {
        self.where_clauses.push(condition.to_string());
        self
    }

    /// 添加带一个绑定参数的条件
    pub fn filter(mut self, condition: &str, param: &str) -> Self {
        self.where_clauses.push(condition.to_string());
        self.params.push(param.to_string());
        self
    }

    /// 按列映射追加 FilterSet 中的全部条件
    ///
    /// 段 (TRAMO) 两侧经 canon() 规范化（需先注册 `db::register_catalog_functions`），
    /// 其余字段严格相等。
    pub fn filters(mut self, filters: &FilterSet, mapping: &ColumnMapping) -> Self {
        for (field, value) in filters.iter() {
            let column = quote_ident(mapping.column_for(field));
            if field.is_case_insensitive() {
                self = self.filter(
                    &format!("{canon}({col}) = {canon}(?)", canon = CANON_FUNCTION, col = column),
                    value,
                );
            } else {
                self = self.filter(&format!("{} = ?", column), value);
            }
        }
        self
    }

    /// 添加 ORDER BY 子句
    pub fn order_by(mut self, order: &str) -> Self {
        self.order_by_clause = Some(order.to_string());
        self
    }

    /// 条件添加 LIMIT 子句
    pub fn limit_opt(mut self, n: Option<usize>) -> Self {
        self.limit_clause = n;
        self
    }

    /// 添加 LIMIT 子句
    pub fn limit(self, n: usize) -> Self {
        self.limit_opt(Some(n))
    }

    /// 构建最终的 SQL 语句与参数列表
    pub fn build(self) -> (String, Vec<String>) {
        let mut sql = self.select_clause;

        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clauses.join(" AND "));
        }

        if let Some(order) = &self.order_by_clause {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        if let Some(limit) = self.limit_clause {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        (sql, self.params)
    }
}
