use serde_json::Value;
use sqlx::{self, postgres::PgArguments};

use crate::database::error::StoreError;

#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

/// Builds statements against one table, narrowed by equality filters.
///
/// Filter columns are compared as text (`"col"::text = $n`) so the same query
/// works whether ids are stored as `uuid` or `text`.
#[derive(Debug, Clone)]
pub struct TableQuery {
    table_name: String,
    filters: Vec<(String, String)>,
    order: Option<String>,
}

impl TableQuery {
    pub fn new(table_name: impl Into<String>) -> Result<Self, StoreError> {
        let table_name = table_name.into();
        validate_identifier(&table_name)?;
        Ok(Self {
            table_name,
            filters: vec![],
            order: None,
        })
    }

    pub fn eq(mut self, column: &str, value: impl Into<String>) -> Result<Self, StoreError> {
        validate_identifier(column)?;
        self.filters.push((column.to_string(), value.into()));
        Ok(self)
    }

    /// Applies `column = value` only when a value is given.
    pub fn eq_opt(self, column: &str, value: Option<&str>) -> Result<Self, StoreError> {
        match value {
            Some(v) => self.eq(column, v),
            None => Ok(self),
        }
    }

    pub fn order_by(mut self, column: &str) -> Result<Self, StoreError> {
        validate_identifier(column)?;
        self.order = Some(column.to_string());
        Ok(self)
    }

    /// `columns` are trusted select expressions owned by the caller.
    pub fn to_select_sql(&self, columns: &[&str]) -> SqlResult {
        let (where_clause, params) = self.where_clause(0);
        let mut query = format!("SELECT {} FROM \"{}\"", columns.join(", "), self.table_name);
        if !where_clause.is_empty() {
            query.push_str(&format!(" WHERE {}", where_clause));
        }
        if let Some(order) = &self.order {
            query.push_str(&format!(" ORDER BY \"{}\" ASC", order));
        }
        SqlResult { query, params }
    }

    /// Refuses to build an unfiltered update.
    pub fn to_update_sql(&self, assignments: Vec<(&str, Value)>) -> Result<SqlResult, StoreError> {
        if assignments.is_empty() {
            return Err(StoreError::InvalidQuery("update requires at least one column".to_string()));
        }
        if self.filters.is_empty() {
            return Err(StoreError::InvalidQuery(format!(
                "refusing to update every row of \"{}\"",
                self.table_name
            )));
        }

        let mut params = Vec::with_capacity(assignments.len() + self.filters.len());
        let mut sets = Vec::with_capacity(assignments.len() + 1);
        for (column, value) in assignments {
            validate_identifier(column)?;
            params.push(value);
            sets.push(format!("\"{}\" = ${}", column, params.len()));
        }
        sets.push("\"updated_at\" = now()".to_string());

        let (where_clause, where_params) = self.where_clause(params.len());
        params.extend(where_params);

        Ok(SqlResult {
            query: format!(
                "UPDATE \"{}\" SET {} WHERE {}",
                self.table_name,
                sets.join(", "),
                where_clause
            ),
            params,
        })
    }

    fn where_clause(&self, starting_param_index: usize) -> (String, Vec<Value>) {
        let mut index = starting_param_index;
        let mut params = Vec::with_capacity(self.filters.len());
        let conditions: Vec<String> = self
            .filters
            .iter()
            .map(|(column, value)| {
                index += 1;
                params.push(Value::String(value.clone()));
                format!("\"{}\"::text = ${}", column, index)
            })
            .collect();
        (conditions.join(" AND "), params)
    }
}

fn validate_identifier(name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidQuery(format!("Invalid identifier: {:?}", name)))
    }
}

pub fn bind_param<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        // JSONB
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()),
    }
}
