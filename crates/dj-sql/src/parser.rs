//! SQL parser wrapper

use crate::dialect::{BigQueryDialect, GenericDialect, PostgresDialect, SnowflakeDialect, SqlDialect};
use crate::error::{SqlError, SqlResult};
use dj_core::Dialect;
use sqlparser::ast::Statement;

/// SQL parser that wraps sqlparser-rs with dialect support
pub struct SqlParser {
    dialect: Box<dyn SqlDialect>,
}

impl SqlParser {
    /// Create a parser for a configured dialect
    pub fn for_dialect(dialect: Dialect) -> Self {
        let dialect: Box<dyn SqlDialect> = match dialect {
            Dialect::BigQuery => Box::new(BigQueryDialect::new()),
            Dialect::Snowflake => Box::new(SnowflakeDialect::new()),
            Dialect::Postgres => Box::new(PostgresDialect::new()),
            Dialect::Generic => Box::new(GenericDialect::new()),
        };
        Self { dialect }
    }

    /// Create a parser from dialect name
    pub fn from_dialect_name(name: &str) -> SqlResult<Self> {
        match name.to_lowercase().as_str() {
            "bigquery" | "bigquery_standard_sql" => Ok(Self::for_dialect(Dialect::BigQuery)),
            "snowflake" => Ok(Self::for_dialect(Dialect::Snowflake)),
            "postgres" | "postgresql" | "redshift" => Ok(Self::for_dialect(Dialect::Postgres)),
            "generic" => Ok(Self::for_dialect(Dialect::Generic)),
            _ => Err(SqlError::UnknownDialect(name.to_string())),
        }
    }

    /// Parse SQL into AST statements
    pub fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(SqlError::EmptySql);
        }

        self.dialect.parse(sql)
    }

    /// Get the dialect name
    pub fn dialect_name(&self) -> &'static str {
        self.dialect.name()
    }
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::for_dialect(Dialect::default())
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
