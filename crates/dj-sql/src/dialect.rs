//! SQL dialect abstraction for the grammar extractor

use sqlparser::ast::Statement;
use sqlparser::dialect::{
    BigQueryDialect as SqlParserBigQuery, Dialect, GenericDialect as SqlParserGeneric,
    PostgreSqlDialect as SqlParserPostgres, SnowflakeDialect as SqlParserSnowflake,
};
use sqlparser::parser::Parser;

use crate::error::{SqlError, SqlResult};

/// Trait for SQL dialect implementations
pub trait SqlDialect: Send + Sync {
    /// Get the underlying sqlparser dialect
    fn parser_dialect(&self) -> &dyn Dialect;

    /// Parse SQL into AST statements
    fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        Parser::parse_sql(self.parser_dialect(), sql).map_err(|e| {
            let msg = e.to_string();
            let (line, column) = parse_location_from_error(&msg);
            SqlError::ParseError {
                message: msg,
                line,
                column,
            }
        })
    }

    /// Get the dialect name
    fn name(&self) -> &'static str;
}

/// Parse line and column from a sqlparser error message.
///
/// `ParserError` carries no structured location, so "Line: N, Column: M" is
/// read back out of the message text. Missing pieces yield `(0, 0)`.
fn parse_location_from_error(msg: &str) -> (usize, usize) {
    let Some(line_idx) = msg.find("Line: ") else {
        return (0, 0);
    };
    let line_start = line_idx + 6;
    let Some(comma_idx) = msg[line_start..].find(',') else {
        return (0, 0);
    };
    let Ok(line) = msg[line_start..line_start + comma_idx]
        .trim()
        .parse::<usize>()
    else {
        return (0, 0);
    };
    let Some(col_idx) = msg.find("Column: ") else {
        return (0, 0);
    };
    let col_start = col_idx + 8;
    let col_end = msg[col_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map(|i| col_start + i)
        .unwrap_or(msg.len());
    let Ok(column) = msg[col_start..col_end].trim().parse::<usize>() else {
        return (0, 0);
    };
    (line, column)
}

macro_rules! define_dialect {
    ($(#[$meta:meta])* $Name:ident, $Inner:ident, $label:literal) => {
        $(#[$meta])*
        pub struct $Name {
            dialect: $Inner,
        }

        impl $Name {
            pub fn new() -> Self {
                Self { dialect: $Inner {} }
            }
        }

        impl Default for $Name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl SqlDialect for $Name {
            fn parser_dialect(&self) -> &dyn Dialect {
                &self.dialect
            }

            fn name(&self) -> &'static str {
                $label
            }
        }
    };
}

define_dialect!(
    /// BigQuery SQL dialect (backtick-quoted, project-qualified tables)
    BigQueryDialect,
    SqlParserBigQuery,
    "bigquery"
);
define_dialect!(
    /// Snowflake SQL dialect
    SnowflakeDialect,
    SqlParserSnowflake,
    "snowflake"
);
define_dialect!(
    /// PostgreSQL / Redshift SQL dialect
    PostgresDialect,
    SqlParserPostgres,
    "postgres"
);
define_dialect!(
    /// Permissive dialect for warehouses without a dedicated one
    GenericDialect,
    SqlParserGeneric,
    "generic"
);

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
