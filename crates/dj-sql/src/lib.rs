//! dj-sql - Table reference extraction for Deadjoin
//!
//! This crate turns generated SQL into the set of table and view references
//! it touches. Two strategies sit behind the [`TableExtractor`] trait: the
//! line-prefix scraper that matches how model-driven query compilers lay
//! out their SQL, and a grammar-based extractor built on sqlparser-rs.

pub mod dialect;
pub mod error;
pub mod extractor;
pub mod grammar;
pub mod parser;

pub use dialect::{BigQueryDialect, GenericDialect, PostgresDialect, SnowflakeDialect, SqlDialect};
pub use error::{SqlError, SqlResult};
pub use extractor::{extractor_for, LinePrefixExtractor, TableExtractor};
pub use grammar::GrammarExtractor;
pub use parser::SqlParser;
