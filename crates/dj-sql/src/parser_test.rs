use super::*;

#[test]
fn test_default_is_bigquery() {
    assert_eq!(SqlParser::default().dialect_name(), "bigquery");
}

#[test]
fn test_from_dialect_name() {
    assert_eq!(
        SqlParser::from_dialect_name("Snowflake").unwrap().dialect_name(),
        "snowflake"
    );
    assert_eq!(
        SqlParser::from_dialect_name("redshift").unwrap().dialect_name(),
        "postgres"
    );
    assert!(matches!(
        SqlParser::from_dialect_name("oracle"),
        Err(SqlError::UnknownDialect(_))
    ));
}

#[test]
fn test_empty_sql() {
    let parser = SqlParser::for_dialect(Dialect::Generic);
    assert!(matches!(parser.parse("   "), Err(SqlError::EmptySql)));
}

#[test]
fn test_parse_select() {
    let parser = SqlParser::for_dialect(Dialect::Postgres);
    let stmts = parser.parse("SELECT id FROM public.users").unwrap();
    assert_eq!(stmts.len(), 1);
}
