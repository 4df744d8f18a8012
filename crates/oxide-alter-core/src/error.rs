//! Error types for the planner.

/// Errors raised when selecting a dialect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialectError {
    /// The name is not one of the supported dialects.
    #[error(
        "Unsupported dialect '{0}' (expected one of: postgresql, mysql, ms_sql_server, snowflake, bigquery, duckdb)"
    )]
    Unsupported(String),
}
