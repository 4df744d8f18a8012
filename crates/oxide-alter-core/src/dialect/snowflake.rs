//! Snowflake dialect.

use super::{DdlDialect, Dialect, TableRef};

/// Snowflake dialect. Type changes use `SET DATA TYPE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnowflakeDialect;

impl DdlDialect for SnowflakeDialect {
    fn dialect(&self) -> Dialect {
        Dialect::Snowflake
    }

    fn alter_type(&self, table: &TableRef<'_>, column: &str, type_sql: &str) -> String {
        format!(
            "ALTER TABLE {} ALTER COLUMN {} SET DATA TYPE {}",
            self.table_ref(table),
            self.quote_identifier(column),
            type_sql
        )
    }
}
