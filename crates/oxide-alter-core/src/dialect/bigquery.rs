//! BigQuery dialect.

use super::{DdlDialect, Dialect, TableRef};
use crate::model::ForeignKey;

/// BigQuery dialect.
///
/// Key constraints are informational only and must be declared
/// `NOT ENFORCED`; referential actions are not accepted. Literal defaults
/// are cast to the column type.
#[derive(Debug, Clone, Copy, Default)]
pub struct BigQueryDialect;

impl DdlDialect for BigQueryDialect {
    fn dialect(&self) -> Dialect {
        Dialect::Bigquery
    }

    fn alter_type(&self, table: &TableRef<'_>, column: &str, type_sql: &str) -> String {
        format!(
            "ALTER TABLE {} ALTER COLUMN {} SET DATA TYPE {}",
            self.table_ref(table),
            self.quote_identifier(column),
            type_sql
        )
    }

    fn add_foreign_key(&self, table: &TableRef<'_>, fk: &ForeignKey) -> String {
        format!(
            "ALTER TABLE {} ADD CONSTRAINT {} {} NOT ENFORCED",
            self.table_ref(table),
            self.quote_identifier(&fk.constraint_name_for(table.name)),
            self.foreign_key_clause(fk)
        )
    }

    fn add_primary_key(&self, table: &TableRef<'_>, columns: &[String]) -> String {
        let cols: Vec<String> = columns.iter().map(|c| self.quote_identifier(c)).collect();
        format!(
            "ALTER TABLE {} ADD PRIMARY KEY ({}) NOT ENFORCED",
            self.table_ref(table),
            cols.join(", ")
        )
    }

    fn drop_primary_key(&self, table: &TableRef<'_>, _constraint_name: Option<&str>) -> String {
        format!("ALTER TABLE {} DROP PRIMARY KEY", self.table_ref(table))
    }
}
