//! MySQL dialect.

use super::{DdlDialect, Dialect, TableRef};
use crate::model::Column;
use crate::operation::ColumnChanges;

/// MySQL dialect.
///
/// MySQL cannot change a column's type or nullability on its own: both go
/// through `MODIFY COLUMN` with the full target definition, which also
/// carries the default. Table references are never schema-qualified.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl MySqlDialect {
    fn modify_column(&self, table: &TableRef<'_>, column: &Column) -> String {
        format!(
            "ALTER TABLE {} MODIFY COLUMN {}",
            self.table_ref(table),
            self.column_definition(column)
        )
    }
}

impl DdlDialect for MySqlDialect {
    fn dialect(&self) -> Dialect {
        Dialect::Mysql
    }

    fn alter_column(
        &self,
        table: &TableRef<'_>,
        column: &Column,
        changes: &ColumnChanges,
    ) -> Vec<String> {
        let mut statements = Vec::new();

        // MODIFY addresses the column by its old name; the rename follows.
        let modify = changes.changes_type() || changes.nullable.is_some();
        if modify {
            let mut target = changes.apply_to(column);
            target.name.clone_from(&column.name);
            statements.push(self.modify_column(table, &target));
        } else {
            match &changes.default_value {
                Some(Some(value)) => {
                    statements.push(self.set_default(table, &column.name, value, &column.type_sql()));
                }
                Some(None) => statements.push(self.drop_default(table, &column.name)),
                None => {}
            }
        }
        if let Some(new_name) = &changes.name {
            statements.push(self.rename_column(table, &column.name, new_name));
        }

        statements
    }

    fn drop_primary_key(&self, table: &TableRef<'_>, _constraint_name: Option<&str>) -> String {
        format!("ALTER TABLE {} DROP PRIMARY KEY", self.table_ref(table))
    }
}
