//! Microsoft SQL Server dialect.

use super::{escape_literal, DdlDialect, Dialect, TableRef};
use crate::model::Column;
use crate::operation::ColumnChanges;

/// SQL Server dialect.
///
/// Columns are added without the `COLUMN` keyword, type and nullability
/// are restated together, defaults are named constraints and renames go
/// through `sp_rename`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsSqlServerDialect;

impl MsSqlServerDialect {
    /// Drops a constraint whose name the server generated. `lookup` is a
    /// `SELECT @name = ...` query, already escaped for a string literal.
    /// Runs through `sp_executesql` so the variable is scoped to the
    /// statement.
    fn drop_generated_constraint(&self, table: &TableRef<'_>, lookup: &str) -> String {
        let drop = format!("ALTER TABLE {} DROP CONSTRAINT ", self.table_ref(table));
        let batch = format!(
            "DECLARE @name sysname; {lookup}; \
             IF @name IS NOT NULL EXEC(N'{}' + QUOTENAME(@name))",
            escape_literal(&drop)
        );
        format!("EXEC sp_executesql N'{}'", escape_literal(&batch))
    }

    fn restate_column(&self, table: &TableRef<'_>, column: &str, target: &Column) -> String {
        format!(
            "ALTER TABLE {} ALTER COLUMN {} {} {}",
            self.table_ref(table),
            self.quote_identifier(column),
            target.type_sql(),
            if target.nullable { "NULL" } else { "NOT NULL" }
        )
    }
}

impl DdlDialect for MsSqlServerDialect {
    fn dialect(&self) -> Dialect {
        Dialect::MsSqlServer
    }

    fn add_column(&self, table: &TableRef<'_>, column: &Column) -> String {
        format!(
            "ALTER TABLE {} ADD {}",
            self.table_ref(table),
            self.column_definition(column)
        )
    }

    fn alter_column(
        &self,
        table: &TableRef<'_>,
        column: &Column,
        changes: &ColumnChanges,
    ) -> Vec<String> {
        let target = changes.apply_to(column);
        let mut statements = Vec::new();

        if changes.changes_type() || changes.nullable.is_some() {
            statements.push(self.restate_column(table, &column.name, &target));
        }
        match &changes.default_value {
            Some(Some(value)) => {
                // A column holds at most one default constraint.
                if column.default_value.is_some() {
                    statements.push(self.drop_default(table, &column.name));
                }
                statements.push(self.set_default(table, &column.name, value, &target.type_sql()));
            }
            Some(None) => statements.push(self.drop_default(table, &column.name)),
            None => {}
        }
        if let Some(new_name) = &changes.name {
            statements.push(self.rename_column(table, &column.name, new_name));
        }

        statements
    }

    fn set_default(&self, table: &TableRef<'_>, column: &str, value: &str, type_sql: &str) -> String {
        format!(
            "ALTER TABLE {} ADD DEFAULT {} FOR {}",
            self.table_ref(table),
            self.format_default(value, type_sql),
            self.quote_identifier(column)
        )
    }

    /// Looks up the column's system-named default constraint and drops it.
    fn drop_default(&self, table: &TableRef<'_>, column: &str) -> String {
        let lookup = format!(
            "SELECT @name = dc.name FROM sys.default_constraints dc \
             JOIN sys.columns c ON c.object_id = dc.parent_object_id AND c.column_id = dc.parent_column_id \
             WHERE dc.parent_object_id = OBJECT_ID(N'{}') AND c.name = N'{}'",
            escape_literal(&self.table_ref(table)),
            escape_literal(column)
        );
        self.drop_generated_constraint(table, &lookup)
    }

    fn set_nullable(&self, table: &TableRef<'_>, column: &str, nullable: bool) -> String {
        format!(
            "ALTER TABLE {} ALTER COLUMN {} {}",
            self.table_ref(table),
            self.quote_identifier(column),
            if nullable { "NULL" } else { "NOT NULL" }
        )
    }

    /// Drops the primary key. Without a known name the server-generated
    /// `PK__...` name is looked up in `sys.key_constraints`.
    fn drop_primary_key(&self, table: &TableRef<'_>, constraint_name: Option<&str>) -> String {
        if let Some(name) = constraint_name {
            return format!(
                "ALTER TABLE {} DROP CONSTRAINT {}",
                self.table_ref(table),
                self.quote_identifier(name)
            );
        }
        let lookup = format!(
            "SELECT @name = name FROM sys.key_constraints \
             WHERE parent_object_id = OBJECT_ID(N'{}') AND type = 'PK'",
            escape_literal(&self.table_ref(table))
        );
        self.drop_generated_constraint(table, &lookup)
    }

    fn rename_column(&self, table: &TableRef<'_>, old_name: &str, new_name: &str) -> String {
        format!(
            "EXEC sp_rename N'{}', N'{}', N'COLUMN'",
            escape_literal(&format!("{}.{old_name}", table.object_name())),
            escape_literal(new_name)
        )
    }

    fn rename_table(&self, table: &TableRef<'_>, new_name: &str) -> String {
        format!(
            "EXEC sp_rename N'{}', N'{}'",
            escape_literal(&table.object_name()),
            escape_literal(new_name)
        )
    }
}
