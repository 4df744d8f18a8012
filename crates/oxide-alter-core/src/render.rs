//! Renders operations as SQL statements for one dialect.

use tracing::trace;

use crate::dialect::{Dialect, TableRef};
use crate::operation::Operation;

/// Renders `ops` against `table` in the given dialect.
///
/// `table` is the table's name before any rename in `ops`. The schema is
/// ignored by dialects without schema support. Every statement ends with
/// `;`. Operations are rendered in the order given, so pass them through
/// [`sort_operations`](crate::sort::sort_operations) first.
#[must_use]
pub fn render(table: &str, ops: &[Operation], dialect: Dialect, schema: Option<&str>) -> Vec<String> {
    let table = TableRef::new(table, schema.filter(|_| dialect.supports_schema()));
    let ddl = dialect.ddl();

    let mut statements = Vec::new();
    for op in ops {
        let rendered = match op {
            Operation::AddColumn { column } => vec![ddl.add_column(&table, column)],
            Operation::DropColumn { name } => vec![ddl.drop_column(&table, name)],
            Operation::AlterColumn {
                original_column,
                changes,
            } => ddl.alter_column(&table, original_column, changes),
            Operation::AddForeignKey { foreign_key } => {
                vec![ddl.add_foreign_key(&table, foreign_key)]
            }
            Operation::DropForeignKey { constraint_name } => {
                vec![ddl.drop_foreign_key(&table, constraint_name)]
            }
            Operation::AddPrimaryKey { columns } => vec![ddl.add_primary_key(&table, columns)],
            Operation::DropPrimaryKey { constraint_name } => {
                vec![ddl.drop_primary_key(&table, constraint_name.as_deref())]
            }
            Operation::RenameTable { to } => vec![ddl.rename_table(&table, to)],
        };
        for sql in rendered {
            trace!(%dialect, kind = %op.kind(), sql = %sql, "rendered statement");
            statements.push(format!("{sql};"));
        }
    }
    statements
}
