//! Human- and machine-readable output.

use clap::ValueEnum;
use oxide_alter_core::{Dialect, MigrationPlan, Operation};

use crate::error::Result;

/// Output format for the `plan` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One numbered line per operation.
    #[default]
    Text,
    /// The operations as a JSON array.
    Json,
}

/// Formats the plan's operations.
///
/// # Errors
///
/// Returns [`AlterError::Serialization`](crate::error::AlterError) if JSON
/// encoding fails.
pub fn format_operations(plan: &MigrationPlan, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&plan.operations)?),
        OutputFormat::Text => Ok(plan
            .operations
            .iter()
            .enumerate()
            .map(|(i, op)| format!("{:>2}. {}", i + 1, describe(op)))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// One-line summary of an operation.
#[must_use]
pub fn describe(op: &Operation) -> String {
    match op {
        Operation::AddColumn { column } => {
            let mut out = format!("addColumn {} {}", column.name, column.type_sql());
            if !column.nullable {
                out.push_str(" NOT NULL");
            }
            if let Some(default) = &column.default_value {
                out.push_str(&format!(" DEFAULT {default}"));
            }
            out
        }
        Operation::DropColumn { name } => format!("dropColumn {name}"),
        Operation::AlterColumn {
            original_column,
            changes,
        } => {
            let target = changes.apply_to(original_column);
            let mut parts = Vec::new();
            if changes.changes_type() {
                parts.push(format!("type {}", target.type_sql()));
            }
            if let Some(default) = &changes.default_value {
                parts.push(match default {
                    Some(value) => format!("default {value}"),
                    None => "drop default".to_string(),
                });
            }
            if let Some(nullable) = changes.nullable {
                parts.push(if nullable { "nullable" } else { "not null" }.to_string());
            }
            if let Some(name) = &changes.name {
                parts.push(format!("rename to {name}"));
            }
            format!("alterColumn {}: {}", original_column.name, parts.join(", "))
        }
        Operation::AddForeignKey { foreign_key } => format!(
            "addForeignKey ({}) -> {} ({})",
            foreign_key.source_columns().collect::<Vec<_>>().join(", "),
            foreign_key.target_table,
            foreign_key.target_columns().collect::<Vec<_>>().join(", ")
        ),
        Operation::DropForeignKey { constraint_name } => {
            format!("dropForeignKey {constraint_name}")
        }
        Operation::AddPrimaryKey { columns } => format!("addPrimaryKey ({})", columns.join(", ")),
        Operation::DropPrimaryKey { constraint_name } => match constraint_name {
            Some(name) => format!("dropPrimaryKey {name}"),
            None => "dropPrimaryKey".to_string(),
        },
        Operation::RenameTable { to } => format!("renameTable {to}"),
    }
}

/// Lists every dialect with its capabilities.
#[must_use]
pub fn describe_dialects() -> String {
    let yes_no = |b: bool| if b { "yes" } else { "no" };
    let header = format!(
        "{:<14} {:<7} {:<6} {}",
        "DIALECT", "SCHEMA", "QUOTE", "TRANSACTIONAL DDL"
    );
    let rows = Dialect::ALL.into_iter().map(|dialect| {
        format!(
            "{:<14} {:<7} {:<6} {}",
            dialect.as_str(),
            yes_no(dialect.supports_schema()),
            dialect.quote_style().quote("x"),
            yes_no(dialect.supports_transactional_ddl())
        )
    });
    std::iter::once(header).chain(rows).collect::<Vec<_>>().join("\n")
}
