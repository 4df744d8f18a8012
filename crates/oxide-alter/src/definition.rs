//! Loading table definitions from JSON files.

use std::collections::HashSet;
use std::path::Path;

use oxide_alter_core::TableDefinition;
use tracing::debug;

use crate::error::{AlterError, Result};

/// Reads and validates a table definition.
///
/// # Errors
///
/// Returns [`AlterError::Io`] if the file cannot be read,
/// [`AlterError::Serialization`] if it is not a valid definition and
/// [`AlterError::InvalidDefinition`] if the table has no name or repeats a
/// column name.
pub fn load_definition(path: &Path) -> Result<TableDefinition> {
    let content = std::fs::read_to_string(path).map_err(|source| AlterError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let definition: TableDefinition = serde_json::from_str(&content)?;
    validate(&definition, path)?;
    debug!(
        path = %path.display(),
        table = %definition.name,
        columns = definition.columns.len(),
        foreign_keys = definition.foreign_keys.len(),
        "loaded table definition"
    );
    Ok(definition)
}

fn validate(definition: &TableDefinition, path: &Path) -> Result<()> {
    let invalid = |message: String| AlterError::InvalidDefinition {
        path: path.to_path_buf(),
        message,
    };

    if definition.name.trim().is_empty() {
        return Err(invalid("table name is empty".to_string()));
    }
    let mut seen = HashSet::new();
    for column in &definition.columns {
        if column.name.trim().is_empty() {
            return Err(invalid("column name is empty".to_string()));
        }
        if !seen.insert(column.name.as_str()) {
            return Err(invalid(format!("duplicate column '{}'", column.name)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxide_alter_core::Column;

    #[test]
    fn accepts_a_well_formed_table() {
        let def = TableDefinition::new("users")
            .column(Column::new("id", "INTEGER"))
            .column(Column::new("email", "TEXT"));
        assert!(validate(&def, Path::new("users.json")).is_ok());
    }

    #[test]
    fn rejects_duplicate_columns() {
        let def = TableDefinition::new("users")
            .column(Column::new("id", "INTEGER"))
            .column(Column::new("id", "TEXT"));
        let err = validate(&def, Path::new("users.json")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid table definition 'users.json': duplicate column 'id'"
        );
    }

    #[test]
    fn rejects_blank_names() {
        let def = TableDefinition::new(" ");
        assert!(matches!(
            validate(&def, Path::new("t.json")),
            Err(AlterError::InvalidDefinition { .. })
        ));

        let def = TableDefinition::new("t").column(Column::new("", "TEXT"));
        assert!(matches!(
            validate(&def, Path::new("t.json")),
            Err(AlterError::InvalidDefinition { .. })
        ));
    }
}
