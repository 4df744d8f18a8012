//! Table definition types.
//!
//! These values describe one table as the editor sees it: its columns, the
//! primary key (as a per-column flag) and its foreign keys. A column that
//! existed in the original definition carries its old name in
//! [`Column::initial_name`], which is how renames are told apart from a
//! drop followed by an add.

use serde::{Deserialize, Serialize};

/// Maximum length of a derived foreign key constraint name.
pub const MAX_CONSTRAINT_NAME_LEN: usize = 60;

/// Delimiters marking a default value as a raw SQL expression.
pub const RAW_DEFAULT_OPEN: char = '{';
/// Closing delimiter, see [`RAW_DEFAULT_OPEN`].
pub const RAW_DEFAULT_CLOSE: char = '}';

const fn default_nullable() -> bool {
    true
}

/// A single column of a table definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Current column name.
    pub name: String,
    /// Name this column had in the original definition. `None` for a
    /// column that did not exist before.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_name: Option<String>,
    /// SQL type name, e.g. `VARCHAR`.
    pub datatype: String,
    /// Optional length qualifier, rendered as `VARCHAR(255)`.
    #[serde(
        rename = "datatype_length",
        alias = "datatypeLength",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub datatype_length: Option<u32>,
    /// Whether the column accepts NULL.
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Default value. `{now()}` is a raw expression, anything else a literal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Whether this column is part of the primary key.
    #[serde(default)]
    pub primary_key: bool,
}

impl Column {
    /// Creates a nullable, non-key column with no default.
    #[must_use]
    pub fn new(name: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initial_name: None,
            datatype: datatype.into(),
            datatype_length: None,
            nullable: true,
            default_value: None,
            primary_key: false,
        }
    }

    /// Records the name this column had in the original definition.
    #[must_use]
    pub fn renamed_from(mut self, initial_name: impl Into<String>) -> Self {
        self.initial_name = Some(initial_name.into());
        self
    }

    /// Links this column to the original column of the same name.
    #[must_use]
    pub fn existing(self) -> Self {
        let name = self.name.clone();
        self.renamed_from(name)
    }

    /// Sets the length qualifier.
    #[must_use]
    pub const fn length(mut self, length: u32) -> Self {
        self.datatype_length = Some(length);
        self
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Marks the column as part of the primary key. Key columns are NOT NULL.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Sets a literal default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Sets a raw SQL default expression, emitted without quoting.
    #[must_use]
    pub fn default_expr(mut self, expr: &str) -> Self {
        self.default_value = Some(format!("{RAW_DEFAULT_OPEN}{expr}{RAW_DEFAULT_CLOSE}"));
        self
    }

    /// Returns the type as written in DDL, e.g. `VARCHAR(255)`.
    #[must_use]
    pub fn type_sql(&self) -> String {
        type_sql(&self.datatype, self.datatype_length)
    }
}

/// Formats a type name with its optional length qualifier.
#[must_use]
pub fn type_sql(datatype: &str, length: Option<u32>) -> String {
    match length {
        Some(len) => format!("{datatype}({len})"),
        None => datatype.to_string(),
    }
}

/// Referential action for ON DELETE / ON UPDATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ForeignKeyAction {
    /// Cascade the delete/update to referencing rows.
    #[serde(rename = "CASCADE")]
    Cascade,
    /// Set the referencing columns to NULL.
    #[serde(rename = "SET NULL")]
    SetNull,
    /// No action.
    #[default]
    #[serde(rename = "NO ACTION")]
    NoAction,
}

impl ForeignKeyAction {
    /// Returns the SQL keyword(s) for this action.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::NoAction => "NO ACTION",
        }
    }
}

/// One (source, target) pair of a foreign key. Pairs are positional.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnPair {
    /// Column in this table.
    pub source_column: String,
    /// Column in the referenced table.
    pub target_column: String,
}

impl ColumnPair {
    #[must_use]
    pub fn new(source_column: impl Into<String>, target_column: impl Into<String>) -> Self {
        Self {
            source_column: source_column.into(),
            target_column: target_column.into(),
        }
    }
}

/// A foreign key constraint owned by the table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKey {
    /// Referenced table.
    pub target_table: String,
    /// Column pairs in key order.
    pub columns: Vec<ColumnPair>,
    #[serde(default)]
    pub on_delete: ForeignKeyAction,
    #[serde(default)]
    pub on_update: ForeignKeyAction,
    /// Constraint name, known only when read back from a live database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint_name: Option<String>,
}

impl ForeignKey {
    /// Creates a foreign key with `NO ACTION` on both events.
    #[must_use]
    pub fn new(target_table: impl Into<String>) -> Self {
        Self {
            target_table: target_table.into(),
            columns: Vec::new(),
            on_delete: ForeignKeyAction::NoAction,
            on_update: ForeignKeyAction::NoAction,
            constraint_name: None,
        }
    }

    /// Appends a column pair.
    #[must_use]
    pub fn column(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.columns.push(ColumnPair::new(source, target));
        self
    }

    #[must_use]
    pub const fn on_delete(mut self, action: ForeignKeyAction) -> Self {
        self.on_delete = action;
        self
    }

    #[must_use]
    pub const fn on_update(mut self, action: ForeignKeyAction) -> Self {
        self.on_update = action;
        self
    }

    /// Sets the known constraint name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.constraint_name = Some(name.into());
        self
    }

    /// Returns the source column names in key order.
    pub fn source_columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|p| p.source_column.as_str())
    }

    /// Returns the target column names in key order.
    pub fn target_columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|p| p.target_column.as_str())
    }

    /// Derives the constraint name used when creating this key on `table`:
    /// `fk_<table>_<sources>_<target>_<targets>`, with anything but ASCII
    /// letters, digits and `_` replaced by `_`, cut to
    /// [`MAX_CONSTRAINT_NAME_LEN`] characters.
    #[must_use]
    pub fn derived_constraint_name(&self, table: &str) -> String {
        let sources = self.source_columns().collect::<Vec<_>>().join("_");
        let targets = self.target_columns().collect::<Vec<_>>().join("_");
        format!("fk_{table}_{sources}_{}_{targets}", self.target_table)
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .take(MAX_CONSTRAINT_NAME_LEN)
            .collect()
    }

    /// Returns the known constraint name, or the derived one.
    #[must_use]
    pub fn constraint_name_for(&self, table: &str) -> String {
        self.constraint_name
            .clone()
            .unwrap_or_else(|| self.derived_constraint_name(table))
    }
}

/// The logical definition of one table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDefinition {
    /// Table name.
    pub name: String,
    /// Columns in declaration order.
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Foreign keys owned by this table.
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
    /// Name of the primary key constraint, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk_constraint_name: Option<String>,
}

impl TableDefinition {
    /// Creates an empty table definition.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            foreign_keys: Vec::new(),
            pk_constraint_name: None,
        }
    }

    /// Adds a column.
    #[must_use]
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Adds a foreign key.
    #[must_use]
    pub fn foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    /// Sets the primary key constraint name.
    #[must_use]
    pub fn pk_constraint(mut self, name: impl Into<String>) -> Self {
        self.pk_constraint_name = Some(name.into());
        self
    }

    /// Looks up a column by its current name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns the primary key column names in declaration order.
    #[must_use]
    pub fn primary_key_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Returns a copy of this definition as the editor would start from it:
    /// every column linked to itself through `initial_name`.
    #[must_use]
    pub fn tracked(&self) -> Self {
        Self {
            columns: self.columns.iter().cloned().map(Column::existing).collect(),
            ..self.clone()
        }
    }
}
