//! Schema-change operations.
//!
//! The diff engine's only output type. Each variant is one atomic change
//! against a single table; the table itself is supplied at render time.

use serde::{Deserialize, Deserializer, Serialize};

use crate::model::{Column, ForeignKey};

/// Deserializes a present key as `Some(value)`, so that with
/// `#[serde(default)]` an absent key stays `None` and an explicit `null`
/// becomes `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Attribute changes on an existing column. A `None` field is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ColumnChanges {
    /// New type name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    /// New length qualifier; `Some(None)` removes it.
    #[serde(
        rename = "datatype_length",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub datatype_length: Option<Option<u32>>,
    /// New nullability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    /// New default; `Some(None)` clears it.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<Option<String>>,
    /// New column name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ColumnChanges {
    /// Creates empty column changes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new type.
    #[must_use]
    pub fn set_type(mut self, datatype: impl Into<String>) -> Self {
        self.datatype = Some(datatype.into());
        self
    }

    /// Sets a new length qualifier.
    #[must_use]
    pub const fn set_length(mut self, length: Option<u32>) -> Self {
        self.datatype_length = Some(length);
        self
    }

    /// Sets nullability.
    #[must_use]
    pub const fn set_nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    /// Sets a new default value.
    #[must_use]
    pub fn set_default(mut self, default: impl Into<String>) -> Self {
        self.default_value = Some(Some(default.into()));
        self
    }

    /// Clears the default value.
    #[must_use]
    pub fn drop_default(mut self) -> Self {
        self.default_value = Some(None);
        self
    }

    /// Renames the column.
    #[must_use]
    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns true if no changes are specified.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.datatype.is_none()
            && self.datatype_length.is_none()
            && self.nullable.is_none()
            && self.default_value.is_none()
            && self.name.is_none()
    }

    /// Returns true if the type or its length changes.
    #[must_use]
    pub const fn changes_type(&self) -> bool {
        self.datatype.is_some() || self.datatype_length.is_some()
    }

    /// Applies these changes to `column`, returning the resulting column.
    #[must_use]
    pub fn apply_to(&self, column: &Column) -> Column {
        let mut out = column.clone();
        if let Some(datatype) = &self.datatype {
            out.datatype.clone_from(datatype);
        }
        if let Some(length) = self.datatype_length {
            out.datatype_length = length;
        }
        if let Some(nullable) = self.nullable {
            out.nullable = nullable;
        }
        if let Some(default) = &self.default_value {
            out.default_value.clone_from(default);
        }
        if let Some(name) = &self.name {
            out.name.clone_from(name);
        }
        out
    }
}

/// A single schema-change operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Operation {
    /// Add a column.
    AddColumn { column: Column },
    /// Drop a column by its original name.
    DropColumn { name: String },
    /// Change attributes of an existing column.
    AlterColumn {
        /// The column as it was before the change.
        original_column: Column,
        changes: ColumnChanges,
    },
    /// Add a foreign key constraint.
    AddForeignKey { foreign_key: ForeignKey },
    /// Drop a foreign key constraint.
    DropForeignKey { constraint_name: String },
    /// Add a primary key over the named columns.
    AddPrimaryKey { columns: Vec<String> },
    /// Drop the primary key constraint.
    DropPrimaryKey {
        #[serde(default)]
        constraint_name: Option<String>,
    },
    /// Rename the table.
    RenameTable { to: String },
}

/// The discriminant of an [`Operation`], used for ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperationKind {
    DropForeignKey,
    DropPrimaryKey,
    DropColumn,
    AlterColumn,
    AddColumn,
    AddPrimaryKey,
    AddForeignKey,
    RenameTable,
}

impl OperationKind {
    /// Execution priority; lower runs first.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::DropForeignKey => 1,
            Self::DropPrimaryKey => 2,
            Self::DropColumn => 3,
            Self::AlterColumn => 4,
            Self::AddColumn => 5,
            Self::AddPrimaryKey => 6,
            Self::AddForeignKey => 7,
            Self::RenameTable => 8,
        }
    }

    /// The serialized tag, e.g. `dropForeignKey`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DropForeignKey => "dropForeignKey",
            Self::DropPrimaryKey => "dropPrimaryKey",
            Self::DropColumn => "dropColumn",
            Self::AlterColumn => "alterColumn",
            Self::AddColumn => "addColumn",
            Self::AddPrimaryKey => "addPrimaryKey",
            Self::AddForeignKey => "addForeignKey",
            Self::RenameTable => "renameTable",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Operation {
    /// Creates an AddColumn operation.
    #[must_use]
    pub const fn add_column(column: Column) -> Self {
        Self::AddColumn { column }
    }

    /// Creates a DropColumn operation.
    #[must_use]
    pub fn drop_column(name: impl Into<String>) -> Self {
        Self::DropColumn { name: name.into() }
    }

    /// Creates an AlterColumn operation.
    #[must_use]
    pub const fn alter_column(original_column: Column, changes: ColumnChanges) -> Self {
        Self::AlterColumn {
            original_column,
            changes,
        }
    }

    /// Creates an AddForeignKey operation.
    #[must_use]
    pub const fn add_foreign_key(foreign_key: ForeignKey) -> Self {
        Self::AddForeignKey { foreign_key }
    }

    /// Creates a DropForeignKey operation.
    #[must_use]
    pub fn drop_foreign_key(constraint_name: impl Into<String>) -> Self {
        Self::DropForeignKey {
            constraint_name: constraint_name.into(),
        }
    }

    /// Creates an AddPrimaryKey operation.
    #[must_use]
    pub const fn add_primary_key(columns: Vec<String>) -> Self {
        Self::AddPrimaryKey { columns }
    }

    /// Creates a DropPrimaryKey operation.
    #[must_use]
    pub const fn drop_primary_key(constraint_name: Option<String>) -> Self {
        Self::DropPrimaryKey { constraint_name }
    }

    /// Creates a RenameTable operation.
    #[must_use]
    pub fn rename_table(to: impl Into<String>) -> Self {
        Self::RenameTable { to: to.into() }
    }

    /// Returns the kind of this operation.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::AddColumn { .. } => OperationKind::AddColumn,
            Self::DropColumn { .. } => OperationKind::DropColumn,
            Self::AlterColumn { .. } => OperationKind::AlterColumn,
            Self::AddForeignKey { .. } => OperationKind::AddForeignKey,
            Self::DropForeignKey { .. } => OperationKind::DropForeignKey,
            Self::AddPrimaryKey { .. } => OperationKind::AddPrimaryKey,
            Self::DropPrimaryKey { .. } => OperationKind::DropPrimaryKey,
            Self::RenameTable { .. } => OperationKind::RenameTable,
        }
    }

    /// Returns whether this operation removes a column or a constraint.
    #[must_use]
    pub const fn is_destructive(&self) -> bool {
        matches!(
            self,
            Self::DropColumn { .. } | Self::DropForeignKey { .. } | Self::DropPrimaryKey { .. }
        )
    }
}
