//! # oxide-alter-core
//!
//! Plans `ALTER TABLE` migrations between two definitions of the same table.
//!
//! The pipeline has four stages:
//!
//! - **Diff** - compares the original and updated [`TableDefinition`] and
//!   produces [`Operation`]s. Renames are recognised through each column's
//!   `initial_name`, so renaming a key column never drops the key.
//! - **Sort** - orders operations so constraints are dropped before the
//!   columns they cover and the table is renamed last.
//! - **Render** - turns operations into statements for one [`Dialect`].
//! - **Transaction** - wraps the statements in `BEGIN;` / `COMMIT;`.
//!
//! ```rust
//! use oxide_alter_core::prelude::*;
//!
//! let original = TableDefinition::new("users")
//!     .column(Column::new("user_id", "INTEGER").primary_key())
//!     .column(Column::new("email", "VARCHAR").length(255));
//!
//! let updated = TableDefinition::new("users")
//!     .column(Column::new("id", "INTEGER").primary_key().renamed_from("user_id"))
//!     .column(Column::new("email", "VARCHAR").length(255).existing())
//!     .column(Column::new("age", "INTEGER"));
//!
//! let ops = diff(&original, &updated);
//! let statements = render(&original.name, &ops, Dialect::Postgresql, None);
//! assert_eq!(
//!     wrap(&statements),
//!     "BEGIN;\n\
//!      ALTER TABLE users RENAME COLUMN user_id TO id;\n\
//!      ALTER TABLE users ADD COLUMN age INTEGER;\n\
//!      COMMIT;"
//! );
//! ```

pub mod dialect;
pub mod diff;
pub mod error;
pub mod model;
pub mod operation;
pub mod plan;
pub mod render;
pub mod sort;
pub mod transaction;

pub use dialect::{DdlDialect, Dialect};
pub use diff::{diff, diff_literal, diff_with, MatchMode};
pub use error::DialectError;
pub use model::{Column, ColumnPair, ForeignKey, ForeignKeyAction, TableDefinition};
pub use operation::{ColumnChanges, Operation, OperationKind};
pub use plan::{MigrationPlan, PlanOptions};
pub use render::render;
pub use sort::sort_operations;
pub use transaction::wrap;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::dialect::{DdlDialect, Dialect, TableRef};
    pub use crate::diff::{diff, diff_literal, diff_with, MatchMode};
    pub use crate::error::DialectError;
    pub use crate::model::{Column, ColumnPair, ForeignKey, ForeignKeyAction, TableDefinition};
    pub use crate::operation::{ColumnChanges, Operation, OperationKind};
    pub use crate::plan::{MigrationPlan, PlanOptions};
    pub use crate::render::render;
    pub use crate::sort::sort_operations;
    pub use crate::transaction::wrap;
}
