//! Command-line front end for `oxide-alter-core`.
//!
//! Loads the original and updated table definitions from JSON files, plans
//! the migration between them and prints either the operations or the SQL.
//!
//! # CLI Usage
//!
//! ```bash
//! # Show the operations that turn one definition into the other
//! oxide-alter plan original.json updated.json
//!
//! # Print MySQL statements for the same change
//! oxide-alter --dialect mysql sql original.json updated.json
//!
//! # List supported dialects
//! oxide-alter dialects
//! ```

pub mod definition;
pub mod error;
pub mod output;

use std::path::Path;

use oxide_alter_core::{Dialect, MigrationPlan, PlanOptions};
use tracing::warn;

pub use definition::load_definition;
pub use error::{AlterError, Result};
pub use output::{describe, describe_dialects, format_operations, OutputFormat};

/// Builds plan options from command-line values.
///
/// # Errors
///
/// Returns [`AlterError::Dialect`] if `dialect` is not a supported name.
pub fn plan_options(
    dialect: &str,
    schema: Option<&str>,
    literal: bool,
    transaction: bool,
) -> Result<PlanOptions> {
    let mut options = PlanOptions::new(dialect.parse::<Dialect>()?);
    if let Some(schema) = schema.filter(|s| !s.is_empty()) {
        options = options.schema(schema);
    }
    if literal {
        options = options.literal();
    }
    if !transaction {
        options = options.without_transaction();
    }
    Ok(options)
}

/// Loads both definitions and plans the migration between them.
///
/// Destructive operations are reported as warnings.
///
/// # Errors
///
/// Returns an error if either definition cannot be loaded.
pub fn plan_files(original: &Path, updated: &Path, options: &PlanOptions) -> Result<MigrationPlan> {
    let original = load_definition(original)?;
    let updated = load_definition(updated)?;
    let plan = MigrationPlan::build(&original, &updated, options);
    for op in plan.destructive_operations() {
        warn!("destructive operation on {}: {}", plan.table, describe(op));
    }
    Ok(plan)
}
