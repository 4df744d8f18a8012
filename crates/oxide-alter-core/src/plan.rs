//! End-to-end planning: diff, sort and render in one step.

use serde::Serialize;

use crate::dialect::Dialect;
use crate::diff::{diff_with, MatchMode};
use crate::model::TableDefinition;
use crate::operation::Operation;
use crate::render::render;
use crate::transaction::wrap;

/// Options for [`MigrationPlan::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOptions {
    /// Target dialect.
    pub dialect: Dialect,
    /// Schema to qualify the table with, where the dialect allows it.
    pub schema: Option<String>,
    /// How columns are matched between the two definitions.
    pub match_mode: MatchMode,
    /// Wrap the SQL in a transaction when the dialect runs DDL
    /// transactionally.
    pub transaction: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::Postgresql,
            schema: None,
            match_mode: MatchMode::Tracked,
            transaction: true,
        }
    }
}

impl PlanOptions {
    /// Creates options for the given dialect.
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    #[must_use]
    pub const fn match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    /// Matches columns by name only.
    #[must_use]
    pub const fn literal(self) -> Self {
        self.match_mode(MatchMode::Literal)
    }

    /// Never wraps the SQL in a transaction.
    #[must_use]
    pub const fn without_transaction(mut self) -> Self {
        self.transaction = false;
        self
    }
}

/// The operations needed to turn one table definition into another, and
/// the SQL that performs them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationPlan {
    /// Name of the table the statements address.
    pub table: String,
    pub dialect: Dialect,
    /// Sorted operations.
    pub operations: Vec<Operation>,
    /// Rendered statements, each ending with `;`.
    pub statements: Vec<String>,
    /// Whether [`MigrationPlan::to_sql`] wraps the statements in a
    /// transaction.
    pub transactional: bool,
}

impl MigrationPlan {
    /// Diffs `original` against `updated` and renders the result.
    #[must_use]
    pub fn build(
        original: &TableDefinition,
        updated: &TableDefinition,
        options: &PlanOptions,
    ) -> Self {
        let operations = diff_with(original, updated, options.match_mode);
        let statements = render(
            &original.name,
            &operations,
            options.dialect,
            options.schema.as_deref(),
        );
        Self {
            table: original.name.clone(),
            dialect: options.dialect,
            operations,
            statements,
            transactional: options.transaction && options.dialect.supports_transactional_ddl(),
        }
    }

    /// Returns true if the definitions are equivalent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Returns true if any operation drops a column or constraint.
    #[must_use]
    pub fn has_destructive_operations(&self) -> bool {
        self.operations.iter().any(Operation::is_destructive)
    }

    /// The destructive operations, in execution order.
    pub fn destructive_operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter().filter(|op| op.is_destructive())
    }

    /// The SQL to hand to the executor: wrapped in `BEGIN;`/`COMMIT;` when
    /// transactional, otherwise one statement per line. Empty when there is
    /// nothing to do.
    #[must_use]
    pub fn to_sql(&self) -> String {
        if self.transactional {
            wrap(&self.statements)
        } else {
            self.statements.join("\n")
        }
    }
}
