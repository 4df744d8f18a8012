//! Dependency-safe ordering of operations.
//!
//! Constraints are dropped before the columns they cover, new columns exist
//! before keys reference them, and the table is renamed last so every other
//! statement can still address it by its original name.

use crate::operation::Operation;

/// Stable-sorts operations by [`OperationKind::priority`].
///
/// Operations of the same kind keep their relative order.
///
/// [`OperationKind::priority`]: crate::operation::OperationKind::priority
#[must_use]
pub fn sort_operations(mut ops: Vec<Operation>) -> Vec<Operation> {
    ops.sort_by_key(|op| op.kind().priority());
    ops
}
