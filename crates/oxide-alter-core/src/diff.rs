//! Table diff engine.
//!
//! Compares an original and an updated [`TableDefinition`] and produces the
//! sorted list of [`Operation`]s that migrates the former into the latter.
//!
//! Column identity comes from a correspondence between the two
//! definitions. In [`MatchMode::Tracked`] an updated column is the same
//! column as the original one its `initial_name` points at; in
//! [`MatchMode::Literal`] columns are matched by name. Primary keys and
//! foreign keys are compared through the same correspondence, so renaming
//! a key column never recreates the key.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Column, ForeignKey, ForeignKeyAction, TableDefinition};
use crate::operation::{ColumnChanges, Operation};
use crate::sort::sort_operations;

/// How columns of the two definitions are paired up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Match through `Column::initial_name`. Unlinked columns are new.
    #[default]
    Tracked,
    /// Match by literal column name. Never produces renames.
    Literal,
}

/// Diffs two definitions using `initial_name` rename tracking.
#[must_use]
pub fn diff(original: &TableDefinition, updated: &TableDefinition) -> Vec<Operation> {
    diff_with(original, updated, MatchMode::Tracked)
}

/// Diffs two independently built definitions, matching columns by name.
#[must_use]
pub fn diff_literal(original: &TableDefinition, updated: &TableDefinition) -> Vec<Operation> {
    diff_with(original, updated, MatchMode::Literal)
}

/// Diffs two definitions with the given match mode.
///
/// The result is empty when the definitions are structurally equal and is
/// always sorted by [`sort_operations`].
#[must_use]
pub fn diff_with(
    original: &TableDefinition,
    updated: &TableDefinition,
    mode: MatchMode,
) -> Vec<Operation> {
    let correspondence = Correspondence::build(original, updated, mode);
    let mut operations = Vec::new();

    diff_columns(&correspondence, &mut operations);

    if updated.name != original.name {
        debug!(from = %original.name, to = %updated.name, "table renamed");
        operations.push(Operation::rename_table(updated.name.clone()));
    }

    diff_primary_key(&correspondence, &mut operations);
    diff_foreign_keys(&correspondence, &mut operations);

    debug!(
        table = %original.name,
        ?mode,
        operations = operations.len(),
        "table diff computed"
    );
    sort_operations(operations)
}

// ================================================================
// Column correspondence
// ================================================================

/// The identity of a column referenced from either definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ColumnIdentity<'a> {
    /// The original column at this index.
    Original(usize),
    /// The updated column at this index, with no original counterpart.
    Added(usize),
    /// A name that is not a column of its definition.
    Unknown(&'a str),
}

/// Pairs updated columns with the original columns they continue.
struct Correspondence<'a> {
    original: &'a TableDefinition,
    updated: &'a TableDefinition,
    /// For each updated column, the index of its original column.
    matches: Vec<Option<usize>>,
    /// For each original column, whether an updated column continues it.
    claimed: Vec<bool>,
}

impl<'a> Correspondence<'a> {
    fn build(original: &'a TableDefinition, updated: &'a TableDefinition, mode: MatchMode) -> Self {
        let mut claimed = vec![false; original.columns.len()];
        let matches = updated
            .columns
            .iter()
            .map(|col| {
                let key = match mode {
                    MatchMode::Tracked => col.initial_name.as_deref()?,
                    MatchMode::Literal => col.name.as_str(),
                };
                let idx = original.columns.iter().position(|o| o.name == key)?;
                if claimed[idx] {
                    debug!(column = %col.name, original = key, "original column already claimed");
                    return None;
                }
                claimed[idx] = true;
                Some(idx)
            })
            .collect();

        Self {
            original,
            updated,
            matches,
            claimed,
        }
    }

    fn original_identity(&self, name: &'a str) -> ColumnIdentity<'a> {
        self.original
            .columns
            .iter()
            .position(|c| c.name == name)
            .map_or(ColumnIdentity::Unknown(name), ColumnIdentity::Original)
    }

    fn updated_identity(&self, name: &'a str) -> ColumnIdentity<'a> {
        match self.updated.columns.iter().position(|c| c.name == name) {
            Some(j) => self.matches[j].map_or(ColumnIdentity::Added(j), ColumnIdentity::Original),
            None => ColumnIdentity::Unknown(name),
        }
    }

    /// Matched (original, updated) column pairs in updated declaration order.
    fn matched(&self) -> impl Iterator<Item = (&'a Column, &'a Column)> + '_ {
        let original = self.original;
        self.updated
            .columns
            .iter()
            .zip(&self.matches)
            .filter_map(move |(new, idx)| idx.map(|i| (&original.columns[i], new)))
    }
}

// ================================================================
// Columns
// ================================================================

fn diff_columns(correspondence: &Correspondence<'_>, operations: &mut Vec<Operation>) {
    for (col, claimed) in correspondence
        .original
        .columns
        .iter()
        .zip(&correspondence.claimed)
    {
        if !claimed {
            debug!(column = %col.name, "column dropped");
            operations.push(Operation::drop_column(col.name.clone()));
        }
    }

    for (old, new) in correspondence.matched() {
        let changes = column_changes(old, new);
        if !changes.is_empty() {
            debug!(column = %old.name, ?changes, "column altered");
            operations.push(Operation::alter_column(old.clone(), changes));
        }
    }

    for (col, idx) in correspondence
        .updated
        .columns
        .iter()
        .zip(&correspondence.matches)
    {
        if idx.is_none() {
            debug!(column = %col.name, "column added");
            operations.push(Operation::add_column(col.clone()));
        }
    }
}

/// Compares everything but primary key membership, which is diffed at the
/// table level.
fn column_changes(old: &Column, new: &Column) -> ColumnChanges {
    let mut changes = ColumnChanges::new();

    if !old.datatype.eq_ignore_ascii_case(&new.datatype) {
        changes.datatype = Some(new.datatype.clone());
    }
    if old.datatype_length != new.datatype_length {
        changes.datatype_length = Some(new.datatype_length);
    }
    if old.nullable != new.nullable {
        changes.nullable = Some(new.nullable);
    }
    if old.default_value != new.default_value {
        changes.default_value = Some(new.default_value.clone());
    }
    if old.name != new.name {
        changes.name = Some(new.name.clone());
    }

    changes
}

// ================================================================
// Primary key
// ================================================================

fn diff_primary_key(correspondence: &Correspondence<'_>, operations: &mut Vec<Operation>) {
    let original = correspondence.original;
    let updated = correspondence.updated;

    let old_key: BTreeSet<ColumnIdentity<'_>> = original
        .columns
        .iter()
        .enumerate()
        .filter(|(_, c)| c.primary_key)
        .map(|(i, _)| ColumnIdentity::Original(i))
        .collect();
    let new_key: BTreeSet<ColumnIdentity<'_>> = updated
        .columns
        .iter()
        .filter(|c| c.primary_key)
        .map(|c| correspondence.updated_identity(&c.name))
        .collect();

    if old_key == new_key {
        return;
    }

    debug!(
        table = %original.name,
        old = old_key.len(),
        new = new_key.len(),
        "primary key changed"
    );
    if !old_key.is_empty() {
        operations.push(Operation::drop_primary_key(
            original.pk_constraint_name.clone(),
        ));
    }
    if !new_key.is_empty() {
        let columns = updated
            .primary_key_columns()
            .into_iter()
            .map(String::from)
            .collect();
        operations.push(Operation::add_primary_key(columns));
    }
}

// ================================================================
// Foreign keys
// ================================================================

/// Structural identity of a foreign key: everything but its name, with
/// source columns resolved to column identities.
#[derive(Debug, PartialEq, Eq)]
struct ForeignKeyIdentity<'a> {
    target_table: &'a str,
    pairs: Vec<(ColumnIdentity<'a>, &'a str)>,
    on_delete: ForeignKeyAction,
    on_update: ForeignKeyAction,
}

impl<'a> ForeignKeyIdentity<'a> {
    fn new(fk: &'a ForeignKey, resolve: impl Fn(&'a str) -> ColumnIdentity<'a>) -> Self {
        Self {
            target_table: &fk.target_table,
            pairs: fk
                .columns
                .iter()
                .map(|p| (resolve(&p.source_column), p.target_column.as_str()))
                .collect(),
            on_delete: fk.on_delete,
            on_update: fk.on_update,
        }
    }
}

fn diff_foreign_keys(correspondence: &Correspondence<'_>, operations: &mut Vec<Operation>) {
    let original = correspondence.original;
    let updated = correspondence.updated;

    let old_ids: Vec<_> = original
        .foreign_keys
        .iter()
        .map(|fk| ForeignKeyIdentity::new(fk, |n| correspondence.original_identity(n)))
        .collect();
    let new_ids: Vec<_> = updated
        .foreign_keys
        .iter()
        .map(|fk| ForeignKeyIdentity::new(fk, |n| correspondence.updated_identity(n)))
        .collect();

    // One-to-one pairing so duplicated keys are not collapsed.
    let mut kept = vec![false; new_ids.len()];
    for (fk, old_id) in original.foreign_keys.iter().zip(&old_ids) {
        let found = new_ids
            .iter()
            .enumerate()
            .find(|(j, new_id)| !kept[*j] && *new_id == old_id)
            .map(|(j, _)| j);
        match found {
            Some(j) => kept[j] = true,
            None => {
                let name = fk.constraint_name_for(&original.name);
                debug!(constraint = %name, "foreign key dropped");
                operations.push(Operation::drop_foreign_key(name));
            }
        }
    }

    for (fk, kept) in updated.foreign_keys.iter().zip(kept) {
        if !kept {
            debug!(target = %fk.target_table, "foreign key added");
            operations.push(Operation::add_foreign_key(fk.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::OperationKind;

    fn users() -> TableDefinition {
        TableDefinition::new("users")
            .column(Column::new("user_id", "INTEGER").primary_key())
            .column(Column::new("email", "VARCHAR"))
    }

    fn kinds(ops: &[Operation]) -> Vec<OperationKind> {
        ops.iter().map(Operation::kind).collect()
    }

    #[test]
    fn identical_definitions_produce_nothing() {
        let original = users();
        assert!(diff(&original, &original.tracked()).is_empty());
        assert!(diff_literal(&original, &original).is_empty());
    }

    #[test]
    fn untracked_copy_drops_and_re_adds() {
        // Without initial names nothing is linked.
        let original = users();
        let ops = diff(&original, &original);
        assert_eq!(
            kinds(&ops),
            vec![
                OperationKind::DropPrimaryKey,
                OperationKind::DropColumn,
                OperationKind::DropColumn,
                OperationKind::AddColumn,
                OperationKind::AddColumn,
                OperationKind::AddPrimaryKey,
            ]
        );
    }

    #[test]
    fn renaming_primary_key_column_only_alters() {
        let original = users();
        let updated = TableDefinition::new("users")
            .column(Column::new("id", "INTEGER").primary_key().renamed_from("user_id"))
            .column(Column::new("email", "VARCHAR").existing());

        let ops = diff(&original, &updated);
        assert_eq!(
            ops,
            vec![Operation::alter_column(
                original.columns[0].clone(),
                ColumnChanges::new().rename("id"),
            )]
        );
    }

    #[test]
    fn added_and_dropped_columns() {
        let original = users().column(Column::new("legacy", "TEXT"));
        let updated = users().tracked().column(Column::new("age", "INTEGER"));

        let ops = diff(&original, &updated);
        assert_eq!(
            ops,
            vec![
                Operation::drop_column("legacy"),
                Operation::add_column(Column::new("age", "INTEGER")),
            ]
        );
    }

    #[test]
    fn attribute_changes_collected_into_one_alter() {
        let original = TableDefinition::new("t").column(
            Column::new("name", "varchar")
                .length(50)
                .default_value("anon"),
        );
        let updated = TableDefinition::new("t").column(
            Column::new("full_name", "TEXT")
                .not_null()
                .renamed_from("name"),
        );

        let ops = diff(&original, &updated);
        assert_eq!(ops.len(), 1);
        let Operation::AlterColumn {
            original_column,
            changes,
        } = &ops[0]
        else {
            panic!("expected alterColumn, got {:?}", ops[0]);
        };
        assert_eq!(original_column.name, "name");
        assert_eq!(changes.datatype.as_deref(), Some("TEXT"));
        assert_eq!(changes.datatype_length, Some(None));
        assert_eq!(changes.nullable, Some(false));
        assert_eq!(changes.default_value, Some(None));
        assert_eq!(changes.name.as_deref(), Some("full_name"));
    }

    #[test]
    fn datatype_case_is_ignored() {
        let original = TableDefinition::new("t").column(Column::new("a", "integer"));
        let updated = TableDefinition::new("t").column(Column::new("a", "INTEGER").existing());
        assert!(diff(&original, &updated).is_empty());
    }

    #[test]
    fn default_set_and_unchanged() {
        let original = TableDefinition::new("t")
            .column(Column::new("a", "TEXT"))
            .column(Column::new("b", "TEXT").default_value("x"));
        let updated = TableDefinition::new("t")
            .column(Column::new("a", "TEXT").default_expr("gen()").existing())
            .column(Column::new("b", "TEXT").default_value("x").existing());

        let ops = diff(&original, &updated);
        assert_eq!(
            ops,
            vec![Operation::alter_column(
                original.columns[0].clone(),
                ColumnChanges::new().set_default("{gen()}"),
            )]
        );
    }

    #[test]
    fn table_rename_is_last() {
        let original = users();
        let updated = TableDefinition {
            name: "accounts".into(),
            ..original.tracked()
        }
        .column(Column::new("age", "INTEGER"));

        let ops = diff(&original, &updated);
        assert_eq!(
            kinds(&ops),
            vec![OperationKind::AddColumn, OperationKind::RenameTable]
        );
        assert_eq!(ops[1], Operation::rename_table("accounts"));
    }

    #[test]
    fn column_moved_into_primary_key() {
        let original = users().pk_constraint("users_pkey");
        let updated = TableDefinition::new("users")
            .column(Column::new("user_id", "INTEGER").primary_key().existing())
            .column(Column::new("mail", "VARCHAR").primary_key().renamed_from("email"));

        let ops = diff(&original, &updated);
        assert_eq!(
            ops,
            vec![
                Operation::drop_primary_key(Some("users_pkey".into())),
                Operation::alter_column(
                    original.columns[1].clone(),
                    ColumnChanges::new().set_nullable(false).rename("mail"),
                ),
                Operation::add_primary_key(vec!["user_id".into(), "mail".into()]),
            ]
        );
    }

    #[test]
    fn column_removed_from_primary_key() {
        let original = TableDefinition::new("m")
            .column(Column::new("a", "INTEGER").primary_key())
            .column(Column::new("b", "INTEGER").primary_key());
        let mut b = Column::new("b", "INTEGER").not_null().existing();
        b.primary_key = false;
        let updated = TableDefinition::new("m")
            .column(Column::new("a", "INTEGER").primary_key().existing())
            .column(b);

        let ops = diff(&original, &updated);
        assert_eq!(
            ops,
            vec![
                Operation::drop_primary_key(None),
                Operation::add_primary_key(vec!["a".into()]),
            ]
        );
    }

    #[test]
    fn primary_key_removed_entirely() {
        let original = users();
        let mut id = Column::new("user_id", "INTEGER").not_null().existing();
        id.primary_key = false;
        let updated = TableDefinition::new("users")
            .column(id)
            .column(Column::new("email", "VARCHAR").existing());

        assert_eq!(diff(&original, &updated), vec![Operation::drop_primary_key(None)]);
    }

    fn posts() -> TableDefinition {
        TableDefinition::new("posts")
            .column(Column::new("id", "INTEGER").primary_key())
            .column(Column::new("author_id", "INTEGER"))
            .foreign_key(
                ForeignKey::new("users")
                    .column("author_id", "id")
                    .named("fk_posts_user"),
            )
    }

    #[test]
    fn dropped_fk_column_and_unlinked_replacement() {
        let original = posts();
        let updated = TableDefinition::new("posts")
            .column(Column::new("id", "INTEGER").primary_key().existing())
            .column(Column::new("author_id", "TEXT"));

        let ops = diff(&original, &updated);
        assert_eq!(
            ops,
            vec![
                Operation::drop_foreign_key("fk_posts_user"),
                Operation::drop_column("author_id"),
                Operation::add_column(Column::new("author_id", "TEXT")),
            ]
        );
    }

    #[test]
    fn unlinked_replacement_keeping_the_fk_recreates_it() {
        let original = posts();
        let updated = TableDefinition::new("posts")
            .column(Column::new("id", "INTEGER").primary_key().existing())
            .column(Column::new("author_id", "BIGINT"))
            .foreign_key(ForeignKey::new("users").column("author_id", "id"));

        let ops = diff(&original, &updated);
        assert_eq!(
            kinds(&ops),
            vec![
                OperationKind::DropForeignKey,
                OperationKind::DropColumn,
                OperationKind::AddColumn,
                OperationKind::AddForeignKey,
            ]
        );
    }

    #[test]
    fn renamed_fk_column_keeps_the_key() {
        let original = posts();
        let updated = TableDefinition::new("posts")
            .column(Column::new("id", "INTEGER").primary_key().existing())
            .column(Column::new("writer_id", "INTEGER").renamed_from("author_id"))
            .foreign_key(ForeignKey::new("users").column("writer_id", "id"));

        let ops = diff(&original, &updated);
        assert_eq!(kinds(&ops), vec![OperationKind::AlterColumn]);
    }

    #[test]
    fn composite_fk_fully_renamed() {
        let original = TableDefinition::new("items")
            .column(Column::new("order_id", "INTEGER"))
            .column(Column::new("order_region", "TEXT"))
            .foreign_key(
                ForeignKey::new("orders")
                    .column("order_id", "id")
                    .column("order_region", "region"),
            );
        let updated = TableDefinition::new("items")
            .column(Column::new("oid", "INTEGER").renamed_from("order_id"))
            .column(Column::new("region", "TEXT").renamed_from("order_region"))
            .foreign_key(
                ForeignKey::new("orders")
                    .column("oid", "id")
                    .column("region", "region"),
            );

        let ops = diff(&original, &updated);
        assert_eq!(
            kinds(&ops),
            vec![OperationKind::AlterColumn, OperationKind::AlterColumn]
        );
    }

    #[test]
    fn swapped_composite_mapping_recreates_the_key() {
        let original = TableDefinition::new("items")
            .column(Column::new("a", "INTEGER"))
            .column(Column::new("b", "INTEGER"))
            .foreign_key(ForeignKey::new("t").column("a", "x").column("b", "y"));
        let updated = TableDefinition {
            foreign_keys: vec![ForeignKey::new("t").column("b", "x").column("a", "y")],
            ..original.tracked()
        };

        let ops = diff(&original, &updated);
        assert_eq!(
            kinds(&ops),
            vec![OperationKind::DropForeignKey, OperationKind::AddForeignKey]
        );
    }

    #[test]
    fn fk_action_change_recreates_the_key() {
        let original = posts();
        let updated = TableDefinition {
            foreign_keys: vec![ForeignKey::new("users")
                .column("author_id", "id")
                .on_delete(ForeignKeyAction::Cascade)],
            ..original.tracked()
        };

        let ops = diff(&original, &updated);
        assert_eq!(
            ops,
            vec![
                Operation::drop_foreign_key("fk_posts_user"),
                Operation::add_foreign_key(updated.foreign_keys[0].clone()),
            ]
        );
    }

    #[test]
    fn fk_target_change_recreates_the_key() {
        let original = posts();
        let updated = TableDefinition {
            foreign_keys: vec![ForeignKey::new("members").column("author_id", "id")],
            ..original.tracked()
        };

        let ops = diff(&original, &updated);
        assert_eq!(
            kinds(&ops),
            vec![OperationKind::DropForeignKey, OperationKind::AddForeignKey]
        );
    }

    #[test]
    fn constraint_name_is_not_identity() {
        let original = posts();
        let updated = TableDefinition {
            foreign_keys: vec![ForeignKey::new("users")
                .column("author_id", "id")
                .named("something_else")],
            ..original.tracked()
        };
        assert!(diff(&original, &updated).is_empty());
    }

    #[test]
    fn unknown_fk_name_uses_derived_placeholder() {
        let original = TableDefinition::new("posts")
            .column(Column::new("author_id", "INTEGER"))
            .foreign_key(ForeignKey::new("users").column("author_id", "id"));
        let updated = TableDefinition {
            foreign_keys: vec![],
            ..original.tracked()
        };

        assert_eq!(
            diff(&original, &updated),
            vec![Operation::drop_foreign_key("fk_posts_author_id_users_id")]
        );
    }

    #[test]
    fn duplicate_claim_treats_later_column_as_new() {
        let original = TableDefinition::new("t").column(Column::new("a", "TEXT"));
        let updated = TableDefinition::new("t")
            .column(Column::new("a", "TEXT").existing())
            .column(Column::new("a2", "TEXT").renamed_from("a"));

        let ops = diff(&original, &updated);
        assert_eq!(
            ops,
            vec![Operation::add_column(
                Column::new("a2", "TEXT").renamed_from("a")
            )]
        );
    }

    #[test]
    fn literal_mode_matches_by_name() {
        let original = posts();
        let updated = TableDefinition::new("posts")
            .column(Column::new("id", "INTEGER").primary_key())
            .column(Column::new("author_id", "BIGINT").not_null())
            .foreign_key(ForeignKey::new("users").column("author_id", "id"));

        let ops = diff_literal(&original, &updated);
        assert_eq!(
            ops,
            vec![Operation::alter_column(
                original.columns[1].clone(),
                ColumnChanges::new().set_type("BIGINT").set_nullable(false),
            )]
        );
    }

    #[test]
    fn literal_mode_never_renames() {
        let original = users();
        let updated = TableDefinition::new("users")
            .column(Column::new("id", "INTEGER").primary_key().renamed_from("user_id"))
            .column(Column::new("email", "VARCHAR"));

        let ops = diff_literal(&original, &updated);
        assert_eq!(
            kinds(&ops),
            vec![
                OperationKind::DropPrimaryKey,
                OperationKind::DropColumn,
                OperationKind::AddColumn,
                OperationKind::AddPrimaryKey,
            ]
        );
    }

    #[test]
    fn inputs_are_not_mutated() {
        let original = posts();
        let updated = TableDefinition::new("articles");
        let (before_o, before_u) = (original.clone(), updated.clone());
        let _ = diff(&original, &updated);
        assert_eq!(original, before_o);
        assert_eq!(updated, before_u);
    }
}
