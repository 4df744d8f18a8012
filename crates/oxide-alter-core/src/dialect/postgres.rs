//! PostgreSQL dialect.

use super::{DdlDialect, Dialect};

/// PostgreSQL: the trait's default statements are PostgreSQL syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl DdlDialect for PostgresDialect {
    fn dialect(&self) -> Dialect {
        Dialect::Postgresql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::TableRef;
    use crate::model::{Column, ForeignKey, ForeignKeyAction};
    use crate::operation::ColumnChanges;

    const USERS: TableRef<'static> = TableRef::new("users", None);

    #[test]
    fn add_column() {
        let col = Column::new("age", "INTEGER");
        assert_eq!(
            PostgresDialect.add_column(&USERS, &col),
            "ALTER TABLE users ADD COLUMN age INTEGER"
        );
    }

    #[test]
    fn alter_column_statement_order() {
        let col = Column::new("created", "DATE");
        let changes = ColumnChanges::new()
            .rename("created_at")
            .set_nullable(false)
            .set_default("{now()}")
            .set_type("TIMESTAMP");
        assert_eq!(
            PostgresDialect.alter_column(&USERS, &col, &changes),
            vec![
                "ALTER TABLE users ALTER COLUMN created TYPE TIMESTAMP",
                "ALTER TABLE users ALTER COLUMN created SET DEFAULT now()",
                "ALTER TABLE users ALTER COLUMN created SET NOT NULL",
                "ALTER TABLE users RENAME COLUMN created TO created_at",
            ]
        );
    }

    #[test]
    fn length_only_change_keeps_type_name() {
        let col = Column::new("email", "VARCHAR").length(100);
        let changes = ColumnChanges::new().set_length(Some(320));
        assert_eq!(
            PostgresDialect.alter_column(&USERS, &col, &changes),
            vec!["ALTER TABLE users ALTER COLUMN email TYPE VARCHAR(320)"]
        );
    }

    #[test]
    fn drop_default_and_nullability() {
        let col = Column::new("email", "TEXT").not_null().default_value("x");
        let changes = ColumnChanges::new().drop_default().set_nullable(true);
        assert_eq!(
            PostgresDialect.alter_column(&USERS, &col, &changes),
            vec![
                "ALTER TABLE users ALTER COLUMN email DROP DEFAULT",
                "ALTER TABLE users ALTER COLUMN email DROP NOT NULL",
            ]
        );
    }

    #[test]
    fn add_foreign_key_with_actions() {
        let fk = ForeignKey::new("users")
            .column("author_id", "id")
            .on_delete(ForeignKeyAction::Cascade)
            .on_update(ForeignKeyAction::SetNull);
        assert_eq!(
            PostgresDialect.add_foreign_key(&TableRef::new("posts", None), &fk),
            "ALTER TABLE posts ADD CONSTRAINT fk_posts_author_id_users_id \
             FOREIGN KEY (author_id) REFERENCES users (id) ON DELETE CASCADE ON UPDATE SET NULL"
        );
    }

    #[test]
    fn no_action_clauses_are_omitted() {
        let fk = ForeignKey::new("public.users").column("author_id", "id");
        assert_eq!(
            PostgresDialect.add_foreign_key(&TableRef::new("posts", Some("public")), &fk),
            "ALTER TABLE public.posts ADD CONSTRAINT fk_posts_author_id_public_users_id \
             FOREIGN KEY (author_id) REFERENCES public.users (id)"
        );
    }

    #[test]
    fn primary_key_statements() {
        assert_eq!(
            PostgresDialect.add_primary_key(&USERS, &["id".to_string(), "org_id".to_string()]),
            "ALTER TABLE users ADD PRIMARY KEY (id, org_id)"
        );
        assert_eq!(
            PostgresDialect.drop_primary_key(&USERS, Some("users_pk")),
            "ALTER TABLE users DROP CONSTRAINT users_pk"
        );
        assert_eq!(
            PostgresDialect.drop_primary_key(&USERS, None),
            "ALTER TABLE users DROP CONSTRAINT users_pkey"
        );
    }

    #[test]
    fn drop_foreign_key_and_rename_table() {
        assert_eq!(
            PostgresDialect.drop_foreign_key(&TableRef::new("posts", None), "fk_posts_user"),
            "ALTER TABLE posts DROP CONSTRAINT fk_posts_user"
        );
        assert_eq!(
            PostgresDialect.rename_table(&USERS, "accounts"),
            "ALTER TABLE users RENAME TO accounts"
        );
    }
}
