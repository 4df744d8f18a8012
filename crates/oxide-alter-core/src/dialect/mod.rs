//! SQL dialects.
//!
//! [`Dialect`] is the closed set of supported engines. Each variant is
//! backed by a [`DdlDialect`] implementation that knows how that engine
//! spells every operation; the trait's default methods produce the
//! PostgreSQL-flavoured forms and each dialect overrides what differs.

mod bigquery;
mod duckdb;
mod mssql;
mod mysql;
mod postgres;
mod snowflake;

pub use bigquery::BigQueryDialect;
pub use duckdb::DuckDbDialect;
pub use mssql::MsSqlServerDialect;
pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;
pub use snowflake::SnowflakeDialect;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DialectError;
use crate::model::{Column, ForeignKey, ForeignKeyAction, RAW_DEFAULT_CLOSE, RAW_DEFAULT_OPEN};
use crate::operation::ColumnChanges;

/// The supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    Postgresql,
    Mysql,
    MsSqlServer,
    Snowflake,
    Bigquery,
    Duckdb,
}

/// How a dialect quotes identifiers that are not plain words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// `"name"`
    DoubleQuote,
    /// `` `name` ``
    Backtick,
    /// `[name]`
    Bracket,
}

impl QuoteStyle {
    const fn delimiters(self) -> (char, char) {
        match self {
            Self::DoubleQuote => ('"', '"'),
            Self::Backtick => ('`', '`'),
            Self::Bracket => ('[', ']'),
        }
    }

    /// Quotes `name` unconditionally, doubling any closing delimiter.
    #[must_use]
    pub fn quote(self, name: &str) -> String {
        let (open, close) = self.delimiters();
        let escaped = name.replace(close, &format!("{close}{close}"));
        format!("{open}{escaped}{close}")
    }
}

/// Syntax used to drop a foreign key constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyDrop {
    /// `DROP CONSTRAINT name`
    DropConstraint,
    /// ``DROP FOREIGN KEY `name` ``
    DropForeignKey,
}

/// How literal default values are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultFormat {
    /// `'value'`
    Quoted,
    /// `CAST('value' AS type)`
    Cast,
}

impl Dialect {
    /// All dialects, in a stable order.
    pub const ALL: [Self; 6] = [
        Self::Postgresql,
        Self::Mysql,
        Self::MsSqlServer,
        Self::Snowflake,
        Self::Bigquery,
        Self::Duckdb,
    ];

    /// The dialect tag handed to the execution pipeline.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Postgresql => "postgresql",
            Self::Mysql => "mysql",
            Self::MsSqlServer => "ms_sql_server",
            Self::Snowflake => "snowflake",
            Self::Bigquery => "bigquery",
            Self::Duckdb => "duckdb",
        }
    }

    /// Whether table references may be qualified with a schema. For
    /// BigQuery the schema is the dataset.
    #[must_use]
    pub const fn supports_schema(self) -> bool {
        !matches!(self, Self::Mysql)
    }

    #[must_use]
    pub const fn quote_style(self) -> QuoteStyle {
        match self {
            Self::Postgresql | Self::Snowflake | Self::Duckdb => QuoteStyle::DoubleQuote,
            Self::Mysql | Self::Bigquery => QuoteStyle::Backtick,
            Self::MsSqlServer => QuoteStyle::Bracket,
        }
    }

    #[must_use]
    pub const fn foreign_key_drop(self) -> ForeignKeyDrop {
        match self {
            Self::Mysql => ForeignKeyDrop::DropForeignKey,
            _ => ForeignKeyDrop::DropConstraint,
        }
    }

    #[must_use]
    pub const fn default_format(self) -> DefaultFormat {
        match self {
            Self::Bigquery => DefaultFormat::Cast,
            _ => DefaultFormat::Quoted,
        }
    }

    /// Whether DDL can run inside `BEGIN; ... COMMIT;`. MySQL, Snowflake and
    /// BigQuery commit implicitly around DDL; SQL Server spells the
    /// envelope differently.
    #[must_use]
    pub const fn supports_transactional_ddl(self) -> bool {
        matches!(self, Self::Postgresql | Self::Duckdb)
    }

    /// Returns the statement generator for this dialect.
    #[must_use]
    pub fn ddl(self) -> &'static dyn DdlDialect {
        match self {
            Self::Postgresql => &PostgresDialect,
            Self::Mysql => &MySqlDialect,
            Self::MsSqlServer => &MsSqlServerDialect,
            Self::Snowflake => &SnowflakeDialect,
            Self::Bigquery => &BigQueryDialect,
            Self::Duckdb => &DuckDbDialect,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = DialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DialectError::Unsupported(s.to_string()))
    }
}

/// A table reference: the table name plus the schema it lives in, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRef<'a> {
    pub name: &'a str,
    pub schema: Option<&'a str>,
}

impl<'a> TableRef<'a> {
    #[must_use]
    pub const fn new(name: &'a str, schema: Option<&'a str>) -> Self {
        Self { name, schema }
    }

    /// Unquoted `schema.name`, as system procedures expect object names.
    #[must_use]
    pub fn object_name(&self) -> String {
        match self.schema {
            Some(schema) => format!("{schema}.{}", self.name),
            None => self.name.to_string(),
        }
    }
}

/// Returns true for identifiers that never need quoting.
fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Escapes a value for use inside a single-quoted SQL string.
pub(crate) fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Returns the raw expression inside a `{...}` default, if it is one.
fn raw_expression(value: &str) -> Option<&str> {
    value
        .strip_prefix(RAW_DEFAULT_OPEN)
        .and_then(|v| v.strip_suffix(RAW_DEFAULT_CLOSE))
}

/// Statement generation for one dialect.
///
/// Methods return statements without the trailing `;`; the renderer adds
/// it. `table` is always the table's name before any rename in the batch.
pub trait DdlDialect: Send + Sync {
    /// The dialect this generator belongs to.
    fn dialect(&self) -> Dialect;

    /// Quotes an identifier if it is not a plain word.
    fn quote_identifier(&self, name: &str) -> String {
        if is_plain_identifier(name) {
            name.to_string()
        } else {
            self.dialect().quote_style().quote(name)
        }
    }

    /// Quotes each dot-separated part of a possibly qualified name.
    fn quote_path(&self, path: &str) -> String {
        path.split('.')
            .map(|part| self.quote_identifier(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Renders the table reference, schema-qualified when one is given.
    /// Without a schema a dotted name is taken as already qualified; with
    /// one, the name is a single identifier.
    fn table_ref(&self, table: &TableRef<'_>) -> String {
        match table.schema {
            Some(schema) => format!(
                "{}.{}",
                self.quote_identifier(schema),
                self.quote_identifier(table.name)
            ),
            None => self.quote_path(table.name),
        }
    }

    /// Formats a default value for a column of type `type_sql`.
    fn format_default(&self, value: &str, type_sql: &str) -> String {
        if let Some(expr) = raw_expression(value) {
            return expr.to_string();
        }
        let literal = format!("'{}'", escape_literal(value));
        match self.dialect().default_format() {
            DefaultFormat::Quoted => literal,
            DefaultFormat::Cast => format!("CAST({literal} AS {type_sql})"),
        }
    }

    /// `name type [NOT NULL] [DEFAULT expr]`.
    fn column_definition(&self, column: &Column) -> String {
        let type_sql = column.type_sql();
        let mut sql = format!("{} {}", self.quote_identifier(&column.name), type_sql);
        if !column.nullable {
            sql.push_str(" NOT NULL");
        }
        if let Some(default) = &column.default_value {
            sql.push_str(" DEFAULT ");
            sql.push_str(&self.format_default(default, &type_sql));
        }
        sql
    }

    fn add_column(&self, table: &TableRef<'_>, column: &Column) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {}",
            self.table_ref(table),
            self.column_definition(column)
        )
    }

    fn drop_column(&self, table: &TableRef<'_>, name: &str) -> String {
        format!(
            "ALTER TABLE {} DROP COLUMN {}",
            self.table_ref(table),
            self.quote_identifier(name)
        )
    }

    /// Expands one column change into statements: type, default,
    /// nullability, then rename. The first three address the column by its
    /// old name.
    fn alter_column(
        &self,
        table: &TableRef<'_>,
        column: &Column,
        changes: &ColumnChanges,
    ) -> Vec<String> {
        let target = changes.apply_to(column);
        let mut statements = Vec::new();

        if changes.changes_type() {
            statements.push(self.alter_type(table, &column.name, &target.type_sql()));
        }
        match &changes.default_value {
            Some(Some(value)) => {
                statements.push(self.set_default(table, &column.name, value, &target.type_sql()));
            }
            Some(None) => statements.push(self.drop_default(table, &column.name)),
            None => {}
        }
        if let Some(nullable) = changes.nullable {
            statements.push(self.set_nullable(table, &column.name, nullable));
        }
        if let Some(new_name) = &changes.name {
            statements.push(self.rename_column(table, &column.name, new_name));
        }

        statements
    }

    fn alter_type(&self, table: &TableRef<'_>, column: &str, type_sql: &str) -> String {
        format!(
            "ALTER TABLE {} ALTER COLUMN {} TYPE {}",
            self.table_ref(table),
            self.quote_identifier(column),
            type_sql
        )
    }

    fn set_default(&self, table: &TableRef<'_>, column: &str, value: &str, type_sql: &str) -> String {
        format!(
            "ALTER TABLE {} ALTER COLUMN {} SET DEFAULT {}",
            self.table_ref(table),
            self.quote_identifier(column),
            self.format_default(value, type_sql)
        )
    }

    fn drop_default(&self, table: &TableRef<'_>, column: &str) -> String {
        format!(
            "ALTER TABLE {} ALTER COLUMN {} DROP DEFAULT",
            self.table_ref(table),
            self.quote_identifier(column)
        )
    }

    fn set_nullable(&self, table: &TableRef<'_>, column: &str, nullable: bool) -> String {
        format!(
            "ALTER TABLE {} ALTER COLUMN {} {}",
            self.table_ref(table),
            self.quote_identifier(column),
            if nullable { "DROP NOT NULL" } else { "SET NOT NULL" }
        )
    }

    fn rename_column(&self, table: &TableRef<'_>, old_name: &str, new_name: &str) -> String {
        format!(
            "ALTER TABLE {} RENAME COLUMN {} TO {}",
            self.table_ref(table),
            self.quote_identifier(old_name),
            self.quote_identifier(new_name)
        )
    }

    /// `FOREIGN KEY (..) REFERENCES target (..)` without actions.
    fn foreign_key_clause(&self, fk: &ForeignKey) -> String {
        let sources: Vec<String> = fk
            .source_columns()
            .map(|c| self.quote_identifier(c))
            .collect();
        let targets: Vec<String> = fk
            .target_columns()
            .map(|c| self.quote_identifier(c))
            .collect();
        format!(
            "FOREIGN KEY ({}) REFERENCES {} ({})",
            sources.join(", "),
            self.quote_path(&fk.target_table),
            targets.join(", ")
        )
    }

    fn add_foreign_key(&self, table: &TableRef<'_>, fk: &ForeignKey) -> String {
        let mut sql = format!(
            "ALTER TABLE {} ADD CONSTRAINT {} {}",
            self.table_ref(table),
            self.quote_identifier(&fk.constraint_name_for(table.name)),
            self.foreign_key_clause(fk)
        );
        if fk.on_delete != ForeignKeyAction::NoAction {
            sql.push_str(" ON DELETE ");
            sql.push_str(fk.on_delete.as_sql());
        }
        if fk.on_update != ForeignKeyAction::NoAction {
            sql.push_str(" ON UPDATE ");
            sql.push_str(fk.on_update.as_sql());
        }
        sql
    }

    fn drop_foreign_key(&self, table: &TableRef<'_>, constraint_name: &str) -> String {
        match self.dialect().foreign_key_drop() {
            ForeignKeyDrop::DropConstraint => format!(
                "ALTER TABLE {} DROP CONSTRAINT {}",
                self.table_ref(table),
                self.quote_identifier(constraint_name)
            ),
            ForeignKeyDrop::DropForeignKey => format!(
                "ALTER TABLE {} DROP FOREIGN KEY {}",
                self.table_ref(table),
                self.dialect().quote_style().quote(constraint_name)
            ),
        }
    }

    fn add_primary_key(&self, table: &TableRef<'_>, columns: &[String]) -> String {
        let cols: Vec<String> = columns.iter().map(|c| self.quote_identifier(c)).collect();
        format!(
            "ALTER TABLE {} ADD PRIMARY KEY ({})",
            self.table_ref(table),
            cols.join(", ")
        )
    }

    /// Drops the primary key. An unknown constraint name falls back to
    /// PostgreSQL's `<table>_pkey` convention.
    fn drop_primary_key(&self, table: &TableRef<'_>, constraint_name: Option<&str>) -> String {
        let name = constraint_name.map_or_else(|| format!("{}_pkey", table.name), String::from);
        format!(
            "ALTER TABLE {} DROP CONSTRAINT {}",
            self.table_ref(table),
            self.quote_identifier(&name)
        )
    }

    fn rename_table(&self, table: &TableRef<'_>, new_name: &str) -> String {
        format!(
            "ALTER TABLE {} RENAME TO {}",
            self.table_ref(table),
            self.quote_identifier(new_name)
        )
    }
}
