//! DuckDB dialect.
//!
//! DuckDB accepts the PostgreSQL forms of every statement the planner
//! emits, so nothing is overridden.

use super::{DdlDialect, Dialect};

/// DuckDB dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuckDbDialect;

impl DdlDialect for DuckDbDialect {
    fn dialect(&self) -> Dialect {
        Dialect::Duckdb
    }
}
