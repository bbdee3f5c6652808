//! PostgreSQL ledger implementation
//!
//! One store implements all four repository traits; the trait impls live in
//! the sibling modules, split by grant kind.

mod daily;
mod permanent;
mod timed;
mod tokens;

use crate::DbPool;

/// PostgreSQL-backed access ledger
#[derive(Clone)]
pub struct PgAccessLedger {
    pool: DbPool,
}

impl PgAccessLedger {
    /// Create a new ledger over a connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}
