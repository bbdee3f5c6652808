//! Giftlink DB - Access-ledger persistence
//!
//! SQLx-based ledger layer over the four grant kinds: permanent grants,
//! timed grants, daily free counters, and token balances.
//!
//! # Example
//!
//! ```rust,ignore
//! use giftlink_db::{create_pool, PgAccessLedger, TokenBalanceRepository};
//!
//! let pool = create_pool("postgres://localhost/giftlink").await?;
//! let ledger = PgAccessLedger::new(pool);
//!
//! let spent = ledger.try_spend_token(user_id).await?;
//! ```

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use models::*;
pub use pg::PgAccessLedger;
pub use pool::{create_pool, DbPool};
pub use repo::*;
