//! Shared test fixtures
#![allow(dead_code)]

pub mod mock_ledger;
pub mod probes;

pub use mock_ledger::MockAccessLedger;
pub use probes::{FailingProbe, StaticProbe};
