//! # split-ledger
//!
//! Balance and settlement engine for shared-expense ledgers.
//!
//! Given a history of group expenses and settlement payments, this
//! engine computes exact pairwise balances per currency and suggests a
//! short list of transfers that settles a group.
//!
//! All internal arithmetic is checked integer math in currency minor
//! units; amounts only become decimals at the serialization boundary.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: users, money, currencies, expenses, payments, errors
//! - **ledger** — Entry extraction and balance aggregation
//! - **settle** — Greedy debt simplification and the engine façade
//! - **sources** — Traits the engine reads expense/payment/membership data through
//! - **scenario** — In-memory source, scenario files, random generation

pub mod core;
pub mod ledger;
pub mod scenario;
pub mod settle;
pub mod sources;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::currency::CurrencyCode;
    pub use crate::core::error::{LedgerError, Result};
    pub use crate::core::expense::{split_evenly, ExpenseRecord, SplitRecord};
    pub use crate::core::money::MinorUnits;
    pub use crate::core::payment::{PaymentRecord, PaymentStatus};
    pub use crate::core::user::{GroupId, UserId};
    pub use crate::ledger::balance::BalanceSheet;
    pub use crate::ledger::extract::EntryExtractor;
    pub use crate::scenario::InMemoryLedger;
    pub use crate::settle::engine::SettlementEngine;
    pub use crate::settle::simplify::DebtSimplifier;
}
