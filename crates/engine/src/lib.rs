//! Event fund ledger: record store plus the aggregation and reporting core.
//!
//! The pure computations live in [`aggregate`], [`activity`] and
//! [`collections`] and work on borrowed snapshots of records. [`Engine`]
//! owns the database connection, appends and deletes records, and builds
//! every report from a fresh snapshot.

pub use activity::{ActivityEntry, DEFAULT_ACTIVITY_LIMIT, Direction};
pub use aggregate::{
    Audited, Breakdown, Contributor, DEFAULT_TOP_CONTRIBUTORS, ExpenseKey, GroupTotal, IncomeKey,
    Summary,
};
pub use collections::{
    CollectionDetail, CollectionSelector, CollectionsOverview, EXTERNAL_SPONSORS_LABEL,
};
pub use error::EngineError;
pub use expense::{DEFAULT_BANK_NAME, ExpenseRecord, NewExpense};
pub use income::{ContributionShape, DEFAULT_PAYMENT_METHOD, IncomeRecord, NewIncome, SourceType};
pub use money::MoneyCents;
pub use ops::{
    Dashboard, Engine, EngineBuilder, ExpenseReport, IncomeReport, StatsReport, StatsSummary,
};
pub use options::LedgerOptions;
pub use record::{LedgerEntry, LedgerRecord, RecordKind};

pub mod activity;
pub mod aggregate;
pub mod collections;
mod error;
mod expense;
mod income;
mod money;
pub mod normalize;
mod ops;
mod options;
mod record;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
