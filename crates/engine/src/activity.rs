//! The merged "recent activity" feed over incomes and expenses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ExpenseRecord, IncomeRecord, LedgerRecord, MoneyCents, RecordKind};

pub const DEFAULT_ACTIVITY_LIMIT: usize = 10;

/// Whether money came into the fund or went out of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "+")]
    In,
    #[serde(rename = "-")]
    Out,
}

impl Direction {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::In => "+",
            Self::Out => "-",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: Uuid,
    pub kind: RecordKind,
    /// Income name, or expense category.
    pub display_name: String,
    pub amount: Option<MoneyCents>,
    pub direction: Direction,
    pub date: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    /// Income source type, or expense payment method.
    pub kind_label: String,
}

/// Sort key for "newest first" listings: the transaction date, or the
/// creation time when there is none, then the creation time.
///
/// `None` orders before any timestamp, so only a record with neither ends up
/// at the old end.
pub(crate) fn recency_key(
    date: Option<DateTime<Utc>>,
    created_at: Option<DateTime<Utc>>,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    (date.or(created_at), created_at)
}

impl ActivityEntry {
    fn effective_date(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        recency_key(self.date, self.created_at)
    }
}

impl From<&IncomeRecord> for ActivityEntry {
    fn from(record: &IncomeRecord) -> Self {
        Self {
            id: record.id,
            kind: RecordKind::Income,
            display_name: record.name.clone(),
            amount: record.amount,
            direction: Direction::In,
            date: record.date,
            created_at: record.created_at,
            kind_label: record.source_type.to_string(),
        }
    }
}

impl From<&ExpenseRecord> for ActivityEntry {
    fn from(record: &ExpenseRecord) -> Self {
        Self {
            id: record.id,
            kind: RecordKind::Expense,
            display_name: record.category.clone(),
            amount: record.amount,
            direction: Direction::Out,
            date: record.date,
            created_at: record.created_at,
            kind_label: record.payment_method.clone(),
        }
    }
}

impl From<&LedgerRecord> for ActivityEntry {
    fn from(record: &LedgerRecord) -> Self {
        match record {
            LedgerRecord::Income(income) => income.into(),
            LedgerRecord::Expense(expense) => expense.into(),
        }
    }
}

fn newest_first(mut entries: Vec<ActivityEntry>, limit: usize) -> Vec<ActivityEntry> {
    entries.sort_by(|a, b| b.effective_date().cmp(&a.effective_date()));
    entries.truncate(limit);
    entries
}

/// The `limit` most recent incomes and expenses, newest first.
///
/// Entries with equal dates keep their input order, incomes before expenses.
///
/// ```rust
/// use engine::activity::merge_activity;
///
/// assert!(merge_activity(&[], &[], 10).is_empty());
/// ```
pub fn merge_activity(
    incomes: &[IncomeRecord],
    expenses: &[ExpenseRecord],
    limit: usize,
) -> Vec<ActivityEntry> {
    let entries = incomes
        .iter()
        .map(ActivityEntry::from)
        .chain(expenses.iter().map(ActivityEntry::from))
        .collect();
    newest_first(entries, limit)
}

/// Same as [`merge_activity`] over an already mixed sequence.
pub fn merge_records(records: &[LedgerRecord], limit: usize) -> Vec<ActivityEntry> {
    newest_first(records.iter().map(ActivityEntry::from).collect(), limit)
}

/// The `limit` incomes most recently added, by `created_at`.
pub fn recent_by_creation(incomes: &[IncomeRecord], limit: usize) -> Vec<IncomeRecord> {
    let mut recent: Vec<&IncomeRecord> = incomes.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.into_iter().take(limit).cloned().collect()
}
