//! The tagged union over the two ledger record kinds.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ExpenseRecord, IncomeRecord, MoneyCents};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Income,
    Expense,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

/// Anything aggregation can sum: an id to report and an amount that may be
/// missing.
pub trait LedgerEntry {
    fn id(&self) -> Uuid;
    fn amount(&self) -> Option<MoneyCents>;
}

impl LedgerEntry for IncomeRecord {
    fn id(&self) -> Uuid {
        self.id
    }

    fn amount(&self) -> Option<MoneyCents> {
        self.amount
    }
}

impl LedgerEntry for ExpenseRecord {
    fn id(&self) -> Uuid {
        self.id
    }

    fn amount(&self) -> Option<MoneyCents> {
        self.amount
    }
}

/// A single ledger record of either kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerRecord {
    Income(IncomeRecord),
    Expense(ExpenseRecord),
}

impl LedgerRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Income(_) => RecordKind::Income,
            Self::Expense(_) => RecordKind::Expense,
        }
    }
}

impl LedgerEntry for LedgerRecord {
    fn id(&self) -> Uuid {
        match self {
            Self::Income(income) => income.id,
            Self::Expense(expense) => expense.id,
        }
    }

    fn amount(&self) -> Option<MoneyCents> {
        match self {
            Self::Income(income) => income.amount,
            Self::Expense(expense) => expense.amount,
        }
    }
}

impl From<IncomeRecord> for LedgerRecord {
    fn from(value: IncomeRecord) -> Self {
        Self::Income(value)
    }
}

impl From<ExpenseRecord> for LedgerRecord {
    fn from(value: ExpenseRecord) -> Self {
        Self::Expense(value)
    }
}
