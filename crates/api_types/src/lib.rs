use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response of every endpoint that appends a record.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordCreated {
    pub id: Uuid,
}

/// Ids of records left out of a computation because their amount was
/// missing or malformed.
pub type Excluded = Vec<Uuid>;

pub mod income {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum SourceType {
        Batch,
        External,
        Registration,
    }

    /// Body of `POST /incomes`.
    ///
    /// Only the attributes relevant to `source_type` are kept: `batch_name`
    /// and `current_residence` for batches, `reference` for external
    /// sponsors, `reg_source` for registrations.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeNew {
        pub source_type: SourceType,
        pub name: Option<String>,
        pub amount_minor: i64,
        pub payment_method: Option<String>,
        pub received_by: Option<String>,
        pub receipt_no: Option<String>,
        pub current_residence: Option<String>,
        pub batch_name: Option<String>,
        pub reference: Option<String>,
        pub reg_source: Option<String>,
        /// Marks a rollup of many contributions recorded as one entry.
        #[serde(default)]
        pub collective: bool,
        pub date: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeView {
        pub id: Uuid,
        pub source_type: SourceType,
        pub name: String,
        /// `None` when the stored amount is missing or malformed.
        pub amount_minor: Option<i64>,
        pub payment_method: String,
        pub received_by: Option<String>,
        pub receipt_no: Option<String>,
        pub current_residence: Option<String>,
        pub batch_name: Option<String>,
        pub reference: Option<String>,
        pub reg_source: Option<String>,
        pub collective: bool,
        pub date: Option<DateTime<FixedOffset>>,
        pub created_at: Option<DateTime<FixedOffset>>,
    }

    /// Response of `GET /incomes`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeListResponse {
        pub incomes: Vec<IncomeView>,
        pub batch_totals: Vec<crate::stats::GroupTotal>,
        pub payment_method_totals: Vec<crate::stats::GroupTotal>,
        pub top_contributors: Vec<crate::stats::Contributor>,
        pub breakdown: crate::stats::Breakdown,
        pub excluded: Excluded,
    }
}

pub mod expense {
    use super::*;

    /// Body of `POST /expenses`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub amount_minor: i64,
        pub category: String,
        pub description: String,
        pub paid_by: String,
        pub paid_to: String,
        pub payment_method: Option<String>,
        pub bank_name: Option<String>,
        pub notes: Option<String>,
        pub memo_link: Option<String>,
        pub date: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub amount_minor: Option<i64>,
        pub category: String,
        pub description: String,
        pub paid_by: String,
        pub paid_to: String,
        pub payment_method: String,
        pub bank_name: String,
        pub notes: String,
        pub memo_link: Option<String>,
        pub date: Option<DateTime<FixedOffset>>,
        pub created_at: Option<DateTime<FixedOffset>>,
    }

    /// Response of `GET /expenses`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub expenses: Vec<ExpenseView>,
        pub total_minor: i64,
        pub category_totals: Vec<crate::stats::GroupTotal>,
        pub excluded: Excluded,
    }
}

pub mod stats {
    use super::*;
    use crate::income::{IncomeView, SourceType};

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct GroupTotal {
        pub key: String,
        pub total_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Contributor {
        pub id: Uuid,
        pub name: String,
        pub amount_minor: i64,
        pub source_type: SourceType,
        pub batch_name: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct Breakdown {
        pub batch_minor: i64,
        pub external_minor: i64,
        pub registration_minor: i64,
        pub grand_total_minor: i64,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct StatsSummary {
        pub total_minor: i64,
        pub batch_minor: i64,
        pub external_minor: i64,
    }

    /// Response of `GET /stats`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatsResponse {
        pub batch_stats: Vec<GroupTotal>,
        pub account_stats: Vec<GroupTotal>,
        pub top_contributors: Vec<Contributor>,
        pub recent_activity: Vec<IncomeView>,
        pub summary: StatsSummary,
        pub excluded: Excluded,
    }
}

pub mod dashboard {
    use super::*;
    use crate::stats::Contributor;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DashboardQuery {
        pub limit: Option<usize>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum RecordKind {
        Income,
        Expense,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct Summary {
        pub total_income_minor: i64,
        pub total_expense_minor: i64,
        /// Negative when expenses exceed income.
        pub net_balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ActivityView {
        pub id: Uuid,
        pub kind: RecordKind,
        pub display_name: String,
        pub amount_minor: Option<i64>,
        /// `+` for incomes, `-` for expenses.
        pub direction: String,
        pub date: Option<DateTime<FixedOffset>>,
        pub created_at: Option<DateTime<FixedOffset>>,
        pub kind_label: String,
    }

    /// Response of `GET /dashboard`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DashboardResponse {
        pub summary: Summary,
        pub activity: Vec<ActivityView>,
        pub top_contributors: Vec<Contributor>,
        pub excluded: Excluded,
    }
}

pub mod collections {
    use super::*;
    use crate::{income::IncomeView, stats::GroupTotal};

    /// Response of `GET /collections`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CollectionsResponse {
        pub batches: Vec<GroupTotal>,
        pub external_sponsors_minor: i64,
        pub excluded: Excluded,
    }

    /// Response of `GET /collections/{label}`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CollectionDetailResponse {
        pub label: String,
        pub records: Vec<IncomeView>,
        pub count: usize,
        pub total_minor: i64,
        pub excluded: Excluded,
    }
}

pub mod options {
    use super::*;

    /// Response of `GET /options`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct OptionsResponse {
        pub batches: Vec<String>,
        pub income_payment_methods: Vec<String>,
        pub receivers: Vec<String>,
        pub registration_sources: Vec<String>,
        pub expense_categories: Vec<String>,
        pub expense_payment_methods: Vec<String>,
    }
}
