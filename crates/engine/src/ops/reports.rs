//! Reports assembled from a fresh snapshot of the ledger.
//!
//! Each report has a pure `compute` over record slices; the `Engine` methods
//! fetch the snapshot and call it. Nothing is cached between calls.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    ActivityEntry, Audited, Breakdown, CollectionDetail, CollectionSelector, CollectionsOverview,
    Contributor, DEFAULT_ACTIVITY_LIMIT, DEFAULT_TOP_CONTRIBUTORS, ExpenseKey, ExpenseRecord,
    GroupTotal, IncomeKey, IncomeRecord, MoneyCents, ResultEngine, Summary,
    activity::{merge_activity, recency_key, recent_by_creation},
    aggregate::{ExclusionLog, breakdown, ranked_groups, summary, top_contributors, total},
    collections::{batch_key, collection_detail, collections_overview},
};

use super::Engine;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total: MoneyCents,
    pub batch: MoneyCents,
    pub external: MoneyCents,
}

/// Headline figures of the fund.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    /// Batch collections ranked by total.
    pub batch_stats: Vec<GroupTotal>,
    /// Incomes ranked by the account that received them.
    pub account_stats: Vec<GroupTotal>,
    pub top_contributors: Vec<Contributor>,
    /// Most recently added incomes.
    pub recent_activity: Vec<IncomeRecord>,
    pub summary: StatsSummary,
    pub excluded: Vec<Uuid>,
}

impl StatsReport {
    pub fn compute(incomes: &[IncomeRecord]) -> Self {
        let mut log = ExclusionLog::default();
        let batch_stats = ranked_groups(incomes, batch_key).into_value(&mut log);
        let account_stats =
            ranked_groups(incomes, |r| IncomeKey::ReceivedBy.extract(r)).into_value(&mut log);
        let top_contributors =
            top_contributors(incomes, DEFAULT_TOP_CONTRIBUTORS).into_value(&mut log);
        let parts = breakdown(incomes).into_value(&mut log);

        Self {
            batch_stats,
            account_stats,
            top_contributors,
            recent_activity: recent_by_creation(incomes, DEFAULT_ACTIVITY_LIMIT),
            summary: StatsSummary {
                total: parts.grand_total,
                batch: parts.batch,
                external: parts.external,
            },
            excluded: log.into_ids(),
        }
    }
}

/// Every income plus the totals shown next to the income list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeReport {
    /// Newest transaction date first.
    pub incomes: Vec<IncomeRecord>,
    pub batch_totals: Vec<GroupTotal>,
    pub payment_method_totals: Vec<GroupTotal>,
    pub top_contributors: Vec<Contributor>,
    pub breakdown: Breakdown,
    pub excluded: Vec<Uuid>,
}

impl IncomeReport {
    pub fn compute(incomes: &[IncomeRecord]) -> Self {
        let mut log = ExclusionLog::default();
        let batch_totals = ranked_groups(incomes, batch_key).into_value(&mut log);
        let payment_method_totals =
            ranked_groups(incomes, |r| IncomeKey::PaymentMethod.extract(r)).into_value(&mut log);
        let top_contributors =
            top_contributors(incomes, DEFAULT_TOP_CONTRIBUTORS).into_value(&mut log);
        let breakdown = breakdown(incomes).into_value(&mut log);

        let mut sorted = incomes.to_vec();
        sorted.sort_by(|a, b| {
            recency_key(b.date, b.created_at).cmp(&recency_key(a.date, a.created_at))
        });

        Self {
            incomes: sorted,
            batch_totals,
            payment_method_totals,
            top_contributors,
            breakdown,
            excluded: log.into_ids(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseReport {
    /// Newest transaction date first.
    pub expenses: Vec<ExpenseRecord>,
    pub total: MoneyCents,
    pub category_totals: Vec<GroupTotal>,
    pub excluded: Vec<Uuid>,
}

impl ExpenseReport {
    pub fn compute(expenses: &[ExpenseRecord]) -> Self {
        let mut log = ExclusionLog::default();
        let total = total(expenses).into_value(&mut log);
        let category_totals =
            ranked_groups(expenses, |r| ExpenseKey::Category.extract(r)).into_value(&mut log);

        let mut sorted = expenses.to_vec();
        sorted.sort_by(|a, b| {
            recency_key(b.date, b.created_at).cmp(&recency_key(a.date, a.created_at))
        });

        Self {
            expenses: sorted,
            total,
            category_totals,
            excluded: log.into_ids(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub summary: Summary,
    pub activity: Vec<ActivityEntry>,
    pub top_contributors: Vec<Contributor>,
    pub excluded: Vec<Uuid>,
}

impl Dashboard {
    pub fn compute(incomes: &[IncomeRecord], expenses: &[ExpenseRecord], limit: usize) -> Self {
        let mut log = ExclusionLog::default();
        let summary = summary(incomes, expenses).into_value(&mut log);
        let top_contributors =
            top_contributors(incomes, DEFAULT_TOP_CONTRIBUTORS).into_value(&mut log);

        Self {
            summary,
            activity: merge_activity(incomes, expenses, limit),
            top_contributors,
            excluded: log.into_ids(),
        }
    }
}

/// `skipped` rows first, then the computation's own exclusions.
fn with_skipped(skipped: Vec<Uuid>, excluded: Vec<Uuid>) -> Vec<Uuid> {
    let mut log = ExclusionLog::default();
    log.extend(skipped);
    log.extend(excluded);
    log.into_ids()
}

impl Engine {
    pub async fn stats(&self) -> ResultEngine<StatsReport> {
        let incomes = self.income_snapshot().await?;
        let mut report = StatsReport::compute(&incomes.value);
        report.excluded = with_skipped(incomes.excluded, report.excluded);
        Ok(report)
    }

    /// Every income, largest amount first; records without an amount last.
    pub async fn incomes_by_amount(&self) -> ResultEngine<Vec<IncomeRecord>> {
        let mut incomes = self.fetch_all_income().await?;
        incomes.sort_by(|a, b| b.amount.cmp(&a.amount));
        Ok(incomes)
    }

    pub async fn income_report(&self) -> ResultEngine<IncomeReport> {
        let incomes = self.income_snapshot().await?;
        let mut report = IncomeReport::compute(&incomes.value);
        report.excluded = with_skipped(incomes.excluded, report.excluded);
        Ok(report)
    }

    pub async fn expense_report(&self) -> ResultEngine<ExpenseReport> {
        let expenses = self.expense_snapshot().await?;
        let mut report = ExpenseReport::compute(&expenses.value);
        report.excluded = with_skipped(expenses.excluded, report.excluded);
        Ok(report)
    }

    /// Fund summary plus the `limit` most recent entries of either kind.
    pub async fn dashboard(&self, limit: usize) -> ResultEngine<Dashboard> {
        let incomes = self.income_snapshot().await?;
        let expenses = self.expense_snapshot().await?;
        tracing::debug!(
            "dashboard over {} incomes and {} expenses",
            incomes.value.len(),
            expenses.value.len()
        );

        let mut dashboard = Dashboard::compute(&incomes.value, &expenses.value, limit);
        let mut skipped = incomes.excluded;
        skipped.extend(expenses.excluded);
        dashboard.excluded = with_skipped(skipped, dashboard.excluded);
        Ok(dashboard)
    }

    pub async fn collections(&self) -> ResultEngine<Audited<CollectionsOverview>> {
        let incomes = self.income_snapshot().await?;
        let mut overview = collections_overview(&incomes.value);
        overview.excluded = with_skipped(incomes.excluded, overview.excluded);
        Ok(overview)
    }

    /// Records of one batch, or of every external sponsor when `label` is
    /// "External Sponsors".
    pub async fn collection_detail(&self, label: &str) -> ResultEngine<Audited<CollectionDetail>> {
        let incomes = self.income_snapshot().await?;
        let mut detail = collection_detail(&incomes.value, &CollectionSelector::parse(label));
        detail.excluded = with_skipped(incomes.excluded, detail.excluded);
        Ok(detail)
    }
}
