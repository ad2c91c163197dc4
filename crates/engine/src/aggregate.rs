//! Grouped totals, rankings and summaries over a snapshot of records.
//!
//! Every function here is a pure computation over borrowed records. A record
//! whose amount is missing contributes zero and its id is reported in
//! [`Audited::excluded`], so one damaged row never hides the rest of the
//! ledger and never goes unnoticed either.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    ExpenseRecord, IncomeRecord, LedgerEntry, MoneyCents, SourceType, normalize::tie_break,
};

/// How many contributors the stats views rank.
pub const DEFAULT_TOP_CONTRIBUTORS: usize = 5;

/// A computed value plus the records left out of it.
///
/// `excluded` lists, in first-seen order and without duplicates, the ids of
/// records that had no usable amount: missing, malformed, or too large to add
/// to a total. They counted as zero and were kept out of every ranking.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audited<T> {
    pub value: T,
    pub excluded: Vec<Uuid>,
}

impl<T> Audited<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            excluded: Vec::new(),
        }
    }

    /// Returns `true` if no record was excluded.
    pub fn is_clean(&self) -> bool {
        self.excluded.is_empty()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Audited<U> {
        Audited {
            value: f(self.value),
            excluded: self.excluded,
        }
    }

    /// Splits into the value, appending the exclusions to `log`.
    pub fn into_value(self, log: &mut ExclusionLog) -> T {
        log.extend(self.excluded);
        self.value
    }
}

/// Collects excluded ids across several computations without duplicates.
#[derive(Debug, Default)]
pub struct ExclusionLog {
    seen: HashSet<Uuid>,
    ids: Vec<Uuid>,
}

impl ExclusionLog {
    pub fn extend(&mut self, ids: impl IntoIterator<Item = Uuid>) {
        for id in ids {
            if self.seen.insert(id) {
                self.ids.push(id);
            }
        }
    }

    pub fn into_ids(self) -> Vec<Uuid> {
        self.ids
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTotal {
    pub key: String,
    pub total: MoneyCents,
}

/// Ranked projection of a single income record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub id: Uuid,
    pub name: String,
    pub amount: MoneyCents,
    pub source_type: SourceType,
    pub batch_name: Option<String>,
}

/// Income totals partitioned by source type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub batch: MoneyCents,
    pub external: MoneyCents,
    pub registration: MoneyCents,
    pub grand_total: MoneyCents,
}

impl Breakdown {
    pub fn for_source(&self, source_type: SourceType) -> MoneyCents {
        match source_type {
            SourceType::Batch => self.batch,
            SourceType::External => self.external,
            SourceType::Registration => self.registration,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_income: MoneyCents,
    pub total_expense: MoneyCents,
    /// `total_income - total_expense`; negative when the fund is overspent.
    pub net_balance: MoneyCents,
}

/// Grouping attributes of income records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeKey {
    BatchName,
    PaymentMethod,
    ReceivedBy,
}

impl IncomeKey {
    pub fn extract(self, record: &IncomeRecord) -> Option<&str> {
        match self {
            Self::BatchName => record.batch_name.as_deref(),
            Self::PaymentMethod => Some(record.payment_method.as_str()),
            Self::ReceivedBy => record.received_by.as_deref(),
        }
    }
}

/// Grouping attributes of expense records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseKey {
    Category,
    PaymentMethod,
    PaidBy,
}

impl ExpenseKey {
    pub fn extract(self, record: &ExpenseRecord) -> Option<&str> {
        match self {
            Self::Category => Some(record.category.as_str()),
            Self::PaymentMethod => Some(record.payment_method.as_str()),
            Self::PaidBy => Some(record.paid_by.as_str()),
        }
    }
}

fn flag(id: Uuid, excluded: &mut Vec<Uuid>) {
    if !excluded.contains(&id) {
        excluded.push(id);
    }
}

/// Amount of `record`, or `None` with the id pushed to `excluded`.
fn usable_amount<R: LedgerEntry>(record: &R, excluded: &mut Vec<Uuid>) -> Option<MoneyCents> {
    let amount = record.amount();
    if amount.is_none() {
        let id = record.id();
        tracing::warn!("record {id} has no valid amount, counted as zero");
        flag(id, excluded);
    }
    amount
}

/// Adds the amount of `record` to each of `sums`.
///
/// All sums move together or none does: a record without an amount, or one
/// that would overflow any of them, adds nothing and is pushed to `excluded`.
fn add_or_flag<R: LedgerEntry>(
    record: &R,
    sums: &mut [&mut MoneyCents],
    excluded: &mut Vec<Uuid>,
) {
    let Some(amount) = usable_amount(record, excluded) else {
        return;
    };
    let updated: Option<Vec<MoneyCents>> =
        sums.iter().map(|sum| sum.checked_add(amount)).collect();
    match updated {
        Some(values) => {
            for (sum, value) in sums.iter_mut().zip(values) {
                **sum = value;
            }
        }
        None => {
            let id = record.id();
            tracing::warn!("record {id} amount {amount} overflows a total, counted as zero");
            flag(id, excluded);
        }
    }
}

/// Sum by key, keeping groups in the order their key first appears.
pub(crate) fn accumulate<R, F>(records: &[R], key_fn: F) -> Audited<Vec<GroupTotal>>
where
    R: LedgerEntry,
    F: Fn(&R) -> Option<&str>,
{
    let mut groups: Vec<GroupTotal> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut excluded = Vec::new();

    for record in records {
        let Some(key) = key_fn(record) else {
            continue;
        };
        let pos = match index.get(key) {
            Some(&pos) => pos,
            None => {
                index.insert(key.to_string(), groups.len());
                groups.push(GroupTotal {
                    key: key.to_string(),
                    total: MoneyCents::ZERO,
                });
                groups.len() - 1
            }
        };
        add_or_flag(record, &mut [&mut groups[pos].total], &mut excluded);
    }

    Audited {
        value: groups,
        excluded,
    }
}

/// Sum of every record's amount.
pub fn total<R: LedgerEntry>(records: &[R]) -> Audited<MoneyCents> {
    let mut excluded = Vec::new();
    let mut value = MoneyCents::ZERO;
    for record in records {
        add_or_flag(record, &mut [&mut value], &mut excluded);
    }
    Audited { value, excluded }
}

/// Map from each distinct key to the sum of the records holding it.
///
/// Records for which `key_fn` returns `None` are left out of this grouping
/// only. A key whose records all lack an amount still appears, with zero.
///
/// ```rust
/// use engine::{IncomeKey, aggregate::group_totals};
///
/// let totals = group_totals::<engine::IncomeRecord, _>(&[], |r| IncomeKey::BatchName.extract(r));
/// assert!(totals.value.is_empty());
/// ```
pub fn group_totals<R, F>(records: &[R], key_fn: F) -> Audited<BTreeMap<String, MoneyCents>>
where
    R: LedgerEntry,
    F: Fn(&R) -> Option<&str>,
{
    accumulate(records, key_fn).map(|groups| {
        groups
            .into_iter()
            .map(|group| (group.key, group.total))
            .collect()
    })
}

/// Group totals sorted by total, largest first.
///
/// Equal totals are ordered by the number embedded in the key (keys with a
/// number first); keys without one keep their first-seen order.
pub fn ranked_groups<R, F>(records: &[R], key_fn: F) -> Audited<Vec<GroupTotal>>
where
    R: LedgerEntry,
    F: Fn(&R) -> Option<&str>,
{
    let mut ranked = accumulate(records, key_fn);
    ranked
        .value
        .sort_by(|a, b| b.total.cmp(&a.total).then_with(|| tie_break(&a.key, &b.key)));
    ranked
}

/// The `n` largest individual contributions, largest first.
///
/// Ties keep the input order. Collective entries are skipped, records without
/// an amount are excluded and reported.
pub fn top_contributors(incomes: &[IncomeRecord], n: usize) -> Audited<Vec<Contributor>> {
    let mut excluded = Vec::new();
    let mut candidates: Vec<(&IncomeRecord, MoneyCents)> = Vec::with_capacity(incomes.len());

    for record in incomes.iter().filter(|record| !record.is_collective()) {
        match record.amount {
            Some(amount) => candidates.push((record, amount)),
            None => {
                usable_amount(record, &mut excluded);
            }
        }
    }

    // `sort_by` is stable: equal amounts stay in input order.
    candidates.sort_by(|a, b| b.1.cmp(&a.1));

    let value = candidates
        .into_iter()
        .take(n)
        .map(|(record, amount)| Contributor {
            id: record.id,
            name: record.name.clone(),
            amount,
            source_type: record.source_type,
            batch_name: record.batch_name.clone(),
        })
        .collect();

    Audited { value, excluded }
}

/// Income totals per source type; `grand_total` is the sum of all incomes.
pub fn breakdown(incomes: &[IncomeRecord]) -> Audited<Breakdown> {
    let mut excluded = Vec::new();
    let mut value = Breakdown::default();

    for record in incomes {
        let partition = match record.source_type {
            SourceType::Batch => &mut value.batch,
            SourceType::External => &mut value.external,
            SourceType::Registration => &mut value.registration,
        };
        add_or_flag(
            record,
            &mut [partition, &mut value.grand_total],
            &mut excluded,
        );
    }

    Audited { value, excluded }
}

/// Income, expense and net balance of the whole ledger.
pub fn summary(incomes: &[IncomeRecord], expenses: &[ExpenseRecord]) -> Audited<Summary> {
    let mut log = ExclusionLog::default();
    let total_income = total(incomes).into_value(&mut log);
    let total_expense = total(expenses).into_value(&mut log);

    Audited {
        value: Summary {
            total_income,
            total_expense,
            net_balance: total_income - total_expense,
        },
        excluded: log.into_ids(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{ContributionShape, NewExpense, NewIncome};

    fn batch(name: &str, batch_name: &str, units: i64) -> IncomeRecord {
        NewIncome::batch(name, batch_name, MoneyCents::from_units(units))
            .into_record(Utc::now())
            .unwrap()
    }

    fn external(name: &str, units: i64) -> IncomeRecord {
        NewIncome::external(name, MoneyCents::from_units(units))
            .into_record(Utc::now())
            .unwrap()
    }

    fn registration(units: i64) -> IncomeRecord {
        NewIncome::registration("SSL", MoneyCents::from_units(units))
            .into_record(Utc::now())
            .unwrap()
    }

    fn expense(category: &str, units: i64) -> ExpenseRecord {
        NewExpense::new(category, "misc", "Treasurer", "Vendor", MoneyCents::from_units(units))
            .into_record(Utc::now())
            .unwrap()
    }

    fn received_by(mut record: IncomeRecord, who: &str) -> IncomeRecord {
        record.received_by = Some(who.to_string());
        record
    }

    #[test]
    fn group_totals_sum_by_exact_key() {
        let records = vec![
            batch("a", "Batch 3", 500),
            batch("b", "Batch 3", 1_000),
            batch("c", "batch 3", 1),
            external("Acme", 10_000),
        ];

        let totals = group_totals(&records, |r| IncomeKey::BatchName.extract(r));
        assert!(totals.is_clean());
        assert_eq!(totals.value.len(), 2);
        assert_eq!(totals.value["Batch 3"], MoneyCents::from_units(1_500));
        assert_eq!(totals.value["batch 3"], MoneyCents::from_units(1));
    }

    #[test]
    fn absent_key_excludes_only_from_that_grouping() {
        let records = vec![
            received_by(batch("a", "Batch 1", 100), "Alumni Account"),
            batch("b", "Batch 1", 200),
        ];

        let by_receiver = group_totals(&records, |r| IncomeKey::ReceivedBy.extract(r));
        assert_eq!(by_receiver.value.len(), 1);
        assert_eq!(by_receiver.value["Alumni Account"], MoneyCents::from_units(100));
        assert!(by_receiver.is_clean());

        assert_eq!(total(&records).value, MoneyCents::from_units(300));
    }

    #[test]
    fn missing_amount_counts_as_zero_and_is_reported() {
        let mut broken = batch("broken", "Batch 4", 1);
        broken.amount = None;
        let records = vec![batch("ok", "Batch 4", 700), broken.clone()];

        let totals = group_totals(&records, |r| IncomeKey::BatchName.extract(r));
        assert_eq!(totals.value["Batch 4"], MoneyCents::from_units(700));
        assert_eq!(totals.excluded, vec![broken.id]);

        let top = top_contributors(&records, 5);
        assert_eq!(top.value.len(), 1);
        assert_eq!(top.excluded, vec![broken.id]);
    }

    #[test]
    fn overflowing_amount_is_reported_instead_of_wrapping() {
        let mut huge = batch("huge", "Batch 4", 1);
        huge.amount = Some(MoneyCents::new(i64::MAX));
        let records = vec![batch("ok", "Batch 4", 700), huge.clone(), registration(300)];

        let parts = breakdown(&records);
        assert_eq!(parts.value.batch, MoneyCents::from_units(700));
        assert_eq!(parts.value.registration, MoneyCents::from_units(300));
        assert_eq!(parts.value.grand_total, MoneyCents::from_units(1_000));
        assert_eq!(parts.excluded, vec![huge.id]);

        let sum = total(&records);
        assert_eq!(sum.value, MoneyCents::from_units(1_000));
        assert_eq!(sum.excluded, vec![huge.id]);

        let totals = group_totals(&records, |r| IncomeKey::BatchName.extract(r));
        assert_eq!(totals.value["Batch 4"], MoneyCents::from_units(700));
        assert_eq!(totals.excluded, vec![huge.id]);
    }

    #[test]
    fn grand_total_overflow_leaves_partitions_untouched() {
        let mut big_batch = batch("a", "Batch 1", 1);
        big_batch.amount = Some(MoneyCents::new(i64::MAX));
        let late = external("Acme", 1);

        let parts = breakdown(&[big_batch, late.clone()]);
        assert_eq!(parts.value.batch, MoneyCents::new(i64::MAX));
        assert_eq!(parts.value.external, MoneyCents::ZERO);
        assert_eq!(parts.value.grand_total, MoneyCents::new(i64::MAX));
        assert_eq!(parts.excluded, vec![late.id]);
    }

    #[test]
    fn group_with_only_broken_records_still_appears() {
        let mut broken = batch("broken", "Batch 9", 1);
        broken.amount = None;

        let totals = group_totals(&[broken], |r| IncomeKey::BatchName.extract(r));
        assert_eq!(totals.value["Batch 9"], MoneyCents::ZERO);
    }

    #[test]
    fn ranked_groups_sort_descending_with_natural_tie_break() {
        let records = vec![
            batch("a", "Batch 10", 300),
            batch("b", "Batch 2", 300),
            batch("c", "Batch 7", 900),
            batch("d", "Batch 1", 50),
        ];

        let ranked = ranked_groups(&records, |r| IncomeKey::BatchName.extract(r));
        let keys: Vec<&str> = ranked.value.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Batch 7", "Batch 2", "Batch 10", "Batch 1"]);

        for pair in ranked.value.windows(2) {
            assert!(pair[0].total >= pair[1].total);
        }
    }

    #[test]
    fn ranked_groups_without_numbers_keep_first_seen_order_on_ties() {
        let mut records = vec![
            batch("a", "Batch 1", 100),
            batch("b", "Batch 1", 100),
            batch("c", "Batch 1", 100),
        ];
        records[0].payment_method = "Nagad".to_string();
        records[1].payment_method = "Bkash".to_string();
        records[2].payment_method = "Bank Transfer".to_string();

        let first = ranked_groups(&records, |r| IncomeKey::PaymentMethod.extract(r));
        let keys: Vec<&str> = first.value.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Nagad", "Bkash", "Bank Transfer"]);

        let second = ranked_groups(&records, |r| IncomeKey::PaymentMethod.extract(r));
        assert_eq!(first, second);
    }

    #[test]
    fn top_contributors_keep_input_order_on_ties() {
        let records = vec![
            external("p100", 100),
            external("first500", 500),
            external("p300", 300),
            external("second500", 500),
            external("p50", 50),
        ];

        let top = top_contributors(&records, 5);
        let names: Vec<&str> = top.value.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["first500", "second500", "p300", "p100", "p50"]);

        let top_two = top_contributors(&records, 2);
        assert_eq!(top_two.value.len(), 2);
        assert_eq!(top_two.value[1].name, "second500");
    }

    #[test]
    fn top_contributors_skip_collective_entries() {
        let mut rollup = batch("Collective Total", "Batch 5", 50_000);
        rollup.shape = ContributionShape::Collective;
        let records = vec![rollup, batch("Karim", "Batch 5", 2_000)];

        let top = top_contributors(&records, DEFAULT_TOP_CONTRIBUTORS);
        assert_eq!(top.value.len(), 1);
        assert_eq!(top.value[0].name, "Karim");
        assert_eq!(top.value[0].batch_name.as_deref(), Some("Batch 5"));

        // Still part of every total.
        assert_eq!(breakdown(&records).value.batch, MoneyCents::from_units(52_000));
    }

    #[test]
    fn breakdown_partitions_reconstruct_the_whole() {
        let records = vec![
            batch("a", "Batch 1", 1_000),
            external("Acme", 5_000),
            registration(500),
            registration(500),
        ];

        let result = breakdown(&records).value;
        assert_eq!(result.batch, MoneyCents::from_units(1_000));
        assert_eq!(result.external, MoneyCents::from_units(5_000));
        assert_eq!(result.registration, MoneyCents::from_units(1_000));
        assert_eq!(result.grand_total, total(&records).value);
        assert_eq!(
            result.for_source(SourceType::Registration),
            result.registration
        );
    }

    #[test]
    fn summary_net_balance_may_be_negative() {
        let incomes = vec![external("Acme", 1_000)];
        let expenses = vec![expense("Decor", 700), expense("Concert", 800)];

        let result = summary(&incomes, &expenses).value;
        assert_eq!(result.total_income, MoneyCents::from_units(1_000));
        assert_eq!(result.total_expense, MoneyCents::from_units(1_500));
        assert_eq!(result.net_balance, MoneyCents::from_units(-500));
        assert!(result.net_balance.is_negative());
    }

    #[test]
    fn empty_input_degrades_to_zero() {
        let incomes: Vec<IncomeRecord> = Vec::new();
        let expenses: Vec<ExpenseRecord> = Vec::new();

        assert_eq!(summary(&incomes, &expenses).value, Summary::default());
        assert_eq!(breakdown(&incomes).value, Breakdown::default());
        assert!(top_contributors(&incomes, 5).value.is_empty());
        assert!(ranked_groups(&incomes, |r| IncomeKey::BatchName.extract(r))
            .value
            .is_empty());
    }

    #[test]
    fn expense_keys_group_by_category() {
        let expenses = vec![expense("Decor", 100), expense("Snacks", 40), expense("Decor", 60)];
        let ranked = ranked_groups(&expenses, |r| ExpenseKey::Category.extract(r));
        assert_eq!(
            ranked.value,
            vec![
                GroupTotal {
                    key: "Decor".to_string(),
                    total: MoneyCents::from_units(160)
                },
                GroupTotal {
                    key: "Snacks".to_string(),
                    total: MoneyCents::from_units(40)
                },
            ]
        );
    }

    #[test]
    fn exclusion_log_deduplicates() {
        let id = Uuid::new_v4();
        let mut log = ExclusionLog::default();
        log.extend([id, id]);
        log.extend([id]);
        assert_eq!(log.into_ids(), vec![id]);
    }
}
