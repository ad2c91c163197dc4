//! Per-batch collection totals and the detail view of a single collection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    IncomeRecord, MoneyCents, SourceType,
    aggregate::{Audited, ExclusionLog, GroupTotal, accumulate, total},
    normalize::natural_cmp,
};

/// Label of the pseudo-collection gathering every external sponsor.
pub const EXTERNAL_SPONSORS_LABEL: &str = "External Sponsors";

/// Which records a collection view shows.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionSelector {
    /// `BATCH` records whose batch name equals the label.
    Batch(String),
    /// Every `EXTERNAL` record.
    ExternalSponsors,
}

impl CollectionSelector {
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case(EXTERNAL_SPONSORS_LABEL) {
            Self::ExternalSponsors
        } else {
            Self::Batch(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Batch(label) => label,
            Self::ExternalSponsors => EXTERNAL_SPONSORS_LABEL,
        }
    }

    pub fn matches(&self, record: &IncomeRecord) -> bool {
        match self {
            Self::Batch(label) => {
                record.source_type == SourceType::Batch
                    && record.batch_name.as_deref() == Some(label.as_str())
            }
            Self::ExternalSponsors => record.source_type == SourceType::External,
        }
    }
}

impl From<&str> for CollectionSelector {
    fn from(label: &str) -> Self {
        Self::parse(label)
    }
}

impl fmt::Display for CollectionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDetail {
    pub label: String,
    /// Largest amounts first; records without an amount last.
    pub records: Vec<IncomeRecord>,
    pub count: usize,
    pub total: MoneyCents,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionsOverview {
    pub batches: Vec<GroupTotal>,
    pub external_sponsors: MoneyCents,
}

/// Batch name of a batch collection; `None` for every other source type.
pub(crate) fn batch_key(record: &IncomeRecord) -> Option<&str> {
    match record.source_type {
        SourceType::Batch => record.batch_name.as_deref(),
        SourceType::External | SourceType::Registration => None,
    }
}

/// Totals of batch collections per batch name, in natural label order.
pub fn batch_totals(incomes: &[IncomeRecord]) -> Audited<Vec<GroupTotal>> {
    let mut totals = accumulate(incomes, batch_key);
    totals.value.sort_by(|a, b| natural_cmp(&a.key, &b.key));
    totals
}

/// The records of one collection with their count and total.
///
/// An unknown batch label yields an empty detail, not an error.
pub fn collection_detail(
    incomes: &[IncomeRecord],
    selector: &CollectionSelector,
) -> Audited<CollectionDetail> {
    let mut records: Vec<IncomeRecord> = incomes
        .iter()
        .filter(|record| selector.matches(record))
        .cloned()
        .collect();
    records.sort_by(|a, b| b.amount.cmp(&a.amount));

    total(&records).map(|sum| CollectionDetail {
        label: selector.label().to_string(),
        count: records.len(),
        records,
        total: sum,
    })
}

/// Every batch total plus the external sponsors total.
pub fn collections_overview(incomes: &[IncomeRecord]) -> Audited<CollectionsOverview> {
    let mut log = ExclusionLog::default();
    let batches = batch_totals(incomes).into_value(&mut log);
    let external_sponsors = collection_detail(incomes, &CollectionSelector::ExternalSponsors)
        .into_value(&mut log)
        .total;

    Audited {
        value: CollectionsOverview {
            batches,
            external_sponsors,
        },
        excluded: log.into_ids(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::NewIncome;

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

    #[test]
    fn selector_recognizes_external_sponsors() {
        assert_eq!(
            CollectionSelector::parse("external sponsors"),
            CollectionSelector::ExternalSponsors
        );
        assert_eq!(
            CollectionSelector::from(" Batch 4 "),
            CollectionSelector::Batch("Batch 4".to_string())
        );
        assert_eq!(CollectionSelector::ExternalSponsors.to_string(), "External Sponsors");
    }

    #[test]
    fn batch_totals_follow_natural_order() {
        let incomes = vec![
            batch("a", "Batch 10", 100),
            batch("b", "Batch 2", 900),
            batch("c", "Batch 1", 50),
            external("Acme", 10_000),
        ];

        let totals = batch_totals(&incomes).value;
        let keys: Vec<&str> = totals.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Batch 1", "Batch 2", "Batch 10"]);
    }

    #[test]
    fn detail_sorts_by_amount_with_missing_last() {
        let mut broken = batch("broken", "Batch 3", 1);
        broken.amount = None;
        let incomes = vec![
            broken.clone(),
            batch("small", "Batch 3", 200),
            batch("large", "Batch 3", 800),
            batch("other", "Batch 4", 5_000),
        ];

        let detail = collection_detail(&incomes, &CollectionSelector::parse("Batch 3"));
        let names: Vec<&str> = detail.value.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["large", "small", "broken"]);
        assert_eq!(detail.value.count, 3);
        assert_eq!(detail.value.total, MoneyCents::from_units(1_000));
        assert_eq!(detail.excluded, vec![broken.id]);
    }

    #[test]
    fn external_sponsors_gather_every_external_record() {
        let incomes = vec![
            external("Acme", 1_000),
            batch("a", "Batch 1", 100),
            external("Globex", 3_000),
        ];

        let detail = collection_detail(&incomes, &CollectionSelector::ExternalSponsors).value;
        assert_eq!(detail.label, EXTERNAL_SPONSORS_LABEL);
        assert_eq!(detail.count, 2);
        assert_eq!(detail.records[0].name, "Globex");

        let overview = collections_overview(&incomes).value;
        assert_eq!(overview.external_sponsors, MoneyCents::from_units(4_000));
        assert_eq!(overview.batches.len(), 1);
    }

    #[test]
    fn unknown_batch_is_empty() {
        let detail = collection_detail(&[batch("a", "Batch 1", 100)], &"Batch 99".into()).value;
        assert_eq!(detail.count, 0);
        assert_eq!(detail.total, MoneyCents::ZERO);
        assert!(detail.records.is_empty());
    }
}
