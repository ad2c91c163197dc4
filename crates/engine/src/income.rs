//! Income records.
//!
//! An `IncomeRecord` is one contribution to the fund. Its `source_type` is
//! fixed at creation and decides which optional attributes the record keeps:
//! batch collections carry a batch name and a residence, external sponsors a
//! reference, registrations the channel they came through.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, MoneyCents, ResultEngine,
    util::{ensure_positive_amount, normalize_optional_text, parse_uuid, stored_amount},
};

pub const DEFAULT_PAYMENT_METHOD: &str = "Cash";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceType {
    Batch,
    External,
    Registration,
}

impl SourceType {
    pub const ALL: [SourceType; 3] = [Self::Batch, Self::External, Self::Registration];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Batch => "BATCH",
            Self::External => "EXTERNAL",
            Self::Registration => "REGISTRATION",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SourceType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "BATCH" => Ok(Self::Batch),
            "EXTERNAL" => Ok(Self::External),
            "REGISTRATION" => Ok(Self::Registration),
            other => Err(EngineError::InvalidRecord(format!(
                "invalid source type: {other}"
            ))),
        }
    }
}

impl FromStr for SourceType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// Whether a record is one contribution or a rollup of many.
///
/// A `Collective` entry (e.g. a batch handing over its pooled collection as
/// a single lump sum) counts toward every total but is never ranked as a
/// contributor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionShape {
    #[default]
    Individual,
    Collective,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub id: Uuid,
    pub source_type: SourceType,
    pub name: String,
    /// `None` when the stored amount is missing or malformed.
    pub amount: Option<MoneyCents>,
    pub payment_method: String,
    pub received_by: Option<String>,
    pub receipt_no: Option<String>,
    pub current_residence: Option<String>,
    pub batch_name: Option<String>,
    pub reference: Option<String>,
    pub reg_source: Option<String>,
    pub shape: ContributionShape,
    /// Logical transaction date (may be backdated).
    pub date: Option<DateTime<Utc>>,
    /// Record creation time, used for "recently added" ordering.
    pub created_at: Option<DateTime<Utc>>,
}

impl IncomeRecord {
    pub fn is_collective(&self) -> bool {
        self.shape == ContributionShape::Collective
    }
}

/// Input for a new income record.
///
/// Attributes that do not belong to `source_type` are dropped when the
/// record is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIncome {
    pub source_type: SourceType,
    pub name: Option<String>,
    pub amount: MoneyCents,
    pub payment_method: Option<String>,
    pub received_by: Option<String>,
    pub receipt_no: Option<String>,
    pub current_residence: Option<String>,
    pub batch_name: Option<String>,
    pub reference: Option<String>,
    pub reg_source: Option<String>,
    #[serde(default)]
    pub shape: ContributionShape,
    pub date: Option<DateTime<Utc>>,
}

impl NewIncome {
    pub fn new(source_type: SourceType, name: Option<&str>, amount: MoneyCents) -> Self {
        Self {
            source_type,
            name: name.map(ToString::to_string),
            amount,
            payment_method: None,
            received_by: None,
            receipt_no: None,
            current_residence: None,
            batch_name: None,
            reference: None,
            reg_source: None,
            shape: ContributionShape::Individual,
            date: None,
        }
    }

    /// A contribution collected through a batch.
    pub fn batch(name: &str, batch_name: &str, amount: MoneyCents) -> Self {
        let mut income = Self::new(SourceType::Batch, Some(name), amount);
        income.batch_name = Some(batch_name.to_string());
        income
    }

    /// A contribution from an external sponsor.
    pub fn external(name: &str, amount: MoneyCents) -> Self {
        Self::new(SourceType::External, Some(name), amount)
    }

    /// A registration fee received through `reg_source`.
    pub fn registration(reg_source: &str, amount: MoneyCents) -> Self {
        let mut income = Self::new(SourceType::Registration, None, amount);
        income.reg_source = Some(reg_source.to_string());
        income
    }

    /// Validate the input and build the immutable record.
    ///
    /// `now` becomes `created_at`, and `date` when none was given.
    pub fn into_record(self, now: DateTime<Utc>) -> ResultEngine<IncomeRecord> {
        let amount = ensure_positive_amount(self.amount)?;
        let source_type = self.source_type;

        let reg_source = match source_type {
            SourceType::Registration => normalize_optional_text(self.reg_source.as_deref()),
            _ => None,
        };
        let name = match (source_type, normalize_optional_text(self.name.as_deref())) {
            (_, Some(name)) => name,
            (SourceType::Registration, None) => {
                format!("Reg via {}", reg_source.as_deref().unwrap_or("Unknown"))
            }
            (_, None) => {
                return Err(EngineError::InvalidRecord(
                    "name must not be empty".to_string(),
                ));
            }
        };

        let (batch_name, current_residence) = match source_type {
            SourceType::Batch => {
                let batch = normalize_optional_text(self.batch_name.as_deref()).ok_or_else(
                    || {
                        EngineError::InvalidRecord(
                            "batch name is required for batch collections".to_string(),
                        )
                    },
                )?;
                (
                    Some(batch),
                    normalize_optional_text(self.current_residence.as_deref()),
                )
            }
            _ => (None, None),
        };
        let reference = match source_type {
            SourceType::External => normalize_optional_text(self.reference.as_deref()),
            _ => None,
        };

        Ok(IncomeRecord {
            id: Uuid::new_v4(),
            source_type,
            name,
            amount: Some(amount),
            payment_method: normalize_optional_text(self.payment_method.as_deref())
                .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
            received_by: normalize_optional_text(self.received_by.as_deref()),
            receipt_no: normalize_optional_text(self.receipt_no.as_deref()),
            current_residence,
            batch_name,
            reference,
            reg_source,
            shape: self.shape,
            date: Some(self.date.unwrap_or(now)),
            created_at: Some(now),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub source_type: String,
    pub name: String,
    pub amount_minor: Option<i64>,
    pub payment_method: String,
    pub received_by: Option<String>,
    pub receipt_no: Option<String>,
    pub current_residence: Option<String>,
    pub batch_name: Option<String>,
    pub reference: Option<String>,
    pub reg_source: Option<String>,
    pub is_collective: bool,
    pub date: Option<DateTimeUtc>,
    pub created_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&IncomeRecord> for ActiveModel {
    fn from(record: &IncomeRecord) -> Self {
        Self {
            id: ActiveValue::Set(record.id.to_string()),
            source_type: ActiveValue::Set(record.source_type.as_str().to_string()),
            name: ActiveValue::Set(record.name.clone()),
            amount_minor: ActiveValue::Set(record.amount.map(MoneyCents::cents)),
            payment_method: ActiveValue::Set(record.payment_method.clone()),
            received_by: ActiveValue::Set(record.received_by.clone()),
            receipt_no: ActiveValue::Set(record.receipt_no.clone()),
            current_residence: ActiveValue::Set(record.current_residence.clone()),
            batch_name: ActiveValue::Set(record.batch_name.clone()),
            reference: ActiveValue::Set(record.reference.clone()),
            reg_source: ActiveValue::Set(record.reg_source.clone()),
            is_collective: ActiveValue::Set(record.is_collective()),
            date: ActiveValue::Set(record.date),
            created_at: ActiveValue::Set(record.created_at),
        }
    }
}

impl TryFrom<Model> for IncomeRecord {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "income")?,
            source_type: SourceType::try_from(model.source_type.as_str())?,
            name: model.name,
            amount: stored_amount(model.amount_minor),
            payment_method: model.payment_method,
            received_by: model.received_by,
            receipt_no: model.receipt_no,
            current_residence: model.current_residence,
            batch_name: model.batch_name,
            reference: model.reference,
            reg_source: model.reg_source,
            shape: if model.is_collective {
                ContributionShape::Collective
            } else {
                ContributionShape::Individual
            },
            date: model.date,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-02-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn batch_income_requires_batch_name() {
        let mut income = NewIncome::batch("Rahim", "  ", MoneyCents::from_units(500));
        assert_eq!(
            income.clone().into_record(now()),
            Err(EngineError::InvalidRecord(
                "batch name is required for batch collections".to_string()
            ))
        );

        income.batch_name = Some("Batch 3".to_string());
        let record = income.into_record(now()).unwrap();
        assert_eq!(record.batch_name.as_deref(), Some("Batch 3"));
        assert_eq!(record.payment_method, DEFAULT_PAYMENT_METHOD);
        assert_eq!(record.date, Some(now()));
        assert_eq!(record.created_at, Some(now()));
    }

    #[test]
    fn foreign_attributes_are_dropped() {
        let mut income = NewIncome::external("Acme Ltd", MoneyCents::from_units(10_000));
        income.batch_name = Some("Batch 7".to_string());
        income.current_residence = Some("Dhaka".to_string());
        income.reg_source = Some("SSL".to_string());
        income.reference = Some("Chairman".to_string());

        let record = income.into_record(now()).unwrap();
        assert_eq!(record.batch_name, None);
        assert_eq!(record.current_residence, None);
        assert_eq!(record.reg_source, None);
        assert_eq!(record.reference.as_deref(), Some("Chairman"));
    }

    #[test]
    fn registration_name_is_derived_from_channel() {
        let record = NewIncome::registration("SSL", MoneyCents::from_units(1_000))
            .into_record(now())
            .unwrap();
        assert_eq!(record.name, "Reg via SSL");
        assert_eq!(record.reg_source.as_deref(), Some("SSL"));
    }

    #[test]
    fn non_positive_amount_is_rejected() {
        let income = NewIncome::external("Acme Ltd", MoneyCents::ZERO);
        assert!(matches!(
            income.into_record(now()),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn missing_name_is_rejected_outside_registrations() {
        let income = NewIncome::new(SourceType::External, Some(" "), MoneyCents::new(100));
        assert_eq!(
            income.into_record(now()),
            Err(EngineError::InvalidRecord("name must not be empty".to_string()))
        );
    }

    #[test]
    fn source_type_parses_case_insensitively() {
        assert_eq!("batch".parse::<SourceType>().unwrap(), SourceType::Batch);
        assert_eq!(
            SourceType::try_from(" Registration ").unwrap(),
            SourceType::Registration
        );
        assert!("sponsor".parse::<SourceType>().is_err());
    }

    #[test]
    fn model_with_negative_amount_reads_as_missing() {
        let record = NewIncome::batch("Rahim", "Batch 3", MoneyCents::from_units(500))
            .into_record(now())
            .unwrap();
        let model = Model {
            id: record.id.to_string(),
            source_type: "BATCH".to_string(),
            name: record.name.clone(),
            amount_minor: Some(-5),
            payment_method: record.payment_method.clone(),
            received_by: None,
            receipt_no: None,
            current_residence: None,
            batch_name: record.batch_name.clone(),
            reference: None,
            reg_source: None,
            is_collective: true,
            date: record.date,
            created_at: record.created_at,
        };

        let read = IncomeRecord::try_from(model).unwrap();
        assert_eq!(read.amount, None);
        assert!(read.is_collective());
    }
}
