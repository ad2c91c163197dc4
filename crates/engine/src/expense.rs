//! Expense records.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, MoneyCents, ResultEngine,
    income::DEFAULT_PAYMENT_METHOD,
    util::{
        ensure_positive_amount, normalize_optional_text, normalize_required_text, parse_uuid,
        stored_amount,
    },
};

pub const DEFAULT_BANK_NAME: &str = "N/A";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: Uuid,
    /// `None` when the stored amount is missing or malformed.
    pub amount: Option<MoneyCents>,
    pub category: String,
    pub description: String,
    pub paid_by: String,
    pub paid_to: String,
    pub payment_method: String,
    pub bank_name: String,
    pub notes: String,
    pub memo_link: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Input for a new expense record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpense {
    pub amount: MoneyCents,
    pub category: String,
    pub description: String,
    pub paid_by: String,
    pub paid_to: String,
    pub payment_method: Option<String>,
    pub bank_name: Option<String>,
    pub notes: Option<String>,
    pub memo_link: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl NewExpense {
    pub fn new(
        category: &str,
        description: &str,
        paid_by: &str,
        paid_to: &str,
        amount: MoneyCents,
    ) -> Self {
        Self {
            amount,
            category: category.to_string(),
            description: description.to_string(),
            paid_by: paid_by.to_string(),
            paid_to: paid_to.to_string(),
            payment_method: None,
            bank_name: None,
            notes: None,
            memo_link: None,
            date: None,
        }
    }

    /// Validate the input and build the immutable record.
    pub fn into_record(self, now: DateTime<Utc>) -> ResultEngine<ExpenseRecord> {
        Ok(ExpenseRecord {
            id: Uuid::new_v4(),
            amount: Some(ensure_positive_amount(self.amount)?),
            category: normalize_required_text(&self.category, "category")?,
            description: normalize_required_text(&self.description, "description")?,
            paid_by: normalize_required_text(&self.paid_by, "paid_by")?,
            paid_to: normalize_required_text(&self.paid_to, "paid_to")?,
            payment_method: normalize_optional_text(self.payment_method.as_deref())
                .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
            bank_name: normalize_optional_text(self.bank_name.as_deref())
                .unwrap_or_else(|| DEFAULT_BANK_NAME.to_string()),
            notes: normalize_optional_text(self.notes.as_deref()).unwrap_or_default(),
            memo_link: normalize_optional_text(self.memo_link.as_deref()),
            date: Some(self.date.unwrap_or(now)),
            created_at: Some(now),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub amount_minor: Option<i64>,
    pub category: String,
    pub description: String,
    pub paid_by: String,
    pub paid_to: String,
    pub payment_method: String,
    pub bank_name: String,
    pub notes: String,
    pub memo_link: Option<String>,
    pub date: Option<DateTimeUtc>,
    pub created_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&ExpenseRecord> for ActiveModel {
    fn from(record: &ExpenseRecord) -> Self {
        Self {
            id: ActiveValue::Set(record.id.to_string()),
            amount_minor: ActiveValue::Set(record.amount.map(MoneyCents::cents)),
            category: ActiveValue::Set(record.category.clone()),
            description: ActiveValue::Set(record.description.clone()),
            paid_by: ActiveValue::Set(record.paid_by.clone()),
            paid_to: ActiveValue::Set(record.paid_to.clone()),
            payment_method: ActiveValue::Set(record.payment_method.clone()),
            bank_name: ActiveValue::Set(record.bank_name.clone()),
            notes: ActiveValue::Set(record.notes.clone()),
            memo_link: ActiveValue::Set(record.memo_link.clone()),
            date: ActiveValue::Set(record.date),
            created_at: ActiveValue::Set(record.created_at),
        }
    }
}

impl TryFrom<Model> for ExpenseRecord {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "expense")?,
            amount: stored_amount(model.amount_minor),
            category: model.category,
            description: model.description,
            paid_by: model.paid_by,
            paid_to: model.paid_to,
            payment_method: model.payment_method,
            bank_name: model.bank_name,
            notes: model.notes,
            memo_link: model.memo_link,
            date: model.date,
            created_at: model.created_at,
        })
    }
}
