use chrono::Utc;
use sea_orm::{QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{Audited, EngineError, ExpenseRecord, NewExpense, ResultEngine, expense};

use super::Engine;

impl Engine {
    /// Validate and append a new expense record, returning its id.
    pub async fn add_expense(&self, new_expense: NewExpense) -> ResultEngine<Uuid> {
        let record = new_expense.into_record(Utc::now())?;
        let model: expense::ActiveModel = (&record).into();
        model.insert(&self.database).await?;

        tracing::info!(
            "expense {} recorded: {} {} paid to {}",
            record.id,
            record.category,
            record.amount.unwrap_or_default(),
            record.paid_to
        );
        Ok(record.id)
    }

    /// Remove an expense record.
    pub async fn delete_expense(&self, expense_id: Uuid) -> ResultEngine<()> {
        let result = expense::Entity::delete_by_id(expense_id.to_string())
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(format!("expense {expense_id}")));
        }

        tracing::info!("expense {expense_id} deleted");
        Ok(())
    }

    /// Every expense record, in the order they were added.
    ///
    /// Stored rows that no longer decode are skipped and logged.
    pub async fn fetch_all_expense(&self) -> ResultEngine<Vec<ExpenseRecord>> {
        Ok(self.expense_snapshot().await?.value)
    }

    /// Full scan plus the ids of rows skipped because they failed to decode.
    ///
    /// A row whose id itself is unreadable is only logged.
    pub(crate) async fn expense_snapshot(&self) -> ResultEngine<Audited<Vec<ExpenseRecord>>> {
        let models = expense::Entity::find()
            .order_by_asc(expense::Column::CreatedAt)
            .order_by_asc(expense::Column::Id)
            .all(&self.database)
            .await?;

        let mut snapshot = Audited::clean(Vec::with_capacity(models.len()));
        for model in models {
            let raw_id = model.id.clone();
            match ExpenseRecord::try_from(model) {
                Ok(record) => snapshot.value.push(record),
                Err(err) => {
                    tracing::warn!("skipping stored expense {raw_id}: {err}");
                    if let Ok(id) = Uuid::parse_str(&raw_id) {
                        snapshot.excluded.push(id);
                    }
                }
            }
        }
        Ok(snapshot)
    }
}
