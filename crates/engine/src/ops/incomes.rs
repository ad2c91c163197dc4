use chrono::Utc;
use sea_orm::{QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{Audited, EngineError, IncomeRecord, NewIncome, ResultEngine, income};

use super::Engine;

impl Engine {
    /// Validate and append a new income record, returning its id.
    pub async fn add_income(&self, new_income: NewIncome) -> ResultEngine<Uuid> {
        let record = new_income.into_record(Utc::now())?;
        let model: income::ActiveModel = (&record).into();
        model.insert(&self.database).await?;

        tracing::info!(
            "income {} recorded: {} {} from {}",
            record.id,
            record.source_type,
            record.amount.unwrap_or_default(),
            record.name
        );
        Ok(record.id)
    }

    /// Remove an income record.
    pub async fn delete_income(&self, income_id: Uuid) -> ResultEngine<()> {
        let result = income::Entity::delete_by_id(income_id.to_string())
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(format!("income {income_id}")));
        }

        tracing::info!("income {income_id} deleted");
        Ok(())
    }

    /// Every income record, in the order they were added.
    ///
    /// Stored rows that no longer decode are skipped and logged.
    pub async fn fetch_all_income(&self) -> ResultEngine<Vec<IncomeRecord>> {
        Ok(self.income_snapshot().await?.value)
    }

    /// Full scan plus the ids of rows skipped because they failed to decode.
    ///
    /// A row whose id itself is unreadable is only logged.
    pub(crate) async fn income_snapshot(&self) -> ResultEngine<Audited<Vec<IncomeRecord>>> {
        let models = income::Entity::find()
            .order_by_asc(income::Column::CreatedAt)
            .order_by_asc(income::Column::Id)
            .all(&self.database)
            .await?;

        let mut snapshot = Audited::clean(Vec::with_capacity(models.len()));
        for model in models {
            let raw_id = model.id.clone();
            match IncomeRecord::try_from(model) {
                Ok(record) => snapshot.value.push(record),
                Err(err) => {
                    tracing::warn!("skipping stored income {raw_id}: {err}");
                    if let Ok(id) = Uuid::parse_str(&raw_id) {
                        snapshot.excluded.push(id);
                    }
                }
            }
        }
        Ok(snapshot)
    }
}
