use sea_orm::DatabaseConnection;

use crate::{LedgerOptions, ResultEngine};

mod expenses;
mod incomes;
mod reports;

pub use reports::{Dashboard, ExpenseReport, IncomeReport, StatsReport, StatsSummary};

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    options: LedgerOptions,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Choice lists offered to the forms recording new entries.
    pub fn options(&self) -> &LedgerOptions {
        &self.options
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    options: LedgerOptions,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Override the default choice lists
    pub fn options(mut self, options: LedgerOptions) -> EngineBuilder {
        self.options = options;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            options: self.options,
        })
    }
}
