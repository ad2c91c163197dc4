//! Initial schema migration.
//!
//! Creates the two ledger tables:
//!
//! - `incomes`: contributions (batch collections, external sponsors,
//!   registrations)
//! - `expenses`: outgoing payments
//!
//! Amounts are stored as integer minor units (`amount_minor`). The column is
//! nullable so that a damaged row can still be read and reported instead of
//! breaking the whole scan.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Incomes {
    Table,
    Id,
    SourceType,
    Name,
    AmountMinor,
    PaymentMethod,
    ReceivedBy,
    ReceiptNo,
    CurrentResidence,
    BatchName,
    Reference,
    RegSource,
    IsCollective,
    Date,
    CreatedAt,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    AmountMinor,
    Category,
    Description,
    PaidBy,
    PaidTo,
    PaymentMethod,
    BankName,
    Notes,
    MemoLink,
    Date,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Incomes
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Incomes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Incomes::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Incomes::SourceType).string().not_null())
                    .col(ColumnDef::new(Incomes::Name).string().not_null())
                    .col(ColumnDef::new(Incomes::AmountMinor).big_integer())
                    .col(
                        ColumnDef::new(Incomes::PaymentMethod)
                            .string()
                            .not_null()
                            .default("Cash"),
                    )
                    .col(ColumnDef::new(Incomes::ReceivedBy).string())
                    .col(ColumnDef::new(Incomes::ReceiptNo).string())
                    .col(ColumnDef::new(Incomes::CurrentResidence).string())
                    .col(ColumnDef::new(Incomes::BatchName).string())
                    .col(ColumnDef::new(Incomes::Reference).string())
                    .col(ColumnDef::new(Incomes::RegSource).string())
                    .col(
                        ColumnDef::new(Incomes::IsCollective)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Incomes::Date).timestamp_with_time_zone())
                    .col(ColumnDef::new(Incomes::CreatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-incomes-created_at")
                    .table(Incomes::Table)
                    .col(Incomes::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-incomes-batch_name")
                    .table(Incomes::Table)
                    .col(Incomes::BatchName)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::AmountMinor).big_integer())
                    .col(ColumnDef::new(Expenses::Category).string().not_null())
                    .col(ColumnDef::new(Expenses::Description).string().not_null())
                    .col(ColumnDef::new(Expenses::PaidBy).string().not_null())
                    .col(ColumnDef::new(Expenses::PaidTo).string().not_null())
                    .col(
                        ColumnDef::new(Expenses::PaymentMethod)
                            .string()
                            .not_null()
                            .default("Cash"),
                    )
                    .col(
                        ColumnDef::new(Expenses::BankName)
                            .string()
                            .not_null()
                            .default("N/A"),
                    )
                    .col(
                        ColumnDef::new(Expenses::Notes)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Expenses::MemoLink).string())
                    .col(ColumnDef::new(Expenses::Date).timestamp_with_time_zone())
                    .col(ColumnDef::new(Expenses::CreatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-created_at")
                    .table(Expenses::Table)
                    .col(Expenses::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Incomes::Table).to_owned())
            .await?;
        Ok(())
    }
}
