use std::error::Error;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use engine::{
    ContributionShape, DEFAULT_ACTIVITY_LIMIT, Engine, MoneyCents, NewExpense, NewIncome,
    SourceType,
};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use serde::Serialize;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "eventfund_admin")]
#[command(about = "Admin utilities for the event fund ledger (record entries, print reports)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./eventfund.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Income(Income),
    Expense(Expense),
    Report(Report),
}

#[derive(Args, Debug)]
struct Income {
    #[command(subcommand)]
    command: IncomeCommand,
}

#[derive(Subcommand, Debug)]
enum IncomeCommand {
    Add(IncomeAddArgs),
    Delete { id: Uuid },
    List,
}

#[derive(Args, Debug)]
struct IncomeAddArgs {
    /// BATCH, EXTERNAL or REGISTRATION.
    #[arg(long, value_parser = parse_source_type)]
    source_type: SourceType,
    /// Optional for registrations ("Reg via <source>" is used instead).
    #[arg(long)]
    name: Option<String>,
    /// Decimal amount, e.g. `500` or `1250.50`.
    #[arg(long, value_parser = parse_amount)]
    amount: MoneyCents,
    #[arg(long)]
    payment_method: Option<String>,
    #[arg(long)]
    received_by: Option<String>,
    #[arg(long)]
    receipt_no: Option<String>,
    #[arg(long)]
    residence: Option<String>,
    #[arg(long)]
    batch: Option<String>,
    #[arg(long)]
    reference: Option<String>,
    #[arg(long)]
    reg_source: Option<String>,
    /// Record a rollup of many contributions as one entry.
    #[arg(long)]
    collective: bool,
    /// Transaction date (`YYYY-MM-DD` or RFC 3339); defaults to now.
    #[arg(long, value_parser = parse_date)]
    date: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
struct Expense {
    #[command(subcommand)]
    command: ExpenseCommand,
}

#[derive(Subcommand, Debug)]
enum ExpenseCommand {
    Add(ExpenseAddArgs),
    Delete { id: Uuid },
    List,
}

#[derive(Args, Debug)]
struct ExpenseAddArgs {
    #[arg(long)]
    category: String,
    #[arg(long)]
    description: String,
    #[arg(long)]
    paid_by: String,
    #[arg(long)]
    paid_to: String,
    #[arg(long, value_parser = parse_amount)]
    amount: MoneyCents,
    #[arg(long)]
    payment_method: Option<String>,
    #[arg(long)]
    bank_name: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    #[arg(long)]
    memo_link: Option<String>,
    #[arg(long, value_parser = parse_date)]
    date: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
struct Report {
    #[command(subcommand)]
    command: ReportCommand,
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    Stats,
    Incomes,
    Expenses,
    Dashboard {
        #[arg(long, default_value_t = DEFAULT_ACTIVITY_LIMIT)]
        limit: usize,
    },
    Collections,
    /// A batch label such as "Batch 3", or "External Sponsors".
    Collection { label: String },
    Options,
}

fn parse_source_type(raw: &str) -> Result<SourceType, String> {
    raw.parse().map_err(|err: engine::EngineError| err.to_string())
}

fn parse_amount(raw: &str) -> Result<MoneyCents, String> {
    let amount: MoneyCents = raw.parse().map_err(|err: engine::EngineError| err.to_string())?;
    if !amount.is_positive() {
        return Err("amount must be > 0".to_string());
    }
    Ok(amount)
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Ok(date.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
        .ok_or_else(|| format!("invalid date: {raw}"))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error + Send + Sync>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

impl From<IncomeAddArgs> for NewIncome {
    fn from(args: IncomeAddArgs) -> Self {
        let mut income = NewIncome::new(args.source_type, args.name.as_deref(), args.amount);
        income.payment_method = args.payment_method;
        income.received_by = args.received_by;
        income.receipt_no = args.receipt_no;
        income.current_residence = args.residence;
        income.batch_name = args.batch;
        income.reference = args.reference;
        income.reg_source = args.reg_source;
        if args.collective {
            income.shape = ContributionShape::Collective;
        }
        income.date = args.date;
        income
    }
}

impl From<ExpenseAddArgs> for NewExpense {
    fn from(args: ExpenseAddArgs) -> Self {
        let mut expense = NewExpense::new(
            &args.category,
            &args.description,
            &args.paid_by,
            &args.paid_to,
            args.amount,
        );
        expense.payment_method = args.payment_method;
        expense.bank_name = args.bank_name;
        expense.notes = args.notes;
        expense.memo_link = args.memo_link;
        expense.date = args.date;
        expense
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Income(Income { command }) => match command {
            IncomeCommand::Add(args) => {
                let id = engine.add_income(args.into()).await?;
                println!("created income: {id}");
            }
            IncomeCommand::Delete { id } => {
                engine.delete_income(id).await?;
                println!("deleted income: {id}");
            }
            IncomeCommand::List => print_json(&engine.fetch_all_income().await?)?,
        },
        Command::Expense(Expense { command }) => match command {
            ExpenseCommand::Add(args) => {
                let id = engine.add_expense(args.into()).await?;
                println!("created expense: {id}");
            }
            ExpenseCommand::Delete { id } => {
                engine.delete_expense(id).await?;
                println!("deleted expense: {id}");
            }
            ExpenseCommand::List => print_json(&engine.fetch_all_expense().await?)?,
        },
        Command::Report(Report { command }) => match command {
            ReportCommand::Stats => print_json(&engine.stats().await?)?,
            ReportCommand::Incomes => print_json(&engine.income_report().await?)?,
            ReportCommand::Expenses => print_json(&engine.expense_report().await?)?,
            ReportCommand::Dashboard { limit } => print_json(&engine.dashboard(limit).await?)?,
            ReportCommand::Collections => print_json(&engine.collections().await?)?,
            ReportCommand::Collection { label } => {
                print_json(&engine.collection_detail(&label).await?)?
            }
            ReportCommand::Options => print_json(engine.options())?,
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn amounts_must_be_positive_decimals() {
        assert_eq!(parse_amount("1250.50"), Ok(MoneyCents::new(125_050)));
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("1.999").is_err());
    }

    #[test]
    fn dates_accept_plain_days() {
        let date = parse_date("2026-02-21").unwrap();
        assert_eq!(date.to_rfc3339(), "2026-02-21T00:00:00+00:00");
        assert!(parse_date("21/02/2026").is_err());
    }

    #[test]
    fn income_add_builds_a_collective_batch_entry() {
        let cli = Cli::try_parse_from([
            "eventfund_admin",
            "income",
            "add",
            "--source-type",
            "batch",
            "--name",
            "Collective Total",
            "--amount",
            "50000",
            "--batch",
            "Batch 7",
            "--collective",
        ])
        .unwrap();

        let Command::Income(Income {
            command: IncomeCommand::Add(args),
        }) = cli.command
        else {
            panic!("expected income add");
        };
        let income = NewIncome::from(args);
        assert_eq!(income.source_type, SourceType::Batch);
        assert_eq!(income.shape, ContributionShape::Collective);
        assert_eq!(income.batch_name.as_deref(), Some("Batch 7"));
    }
}
