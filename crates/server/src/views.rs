//! Conversions between engine types and the JSON DTOs.

use api_types::{
    dashboard::{ActivityView, RecordKind as ApiKind, Summary as ApiSummary},
    expense::{ExpenseNew, ExpenseView},
    income::{IncomeNew, IncomeView, SourceType as ApiSourceType},
    stats::{Breakdown as ApiBreakdown, Contributor as ApiContributor, GroupTotal as ApiGroupTotal},
};
use chrono::{DateTime, FixedOffset, Utc};
use engine::{
    ActivityEntry, Breakdown, ContributionShape, Contributor, ExpenseRecord, GroupTotal,
    IncomeRecord, MoneyCents, NewExpense, NewIncome, RecordKind, SourceType, Summary,
};

fn to_fixed(value: Option<DateTime<Utc>>) -> Option<DateTime<FixedOffset>> {
    value.map(|dt| dt.fixed_offset())
}

fn to_utc(value: Option<DateTime<FixedOffset>>) -> Option<DateTime<Utc>> {
    value.map(|dt| dt.with_timezone(&Utc))
}

fn minor(value: Option<MoneyCents>) -> Option<i64> {
    value.map(MoneyCents::cents)
}

pub(crate) fn map_source_type(source_type: SourceType) -> ApiSourceType {
    match source_type {
        SourceType::Batch => ApiSourceType::Batch,
        SourceType::External => ApiSourceType::External,
        SourceType::Registration => ApiSourceType::Registration,
    }
}

fn map_api_source_type(source_type: ApiSourceType) -> SourceType {
    match source_type {
        ApiSourceType::Batch => SourceType::Batch,
        ApiSourceType::External => SourceType::External,
        ApiSourceType::Registration => SourceType::Registration,
    }
}

pub(crate) fn new_income(payload: IncomeNew) -> NewIncome {
    NewIncome {
        source_type: map_api_source_type(payload.source_type),
        name: payload.name,
        amount: MoneyCents::new(payload.amount_minor),
        payment_method: payload.payment_method,
        received_by: payload.received_by,
        receipt_no: payload.receipt_no,
        current_residence: payload.current_residence,
        batch_name: payload.batch_name,
        reference: payload.reference,
        reg_source: payload.reg_source,
        shape: if payload.collective {
            ContributionShape::Collective
        } else {
            ContributionShape::Individual
        },
        date: to_utc(payload.date),
    }
}

pub(crate) fn new_expense(payload: ExpenseNew) -> NewExpense {
    NewExpense {
        amount: MoneyCents::new(payload.amount_minor),
        category: payload.category,
        description: payload.description,
        paid_by: payload.paid_by,
        paid_to: payload.paid_to,
        payment_method: payload.payment_method,
        bank_name: payload.bank_name,
        notes: payload.notes,
        memo_link: payload.memo_link,
        date: to_utc(payload.date),
    }
}

pub(crate) fn income_view(record: IncomeRecord) -> IncomeView {
    IncomeView {
        id: record.id,
        source_type: map_source_type(record.source_type),
        collective: record.is_collective(),
        name: record.name,
        amount_minor: minor(record.amount),
        payment_method: record.payment_method,
        received_by: record.received_by,
        receipt_no: record.receipt_no,
        current_residence: record.current_residence,
        batch_name: record.batch_name,
        reference: record.reference,
        reg_source: record.reg_source,
        date: to_fixed(record.date),
        created_at: to_fixed(record.created_at),
    }
}

pub(crate) fn expense_view(record: ExpenseRecord) -> ExpenseView {
    ExpenseView {
        id: record.id,
        amount_minor: minor(record.amount),
        category: record.category,
        description: record.description,
        paid_by: record.paid_by,
        paid_to: record.paid_to,
        payment_method: record.payment_method,
        bank_name: record.bank_name,
        notes: record.notes,
        memo_link: record.memo_link,
        date: to_fixed(record.date),
        created_at: to_fixed(record.created_at),
    }
}

pub(crate) fn group_totals(groups: Vec<GroupTotal>) -> Vec<ApiGroupTotal> {
    groups
        .into_iter()
        .map(|group| ApiGroupTotal {
            key: group.key,
            total_minor: group.total.cents(),
        })
        .collect()
}

pub(crate) fn contributors(contributors: Vec<Contributor>) -> Vec<ApiContributor> {
    contributors
        .into_iter()
        .map(|contributor| ApiContributor {
            id: contributor.id,
            name: contributor.name,
            amount_minor: contributor.amount.cents(),
            source_type: map_source_type(contributor.source_type),
            batch_name: contributor.batch_name,
        })
        .collect()
}

pub(crate) fn breakdown(breakdown: Breakdown) -> ApiBreakdown {
    ApiBreakdown {
        batch_minor: breakdown.batch.cents(),
        external_minor: breakdown.external.cents(),
        registration_minor: breakdown.registration.cents(),
        grand_total_minor: breakdown.grand_total.cents(),
    }
}

pub(crate) fn summary(summary: Summary) -> ApiSummary {
    ApiSummary {
        total_income_minor: summary.total_income.cents(),
        total_expense_minor: summary.total_expense.cents(),
        net_balance_minor: summary.net_balance.cents(),
    }
}

pub(crate) fn activity_view(entry: ActivityEntry) -> ActivityView {
    ActivityView {
        id: entry.id,
        kind: match entry.kind {
            RecordKind::Income => ApiKind::Income,
            RecordKind::Expense => ApiKind::Expense,
        },
        direction: entry.direction.symbol().to_string(),
        display_name: entry.display_name,
        amount_minor: minor(entry.amount),
        date: to_fixed(entry.date),
        created_at: to_fixed(entry.created_at),
        kind_label: entry.kind_label,
    }
}
