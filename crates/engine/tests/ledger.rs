use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    ContributionShape, Engine, EngineError, LedgerOptions, MoneyCents, NewExpense, NewIncome,
    SourceType,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn units(value: i64) -> MoneyCents {
    MoneyCents::from_units(value)
}

#[tokio::test]
async fn added_records_come_back_from_a_full_scan() {
    let (engine, _db) = engine_with_db().await;

    let mut batch = NewIncome::batch("Rahim", "Batch 3", units(500));
    batch.received_by = Some("Alumni Account".to_string());
    batch.reference = Some("dropped".to_string());
    let batch_id = engine.add_income(batch).await.unwrap();
    let registration_id = engine
        .add_income(NewIncome::registration("ICTAA", units(300)))
        .await
        .unwrap();

    let incomes = engine.fetch_all_income().await.unwrap();
    assert_eq!(incomes.len(), 2);

    let stored = incomes.iter().find(|r| r.id == batch_id).unwrap();
    assert_eq!(stored.source_type, SourceType::Batch);
    assert_eq!(stored.amount, Some(units(500)));
    assert_eq!(stored.batch_name.as_deref(), Some("Batch 3"));
    assert_eq!(stored.received_by.as_deref(), Some("Alumni Account"));
    assert_eq!(stored.reference, None);
    assert!(stored.created_at.is_some());

    let registration = incomes.iter().find(|r| r.id == registration_id).unwrap();
    assert_eq!(registration.name, "Reg via ICTAA");
}

#[tokio::test]
async fn deleting_a_record_updates_every_total() {
    let (engine, _db) = engine_with_db().await;

    let small = engine
        .add_income(NewIncome::batch("Rahim", "Batch 3", units(500)))
        .await
        .unwrap();
    engine
        .add_income(NewIncome::batch("Karim", "Batch 3", units(1_000)))
        .await
        .unwrap();
    engine
        .add_income(NewIncome::external("Acme", units(2_000)))
        .await
        .unwrap();

    let before = engine.stats().await.unwrap();
    assert_eq!(before.batch_stats[0].key, "Batch 3");
    assert_eq!(before.batch_stats[0].total, units(1_500));
    assert_eq!(before.summary.total, units(3_500));

    engine.delete_income(small).await.unwrap();

    let after = engine.stats().await.unwrap();
    assert_eq!(after.batch_stats[0].total, units(1_000));
    assert_eq!(after.summary.total, units(3_000));

    let dashboard = engine.dashboard(10).await.unwrap();
    assert_eq!(dashboard.summary.total_income, units(3_000));
}

#[tokio::test]
async fn deleting_unknown_ids_fails() {
    let (engine, _db) = engine_with_db().await;

    let missing = Uuid::new_v4();
    assert_eq!(
        engine.delete_income(missing).await,
        Err(EngineError::KeyNotFound(format!("income {missing}")))
    );
    assert_eq!(
        engine.delete_expense(missing).await,
        Err(EngineError::KeyNotFound(format!("expense {missing}")))
    );
}

#[tokio::test]
async fn invalid_records_are_not_stored() {
    let (engine, _db) = engine_with_db().await;

    let result = engine
        .add_income(NewIncome::batch("Rahim", "", units(500)))
        .await;
    assert!(matches!(result, Err(EngineError::InvalidRecord(_))));

    let result = engine
        .add_expense(NewExpense::new(
            "Decor",
            "Stage",
            "Treasurer",
            "Florist",
            MoneyCents::ZERO,
        ))
        .await;
    assert!(matches!(result, Err(EngineError::InvalidAmount(_))));

    assert!(engine.fetch_all_income().await.unwrap().is_empty());
    assert!(engine.fetch_all_expense().await.unwrap().is_empty());
}

#[tokio::test]
async fn damaged_rows_are_reported_not_fatal() {
    let (engine, db) = engine_with_db().await;

    engine
        .add_income(NewIncome::batch("Karim", "Batch 3", units(1_000)))
        .await
        .unwrap();

    let ghost = Uuid::new_v4();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO incomes (id, source_type, name, amount_minor, payment_method, batch_name, is_collective) \
         VALUES (?, 'BATCH', 'Ghost', NULL, 'Cash', 'Batch 3', 0)",
        vec![ghost.to_string().into()],
    ))
    .await
    .unwrap();

    let incomes = engine.fetch_all_income().await.unwrap();
    let stored = incomes.iter().find(|r| r.id == ghost).unwrap();
    assert_eq!(stored.amount, None);
    assert_eq!(stored.date, None);

    let stats = engine.stats().await.unwrap();
    assert_eq!(stats.batch_stats[0].total, units(1_000));
    assert_eq!(stats.excluded, vec![ghost]);
    assert!(stats.top_contributors.iter().all(|c| c.id != ghost));

    let dashboard = engine.dashboard(10).await.unwrap();
    assert_eq!(dashboard.activity.last().map(|e| e.id), Some(ghost));
}

#[tokio::test]
async fn undecodable_rows_are_skipped_and_reported() {
    let (engine, db) = engine_with_db().await;

    engine
        .add_income(NewIncome::batch("Rahim", "Batch 3", units(1_000)))
        .await
        .unwrap();

    let donation = Uuid::new_v4();
    let backend = db.get_database_backend();
    let rows = [
        (donation.to_string(), "DONATION"),
        ("not-a-uuid".to_string(), "BATCH"),
    ];
    for (id, source_type) in rows {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO incomes (id, source_type, name, amount_minor, payment_method, batch_name, is_collective) \
             VALUES (?, ?, 'Stray', 5000, 'Cash', 'Batch 3', 0)",
            vec![id.into(), source_type.into()],
        ))
        .await
        .unwrap();
    }

    let incomes = engine.fetch_all_income().await.unwrap();
    assert_eq!(incomes.len(), 1);

    let stats = engine.stats().await.unwrap();
    assert_eq!(stats.batch_stats[0].total, units(1_000));
    assert_eq!(stats.excluded, vec![donation]);

    let dashboard = engine.dashboard(10).await.unwrap();
    assert_eq!(dashboard.summary.total_income, units(1_000));
    assert_eq!(dashboard.excluded, vec![donation]);
}

#[tokio::test]
async fn dashboard_balance_goes_negative_when_overspent() {
    let (engine, _db) = engine_with_db().await;

    engine
        .add_income(NewIncome::external("Acme", units(1_000)))
        .await
        .unwrap();
    let mut concert = NewExpense::new("Concert", "Sound", "Treasurer", "Band", units(1_500));
    concert.payment_method = Some("bKash".to_string());
    engine.add_expense(concert).await.unwrap();

    let dashboard = engine.dashboard(10).await.unwrap();
    assert_eq!(dashboard.summary.net_balance, units(-500));
    assert_eq!(dashboard.activity.len(), 2);

    let report = engine.expense_report().await.unwrap();
    assert_eq!(report.total, units(1_500));
    assert_eq!(report.category_totals[0].key, "Concert");
    assert_eq!(report.expenses[0].payment_method, "bKash");
    assert_eq!(report.expenses[0].bank_name, "N/A");
}

#[tokio::test]
async fn collections_split_batches_and_sponsors() {
    let (engine, _db) = engine_with_db().await;

    for (batch, amount) in [("Batch 10", 100), ("Batch 2", 200), ("Batch 2", 300)] {
        engine
            .add_income(NewIncome::batch("member", batch, units(amount)))
            .await
            .unwrap();
    }
    let mut rollup = NewIncome::batch("Collective Total", "Batch 2", units(5_000));
    rollup.shape = ContributionShape::Collective;
    engine.add_income(rollup).await.unwrap();
    engine
        .add_income(NewIncome::external("Acme", units(700)))
        .await
        .unwrap();

    let overview = engine.collections().await.unwrap().value;
    let keys: Vec<&str> = overview.batches.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["Batch 2", "Batch 10"]);
    assert_eq!(overview.batches[0].total, units(5_500));
    assert_eq!(overview.external_sponsors, units(700));

    let detail = engine.collection_detail("Batch 2").await.unwrap().value;
    assert_eq!(detail.count, 3);
    assert_eq!(detail.records[0].name, "Collective Total");

    let sponsors = engine
        .collection_detail("External Sponsors")
        .await
        .unwrap()
        .value;
    assert_eq!(sponsors.count, 1);

    let stats = engine.stats().await.unwrap();
    assert!(
        stats
            .top_contributors
            .iter()
            .all(|c| c.name != "Collective Total")
    );
}

#[tokio::test]
async fn builder_overrides_options() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    let options = LedgerOptions {
        receivers: vec!["Treasurer".to_string()],
        ..LedgerOptions::default()
    };
    let engine = Engine::builder()
        .database(db)
        .options(options.clone())
        .build()
        .await
        .unwrap();

    assert_eq!(engine.options(), &options);
}
