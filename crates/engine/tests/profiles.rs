use chrono::{TimeZone, Utc};
use sea_orm::{Database, DatabaseConnection};

use engine::{
    CreateTransactionCmd, CreateUserCmd, Engine, EngineError, MoneyCents, RiskManagement,
    TransactionKind, UpdateFinancialProfileCmd, UpdateUserCmd,
};
use migration::MigratorTrait;

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

async fn alice(engine: &Engine, cents: i64) -> i64 {
    engine
        .create_user(
            CreateUserCmd::new("alice", "password", "Alice Liddell")
                .age(30)
                .initial_balance(MoneyCents::new(cents)),
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn create_user_rejects_duplicates_and_negative_balance() {
    let (engine, _db) = engine_with_db().await;
    alice(&engine, 0).await;

    let duplicate = engine
        .create_user(CreateUserCmd::new(" alice ", "other", "Someone Else"))
        .await
        .unwrap_err();
    assert!(matches!(duplicate, EngineError::ExistingKey(_)));

    let negative = engine
        .create_user(
            CreateUserCmd::new("bob", "password", "Bob").initial_balance(MoneyCents::new(-1)),
        )
        .await
        .unwrap_err();
    assert!(matches!(negative, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn authenticate_checks_the_password() {
    let (engine, _db) = engine_with_db().await;
    let id = alice(&engine, 12_00).await;

    let user = engine
        .authenticate("alice", "password")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.id, id);
    assert_eq!(user.age, 30);
    assert_eq!(user.balance, MoneyCents::new(12_00));

    assert!(engine.authenticate("alice", "wrong").await.unwrap().is_none());
    assert!(engine.authenticate("nobody", "password").await.unwrap().is_none());
}

#[tokio::test]
async fn update_user_edits_details_but_not_the_balance() {
    let (engine, _db) = engine_with_db().await;
    let id = alice(&engine, 15_00).await;

    let updated = engine
        .update_user(
            UpdateUserCmd::new(id)
                .username(" alice.l ")
                .full_name("Alice P. Liddell")
                .age(31),
        )
        .await
        .unwrap();
    assert_eq!(updated.username, "alice.l");
    assert_eq!(updated.full_name, "Alice P. Liddell");
    assert_eq!(updated.age, 31);
    assert_eq!(updated.balance, MoneyCents::new(15_00));

    let untouched = engine.update_user(UpdateUserCmd::new(id)).await.unwrap();
    assert_eq!(untouched.username, "alice.l");
    assert_eq!(untouched.age, 31);

    assert!(engine.authenticate("alice.l", "password").await.unwrap().is_some());
    assert!(engine.authenticate("alice", "password").await.unwrap().is_none());
}

#[tokio::test]
async fn update_user_rejects_taken_or_blank_usernames() {
    let (engine, _db) = engine_with_db().await;
    let id = alice(&engine, 0).await;
    engine
        .create_user(CreateUserCmd::new("bob", "password", "Bob"))
        .await
        .unwrap();

    let taken = engine
        .update_user(UpdateUserCmd::new(id).username("bob"))
        .await
        .unwrap_err();
    assert_eq!(taken, EngineError::ExistingKey("bob".to_string()));

    let same = engine
        .update_user(UpdateUserCmd::new(id).username("alice"))
        .await
        .unwrap();
    assert_eq!(same.username, "alice");

    let blank = engine
        .update_user(UpdateUserCmd::new(id).username("  "))
        .await
        .unwrap_err();
    assert!(matches!(blank, EngineError::InvalidUser(_)));

    let negative_age = engine
        .update_user(UpdateUserCmd::new(id).age(-1))
        .await
        .unwrap_err();
    assert!(matches!(negative_age, EngineError::InvalidUser(_)));

    let missing = engine.update_user(UpdateUserCmd::new(id + 100)).await;
    assert!(matches!(missing, Err(EngineError::KeyNotFound(_))));
}

#[tokio::test]
async fn profile_is_created_lazily_and_upserted() {
    let (engine, _db) = engine_with_db().await;
    let id = alice(&engine, 0).await;

    assert_eq!(engine.financial_profile(id).await.unwrap(), None);
    assert_eq!(engine.user_detail(id).await.unwrap().profile, None);

    let mut cmd = UpdateFinancialProfileCmd::new(id);
    cmd.monthly_income = Some(MoneyCents::new(2_500_00));
    cmd.debt = Some(MoneyCents::new(300_00));
    cmd.financial_goals = Some("  buy a bike ".to_string());
    cmd.risk_management = Some(RiskManagement::Medium);
    let profile = engine.update_financial_profile(cmd).await.unwrap();
    assert_eq!(profile.monthly_income, Some(MoneyCents::new(2_500_00)));
    assert_eq!(profile.financial_goals.as_deref(), Some("buy a bike"));
    assert_eq!(profile.total_income, MoneyCents::ZERO);

    let mut cmd = UpdateFinancialProfileCmd::new(id);
    cmd.current_savings = Some(MoneyCents::new(1_000_00));
    cmd.risk_management = Some(RiskManagement::Low);
    let profile = engine.update_financial_profile(cmd).await.unwrap();
    assert_eq!(profile.monthly_income, None);
    assert_eq!(profile.current_savings, Some(MoneyCents::new(1_000_00)));
    assert_eq!(profile.risk_management, Some(RiskManagement::Low));

    let detail = engine.user_detail(id).await.unwrap();
    assert_eq!(detail.profile, Some(profile));
}

#[tokio::test]
async fn profile_update_keeps_aggregates_and_rejects_negative_amounts() {
    let (engine, _db) = engine_with_db().await;
    let id = alice(&engine, 0).await;
    engine
        .create_transaction(CreateTransactionCmd::direct(
            id,
            TransactionKind::Income,
            MoneyCents::new(70_00),
        ))
        .await
        .unwrap();

    let profile = engine
        .update_financial_profile(UpdateFinancialProfileCmd::new(id))
        .await
        .unwrap();
    assert_eq!(profile.total_income, MoneyCents::new(70_00));

    let mut cmd = UpdateFinancialProfileCmd::new(id);
    cmd.debt = Some(MoneyCents::new(-5));
    let err = engine.update_financial_profile(cmd).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn refresh_is_idempotent() {
    let (engine, _db) = engine_with_db().await;
    let id = alice(&engine, 50_00).await;
    engine
        .create_transaction(CreateTransactionCmd::direct(
            id,
            TransactionKind::Outcome,
            MoneyCents::new(20_00),
        ))
        .await
        .unwrap();

    let first = engine.refresh_financial_aggregates(id).await.unwrap();
    let second = engine.refresh_financial_aggregates(id).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(second.total_outcome, MoneyCents::new(20_00));

    let missing = engine.refresh_financial_aggregates(id + 1).await;
    assert!(matches!(missing, Err(EngineError::KeyNotFound(_))));
}

#[tokio::test]
async fn summary_reports_current_month_and_totals() {
    let (engine, _db) = engine_with_db().await;
    let id = alice(&engine, 100_00).await;
    let last_month = Utc.with_ymd_and_hms(2025, 2, 27, 9, 0, 0).unwrap();
    let this_month = Utc.with_ymd_and_hms(2025, 3, 2, 9, 0, 0).unwrap();
    let now = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();

    for (kind, cents, at) in [
        (TransactionKind::Income, 40_00, last_month),
        (TransactionKind::Outcome, 10_00, last_month),
        (TransactionKind::Income, 25_00, this_month),
        (TransactionKind::Outcome, 5_50, this_month),
    ] {
        engine
            .create_transaction(
                CreateTransactionCmd::direct(id, kind, MoneyCents::new(cents)).created_at(at),
            )
            .await
            .unwrap();
    }
    let mut cmd = UpdateFinancialProfileCmd::new(id);
    cmd.monthly_income = Some(MoneyCents::new(1_800_00));
    cmd.risk_management = Some(RiskManagement::High);
    engine.update_financial_profile(cmd).await.unwrap();

    let summary = engine.financial_summary(id, now).await.unwrap();
    assert_eq!(summary.balance, MoneyCents::new(149_50));
    assert_eq!(summary.month_income, MoneyCents::new(25_00));
    assert_eq!(summary.month_outcome, MoneyCents::new(5_50));
    assert_eq!(summary.total_income, MoneyCents::new(65_00));
    assert_eq!(summary.total_outcome, MoneyCents::new(15_50));
    assert_eq!(summary.declared_monthly_income, Some(MoneyCents::new(1_800_00)));
    assert_eq!(summary.risk_management, Some(RiskManagement::High));
}

#[tokio::test]
async fn history_buckets_by_calendar_month() {
    let (engine, _db) = engine_with_db().await;
    let id = alice(&engine, 0).await;
    let other = engine
        .create_user(CreateUserCmd::new("bob", "password", "Bob"))
        .await
        .unwrap()
        .id;

    for (user, kind, cents, (y, m)) in [
        (id, TransactionKind::Income, 100_00, (2024, 11)),
        (id, TransactionKind::Income, 30_00, (2025, 1)),
        (id, TransactionKind::Outcome, 12_00, (2025, 1)),
        (other, TransactionKind::Income, 999_00, (2025, 1)),
        (id, TransactionKind::Outcome, 1_00, (2025, 3)),
    ] {
        let at = Utc.with_ymd_and_hms(y, m, 10, 8, 0, 0).unwrap();
        engine
            .create_transaction(
                CreateTransactionCmd::direct(user, kind, MoneyCents::new(cents)).created_at(at),
            )
            .await
            .unwrap();
    }

    let now = Utc.with_ymd_and_hms(2025, 3, 20, 0, 0, 0).unwrap();
    let history = engine.monthly_history(id, 3, now).await.unwrap();
    let months: Vec<&str> = history.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(months, ["2025-01", "2025-02", "2025-03"]);
    assert_eq!(history[0].income, MoneyCents::new(30_00));
    assert_eq!(history[0].outcome, MoneyCents::new(12_00));
    assert_eq!(history[1].income, MoneyCents::ZERO);
    assert_eq!(history[2].outcome, MoneyCents::new(1_00));

    let err = engine.monthly_history(id, 0, now).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidPage(_)));
    assert!(engine.monthly_history(id, 25, now).await.is_err());
}
