//! Live tests for the admin seed upsert and its outcome reporting.

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;

use employees_core::Email;
use employees_integration_tests::TestDatabase;
use employees_server::db::{AdminRepository, SeedOutcome};
use employees_server::models::AdminSeed;

fn seed_with_password(password: &str) -> AdminSeed {
    AdminSeed::new(
        Email::parse("admin1@gmail.com").unwrap(),
        SecretString::from(password.to_owned()),
    )
}

#[tokio::test]
#[ignore = "Requires running MySQL server"]
async fn test_seed_into_empty_table_inserts() {
    let test_db = TestDatabase::new();
    let (database, report) = test_db.initialize_unseeded().await;
    assert_eq!(report.seed_outcome(), None);

    let admins = AdminRepository::new(database.pool());
    let outcome = admins.seed(&AdminSeed::standard()).await.unwrap();
    assert_eq!(outcome, SeedOutcome::Inserted);

    let seed = AdminSeed::standard();
    assert_eq!(admins.count_by_email(&seed.email).await.unwrap(), 1);

    database.close().await;
    test_db.drop_database().await;
}

#[tokio::test]
#[ignore = "Requires running MySQL server"]
async fn test_seed_with_new_password_updates() {
    let test_db = TestDatabase::new();
    let (database, _) = test_db.initialize().await;
    let admins = AdminRepository::new(database.pool());

    let outcome = admins.seed(&seed_with_password("67890")).await.unwrap();
    assert_eq!(outcome, SeedOutcome::Updated);

    let seed = AdminSeed::standard();
    let admin = admins.get_by_email(&seed.email).await.unwrap().unwrap();
    assert!(admin.password_matches("67890"));
    assert_eq!(admins.count_by_email(&seed.email).await.unwrap(), 1);
    database.close().await;

    // The next start restores the fixed credential
    let (database, report) = test_db.initialize().await;
    assert_eq!(report.seed_outcome(), Some(SeedOutcome::Updated));
    let admin = AdminRepository::new(database.pool())
        .get_by_email(&seed.email)
        .await
        .unwrap()
        .unwrap();
    assert!(admin.password_matches("12345"));

    database.close().await;
    test_db.drop_database().await;
}

#[tokio::test]
#[ignore = "Requires running MySQL server"]
async fn test_seed_with_same_password_is_unchanged() {
    let test_db = TestDatabase::new();
    let (database, _) = test_db.initialize().await;
    let admins = AdminRepository::new(database.pool());

    let outcome = admins.seed(&AdminSeed::standard()).await.unwrap();
    assert_eq!(outcome, SeedOutcome::Unchanged);
    assert!(!outcome.changed());

    let seed = AdminSeed::standard();
    assert_eq!(admins.count_by_email(&seed.email).await.unwrap(), 1);

    database.close().await;
    test_db.drop_database().await;
}

#[tokio::test]
#[ignore = "Requires running MySQL server"]
async fn test_duplicate_email_insert_rejected() {
    let test_db = TestDatabase::new();
    let (database, _) = test_db.initialize().await;

    let duplicate = sqlx::query("INSERT INTO admin (email, password) VALUES ('admin1@gmail.com', 'x')")
        .execute(database.pool())
        .await;

    match duplicate {
        Err(sqlx::Error::Database(db_err)) => assert!(db_err.is_unique_violation()),
        other => panic!("expected unique violation, got {other:?}"),
    }

    database.close().await;
    test_db.drop_database().await;
}
