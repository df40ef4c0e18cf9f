//! Live tests for the `employee.category_id` foreign key.

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;

use employees_core::CategoryId;
use employees_integration_tests::TestDatabase;
use employees_server::db::{CategoryRepository, EmployeeRepository, RepositoryError};
use employees_server::models::NewEmployee;

fn new_employee(category_id: Option<CategoryId>) -> NewEmployee {
    NewEmployee {
        name: Some("Ada Lovelace".to_owned()),
        email: Some("ada@example.com".to_owned()),
        password: Some(SecretString::from("analytical")),
        salary: Some(85_000),
        address: Some("12 St James's Square".to_owned()),
        image: Some("image_1700000000000.png".to_owned()),
        category_id,
    }
}

#[tokio::test]
#[ignore = "Requires running MySQL server"]
async fn test_employee_with_missing_category_rejected() {
    let test_db = TestDatabase::new();
    let (database, _) = test_db.initialize().await;

    let result = EmployeeRepository::new(database.pool())
        .create(&new_employee(Some(CategoryId::new(9_999))))
        .await;

    assert!(
        matches!(result, Err(RepositoryError::InvalidReference(_))),
        "orphaned category_id must be rejected, got {result:?}"
    );

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employee")
        .fetch_one(database.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);

    database.close().await;
    test_db.drop_database().await;
}

#[tokio::test]
#[ignore = "Requires running MySQL server"]
async fn test_employee_with_existing_category_stored() {
    let test_db = TestDatabase::new();
    let (database, _) = test_db.initialize().await;

    let category = CategoryRepository::new(database.pool())
        .create("Engineering")
        .await
        .unwrap();
    let employees = EmployeeRepository::new(database.pool());
    let created = employees
        .create(&new_employee(Some(category.id)))
        .await
        .unwrap();

    let fetched = employees.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.category_id, Some(category.id));
    assert_eq!(fetched.salary, Some(85_000));

    database.close().await;
    test_db.drop_database().await;
}

#[tokio::test]
#[ignore = "Requires running MySQL server"]
async fn test_employee_without_category_allowed() {
    let test_db = TestDatabase::new();
    let (database, _) = test_db.initialize().await;

    let created = EmployeeRepository::new(database.pool())
        .create(&new_employee(None))
        .await
        .unwrap();
    assert_eq!(created.category_id, None);

    database.close().await;
    test_db.drop_database().await;
}

#[tokio::test]
#[ignore = "Requires running MySQL server"]
async fn test_categories_listed_in_insert_order() {
    let test_db = TestDatabase::new();
    let (database, _) = test_db.initialize().await;

    let categories = CategoryRepository::new(database.pool());
    let first = categories.create("Engineering").await.unwrap();
    let second = categories.create("Sales").await.unwrap();

    let listed = categories.list_all().await.unwrap();
    assert_eq!(listed, vec![first, second]);

    database.close().await;
    test_db.drop_database().await;
}
