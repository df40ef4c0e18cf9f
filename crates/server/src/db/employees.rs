//! Employee repository.
//!
//! `employee.category_id` is a foreign key into `category`; inserts that
//! point at a missing category are rejected by the store and surface as
//! [`RepositoryError::InvalidReference`].

use secrecy::ExposeSecret;
use sqlx::MySqlPool;

use employees_core::{CategoryId, EmployeeId};

use super::RepositoryError;
use crate::models::{Employee, NewEmployee};

#[derive(Debug, sqlx::FromRow)]
struct EmployeeRow {
    id: i32,
    name: Option<String>,
    email: Option<String>,
    salary: Option<i32>,
    address: Option<String>,
    image: Option<String>,
    category_id: Option<i32>,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Self {
            id: EmployeeId::new(row.id),
            name: row.name,
            email: row.email,
            salary: row.salary,
            address: row.address,
            image: row.image,
            category_id: row.category_id.map(CategoryId::new),
        }
    }
}

/// Repository for `employee` table operations.
pub struct EmployeeRepository<'a> {
    pool: &'a MySqlPool,
}

impl<'a> EmployeeRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    /// Insert an employee.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if `category_id` names no category.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewEmployee) -> Result<Employee, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO employee (name, email, password, salary, address, image, category_id)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(new.name.as_deref())
        .bind(new.email.as_deref())
        .bind(new.password.as_ref().map(|p| p.expose_secret()))
        .bind(new.salary)
        .bind(new.address.as_deref())
        .bind(new.image.as_deref())
        .bind(new.category_id)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                let category = new.category_id.map_or_else(|| "NULL".to_owned(), |id| id.to_string());
                return RepositoryError::InvalidReference(format!("category {category} does not exist"));
            }
            RepositoryError::Database(e)
        })?;

        Ok(Employee {
            id: EmployeeId::new(super::generated_id(result.last_insert_id())?),
            name: new.name.clone(),
            email: new.email.clone(),
            salary: new.salary,
            address: new.address.clone(),
            image: new.image.clone(),
            category_id: new.category_id,
        })
    }

    /// Get an employee by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        let row: Option<EmployeeRow> = sqlx::query_as(
            r"
            SELECT id, name, email, salary, address, image, category_id
            FROM employee
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }
}
