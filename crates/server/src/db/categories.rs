//! Category repository.

use sqlx::MySqlPool;

use employees_core::CategoryId;

use super::RepositoryError;
use crate::models::Category;

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: Option<String>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
        }
    }
}

/// Repository for `category` table operations.
pub struct CategoryRepository<'a> {
    pool: &'a MySqlPool,
}

impl<'a> CategoryRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    /// Insert a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    /// Returns `RepositoryError::DataCorruption` if the generated id does not fit the key type.
    pub async fn create(&self, name: &str) -> Result<Category, RepositoryError> {
        let result = sqlx::query("INSERT INTO category (name) VALUES (?)")
            .bind(name)
            .execute(self.pool)
            .await?;

        Ok(Category {
            id: CategoryId::new(super::generated_id(result.last_insert_id())?),
            name: Some(name.to_owned()),
        })
    }

    /// List all categories by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows: Vec<CategoryRow> = sqlx::query_as("SELECT id, name FROM category ORDER BY id")
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
