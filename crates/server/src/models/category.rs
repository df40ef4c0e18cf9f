//! Employee category type.

use serde::Serialize;

use employees_core::CategoryId;

/// A row of the `category` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: Option<String>,
}
