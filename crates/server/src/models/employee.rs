//! Employee record types.

use secrecy::SecretString;
use serde::Serialize;

use employees_core::{CategoryId, EmployeeId};

/// A row of the `employee` table.
///
/// Every column except `id` is nullable in the schema. `password` is left
/// out: it is only ever written, never read back through this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub salary: Option<i32>,
    pub address: Option<String>,
    /// Stored image asset name.
    pub image: Option<String>,
    pub category_id: Option<CategoryId>,
}

/// Values for inserting an `employee` row.
#[derive(Clone, Default)]
pub struct NewEmployee {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<SecretString>,
    pub salary: Option<i32>,
    pub address: Option<String>,
    pub image: Option<String>,
    pub category_id: Option<CategoryId>,
}

impl std::fmt::Debug for NewEmployee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewEmployee")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("salary", &self.salary)
            .field("address", &self.address)
            .field("image", &self.image)
            .field("category_id", &self.category_id)
            .finish()
    }
}
