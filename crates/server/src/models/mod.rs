//! Domain models for the `employees_db` schema.
//!
//! Rows are read into internal `sqlx::FromRow` structs in [`crate::db`] and
//! converted into these validated types.

pub mod admin;
pub mod category;
pub mod employee;

pub use admin::{Admin, AdminSeed};
pub use category::Category;
pub use employee::{Employee, NewEmployee};
