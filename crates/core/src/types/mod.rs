//! Core types for the employee management schema.

pub mod email;
pub mod id;

pub use email::{Email, EmailError};
pub use id::*;
