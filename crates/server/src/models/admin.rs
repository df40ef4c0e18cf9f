//! Admin credential types.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use employees_core::{AdminId, Email};

/// Email of the admin row seeded at every start.
pub const SEED_ADMIN_EMAIL: &str = "admin1@gmail.com";

/// Password of the admin row seeded at every start.
///
/// Stored as plaintext in `admin.password`. Replacing it with a salted hash
/// needs a matching change in the login code that reads this column.
pub const SEED_ADMIN_PASSWORD: &str = "12345";

/// A row of the `admin` table.
///
/// The password is never serialized and is redacted in `Debug`.
#[derive(Clone, Serialize)]
pub struct Admin {
    pub id: AdminId,
    pub email: Email,
    #[serde(skip)]
    pub password: SecretString,
}

impl std::fmt::Debug for Admin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Admin")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Admin {
    /// Compare the stored password with a candidate.
    #[must_use]
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password.expose_secret() == candidate
    }
}

/// The credential upserted into the `admin` table.
#[derive(Clone)]
pub struct AdminSeed {
    pub email: Email,
    pub password: SecretString,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl AdminSeed {
    #[must_use]
    pub const fn new(email: Email, password: SecretString) -> Self {
        Self { email, password }
    }

    /// The fixed `admin1@gmail.com` / `12345` credential.
    ///
    /// # Panics
    ///
    /// Never: the seed email is a valid address.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn standard() -> Self {
        Self {
            email: Email::parse(SEED_ADMIN_EMAIL).expect("seed admin email is valid"),
            password: SecretString::from(SEED_ADMIN_PASSWORD),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_seed_values() {
        let seed = AdminSeed::standard();
        assert_eq!(seed.email.as_str(), "admin1@gmail.com");
        assert_eq!(seed.password.expose_secret(), "12345");
    }

    #[test]
    fn test_seed_debug_redacts_password() {
        let debug_output = format!("{:?}", AdminSeed::standard());
        assert!(debug_output.contains("admin1@gmail.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("12345"));
    }

    #[test]
    fn test_admin_serialization_omits_password() {
        let admin = Admin {
            id: AdminId::new(1),
            email: Email::parse("admin1@gmail.com").unwrap(),
            password: SecretString::from("12345"),
        };

        let json = serde_json::to_string(&admin).unwrap();
        assert_eq!(json, r#"{"id":1,"email":"admin1@gmail.com"}"#);
        assert!(admin.password_matches("12345"));
        assert!(!admin.password_matches("54321"));
    }
}
