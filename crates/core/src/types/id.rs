//! Newtype IDs for the surrogate keys of the schema.
//!
//! Every table uses an `INT AUTO_INCREMENT` primary key. The `define_id!`
//! macro wraps those keys so an `AdminId` can never be passed where a
//! `CategoryId` is expected.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>` and `Into<i32>` implementations
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `mysql` feature)
///
/// # Example
///
/// ```rust
/// # use employees_core::define_id;
/// define_id!(DepartmentId);
/// define_id!(BadgeId);
///
/// let department = DepartmentId::new(1);
/// let badge = BadgeId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: DepartmentId = badge;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "mysql")]
        impl ::sqlx::Type<::sqlx::MySql> for $name {
            fn type_info() -> ::sqlx::mysql::MySqlTypeInfo {
                <i32 as ::sqlx::Type<::sqlx::MySql>>::type_info()
            }

            fn compatible(ty: &::sqlx::mysql::MySqlTypeInfo) -> bool {
                <i32 as ::sqlx::Type<::sqlx::MySql>>::compatible(ty)
            }
        }

        #[cfg(feature = "mysql")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::MySql> for $name {
            fn decode(
                value: ::sqlx::mysql::MySqlValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <i32 as ::sqlx::Decode<::sqlx::MySql>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "mysql")]
        impl ::sqlx::Encode<'_, ::sqlx::MySql> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <::sqlx::MySql as ::sqlx::Database>::ArgumentBuffer<'_>,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <i32 as ::sqlx::Encode<::sqlx::MySql>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

define_id!(AdminId);
define_id!(CategoryId);
define_id!(EmployeeId);
