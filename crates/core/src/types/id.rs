//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. IDs are UUIDs
//! generated by the application at creation time.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around [`uuid::Uuid`] with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `generate()`, `as_uuid()`
/// - `From<Uuid>`, `Into<Uuid>`, `FromStr`, and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use mangaiyar_core::define_id;
/// define_id!(CartId);
/// define_id!(CouponId);
///
/// let cart_id = CartId::generate();
/// let coupon_id = CouponId::generate();
///
/// // These are different types, so this won't compile:
/// // let _: CartId = coupon_id;
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
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Create an ID from an existing UUID.
            #[must_use]
            pub const fn new(id: ::uuid::Uuid) -> Self {
                Self(id)
            }

            /// Generate a fresh random ID.
            #[must_use]
            pub fn generate() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Get the underlying UUID value.
            #[must_use]
            pub const fn as_uuid(&self) -> ::uuid::Uuid {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }

        impl From<::uuid::Uuid> for $name {
            fn from(id: ::uuid::Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for ::uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(OrderId);
define_id!(ProductId);
define_id!(PostId);
define_id!(ContactId);
define_id!(BannerId);

impl OrderId {
    /// Short human-facing order reference: the last 6 hex characters of the
    /// id, upper-cased and prefixed with `#`, e.g. `#9F3A1C`.
    ///
    /// Used in confirmation emails and WhatsApp notifications where the full
    /// UUID would be unwieldy.
    #[must_use]
    pub fn reference(&self) -> String {
        let hex = self.0.simple().to_string();
        let (_, tail) = hex.split_at(hex.len() - 6);
        format!("#{}", tail.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_format() {
        let id: OrderId = "c9bf9e57-1685-4c89-bafb-ff5af830be8a"
            .parse()
            .expect("valid uuid");
        assert_eq!(id.reference(), "#30BE8A");
    }

    #[test]
    fn test_reference_is_hash_plus_six_upper_hex() {
        let id = OrderId::generate();
        let reference = id.reference();
        assert_eq!(reference.len(), 7);
        assert!(reference.starts_with('#'));
        assert!(
            reference[1..]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
    }

    #[test]
    fn test_display_roundtrip() {
        let id = ProductId::generate();
        let parsed: ProductId = id.to_string().parse().expect("roundtrip");
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_serde_transparent() {
        let id: OrderId = "c9bf9e57-1685-4c89-bafb-ff5af830be8a"
            .parse()
            .expect("valid uuid");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"c9bf9e57-1685-4c89-bafb-ff5af830be8a\"");
    }
}
