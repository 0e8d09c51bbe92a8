/// Wire and domain types shared by all backends
pub mod booking;
pub mod cart;
pub mod profile;
pub mod service;
pub mod user;

pub use booking::{Booking, BookingDraft, BookingRequest, BookingStatus, BookingUpdate};
pub use cart::{
    AddToCartRequest, AvailabilityQuery, AvailabilityRequest, Cart, CartItem, CreditTopUp,
    Equipment, ServiceAvailability, TopUpStatus,
};
pub use profile::{Profile, ProfileUpdate};
pub use service::Service;
pub use user::{AuthSession, Gender, RegistrationRequest, Role, User, UserSummary};

/// Serde helper for `TimeField`-style values
///
/// The wire format is `HH:MM`; servers that echo seconds (`HH:MM:SS`) are
/// accepted on the way in.
pub(crate) mod timefmt {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M"))
            .map_err(serde::de::Error::custom)
    }
}

/// Serde helper for identifiers that arrive as either a JSON number or a
/// string (integer rows on the REST backend, UUIDs on the hosted one)
pub(crate) mod flexible_id {
    use serde::{self, Deserializer, Serializer};

    pub fn serialize<S>(id: &str, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(id)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IdVisitor;

        impl<'de> serde::de::Visitor<'de> for IdVisitor {
            type Value = String;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a string or integer identifier")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<String, E> {
                Ok(v.to_string())
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<String, E> {
                Ok(v.to_string())
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<String, E> {
                Ok(v.to_string())
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}
