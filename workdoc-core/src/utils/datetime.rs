//! Serde helpers storing `DateTime<Utc>` as RFC3339 strings.
//!
//! Use with `#[serde(with = "crate::utils::datetime")]`, or the
//! [`option`] submodule for `Option<DateTime<Utc>>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Serializes `DateTime<Utc>` as an RFC3339 string.
pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&dt.to_rfc3339())
}

/// Deserializes `DateTime<Utc>` from an RFC3339 string in any offset.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_rfc3339(&s).map_err(serde::de::Error::custom)
}

/// Parse an RFC3339 timestamp into UTC.
pub fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("Invalid RFC3339 timestamp '{s}': {e}"))
}

/// `Option<DateTime<Utc>>` helpers.
pub mod option {
    use super::{parse_rfc3339, DateTime, Deserialize, Deserializer, Serializer, Utc};

    /// Serializes `Option<DateTime<Utc>>` as RFC3339 or `null`.
    #[allow(clippy::ref_option)]
    pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match dt {
            Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes `Option<DateTime<Utc>>` from RFC3339 or `null`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|s| parse_rfc3339(&s))
            .transpose()
            .map_err(serde::de::Error::custom)
    }
}
