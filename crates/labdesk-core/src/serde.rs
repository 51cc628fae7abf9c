// Module name shadows the `serde` crate; use `::serde` for the external crate.
use ::serde::Serializer;
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

/// Serialize `DateTime<Utc>` as RFC 3339 with 3-digit fractional seconds.
pub fn to_rfc3339_ms<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Serialize a UNIX timestamp (seconds) the same way as [`to_rfc3339_ms`].
pub fn unix_secs_to_rfc3339_ms<S>(secs: &u64, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let secs = i64::try_from(*secs).map_err(::serde::ser::Error::custom)?;
    match Utc.timestamp_opt(secs, 0).single() {
        Some(dt) => to_rfc3339_ms(&dt, s),
        None => Err(::serde::ser::Error::custom("timestamp out of range")),
    }
}
