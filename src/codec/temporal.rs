//! Temporal Codec: timestamp sebagai offset detik (f64) dari reference epoch.
//!
//! Reference epoch adalah 2001-01-01T00:00:00Z. Stream hanya berisi
//! 8-byte big-endian double, tanpa timezone dan tanpa tag.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};

/// Seconds between the Unix epoch and the reference epoch (2001-01-01T00:00:00Z).
pub const UNIX_TO_REFERENCE_SECS: f64 = 978_307_200.0;

/// Offset of the wall-clock time the price API writes its dates in
/// (Australia/Brisbane, UTC+10, no daylight saving).
pub const API_UTC_OFFSET_SECS: i64 = 10 * 3600;

/// Newtype name the binary decoder recognises to route through
/// [`BinaryDecoder::decode_timestamp`](super::BinaryDecoder::decode_timestamp).
pub(crate) const TIMESTAMP_MARKER: &str = "$voltcache::Timestamp";

/// A point in time, stored as seconds relative to the reference epoch.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Timestamp(f64);

impl Timestamp {
    /// The reference epoch itself (offset `0.0`).
    pub const REFERENCE_EPOCH: Timestamp = Timestamp(0.0);

    /// Membuat timestamp dari offset detik terhadap reference epoch.
    #[inline]
    pub const fn from_reference_offset(seconds: f64) -> Self {
        Self(seconds)
    }

    /// Offset detik terhadap reference epoch.
    #[inline]
    pub const fn reference_offset(self) -> f64 {
        self.0
    }

    /// Membuat timestamp dari detik sejak Unix epoch.
    #[inline]
    pub fn from_unix_seconds(seconds: f64) -> Self {
        Self(seconds - UNIX_TO_REFERENCE_SECS)
    }

    /// Detik sejak Unix epoch.
    #[inline]
    pub fn unix_seconds(self) -> f64 {
        self.0 + UNIX_TO_REFERENCE_SECS
    }

    pub fn from_system_time(time: SystemTime) -> Self {
        let unix = match time.duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs_f64(),
            Err(e) => -e.duration().as_secs_f64(),
        };
        Self::from_unix_seconds(unix)
    }

    /// Returns `None` when the offset is not finite or falls outside what
    /// `SystemTime` can represent on this platform.
    pub fn to_system_time(self) -> Option<SystemTime> {
        let unix = self.unix_seconds();
        if !unix.is_finite() {
            return None;
        }
        let magnitude = Duration::try_from_secs_f64(unix.abs()).ok()?;
        if unix >= 0.0 {
            UNIX_EPOCH.checked_add(magnitude)
        } else {
            UNIX_EPOCH.checked_sub(magnitude)
        }
    }

    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    /// Next whole `minutes` boundary after this timestamp, plus `plus_seconds`.
    ///
    /// Boundaries are counted from the reference epoch, so with `minutes = 15`
    /// the result always lands on xx:00, xx:15, xx:30 or xx:45 UTC (plus the
    /// extra seconds). A timestamp already on a boundary moves to the next one.
    pub fn next_minutes(self, minutes: f64, plus_seconds: f64) -> Self {
        let step = minutes * 60.0;
        let current = self.0 - self.0 % step;
        Self(current + step + plus_seconds)
    }

    /// `self - earlier` dalam detik (negatif jika `earlier` lebih baru).
    #[inline]
    pub fn seconds_since(self, earlier: Timestamp) -> f64 {
        self.0 - earlier.0
    }

    /// Parse a price API date, `yyyy-MM-ddTHH:mm:ssZ`.
    ///
    /// The API writes Brisbane wall-clock time but labels it `Z`, so the
    /// suffix is ignored and the fields are read as UTC+10.
    pub fn parse_api(text: &str) -> Option<Self> {
        let b = text.as_bytes();
        if b.len() != 20
            || b[4] != b'-'
            || b[7] != b'-'
            || b[10] != b'T'
            || b[13] != b':'
            || b[16] != b':'
            || b[19] != b'Z'
        {
            return None;
        }
        let field = |range: std::ops::Range<usize>| -> Option<i64> {
            let digits = text.get(range)?;
            if !digits.bytes().all(|c| c.is_ascii_digit()) {
                return None;
            }
            digits.parse().ok()
        };
        let (year, month, day) = (field(0..4)?, field(5..7)?, field(8..10)?);
        let (hour, minute, second) = (field(11..13)?, field(14..16)?, field(17..19)?);
        if !(1..=12).contains(&month)
            || day < 1
            || day > days_in_month(year, month)
            || hour > 23
            || minute > 59
            || second > 59
        {
            return None;
        }

        let local = days_from_civil(year, month, day) * 86_400 + hour * 3600 + minute * 60 + second;
        Some(Self::from_unix_seconds((local - API_UTC_OFFSET_SECS) as f64))
    }

    /// Format in the price API's date format (Brisbane wall clock, `Z`
    /// suffix). Fractional seconds are truncated. `None` if not finite.
    pub fn to_api_string(self) -> Option<String> {
        let unix = self.unix_seconds();
        if !unix.is_finite() {
            return None;
        }
        let local = unix.floor() as i64 + API_UTC_OFFSET_SECS;
        let (year, month, day) = civil_from_days(local.div_euclid(86_400));
        let secs = local.rem_euclid(86_400);
        Some(format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            year,
            month,
            day,
            secs / 3600,
            (secs / 60) % 60,
            secs % 60
        ))
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        Self::from_system_time(time)
    }
}

impl fmt::Display for Timestamp {
    /// Renders as an ISO-8601 UTC instant with millisecond precision.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unix = self.unix_seconds();
        if !unix.is_finite() {
            return write!(f, "<invalid timestamp {}>", self.0);
        }

        let total_ms = (unix * 1000.0).round() as i64;
        let days = total_ms.div_euclid(86_400_000);
        let ms_of_day = total_ms.rem_euclid(86_400_000);
        let (year, month, day) = civil_from_days(days);

        let secs = ms_of_day / 1000;
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
            year,
            month,
            day,
            secs / 3600,
            (secs / 60) % 60,
            secs % 60,
            ms_of_day % 1000
        )
    }
}

/// Days since 1970-01-01 to (year, month, day), proleptic Gregorian.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// (year, month) to days in that month.
fn days_in_month(year: i64, month: i64) -> i64 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 => 29,
        2 => 28,
        _ => 31,
    }
}

/// Inverse of [`civil_from_days`].
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y.rem_euclid(400);
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

// Human-readable formats (JSON) use the API date string; the binary codec
// always takes the marker path with the raw f64 offset.
impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            if let Some(text) = self.to_api_string() {
                return serializer.serialize_str(&text);
            }
        }
        serializer.serialize_newtype_struct(TIMESTAMP_MARKER, &self.0)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            deserializer.deserialize_any(TimestampVisitor)
        } else {
            deserializer.deserialize_newtype_struct(TIMESTAMP_MARKER, TimestampVisitor)
        }
    }
}

struct TimestampVisitor;

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an API date string or seconds relative to 2001-01-01T00:00:00Z")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Timestamp, E> {
        Timestamp::parse_api(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(self, d: D) -> Result<Timestamp, D::Error> {
        f64::deserialize(d).map(Timestamp)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Timestamp, E> {
        Ok(Timestamp(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Timestamp, E> {
        Ok(Timestamp(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Timestamp, E> {
        Ok(Timestamp(v as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_conversion() {
        let ts = Timestamp::from_unix_seconds(UNIX_TO_REFERENCE_SECS);
        assert_eq!(ts, Timestamp::REFERENCE_EPOCH);
        assert_eq!(Timestamp::from_reference_offset(10.5).unix_seconds(), 978_307_210.5);
    }

    #[test]
    fn test_system_time_roundtrip() {
        let t = UNIX_EPOCH + Duration::from_secs(1_567_296_000);
        let ts = Timestamp::from(t);
        assert_eq!(ts.to_system_time(), Some(t));

        let before_unix = Timestamp::from_unix_seconds(-86_400.0);
        assert_eq!(
            before_unix.to_system_time(),
            UNIX_EPOCH.checked_sub(Duration::from_secs(86_400))
        );
    }

    #[test]
    fn test_to_system_time_rejects_non_finite() {
        assert_eq!(Timestamp::from_reference_offset(f64::NAN).to_system_time(), None);
        assert_eq!(Timestamp::from_reference_offset(f64::INFINITY).to_system_time(), None);
    }

    #[test]
    fn test_next_minutes() {
        // 2019-09-09T09:37:12Z
        let ts = Timestamp::from_unix_seconds(1_568_021_832.0);
        let next = ts.next_minutes(15.0, 5.0);
        // 09:45:05
        assert_eq!(next.unix_seconds(), 1_568_022_305.0);

        // already on a boundary moves forward a full step
        let boundary = Timestamp::from_unix_seconds(1_568_022_300.0);
        assert_eq!(boundary.next_minutes(15.0, 0.0).unix_seconds(), 1_568_023_200.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Timestamp::REFERENCE_EPOCH.to_string(), "2001-01-01T00:00:00.000Z");
        let ts = Timestamp::from_unix_seconds(1_567_288_800.25);
        assert_eq!(ts.to_string(), "2019-08-31T22:00:00.250Z");
        let early = Timestamp::from_unix_seconds(-1.0);
        assert_eq!(early.to_string(), "1969-12-31T23:59:59.000Z");
    }

    #[test]
    fn test_parse_api_reads_brisbane_time() {
        // 09:30 Brisbane is 23:30 UTC the day before
        let ts = Timestamp::parse_api("2019-09-09T09:30:00Z").unwrap();
        assert_eq!(ts.unix_seconds(), 1_567_985_400.0);
        assert_eq!(ts.to_string(), "2019-09-08T23:30:00.000Z");
        assert_eq!(ts.to_api_string().as_deref(), Some("2019-09-09T09:30:00Z"));

        let leap = Timestamp::parse_api("2020-02-29T00:00:00Z").unwrap();
        assert_eq!(leap.to_api_string().as_deref(), Some("2020-02-29T00:00:00Z"));
    }

    #[test]
    fn test_parse_api_rejects_malformed() {
        for bad in [
            "",
            "2019-09-09 09:30:00Z",
            "2019-09-09T09:30:00",
            "2019-13-01T00:00:00Z",
            "2019-02-29T00:00:00Z",
            "2019-09-09T24:00:00Z",
            "2019-09-09T09:30:0xZ",
            "+019-09-09T09:30:00Z",
        ] {
            assert_eq!(Timestamp::parse_api(bad), None, "{bad}");
        }
        assert_eq!(Timestamp::from_reference_offset(f64::NAN).to_api_string(), None);
    }

    #[test]
    fn test_json_uses_api_dates() {
        let ts: Timestamp = serde_json::from_str("\"2019-08-31T22:00:00Z\"").unwrap();
        assert_eq!(ts.unix_seconds(), 1_567_252_800.0);
        assert_eq!(serde_json::to_string(&ts).unwrap(), "\"2019-08-31T22:00:00Z\"");

        // numeric offsets are still accepted
        let ts: Timestamp = serde_json::from_str("10.5").unwrap();
        assert_eq!(ts, Timestamp::from_reference_offset(10.5));

        let err = serde_json::from_str::<Timestamp>("\"yesterday\"").unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn test_seconds_since() {
        let a = Timestamp::from_reference_offset(100.0);
        let b = Timestamp::from_reference_offset(40.5);
        assert_eq!(a.seconds_since(b), 59.5);
        assert_eq!(b.seconds_since(a), -59.5);
    }
}
