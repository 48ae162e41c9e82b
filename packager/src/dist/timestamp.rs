//! UTC generation timestamps in `YYYY-MM-DDThh:mm:ssZ` form.

use super::packaging_error::PackagingError;
use serde::Serialize;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// An ISO 8601 UTC timestamp recording when an archive was built.
///
/// # Examples
///
/// ```
/// use open3d_packager::dist::timestamp::GeneratedAt;
///
/// let ts = GeneratedAt::parse("2018-03-01T12:00:00Z")?;
/// assert_eq!(ts.as_str(), "2018-03-01T12:00:00Z");
/// assert_eq!(GeneratedAt::from_epoch_secs(0).as_str(), "1970-01-01T00:00:00Z");
/// # Ok::<(), open3d_packager::dist::packaging_error::PackagingError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct GeneratedAt(String);

impl GeneratedAt {
    /// Validates a caller-supplied timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`PackagingError::InvalidTimestamp`] when `value` does not
    /// have the `YYYY-MM-DDThh:mm:ssZ` shape.
    pub fn parse(value: &str) -> Result<Self, PackagingError> {
        if is_iso8601_utc(value) {
            Ok(Self(value.to_owned()))
        } else {
            Err(PackagingError::InvalidTimestamp(value.to_owned()))
        }
    }

    /// Returns the current UTC time.
    ///
    /// A clock set before the Unix epoch is reported as the epoch itself.
    #[must_use]
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        Self::from_epoch_secs(secs)
    }

    /// Formats a Unix epoch timestamp.
    #[must_use]
    pub fn from_epoch_secs(epoch_secs: u64) -> Self {
        let (year, month, day) = civil_from_epoch(epoch_secs);
        let day_secs = epoch_secs % 86_400;
        let hour = day_secs / 3_600;
        let minute = (day_secs % 3_600) / 60;
        let second = day_secs % 60;
        Self(format!(
            "{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}Z"
        ))
    }

    /// Return the timestamp as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeneratedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn is_iso8601_utc(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 20
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            10 => *byte == b'T',
            13 | 16 => *byte == b':',
            19 => *byte == b'Z',
            _ => byte.is_ascii_digit(),
        })
}

/// Converts a Unix epoch timestamp to `(year, month, day)`.
///
/// Adapted from Howard Hinnant's `civil_from_days` algorithm.
fn civil_from_epoch(epoch_secs: u64) -> (u64, u64, u64) {
    let z = epoch_secs / 86_400 + 719_468;
    let era = z / 146_097;
    let doe = z % 146_097; // day of era [0, 146_096]
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // day of year
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = yoe + era * 400 + u64::from(m <= 2);
    (y, m, d)
}
