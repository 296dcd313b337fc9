//! Timestamp utilities
//!
//! Records carry local wall-clock timestamps without a UTC offset, in the
//! form `2025-03-14T09:26:53.589793`. The fixed-width layout means string
//! ordering equals chronological ordering.

use chrono::{DateTime, Local, TimeZone};

/// `strftime` layout for record timestamps (microsecond precision)
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// `strftime` layout used in record filenames
pub const FILENAME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Get current local timestamp
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Source of wall-clock time for components that stamp records
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> DateTime<Local>;
}

/// Clock backed by the local system time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        now()
    }
}

/// Clock that always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// Format a timestamp as an offset-free ISO-8601 string
pub fn to_iso<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(ISO_FORMAT).to_string()
}

/// Format a timestamp for use inside a filename (`yyyyMMdd_HHmmss`)
pub fn to_filename_stamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(FILENAME_FORMAT).to_string()
}
