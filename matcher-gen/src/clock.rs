use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Where the generation timestamp comes from.
pub trait TimeSource {
    fn now(&self) -> OffsetDateTime;
}

/// The current UTC time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Always the same instant. Makes output reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub OffsetDateTime);

impl TimeSource for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

pub fn format_timestamp(at: OffsetDateTime) -> Result<String, time::error::Format> {
    at.format(&Rfc3339)
}
