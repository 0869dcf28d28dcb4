use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::error::TableError;

/// Per-render inputs that are not part of the rows themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    timezone: Tz,
    now: DateTime<Utc>,
}

impl RenderContext {
    /// Context for rendering right now in `timezone`.
    pub fn new(timezone: Tz) -> Self {
        Self::at(timezone, Utc::now())
    }

    /// Context pinned to a fixed "now".
    pub fn at(timezone: Tz, now: DateTime<Utc>) -> Self {
        Self { timezone, now }
    }

    /// Pick the display timezone: explicit, then ambient, then UTC.
    pub fn resolve(explicit: Option<Tz>, ambient: Option<Tz>) -> Self {
        Self::new(explicit.or(ambient).unwrap_or(Tz::UTC))
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

/// Parse an IANA timezone name such as `Europe/Berlin`.
pub fn parse_timezone(name: &str) -> Result<Tz, TableError> {
    Tz::from_str(name.trim())
        .map_err(|err| TableError::UnknownTimezone(format!("{name} ({err})")))
}
