use chrono::{Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Layout of the observation timestamp: `MM-DD-YYYY hh:mm:ss`, 24-hour.
pub const TIMESTAMP_FORMAT: &str = "%m-%d-%Y %H:%M:%S";

/// A source of the current wall-clock time.
///
/// Any `Fn() -> NaiveDateTime` closure is a clock, which keeps tests
/// deterministic without a dedicated type.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

impl<F> Clock for F
where
    F: Fn() -> NaiveDateTime,
{
    fn now(&self) -> NaiveDateTime {
        self()
    }
}

/// Which wall clock the server stamps matches with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemClock {
    #[default]
    Local,
    Utc,
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        match self {
            Self::Local => Local::now().naive_local(),
            Self::Utc => Utc::now().naive_utc(),
        }
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Formats an instant the way it is stored and returned to clients.
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
