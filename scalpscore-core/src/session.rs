//! Session classification: maps an exchange-local timestamp to a coarse
//! intraday phase, plus the allow-flags used for time-of-day gating.

use chrono::{Datelike, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::SessionTag;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session boundaries must be strictly increasing: {0}")]
    Unordered(String),
}

/// Pure, total classifier. Timestamps are exchange-local.
pub trait SessionClassifier: Send + Sync {
    fn classify(&self, timestamp: NaiveDateTime) -> SessionTag;
}

impl<F> SessionClassifier for F
where
    F: Fn(NaiveDateTime) -> SessionTag + Send + Sync,
{
    fn classify(&self, timestamp: NaiveDateTime) -> SessionTag {
        self(timestamp)
    }
}

/// Phase boundaries as half-open intervals:
/// OPENING [opening_start, midday_start), MIDDAY [midday_start, power_start),
/// POWER [power_start, close).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindows {
    pub opening_start: NaiveTime,
    pub midday_start: NaiveTime,
    pub power_start: NaiveTime,
    pub close: NaiveTime,
}

impl SessionWindows {
    pub fn validate(&self) -> Result<(), SessionError> {
        let ordered = self.opening_start < self.midday_start
            && self.midday_start < self.power_start
            && self.power_start < self.close;
        if ordered {
            Ok(())
        } else {
            Err(SessionError::Unordered(format!(
                "{} < {} < {} < {}",
                self.opening_start, self.midday_start, self.power_start, self.close
            )))
        }
    }
}

impl Default for SessionWindows {
    /// US equities regular hours.
    fn default() -> Self {
        Self {
            opening_start: hm(9, 30),
            midday_start: hm(11, 0),
            power_start: hm(15, 0),
            close: hm(16, 0),
        }
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// Regular-trading-hours classifier. Weekends are always OFF.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegularHours {
    windows: SessionWindows,
}

impl RegularHours {
    pub fn new(windows: SessionWindows) -> Result<Self, SessionError> {
        windows.validate()?;
        Ok(Self { windows })
    }

    pub fn windows(&self) -> &SessionWindows {
        &self.windows
    }
}

impl SessionClassifier for RegularHours {
    fn classify(&self, timestamp: NaiveDateTime) -> SessionTag {
        if matches!(timestamp.weekday(), Weekday::Sat | Weekday::Sun) {
            return SessionTag::Off;
        }
        let t = timestamp.time();
        let w = &self.windows;
        if t < w.opening_start || t >= w.close {
            SessionTag::Off
        } else if t < w.midday_start {
            SessionTag::Opening
        } else if t < w.power_start {
            SessionTag::Midday
        } else {
            SessionTag::Power
        }
    }
}

/// Which sessions may produce a signal. OFF is never allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionFilter {
    pub allow_opening: bool,
    pub allow_midday: bool,
    pub allow_power: bool,
}

impl SessionFilter {
    pub fn all() -> Self {
        Self {
            allow_opening: true,
            allow_midday: true,
            allow_power: true,
        }
    }

    pub fn allows(&self, session: SessionTag) -> bool {
        match session {
            SessionTag::Opening => self.allow_opening,
            SessionTag::Midday => self.allow_midday,
            SessionTag::Power => self.allow_power,
            SessionTag::Off => false,
        }
    }
}

impl Default for SessionFilter {
    fn default() -> Self {
        Self {
            allow_opening: true,
            allow_midday: false,
            allow_power: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// 2024-03-05 is a Tuesday.
    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn regular_hours_boundaries() {
        let c = RegularHours::default();
        assert_eq!(c.classify(at(9, 29)), SessionTag::Off);
        assert_eq!(c.classify(at(9, 30)), SessionTag::Opening);
        assert_eq!(c.classify(at(10, 59)), SessionTag::Opening);
        assert_eq!(c.classify(at(11, 0)), SessionTag::Midday);
        assert_eq!(c.classify(at(14, 59)), SessionTag::Midday);
        assert_eq!(c.classify(at(15, 0)), SessionTag::Power);
        assert_eq!(c.classify(at(15, 59)), SessionTag::Power);
        assert_eq!(c.classify(at(16, 0)), SessionTag::Off);
    }

    #[test]
    fn weekend_is_off() {
        let saturday = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(RegularHours::default().classify(saturday), SessionTag::Off);
    }

    #[test]
    fn unordered_windows_rejected() {
        let windows = SessionWindows {
            midday_start: hm(9, 0),
            ..SessionWindows::default()
        };
        assert!(RegularHours::new(windows).is_err());
    }

    #[test]
    fn closures_are_classifiers() {
        let always_midday = |_: NaiveDateTime| SessionTag::Midday;
        assert_eq!(always_midday.classify(at(3, 0)), SessionTag::Midday);
    }

    #[test]
    fn default_filter_blocks_midday_and_off() {
        let f = SessionFilter::default();
        assert!(f.allows(SessionTag::Opening));
        assert!(!f.allows(SessionTag::Midday));
        assert!(f.allows(SessionTag::Power));
        assert!(!f.allows(SessionTag::Off));
        assert!(!SessionFilter::all().allows(SessionTag::Off));
    }
}
