//! Time-of-day for recurring deliveries, stored as `HH:MM`.

use core::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`DeliveryTime`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("delivery time must be HH:MM (24-hour), got {0:?}")]
pub struct DeliveryTimeError(pub String);

/// Hour and minute of a recurring delivery.
///
/// ```
/// use quickcart_core::DeliveryTime;
///
/// let t: DeliveryTime = "08:00".parse().unwrap();
/// assert_eq!(t.to_string(), "08:00");
/// assert!("25:00".parse::<DeliveryTime>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeliveryTime(NaiveTime);

impl DeliveryTime {
    /// Build from an hour (0-23) and minute (0-59).
    #[must_use]
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    #[must_use]
    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    #[must_use]
    pub fn minute(self) -> u32 {
        self.0.minute()
    }
}

impl Default for DeliveryTime {
    /// 08:00, the preselected time on the recurring-orders form.
    fn default() -> Self {
        Self(NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default())
    }
}

impl fmt::Display for DeliveryTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

impl std::str::FromStr for DeliveryTime {
    type Err = DeliveryTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(Self)
            .map_err(|_| DeliveryTimeError(s.to_owned()))
    }
}

impl Serialize for DeliveryTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DeliveryTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_eight_am() {
        assert_eq!(DeliveryTime::default().to_string(), "08:00");
    }

    #[test]
    fn test_serde_uses_hh_mm() {
        let t = DeliveryTime::from_hm(18, 5).unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"18:05\"");
        let parsed: DeliveryTime = serde_json::from_str("\"18:05\"").unwrap();
        assert_eq!(parsed, t);
        assert!(serde_json::from_str::<DeliveryTime>("\"6pm\"").is_err());
    }

    #[test]
    fn test_from_hm_bounds() {
        assert!(DeliveryTime::from_hm(23, 59).is_some());
        assert!(DeliveryTime::from_hm(24, 0).is_none());
    }
}
