//! Typed setting values and the wall-clock time-of-day type.

use std::fmt;
use std::str::FromStr;

use serde_json::Value as Json;

use crate::color::HexColor;
use crate::settings::schema::SettingType;

/// A time of day on a 24-hour clock, minute precision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    /// Builds a time of day, or `None` when hour/minute fall outside the
    /// 24-hour clock.
    pub const fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self { hour, minute })
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("expected a HH:MM time of day")]
pub struct ParseTimeError(());

impl FromStr for TimeOfDay {
    type Err = ParseTimeError;

    /// Parses `HH:MM`; a single-digit hour is accepted, the minute must be
    /// two digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hours, minutes) = s.split_once(':').ok_or(ParseTimeError(()))?;
        if minutes.len() != 2 {
            return Err(ParseTimeError(()));
        }
        let hour: u8 = hours.parse().map_err(|_| ParseTimeError(()))?;
        let minute: u8 = minutes.parse().map_err(|_| ParseTimeError(()))?;
        Self::new(hour, minute).ok_or(ParseTimeError(()))
    }
}

/// A validated value for one setting leaf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettingValue {
    Int(i64),
    Color(HexColor),
    Time(TimeOfDay),
    /// Explicitly unset; only valid for nullable leaves.
    Null,
}

impl SettingValue {
    /// Converts a persisted JSON value into a typed value, checking it
    /// against the leaf's declared type. Returns `None` on a type mismatch.
    pub fn from_json(ty: SettingType, json: &Json) -> Option<Self> {
        match (ty, json) {
            (_, Json::Null) => Some(Self::Null),
            (SettingType::Int, Json::Number(n)) => n.as_i64().map(Self::Int),
            (SettingType::Color, Json::String(s)) => s.parse().ok().map(Self::Color),
            (SettingType::Time, Json::String(s)) => s.parse().ok().map(Self::Time),
            _ => None,
        }
    }

    /// The JSON representation stored in a game's override tree.
    pub fn to_json(&self) -> Json {
        match self {
            Self::Int(v) => Json::from(*v),
            Self::Color(c) => Json::from(c.to_string()),
            Self::Time(t) => Json::from(t.to_string()),
            Self::Null => Json::Null,
        }
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_time(&self) -> Option<TimeOfDay> {
        match self {
            Self::Time(t) => Some(*t),
            _ => None,
        }
    }

    pub const fn as_color(&self) -> Option<HexColor> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Color(c) => write!(f, "{c}"),
            Self::Time(t) => write!(f, "{t}"),
            Self::Null => write!(f, "null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_of_day_parses_and_bounds_checks() {
        assert_eq!(
            "9:30".parse::<TimeOfDay>().unwrap(),
            TimeOfDay { hour: 9, minute: 30 }
        );
        assert_eq!("23:59".parse::<TimeOfDay>().unwrap().to_string(), "23:59");
        assert!("24:00".parse::<TimeOfDay>().is_err());
        assert!("12:60".parse::<TimeOfDay>().is_err());
        assert!("12:5".parse::<TimeOfDay>().is_err());
        assert!("noon".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn json_round_trip_per_type() {
        let value = SettingValue::Int(42);
        assert_eq!(
            SettingValue::from_json(SettingType::Int, &value.to_json()),
            Some(value)
        );
        let value = SettingValue::Time(TimeOfDay { hour: 12, minute: 0 });
        assert_eq!(
            SettingValue::from_json(SettingType::Time, &value.to_json()),
            Some(value)
        );
    }

    #[test]
    fn json_type_mismatch_is_rejected() {
        assert_eq!(
            SettingValue::from_json(SettingType::Int, &Json::from("three")),
            None
        );
        assert_eq!(
            SettingValue::from_json(SettingType::Color, &Json::from(7)),
            None
        );
    }
}
