//! Calendar month buckets used for expense rollups.

use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month, labelled by its English long name.
///
/// Ordering follows the calendar, so a map keyed by `MonthKey` iterates
/// January through December regardless of insertion order. The year is not
/// part of the key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(u8);

impl MonthKey {
    /// Builds a key from a 1-based month number.
    pub fn from_number(month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self(month as u8))
        } else {
            None
        }
    }

    /// Parses a long month name, ignoring ASCII case.
    pub fn from_label(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        MONTH_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(trimmed))
            .map(|idx| Self(idx as u8 + 1))
    }

    pub fn number(self) -> u32 {
        self.0 as u32
    }

    pub fn label(self) -> &'static str {
        MONTH_NAMES[(self.0 - 1) as usize]
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a month label cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMonth(pub String);

impl fmt::Display for UnknownMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown month `{}`", self.0)
    }
}

impl std::error::Error for UnknownMonth {}

impl FromStr for MonthKey {
    type Err = UnknownMonth;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MonthKey::from_label(s).ok_or_else(|| UnknownMonth(s.to_string()))
    }
}

impl Serialize for MonthKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
