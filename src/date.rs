//! Defines [`DateFormat`], the pattern used to render post dates on the index
//! page, and [`parse_date`], which reads post dates from source files.

use chrono::{DateTime, NaiveDate, NaiveDateTime, ParseError};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::fmt::{self, Write};

/// The default date pattern, e.g. `April 06, 2021`.
pub const DEFAULT_DATE_FORMAT: &str = "%B %d, %Y";

/// A [`chrono`] `strftime` pattern which is known to be able to format a
/// calendar date. Patterns are checked on construction, so
/// [`DateFormat::format`] can't fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateFormat(String);

impl DateFormat {
    /// Validates `pattern` by formatting a probe date with it. Unknown
    /// specifiers and specifiers a date can't satisfy (hours, time zones,
    /// etc.) are rejected.
    pub fn new(pattern: &str) -> Result<DateFormat> {
        let probe = NaiveDate::from_ymd_opt(2000, 1, 1)
            .ok_or_else(|| Error::InvalidPattern(pattern.to_owned()))?;
        let mut out = String::new();
        write!(out, "{}", probe.format(pattern))
            .map_err(|_| Error::InvalidPattern(pattern.to_owned()))?;
        Ok(DateFormat(pattern.to_owned()))
    }

    /// Formats `date` with this pattern.
    pub fn format(&self, date: &NaiveDate) -> String {
        date.format(&self.0).to_string()
    }

    pub fn pattern(&self) -> &str {
        &self.0
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        DateFormat(DEFAULT_DATE_FORMAT.to_owned())
    }
}

impl std::str::FromStr for DateFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DateFormat::new(s)
    }
}

impl<'de> Deserialize<'de> for DateFormat {
    fn deserialize<D>(deserializer: D) -> std::result::Result<DateFormat, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse::<DateFormat>()
            .map_err(|e| D::Error::custom(format!("{}", e)))
    }
}

/// Parses a post date. Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, and RFC
/// 3339 timestamps. Timestamps are reduced to their date in their own offset.
pub fn parse_date(s: &str) -> std::result::Result<NaiveDate, ParseError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.naive_local().date()))
}

/// Deserializes a date string with [`parse_date`]. For use with
/// `#[serde(deserialize_with)]`.
pub fn deserialize_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_date(&s).map_err(|e| D::Error::custom(format!("invalid date `{}`: {}", s, e)))
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem with a date pattern.
#[derive(Debug)]
pub enum Error {
    /// Returned when a pattern can't format a calendar date.
    InvalidPattern(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidPattern(pattern) => {
                write!(f, "invalid date format `{}`", pattern)
            }
        }
    }
}

impl std::error::Error for Error {}
