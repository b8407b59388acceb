//! Field Coercion Module
//! Best-effort conversion of single spreadsheet values.
//!
//! Every function here returns a usable value. When the input had to be
//! replaced by a default, the returned [`Coerced`] also carries the reason.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta};
use std::fmt;

/// Excel serial number of 1970-01-01 (1900 date system).
const EXCEL_SERIAL_UNIX_EPOCH: f64 = 25569.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Day-first date layouts, tried in order. Two-digit years come first,
/// since `%Y` would read `90` as the year 90. ISO layouts come last so that
/// `03-04-2020` is the 3rd of April.
const DATE_FORMATS: [&str; 8] = [
    "%d/%m/%y",
    "%d-%m-%y",
    "%d.%m.%y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
];

/// Years below this are treated as typos rather than dates.
const MIN_YEAR: i32 = 1000;

/// Time-of-day suffixes accepted after any date layout. The time is dropped.
const TIME_SUFFIXES: [&str; 3] = [" %H:%M:%S", " %H:%M", "T%H:%M:%S"];

/// Why a value was replaced by its default.
#[derive(Debug, Clone, PartialEq)]
pub enum CoercionIssue {
    /// Text that matches none of the accepted date layouts.
    UnparseableDate(String),
    /// A numeric or boolean cell found where a date was expected.
    NotADate(String),
    /// Text or a non-finite number found where money was expected.
    NotNumeric(String),
}

impl fmt::Display for CoercionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercionIssue::UnparseableDate(raw) => write!(f, "unparseable date {raw:?}"),
            CoercionIssue::NotADate(raw) => write!(f, "{raw} is not a date"),
            CoercionIssue::NotNumeric(raw) => write!(f, "{raw:?} is not numeric"),
        }
    }
}

/// A coerced value plus the issue that forced a default, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced<T> {
    pub value: T,
    pub issue: Option<CoercionIssue>,
}

impl<T> Coerced<T> {
    pub fn clean(value: T) -> Self {
        Self { value, issue: None }
    }

    pub fn defaulted(value: T, issue: CoercionIssue) -> Self {
        Self {
            value,
            issue: Some(issue),
        }
    }
}

/// Parse a date written day-before-month (`15/03/1990`), or in ISO order.
///
/// Two-digit years pivot at 70: `15/03/90` is 1990, `15/03/20` is 2020.
/// Empty text is a missing date, not an error.
pub fn parse_day_first_date(raw: &str) -> Coerced<Option<NaiveDate>> {
    let text = raw.trim();
    if text.is_empty() {
        return Coerced::clean(None);
    }

    match parse_with_layouts(text) {
        Some(date) if date.year() >= MIN_YEAR => Coerced::clean(Some(date)),
        _ => Coerced::defaulted(None, CoercionIssue::UnparseableDate(text.to_string())),
    }
}

fn parse_with_layouts(text: &str) -> Option<NaiveDate> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }

    for format in DATE_FORMATS {
        for suffix in TIME_SUFFIXES {
            let layout = format!("{format}{suffix}");
            if let Ok(datetime) = NaiveDateTime::parse_from_str(text, &layout) {
                return Some(datetime.date());
            }
        }
    }

    None
}

/// Coerce monetary text to a float; anything unusable becomes 0.0.
pub fn coerce_money_text(raw: &str) -> Coerced<f64> {
    let text = raw.trim();
    if text.is_empty() {
        return Coerced::clean(0.0);
    }

    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Coerced::clean(value),
        _ => Coerced::defaulted(0.0, CoercionIssue::NotNumeric(text.to_string())),
    }
}

/// Coerce an already-numeric monetary value; NaN and infinities become 0.0.
pub fn coerce_money_number(value: f64) -> Coerced<f64> {
    if value.is_finite() {
        Coerced::clean(value)
    } else {
        Coerced::defaulted(0.0, CoercionIssue::NotNumeric(value.to_string()))
    }
}

/// Canonicalize a sex/gender code to `M` or `F`.
///
/// Matching is case-insensitive on `M`, `F`, `MASCULINO` and `FEMININO`.
/// Any other value passes through exactly as written, so applying it twice
/// is the same as applying it once.
pub fn canonical_sex_code(raw: &str) -> String {
    match raw.to_uppercase().as_str() {
        "M" | "MASCULINO" => "M".to_string(),
        "F" | "FEMININO" => "F".to_string(),
        _ => raw.to_string(),
    }
}

/// Whole years between two dates as `days / 365`, never negative.
///
/// Leap days are ignored.
pub fn age_in_years(birth: NaiveDate, today: NaiveDate) -> i64 {
    (today - birth).num_days().div_euclid(365).max(0)
}

/// Calendar months between two dates, ignoring the day of month, never negative.
pub fn tenure_in_months(hire: NaiveDate, today: NaiveDate) -> i64 {
    let years = i64::from(today.year() - hire.year());
    let months = i64::from(today.month()) - i64::from(hire.month());
    (years * 12 + months).max(0)
}

/// Days since 1970-01-01, the physical value of a polars `Date`.
pub fn date_to_epoch_days(date: NaiveDate) -> i32 {
    // NaiveDate::default() is 1970-01-01
    (date - NaiveDate::default()).num_days() as i32
}

pub fn epoch_days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::default().checked_add_signed(TimeDelta::try_days(i64::from(days))?)
}

/// Milliseconds since the Unix epoch, the physical value of a polars `Datetime(ms)`.
pub fn datetime_to_epoch_millis(datetime: NaiveDateTime) -> i64 {
    datetime.and_utc().timestamp_millis()
}

pub fn epoch_millis_to_datetime(millis: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}

/// Convert an Excel serial date (1900 system) to a date-time, rounded to the second.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let seconds = ((serial - EXCEL_SERIAL_UNIX_EPOCH) * SECONDS_PER_DAY).round();
    if seconds.abs() > 1e13 {
        return None;
    }
    DateTime::from_timestamp(seconds as i64, 0).map(|dt| dt.naive_utc())
}

/// Convert a date-time to an Excel serial number (1900 system).
pub fn datetime_to_excel_serial(datetime: NaiveDateTime) -> f64 {
    datetime.and_utc().timestamp() as f64 / SECONDS_PER_DAY + EXCEL_SERIAL_UNIX_EPOCH
}

pub fn date_to_excel_serial(date: NaiveDate) -> f64 {
    f64::from(date_to_epoch_days(date)) + EXCEL_SERIAL_UNIX_EPOCH
}
