//! Field-level validation rules.
//!
//! Every rule is a pure function returning a [`RuleResult`]: `Ok(())` when the
//! value is acceptable, or `Err(message)` carrying the text the form shows
//! under the field. Rules never panic and never log; callers decide what to do
//! with the message.
//!
//! # Rules
//!
//! | Rule                         | Accepts                                   | Message                       |
//! |------------------------------|-------------------------------------------|-------------------------------|
//! | [`required`]                 | see [`RuleValue`]                         | `Required`                    |
//! | [`email_rule`]               | `^\S+@\S+\.\S+$`                          | `Enter a valid email`         |
//! | [`phone_rule`]               | exactly 10 digits after stripping         | `Enter 10-digit phone`        |
//! | [`fax_rule`]                 | empty, or exactly 10 digits               | `Enter 10-digit fax`          |
//! | [`zip_rule`]                 | `12345` or `12345-6789`                   | `ZIP 12345 or 12345-6789`     |
//! | [`ssn_rule`]                 | `123-45-6789`                             | `SSN 000-00-0000`             |
//! | [`positive_rule`]            | `None` or a value `>= 0`                  | `Must be ≥ 0`                 |
//! | [`one_of_required`]          | at least one of two non-blank strings     | `Provide {a} or {b}`          |
//! | [`min_items`]                | at least `n` items                        | `At least {n} items`          |
//! | [`non_empty_for_each_key`]   | a non-blank value for every key           | `Enter value for {key}`       |
//! | [`year_rule`]                | current year − 18 ..= current year + 1    | `Year must be between …`      |
//! | [`month_rule`]               | 1 ..= 12                                  | `Month must be 1–12`          |
//! | [`day_rule`]                 | 1 ..= 31 (no calendar cross-check)        | `Day must be 1–31`            |
//!
//! # Example
//!
//! ```
//! use credit_core::validation::{phone_rule, required, zip_rule};
//!
//! assert_eq!(zip_rule("12345-6789"), Ok(()));
//! assert_eq!(phone_rule("(555) 123-4567"), Ok(()));
//!
//! // A `false` checkbox is not an answer.
//! assert_eq!(required(false), Err("Required".to_string()));
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Outcome of a single rule: `Ok(())` or the message to display.
pub type RuleResult = Result<(), String>;

const REQUIRED: &str = "Required";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern compiles"));

static ZIP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("zip pattern compiles"));

static SSN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}-\d{2}-\d{4}$").expect("ssn pattern compiles"));

/// The closed set of value kinds [`required`] knows how to judge.
///
/// Each kind has its own notion of "filled in":
///
/// | Kind       | Passes when                                            |
/// |------------|--------------------------------------------------------|
/// | `Text`     | non-empty after trimming                               |
/// | `Number`   | finite (`NaN` and infinities fail)                     |
/// | `Flag`     | exactly `true`: a required *checkbox*, not a required field |
/// | `Sequence` | at least one element                                   |
/// | `Instant`  | the text parses as a date or date-time                 |
/// | `Wrapped`  | the inner value passes; a wrapper holding nothing passes |
/// | `Absent`   | never                                                  |
///
/// The `Flag` row is the one that trips people up: `required(false)` is an
/// error, because a required boolean in this form is always an
/// acknowledgement the applicant has to tick.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleValue<'a> {
    Text(&'a str),
    Number(f64),
    Flag(bool),
    /// Length of a list-valued field.
    Sequence(usize),
    /// Raw date text, judged by whether it parses.
    Instant(&'a str),
    Wrapped(Option<Box<RuleValue<'a>>>),
    Absent,
}

impl<'a> RuleValue<'a> {
    /// Wraps a value the way a UI binding wraps a field model.
    pub fn wrapped(inner: impl Into<RuleValue<'a>>) -> Self {
        Self::Wrapped(Some(Box::new(inner.into())))
    }

    /// Numeric view used by the date-component rules.
    ///
    /// Numbers are taken as-is. Text is trimmed; blank text reads as zero,
    /// anything else must parse as a float. Every other kind is not a number.
    fn to_number(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse().unwrap_or(f64::NAN)
                }
            }
            _ => f64::NAN,
        }
    }
}

impl<'a> From<&'a str> for RuleValue<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for RuleValue<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value.as_str())
    }
}

impl From<f64> for RuleValue<'_> {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for RuleValue<'_> {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for RuleValue<'_> {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<Decimal> for RuleValue<'_> {
    fn from(value: Decimal) -> Self {
        Self::Number(value.to_f64().unwrap_or(f64::NAN))
    }
}

impl From<bool> for RuleValue<'_> {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl<'a, T> From<&'a [T]> for RuleValue<'a> {
    fn from(value: &'a [T]) -> Self {
        Self::Sequence(value.len())
    }
}

impl<'a, T> From<&'a Vec<T>> for RuleValue<'a> {
    fn from(value: &'a Vec<T>) -> Self {
        Self::Sequence(value.len())
    }
}

impl<'a, T> From<Option<T>> for RuleValue<'a>
where
    T: Into<RuleValue<'a>>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

/// Returns `true` if `text` parses as an RFC 3339 timestamp, an ISO date
/// or date-time, or a US `month/day/year` date.
pub fn parses_as_instant(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }
    DateTime::parse_from_rfc3339(text).is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M").is_ok()
        || NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
        || NaiveDate::parse_from_str(text, "%m/%d/%Y").is_ok()
}

/// Checks that a value has been provided. See [`RuleValue`] for the rule per kind.
pub fn required<'a>(value: impl Into<RuleValue<'a>>) -> RuleResult {
    let value: RuleValue<'a> = value.into();
    let filled = match value {
        RuleValue::Text(s) => !s.trim().is_empty(),
        RuleValue::Number(n) => n.is_finite(),
        RuleValue::Flag(b) => b,
        RuleValue::Sequence(len) => len > 0,
        RuleValue::Instant(s) => parses_as_instant(s),
        RuleValue::Wrapped(Some(inner)) => return required(*inner),
        RuleValue::Wrapped(None) => true,
        RuleValue::Absent => false,
    };
    if filled { Ok(()) } else { Err(REQUIRED.to_string()) }
}

/// Loose email shape check: something, `@`, something, `.`, something.
pub fn email_rule(value: &str) -> RuleResult {
    if EMAIL_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err("Enter a valid email".to_string())
    }
}

fn digit_count(value: &str) -> usize {
    value.chars().filter(char::is_ascii_digit).count()
}

/// Accepts any punctuation as long as exactly ten digits remain.
pub fn phone_rule(value: &str) -> RuleResult {
    if digit_count(value) == 10 {
        Ok(())
    } else {
        Err("Enter 10-digit phone".to_string())
    }
}

/// Like [`phone_rule`], but an empty fax number is fine.
pub fn fax_rule(value: &str) -> RuleResult {
    if value.is_empty() || digit_count(value) == 10 {
        Ok(())
    } else {
        Err("Enter 10-digit fax".to_string())
    }
}

pub fn zip_rule(value: &str) -> RuleResult {
    if ZIP_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err("ZIP 12345 or 12345-6789".to_string())
    }
}

/// Requires the dashed form; bare digits are not reformatted here.
pub fn ssn_rule(value: &str) -> RuleResult {
    if SSN_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err("SSN 000-00-0000".to_string())
    }
}

/// An unset amount passes; a set amount must not be negative.
pub fn positive_rule(value: Option<Decimal>) -> RuleResult {
    match value {
        Some(amount) if amount < Decimal::ZERO => Err("Must be ≥ 0".to_string()),
        _ => Ok(()),
    }
}

/// Builds a rule over two optional strings that passes when at least one of
/// them is non-blank.
///
/// ```
/// use credit_core::validation::one_of_required;
///
/// let contact = one_of_required("email", "phone");
/// assert_eq!(contact(None, Some("555-1234")), Ok(()));
/// assert_eq!(contact(Some(" "), None), Err("Provide email or phone".to_string()));
/// ```
pub fn one_of_required(
    label_a: &str,
    label_b: &str,
) -> impl Fn(Option<&str>, Option<&str>) -> RuleResult {
    let message = format!("Provide {label_a} or {label_b}");
    move |a: Option<&str>, b: Option<&str>| {
        let filled = |v: Option<&str>| v.is_some_and(|s| !s.trim().is_empty());
        if filled(a) || filled(b) {
            Ok(())
        } else {
            Err(message.clone())
        }
    }
}

/// Builds a rule requiring a list to hold at least `n` items.
pub fn min_items<T>(n: usize) -> impl Fn(&[T]) -> RuleResult {
    move |items: &[T]| {
        if items.len() >= n {
            Ok(())
        } else {
            Err(format!("At least {n} items"))
        }
    }
}

/// Requires a non-blank entry in `map` for every key, reporting the first
/// key that is missing.
pub fn non_empty_for_each_key<I>(
    map: &BTreeMap<String, String>,
    keys: I,
) -> RuleResult
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    for key in keys {
        let key = key.as_ref();
        match map.get(key) {
            Some(value) if !value.trim().is_empty() => {}
            _ => return Err(format!("Enter value for {key}")),
        }
    }
    Ok(())
}

/// Checks a year against a window around today's year.
///
/// The window is read from the local clock on every call, so a long-lived
/// form does not go stale across New Year. Use [`year_rule_in`] when the
/// reference year must be fixed.
pub fn year_rule<'a>(value: impl Into<RuleValue<'a>>) -> RuleResult {
    year_rule_in(value, Local::now().year())
}

/// Checks that `value` falls within `current_year - 18 ..= current_year + 1`.
pub fn year_rule_in<'a>(
    value: impl Into<RuleValue<'a>>,
    current_year: i32,
) -> RuleResult {
    let value: RuleValue<'a> = value.into();
    let year = value.to_number();
    let min = current_year - 18;
    let max = current_year + 1;

    if !year.is_finite() {
        return Err("Enter a year".to_string());
    }
    if year < f64::from(min) || year > f64::from(max) {
        return Err(format!("Year must be between {min} and {max}"));
    }
    Ok(())
}

pub fn month_rule<'a>(value: impl Into<RuleValue<'a>>) -> RuleResult {
    let value: RuleValue<'a> = value.into();
    let month = value.to_number();

    if !month.is_finite() {
        return Err("Enter a month".to_string());
    }
    if !(1.0..=12.0).contains(&month) {
        return Err("Month must be 1–12".to_string());
    }
    Ok(())
}

/// Accepts 1–31 for every month; February 30th passes.
pub fn day_rule<'a>(value: impl Into<RuleValue<'a>>) -> RuleResult {
    let value: RuleValue<'a> = value.into();
    let day = value.to_number();

    if !day.is_finite() {
        return Err("Enter a day".to_string());
    }
    if !(1.0..=31.0).contains(&day) {
        return Err("Day must be 1–31".to_string());
    }
    Ok(())
}
