//! Value transforms applied before a value is interpolated into a clause.
//!
//! Each transform is a plain function from a raw value to its textual
//! representation in the Solr standard query grammar.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::error::{FormatError, TypeError};

/// Characters with operator meaning in the standard query parser.
///
/// `&&` and `||` are covered by escaping each `&` and `|`.
pub const RESERVED_CHARS: &[char] = &[
    '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\',
    '/',
];

/// A value transform: raw value in, clause text out.
pub type Transform = fn(&str) -> String;

/// Wraps a value in double quotes, backslash-escaping every reserved character.
///
/// The parser drops the backslash of any escaped character inside a phrase,
/// so the quoted form selects exactly the original string.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if RESERVED_CHARS.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Reverses [`quote`] following the parser's phrase rules.
///
/// Returns `None` when `quoted` is not a single well-formed phrase.
pub fn unquote(quoted: &str) -> Option<String> {
    let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(chars.next()?),
            '"' => return None,
            _ => out.push(c),
        }
    }
    Some(out)
}

/// Escapes `/` only. Regex bodies keep every other metacharacter.
pub fn escape_slashes(value: &str) -> String {
    value.replace('/', "\\/")
}

/// No transform, for constant literals such as `*`.
pub fn identity(value: &str) -> String {
    value.to_string()
}

/// Parses a value as an integer, truncating decimals.
pub fn integer_coerce(value: &str) -> Result<i64, TypeError> {
    let trimmed = value.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(n);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
            Ok(f.trunc() as i64)
        }
        _ => Err(TypeError::NotAnInteger {
            value: value.to_string(),
        }),
    }
}

/// Parses a value as a boolean (`true`/`false`, case-insensitive).
pub fn boolean_coerce(value: &str) -> Result<bool, TypeError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(TypeError::NotABoolean {
            value: value.to_string(),
        }),
    }
}

/// Values that can be rendered as a Solr timestamp literal.
pub trait SolrDate {
    /// Returns the instant in UTC.
    fn to_utc(&self) -> Result<DateTime<Utc>, FormatError>;
}

impl<Tz: TimeZone> SolrDate for DateTime<Tz> {
    fn to_utc(&self) -> Result<DateTime<Utc>, FormatError> {
        Ok(self.with_timezone(&Utc))
    }
}

impl SolrDate for NaiveDateTime {
    fn to_utc(&self) -> Result<DateTime<Utc>, FormatError> {
        Ok(self.and_utc())
    }
}

impl SolrDate for NaiveDate {
    fn to_utc(&self) -> Result<DateTime<Utc>, FormatError> {
        Ok(self.and_time(chrono::NaiveTime::MIN).and_utc())
    }
}

impl SolrDate for str {
    fn to_utc(&self) -> Result<DateTime<Utc>, FormatError> {
        parse_date(self)
    }
}

impl SolrDate for &str {
    fn to_utc(&self) -> Result<DateTime<Utc>, FormatError> {
        parse_date(self)
    }
}

impl SolrDate for String {
    fn to_utc(&self) -> Result<DateTime<Utc>, FormatError> {
        parse_date(self)
    }
}

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

fn parse_date(value: &str) -> Result<DateTime<Utc>, FormatError> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return SolrDate::to_utc(&date);
    }

    Err(FormatError::InvalidDate {
        value: value.to_string(),
    })
}

/// Renders a date/time as a Solr timestamp (`YYYY-MM-DDThh:mm:ss[.fff]Z`).
pub fn date_format<D: SolrDate + ?Sized>(value: &D) -> Result<String, FormatError> {
    let utc = value.to_utc()?;
    Ok(utc.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}
