//! Request parameter accumulation.
//!
//! [`Params`] is an immutable parameter set: every operation returns a new
//! set and leaves the receiver untouched, so a partially built query can be
//! branched freely. Multi-valued parameters (`fq`) accumulate in issue order;
//! everything else is last-write-wins.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{SolrResult, TypeError, ValidationError};
use crate::query::value::{boolean_coerce, integer_coerce};

/// Parameter names understood by this crate.
pub mod names {
    /// Main query.
    pub const Q: &str = "q";
    /// Filter queries (multi-valued).
    pub const FQ: &str = "fq";
    /// Field list.
    pub const FL: &str = "fl";
    /// Sort criteria.
    pub const SORT: &str = "sort";
    /// Result offset.
    pub const START: &str = "start";
    /// Page size.
    pub const ROWS: &str = "rows";
    /// Query parser.
    pub const DEF_TYPE: &str = "defType";
    /// Debug output.
    pub const DEBUG: &str = "debug";
    /// Parameter echoing in the response header.
    pub const ECHO_PARAMS: &str = "echoParams";
    /// Filter cache toggle.
    pub const CACHE: &str = "cache";
    /// Early segment termination.
    pub const SEGMENT_TERMINATE_EARLY: &str = "segmentTerminateEarly";
    /// Server-side time budget in milliseconds.
    pub const TIME_ALLOWED: &str = "timeAllowed";
    /// Documents to explain against the main query.
    pub const EXPLAIN_OTHER: &str = "explainOther";
    /// Response header suppression.
    pub const OMIT_HEADER: &str = "omitHeader";
    /// Hit count accuracy threshold.
    pub const MIN_EXACT_COUNT: &str = "minExactCount";
    /// Cursor token.
    pub const CURSOR_MARK: &str = "cursorMark";
    /// Hard commit after the update.
    pub const COMMIT: &str = "commit";
    /// Commit deadline in milliseconds.
    pub const COMMIT_WITHIN: &str = "commitWithin";
    /// Replace documents with the same unique key.
    pub const OVERWRITE: &str = "overwrite";
    /// Merge away deleted documents on commit.
    pub const EXPUNGE_DELETES: &str = "expungeDeletes";
    /// Block until a new searcher is open.
    pub const WAIT_SEARCHER: &str = "waitSearcher";
}

/// Allowed values of `debug`.
pub const DEBUG_SETTINGS: &[&str] = &["query", "timing", "results", "all", "true"];

/// Allowed values of `echoParams`.
pub const ECHO_PARAMS_SETTINGS: &[&str] = &["explicit", "all", "none"];

/// A stored parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer option.
    Integer(i64),
    /// Free-form string.
    Text(String),
    /// Single-valued list, joined when flattened.
    List(Vec<String>),
    /// Multi-valued parameter, repeated when flattened.
    Multi(Vec<String>),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Integer(n) => write!(f, "{}", n),
            ParamValue::Text(s) => write!(f, "{}", s),
            ParamValue::List(vs) | ParamValue::Multi(vs) => write!(f, "{}", vs.join(",")),
        }
    }
}

/// An uncoerced input value for [`Params::set_single`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    /// Boolean input.
    Bool(bool),
    /// Integer input.
    Integer(i64),
    /// String input, coerced by the parameter's rules.
    Text(String),
    /// List input for joined parameters.
    List(Vec<String>),
    /// Absent value; clears the parameter.
    Null,
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Integer(n) => write!(f, "{}", n),
            Scalar::Text(s) => write!(f, "{}", s),
            Scalar::List(vs) => write!(f, "{}", vs.join(",")),
            Scalar::Null => Ok(()),
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Integer(v)
    }
}

impl From<u32> for Scalar {
    fn from(v: u32) -> Self {
        Scalar::Integer(i64::from(v))
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

impl From<Vec<String>> for Scalar {
    fn from(v: Vec<String>) -> Self {
        Scalar::List(v)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Scalar::Null)
    }
}

/// How a single-valued parameter coerces its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// `true`/`false`.
    Bool,
    /// Integer, truncating numeric strings.
    Integer,
    /// Integer that may be absent.
    OptionalInteger,
    /// Any string.
    Text,
    /// List joined with the given separator.
    Joined(&'static str),
    /// One of a fixed set of strings.
    Enum(&'static [&'static str]),
}

impl Coercion {
    /// Returns the coercion for a known single-valued parameter.
    pub fn for_parameter(name: &str) -> Option<Coercion> {
        use names::*;

        let coercion = match name {
            CACHE | SEGMENT_TERMINATE_EARLY | OMIT_HEADER | COMMIT | OVERWRITE
            | EXPUNGE_DELETES | WAIT_SEARCHER => Coercion::Bool,
            TIME_ALLOWED | START | ROWS | MIN_EXACT_COUNT => Coercion::Integer,
            COMMIT_WITHIN => Coercion::OptionalInteger,
            DEF_TYPE | EXPLAIN_OTHER | CURSOR_MARK => Coercion::Text,
            Q => Coercion::Joined(" "),
            SORT | FL => Coercion::Joined(","),
            DEBUG => Coercion::Enum(DEBUG_SETTINGS),
            ECHO_PARAMS => Coercion::Enum(ECHO_PARAMS_SETTINGS),
            _ => return None,
        };
        Some(coercion)
    }

    /// Coerces `value` for parameter `name`. `Ok(None)` means "clear the parameter".
    pub fn apply(&self, name: &str, value: Scalar) -> SolrResult<Option<ParamValue>> {
        if value == Scalar::Null {
            return Ok(None);
        }

        let coerced = match (self, value) {
            (Coercion::Bool, Scalar::Bool(b)) => ParamValue::Bool(b),
            (Coercion::Bool, Scalar::Text(s)) => ParamValue::Bool(boolean_coerce(&s)?),
            (Coercion::Bool, other) => {
                return Err(TypeError::NotABoolean {
                    value: other.to_string(),
                }
                .into());
            }

            (Coercion::Integer | Coercion::OptionalInteger, Scalar::Integer(n)) => {
                ParamValue::Integer(n)
            }
            (Coercion::Integer | Coercion::OptionalInteger, Scalar::Text(s)) => {
                ParamValue::Integer(integer_coerce(&s)?)
            }
            (Coercion::Integer | Coercion::OptionalInteger, other) => {
                return Err(TypeError::NotAnInteger {
                    value: other.to_string(),
                }
                .into());
            }

            (Coercion::Text, other) => ParamValue::Text(other.to_string()),

            (Coercion::Joined(_), Scalar::List(vs)) => ParamValue::List(vs),
            (Coercion::Joined(_), other) => ParamValue::List(vec![other.to_string()]),

            (Coercion::Enum(allowed), other) => {
                let text = other.to_string();
                if !allowed.contains(&text.as_str()) {
                    return Err(ValidationError::InvalidOption {
                        parameter: name.to_string(),
                        value: text,
                        allowed: allowed.join(", "),
                    }
                    .into());
                }
                ParamValue::Text(text)
            }
        };
        Ok(Some(coerced))
    }
}

/// Separator used when a single-valued list is flattened.
fn list_separator(name: &str) -> &'static str {
    match Coercion::for_parameter(name) {
        Some(Coercion::Joined(sep)) => sep,
        _ => ",",
    }
}

/// An immutable request parameter set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Params {
    values: BTreeMap<String, ParamValue>,
}

impl Params {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Returns true if `name` is set.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns true if no parameter is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the number of distinct parameter names.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterates over parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the values of a list-like parameter, or a scalar as one value.
    pub fn values_of(&self, name: &str) -> Vec<String> {
        match self.values.get(name) {
            Some(ParamValue::List(vs)) | Some(ParamValue::Multi(vs)) => vs.clone(),
            Some(other) => vec![other.to_string()],
            None => Vec::new(),
        }
    }

    /// Appends `values` to the multi-valued parameter `name`.
    ///
    /// Values already stored under `name` are kept ahead of the new ones.
    pub fn set_multi_valued<I, S>(&self, name: &str, values: I) -> Params
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut combined = match self.values.get(name) {
            Some(ParamValue::Multi(existing)) | Some(ParamValue::List(existing)) => {
                existing.clone()
            }
            Some(other) => vec![other.to_string()],
            None => Vec::new(),
        };
        combined.extend(values.into_iter().map(Into::into));
        self.with_value(name, ParamValue::Multi(combined))
    }

    /// Sets a known single-valued parameter, coercing and validating the value.
    ///
    /// # Errors
    ///
    /// * `ValidationError::UnknownParameter` - `name` has no known coercion
    /// * `ValidationError::InvalidOption` - value outside an enumerated domain
    /// * `TypeError` - value not coercible to a boolean/integer
    pub fn set_single(&self, name: &str, value: impl Into<Scalar>) -> SolrResult<Params> {
        let coercion =
            Coercion::for_parameter(name).ok_or_else(|| ValidationError::UnknownParameter {
                name: name.to_string(),
            })?;
        Ok(match coercion.apply(name, value.into())? {
            Some(coerced) => self.with_value(name, coerced),
            None => self.without(name),
        })
    }

    /// Stores an already-typed value, replacing any previous one.
    pub fn with_value(&self, name: &str, value: ParamValue) -> Params {
        let mut values = self.values.clone();
        values.insert(name.to_string(), value);
        Params { values }
    }

    /// Removes `name`.
    pub fn without(&self, name: &str) -> Params {
        let mut values = self.values.clone();
        values.remove(name);
        Params { values }
    }

    /// Combines two sets. Multi-valued parameters concatenate (self first);
    /// for everything else `other` wins.
    pub fn merge(&self, other: &Params) -> Params {
        let mut values = self.values.clone();
        for (name, incoming) in &other.values {
            let merged = match (values.get(name), incoming) {
                (Some(ParamValue::Multi(existing)), ParamValue::Multi(more)) => {
                    let mut all = existing.clone();
                    all.extend(more.iter().cloned());
                    ParamValue::Multi(all)
                }
                _ => incoming.clone(),
            };
            values.insert(name.clone(), merged);
        }
        Params { values }
    }

    /// Flattens the set into transport-ready `(name, value)` pairs.
    ///
    /// Lists are joined (space for `q`, comma for `fl`/`sort`), multi-valued
    /// parameters repeat their key once per value in issue order.
    pub fn to_request_params(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.values.len());
        for (name, value) in &self.values {
            match value {
                ParamValue::Multi(vs) => {
                    pairs.extend(vs.iter().map(|v| (name.clone(), v.clone())));
                }
                ParamValue::List(vs) => {
                    pairs.push((name.clone(), vs.join(list_separator(name))));
                }
                other => pairs.push((name.clone(), other.to_string())),
            }
        }
        pairs
    }
}
