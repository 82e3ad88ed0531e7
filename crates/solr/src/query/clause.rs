//! Clause construction.
//!
//! Each function takes a field→value mapping (anything iterable over
//! `(field, value)` pairs, so arrays, `Vec`s and maps all work) and returns
//! the rendered clauses in mapping order. The clauses are plain strings that
//! can be joined into `q` or appended to `fq`.

use std::fmt::Display;

use tracing::trace;

use crate::error::{ConfigError, FormatError, TypeError};

use super::template::{Bindings, ExcludeMode, Template};
use super::value::{self, SolrDate, Transform};

/// Open range bound.
pub const WILDCARD: &str = "*";

/// A value to match: one scalar or a sequence of alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// A single value.
    Single(String),
    /// Several alternatives for the same field.
    Many(Vec<String>),
}

impl QueryValue {
    /// Returns the values as a slice-like vector of `&str`.
    pub fn values(&self) -> Vec<&str> {
        match self {
            QueryValue::Single(v) => vec![v.as_str()],
            QueryValue::Many(vs) => vs.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        QueryValue::Single(v.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(v: String) -> Self {
        QueryValue::Single(v)
    }
}

impl From<&String> for QueryValue {
    fn from(v: &String) -> Self {
        QueryValue::Single(v.clone())
    }
}

impl From<i64> for QueryValue {
    fn from(v: i64) -> Self {
        QueryValue::Single(v.to_string())
    }
}

impl From<i32> for QueryValue {
    fn from(v: i32) -> Self {
        QueryValue::Single(v.to_string())
    }
}

impl From<u64> for QueryValue {
    fn from(v: u64) -> Self {
        QueryValue::Single(v.to_string())
    }
}

impl From<bool> for QueryValue {
    fn from(v: bool) -> Self {
        QueryValue::Single(v.to_string())
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(v: Vec<String>) -> Self {
        QueryValue::Many(v)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(v: Vec<&str>) -> Self {
        QueryValue::Many(v.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for QueryValue {
    fn from(v: &[&str]) -> Self {
        QueryValue::Many(v.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for QueryValue {
    fn from(v: [&str; N]) -> Self {
        QueryValue::Many(v.iter().map(|s| s.to_string()).collect())
    }
}

fn render(template: Template, field: &str, value: &str, transform: Transform) -> String {
    let transformed = transform(value);
    let clause = template.render(&Bindings::field_value(field, &transformed));
    trace!(template = %template, clause = %clause, "rendered clause");
    clause
}

fn render_each<I, F, V>(template: Template, mapping: I, transform: Transform) -> Vec<String>
where
    I: IntoIterator<Item = (F, V)>,
    F: AsRef<str>,
    V: Into<QueryValue>,
{
    mapping
        .into_iter()
        .flat_map(|(field, value)| {
            let value: QueryValue = value.into();
            value
                .values()
                .into_iter()
                .map(|v| render(template, field.as_ref(), v, transform))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Equality clauses.
///
/// A scalar renders `field:"value"`. A sequence of more than one value
/// renders a single disjunction over the field with every value quoted and
/// space-separated. A one-element sequence renders like a scalar and an
/// empty sequence renders nothing.
pub fn equals<I, F, V>(mapping: I) -> Vec<String>
where
    I: IntoIterator<Item = (F, V)>,
    F: AsRef<str>,
    V: Into<QueryValue>,
{
    mapping
        .into_iter()
        .filter_map(|(field, value)| {
            let field = field.as_ref();
            match Into::<QueryValue>::into(value) {
                QueryValue::Single(v) => Some(render(Template::Standard, field, &v, value::quote)),
                QueryValue::Many(vs) => match vs.as_slice() {
                    [] => None,
                    [v] => Some(render(Template::Standard, field, v, value::quote)),
                    _ => {
                        let joined = vs
                            .iter()
                            .map(|v| value::quote(v))
                            .collect::<Vec<_>>()
                            .join(" ");
                        Some(render(
                            Template::Disjunction,
                            field,
                            &joined,
                            value::identity,
                        ))
                    }
                },
            }
        })
        .collect()
}

/// Negation clauses, `-field:"value"`, one per value.
pub fn not_equals<I, F, V>(mapping: I) -> Vec<String>
where
    I: IntoIterator<Item = (F, V)>,
    F: AsRef<str>,
    V: Into<QueryValue>,
{
    render_each(Template::Negation, mapping, value::quote)
}

/// Clauses matching documents where each field has at least one value.
pub fn exists<I, F>(fields: I) -> Vec<String>
where
    I: IntoIterator<Item = F>,
    F: AsRef<str>,
{
    fields
        .into_iter()
        .flat_map(|field| range(field.as_ref(), WILDCARD, WILDCARD, ExcludeMode::None))
        .collect()
}

/// Clauses matching documents where each field has no value.
///
/// This is the negation of the [`exists`] range over the same field.
pub fn not_exists<I, F>(fields: I) -> Vec<String>
where
    I: IntoIterator<Item = F>,
    F: AsRef<str>,
{
    fields
        .into_iter()
        .map(|field| render(Template::NotExist, field.as_ref(), "", value::identity))
        .collect()
}

/// A range clause. Bounds are inserted verbatim; pass [`WILDCARD`] for an open end.
pub fn range(field: &str, from: &str, to: &str, exclude: ExcludeMode) -> Vec<String> {
    let template = exclude.template();
    let clause = template.render(&Bindings::range(field, from, to));
    trace!(template = %template, clause = %clause, "rendered clause");
    vec![clause]
}

/// A range clause with the exclude mode given by name (`none`, `from`, `to`, `both`).
pub fn range_with_mode(
    field: &str,
    from: &str,
    to: &str,
    exclude: &str,
) -> Result<Vec<String>, ConfigError> {
    let mode: ExcludeMode = exclude.parse()?;
    Ok(range(field, from, to, mode))
}

/// A cross-collection join clause.
///
/// Only `value` is quoted; `from`, `to` and `field` are schema field names.
pub fn join(from: &str, to: &str, field: &str, value: &str) -> Vec<String> {
    let quoted = value::quote(value);
    let clause = Template::Join.render(&Bindings {
        field,
        value: &quoted,
        from,
        to,
    });
    trace!(template = %Template::Join, clause = %clause, "rendered clause");
    vec![clause]
}

/// Clauses matching dates up to and including the given date/time.
pub fn before<I, F, D>(mapping: I) -> Result<Vec<String>, FormatError>
where
    I: IntoIterator<Item = (F, D)>,
    F: AsRef<str>,
    D: SolrDate,
{
    let mut clauses = Vec::new();
    for (field, date) in mapping {
        let to = value::date_format(&date)?;
        clauses.extend(range(field.as_ref(), WILDCARD, &to, ExcludeMode::None));
    }
    Ok(clauses)
}

/// Clauses matching dates up to `NOW-<n>DAYS`.
///
/// A negative count looks into the future and renders `NOW+<n>DAYS`.
pub fn before_days<I, F, N>(mapping: I) -> Result<Vec<String>, TypeError>
where
    I: IntoIterator<Item = (F, N)>,
    F: AsRef<str>,
    N: Display,
{
    let mut clauses = Vec::new();
    for (field, days) in mapping {
        let days = value::integer_coerce(&days.to_string())?;
        let to = if days < 0 {
            format!("NOW+{}DAYS", days.unsigned_abs())
        } else {
            format!("NOW-{}DAYS", days)
        };
        clauses.extend(range(field.as_ref(), WILDCARD, &to, ExcludeMode::None));
    }
    Ok(clauses)
}

/// Term clauses. Values are taken literally by the term parser.
pub fn term<I, F, V>(mapping: I) -> Vec<String>
where
    I: IntoIterator<Item = (F, V)>,
    F: AsRef<str>,
    V: Into<QueryValue>,
{
    render_each(Template::Term, mapping, value::identity)
}

/// Regular expression clauses. Only `/` is escaped.
pub fn regexp<I, F, V>(mapping: I) -> Vec<String>
where
    I: IntoIterator<Item = (F, V)>,
    F: AsRef<str>,
    V: Into<QueryValue>,
{
    render_each(Template::Regexp, mapping, value::escape_slashes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::value::unquote;

    #[test]
    fn test_equals_scalar() {
        assert_eq!(equals([("title", "Moby Dick")]), vec!["title:\"Moby Dick\""]);
    }

    #[test]
    fn test_equals_escapes_specials() {
        assert_eq!(equals([("path", "a:b")]), vec![r#"path:"a\:b""#]);
    }

    #[test]
    fn test_equals_sequence_is_disjunction() {
        let clauses = equals([("tag", vec!["red", "green", "blue"])]);
        assert_eq!(
            clauses,
            vec![r#"{!lucene q.op=OR df=tag}"red" "green" "blue""#]
        );
    }

    #[test]
    fn test_equals_single_element_sequence() {
        assert_eq!(equals([("tag", vec!["red"])]), vec!["tag:\"red\""]);
        assert!(equals([("tag", Vec::<String>::new())]).is_empty());
    }

    #[test]
    fn test_equals_preserves_mapping_order() {
        let clauses = equals(vec![("b", QueryValue::from("2")), ("a", "1".into())]);
        assert_eq!(clauses, vec!["b:\"2\"", "a:\"1\""]);
    }

    #[test]
    fn test_equals_round_trip() {
        let original = "a/b \"c\"";
        let clauses = equals([("title", original)]);
        let quoted = clauses[0].strip_prefix("title:").unwrap();
        assert_eq!(unquote(quoted).as_deref(), Some(original));
    }

    #[test]
    fn test_not_equals() {
        assert_eq!(not_equals([("status", "draft")]), vec!["-status:\"draft\""]);
        assert_eq!(
            not_equals([("status", vec!["a", "b"])]),
            vec!["-status:\"a\"", "-status:\"b\""]
        );
    }

    #[test]
    fn test_exists_and_not_exists() {
        assert_eq!(exists(["title", "author"]), vec!["title:[* TO *]", "author:[* TO *]"]);
        assert_eq!(not_exists(["title"]), vec!["-title:[* TO *]"]);
        assert_eq!(not_exists(["title"])[0], format!("-{}", exists(["title"])[0]));
    }

    #[test]
    fn test_range_modes() {
        let r = |mode| range("f", "2020-01-01", "2020-12-31", mode).remove(0);
        assert_eq!(r(ExcludeMode::None), "f:[2020-01-01 TO 2020-12-31]");
        assert_eq!(r(ExcludeMode::From), "f:{2020-01-01 TO 2020-12-31]");
        assert_eq!(r(ExcludeMode::To), "f:[2020-01-01 TO 2020-12-31}");
        assert_eq!(r(ExcludeMode::Both), "f:{2020-01-01 TO 2020-12-31}");
    }

    #[test]
    fn test_range_with_mode() {
        assert_eq!(
            range_with_mode("n", "1", "*", "from").unwrap(),
            vec!["n:{1 TO *]"]
        );
        assert!(matches!(
            range_with_mode("n", "1", "2", "inclusive"),
            Err(ConfigError::InvalidExcludeMode { .. })
        ));
    }

    #[test]
    fn test_join() {
        assert_eq!(
            join("member_of_id", "id", "title", "Collection 1"),
            vec!["{!join from=member_of_id to=id}title:\"Collection 1\""]
        );
    }

    #[test]
    fn test_before() {
        assert_eq!(
            before([("created", "2020-01-01")]).unwrap(),
            vec!["created:[* TO 2020-01-01T00:00:00Z]"]
        );
        assert!(before([("created", "soon")]).is_err());
    }

    #[test]
    fn test_before_days() {
        assert_eq!(
            before_days([("modified", 30)]).unwrap(),
            vec!["modified:[* TO NOW-30DAYS]"]
        );
        assert_eq!(
            before_days([("modified", "7")]).unwrap(),
            vec!["modified:[* TO NOW-7DAYS]"]
        );
        assert!(before_days([("modified", "week")]).is_err());
    }

    #[test]
    fn test_before_days_negative_count() {
        assert_eq!(
            before_days([("expires", -5)]).unwrap(),
            vec!["expires:[* TO NOW+5DAYS]"]
        );
        assert_eq!(
            before_days([("expires", "-2")]).unwrap(),
            vec!["expires:[* TO NOW+2DAYS]"]
        );
    }

    #[test]
    fn test_term() {
        assert_eq!(term([("id", "a:b")]), vec!["{!term f=id}a:b"]);
    }

    #[test]
    fn test_regexp() {
        assert_eq!(regexp([("path", "/a/.*")]), vec![r"path:/\/a\/.*/"]);
    }
}
