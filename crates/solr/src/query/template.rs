//! Clause templates.
//!
//! Every clause is produced by exactly one [`Template`]. Templates hold
//! `{field}`, `{value}`, `{from}` and `{to}` placeholders which are filled
//! from a [`Bindings`] value by [`Template::render`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The fixed set of clause templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Template {
    /// OR over several values of one field.
    Disjunction,
    /// Cross-collection join.
    Join,
    /// Negated field match.
    Negation,
    /// Field has no value at all.
    NotExist,
    /// Range with both bounds inclusive.
    RangeExcludeNone,
    /// Range with an exclusive lower bound.
    RangeExcludeFrom,
    /// Range with an exclusive upper bound.
    RangeExcludeTo,
    /// Range with both bounds exclusive.
    RangeExcludeBoth,
    /// Regular expression match.
    Regexp,
    /// Plain `field:value` match.
    Standard,
    /// Term query, bypassing analysis.
    Term,
}

impl Template {
    /// All templates, in name order.
    pub const ALL: [Template; 11] = [
        Template::Disjunction,
        Template::Join,
        Template::Negation,
        Template::NotExist,
        Template::RangeExcludeNone,
        Template::RangeExcludeFrom,
        Template::RangeExcludeTo,
        Template::RangeExcludeBoth,
        Template::Regexp,
        Template::Standard,
        Template::Term,
    ];

    /// Returns the pattern string for this template.
    pub fn pattern(&self) -> &'static str {
        match self {
            Template::Disjunction => "{!lucene q.op=OR df={field}}{value}",
            Template::Join => "{!join from={from} to={to}}{field}:{value}",
            Template::Negation => "-{field}:{value}",
            Template::NotExist => "-{field}:[* TO *]",
            Template::RangeExcludeNone => "{field}:[{from} TO {to}]",
            Template::RangeExcludeFrom => "{field}:{{from} TO {to}]",
            Template::RangeExcludeTo => "{field}:[{from} TO {to}}",
            Template::RangeExcludeBoth => "{field}:{{from} TO {to}}",
            Template::Regexp => "{field}:/{value}/",
            Template::Standard => "{field}:{value}",
            Template::Term => "{!term f={field}}{value}",
        }
    }

    /// Returns the constant-style name of this template.
    pub fn name(&self) -> &'static str {
        match self {
            Template::Disjunction => "DISJUNCTION",
            Template::Join => "JOIN",
            Template::Negation => "NEGATION",
            Template::NotExist => "NOT_EXIST",
            Template::RangeExcludeNone => "RANGE_EXCLUDE_NONE",
            Template::RangeExcludeFrom => "RANGE_EXCLUDE_FROM",
            Template::RangeExcludeTo => "RANGE_EXCLUDE_TO",
            Template::RangeExcludeBoth => "RANGE_EXCLUDE_BOTH",
            Template::Regexp => "REGEXP",
            Template::Standard => "STANDARD",
            Template::Term => "TERM",
        }
    }

    /// Fills the placeholders of this template.
    ///
    /// Placeholders are matched literally, so `{` and `}` that belong to the
    /// grammar (local params, exclusive range brackets) are left alone.
    /// Values are inserted verbatim; apply a transform before binding.
    pub fn render(&self, bindings: &Bindings<'_>) -> String {
        let pattern = self.pattern();
        let mut out = String::with_capacity(pattern.len() + 32);
        let mut rest = pattern;

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            match Placeholder::match_prefix(tail) {
                Some((placeholder, len)) => {
                    out.push_str(bindings.get(placeholder));
                    rest = &tail[len..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Template {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Template::ALL
            .into_iter()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownTemplate {
                name: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy)]
enum Placeholder {
    Field,
    Value,
    From,
    To,
}

impl Placeholder {
    fn match_prefix(s: &str) -> Option<(Placeholder, usize)> {
        [
            ("{field}", Placeholder::Field),
            ("{value}", Placeholder::Value),
            ("{from}", Placeholder::From),
            ("{to}", Placeholder::To),
        ]
        .into_iter()
        .find(|(token, _)| s.starts_with(token))
        .map(|(token, placeholder)| (placeholder, token.len()))
    }
}

/// Values bound to a template's placeholders. Unset placeholders render empty.
#[derive(Debug, Clone, Default)]
pub struct Bindings<'a> {
    /// `{field}`
    pub field: &'a str,
    /// `{value}`
    pub value: &'a str,
    /// `{from}`
    pub from: &'a str,
    /// `{to}`
    pub to: &'a str,
}

impl<'a> Bindings<'a> {
    /// Binds a field and a value.
    pub fn field_value(field: &'a str, value: &'a str) -> Self {
        Self {
            field,
            value,
            ..Default::default()
        }
    }

    /// Binds a field and range bounds.
    pub fn range(field: &'a str, from: &'a str, to: &'a str) -> Self {
        Self {
            field,
            from,
            to,
            ..Default::default()
        }
    }

    fn get(&self, placeholder: Placeholder) -> &'a str {
        match placeholder {
            Placeholder::Field => self.field,
            Placeholder::Value => self.value,
            Placeholder::From => self.from,
            Placeholder::To => self.to,
        }
    }
}

/// Which end(s) of a range are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExcludeMode {
    /// `[from TO to]`
    #[default]
    None,
    /// `{from TO to]`
    From,
    /// `[from TO to}`
    To,
    /// `{from TO to}`
    Both,
}

impl ExcludeMode {
    /// The range template for this mode.
    pub fn template(&self) -> Template {
        match self {
            ExcludeMode::None => Template::RangeExcludeNone,
            ExcludeMode::From => Template::RangeExcludeFrom,
            ExcludeMode::To => Template::RangeExcludeTo,
            ExcludeMode::Both => Template::RangeExcludeBoth,
        }
    }
}

impl fmt::Display for ExcludeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExcludeMode::None => write!(f, "none"),
            ExcludeMode::From => write!(f, "from"),
            ExcludeMode::To => write!(f, "to"),
            ExcludeMode::Both => write!(f, "both"),
        }
    }
}

impl FromStr for ExcludeMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(ExcludeMode::None),
            "from" => Ok(ExcludeMode::From),
            "to" => Ok(ExcludeMode::To),
            "both" => Ok(ExcludeMode::Both),
            _ => Err(ConfigError::InvalidExcludeMode {
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_standard() {
        let clause = Template::Standard.render(&Bindings::field_value("title", "\"x\""));
        assert_eq!(clause, "title:\"x\"");
    }

    #[test]
    fn test_render_keeps_local_param_braces() {
        let clause = Template::Disjunction.render(&Bindings::field_value("tag", "\"a\" \"b\""));
        assert_eq!(clause, "{!lucene q.op=OR df=tag}\"a\" \"b\"");

        let clause = Template::Term.render(&Bindings::field_value("tag", "x"));
        assert_eq!(clause, "{!term f=tag}x");
    }

    #[test]
    fn test_render_range_brackets() {
        let bindings = Bindings::range("f", "1", "9");
        assert_eq!(Template::RangeExcludeNone.render(&bindings), "f:[1 TO 9]");
        assert_eq!(Template::RangeExcludeFrom.render(&bindings), "f:{1 TO 9]");
        assert_eq!(Template::RangeExcludeTo.render(&bindings), "f:[1 TO 9}");
        assert_eq!(Template::RangeExcludeBoth.render(&bindings), "f:{1 TO 9}");
    }

    #[test]
    fn test_render_does_not_expand_bound_values() {
        // A bound value that looks like a placeholder stays literal.
        let clause = Template::Standard.render(&Bindings::field_value("f", "{field}"));
        assert_eq!(clause, "f:{field}");
    }

    #[test]
    fn test_template_from_str() {
        assert_eq!("standard".parse::<Template>(), Ok(Template::Standard));
        assert_eq!(
            "RANGE_EXCLUDE_BOTH".parse::<Template>(),
            Ok(Template::RangeExcludeBoth)
        );
        assert_eq!(
            "FUZZY".parse::<Template>(),
            Err(ConfigError::UnknownTemplate {
                name: "FUZZY".to_string()
            })
        );
    }

    #[test]
    fn test_exclude_mode_from_str() {
        assert_eq!("none".parse::<ExcludeMode>(), Ok(ExcludeMode::None));
        assert_eq!("Both".parse::<ExcludeMode>(), Ok(ExcludeMode::Both));
        assert!(matches!(
            "left".parse::<ExcludeMode>(),
            Err(ConfigError::InvalidExcludeMode { .. })
        ));
    }

    #[test]
    fn test_exclude_mode_template() {
        for mode in [
            ExcludeMode::None,
            ExcludeMode::From,
            ExcludeMode::To,
            ExcludeMode::Both,
        ] {
            let name = mode.template().name().to_string();
            assert!(name.ends_with(&mode.to_string().to_uppercase()));
        }
    }
}
