//! Standard query parser clause construction.
//!
//! - [`value`] - value transforms (quoting, escaping, dates, integers)
//! - [`template`] - the fixed template set and range exclude modes
//! - [`clause`] - clause functions over field→value mappings
//! - [`builder`] - a fluent collector over the clause functions

pub mod builder;
pub mod clause;
pub mod template;
pub mod value;

pub use builder::QueryBuilder;
pub use clause::{
    QueryValue, WILDCARD, before, before_days, equals, exists, join, not_equals, not_exists,
    range, range_with_mode, regexp, term,
};
pub use template::{Bindings, ExcludeMode, Template};
pub use value::{SolrDate, date_format, escape_slashes, identity, integer_coerce, quote, unquote};
