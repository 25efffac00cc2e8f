//! Predicate and sort structures carried by a [`FilterSpec`](super::FilterSpec).

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Highest private-use codepoint, appended to a prefix to form the upper bound
/// of a "starts with" range.
pub const PREFIX_UPPER_SENTINEL: char = '\u{f8ff}';

/// Filter operation types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Equality: field = value
    Eq(Value),
    /// Inclusive range: lower <= field <= upper (either bound optional)
    Range {
        lower: Option<Value>,
        upper: Option<Value>,
    },
    /// Case-insensitive "starts with" on a lower-cased text field
    Prefix(String),
    /// Membership: field is one of values
    In(Vec<Value>),
}

impl FilterOp {
    /// Equality and membership are served from the same index entries.
    pub fn is_equality_class(&self) -> bool {
        matches!(self, FilterOp::Eq(_) | FilterOp::In(_))
    }

    /// Range and prefix both occupy the store's single inequality slot.
    pub fn is_range_type(&self) -> bool {
        matches!(self, FilterOp::Range { .. } | FilterOp::Prefix(_))
    }

    /// Returns the operation name for explain output
    pub fn op_name(&self) -> &'static str {
        match self {
            FilterOp::Eq(_) => "eq",
            FilterOp::Range { .. } => "range",
            FilterOp::Prefix(_) => "prefix",
            FilterOp::In(_) => "in",
        }
    }
}

/// A single predicate (field + operation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub field: String,
    pub op: FilterOp,
}

impl Predicate {
    /// Create an equality predicate
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Eq(value.into()),
        }
    }

    /// Create an inclusive range predicate
    pub fn range(field: impl Into<String>, lower: Option<Value>, upper: Option<Value>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Range { lower, upper },
        }
    }

    /// Create a range predicate (gte only)
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::range(field, Some(value.into()), None)
    }

    /// Create a range predicate (lte only)
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::range(field, None, Some(value.into()))
    }

    /// Create a timestamp range predicate; bounds are stored as RFC 3339 strings.
    pub fn between_dates(
        field: impl Into<String>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        Self::range(field, from.map(timestamp_value), to.map(timestamp_value))
    }

    /// Create a case-insensitive prefix predicate. The text is lower-cased here,
    /// the target field is expected to hold lower-cased text.
    pub fn prefix(field: impl Into<String>, text: &str) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Prefix(text.trim().to_lowercase()),
        }
    }

    /// Create a membership predicate
    pub fn one_of(field: impl Into<String>, values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::In(values.into_iter().collect()),
        }
    }

    pub fn is_equality_class(&self) -> bool {
        self.op.is_equality_class()
    }

    pub fn is_range_type(&self) -> bool {
        self.op.is_range_type()
    }
}

/// Encodes a timestamp the way records store them.
pub fn timestamp_value(ts: DateTime<Utc>) -> Value {
    Value::String(ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Returns `(lower, upper)` bounds for a prefix search.
pub fn prefix_bounds(prefix: &str) -> (String, String) {
    let mut upper = String::with_capacity(prefix.len() + PREFIX_UPPER_SENTINEL.len_utf8());
    upper.push_str(prefix);
    upper.push(PREFIX_UPPER_SENTINEL);
    (prefix.to_string(), upper)
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Sort field and direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}
