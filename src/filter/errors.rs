//! Filter construction errors
//!
//! Raised only while building a [`FilterSpec`](super::FilterSpec); a built spec
//! is always plannable.

use thiserror::Error;

/// Result type for filter construction
pub type FilterResult<T> = Result<T, FilterError>;

/// Reasons a filter cannot be built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Predicate field name must not be empty")]
    EmptyField,

    #[error("Field '{0}' has more than one predicate")]
    DuplicateField(String),

    #[error("Range on '{0}' needs at least one bound")]
    EmptyRange(String),

    #[error("Range on '{0}' has lower bound above upper bound")]
    InvertedRange(String),

    #[error("Prefix search on '{0}' must not be empty")]
    EmptyPrefix(String),

    #[error("Membership on '{field}' must list between 1 and {max} values")]
    MembershipSize { field: String, max: usize },

    #[error("Limit must be positive")]
    ZeroLimit,

    #[error("Sort field must not be empty")]
    EmptySort,

    #[error("Range fields {fields:?} cannot combine with sort on '{sort}'")]
    RangeSortConflict { fields: Vec<String>, sort: String },
}

impl FilterError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            FilterError::EmptyField => "LV_FILTER_EMPTY_FIELD",
            FilterError::DuplicateField(_) => "LV_FILTER_DUPLICATE_FIELD",
            FilterError::EmptyRange(_) => "LV_FILTER_EMPTY_RANGE",
            FilterError::InvertedRange(_) => "LV_FILTER_INVERTED_RANGE",
            FilterError::EmptyPrefix(_) => "LV_FILTER_EMPTY_PREFIX",
            FilterError::MembershipSize { .. } => "LV_FILTER_MEMBERSHIP_SIZE",
            FilterError::ZeroLimit => "LV_FILTER_ZERO_LIMIT",
            FilterError::EmptySort => "LV_FILTER_EMPTY_SORT",
            FilterError::RangeSortConflict { .. } => "LV_FILTER_RANGE_SORT_CONFLICT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_field() {
        let err = FilterError::DuplicateField("status".into());
        assert!(err.to_string().contains("status"));
        assert_eq!(err.code(), "LV_FILTER_DUPLICATE_FIELD");
    }
}
