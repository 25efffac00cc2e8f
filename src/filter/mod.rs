//! Filter subsystem
//!
//! A [`FilterSpec`] is the normalized form of what a caller wants to read:
//! one predicate per field, an optional sort and an optional limit. It is
//! validated once when built and immutable afterwards.
//!
//! # Predicate classes
//!
//! - Equality class: `Eq`, `In` (served from the same index entries)
//! - Range type: `Range`, `Prefix` (occupy the store's single inequality slot)

mod ast;
mod errors;
mod ordering;
mod spec;

pub use ast::{
    prefix_bounds, timestamp_value, FilterOp, Predicate, SortDirection, SortSpec,
    PREFIX_UPPER_SENTINEL,
};
pub use errors::{FilterError, FilterResult};
pub use ordering::{comparable, compare_values};
pub use spec::{FilterSpec, FilterSpecBuilder, MAX_MEMBERSHIP_VALUES};
