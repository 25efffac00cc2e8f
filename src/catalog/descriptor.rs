//! Composite index descriptors

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::filter::SortDirection;

/// One physically available composite index.
///
/// Serves queries that fix every field in `equality`, optionally bound
/// `range`, and order by `sort` in `direction`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexDescriptor {
    #[serde(default)]
    pub equality: Vec<String>,
    #[serde(default)]
    pub range: Option<String>,
    pub sort: String,
    pub direction: SortDirection,
}

impl IndexDescriptor {
    pub fn new<I, S>(equality: I, sort: impl Into<String>, direction: SortDirection) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            equality: equality.into_iter().map(Into::into).collect(),
            range: None,
            sort: sort.into(),
            direction,
        }
    }

    /// Index ordered by `sort` with no equality prefix
    pub fn sorted(sort: impl Into<String>, direction: SortDirection) -> Self {
        Self::new(Vec::<String>::new(), sort, direction)
    }

    pub fn with_range(mut self, field: impl Into<String>) -> Self {
        self.range = Some(field.into());
        self
    }

    /// Number of equality fields; larger is more selective.
    pub fn specificity(&self) -> usize {
        self.equality.len()
    }

    pub fn covers_equality(&self, field: &str) -> bool {
        self.equality.iter().any(|f| f == field)
    }
}

impl fmt::Display for IndexDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, field) in self.equality.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", field)?;
        }
        write!(f, "]")?;
        if let Some(range) = &self.range {
            write!(f, " range {}", range)?;
        }
        write!(f, " sort {} {}", self.sort, self.direction.as_str())
    }
}
