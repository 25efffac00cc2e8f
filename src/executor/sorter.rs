//! Result sorting
//!
//! Stable and deterministic: ties on the sort field fall back to record id.

use crate::filter::{compare_values, SortDirection};
use crate::store::Record;

/// Sorts records
pub struct ResultSorter;

impl ResultSorter {
    pub fn sort(records: &mut [Record], field: &str, direction: SortDirection) {
        records.sort_by(|a, b| {
            let ordering = compare_values(a.field(field), b.field(field));
            let ordering = match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            ordering.then_with(|| a.id.cmp(&b.id))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make(id: &str, valor: i64) -> Record {
        Record::new(id, json!({"valor": valor}))
    }

    fn ids(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_sort_ascending() {
        let mut records = vec![make("c", 30), make("a", 20), make("b", 25)];
        ResultSorter::sort(&mut records, "valor", SortDirection::Asc);
        assert_eq!(ids(&records), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sort_descending() {
        let mut records = vec![make("c", 30), make("a", 20), make("b", 25)];
        ResultSorter::sort(&mut records, "valor", SortDirection::Desc);
        assert_eq!(ids(&records), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_ties_break_on_id() {
        let mut records = vec![make("z", 10), make("m", 10), make("a", 10)];
        ResultSorter::sort(&mut records, "valor", SortDirection::Desc);
        assert_eq!(ids(&records), vec!["a", "m", "z"]);
    }
}
