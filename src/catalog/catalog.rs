//! Index catalog: the read-only registry of composite indexes per collection.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::descriptor::IndexDescriptor;
use super::errors::{CatalogError, CatalogResult};

/// Fixed set of composite indexes available for one collection.
///
/// Built once and never mutated; lookups are pure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexCatalog {
    collection: String,
    indexes: Vec<IndexDescriptor>,
}

/// One entry of an index-definition file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexDefinition {
    collection_group: String,
    #[serde(flatten)]
    descriptor: IndexDescriptor,
}

#[derive(Debug, Deserialize)]
struct IndexDefinitionFile {
    indexes: Vec<IndexDefinition>,
}

impl IndexCatalog {
    /// Creates a catalog from descriptors, keeping declaration order.
    pub fn new(collection: impl Into<String>, indexes: Vec<IndexDescriptor>) -> Self {
        Self {
            collection: collection.into(),
            indexes,
        }
    }

    /// Parses an index-definition document and keeps the entries for `collection`.
    ///
    /// ```json
    /// {"indexes": [{"collectionGroup": "orcamentos", "equality": ["status"],
    ///               "sort": "dataCriacao", "direction": "desc"}]}
    /// ```
    pub fn from_json(collection: &str, json: &str) -> CatalogResult<Self> {
        let file: IndexDefinitionFile = serde_json::from_str(json)?;

        let mut indexes = Vec::new();
        for def in file.indexes {
            if def.collection_group != collection {
                continue;
            }
            validate_descriptor(&def.descriptor)?;
            indexes.push(def.descriptor);
        }

        Ok(Self::new(collection, indexes))
    }

    /// Reads an index-definition file from disk
    pub fn from_file(collection: &str, path: &Path) -> CatalogResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(collection, &content)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn indexes(&self) -> &[IndexDescriptor] {
        &self.indexes
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// Returns descriptors compatible with the given query shape, in catalog order.
    ///
    /// A descriptor is compatible when its equality fields are a subset of
    /// `equality_fields`, its range field (if declared) equals `range_field`,
    /// and its sort field equals `sort_field`. No sort means no composite index.
    pub fn lookup(
        &self,
        equality_fields: &BTreeSet<&str>,
        range_field: Option<&str>,
        sort_field: Option<&str>,
    ) -> Vec<&IndexDescriptor> {
        let Some(sort_field) = sort_field else {
            return Vec::new();
        };

        self.indexes
            .iter()
            .filter(|idx| idx.sort == sort_field)
            .filter(|idx| {
                idx.equality
                    .iter()
                    .all(|f| equality_fields.contains(f.as_str()))
            })
            .filter(|idx| match idx.range.as_deref() {
                Some(declared) => range_field == Some(declared),
                None => true,
            })
            .collect()
    }
}

fn validate_descriptor(descriptor: &IndexDescriptor) -> CatalogResult<()> {
    if descriptor.sort.trim().is_empty() {
        return Err(CatalogError::InvalidDescriptor(format!(
            "{}: sort field must not be empty",
            descriptor
        )));
    }

    let mut seen = HashSet::new();
    for field in &descriptor.equality {
        if field.trim().is_empty() || !seen.insert(field.as_str()) {
            return Err(CatalogError::InvalidDescriptor(format!(
                "{}: equality fields must be non-empty and distinct",
                descriptor
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::SortDirection;

    fn catalog() -> IndexCatalog {
        IndexCatalog::new(
            "orcamentos",
            vec![
                IndexDescriptor::sorted("dataCriacao", SortDirection::Desc),
                IndexDescriptor::new(["status"], "dataCriacao", SortDirection::Desc),
                IndexDescriptor::new(["status", "cliente"], "dataCriacao", SortDirection::Desc),
                IndexDescriptor::new(["status"], "valor", SortDirection::Desc).with_range("valor"),
            ],
        )
    }

    fn fields<'a>(names: &[&'a str]) -> BTreeSet<&'a str> {
        names.iter().copied().collect()
    }

    #[test]
    fn test_lookup_subset_of_equality() {
        let catalog = catalog();
        let found = catalog.lookup(&fields(&["status"]), None, Some("dataCriacao"));

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].specificity(), 0);
        assert_eq!(found[1].equality, vec!["status"]);
    }

    #[test]
    fn test_lookup_requires_sort() {
        let catalog = catalog();
        assert!(catalog.lookup(&fields(&["status"]), None, None).is_empty());
        assert!(catalog.lookup(&fields(&["status"]), None, Some("numero")).is_empty());
    }

    #[test]
    fn test_lookup_declared_range_must_match() {
        let catalog = catalog();

        let found = catalog.lookup(&fields(&["status"]), Some("valor"), Some("valor"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].range.as_deref(), Some("valor"));

        let found = catalog.lookup(&fields(&["status"]), None, Some("valor"));
        assert!(found.is_empty());
    }

    #[test]
    fn test_from_json_filters_collection() {
        let json = r#"{
            "indexes": [
                {"collectionGroup": "orcamentos", "equality": ["status"], "sort": "dataCriacao", "direction": "desc"},
                {"collectionGroup": "notasFiscais", "equality": ["status"], "sort": "dataEmissao", "direction": "desc"},
                {"collectionGroup": "orcamentos", "range": "valor", "sort": "valor", "direction": "asc"}
            ]
        }"#;

        let catalog = IndexCatalog::from_json("orcamentos", json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.indexes()[1].range.as_deref(), Some("valor"));
        assert!(catalog.indexes()[1].equality.is_empty());
    }

    #[test]
    fn test_from_json_rejects_duplicate_equality() {
        let json = r#"{"indexes": [
            {"collectionGroup": "orcamentos", "equality": ["status", "status"], "sort": "valor", "direction": "asc"}
        ]}"#;

        let err = IndexCatalog::from_json("orcamentos", json).unwrap_err();
        assert_eq!(err.code(), "LV_CATALOG_INVALID_DESCRIPTOR");
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        let err = IndexCatalog::from_json("orcamentos", "{not json").unwrap_err();
        assert_eq!(err.code(), "LV_CATALOG_PARSE");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indexes.json");
        std::fs::write(
            &path,
            r#"{"indexes": [{"collectionGroup": "notasFiscais", "equality": ["cliente"], "sort": "dataEmissao", "direction": "desc"}]}"#,
        )
        .unwrap();

        let catalog = IndexCatalog::from_file("notasFiscais", &path).unwrap();
        assert_eq!(catalog.collection(), "notasFiscais");
        assert_eq!(catalog.len(), 1);
    }
}
