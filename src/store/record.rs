//! Record snapshots read from the store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A document snapshot: identifier plus JSON body.
///
/// The core only reads records; all accessors return `None` for missing,
/// null, or mistyped fields instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub body: Value,
}

impl Record {
    pub fn new(id: impl Into<String>, body: Value) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }

    /// Builds a record from a document, taking its `id` field when present
    /// and generating one otherwise.
    pub fn from_document(mut document: Value) -> Self {
        let id = match document.as_object_mut().and_then(|o| o.remove("id")) {
            Some(Value::String(id)) if !id.is_empty() => id,
            Some(Value::Number(n)) => n.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        if !document.is_object() {
            document = Value::Object(Map::new());
        }
        Self { id, body: document }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }

    /// Non-blank text value, trimmed
    pub fn text(&self, name: &str) -> Option<&str> {
        self.field(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Scalar rendered as a grouping key: trimmed text, or the JSON text of
    /// a number or bool. Missing, null, blank, and nested values give `None`.
    pub fn key(&self, name: &str) -> Option<String> {
        match self.field(name)? {
            Value::String(_) => self.text(name).map(str::to_string),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Finite numeric value
    pub fn amount(&self, name: &str) -> Option<f64> {
        self.field(name)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
    }

    /// RFC 3339 timestamp value
    pub fn timestamp(&self, name: &str) -> Option<DateTime<Utc>> {
        self.text(name)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|ts| ts.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_from_document_takes_id() {
        let record = Record::from_document(json!({"id": "orc-1", "valor": 10}));
        assert_eq!(record.id, "orc-1");
        assert!(record.field("id").is_none());
        assert_eq!(record.amount("valor"), Some(10.0));
    }

    #[test]
    fn test_from_document_generates_id() {
        let a = Record::from_document(json!({"valor": 10}));
        let b = Record::from_document(json!({"valor": 10}));
        assert_ne!(a.id, b.id);
        assert!(Uuid::parse_str(&a.id).is_ok());
    }

    #[test]
    fn test_accessors_tolerate_bad_data() {
        let record = Record::new(
            "x",
            json!({"cliente": "  ", "status": null, "valor": "100", "dataCriacao": "ontem"}),
        );
        assert_eq!(record.text("cliente"), None);
        assert_eq!(record.text("status"), None);
        assert_eq!(record.amount("valor"), None);
        assert_eq!(record.timestamp("dataCriacao"), None);
        assert_eq!(record.text("missing"), None);
    }

    #[test]
    fn test_key_renders_scalars() {
        let record = Record::new(
            "x",
            json!({"numero": 101, "ativo": true, "cliente": " ACME ", "vazio": " ",
                   "nulo": null, "lista": [1]}),
        );
        assert_eq!(record.key("numero").as_deref(), Some("101"));
        assert_eq!(record.key("ativo").as_deref(), Some("true"));
        assert_eq!(record.key("cliente").as_deref(), Some("ACME"));
        assert_eq!(record.key("vazio"), None);
        assert_eq!(record.key("nulo"), None);
        assert_eq!(record.key("lista"), None);
        assert_eq!(record.key("missing"), None);
    }

    #[test]
    fn test_timestamp_parsing() {
        let record = Record::new("x", json!({"dataEmissao": "2024-03-01T10:00:00.000Z"}));
        assert_eq!(
            record.timestamp("dataEmissao"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap())
        );
    }
}
