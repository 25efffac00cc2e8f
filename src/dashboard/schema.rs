//! Record kinds and their field names

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Quote (`orcamentos`) fields and statuses
pub mod quote {
    pub const COLLECTION: &str = "orcamentos";

    pub const CLIENT: &str = "cliente";
    /// Lower-cased copy of `cliente` used for prefix search
    pub const CLIENT_SEARCH: &str = "clienteBusca";
    pub const SERVICE_TYPE: &str = "tipoServico";
    pub const AMOUNT: &str = "valor";
    pub const STATUS: &str = "status";
    pub const CREATED_AT: &str = "dataCriacao";

    pub const PENDING: &str = "Pendente";
    pub const APPROVED: &str = "Aprovado";
    pub const REJECTED: &str = "Rejeitado";
    pub const CANCELLED: &str = "Cancelado";
}

/// Invoice (`notasFiscais`) fields and statuses
pub mod invoice {
    pub const COLLECTION: &str = "notasFiscais";

    pub const NUMBER: &str = "numero";
    pub const CLIENT: &str = "cliente";
    pub const CLIENT_SEARCH: &str = "clienteBusca";
    pub const AMOUNT: &str = "valor";
    pub const STATUS: &str = "status";
    pub const ISSUED_AT: &str = "dataEmissao";
    pub const DUE_AT: &str = "dataVencimento";

    pub const PENDING: &str = "Pendente";
    pub const PAID: &str = "Paga";
    pub const OVERDUE: &str = "Vencida";
    pub const CANCELLED: &str = "Cancelada";
}

/// The two record kinds served by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Quotes,
    Invoices,
}

impl RecordKind {
    pub fn collection(&self) -> &'static str {
        match self {
            RecordKind::Quotes => quote::COLLECTION,
            RecordKind::Invoices => invoice::COLLECTION,
        }
    }

    /// Date field listings are ordered by when no sort is requested
    pub fn date_field(&self) -> &'static str {
        match self {
            RecordKind::Quotes => quote::CREATED_AT,
            RecordKind::Invoices => invoice::ISSUED_AT,
        }
    }

    pub fn from_collection(collection: &str) -> Option<Self> {
        match collection {
            quote::COLLECTION => Some(RecordKind::Quotes),
            invoice::COLLECTION => Some(RecordKind::Invoices),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Quotes => "quotes",
            RecordKind::Invoices => "invoices",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    /// Accepts the kind name or the collection name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quotes" | quote::COLLECTION => Ok(RecordKind::Quotes),
            "invoices" | invoice::COLLECTION => Ok(RecordKind::Invoices),
            other => Err(format!(
                "unknown record kind '{}' (expected quotes or invoices)",
                other
            )),
        }
    }
}
