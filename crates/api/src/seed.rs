//! JSON seed documents: one catalog tree plus the sellers its items refer to.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use storefront_catalog::CatalogInput;
use storefront_inventory::Seller;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("reading seed document: {0}")]
    Io(#[from] std::io::Error),

    #[error("parsing seed document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// `{ "catalog": {...}, "sellers": [...] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedDocument {
    pub catalog: CatalogInput,
    #[serde(default)]
    pub sellers: Vec<Seller>,
}

impl SeedDocument {
    pub fn from_json(raw: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sellers_are_optional() {
        let doc = SeedDocument::from_json(r#"{"catalog": {"id": 1, "name": "root"}}"#).unwrap();
        assert!(doc.sellers.is_empty());
        assert!(doc.catalog.children.is_empty());
    }

    #[test]
    fn malformed_documents_are_parse_errors() {
        let err = SeedDocument::from_json(r#"{"sellers": []}"#).unwrap_err();
        assert!(matches!(err, SeedError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SeedDocument::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SeedError::Io(_)));
    }
}
