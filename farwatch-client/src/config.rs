//! Gateway configuration documents
//!
//! The gateway serves its configuration as a sequence of base64-encoded JSON
//! documents and accepts updates in the same shape.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use farwatch_common::{ConfigDocumentRecord, GatewayConfig};

use crate::client::{Error, Result};

/// A decoded gateway configuration document.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    /// The document's JSON text.
    pub json: String,
}

impl ConfigDocument {
    /// Pretty-print the document for display.
    pub fn pretty(&self) -> Result<String> {
        let value: serde_json::Value = serde_json::from_str(&self.json)?;
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

/// Decode every document of a gateway config response.
pub fn decode_documents(config: &GatewayConfig) -> Result<Vec<ConfigDocument>> {
    config
        .documents
        .iter()
        .map(|document| {
            let bytes = STANDARD
                .decode(&document.json)
                .map_err(|err| Error::Decode(err.to_string()))?;
            let json = String::from_utf8(bytes).map_err(|err| Error::Decode(err.to_string()))?;
            Ok(ConfigDocument { json })
        })
        .collect()
}

/// Encode JSON documents into the wire shape expected by the update call.
pub fn encode_documents(documents: &[String]) -> GatewayConfig {
    GatewayConfig {
        documents: documents
            .iter()
            .map(|json| ConfigDocumentRecord {
                json: STANDARD.encode(json),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_round_trips_encode() {
        let documents = vec![r#"{"gateway":{"port":9090}}"#.to_string()];
        let config = encode_documents(&documents);
        // The wire carries base64, not raw JSON.
        assert_ne!(config.documents[0].json, documents[0]);

        let decoded = decode_documents(&config).unwrap();
        assert_eq!(decoded[0].json, documents[0]);
    }

    #[test]
    fn test_decode_rejects_invalid_base64() {
        let config = GatewayConfig {
            documents: vec![ConfigDocumentRecord {
                json: "not base64!!!".to_string(),
            }],
        };
        assert!(matches!(decode_documents(&config), Err(Error::Decode(_))));
    }

    #[test]
    fn test_pretty_formats_document() {
        let document = ConfigDocument {
            json: r#"{"a":1}"#.to_string(),
        };
        let pretty = document.pretty().unwrap();
        assert!(pretty.contains("\"a\": 1"));
    }
}
