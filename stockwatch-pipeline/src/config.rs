//! Explicit ingestion configuration.
//!
//! Passed to the ingestion pipeline and the store adapter; nothing in the
//! libraries reads global or environment state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{IngestError, IngestResult};

/// Namespace used when no configuration is supplied.
pub const DEFAULT_STORE_NAMESPACE: &str = "default-app-id/spareParts";

/// Length of a generated record key.
pub const GENERATED_KEY_LEN: usize = 20;

const KEY_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// How to key a record whose row has no item code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdentityFallback {
    /// Random alphanumeric document id.
    #[default]
    Random,
    /// `row-{line}` using the source line number.
    RowNumber,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IngestConfig {
    pub store_namespace: String,
    pub identity_fallback: IdentityFallback,
    /// Seed for `IdentityFallback::Random`; entropy when absent.
    pub identity_seed: Option<u64>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            store_namespace: DEFAULT_STORE_NAMESPACE.to_string(),
            identity_fallback: IdentityFallback::Random,
            identity_seed: None,
        }
    }
}

impl IngestConfig {
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            store_namespace: namespace.into(),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> IngestResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &str) -> IngestResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| IngestError::ConfigRead {
            path: path.to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn key_generator(&self) -> KeyGenerator {
        KeyGenerator::new(self.identity_fallback, self.identity_seed)
    }
}

/// Produces fallback keys for rows without an item code.
pub struct KeyGenerator {
    fallback: IdentityFallback,
    rng: StdRng,
}

impl KeyGenerator {
    pub fn new(fallback: IdentityFallback, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { fallback, rng }
    }

    pub fn next_key(&mut self, line: usize) -> String {
        match self.fallback {
            IdentityFallback::RowNumber => format!("row-{}", line),
            IdentityFallback::Random => (0..GENERATED_KEY_LEN)
                .map(|_| KEY_ALPHABET[self.rng.gen_range(0..KEY_ALPHABET.len())] as char)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_keys() {
        let config = IngestConfig::from_json_str(r#"{"storeNamespace": "acme/parts"}"#).unwrap();
        assert_eq!(config.store_namespace, "acme/parts");
        assert_eq!(config.identity_fallback, IdentityFallback::Random);
        assert_eq!(config.identity_seed, None);
    }

    #[test]
    fn parses_row_number_fallback() {
        let config = IngestConfig::from_json_str(r#"{"identityFallback": "rowNumber"}"#).unwrap();
        assert_eq!(config.store_namespace, DEFAULT_STORE_NAMESPACE);
        let mut keys = config.key_generator();
        assert_eq!(keys.next_key(7), "row-7");
    }

    #[test]
    fn seeded_random_keys_are_reproducible() {
        let mut a = KeyGenerator::new(IdentityFallback::Random, Some(42));
        let mut b = KeyGenerator::new(IdentityFallback::Random, Some(42));
        let key = a.next_key(2);
        assert_eq!(key.len(), GENERATED_KEY_LEN);
        assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(key, b.next_key(2));
        assert_ne!(a.next_key(3), key);
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        assert!(matches!(
            IngestConfig::from_json_str("{not json"),
            Err(IngestError::ConfigParse(_))
        ));
        assert!(matches!(
            IngestConfig::from_file("/nonexistent/stockwatch.json"),
            Err(IngestError::ConfigRead { .. })
        ));
    }
}
