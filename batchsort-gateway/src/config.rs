//! Gateway configuration read from the environment.

use std::num::NonZeroUsize;

use batchsort_core::{Aggregation, ParseVariantError};

/// Environment variable holding the listen address.
pub const LISTEN_ADDR_VAR: &str = "BATCHSORT_LISTEN_ADDR";
/// Environment variable capping concurrent sort threads.
pub const MAX_CONCURRENCY_VAR: &str = "BATCHSORT_MAX_CONCURRENCY";
/// Environment variable selecting the concurrent aggregation discipline.
pub const AGGREGATION_VAR: &str = "BATCHSORT_AGGREGATION";
/// Environment variable limiting request body size.
pub const MAX_BODY_BYTES_VAR: &str = "BATCHSORT_MAX_BODY_BYTES";

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A numeric variable was not a positive integer.
    #[error("{var} must be a positive integer, got '{value}'")]
    NotPositive { var: &'static str, value: String },

    /// The aggregation variable named an unknown discipline.
    #[error("BATCHSORT_AGGREGATION: {0}")]
    Aggregation(#[from] ParseVariantError),
}

/// Runtime configuration for the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct GatewayConfig {
    /// Socket address to bind, e.g. `0.0.0.0:8000`.
    pub listen_addr: String,
    /// Thread cap for `/process-concurrent`. `None` keeps one thread per sequence.
    pub max_concurrency: Option<NonZeroUsize>,
    /// How concurrent units hand back results.
    pub aggregation: Aggregation,
    /// Largest accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_owned(),
            max_concurrency: None,
            aggregation: Aggregation::default(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl GatewayConfig {
    /// Read configuration from the process environment.
    ///
    /// Unset variables fall back to their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a set variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a present variable cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let listen_addr = lookup(LISTEN_ADDR_VAR).unwrap_or(defaults.listen_addr);
        let max_concurrency = lookup(MAX_CONCURRENCY_VAR)
            .map(|v| parse_positive(MAX_CONCURRENCY_VAR, &v))
            .transpose()?;
        let aggregation = lookup(AGGREGATION_VAR)
            .map(|v| v.trim().to_ascii_lowercase().parse::<Aggregation>())
            .transpose()?
            .unwrap_or(defaults.aggregation);
        let max_body_bytes = lookup(MAX_BODY_BYTES_VAR)
            .map(|v| parse_positive(MAX_BODY_BYTES_VAR, &v))
            .transpose()?
            .map_or(defaults.max_body_bytes, NonZeroUsize::get);

        Ok(Self { listen_addr, max_concurrency, aggregation, max_body_bytes })
    }
}

fn parse_positive(var: &'static str, value: &str) -> Result<NonZeroUsize, ConfigError> {
    value
        .trim()
        .parse::<NonZeroUsize>()
        .map_err(|_| ConfigError::NotPositive { var, value: value.to_owned() })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn config_defaults_when_environment_empty() {
        let config = match GatewayConfig::from_lookup(|_| None) {
            Ok(c) => c,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert_eq!(config, GatewayConfig::default());
        assert_eq!(config.listen_addr, "0.0.0.0:8000");
        assert!(config.max_concurrency.is_none(), "baseline fan-out is unbounded");
        assert_eq!(config.aggregation, Aggregation::Mutex);
    }

    #[test]
    fn config_reads_all_variables() {
        let lookup = lookup_from(&[
            (LISTEN_ADDR_VAR, "127.0.0.1:9000"),
            (MAX_CONCURRENCY_VAR, "4"),
            (AGGREGATION_VAR, "Channel"),
            (MAX_BODY_BYTES_VAR, "1024"),
        ]);
        let config = match GatewayConfig::from_lookup(lookup) {
            Ok(c) => c,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert_eq!(config.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.max_concurrency, NonZeroUsize::new(4));
        assert_eq!(config.aggregation, Aggregation::Channel);
        assert_eq!(config.max_body_bytes, 1024);
    }

    #[test]
    fn config_rejects_zero_concurrency() {
        let result = GatewayConfig::from_lookup(lookup_from(&[(MAX_CONCURRENCY_VAR, "0")]));
        assert!(
            matches!(result, Err(ConfigError::NotPositive { var: MAX_CONCURRENCY_VAR, .. })),
            "zero must be rejected, got {result:?}"
        );
    }

    #[test]
    fn config_rejects_unknown_aggregation() {
        let result = GatewayConfig::from_lookup(lookup_from(&[(AGGREGATION_VAR, "spinlock")]));
        let err = match result {
            Ok(c) => panic!("expected error, got {c:?}"),
            Err(e) => e,
        };
        assert!(err.to_string().contains("spinlock"), "message must echo the value: {err}");
    }
}
