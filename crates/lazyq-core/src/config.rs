//! Query configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Upper bound on the number of source elements a query accepts.
    /// `None` means unbounded.
    pub max_source_len: Option<usize>,

    /// Match join keys with numeric cross-comparison (`1 == 1.0`).
    /// When false, join keys must be strictly equal.
    pub loose_join_keys: bool,

    /// Emit one TRACE event per evaluated element (requires the `tracing` feature).
    pub trace_outcomes: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_source_len: None,
            loose_join_keys: true,
            trace_outcomes: false,
        }
    }
}

impl QueryConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `LAZYQ_MAX_SOURCE_LEN`: maximum number of source elements
    /// - `LAZYQ_LOOSE_JOIN_KEYS`: `true`/`false`
    /// - `LAZYQ_TRACE_OUTCOMES`: `true`/`false`
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("LAZYQ_MAX_SOURCE_LEN") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.max_source_len = Some(v);
            }
        }

        if let Ok(s) = std::env::var("LAZYQ_LOOSE_JOIN_KEYS") {
            if let Some(v) = parse_flag(&s) {
                cfg.loose_join_keys = v;
            }
        }

        if let Ok(s) = std::env::var("LAZYQ_TRACE_OUTCOMES") {
            if let Some(v) = parse_flag(&s) {
                cfg.trace_outcomes = v;
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_source_len == Some(0) {
            return Err(Error::Config("max_source_len must be positive".into()));
        }
        Ok(())
    }

    /// Check a source length against `max_source_len`.
    pub fn check_source_len(&self, len: usize) -> Result<()> {
        match self.max_source_len {
            Some(max) if len > max => Err(Error::InvalidArgument(format!(
                "source has {len} elements, limit is {max}"
            ))),
            _ => Ok(()),
        }
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = QueryConfig::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.loose_join_keys);
        assert!(cfg.check_source_len(usize::MAX).is_ok());
    }

    #[test]
    fn zero_limit_is_rejected() {
        let cfg = QueryConfig {
            max_source_len: Some(0),
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn source_limit_is_enforced() {
        let cfg = QueryConfig {
            max_source_len: Some(2),
            ..Default::default()
        };
        assert!(cfg.check_source_len(2).is_ok());
        assert!(matches!(
            cfg.check_source_len(3),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: QueryConfig = serde_json::from_str(r#"{"trace_outcomes": true}"#).unwrap();
        assert!(cfg.trace_outcomes);
        assert!(cfg.loose_join_keys);
        assert_eq!(cfg.max_source_len, None);
    }

    #[test]
    fn flags_parse_common_spellings() {
        assert_eq!(parse_flag("ON"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
