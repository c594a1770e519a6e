use std::collections::HashMap;

use crate::config::ConfigError;

/// One-time snapshot of the process environment.
///
/// Configuration is captured once at the process boundary and handed down by
/// reference; no downstream component re-reads the environment.
#[derive(Debug, Default, Clone)]
pub struct EnvSource {
    inner: HashMap<String, String>,
}

impl EnvSource {
    pub fn from_process() -> Self {
        Self {
            inner: std::env::vars().collect(),
        }
    }

    #[cfg(test)]
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            inner: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// An empty value counts as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner
            .get(key)
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Required variable; fails with the variable name so the caller can fix
    /// their environment.
    pub fn require(&self, key: &str) -> Result<String, ConfigError> {
        self.get(key)
            .map(str::to_owned)
            .ok_or_else(|| ConfigError::MissingValue(key.to_string()))
    }
}
