//! Secret resolution for container environment variables.

use crate::config::{ConfigError, SecretVar};
use crate::env::EnvSource;

/// What to do when a secret's source variable is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingSecret {
    /// Resolve to an empty string. The container decides what an empty
    /// credential means.
    EmptyString,
    /// Abort configuration with an error naming the variable.
    Fail,
}

/// A secret an application expects: the variable name inside the container,
/// the host variable it is read from, and the missing-value policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretSpec {
    pub name: &'static str,
    pub source: &'static str,
    pub on_missing: MissingSecret,
}

pub fn fetch(env: &EnvSource, spec: &SecretSpec) -> Result<SecretVar, ConfigError> {
    let value = match env.get(spec.source) {
        Some(value) => value.to_string(),
        None => match spec.on_missing {
            MissingSecret::EmptyString => {
                log::warn!("{} is not set, {} will be empty", spec.source, spec.name);
                String::new()
            }
            MissingSecret::Fail => {
                return Err(ConfigError::MissingValue(spec.source.to_string()));
            }
        },
    };
    Ok(SecretVar {
        name: spec.name.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: SecretSpec = SecretSpec {
        name: "ADMIN_TOKEN",
        source: "ADMIN_TOKEN",
        on_missing: MissingSecret::EmptyString,
    };

    #[test]
    fn fetch_reads_the_source_variable() {
        let env = EnvSource::from_pairs([("ADMIN_TOKEN", "s3cret")]);
        let secret = fetch(&env, &TOKEN).expect("must resolve");
        assert_eq!(secret.name, "ADMIN_TOKEN");
        assert_eq!(secret.value, "s3cret");
    }

    #[test]
    fn missing_source_resolves_empty_under_empty_string_policy() {
        let env = EnvSource::default();
        let secret = fetch(&env, &TOKEN).expect("policy accepts absence");
        assert_eq!(secret.value, "");
    }

    #[test]
    fn missing_source_aborts_under_fail_policy() {
        let spec = SecretSpec {
            on_missing: MissingSecret::Fail,
            ..TOKEN
        };
        let env = EnvSource::default();
        let err = fetch(&env, &spec).expect_err("policy rejects absence");
        assert_eq!(err.to_string(), "ADMIN_TOKEN is not set");
    }
}
