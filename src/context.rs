//! Resource lookup context.
//!
//! Composition never talks to the provider, so lookups that the provider
//! would answer (which VPC is the default one for an account and region) are
//! answered from a local context file instead. The file is TOML:
//!
//! ```toml
//! [[vpc]]
//! account = "123456789012"
//! region = "us-east-1"
//! id = "vpc-0a1b2c3d"
//! ```
//!
//! A missing file yields an empty context; any default-network lookup
//! against an empty context fails, which is the correct failure mode for an
//! account that has no cached lookup data.

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupContext {
    #[serde(default, rename = "vpc")]
    pub vpcs: Vec<VpcEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpcEntry {
    pub account: String,
    pub region: String,
    pub id: String,
}

impl LookupContext {
    pub fn try_init() -> Result<Self, ContextError> {
        use std::io::Read;
        match std::fs::File::open(&crate::cli::get_cli_args().context) {
            Ok(mut file) => {
                let mut raw = String::new();
                file.read_to_string(&mut raw)?;
                Self::try_init_from_string(&raw)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn try_init_from_string(raw: &str) -> Result<Self, ContextError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn default_vpc(&self, account: &str, region: &str) -> Option<&str> {
        self.vpcs
            .iter()
            .find(|v| v.account == account && v.region == region)
            .map(|v| v.id.as_str())
    }
}
