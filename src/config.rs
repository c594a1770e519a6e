use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required variable absent or empty. Identity-bearing values never fall
    /// back to a default.
    #[error("{0} is not set")]
    MissingValue(String),
}

/// Where the container image comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSource {
    /// Fully qualified public registry reference, e.g. `vaultwarden/server:latest`.
    Registry(String),
    /// Private ECR repository, expanded against the deployment account and region.
    Ecr { repo: String, tag: String },
}

impl ImageSource {
    pub fn reference(&self, account: &str, region: &str) -> String {
        match self {
            ImageSource::Registry(image) => image.clone(),
            ImageSource::Ecr { repo, tag } => {
                format!("{account}.dkr.ecr.{region}.amazonaws.com/{repo}:{tag}")
            }
        }
    }
}

/// A container environment variable carrying an opaque secret value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretVar {
    pub name: String,
    pub value: String,
}

/// Everything one application needs for a full composition pass. Built once,
/// all required fields validated, then passed by reference through the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentConfig {
    /// Logical application name; prefixes declared resource names.
    pub app: String,
    pub cluster_name: String,
    pub service_name: String,
    pub image: ImageSource,
    /// CPU units (1024 = one vCPU).
    pub task_cpu: u32,
    pub task_memory_mib: u32,
    pub service_sg: String,
    pub file_system_id: String,
    pub file_system_sg: String,
    pub certificate_arn: String,
    pub container_port: u16,
    pub mount_path: String,
    pub log_stream_prefix: String,
    pub secret: SecretVar,
    /// Pinned initial task count; `None` leaves it to the platform.
    pub desired_count: Option<u32>,
    pub max_capacity: u32,
    pub account: String,
    pub region: String,
}
