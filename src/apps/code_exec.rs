use crate::config::{ConfigError, DeploymentConfig, ImageSource};
use crate::context::LookupContext;
use crate::env::EnvSource;
use crate::secrets::{self, MissingSecret, SecretSpec};
use crate::stack::{self, ComposeError, StackDeclaration};

pub const APP: &str = "code-exec";

const CLUSTER_NAME: &str = "code-exec-cluster";
const SERVICE_NAME: &str = "code-exec-service";
const CONTAINER_PORT: u16 = 2000;
const SANDBOX_MOUNT: &str = "/piston";
const TASK_CPU: u32 = 1024;
const TASK_MEMORY_MIB: u32 = 2048;
const MAX_CAPACITY: u32 = 5;

/// Execution API key. Absence yields an empty key; switch `on_missing` to
/// `Fail` to require the token instead.
const API_KEY: SecretSpec = SecretSpec {
    name: "API_KEY",
    source: "CE_API_TOKEN",
    on_missing: MissingSecret::EmptyString,
};

/// The unit is optional; it is only composed when an image repository is
/// configured.
pub fn enabled(env: &EnvSource) -> bool {
    env.get("CODE_EXEC_REPO").is_some()
}

pub fn config(env: &EnvSource) -> Result<DeploymentConfig, ConfigError> {
    Ok(DeploymentConfig {
        app: APP.to_string(),
        cluster_name: CLUSTER_NAME.to_string(),
        service_name: SERVICE_NAME.to_string(),
        image: ImageSource::Ecr {
            repo: env.require("CODE_EXEC_REPO")?,
            tag: env.require("CODE_EXEC_TAG")?,
        },
        task_cpu: TASK_CPU,
        task_memory_mib: TASK_MEMORY_MIB,
        service_sg: env.require("SERVICE_SG")?,
        file_system_id: env.require("CODE_EXEC_FILE_SYSTEM_ID")?,
        file_system_sg: env.require("FILE_SYSTEM_SG")?,
        certificate_arn: env.require("CERTIFICATE_ARN")?,
        container_port: CONTAINER_PORT,
        mount_path: SANDBOX_MOUNT.to_string(),
        log_stream_prefix: APP.to_string(),
        secret: secrets::fetch(env, &API_KEY)?,
        // Not pinned; the scaling floor decides.
        desired_count: None,
        max_capacity: MAX_CAPACITY,
        account: env.require("AWS_ACCOUNT_ID")?,
        region: env.require("AWS_REGION")?,
    })
}

pub fn stack(env: &EnvSource, ctx: &LookupContext) -> Result<StackDeclaration, ComposeError> {
    let config = config(env)?;
    stack::compose(&config, ctx)
}
