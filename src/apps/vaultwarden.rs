use crate::config::{ConfigError, DeploymentConfig, ImageSource};
use crate::context::LookupContext;
use crate::env::EnvSource;
use crate::secrets::{self, MissingSecret, SecretSpec};
use crate::stack::{self, ComposeError, StackDeclaration};

pub const APP: &str = "vaultwarden";

const CLUSTER_NAME: &str = "vaultwarden-cluster";
const SERVICE_NAME: &str = "vaultwarden-service";
const IMAGE: &str = "vaultwarden/server:latest";
const CONTAINER_PORT: u16 = 80;
const DATA_MOUNT: &str = "/data";
const TASK_CPU: u32 = 256;
const TASK_MEMORY_MIB: u32 = 512;
const MAX_CAPACITY: u32 = 2;

/// Web-vault admin token. The container treats an empty token as "admin
/// page disabled", so absence is tolerated.
const ADMIN_TOKEN: SecretSpec = SecretSpec {
    name: "ADMIN_TOKEN",
    source: "ADMIN_TOKEN",
    on_missing: MissingSecret::EmptyString,
};

pub fn config(env: &EnvSource) -> Result<DeploymentConfig, ConfigError> {
    Ok(DeploymentConfig {
        app: APP.to_string(),
        cluster_name: CLUSTER_NAME.to_string(),
        service_name: SERVICE_NAME.to_string(),
        image: ImageSource::Registry(IMAGE.to_string()),
        task_cpu: TASK_CPU,
        task_memory_mib: TASK_MEMORY_MIB,
        service_sg: env.require("SERVICE_SG")?,
        file_system_id: env.require("FILE_SYSTEM_ID")?,
        file_system_sg: env.require("FILE_SYSTEM_SG")?,
        certificate_arn: env.require("CERTIFICATE_ARN")?,
        container_port: CONTAINER_PORT,
        mount_path: DATA_MOUNT.to_string(),
        log_stream_prefix: APP.to_string(),
        secret: secrets::fetch(env, &ADMIN_TOKEN)?,
        // Pinned: exactly one task at creation, whatever the scaling cap.
        desired_count: Some(1),
        max_capacity: MAX_CAPACITY,
        account: env.require("AWS_ACCOUNT_ID")?,
        region: env.require("AWS_REGION")?,
    })
}

pub fn stack(env: &EnvSource, ctx: &LookupContext) -> Result<StackDeclaration, ComposeError> {
    let config = config(env)?;
    stack::compose(&config, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::VpcEntry;

    const REQUIRED: [&str; 6] = [
        "AWS_ACCOUNT_ID",
        "AWS_REGION",
        "FILE_SYSTEM_ID",
        "FILE_SYSTEM_SG",
        "SERVICE_SG",
        "CERTIFICATE_ARN",
    ];

    fn full_env() -> Vec<(&'static str, &'static str)> {
        vec![
            ("AWS_ACCOUNT_ID", "123456789012"),
            ("AWS_REGION", "us-east-1"),
            ("FILE_SYSTEM_ID", "fs-0123456789abcdef0"),
            ("FILE_SYSTEM_SG", "sg-bbb222"),
            ("SERVICE_SG", "sg-aaa111"),
            (
                "CERTIFICATE_ARN",
                "arn:aws:acm:us-east-1:123456789012:certificate/test",
            ),
            ("ADMIN_TOKEN", "s3cret"),
        ]
    }

    #[test]
    fn each_missing_required_variable_is_named() {
        for missing in REQUIRED {
            let env = EnvSource::from_pairs(
                full_env().into_iter().filter(|(k, _)| *k != missing),
            );
            let err = config(&env).expect_err("must fail without the variable");
            assert!(
                err.to_string().contains(missing),
                "{err} should name {missing}"
            );
        }
    }

    #[test]
    fn admin_token_is_optional() {
        let env = EnvSource::from_pairs(
            full_env().into_iter().filter(|(k, _)| *k != "ADMIN_TOKEN"),
        );
        let config = config(&env).expect("token absence is tolerated");
        assert_eq!(config.secret.name, "ADMIN_TOKEN");
        assert_eq!(config.secret.value, "");
    }

    #[test]
    fn full_stack_composes_from_the_environment() {
        let env = EnvSource::from_pairs(full_env());
        let ctx = LookupContext {
            vpcs: vec![VpcEntry {
                account: "123456789012".to_string(),
                region: "us-east-1".to_string(),
                id: "vpc-test".to_string(),
            }],
        };
        let declaration = stack(&env, &ctx).expect("composes");
        assert_eq!(declaration.name, APP);
        assert_eq!(declaration.cluster.name, CLUSTER_NAME);
        assert_eq!(declaration.service.service.desired_count, Some(1));
        assert_eq!(declaration.scaling.target.max_capacity, MAX_CAPACITY);
        assert_eq!(declaration.task.container.image, IMAGE);
        assert_eq!(
            declaration.task.container.mount_points[0].container_path,
            DATA_MOUNT
        );
    }
}
