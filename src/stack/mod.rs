//! One declaration chain per application.
//!
//! `compose` runs the stages in strict dependency order: network resolution,
//! cluster, storage binding, task, load-balanced service, access wiring,
//! autoscaling, outputs. Each stage consumes the previous stage's values, so
//! a declaration whose inputs are unresolved cannot be produced. The pass is
//! atomic: the first failure aborts it and nothing partial escapes.
//!
//! Composition is descriptive. Nothing here blocks or talks to the provider;
//! applying the declaration set, waiting, and reconciling belong to the
//! provisioning engine.

pub mod access;
pub mod network;
pub mod scaling;
pub mod service;
pub mod storage;
pub mod task;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, DeploymentConfig};
use crate::context::LookupContext;
use crate::stack::access::AccessWiring;
use crate::stack::network::{LookupError, ResolvedNetwork, VpcHandle};
use crate::stack::scaling::ServiceScaling;
use crate::stack::service::ServiceTopology;
use crate::stack::storage::SharedStorage;
use crate::stack::task::{TaskDefinition, TaskError};

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("lookup failed: {0}")]
    Lookup(#[from] LookupError),
    #[error("task composition failed: {0}")]
    Task(#[from] TaskError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub name: String,
    pub vpc: VpcHandle,
}

/// Reference to an attribute the engine only knows after apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRef {
    pub resource: String,
    pub attribute: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub name: String,
    pub value: AttributeRef,
}

/// Field order is dependency order; the engine applies top to bottom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackDeclaration {
    pub name: String,
    pub network: ResolvedNetwork,
    pub cluster: Cluster,
    pub storage: SharedStorage,
    pub task: TaskDefinition,
    pub service: ServiceTopology,
    pub access: AccessWiring,
    pub scaling: ServiceScaling,
    pub outputs: Vec<Output>,
}

pub fn compose(
    config: &DeploymentConfig,
    ctx: &LookupContext,
) -> Result<StackDeclaration, ComposeError> {
    let network = network::resolve(config, ctx)?;
    let cluster = Cluster {
        name: config.cluster_name.clone(),
        vpc: network.vpc.clone(),
    };
    let storage = storage::bind_storage(&config.file_system_id, &network.file_system_sg)?;
    let task = task::compose_task(config, &storage)?;
    let service = service::compose_service(config, &cluster, &task, &network);
    let access = access::wire_access(&storage, &task, &network.service_sg);
    let scaling = scaling::attach_autoscaling(&service.service.name, config.max_capacity);
    let outputs = vec![Output {
        name: "LoadBalancerDNS".to_string(),
        value: AttributeRef {
            resource: service.load_balancer.name.clone(),
            attribute: "dns_name".to_string(),
        },
    }];

    Ok(StackDeclaration {
        name: config.app.clone(),
        network,
        cluster,
        storage,
        task,
        service,
        access,
        scaling,
        outputs,
    })
}

#[cfg(test)]
pub(crate) mod testutil {
    use crate::config::{DeploymentConfig, ImageSource, SecretVar};
    use crate::context::{LookupContext, VpcEntry};
    use crate::stack::network::{ResolvedNetwork, SecurityGroupHandle};
    use crate::stack::storage::SharedStorage;
    use crate::stack::task::TaskDefinition;
    use crate::stack::{Cluster, network, storage, task};

    pub const ACCOUNT: &str = "123456789012";
    pub const REGION: &str = "us-east-1";

    pub fn security_group(id: &str) -> SecurityGroupHandle {
        SecurityGroupHandle { id: id.to_string() }
    }

    pub fn config(app: &str) -> DeploymentConfig {
        DeploymentConfig {
            app: app.to_string(),
            cluster_name: format!("{app}-cluster"),
            service_name: format!("{app}-service"),
            image: ImageSource::Registry("vaultwarden/server:latest".to_string()),
            task_cpu: 256,
            task_memory_mib: 512,
            service_sg: "sg-aaa111".to_string(),
            file_system_id: "fs-0123456789abcdef0".to_string(),
            file_system_sg: "sg-bbb222".to_string(),
            certificate_arn: format!("arn:aws:acm:{REGION}:{ACCOUNT}:certificate/test"),
            container_port: 80,
            mount_path: "/data".to_string(),
            log_stream_prefix: app.to_string(),
            secret: SecretVar {
                name: "ADMIN_TOKEN".to_string(),
                value: "s3cret".to_string(),
            },
            desired_count: Some(1),
            max_capacity: 2,
            account: ACCOUNT.to_string(),
            region: REGION.to_string(),
        }
    }

    pub fn context() -> LookupContext {
        LookupContext {
            vpcs: vec![VpcEntry {
                account: ACCOUNT.to_string(),
                region: REGION.to_string(),
                id: "vpc-test".to_string(),
            }],
        }
    }

    /// Everything the later stages consume, composed from `config`.
    pub fn upstream(
        config: &DeploymentConfig,
    ) -> (Cluster, SharedStorage, TaskDefinition, ResolvedNetwork) {
        let network = network::resolve(config, &context()).expect("context has the VPC");
        let cluster = Cluster {
            name: config.cluster_name.clone(),
            vpc: network.vpc.clone(),
        };
        let storage = storage::bind_storage(&config.file_system_id, &network.file_system_sg)
            .expect("valid file system id");
        let task = task::compose_task(config, &storage).expect("valid task size");
        (cluster, storage, task, network)
    }
}
