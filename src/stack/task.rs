use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::DeploymentConfig;
use crate::stack::storage::SharedStorage;

pub type Result<T> = std::result::Result<T, TaskError>;

/// Service principal trusted by both task roles.
pub const TASK_EXECUTION_SERVICE: &str = "ecs-tasks.amazonaws.com";
/// Name of the shared storage volume inside the task definition.
pub const STORAGE_VOLUME: &str = "efs";

// Smallest task the platform schedules. The full cpu/memory pairing table
// lives in the provisioning engine; only sizes below this floor are rejected
// here.
const MIN_TASK_CPU: u32 = 256;
const MIN_TASK_MEMORY_MIB: u32 = 512;

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("unsupported task size: {cpu} CPU units with {memory} MiB")]
    UnsupportedTaskSize { cpu: u32, memory: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRole {
    pub name: String,
    pub trusted_service: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    pub name: String,
    pub file_system_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMapping {
    pub container_port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountPoint {
    pub container_path: String,
    pub source_volume: String,
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    pub stream_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerDefinition {
    pub name: String,
    pub image: String,
    pub environment: BTreeMap<String, String>,
    pub logging: LogConfig,
    pub port_mappings: Vec<PortMapping>,
    pub mount_points: Vec<MountPoint>,
}

/// One container, one volume, two roles. The execution role pulls the image
/// and ships logs; the task role is the container's runtime identity and is
/// what access wiring grants storage access to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub family: String,
    pub cpu: u32,
    pub memory_mib: u32,
    pub execution_role: TaskRole,
    pub task_role: TaskRole,
    pub volume: Volume,
    pub container: ContainerDefinition,
}

pub fn compose_task(config: &DeploymentConfig, storage: &SharedStorage) -> Result<TaskDefinition> {
    if config.task_cpu < MIN_TASK_CPU || config.task_memory_mib < MIN_TASK_MEMORY_MIB {
        return Err(TaskError::UnsupportedTaskSize {
            cpu: config.task_cpu,
            memory: config.task_memory_mib,
        });
    }

    let role = |suffix: &str| TaskRole {
        name: format!("{}-{suffix}", config.app),
        trusted_service: TASK_EXECUTION_SERVICE.to_string(),
    };

    // An unset secret resolves to an empty value upstream; the declaration
    // carries it as-is.
    let mut environment = BTreeMap::new();
    environment.insert(config.secret.name.clone(), config.secret.value.clone());

    Ok(TaskDefinition {
        family: format!("{}-task", config.app),
        cpu: config.task_cpu,
        memory_mib: config.task_memory_mib,
        execution_role: role("execution-role"),
        task_role: role("task-role"),
        volume: Volume {
            name: STORAGE_VOLUME.to_string(),
            file_system_id: storage.file_system.file_system_id.clone(),
        },
        container: ContainerDefinition {
            name: config.app.clone(),
            image: config.image.reference(&config.account, &config.region),
            environment,
            logging: LogConfig {
                stream_prefix: config.log_stream_prefix.clone(),
            },
            port_mappings: vec![PortMapping {
                container_port: config.container_port,
            }],
            mount_points: vec![MountPoint {
                container_path: config.mount_path.clone(),
                source_volume: STORAGE_VOLUME.to_string(),
                read_only: false,
            }],
        },
    })
}
