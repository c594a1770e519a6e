use serde::{Deserialize, Serialize};

use crate::stack::network::SecurityGroupHandle;
use crate::stack::storage::{CLIENT_MOUNT, PolicyStatement, Principal, SharedStorage};
use crate::stack::task::TaskDefinition;

/// NFS port; mount and lock-heartbeat traffic both use it.
pub const STORAGE_PORT: u16 = 2049;

pub const CLIENT_WRITE: &str = "elasticfilesystem:ClientWrite";
pub const CLIENT_ROOT_ACCESS: &str = "elasticfilesystem:ClientRootAccess";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAuthorization {
    pub from: SecurityGroupHandle,
    pub to: SecurityGroupHandle,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessWiring {
    pub storage_grant: PolicyStatement,
    pub network_rules: Vec<NetworkAuthorization>,
}

/// Second authorization phase, after the service exists. The task role is
/// only known here, which is why the bind-time mount policy could not name
/// it. Traffic must be authorized in both directions: with only the
/// service-to-storage rule, mounts succeed and then hang.
pub fn wire_access(
    storage: &SharedStorage,
    task: &TaskDefinition,
    service_sg: &SecurityGroupHandle,
) -> AccessWiring {
    let storage_sg = &storage.file_system.security_group;
    AccessWiring {
        storage_grant: PolicyStatement {
            actions: vec![
                CLIENT_MOUNT.to_string(),
                CLIENT_WRITE.to_string(),
                CLIENT_ROOT_ACCESS.to_string(),
            ],
            principal: Principal::Role(task.task_role.name.clone()),
            conditions: Vec::new(),
        },
        network_rules: vec![
            NetworkAuthorization {
                from: service_sg.clone(),
                to: storage_sg.clone(),
                port: STORAGE_PORT,
            },
            NetworkAuthorization {
                from: storage_sg.clone(),
                to: service_sg.clone(),
                port: STORAGE_PORT,
            },
        ],
    }
}
