//! Shared storage binding.
//!
//! The filesystem already exists; it is imported by identifier and given a
//! resource policy in two phases:
//!
//! 1. At bind time the task role does not exist yet, so the mount policy
//!    cannot name a principal. It allows the mount action to *any* principal,
//!    conditioned on the request arriving through a mount target rather than
//!    as a direct network call.
//! 2. Once the task role exists, access wiring attaches the role-specific
//!    grant (see `stack::access`).
//!
//! The filesystem is regional and may be shared across consumers. Two
//! deployment passes that bind the same filesystem both rewrite its policy;
//! keep such passes in a single deployment to avoid policy drift.

use serde::{Deserialize, Serialize};

use crate::stack::network::{LookupError, SecurityGroupHandle};

/// Mount action allowed to any principal arriving through a mount target.
pub const CLIENT_MOUNT: &str = "elasticfilesystem:ClientMount";
/// Condition key: the request came through a mount target.
pub const VIA_MOUNT_TARGET: &str = "elasticfilesystem:AccessedViaMountTarget";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Principal {
    /// Any principal (`*`).
    Any,
    /// A declared role, referenced by name.
    Role(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoolCondition {
    pub key: String,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStatement {
    pub actions: Vec<String>,
    pub principal: Principal,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<BoolCondition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSystemImport {
    pub file_system_id: String,
    pub security_group: SecurityGroupHandle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedStorage {
    pub file_system: FileSystemImport,
    pub mount_policy: PolicyStatement,
}

pub fn bind_storage(
    file_system_id: &str,
    security_group: &SecurityGroupHandle,
) -> Result<SharedStorage, LookupError> {
    if file_system_id.is_empty() {
        return Err(LookupError::EmptyFileSystem);
    }
    Ok(SharedStorage {
        file_system: FileSystemImport {
            file_system_id: file_system_id.to_string(),
            security_group: security_group.clone(),
        },
        mount_policy: PolicyStatement {
            actions: vec![CLIENT_MOUNT.to_string()],
            principal: Principal::Any,
            conditions: vec![BoolCondition {
                key: VIA_MOUNT_TARGET.to_string(),
                value: true,
            }],
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sg() -> SecurityGroupHandle {
        SecurityGroupHandle {
            id: "sg-0f1e2d3c".to_string(),
        }
    }

    #[test]
    fn mount_policy_never_names_a_principal() {
        let storage = bind_storage("fs-0123456789abcdef0", &sg()).expect("valid id");
        assert_eq!(storage.mount_policy.principal, Principal::Any);
        assert_eq!(storage.mount_policy.actions, vec![CLIENT_MOUNT.to_string()]);
    }

    #[test]
    fn mount_policy_is_conditioned_on_mount_target_provenance() {
        let storage = bind_storage("fs-0123456789abcdef0", &sg()).expect("valid id");
        assert_eq!(
            storage.mount_policy.conditions,
            vec![BoolCondition {
                key: VIA_MOUNT_TARGET.to_string(),
                value: true,
            }]
        );
    }

    #[test]
    fn empty_file_system_id_is_rejected() {
        assert!(matches!(
            bind_storage("", &sg()),
            Err(LookupError::EmptyFileSystem)
        ));
    }
}
