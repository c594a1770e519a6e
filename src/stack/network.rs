use serde::{Deserialize, Serialize};

use crate::config::DeploymentConfig;
use crate::context::LookupContext;

pub type Result<T> = std::result::Result<T, LookupError>;

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("no default VPC for account {account} in {region}")]
    NoDefaultVpc { account: String, region: String },
    #[error("certificate ARN is empty")]
    EmptyCertificateArn,
    #[error("security group id is empty")]
    EmptySecurityGroup,
    #[error("file system id is empty")]
    EmptyFileSystem,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpcHandle {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateHandle {
    pub arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroupHandle {
    pub id: String,
}

/// Handles for everything the stack references but does not create.
/// Read-only once resolved; valid for one composition pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedNetwork {
    pub vpc: VpcHandle,
    pub certificate: CertificateHandle,
    pub service_sg: SecurityGroupHandle,
    pub file_system_sg: SecurityGroupHandle,
}

/// Pure lookups, no mutation. Resolving the same identifiers twice yields
/// equal handles.
pub fn resolve(config: &DeploymentConfig, ctx: &LookupContext) -> Result<ResolvedNetwork> {
    Ok(ResolvedNetwork {
        vpc: resolve_default_vpc(ctx, &config.account, &config.region)?,
        certificate: resolve_certificate(&config.certificate_arn)?,
        service_sg: resolve_security_group(&config.service_sg)?,
        file_system_sg: resolve_security_group(&config.file_system_sg)?,
    })
}

pub fn resolve_default_vpc(ctx: &LookupContext, account: &str, region: &str) -> Result<VpcHandle> {
    match ctx.default_vpc(account, region) {
        Some(id) => Ok(VpcHandle { id: id.to_string() }),
        None => Err(LookupError::NoDefaultVpc {
            account: account.to_string(),
            region: region.to_string(),
        }),
    }
}

/// The ARN is opaque; anything beyond non-emptiness is the provisioning
/// engine's problem.
pub fn resolve_certificate(arn: &str) -> Result<CertificateHandle> {
    if arn.is_empty() {
        return Err(LookupError::EmptyCertificateArn);
    }
    Ok(CertificateHandle {
        arn: arn.to_string(),
    })
}

pub fn resolve_security_group(id: &str) -> Result<SecurityGroupHandle> {
    if id.is_empty() {
        return Err(LookupError::EmptySecurityGroup);
    }
    Ok(SecurityGroupHandle { id: id.to_string() })
}
