//! Load-balanced service composition.
//!
//! The service is reachable only through its load balancer. Port 80 exists
//! solely to redirect; the invariant is that its listener never carries a
//! forward action. TLS terminates at the 443 listener with the imported
//! certificate.

use serde::{Deserialize, Serialize};

use crate::config::DeploymentConfig;
use crate::stack::Cluster;
use crate::stack::network::{CertificateHandle, ResolvedNetwork, SecurityGroupHandle};
use crate::stack::task::TaskDefinition;

pub const HTTP_PORT: u16 = 80;
pub const HTTPS_PORT: u16 = 443;
/// The provider's recommended TLS policy (TLS 1.2/1.3, modern ciphers).
pub const RECOMMENDED_TLS_POLICY: &str = "ELBSecurityPolicy-TLS13-1-2-2021-06";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Protocol {
    Http,
    Https,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListenerAction {
    Forward {
        target_group: String,
    },
    Redirect {
        port: u16,
        protocol: Protocol,
        permanent: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listener {
    pub port: u16,
    pub protocol: Protocol,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<CertificateHandle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_policy: Option<String>,
    pub default_action: ListenerAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub name: String,
    pub internet_facing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetGroup {
    pub name: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpec {
    pub name: String,
    pub cluster: String,
    pub task_family: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_count: Option<u32>,
    pub assign_public_ip: bool,
    pub security_group: SecurityGroupHandle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTopology {
    pub service: ServiceSpec,
    pub load_balancer: LoadBalancer,
    pub target_group: TargetGroup,
    pub listeners: Vec<Listener>,
}

impl ServiceTopology {
    pub fn listener(&self, port: u16) -> Option<&Listener> {
        self.listeners.iter().find(|l| l.port == port)
    }

    fn replace_default_action(&mut self, port: u16, action: ListenerAction) {
        if let Some(listener) = self.listeners.iter_mut().find(|l| l.port == port) {
            listener.default_action = action;
        }
    }
}

pub fn compose_service(
    config: &DeploymentConfig,
    cluster: &Cluster,
    task: &TaskDefinition,
    network: &ResolvedNetwork,
) -> ServiceTopology {
    let target_group = TargetGroup {
        name: format!("{}-tg", config.app),
        port: config.container_port,
    };

    // The balanced-service pattern wires port 80 straight to the target
    // group. That integration is replaced below, never shipped.
    let mut topology = ServiceTopology {
        service: ServiceSpec {
            name: config.service_name.clone(),
            cluster: cluster.name.clone(),
            task_family: task.family.clone(),
            desired_count: config.desired_count,
            assign_public_ip: true,
            security_group: network.service_sg.clone(),
        },
        load_balancer: LoadBalancer {
            name: format!("{}-lb", config.app),
            internet_facing: true,
        },
        listeners: vec![Listener {
            port: HTTP_PORT,
            protocol: Protocol::Http,
            certificate: None,
            ssl_policy: None,
            default_action: ListenerAction::Forward {
                target_group: target_group.name.clone(),
            },
        }],
        target_group,
    };

    topology.replace_default_action(
        HTTP_PORT,
        ListenerAction::Redirect {
            port: HTTPS_PORT,
            protocol: Protocol::Https,
            permanent: true,
        },
    );

    let forward = ListenerAction::Forward {
        target_group: topology.target_group.name.clone(),
    };
    topology.listeners.push(Listener {
        port: HTTPS_PORT,
        protocol: Protocol::Https,
        certificate: Some(network.certificate.clone()),
        ssl_policy: Some(RECOMMENDED_TLS_POLICY.to_string()),
        default_action: forward,
    });

    topology
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::testutil;

    fn composed(config: &DeploymentConfig) -> ServiceTopology {
        let (cluster, _storage, task, network) = testutil::upstream(config);
        compose_service(config, &cluster, &task, &network)
    }

    #[test]
    fn http_listener_only_redirects() {
        let config = testutil::config("vaultwarden");
        let topology = composed(&config);
        let http = topology.listener(HTTP_PORT).expect("port 80 exists");
        assert_eq!(
            http.default_action,
            ListenerAction::Redirect {
                port: HTTPS_PORT,
                protocol: Protocol::Https,
                permanent: true,
            }
        );
        assert!(http.certificate.is_none());
    }

    #[test]
    fn https_listener_terminates_tls_and_forwards() {
        let config = testutil::config("vaultwarden");
        let topology = composed(&config);
        let https = topology.listener(HTTPS_PORT).expect("port 443 exists");
        assert_eq!(https.protocol, Protocol::Https);
        assert_eq!(
            https.certificate.as_ref().map(|c| c.arn.as_str()),
            Some(config.certificate_arn.as_str())
        );
        assert_eq!(https.ssl_policy.as_deref(), Some(RECOMMENDED_TLS_POLICY));
        assert_eq!(
            https.default_action,
            ListenerAction::Forward {
                target_group: topology.target_group.name.clone(),
            }
        );
    }

    #[test]
    fn one_listener_per_port() {
        let config = testutil::config("vaultwarden");
        let topology = composed(&config);
        assert_eq!(topology.listeners.len(), 2);
        for port in [HTTP_PORT, HTTPS_PORT] {
            assert_eq!(topology.listeners.iter().filter(|l| l.port == port).count(), 1);
        }
    }

    #[test]
    fn desired_count_is_passed_through_only_when_pinned() {
        let mut config = testutil::config("vaultwarden");
        config.desired_count = Some(1);
        assert_eq!(composed(&config).service.desired_count, Some(1));

        config.desired_count = None;
        assert_eq!(composed(&config).service.desired_count, None);
    }

    #[test]
    fn target_group_tracks_the_container_port() {
        let mut config = testutil::config("code-exec");
        config.container_port = 2000;
        let topology = composed(&config);
        assert_eq!(topology.target_group.port, 2000);
        assert!(topology.load_balancer.internet_facing);
        assert!(topology.service.assign_public_ip);
    }
}
