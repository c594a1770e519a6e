use serde::{Deserialize, Serialize};

pub const UTILIZATION_TARGET_PERCENT: u32 = 70;
pub const SCALE_COOLDOWN_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalingMetric {
    Cpu,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalableTarget {
    pub service: String,
    /// `None` means the platform floor; never pinned below it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_capacity: Option<u32>,
    pub max_capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetTrackingPolicy {
    pub name: String,
    pub metric: ScalingMetric,
    pub target_percent: u32,
    pub scale_in_cooldown_secs: u64,
    pub scale_out_cooldown_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceScaling {
    pub target: ScalableTarget,
    pub policies: Vec<TargetTrackingPolicy>,
}

/// Two independent triggers on one target; either crossing its threshold may
/// add capacity. Scale-in is the engine's call once cooldowns elapse.
pub fn attach_autoscaling(service_name: &str, max_capacity: u32) -> ServiceScaling {
    let policy = |name: &str, metric| TargetTrackingPolicy {
        name: name.to_string(),
        metric,
        target_percent: UTILIZATION_TARGET_PERCENT,
        scale_in_cooldown_secs: SCALE_COOLDOWN_SECS,
        scale_out_cooldown_secs: SCALE_COOLDOWN_SECS,
    };
    ServiceScaling {
        target: ScalableTarget {
            service: service_name.to_string(),
            min_capacity: None,
            max_capacity,
        },
        policies: vec![
            policy("cpu-scaling", ScalingMetric::Cpu),
            policy("memory-scaling", ScalingMetric::Memory),
        ],
    }
}
