//! Plan - ordered remote operations derived from declared configuration
//!
//! Planning is pure. Every validation happens while the plan is built, so a
//! plan that exists can be executed without further local checks.

use std::fmt;

use serde_json::json;

use crate::wire::{EnableTransitHa, GatewayRef, GatewayTarget, LaunchTransitGateway, TagRequest};

/// Feature toggled by a dedicated enable/disable call pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    HybridConnection,
    ConnectedTransit,
    Snat,
    FireNetInterfaces,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::HybridConnection => write!(f, "hybrid connection"),
            Feature::ConnectedTransit => write!(f, "connected transit"),
            Feature::Snat => write!(f, "SNAT"),
            Feature::FireNetInterfaces => write!(f, "FireNet interfaces"),
        }
    }
}

/// A single remote call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Launch the primary gateway; identity is bound once this succeeds
    Launch(LaunchTransitGateway),
    EnableHa(EnableTransitHa),
    Resize {
        target: GatewayTarget,
        gw_size: String,
    },
    /// Resize the HA gateway if it still exists; execution halts when it
    /// does not
    ResizeHa {
        account_name: String,
        target: GatewayTarget,
        gw_size: String,
    },
    Delete(GatewayTarget),
    AddTags(TagRequest),
    DeleteTags(TagRequest),
    SetFeature {
        feature: Feature,
        enabled: bool,
        gateway: GatewayRef,
    },
}

impl Operation {
    /// Verb phrase used in error messages ("failed to {action} '{gateway}'")
    pub fn action(&self) -> String {
        match self {
            Operation::Launch(_) => "launch transit gateway".to_string(),
            Operation::EnableHa(_) => "enable HA for".to_string(),
            Operation::Resize { .. } | Operation::ResizeHa { .. } => "resize gateway".to_string(),
            Operation::Delete(_) => "delete gateway".to_string(),
            Operation::AddTags(_) => "add tags to".to_string(),
            Operation::DeleteTags(_) => "delete tags from".to_string(),
            Operation::SetFeature {
                feature, enabled, ..
            } => {
                let verb = match (feature, enabled) {
                    (Feature::HybridConnection, true) => "attach",
                    (Feature::HybridConnection, false) => "detach",
                    (_, true) => "enable",
                    (_, false) => "disable",
                };
                format!("{} {} on", verb, feature)
            }
        }
    }

    /// Request body sent to the controller
    pub fn payload(&self) -> serde_json::Value {
        let payload = match self {
            Operation::Launch(request) => serde_json::to_value(request),
            Operation::EnableHa(request) => serde_json::to_value(request),
            Operation::Resize { target, gw_size } | Operation::ResizeHa { target, gw_size, .. } => {
                Ok(json!({
                    "cloud_type": target.cloud_type,
                    "gw_name": target.gw_name,
                    "gw_size": gw_size,
                }))
            }
            Operation::Delete(target) => serde_json::to_value(target),
            Operation::AddTags(request) | Operation::DeleteTags(request) => {
                serde_json::to_value(request)
            }
            Operation::SetFeature { gateway, .. } => serde_json::to_value(gateway),
        };
        payload.unwrap_or(serde_json::Value::Null)
    }

    /// Name of the gateway the operation targets
    pub fn gateway(&self) -> &str {
        match self {
            Operation::Launch(request) => &request.gw_name,
            Operation::EnableHa(request) => &request.gw_name,
            Operation::Resize { target, .. }
            | Operation::ResizeHa { target, .. }
            | Operation::Delete(target) => &target.gw_name,
            Operation::AddTags(request) | Operation::DeleteTags(request) => {
                &request.target.resource_name
            }
            Operation::SetFeature { gateway, .. } => &gateway.gw_name,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::EnableHa(request) => {
                write!(f, "enable HA for '{}' in {}", request.gw_name, request.ha_subnet)
            }
            Operation::Resize { gw_size, .. } | Operation::ResizeHa { gw_size, .. } => {
                write!(f, "resize '{}' to {}", self.gateway(), gw_size)
            }
            Operation::AddTags(request) | Operation::DeleteTags(request) => {
                write!(f, "{} '{}': {}", self.action(), self.gateway(), request.tag_list)
            }
            _ => write!(f, "{} '{}'", self.action(), self.gateway()),
        }
    }
}

/// Ordered list of operations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationPlan {
    operations: Vec<Operation>,
}

impl OperationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }
}

impl fmt::Display for OperationPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "No changes");
        }
        for (i, operation) in self.operations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}. {}", i + 1, operation)?;
        }
        Ok(())
    }
}
