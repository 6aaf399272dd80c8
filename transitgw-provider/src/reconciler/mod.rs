//! Reconciler - drives the controller towards the declared configuration
//!
//! Each operation takes an explicit [`ResourceInstance`] and awaits remote
//! calls one after another. Create and Update plan first and execute the
//! plan only after every local check passed.

mod create;
mod delete;
mod read;
mod update;

pub use create::plan_create;
pub use delete::plan_delete;
pub use update::plan_update;

use log::{info, trace};

use crate::attributes::TransitGatewayConfig;
use crate::client::{ClientError, ControllerClient};
use crate::error::{GatewayError, Result};
use crate::plan::{Feature, Operation, OperationPlan};

/// Identity plus declared configuration of one transit gateway
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceInstance {
    /// Bound remote identity (the primary gateway name); `None` until the
    /// gateway exists, and again once it is gone
    pub id: Option<String>,
    pub config: TransitGatewayConfig,
}

impl ResourceInstance {
    pub fn new(config: TransitGatewayConfig) -> Self {
        Self { id: None, config }
    }

    /// Instance for adopting an existing gateway by name
    pub fn import(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            config: TransitGatewayConfig::default(),
        }
    }

    pub fn exists(&self) -> bool {
        self.id.is_some()
    }
}

/// How plan execution ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Completed,
    /// An HA resize found no HA gateway; only the first `completed`
    /// operations were applied
    HaGatewayMissing { completed: usize },
}

/// Transit gateway lifecycle against one controller
pub struct TransitGateway<C> {
    client: C,
}

impl<C: ControllerClient> TransitGateway<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run `plan` in order, stopping at the first failure
    async fn execute(
        &self,
        instance: &mut ResourceInstance,
        plan: &OperationPlan,
    ) -> Result<Outcome> {
        for (index, operation) in plan.operations().iter().enumerate() {
            info!("{}", operation);
            trace!("Request: {}", operation.payload());
            let applied = self.apply(operation).await.map_err(|source| {
                GatewayError::remote(operation.action(), operation.gateway(), source)
            })?;
            if let Operation::Launch(request) = operation {
                instance.id = Some(request.gw_name.clone());
            }
            if !applied {
                return Ok(Outcome::HaGatewayMissing { completed: index });
            }
        }
        Ok(Outcome::Completed)
    }

    /// Issue the calls of one operation; `false` when its target was gone
    async fn apply(&self, operation: &Operation) -> Result<bool, ClientError> {
        let client = &self.client;
        match operation {
            Operation::Launch(request) => client.launch_transit_gateway(request).await?,
            Operation::EnableHa(request) => client.enable_transit_ha(request).await?,
            Operation::Resize { target, gw_size } => client.resize_gateway(target, gw_size).await?,
            Operation::ResizeHa {
                account_name,
                target,
                gw_size,
            } => match client.get_gateway(account_name, &target.gw_name).await {
                Ok(_) => client.resize_gateway(target, gw_size).await?,
                Err(ClientError::NotFound) => {
                    info!("HA gateway '{}' no longer exists", target.gw_name);
                    return Ok(false);
                }
                Err(e) => return Err(e),
            },
            Operation::Delete(target) => client.delete_gateway(target).await?,
            Operation::AddTags(request) => client.add_tags(request).await?,
            Operation::DeleteTags(request) => client.delete_tags(request).await?,
            Operation::SetFeature {
                feature,
                enabled,
                gateway,
            } => match (feature, enabled) {
                (Feature::HybridConnection, true) => client.attach_hybrid(gateway).await?,
                (Feature::HybridConnection, false) => client.detach_hybrid(gateway).await?,
                (Feature::ConnectedTransit, true) => {
                    client.enable_connected_transit(gateway).await?
                }
                (Feature::ConnectedTransit, false) => {
                    client.disable_connected_transit(gateway).await?
                }
                (Feature::Snat, true) => client.enable_snat(gateway).await?,
                (Feature::Snat, false) => client.disable_snat(gateway).await?,
                (Feature::FireNetInterfaces, true) => {
                    client.enable_firenet_interfaces(gateway).await?
                }
                (Feature::FireNetInterfaces, false) => {
                    client.disable_firenet_interfaces(gateway).await?
                }
            },
        }
        Ok(true)
    }
}
