use log::info;

use super::{ResourceInstance, TransitGateway};
use crate::attributes::TransitGatewayConfig;
use crate::client::ControllerClient;
use crate::error::Result;
use crate::plan::{Feature, Operation, OperationPlan};
use crate::translator;

/// Calls that remove the gateway and its HA peer
///
/// FireNet interfaces must be off before the controller accepts the delete,
/// and the HA gateway goes before the primary.
pub fn plan_delete(config: &TransitGatewayConfig) -> OperationPlan {
    let mut plan = OperationPlan::new();

    if config.enable_firenet_interfaces {
        plan.add(Operation::SetFeature {
            feature: Feature::FireNetInterfaces,
            enabled: false,
            gateway: translator::gateway_ref(config),
        });
    }

    if config.ha.is_enabled() {
        let ha_name = translator::ha_gateway_name(&config.gw_name);
        plan.add(Operation::Delete(translator::gateway_target(
            config.cloud_type,
            &ha_name,
        )));
    }

    plan.add(Operation::Delete(translator::gateway_target(
        config.cloud_type,
        &config.gw_name,
    )));
    plan
}

impl<C: ControllerClient> TransitGateway<C> {
    /// Delete the gateway; `instance.id` is cleared once the primary is gone
    pub async fn delete(&self, instance: &mut ResourceInstance) -> Result<()> {
        info!("Deleting transit gateway {}", instance.config.gw_name);
        let plan = plan_delete(&instance.config);
        self.execute(instance, &plan).await?;
        instance.id = None;
        Ok(())
    }
}
