use log::{debug, info, warn};
use transitgw_core::differ::AttributeChanges;

use super::{Outcome, ResourceInstance, TransitGateway};
use crate::attributes::{HaSettings, TransitGatewayConfig, names};
use crate::client::ControllerClient;
use crate::error::{GatewayError, Result};
use crate::plan::{Feature, Operation, OperationPlan};
use crate::schemas::transit_gateway;
use crate::translator;

/// Validate a change from `old` to `new` and list the calls that apply it
pub fn plan_update(
    old: &TransitGatewayConfig,
    new: &TransitGatewayConfig,
) -> Result<OperationPlan> {
    let changes = AttributeChanges::between(&old.to_attributes(), &new.to_attributes());

    let schema = transit_gateway::schema();
    if let Some(name) = schema
        .immutable_attributes()
        .into_iter()
        .find(|name| changes.has_change(name))
    {
        return Err(GatewayError::validation(format!(
            "updating {} is not allowed",
            name
        )));
    }

    if new.ha.is_enabled() && new.ha.gw_size.is_empty() {
        return Err(GatewayError::validation(
            "'ha_gw_size' must be set when 'ha_subnet' is set",
        ));
    }

    if changes.has_change(names::ALLOCATE_NEW_EIP) {
        warn!(
            "Changing allocate_new_eip on {} has no effect after creation",
            new.gw_name
        );
    }

    let cloud_type = new.cloud_type;
    let ha_name = translator::ha_gateway_name(&new.gw_name);
    let mut plan = OperationPlan::new();
    let mut ha_launched = false;

    if changes.has_change(names::GW_SIZE) {
        plan.add(Operation::Resize {
            target: translator::gateway_target(cloud_type, &new.gw_name),
            gw_size: new.gw_size.clone(),
        });
    }

    if changes.has_any_change(&[names::HA_SUBNET, names::HA_INSANE_MODE_AZ]) {
        if new.insane_mode && new.ha.is_enabled() && new.ha.insane_mode_az.is_empty() {
            return Err(GatewayError::validation(
                "'ha_insane_mode_az' must be set when insane mode is enabled and 'ha_subnet' is set",
            ));
        }
        if old.ha.is_enabled() {
            plan.add(Operation::Delete(translator::gateway_target(
                cloud_type, &ha_name,
            )));
        }
        if new.ha.is_enabled() {
            plan.add(Operation::EnableHa(translator::ha_payload(new)));
            // A fresh HA gateway starts at the primary's size
            if new.ha.gw_size != new.gw_size {
                plan.add(Operation::Resize {
                    target: translator::gateway_target(cloud_type, &ha_name),
                    gw_size: new.ha.gw_size.clone(),
                });
            }
            ha_launched = true;
        }
    }

    if changes.has_change(names::TAG_LIST) {
        if !cloud_type.supports_tags() {
            return Err(GatewayError::validation(format!(
                "'tag_list' is only supported for AWS, not {}",
                cloud_type
            )));
        }
        let removed = translator::difference(&old.tag_list, &new.tag_list);
        let added = translator::difference(&new.tag_list, &old.tag_list);
        if !removed.is_empty() {
            plan.add(Operation::DeleteTags(translator::tag_request(new, &removed)));
        }
        if !added.is_empty() {
            plan.add(Operation::AddTags(translator::tag_request(new, &added)));
        }
    }

    if changes.has_change(names::ENABLE_HYBRID_CONNECTION) {
        if !cloud_type.supports_hybrid_connection() {
            return Err(GatewayError::validation(format!(
                "'enable_hybrid_connection' is only supported for AWS, not {}",
                cloud_type
            )));
        }
        plan.add(set_feature(new, Feature::HybridConnection, new.enable_hybrid_connection));
    }

    if changes.has_change(names::CONNECTED_TRANSIT) {
        plan.add(set_feature(new, Feature::ConnectedTransit, new.connected_transit));
    }

    if changes.has_change(names::HA_GW_SIZE) && !ha_launched {
        if new.ha.is_enabled() {
            plan.add(Operation::ResizeHa {
                account_name: new.account_name.clone(),
                target: translator::gateway_target(cloud_type, &ha_name),
                gw_size: new.ha.gw_size.clone(),
            });
        } else {
            debug!("No HA gateway declared for {}, skipping HA resize", new.gw_name);
        }
    }

    if changes.has_change(names::ENABLE_SNAT) {
        plan.add(set_feature(new, Feature::Snat, new.enable_snat));
    }

    if changes.has_change(names::ENABLE_FIRENET_INTERFACES) {
        plan.add(set_feature(
            new,
            Feature::FireNetInterfaces,
            new.enable_firenet_interfaces,
        ));
    }

    Ok(plan)
}

fn set_feature(config: &TransitGatewayConfig, feature: Feature, enabled: bool) -> Operation {
    Operation::SetFeature {
        feature,
        enabled,
        gateway: translator::gateway_ref(config),
    }
}

/// `baseline` with the attributes set by `applied` taken from `desired`
///
/// HA settings are cleared: this is only used once the HA gateway is gone.
fn partially_applied(
    baseline: &TransitGatewayConfig,
    desired: &TransitGatewayConfig,
    applied: &[Operation],
) -> TransitGatewayConfig {
    let mut config = TransitGatewayConfig {
        ha: HaSettings::default(),
        ..baseline.clone()
    };
    for operation in applied {
        match operation {
            Operation::Resize { target, .. } if target.gw_name == desired.gw_name => {
                config.gw_size = desired.gw_size.clone();
            }
            Operation::AddTags(_) | Operation::DeleteTags(_) => {
                config.tag_list = desired.tag_list.clone();
            }
            Operation::SetFeature {
                feature, enabled, ..
            } => match feature {
                Feature::HybridConnection => config.enable_hybrid_connection = *enabled,
                Feature::ConnectedTransit => config.connected_transit = *enabled,
                Feature::Snat => config.enable_snat = *enabled,
                Feature::FireNetInterfaces => config.enable_firenet_interfaces = *enabled,
            },
            _ => {}
        }
    }
    config
}

impl<C: ControllerClient> TransitGateway<C> {
    /// Move the gateway from `instance.config` to `desired`
    ///
    /// On failure, including a failed final read, `instance` keeps the
    /// previously applied configuration.
    pub async fn update(
        &self,
        instance: &mut ResourceInstance,
        desired: TransitGatewayConfig,
    ) -> Result<()> {
        if !instance.exists() {
            return Err(GatewayError::validation(format!(
                "transit gateway {} has no identity to update",
                desired.gw_name
            )));
        }
        let plan = plan_update(&instance.config, &desired)?;
        info!("Updating transit gateway {}", desired.gw_name);
        debug!("Update plan:\n{}", plan);

        match self.execute(instance, &plan).await? {
            Outcome::Completed => {
                let mut refreshed = ResourceInstance {
                    id: instance.id.clone(),
                    config: desired,
                };
                self.read(&mut refreshed).await?;
                *instance = refreshed;
                Ok(())
            }
            Outcome::HaGatewayMissing { completed } => {
                let applied = &plan.operations()[..completed];
                instance.config = partially_applied(&instance.config, &desired, applied);
                Ok(())
            }
        }
    }
}
