use log::{debug, trace};

use super::{ResourceInstance, TransitGateway};
use crate::attributes::HaSettings;
use crate::client::{ClientError, ControllerClient};
use crate::error::{GatewayError, Result};
use crate::translator;

impl<C: ControllerClient> TransitGateway<C> {
    /// Refresh `instance.config` from the controller
    ///
    /// A primary gateway that no longer exists clears `instance.id` and is
    /// not an error. Configuration is only replaced once every lookup
    /// succeeded.
    pub async fn read(&self, instance: &mut ResourceInstance) -> Result<()> {
        if instance.config.gw_name.is_empty() {
            let Some(id) = instance.id.clone() else {
                return Err(GatewayError::validation(
                    "cannot read a transit gateway without a name or identity",
                ));
            };
            debug!("Importing transit gateway {}", id);
            instance.config.gw_name = id;
        }
        let account_name = instance.config.account_name.clone();
        let gw_name = instance.config.gw_name.clone();

        let gateway = match self.client.get_gateway(&account_name, &gw_name).await {
            Ok(gateway) => gateway,
            Err(ClientError::NotFound) => {
                debug!("Transit gateway {} not found, clearing identity", gw_name);
                instance.id = None;
                return Ok(());
            }
            Err(e) => return Err(GatewayError::remote("find transit gateway", &gw_name, e)),
        };
        trace!("Transit gateway record: {:?}", gateway);

        let detail = self
            .client
            .get_gateway_detail(&gateway)
            .await
            .map_err(|e| GatewayError::remote("get details of transit gateway", &gw_name, e))?;

        let mut observed = translator::from_remote(&gateway, &detail)?;
        // Imports carry no account name; the controller's record does
        let account_name = observed.account_name.clone();

        observed.tag_list = if observed.cloud_type.supports_tags() {
            let reported = self
                .client
                .get_tags(&translator::tag_target(&observed))
                .await
                .map_err(|e| GatewayError::remote("get tags of", &gw_name, e))?;
            translator::reconcile_tags(&instance.config.tag_list, reported)
        } else {
            instance.config.tag_list.clone()
        };

        let ha_name = translator::ha_gateway_name(&gw_name);
        observed.ha = match self.client.get_gateway(&account_name, &ha_name).await {
            Ok(ha) => {
                trace!("HA gateway record: {:?}", ha);
                translator::ha_from_remote(&ha)
            }
            Err(ClientError::NotFound) => HaSettings::default(),
            Err(e) => return Err(GatewayError::remote("find HA gateway", &ha_name, e)),
        };

        instance.id = Some(gw_name);
        instance.config = observed;
        Ok(())
    }
}
