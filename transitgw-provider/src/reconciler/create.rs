use log::{debug, info};

use super::{ResourceInstance, TransitGateway};
use crate::attributes::TransitGatewayConfig;
use crate::client::ControllerClient;
use crate::error::{GatewayError, Result};
use crate::plan::{Feature, Operation, OperationPlan};
use crate::translator;

/// Validate `config` for a new gateway and list the calls that create it
pub fn plan_create(config: &TransitGatewayConfig) -> Result<OperationPlan> {
    let cloud_type = config.cloud_type;

    if config.vpc_id.is_empty() {
        return Err(GatewayError::validation(format!(
            "'vpc_id' cannot be empty for creating a transit gateway in an {}",
            cloud_type.network_kind()
        )));
    }

    if config.insane_mode {
        if !cloud_type.supports_insane_mode() {
            return Err(GatewayError::validation(
                "'insane_mode' is only supported for AWS (cloud_type = 1)",
            ));
        }
        if config.insane_mode_az.is_empty() {
            return Err(GatewayError::validation(
                "'insane_mode_az' must be set when insane mode is enabled",
            ));
        }
        if config.ha.is_enabled() && config.ha.insane_mode_az.is_empty() {
            return Err(GatewayError::validation(
                "'ha_insane_mode_az' must be set when insane mode is enabled and 'ha_subnet' is set",
            ));
        }
    }

    if config.ha.is_enabled() && config.ha.gw_size.is_empty() {
        return Err(GatewayError::validation(
            "'ha_gw_size' must be set when 'ha_subnet' is set",
        ));
    }

    if !config.allocate_new_eip && config.eip.is_empty() {
        return Err(GatewayError::validation(
            "'eip' must be set when 'allocate_new_eip' is false",
        ));
    }

    if !config.tag_list.is_empty() && !cloud_type.supports_tags() {
        return Err(GatewayError::validation(format!(
            "'tag_list' is only supported for AWS, not {}",
            cloud_type
        )));
    }

    if config.enable_hybrid_connection && !cloud_type.supports_hybrid_connection() {
        return Err(GatewayError::validation(format!(
            "'enable_hybrid_connection' is only supported for AWS, not {}",
            cloud_type
        )));
    }

    let mut plan = OperationPlan::new();
    plan.add(Operation::Launch(translator::to_create_payload(config)));

    if config.ha.is_enabled() {
        plan.add(Operation::EnableHa(translator::ha_payload(config)));
        if config.ha.gw_size != config.gw_size {
            let ha_name = translator::ha_gateway_name(&config.gw_name);
            plan.add(Operation::Resize {
                target: translator::gateway_target(cloud_type, &ha_name),
                gw_size: config.ha.gw_size.clone(),
            });
        }
    }

    if !config.tag_list.is_empty() {
        plan.add(Operation::AddTags(translator::tag_request(
            config,
            &config.tag_list,
        )));
    }

    let features = [
        (Feature::HybridConnection, config.enable_hybrid_connection),
        (Feature::ConnectedTransit, config.connected_transit),
        (Feature::Snat, config.enable_snat),
        (Feature::FireNetInterfaces, config.enable_firenet_interfaces),
    ];
    for (feature, requested) in features {
        if requested {
            plan.add(Operation::SetFeature {
                feature,
                enabled: true,
                gateway: translator::gateway_ref(config),
            });
        }
    }

    Ok(plan)
}

impl<C: ControllerClient> TransitGateway<C> {
    /// Create the gateway described by `instance.config`
    ///
    /// Identity is bound as soon as the launch succeeds. Later failures leave
    /// the gateway in place and are reported after the final read.
    pub async fn create(&self, instance: &mut ResourceInstance) -> Result<()> {
        let plan = plan_create(&instance.config)?;
        info!("Creating transit gateway {}", instance.config.gw_name);
        debug!("Create plan:\n{}", plan);

        let applied = self.execute(instance, &plan).await;
        self.finish_create(instance, applied.map(|_| ())).await
    }

    /// Read back the created gateway exactly once; the step error wins over a
    /// read error
    async fn finish_create(
        &self,
        instance: &mut ResourceInstance,
        applied: Result<()>,
    ) -> Result<()> {
        if !instance.exists() {
            return applied;
        }
        let refreshed = self.read(instance).await;
        applied.and(refreshed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::CloudType;
    use crate::client::ClientError;
    use crate::fake::Call;
    use crate::reconciler::tests::{aws_config, gateway};

    fn with_ha(gw_size: &str) -> TransitGatewayConfig {
        let mut config = aws_config();
        config.ha.subnet = "10.0.1.0/24".to_string();
        config.ha.gw_size = gw_size.to_string();
        config
    }

    #[tokio::test]
    async fn create_without_ha_issues_one_launch() {
        let gw = gateway();
        let mut instance = ResourceInstance::new(aws_config());

        gw.create(&mut instance).await.unwrap();

        assert_eq!(instance.id.as_deref(), Some("transit-1"));
        assert_eq!(gw.client().count("launch"), 1);
        assert_eq!(gw.client().count("enable_ha"), 0);
        assert_eq!(gw.client().mutations().len(), 1);
        assert_eq!(instance.config.eip, "54.0.0.1");
    }

    #[tokio::test]
    async fn create_with_matching_ha_size_skips_resize() {
        let gw = gateway();
        let mut instance = ResourceInstance::new(with_ha("t2.micro"));

        gw.create(&mut instance).await.unwrap();

        assert_eq!(gw.client().count("launch"), 1);
        assert_eq!(gw.client().count("enable_ha"), 1);
        assert_eq!(gw.client().count("resize"), 0);
        assert_eq!(instance.config.ha.subnet, "10.0.1.0/24");
        assert_eq!(instance.config.ha.gw_size, "t2.micro");
    }

    #[tokio::test]
    async fn create_with_larger_ha_size_resizes_ha_gateway() {
        let gw = gateway();
        let mut instance = ResourceInstance::new(with_ha("t2.large"));

        gw.create(&mut instance).await.unwrap();

        let resizes: Vec<Call> = gw
            .client()
            .mutations()
            .into_iter()
            .filter(|c| c.name() == "resize")
            .collect();
        assert_eq!(
            resizes,
            vec![Call::Resize {
                gw_name: "transit-1-hagw".to_string(),
                gw_size: "t2.large".to_string(),
            }]
        );
        assert_eq!(instance.config.ha.gw_size, "t2.large");
        assert_eq!(instance.config.gw_size, "t2.micro");
    }

    #[tokio::test]
    async fn insane_mode_zone_round_trips_through_the_controller() {
        let gw = gateway();
        let mut config = with_ha("t2.micro");
        config.insane_mode = true;
        config.insane_mode_az = "us-east-1a".to_string();
        config.ha.insane_mode_az = "us-east-1b".to_string();
        let mut instance = ResourceInstance::new(config);

        gw.create(&mut instance).await.unwrap();

        let calls = gw.client().calls();
        let Some(Call::Launch(launch)) = calls.first() else {
            panic!("expected launch first, got {:?}", calls);
        };
        assert_eq!(launch.gw_subnet, "10.0.0.0/24~~us-east-1a");
        assert_eq!(launch.insane_mode, "on");
        assert!(calls.iter().any(
            |c| matches!(c, Call::EnableHa(ha) if ha.ha_subnet == "10.0.1.0/24~~us-east-1b")
        ));

        assert!(instance.config.insane_mode);
        assert_eq!(instance.config.subnet, "10.0.0.0/24");
        assert_eq!(instance.config.insane_mode_az, "us-east-1a");
        assert_eq!(instance.config.ha.insane_mode_az, "us-east-1b");
    }

    #[tokio::test]
    async fn tags_on_azure_fail_before_any_call() {
        let gw = gateway();
        let mut config = aws_config();
        config.cloud_type = CloudType::Azure;
        config.vpc_id = "vnet1:rg1".to_string();
        config.tag_list = vec!["env:prod".to_string()];
        let mut instance = ResourceInstance::new(config);

        let err = gw.create(&mut instance).await.unwrap_err();

        assert!(err.is_validation());
        assert!(err.to_string().contains("tag_list"));
        assert!(gw.client().calls().is_empty());
        assert!(!instance.exists());
    }

    #[tokio::test]
    async fn local_preconditions_fail_before_any_call() {
        type Mutate = fn(&mut TransitGatewayConfig);
        let cases: [(Mutate, &str); 7] = [
            (|c: &mut TransitGatewayConfig| c.vpc_id.clear(), "in an AWS VPC"),
            (|c: &mut TransitGatewayConfig| c.insane_mode = true, "'insane_mode_az' must be set"),
            (
                |c: &mut TransitGatewayConfig| {
                    c.cloud_type = CloudType::Azure;
                    c.insane_mode = true;
                    c.insane_mode_az = "az-1".to_string();
                },
                "only supported for AWS",
            ),
            (
                |c: &mut TransitGatewayConfig| {
                    c.insane_mode = true;
                    c.insane_mode_az = "us-east-1a".to_string();
                    c.ha.subnet = "10.0.1.0/24".to_string();
                    c.ha.gw_size = "t2.micro".to_string();
                },
                "'ha_insane_mode_az' must be set",
            ),
            (
                |c: &mut TransitGatewayConfig| c.ha.subnet = "10.0.1.0/24".to_string(),
                "'ha_gw_size' must be set",
            ),
            (|c: &mut TransitGatewayConfig| c.allocate_new_eip = false, "'eip' must be set"),
            (
                |c: &mut TransitGatewayConfig| {
                    c.cloud_type = CloudType::Azure;
                    c.enable_hybrid_connection = true;
                },
                "enable_hybrid_connection",
            ),
        ];

        for (mutate, expected) in cases {
            let gw = gateway();
            let mut config = aws_config();
            mutate(&mut config);
            let mut instance = ResourceInstance::new(config);

            let err = gw.create(&mut instance).await.unwrap_err();
            assert!(
                err.to_string().contains(expected),
                "expected '{}' in '{}'",
                expected,
                err
            );
            assert!(gw.client().calls().is_empty());
        }
    }

    #[test]
    fn azure_vnet_error_names_the_network_kind() {
        let mut config = aws_config();
        config.cloud_type = CloudType::Azure;
        config.vpc_id.clear();
        let err = plan_create(&config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "'vpc_id' cannot be empty for creating a transit gateway in an Azure VNet"
        );
    }

    #[tokio::test]
    async fn features_are_enabled_in_order_after_tags() {
        let mut config = aws_config();
        config.tag_list = vec!["env : prod".to_string(), "team:net".to_string()];
        config.enable_hybrid_connection = true;
        config.connected_transit = true;
        config.enable_snat = true;
        config.enable_firenet_interfaces = true;

        let gw = gateway();
        let mut instance = ResourceInstance::new(config);
        gw.create(&mut instance).await.unwrap();

        let names: Vec<&str> = gw.client().mutations().iter().map(Call::name).collect();
        assert_eq!(
            names,
            vec![
                "launch",
                "add_tags",
                "attach_hybrid",
                "enable_connected_transit",
                "enable_snat",
                "enable_firenet",
            ]
        );
        assert_eq!(gw.client().tags("transit-1"), vec!["env:prod", "team:net"]);
        assert!(instance.config.enable_hybrid_connection);
        assert!(instance.config.enable_firenet_interfaces);
    }

    #[tokio::test]
    async fn launch_failure_leaves_no_identity() {
        let gw = gateway();
        gw.client()
            .fail_on("launch", ClientError::Rejected("quota exceeded".to_string()));
        let mut instance = ResourceInstance::new(aws_config());

        let err = gw.create(&mut instance).await.unwrap_err();

        assert!(!instance.exists());
        assert_eq!(
            err.to_string(),
            "failed to launch transit gateway 'transit-1': controller rejected the request: quota exceeded"
        );
        assert_eq!(gw.client().count("get_gateway"), 0);
    }

    #[tokio::test]
    async fn later_failure_keeps_identity_and_reads_once() {
        let gw = gateway();
        gw.client()
            .fail_on("enable_ha", ClientError::Rejected("subnet in use".to_string()));
        let mut config = with_ha("t2.large");
        config.enable_snat = true;
        let mut instance = ResourceInstance::new(config);

        let err = gw.create(&mut instance).await.unwrap_err();

        assert!(err.to_string().starts_with("failed to enable HA for 'transit-1'"));
        assert_eq!(instance.id.as_deref(), Some("transit-1"));
        assert_eq!(gw.client().count("resize"), 0);
        assert_eq!(gw.client().count("enable_snat"), 0);
        // one lookup for the primary, one for the HA gateway
        assert_eq!(gw.client().count("get_gateway"), 2);
        assert_eq!(gw.client().count("get_detail"), 1);
        assert!(!instance.config.ha.is_enabled());
    }

    #[tokio::test]
    async fn step_error_wins_over_read_error() {
        let gw = gateway();
        gw.client()
            .fail_on("enable_snat", ClientError::Rejected("not ready".to_string()));
        gw.client()
            .fail_on("get_detail", ClientError::Transport("timeout".to_string()));
        let mut config = aws_config();
        config.enable_snat = true;
        let mut instance = ResourceInstance::new(config);

        let err = gw.create(&mut instance).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "failed to enable SNAT on 'transit-1': controller rejected the request: not ready"
        );
        assert_eq!(gw.client().count("get_detail"), 1);
        assert_eq!(instance.id.as_deref(), Some("transit-1"));
    }
}
