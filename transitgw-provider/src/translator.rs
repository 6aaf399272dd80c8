//! State Translator - maps the declared configuration to controller records
//! and back
//!
//! The "yes"/"no" and "on"/"off" flag encodings and the "~~" separator never
//! leave this module.

use std::collections::HashSet;

use crate::attributes::{CloudType, HaSettings, TransitGatewayConfig};
use crate::error::{GatewayError, Result};
use crate::wire::{
    EnableTransitHa, GatewayDetail, GatewayRecord, GatewayRef, GatewayTarget,
    LaunchTransitGateway, TagRequest, TagTarget,
};

/// Separator between a subnet and its availability zone
pub const ZONE_SEPARATOR: &str = "~~";

/// Suffix appended to the primary name to name the HA gateway
pub const HA_GATEWAY_SUFFIX: &str = "-hagw";

/// Controller resource type for gateway tags
const TAG_RESOURCE_TYPE: &str = "gw";

pub fn ha_gateway_name(gw_name: &str) -> String {
    format!("{}{}", gw_name, HA_GATEWAY_SUFFIX)
}

fn yes_no(flag: bool) -> String {
    let value = if flag { "yes" } else { "no" };
    value.to_string()
}

fn on_off(flag: bool) -> String {
    let value = if flag { "on" } else { "off" };
    value.to_string()
}

fn is_yes(value: &str) -> bool {
    value == "yes"
}

/// Subnet with an optional availability zone qualifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZonedSubnet {
    pub subnet: String,
    pub zone: Option<String>,
}

impl ZonedSubnet {
    pub fn plain(subnet: impl Into<String>) -> Self {
        Self {
            subnet: subnet.into(),
            zone: None,
        }
    }

    pub fn qualified(subnet: impl Into<String>, zone: impl Into<String>) -> Self {
        Self {
            subnet: subnet.into(),
            zone: Some(zone.into()),
        }
    }

    /// Qualify the subnet with `zone` only in insane mode
    fn for_mode(subnet: &str, insane_mode: bool, zone: &str) -> Self {
        if insane_mode {
            Self::qualified(subnet, zone)
        } else {
            Self::plain(subnet)
        }
    }

    pub fn to_wire(&self) -> String {
        match &self.zone {
            Some(zone) => format!("{}{}{}", self.subnet, ZONE_SEPARATOR, zone),
            None => self.subnet.clone(),
        }
    }

    pub fn from_wire(value: &str) -> Self {
        match value.split_once(ZONE_SEPARATOR) {
            Some((subnet, zone)) => Self::qualified(subnet, zone),
            None => Self::plain(value),
        }
    }
}

/// First component of a "~~"-joined controller identifier
fn first_component(composite: &str) -> &str {
    composite
        .split_once(ZONE_SEPARATOR)
        .map_or(composite, |(first, _)| first)
}

/// Build the launch request for the primary gateway
pub fn to_create_payload(config: &TransitGatewayConfig) -> LaunchTransitGateway {
    let (vpc_id, vnet_and_resource_group) = match config.cloud_type {
        CloudType::Aws => (Some(config.vpc_id.clone()), None),
        CloudType::Azure => (None, Some(config.vpc_id.clone())),
    };
    let subnet = ZonedSubnet::for_mode(&config.subnet, config.insane_mode, &config.insane_mode_az);

    LaunchTransitGateway {
        cloud_type: config.cloud_type.code(),
        account_name: config.account_name.clone(),
        gw_name: config.gw_name.clone(),
        vpc_id,
        vnet_and_resource_group,
        vpc_reg: config.vpc_region.clone(),
        gw_size: config.gw_size.clone(),
        gw_subnet: subnet.to_wire(),
        enable_nat: yes_no(config.enable_snat),
        enable_hybrid_connection: yes_no(config.enable_hybrid_connection),
        connected_transit: yes_no(config.connected_transit),
        insane_mode: on_off(config.insane_mode),
        reuse_eip: on_off(!config.allocate_new_eip),
        eip: (!config.allocate_new_eip).then(|| config.eip.clone()),
    }
}

/// Build the request attaching the HA gateway to the primary
pub fn ha_payload(config: &TransitGatewayConfig) -> EnableTransitHa {
    let subnet = ZonedSubnet::for_mode(
        &config.ha.subnet,
        config.insane_mode,
        &config.ha.insane_mode_az,
    );
    let eip = (config.cloud_type == CloudType::Aws && !config.ha.eip.is_empty())
        .then(|| config.ha.eip.clone());

    EnableTransitHa {
        gw_name: config.gw_name.clone(),
        ha_subnet: subnet.to_wire(),
        eip,
    }
}

pub fn gateway_target(cloud_type: CloudType, gw_name: &str) -> GatewayTarget {
    GatewayTarget {
        cloud_type: cloud_type.code(),
        gw_name: gw_name.to_string(),
    }
}

pub fn gateway_ref(config: &TransitGatewayConfig) -> GatewayRef {
    GatewayRef {
        cloud_type: config.cloud_type.code(),
        account_name: config.account_name.clone(),
        gw_name: config.gw_name.clone(),
        vpc_id: config.vpc_id.clone(),
        vpc_reg: config.vpc_region.clone(),
    }
}

pub fn tag_target(config: &TransitGatewayConfig) -> TagTarget {
    TagTarget {
        cloud_type: config.cloud_type.code(),
        resource_type: TAG_RESOURCE_TYPE.to_string(),
        resource_name: config.gw_name.clone(),
    }
}

pub fn tag_request(config: &TransitGatewayConfig, tags: &[String]) -> TagRequest {
    TagRequest {
        target: tag_target(config),
        tag_list: encode_tag_list(tags),
    }
}

/// Split a "key:value" entry, trimming whitespace around both parts
pub fn parse_tag(tag: &str) -> Option<(&str, &str)> {
    tag.split_once(':')
        .map(|(key, value)| (key.trim(), value.trim()))
}

/// Comma-joined "key:value" pairs built from the key list and the value list
pub fn encode_tag_list(tags: &[String]) -> String {
    let (keys, values): (Vec<&str>, Vec<&str>) =
        tags.iter().filter_map(|tag| parse_tag(tag)).unzip();
    keys.iter()
        .zip(&values)
        .map(|(key, value)| format!("{}:{}", key, value))
        .collect::<Vec<_>>()
        .join(",")
}

/// Entries of `left` that are missing from `right`, in `left` order
pub fn difference(left: &[String], right: &[String]) -> Vec<String> {
    let right: HashSet<&str> = right.iter().map(String::as_str).collect();
    left.iter()
        .filter(|tag| !right.contains(tag.as_str()))
        .cloned()
        .collect()
}

/// Controller tags win when they differ from the declared ones as a set;
/// otherwise the declared order is kept
pub fn reconcile_tags(declared: &[String], reported: Vec<String>) -> Vec<String> {
    if difference(declared, &reported).is_empty() && difference(&reported, declared).is_empty() {
        declared.to_vec()
    } else {
        reported
    }
}

/// Map the primary gateway record back into a configuration
///
/// Tags and HA settings are not part of the record and stay at their
/// defaults.
pub fn from_remote(
    gateway: &GatewayRecord,
    detail: &GatewayDetail,
) -> Result<TransitGatewayConfig> {
    let cloud_type = CloudType::from_code(gateway.cloud_type).ok_or_else(|| {
        GatewayError::UnexpectedResponse(format!(
            "gateway '{}' has unsupported cloud type {}",
            gateway.gw_name, gateway.cloud_type
        ))
    })?;

    let (vpc_id, enable_hybrid_connection, allocate_new_eip) = match cloud_type {
        CloudType::Aws => (
            first_component(&gateway.vpc_id).to_string(),
            gateway.enable_hybrid_connection,
            gateway.allocate_new_eip,
        ),
        CloudType::Azure => (gateway.vpc_id.clone(), false, true),
    };

    let insane_mode = is_yes(&gateway.insane_mode);
    let insane_mode_az = if insane_mode {
        gateway.gateway_zone.clone()
    } else {
        String::new()
    };

    Ok(TransitGatewayConfig {
        cloud_type,
        account_name: gateway.account_name.clone(),
        gw_name: gateway.gw_name.clone(),
        vpc_id,
        vpc_region: gateway.vpc_region.clone(),
        gw_size: gateway.gw_size.clone(),
        subnet: gateway.vpc_net.clone(),
        insane_mode,
        insane_mode_az,
        allocate_new_eip,
        eip: gateway.public_ip.clone(),
        ha: HaSettings::default(),
        enable_snat: is_yes(&gateway.enable_nat),
        tag_list: Vec::new(),
        enable_hybrid_connection,
        connected_transit: is_yes(&gateway.connected_transit),
        enable_firenet_interfaces: detail.dmz_enabled,
    })
}

/// Map the HA gateway record back into HA settings
pub fn ha_from_remote(ha: &GatewayRecord) -> HaSettings {
    let insane_mode_az = if is_yes(&ha.insane_mode) {
        ha.gateway_zone.clone()
    } else {
        String::new()
    };

    HaSettings {
        subnet: ha.vpc_net.clone(),
        gw_size: ha.gw_size.clone(),
        insane_mode_az,
        eip: ha.public_ip.clone(),
    }
}
