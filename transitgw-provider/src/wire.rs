//! Request and response records exchanged with the controller
//!
//! Flags travel as the strings the controller expects ("yes"/"no",
//! "on"/"off"). Only the translator builds these records; the rest of the
//! crate works with [`crate::attributes::TransitGatewayConfig`].

use serde::{Deserialize, Serialize};

/// Launch a new primary transit gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchTransitGateway {
    pub cloud_type: i64,
    pub account_name: String,
    pub gw_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
    #[serde(rename = "vnet_and_resource_group_names", skip_serializing_if = "Option::is_none")]
    pub vnet_and_resource_group: Option<String>,
    pub vpc_reg: String,
    pub gw_size: String,
    /// Subnet, zone-qualified in insane mode
    pub gw_subnet: String,
    pub enable_nat: String,
    pub enable_hybrid_connection: String,
    pub connected_transit: String,
    pub insane_mode: String,
    pub reuse_eip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eip: Option<String>,
}

/// Attach an HA gateway to an existing primary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnableTransitHa {
    pub gw_name: String,
    /// Subnet, zone-qualified in insane mode
    pub ha_subnet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eip: Option<String>,
}

/// Names a single gateway for resize and delete calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayTarget {
    pub cloud_type: i64,
    pub gw_name: String,
}

/// Identifies a gateway for feature toggles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayRef {
    pub cloud_type: i64,
    pub account_name: String,
    pub gw_name: String,
    pub vpc_id: String,
    pub vpc_reg: String,
}

/// The resource whose tags are read or written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagTarget {
    pub cloud_type: i64,
    pub resource_type: String,
    pub resource_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRequest {
    #[serde(flatten)]
    pub target: TagTarget,
    /// Comma-joined "key:value" pairs
    pub tag_list: String,
}

impl TagRequest {
    /// Individual "key:value" entries carried by this request
    pub fn tags(&self) -> Vec<&str> {
        self.tag_list
            .split(',')
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

/// Gateway record as reported by the controller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayRecord {
    pub cloud_type: i64,
    pub account_name: String,
    pub gw_name: String,
    /// For AWS the controller reports "vpc-id~~vpc-name"
    pub vpc_id: String,
    pub vpc_net: String,
    pub vpc_region: String,
    pub gw_size: String,
    pub public_ip: String,
    pub enable_nat: String,
    pub connected_transit: String,
    pub insane_mode: String,
    pub gateway_zone: String,
    pub enable_hybrid_connection: bool,
    pub allocate_new_eip: bool,
}

/// Feature state reported by the gateway detail call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayDetail {
    pub dmz_enabled: bool,
}
