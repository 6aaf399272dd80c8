//! Attribute Model - typed view of the declared transit gateway configuration

use std::collections::HashMap;
use std::fmt;

use transitgw_core::resource::Value;

use crate::error::{GatewayError, Result};
use crate::schemas::transit_gateway;

/// Attribute names
pub mod names {
    pub const CLOUD_TYPE: &str = "cloud_type";
    pub const ACCOUNT_NAME: &str = "account_name";
    pub const GW_NAME: &str = "gw_name";
    pub const VPC_ID: &str = "vpc_id";
    pub const VPC_REGION: &str = "vpc_region";
    pub const GW_SIZE: &str = "gw_size";
    pub const SUBNET: &str = "subnet";
    pub const INSANE_MODE: &str = "insane_mode";
    pub const INSANE_MODE_AZ: &str = "insane_mode_az";
    pub const ALLOCATE_NEW_EIP: &str = "allocate_new_eip";
    pub const EIP: &str = "eip";
    pub const HA_SUBNET: &str = "ha_subnet";
    pub const HA_GW_SIZE: &str = "ha_gw_size";
    pub const HA_INSANE_MODE_AZ: &str = "ha_insane_mode_az";
    pub const HA_EIP: &str = "ha_eip";
    pub const ENABLE_SNAT: &str = "enable_snat";
    pub const TAG_LIST: &str = "tag_list";
    pub const ENABLE_HYBRID_CONNECTION: &str = "enable_hybrid_connection";
    pub const CONNECTED_TRANSIT: &str = "connected_transit";
    pub const ENABLE_FIRENET_INTERFACES: &str = "enable_firenet_interfaces";
}

/// Cloud the gateway is launched in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloudType {
    #[default]
    Aws,
    Azure,
}

impl CloudType {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(CloudType::Aws),
            8 => Some(CloudType::Azure),
            _ => None,
        }
    }

    /// Numeric code used by the controller
    pub fn code(self) -> i64 {
        match self {
            CloudType::Aws => 1,
            CloudType::Azure => 8,
        }
    }

    pub fn supports_tags(self) -> bool {
        self == CloudType::Aws
    }

    pub fn supports_hybrid_connection(self) -> bool {
        self == CloudType::Aws
    }

    pub fn supports_insane_mode(self) -> bool {
        self == CloudType::Aws
    }

    /// Kind of network `vpc_id` names for this cloud
    pub fn network_kind(self) -> &'static str {
        match self {
            CloudType::Aws => "AWS VPC",
            CloudType::Azure => "Azure VNet",
        }
    }
}

impl fmt::Display for CloudType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloudType::Aws => write!(f, "AWS"),
            CloudType::Azure => write!(f, "Azure"),
        }
    }
}

/// Settings of the HA gateway; an empty subnet means no HA gateway
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HaSettings {
    pub subnet: String,
    pub gw_size: String,
    pub insane_mode_az: String,
    pub eip: String,
}

impl HaSettings {
    pub fn is_enabled(&self) -> bool {
        !self.subnet.is_empty()
    }
}

/// Declared configuration of one transit gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitGatewayConfig {
    pub cloud_type: CloudType,
    pub account_name: String,
    pub gw_name: String,
    pub vpc_id: String,
    pub vpc_region: String,
    pub gw_size: String,
    pub subnet: String,
    pub insane_mode: bool,
    pub insane_mode_az: String,
    pub allocate_new_eip: bool,
    pub eip: String,
    pub ha: HaSettings,
    pub enable_snat: bool,
    pub tag_list: Vec<String>,
    pub enable_hybrid_connection: bool,
    pub connected_transit: bool,
    pub enable_firenet_interfaces: bool,
}

impl Default for TransitGatewayConfig {
    fn default() -> Self {
        Self {
            cloud_type: CloudType::default(),
            account_name: String::new(),
            gw_name: String::new(),
            vpc_id: String::new(),
            vpc_region: String::new(),
            gw_size: String::new(),
            subnet: String::new(),
            insane_mode: false,
            insane_mode_az: String::new(),
            allocate_new_eip: true,
            eip: String::new(),
            ha: HaSettings::default(),
            enable_snat: false,
            tag_list: Vec::new(),
            enable_hybrid_connection: false,
            connected_transit: false,
            enable_firenet_interfaces: false,
        }
    }
}

impl TransitGatewayConfig {
    /// Validate a flat attribute map against the schema and read it
    pub fn from_attributes(attributes: &HashMap<String, Value>) -> Result<Self> {
        let schema = transit_gateway::schema();
        schema
            .validate(attributes)
            .map_err(GatewayError::InvalidAttributes)?;
        let attrs = AttributeMap::new(schema.apply_defaults(attributes));

        let code = attrs.int(names::CLOUD_TYPE);
        let cloud_type = CloudType::from_code(code)
            .ok_or_else(|| GatewayError::validation(format!("unsupported cloud type {code}")))?;

        Ok(Self {
            cloud_type,
            account_name: attrs.string(names::ACCOUNT_NAME),
            gw_name: attrs.string(names::GW_NAME),
            vpc_id: attrs.string(names::VPC_ID),
            vpc_region: attrs.string(names::VPC_REGION),
            gw_size: attrs.string(names::GW_SIZE),
            subnet: attrs.string(names::SUBNET),
            insane_mode: attrs.bool(names::INSANE_MODE),
            insane_mode_az: attrs.string(names::INSANE_MODE_AZ),
            allocate_new_eip: attrs.bool_or(names::ALLOCATE_NEW_EIP, true),
            eip: attrs.string(names::EIP),
            ha: HaSettings {
                subnet: attrs.string(names::HA_SUBNET),
                gw_size: attrs.string(names::HA_GW_SIZE),
                insane_mode_az: attrs.string(names::HA_INSANE_MODE_AZ),
                eip: attrs.string(names::HA_EIP),
            },
            enable_snat: attrs.bool(names::ENABLE_SNAT),
            tag_list: attrs.strings(names::TAG_LIST),
            enable_hybrid_connection: attrs.bool(names::ENABLE_HYBRID_CONNECTION),
            connected_transit: attrs.bool(names::CONNECTED_TRANSIT),
            enable_firenet_interfaces: attrs.bool(names::ENABLE_FIRENET_INTERFACES),
        })
    }

    /// Flat attribute map with every attribute present
    pub fn to_attributes(&self) -> HashMap<String, Value> {
        let strings = [
            (names::ACCOUNT_NAME, &self.account_name),
            (names::GW_NAME, &self.gw_name),
            (names::VPC_ID, &self.vpc_id),
            (names::VPC_REGION, &self.vpc_region),
            (names::GW_SIZE, &self.gw_size),
            (names::SUBNET, &self.subnet),
            (names::INSANE_MODE_AZ, &self.insane_mode_az),
            (names::EIP, &self.eip),
            (names::HA_SUBNET, &self.ha.subnet),
            (names::HA_GW_SIZE, &self.ha.gw_size),
            (names::HA_INSANE_MODE_AZ, &self.ha.insane_mode_az),
            (names::HA_EIP, &self.ha.eip),
        ];
        let bools = [
            (names::INSANE_MODE, self.insane_mode),
            (names::ALLOCATE_NEW_EIP, self.allocate_new_eip),
            (names::ENABLE_SNAT, self.enable_snat),
            (names::ENABLE_HYBRID_CONNECTION, self.enable_hybrid_connection),
            (names::CONNECTED_TRANSIT, self.connected_transit),
            (names::ENABLE_FIRENET_INTERFACES, self.enable_firenet_interfaces),
        ];

        let mut attributes: HashMap<String, Value> = strings
            .into_iter()
            .map(|(name, value)| (name.to_string(), Value::String(value.clone())))
            .chain(
                bools
                    .into_iter()
                    .map(|(name, value)| (name.to_string(), Value::Bool(value))),
            )
            .collect();
        attributes.insert(
            names::CLOUD_TYPE.to_string(),
            Value::Int(self.cloud_type.code()),
        );
        attributes.insert(
            names::TAG_LIST.to_string(),
            Value::string_list(self.tag_list.iter().cloned()),
        );
        attributes
    }
}

/// Typed accessors over a validated attribute map
///
/// Absent or mistyped attributes read as the zero value; the schema has
/// already rejected mistyped ones by the time this is built.
#[derive(Debug, Clone, Default)]
pub struct AttributeMap {
    attributes: HashMap<String, Value>,
}

impl AttributeMap {
    pub fn new(attributes: HashMap<String, Value>) -> Self {
        Self { attributes }
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.attributes.get(key).and_then(Value::as_bool)
    }

    pub fn string(&self, key: &str) -> String {
        self.get_string(key).unwrap_or_default().to_string()
    }

    pub fn bool(&self, key: &str) -> bool {
        self.bool_or(key, false)
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }

    pub fn int(&self, key: &str) -> i64 {
        self.attributes
            .get(key)
            .and_then(Value::as_int)
            .unwrap_or_default()
    }

    /// String items of a list attribute, skipping non-string items
    pub fn strings(&self, key: &str) -> Vec<String> {
        self.attributes
            .get(key)
            .and_then(Value::as_list)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}
