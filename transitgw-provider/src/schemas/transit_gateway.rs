//! Transit gateway resource schema definition

use transitgw_core::resource::Value;
use transitgw_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types, validate_cidr};

use crate::attributes::{CloudType, names};

pub const RESOURCE_TYPE: &str = "transit_gateway";

/// Cloud type code type
/// Accepts 1 (AWS) and 8 (Azure)
pub fn cloud_type() -> AttributeType {
    AttributeType::Custom {
        name: "CloudType".to_string(),
        base: Box::new(AttributeType::Int),
        validate: |value| match value {
            Value::Int(code) if CloudType::from_code(*code).is_some() => Ok(()),
            Value::Int(code) => Err(format!(
                "unsupported cloud type {}, expected 1 (AWS) or 8 (Azure)",
                code
            )),
            _ => Err("expected integer".to_string()),
        },
    }
}

/// CIDR block, or empty when the subnet is not used
pub fn optional_cidr() -> AttributeType {
    AttributeType::Custom {
        name: "OptionalCidr".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| match value {
            Value::String(s) if s.is_empty() => Ok(()),
            Value::String(s) => validate_cidr(s),
            _ => Err("expected string".to_string()),
        },
    }
}

/// Tag entry in "key:value" form
pub fn tag_entry() -> AttributeType {
    AttributeType::Custom {
        name: "Tag".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            if let Value::String(s) = value {
                match s.split_once(':') {
                    Some((key, _)) if !key.trim().is_empty() => Ok(()),
                    _ => Err(format!("invalid tag '{}', expected key:value", s)),
                }
            } else {
                Err("expected string".to_string())
            }
        },
    }
}

fn empty_string() -> Value {
    Value::String(String::new())
}

/// Returns the schema for a transit gateway
pub fn schema() -> ResourceSchema {
    ResourceSchema::new(RESOURCE_TYPE)
        .with_description("A transit gateway, optionally paired with an HA gateway")
        // ========== Identity and placement ==========
        .attribute(
            AttributeSchema::new(names::CLOUD_TYPE, cloud_type())
                .required()
                .immutable()
                .with_description("Cloud the gateway runs in: 1 (AWS) or 8 (Azure)"),
        )
        .attribute(
            AttributeSchema::new(names::ACCOUNT_NAME, types::non_empty_string())
                .required()
                .immutable()
                .with_description("Controller account the gateway belongs to"),
        )
        .attribute(
            AttributeSchema::new(names::GW_NAME, types::non_empty_string())
                .required()
                .immutable()
                .with_description("Name of the gateway; also its identity"),
        )
        .attribute(
            AttributeSchema::new(names::VPC_ID, AttributeType::String)
                .required()
                .immutable()
                .with_description("VPC ID (AWS) or \"vnet:resource-group\" (Azure)"),
        )
        .attribute(
            AttributeSchema::new(names::VPC_REGION, types::non_empty_string())
                .required()
                .immutable()
                .with_description("Region of the VPC"),
        )
        .attribute(
            AttributeSchema::new(names::GW_SIZE, types::non_empty_string())
                .required()
                .with_description("Instance size of the gateway"),
        )
        .attribute(
            AttributeSchema::new(names::SUBNET, types::cidr())
                .required()
                .immutable()
                .with_description("Public subnet the gateway is launched in"),
        )
        .attribute(
            AttributeSchema::new(names::INSANE_MODE, AttributeType::Bool)
                .immutable()
                .with_default(Value::Bool(false))
                .with_description("Enable insane mode (AWS only)"),
        )
        .attribute(
            AttributeSchema::new(names::INSANE_MODE_AZ, AttributeType::String)
                .immutable()
                .with_default(empty_string())
                .with_description("Availability zone of the subnet; required with insane mode"),
        )
        // ========== Public address ==========
        .attribute(
            AttributeSchema::new(names::ALLOCATE_NEW_EIP, AttributeType::Bool)
                .with_default(Value::Bool(true))
                .with_description("Allocate a new EIP; only honored at creation"),
        )
        .attribute(
            AttributeSchema::new(names::EIP, AttributeType::String)
                .computed()
                .with_default(empty_string())
                .with_description("EIP to reuse when allocate_new_eip is false"),
        )
        // ========== HA gateway ==========
        .attribute(
            AttributeSchema::new(names::HA_SUBNET, optional_cidr())
                .with_default(empty_string())
                .with_description("Subnet of the HA gateway; empty disables HA"),
        )
        .attribute(
            AttributeSchema::new(names::HA_GW_SIZE, AttributeType::String)
                .with_default(empty_string())
                .with_description("Instance size of the HA gateway"),
        )
        .attribute(
            AttributeSchema::new(names::HA_INSANE_MODE_AZ, AttributeType::String)
                .with_default(empty_string())
                .with_description("Availability zone of the HA subnet; required with insane mode"),
        )
        .attribute(
            AttributeSchema::new(names::HA_EIP, AttributeType::String)
                .computed()
                .with_default(empty_string())
                .with_description("Public IP of the HA gateway"),
        )
        // ========== Features ==========
        .attribute(
            AttributeSchema::new(names::ENABLE_SNAT, AttributeType::Bool)
                .with_default(Value::Bool(false))
                .with_description("Enable source NAT"),
        )
        .attribute(
            AttributeSchema::new(names::TAG_LIST, AttributeType::List(Box::new(tag_entry())))
                .with_default(Value::List(Vec::new()))
                .with_description("Tags as \"key:value\" entries (AWS only)"),
        )
        .attribute(
            AttributeSchema::new(names::ENABLE_HYBRID_CONNECTION, AttributeType::Bool)
                .with_default(Value::Bool(false))
                .with_description(
                    "Attach the gateway to the cloud's transit gateway service (AWS only)",
                ),
        )
        .attribute(
            AttributeSchema::new(names::CONNECTED_TRANSIT, AttributeType::Bool)
                .with_default(Value::Bool(false))
                .with_description("Route traffic between spokes attached to this gateway"),
        )
        .attribute(
            AttributeSchema::new(names::ENABLE_FIRENET_INTERFACES, AttributeType::Bool)
                .with_default(Value::Bool(false))
                .with_description("Enable interfaces for firewall integration"),
        )
}
