//! Resource type definitions

use transitgw_core::provider::ResourceType;
use transitgw_core::schema::ResourceSchema;

use crate::schemas;

macro_rules! define_resource_type {
    ($name:ident, $type_name:expr, $schema:path) => {
        pub struct $name;
        impl ResourceType for $name {
            fn name(&self) -> &'static str {
                $type_name
            }
            fn schema(&self) -> ResourceSchema {
                $schema()
            }
        }
    };
}

define_resource_type!(
    TransitGatewayType,
    schemas::transit_gateway::RESOURCE_TYPE,
    schemas::transit_gateway::schema
);

/// Returns all resource types supported by this provider
pub fn resource_types() -> Vec<Box<dyn ResourceType>> {
    vec![Box::new(TransitGatewayType)]
}
