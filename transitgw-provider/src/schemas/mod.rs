//! Resource schema definitions

pub mod transit_gateway;

use transitgw_core::schema::ResourceSchema;

/// Returns all schemas of this provider
pub fn all_schemas() -> Vec<ResourceSchema> {
    vec![transit_gateway::schema()]
}
