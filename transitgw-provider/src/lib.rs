//! Transit Gateway Provider
//!
//! Manages a transit gateway, and its optional HA gateway, against a network
//! controller.
//!
//! ## Module Structure
//!
//! - `attributes` - Typed view of the declared configuration
//! - `schemas` - Attribute schema of the resource
//! - `client` - Controller client facade
//! - `wire` - Controller request and response records
//! - `translator` - Mapping between configuration and controller records
//! - `plan` - Ordered remote operations
//! - `reconciler` - Create, Read, Update and Delete
//! - `provider` - TransitGatewayProvider implementation

pub mod attributes;
pub mod client;
pub mod error;
pub mod plan;
pub mod provider;
pub mod reconciler;
pub mod resources;
pub mod schemas;
pub mod translator;
pub mod wire;

#[cfg(test)]
mod fake;

pub use attributes::{CloudType, HaSettings, TransitGatewayConfig};
pub use client::{ClientError, ControllerClient};
pub use error::GatewayError;
pub use provider::TransitGatewayProvider;
pub use reconciler::{ResourceInstance, TransitGateway};

use transitgw_core::provider::{BoxFuture, Provider, ProviderResult, ResourceType};
use transitgw_core::resource::{Resource, ResourceId, State};

use resources::resource_types;

// =============================================================================
// Provider Trait Implementation
// =============================================================================

impl<C: ControllerClient> Provider for TransitGatewayProvider<C> {
    fn name(&self) -> &'static str {
        "transitgw"
    }

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
        resource_types()
    }

    fn read(
        &self,
        id: &ResourceId,
        identifier: Option<&str>,
        known: Option<&State>,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.map(|s| s.to_string());
        let known = known.cloned();
        Box::pin(async move { self.read_resource(id, identifier, known).await })
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move { self.create_resource(resource).await })
    }

    fn update(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        let from = from.clone();
        let to = to.clone();
        Box::pin(async move { self.update_resource(id, identifier, from, to).await })
    }

    fn delete(
        &self,
        id: &ResourceId,
        identifier: &str,
        state: &State,
    ) -> BoxFuture<'_, ProviderResult<()>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        let state = state.clone();
        Box::pin(async move { self.delete_resource(id, identifier, state).await })
    }
}
