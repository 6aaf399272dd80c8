//! Transit gateway provider implementation
//!
//! Converts between the orchestrator's `Resource`/`State` attribute maps and
//! the reconciler's typed [`ResourceInstance`].

use std::collections::HashMap;

use transitgw_core::provider::{ProviderError, ProviderResult};
use transitgw_core::resource::{Resource, ResourceId, State, Value};

use crate::attributes::TransitGatewayConfig;
use crate::client::ControllerClient;
use crate::error::GatewayError;
use crate::reconciler::{ResourceInstance, TransitGateway};

/// Transit gateway provider backed by a controller client
pub struct TransitGatewayProvider<C> {
    gateway: TransitGateway<C>,
}

impl<C: ControllerClient> TransitGatewayProvider<C> {
    pub fn new(client: C) -> Self {
        Self {
            gateway: TransitGateway::new(client),
        }
    }

    pub fn gateway(&self) -> &TransitGateway<C> {
        &self.gateway
    }

    /// Read a gateway; without a `known` state the identifier names the
    /// gateway to adopt
    pub async fn read_resource(
        &self,
        id: ResourceId,
        identifier: Option<String>,
        known: Option<State>,
    ) -> ProviderResult<State> {
        let Some(identifier) = identifier else {
            return Ok(State::not_found(id));
        };
        let config = match known {
            Some(state) if state.exists && !state.attributes.is_empty() => {
                parse_config(&id, &state.attributes)?
            }
            _ => TransitGatewayConfig::default(),
        };
        let mut instance = ResourceInstance {
            id: Some(identifier),
            config,
        };

        self.gateway
            .read(&mut instance)
            .await
            .map_err(|e| provider_error(&id, e))?;
        Ok(state_of(id, &instance))
    }

    pub async fn create_resource(&self, resource: Resource) -> ProviderResult<State> {
        let config = parse_config(&resource.id, &resource.attributes)?;
        let mut instance = ResourceInstance::new(config);

        match self.gateway.create(&mut instance).await {
            Ok(()) => Ok(state_of(resource.id, &instance)),
            Err(e) => {
                let err = provider_error(&resource.id, e);
                // The gateway exists even though a later step failed
                Err(match instance.id {
                    Some(identifier) => err.with_identifier(identifier),
                    None => err,
                })
            }
        }
    }

    pub async fn update_resource(
        &self,
        id: ResourceId,
        identifier: String,
        from: State,
        to: Resource,
    ) -> ProviderResult<State> {
        let current = parse_config(&id, &from.attributes)?;
        let desired = parse_config(&id, &to.attributes)?;
        let mut instance = ResourceInstance {
            id: Some(identifier),
            config: current,
        };

        self.gateway
            .update(&mut instance, desired)
            .await
            .map_err(|e| provider_error(&id, e))?;
        Ok(state_of(id, &instance))
    }

    pub async fn delete_resource(
        &self,
        id: ResourceId,
        identifier: String,
        state: State,
    ) -> ProviderResult<()> {
        let config = parse_config(&id, &state.attributes)?;
        let mut instance = ResourceInstance {
            id: Some(identifier),
            config,
        };

        self.gateway
            .delete(&mut instance)
            .await
            .map_err(|e| provider_error(&id, e))
    }
}

fn parse_config(
    id: &ResourceId,
    attributes: &HashMap<String, Value>,
) -> ProviderResult<TransitGatewayConfig> {
    TransitGatewayConfig::from_attributes(attributes).map_err(|e| provider_error(id, e))
}

fn provider_error(id: &ResourceId, err: GatewayError) -> ProviderError {
    ProviderError::new(err.to_string())
        .for_resource(id.clone())
        .with_cause(err)
}

fn state_of(id: ResourceId, instance: &ResourceInstance) -> State {
    match &instance.id {
        Some(identifier) => {
            State::existing(id, instance.config.to_attributes()).with_identifier(identifier)
        }
        None => State::not_found(id),
    }
}
