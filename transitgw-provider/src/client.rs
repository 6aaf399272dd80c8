//! Controller client facade
//!
//! The reconciler talks to the network controller only through
//! [`ControllerClient`]. An HTTP implementation lives outside this crate.

use async_trait::async_trait;
use thiserror::Error;

use crate::wire::{
    EnableTransitHa, GatewayDetail, GatewayRecord, GatewayRef, GatewayTarget,
    LaunchTransitGateway, TagRequest, TagTarget,
};

/// Errors returned by the controller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The requested entity does not exist
    #[error("not found")]
    NotFound,

    #[error("controller rejected the request: {0}")]
    Rejected(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// RPC surface of the network controller
#[async_trait]
pub trait ControllerClient: Send + Sync {
    async fn launch_transit_gateway(&self, request: &LaunchTransitGateway) -> ClientResult<()>;

    async fn enable_transit_ha(&self, request: &EnableTransitHa) -> ClientResult<()>;

    async fn resize_gateway(&self, target: &GatewayTarget, gw_size: &str) -> ClientResult<()>;

    async fn delete_gateway(&self, target: &GatewayTarget) -> ClientResult<()>;

    /// Look up a gateway; `ClientError::NotFound` when it does not exist
    async fn get_gateway(&self, account_name: &str, gw_name: &str) -> ClientResult<GatewayRecord>;

    async fn get_gateway_detail(&self, gateway: &GatewayRecord) -> ClientResult<GatewayDetail>;

    async fn add_tags(&self, request: &TagRequest) -> ClientResult<()>;

    async fn delete_tags(&self, request: &TagRequest) -> ClientResult<()>;

    /// Tags currently attached, as "key:value" entries
    async fn get_tags(&self, target: &TagTarget) -> ClientResult<Vec<String>>;

    async fn attach_hybrid(&self, gateway: &GatewayRef) -> ClientResult<()>;

    async fn detach_hybrid(&self, gateway: &GatewayRef) -> ClientResult<()>;

    async fn enable_connected_transit(&self, gateway: &GatewayRef) -> ClientResult<()>;

    async fn disable_connected_transit(&self, gateway: &GatewayRef) -> ClientResult<()>;

    async fn enable_snat(&self, gateway: &GatewayRef) -> ClientResult<()>;

    async fn disable_snat(&self, gateway: &GatewayRef) -> ClientResult<()>;

    async fn enable_firenet_interfaces(&self, gateway: &GatewayRef) -> ClientResult<()>;

    async fn disable_firenet_interfaces(&self, gateway: &GatewayRef) -> ClientResult<()>;
}
