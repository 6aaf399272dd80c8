//! Error types for transit gateway reconciliation

use thiserror::Error;
use transitgw_core::schema::TypeError;

use crate::client::ClientError;

/// Errors raised while reconciling a transit gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A local precondition does not hold; raised before any remote call
    #[error("{0}")]
    Validation(String),

    /// Declared attributes do not match the resource schema
    #[error(
        "invalid attributes: {}",
        .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
    )]
    InvalidAttributes(Vec<TypeError>),

    /// The controller answered with something the provider cannot map
    #[error("unexpected controller response: {0}")]
    UnexpectedResponse(String),

    /// A remote call failed
    #[error("failed to {action} '{gateway}': {source}")]
    Remote {
        action: String,
        gateway: String,
        source: ClientError,
    },
}

impl GatewayError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn remote(
        action: impl Into<String>,
        gateway: impl Into<String>,
        source: ClientError,
    ) -> Self {
        Self::Remote {
            action: action.into(),
            gateway: gateway.into(),
            source,
        }
    }

    /// Returns true for errors raised before any remote call was made
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidAttributes(_))
    }
}

pub type Result<T, E = GatewayError> = std::result::Result<T, E>;
