//! Transit Gateway Core
//!
//! Provider-agnostic building blocks for reconciling declared resources with a
//! remote controller: attribute values, schemas, attribute diffs and the
//! provider surface exposed to an orchestrator.

pub mod differ;
pub mod provider;
pub mod resource;
pub mod schema;
