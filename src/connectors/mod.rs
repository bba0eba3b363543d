//! External service connectors.
//!
//! Routes and middleware depend on the traits defined here, never on the
//! HTTP clients, so tests can swap in the mocks.

pub mod auth_service;
pub mod errors;

pub use auth_service::init as init_auth_service;
pub use auth_service::{AuthServiceClient, AuthServiceConnector, Identity};
pub use errors::ConnectorError;
