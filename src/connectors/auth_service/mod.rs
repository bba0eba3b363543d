mod client;
pub mod mock;

pub use client::AuthServiceClient;

use crate::configuration::AuthServiceSettings;
use crate::connectors::errors::ConnectorError;
use actix_web::web;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Who a bearer token belongs to. Plans are never taken from here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "student".to_string()
}

#[async_trait::async_trait]
pub trait AuthServiceConnector: Send + Sync {
    /// Resolve a bearer token to the identity it was issued for.
    async fn resolve_token(&self, token: &str) -> Result<Identity, ConnectorError>;
}

/// Build the connector configured in `settings.auth`, wrapped for injection.
pub fn init(settings: &AuthServiceSettings) -> web::Data<Arc<dyn AuthServiceConnector>> {
    let connector: Arc<dyn AuthServiceConnector> = if settings.enabled {
        tracing::info!("Initializing auth service connector: {}", settings.url);
        Arc::new(AuthServiceClient::new(settings))
    } else {
        tracing::warn!("Auth service connector disabled - tokens are treated as user ids");
        Arc::new(mock::MockAuthServiceConnector)
    };

    web::Data::new(connector)
}
