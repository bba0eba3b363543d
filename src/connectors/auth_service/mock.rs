use super::{AuthServiceConnector, Identity};
use crate::connectors::errors::ConnectorError;

/// Treats the token itself as the user id.
pub struct MockAuthServiceConnector;

#[async_trait::async_trait]
impl AuthServiceConnector for MockAuthServiceConnector {
    async fn resolve_token(&self, token: &str) -> Result<Identity, ConnectorError> {
        if token.trim().is_empty() {
            return Err(ConnectorError::Unauthorized("empty token".to_string()));
        }

        Ok(Identity {
            id: token.to_string(),
            email: format!("{}@example.com", token),
            role: "student".to_string(),
        })
    }
}
