use super::{AuthServiceConnector, Identity};
use crate::configuration::AuthServiceSettings;
use crate::connectors::errors::ConnectorError;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use tracing::Instrument;

/// HTTP client for the platform auth service (`GET <url>` with the caller's token).
pub struct AuthServiceClient {
    pub(crate) url: String,
    pub(crate) http_client: reqwest::Client,
}

#[derive(Deserialize)]
struct IdentityForm {
    user: Identity,
}

impl AuthServiceClient {
    pub fn new(settings: &AuthServiceSettings) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()
            .unwrap_or_else(|err| {
                tracing::error!("Failed to configure HTTP client, using defaults: {:?}", err);
                reqwest::Client::new()
            });

        Self {
            url: settings.url.clone(),
            http_client,
        }
    }
}

#[async_trait::async_trait]
impl AuthServiceConnector for AuthServiceClient {
    async fn resolve_token(&self, token: &str) -> Result<Identity, ConnectorError> {
        let span = tracing::info_span!("auth_service_resolve_token", url = %self.url);

        let resp = self
            .http_client
            .get(&self.url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .send()
            .instrument(span.clone())
            .await
            .map_err(|err| {
                tracing::error!(parent: &span, "auth service request failed: {:?}", err);
                ConnectorError::from(err)
            })?;

        match resp.status().as_u16() {
            200 => {
                let text = resp.text().await.map_err(ConnectorError::from)?;
                serde_json::from_str::<IdentityForm>(&text)
                    .map(|form| form.user)
                    .map_err(|err| {
                        tracing::error!(parent: &span, "can't parse identity: {}", err);
                        ConnectorError::InvalidResponse(text)
                    })
            }
            401 | 403 => {
                tracing::debug!(parent: &span, "token rejected by auth service");
                Err(ConnectorError::Unauthorized("invalid token".to_string()))
            }
            status => Err(ConnectorError::InvalidResponse(format!(
                "auth service returned {}",
                status
            ))),
        }
    }
}
