use crate::connectors::{AuthServiceConnector, Identity};
use crate::helpers::JsonResponse;
use crate::middleware::authentication::get_header;
use crate::models;
use crate::services::AccessStore;
use actix_web::{dev::ServiceRequest, web, Error, HttpMessage};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Token → identity cache, so the auth service is not hit on every request.
/// Subscriptions are not cached: plan changes apply on the next request.
pub struct OAuthCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CachedIdentity>>,
}

struct CachedIdentity {
    identity: Identity,
    expires_at: Instant,
}

impl OAuthCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, token: &str) -> Option<Identity> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(token) {
                Some(entry) if entry.expires_at > now => return Some(entry.identity.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(token) {
            if entry.expires_at <= now {
                entries.remove(token);
            } else {
                return Some(entry.identity.clone());
            }
        }

        None
    }

    /// Stores `identity` and evicts every entry that has already expired.
    pub async fn insert(&self, token: String, identity: Identity) {
        let now = Instant::now();
        let expires_at = now + self.ttl;
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(token, CachedIdentity { identity, expires_at });
    }
}

fn try_extract_token(authentication: &str) -> Result<String, String> {
    let mut authentication_parts = authentication.splitn(2, ' ');
    match authentication_parts.next() {
        Some("Bearer") => {}
        _ => return Err("Bearer missing scheme".to_string()),
    }

    match authentication_parts.next().map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => {
            tracing::error!("Bearer token is missing");
            Err("Authentication required".to_string())
        }
    }
}

fn app_data<T: ?Sized + 'static>(req: &ServiceRequest) -> Result<web::Data<T>, Error> {
    req.app_data::<web::Data<T>>().cloned().ok_or_else(|| {
        tracing::error!("app data {} is not registered", std::any::type_name::<T>());
        JsonResponse::<()>::build().internal_server_error("Internal error")
    })
}

#[tracing::instrument(name = "Authenticate with bearer token", skip(req))]
pub async fn try_oauth(req: &ServiceRequest) -> Result<(), Error> {
    let unauthorized = |msg: String| JsonResponse::<()>::build().unauthorized(msg);

    let authentication = get_header::<String>(req, "authorization")
        .map_err(unauthorized)?
        .ok_or_else(|| unauthorized("Authentication required".to_string()))?;
    let token = try_extract_token(&authentication).map_err(unauthorized)?;

    let connector = app_data::<Arc<dyn AuthServiceConnector>>(req)?;
    let cache = app_data::<OAuthCache>(req)?;
    let store = app_data::<Arc<dyn AccessStore>>(req)?;

    let identity = match cache.get(&token).await {
        Some(identity) => identity,
        None => {
            let identity = connector.resolve_token(&token).await?;
            cache.insert(token, identity.clone()).await;
            identity
        }
    };

    // The subscription always comes from our own store, never from the caller.
    let subscription = store.subscription_for(&identity.id).await?;
    let user = models::User {
        id: identity.id,
        email: identity.email,
        role: identity.role,
        subscription,
    };
    tracing::debug!(user_id = %user.id, "caller authenticated");

    if req.extensions_mut().insert(Arc::new(user)).is_some() {
        return Err(JsonResponse::<()>::build().internal_server_error("user already logged"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(id: &str) -> Identity {
        Identity {
            id: id.to_string(),
            email: String::new(),
            role: "student".to_string(),
        }
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(try_extract_token("Bearer abc").unwrap(), "abc");
        assert!(try_extract_token("Basic abc").is_err());
        assert!(try_extract_token("Bearer").is_err());
        assert!(try_extract_token("Bearer   ").is_err());
    }

    #[tokio::test]
    async fn cache_returns_fresh_entries() {
        let cache = OAuthCache::new(Duration::from_secs(60));
        cache.insert("t1".to_string(), identity("u-1")).await;
        assert_eq!(cache.get("t1").await, Some(identity("u-1")));
        assert_eq!(cache.get("t2").await, None);
    }

    #[tokio::test]
    async fn cache_drops_expired_entries() {
        let cache = OAuthCache::new(Duration::from_millis(0));
        cache.insert("t1".to_string(), identity("u-1")).await;
        assert_eq!(cache.get("t1").await, None);
        assert!(cache.entries.read().await.is_empty());
    }

    #[tokio::test]
    async fn insert_evicts_expired_tokens() {
        let cache = OAuthCache::new(Duration::from_millis(0));
        for n in 0..1000 {
            cache.insert(format!("t{}", n), identity("u-1")).await;
        }
        assert_eq!(cache.get("other").await, None);
        assert!(cache.entries.read().await.len() <= 1);
    }

    #[tokio::test]
    async fn insert_keeps_live_tokens() {
        let cache = OAuthCache::new(Duration::from_secs(60));
        for n in 0..10 {
            cache.insert(format!("t{}", n), identity("u-1")).await;
        }
        assert_eq!(cache.entries.read().await.len(), 10);
        assert_eq!(cache.get("t0").await, Some(identity("u-1")));
    }
}
