//! Read access to the records access control depends on.

use crate::access::SubscriptionPlan;
use crate::db;
use crate::models::{Course, Subscription, SubscriptionStatus};
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store backend failure: {0}")]
    Backend(String),
    #[error("corrupt record: {0}")]
    CorruptRecord(String),
}

impl ResponseError for StoreError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        tracing::error!("{}", self);
        HttpResponse::build(self.status_code()).json(json!({
            "message": "Internal error",
        }))
    }
}

#[async_trait::async_trait]
pub trait AccessStore: Send + Sync {
    async fn subscription_for(&self, user_id: &str) -> Result<Option<Subscription>, StoreError>;

    /// `None` when the course does not exist.
    async fn course_min_plan(&self, course_id: &str) -> Result<Option<SubscriptionPlan>, StoreError>;
}

pub struct PgAccessStore {
    pool: PgPool,
}

impl PgAccessStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl TryFrom<db::subscription::SubscriptionRow> for Subscription {
    type Error = StoreError;

    fn try_from(row: db::subscription::SubscriptionRow) -> Result<Self, Self::Error> {
        let plan = row
            .plan
            .parse::<SubscriptionPlan>()
            .map_err(|err| StoreError::CorruptRecord(err.to_string()))?;
        let status = row
            .status
            .parse::<SubscriptionStatus>()
            .map_err(StoreError::CorruptRecord)?;

        Ok(Subscription {
            plan,
            start_date: row.start_date,
            end_date: row.end_date,
            status,
        })
    }
}

#[async_trait::async_trait]
impl AccessStore for PgAccessStore {
    async fn subscription_for(&self, user_id: &str) -> Result<Option<Subscription>, StoreError> {
        db::subscription::fetch_by_user(&self.pool, user_id)
            .await
            .map_err(StoreError::Backend)?
            .map(Subscription::try_from)
            .transpose()
    }

    async fn course_min_plan(&self, course_id: &str) -> Result<Option<SubscriptionPlan>, StoreError> {
        db::course::fetch_min_plan(&self.pool, course_id)
            .await
            .map_err(StoreError::Backend)?
            .map(|plan| {
                plan.parse::<SubscriptionPlan>()
                    .map_err(|err| StoreError::CorruptRecord(err.to_string()))
            })
            .transpose()
    }
}

#[derive(Debug, Deserialize)]
pub struct SeedSubscription {
    pub user_id: String,
    pub subscription: Subscription,
}

/// Fixture file contents for the in-memory backend.
#[derive(Debug, Default, Deserialize)]
pub struct StoreSeed {
    #[serde(default)]
    pub subscriptions: Vec<SeedSubscription>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

/// Process-local store for local runs and tests.
#[derive(Default)]
pub struct InMemoryAccessStore {
    subscriptions: RwLock<HashMap<String, Subscription>>,
    courses: RwLock<HashMap<String, SubscriptionPlan>>,
}

impl InMemoryAccessStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put_subscription(&self, user_id: impl Into<String>, subscription: Subscription) {
        self.subscriptions
            .write()
            .await
            .insert(user_id.into(), subscription);
    }

    pub async fn put_course(&self, course: Course) {
        self.courses.write().await.insert(course.id, course.min_plan);
    }

    pub async fn seed(&self, seed: StoreSeed) {
        tracing::info!(
            subscriptions = seed.subscriptions.len(),
            courses = seed.courses.len(),
            "Seeding in-memory store"
        );
        for record in seed.subscriptions {
            self.put_subscription(record.user_id, record.subscription).await;
        }
        for course in seed.courses {
            self.put_course(course).await;
        }
    }
}

#[async_trait::async_trait]
impl AccessStore for InMemoryAccessStore {
    async fn subscription_for(&self, user_id: &str) -> Result<Option<Subscription>, StoreError> {
        Ok(self.subscriptions.read().await.get(user_id).cloned())
    }

    async fn course_min_plan(&self, course_id: &str) -> Result<Option<SubscriptionPlan>, StoreError> {
        Ok(self.courses.read().await.get(course_id).copied())
    }
}
