use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::Instrument;

/// Raw `subscriptions` row; plan and status are validated by the caller.
#[derive(Debug, sqlx::FromRow)]
pub struct SubscriptionRow {
    pub plan: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
}

/// The user's most recent subscription, if they ever had one.
pub async fn fetch_by_user(pool: &PgPool, user_id: &str) -> Result<Option<SubscriptionRow>, String> {
    let query_span = tracing::info_span!("Fetching subscription by user id", user_id = %user_id);
    sqlx::query_as::<_, SubscriptionRow>(
        r#"
        SELECT
            plan,
            start_date,
            end_date,
            status
        FROM subscriptions s
        WHERE s.user_id = $1
        ORDER BY s.end_date DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute fetch query: {:?}", err);
        "Could not fetch subscription".to_string()
    })
}
