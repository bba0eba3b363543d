use sqlx::PgPool;
use tracing::Instrument;

pub async fn fetch_min_plan(pool: &PgPool, course_id: &str) -> Result<Option<String>, String> {
    let query_span = tracing::info_span!("Fetching course minimum plan", course_id = %course_id);
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT min_plan
        FROM courses c
        WHERE c.id = $1
        "#,
    )
    .bind(course_id)
    .fetch_optional(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute fetch query: {:?}", err);
        "Could not fetch course".to_string()
    })
}
