use crate::access::{self, QuizAttempts};
use crate::helpers::JsonResponse;
use crate::models;
use actix_web::{get, web, Responder, Result};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct RemainingAttempts {
    pub quiz_id: String,
    pub remaining: QuizAttempts,
}

#[tracing::instrument(name = "Get remaining quiz attempts.", skip(user), fields(user_id = %user.id))]
#[get("/{quiz_id}/attempts")]
pub async fn attempts_handler(
    user: web::ReqData<Arc<models::User>>,
    path: web::Path<(String,)>,
) -> Result<impl Responder> {
    let quiz_id = path.into_inner().0;
    let remaining = access::remaining_quiz_attempts(&user, &quiz_id);

    Ok(JsonResponse::build()
        .set_item(RemainingAttempts { quiz_id, remaining })
        .ok("OK"))
}
