use crate::access::{self, AccessDecision, SubscriptionPlan};
use crate::helpers::JsonResponse;
use crate::models;
use crate::services::AccessStore;
use actix_web::{get, web, Responder, Result};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct CourseAccess {
    pub course_id: String,
    pub min_plan: SubscriptionPlan,
    #[serde(flatten)]
    pub decision: AccessDecision,
}

/// A denied decision is still a 200: the decision is the payload.
#[tracing::instrument(name = "Validate course access.", skip(user, store), fields(user_id = %user.id))]
#[get("/{course_id}/access")]
pub async fn access_handler(
    user: web::ReqData<Arc<models::User>>,
    path: web::Path<(String,)>,
    store: web::Data<Arc<dyn AccessStore>>,
) -> Result<impl Responder> {
    let course_id = path.into_inner().0;
    let min_plan = store
        .course_min_plan(&course_id)
        .await?
        .ok_or_else(|| JsonResponse::<CourseAccess>::build().not_found("Course not found"))?;

    let decision = access::validate_course_access(&user, min_plan);
    if !decision.access {
        tracing::info!(%course_id, %min_plan, "course access denied");
    }

    Ok(JsonResponse::build()
        .set_id(course_id.clone())
        .set_item(CourseAccess {
            course_id,
            min_plan,
            decision,
        })
        .ok("OK"))
}
