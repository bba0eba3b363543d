use crate::access::{self, SubscriptionPlan};
use crate::helpers::JsonResponse;
use crate::models;
use crate::routes::plans::FeatureLookup;
use actix_web::{get, web, Responder, Result};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct SubscriptionOverview {
    pub active: bool,
    pub effective_plan: SubscriptionPlan,
    /// Stored subscription as access control sees it (lapsed ones read as free/expired).
    pub subscription: Option<models::Subscription>,
}

#[derive(Debug, Serialize)]
pub struct PlanAccess {
    pub required_plan: SubscriptionPlan,
    pub effective_plan: SubscriptionPlan,
    pub access: bool,
}

#[tracing::instrument(name = "Get own subscription.", skip(user), fields(user_id = %user.id))]
#[get("/subscription")]
pub async fn subscription_handler(
    user: web::ReqData<Arc<models::User>>,
) -> Result<impl Responder> {
    let today = access::today();
    let view = access::auto_downgrade_expired_subscription_on(&user, today);
    let overview = SubscriptionOverview {
        active: access::is_subscription_active_on(&user, today),
        effective_plan: access::effective_plan_on(&user, today),
        subscription: view.subscription,
    };

    Ok(JsonResponse::build()
        .set_id(user.id.clone())
        .set_item(overview)
        .ok("OK"))
}

#[tracing::instrument(name = "Check own plan access.", skip(user), fields(user_id = %user.id))]
#[get("/access/{plan}")]
pub async fn access_handler(
    user: web::ReqData<Arc<models::User>>,
    path: web::Path<(String,)>,
) -> Result<impl Responder> {
    let required_plan = path
        .into_inner()
        .0
        .parse::<SubscriptionPlan>()
        .map_err(|err| JsonResponse::<PlanAccess>::build().bad_request(err.to_string()))?;

    let today = access::today();
    let item = PlanAccess {
        required_plan,
        effective_plan: access::effective_plan_on(&user, today),
        access: access::can_access_resource_on(&user, required_plan, today),
    };

    Ok(JsonResponse::build().set_item(item).ok("OK"))
}

#[tracing::instrument(name = "Check own feature.", skip(user), fields(user_id = %user.id))]
#[get("/features/{feature}")]
pub async fn feature_handler(
    user: web::ReqData<Arc<models::User>>,
    path: web::Path<(String,)>,
) -> Result<impl Responder> {
    let plan = access::effective_plan(&user);
    Ok(JsonResponse::build()
        .set_item(FeatureLookup::new(plan, path.into_inner().0))
        .ok("OK"))
}
