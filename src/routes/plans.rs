use crate::access::{self, FeatureValue, PlanFeatures, SubscriptionPlan};
use crate::helpers::JsonResponse;
use actix_web::{get, web, Responder, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PlanSummary {
    pub plan: SubscriptionPlan,
    pub rank: u8,
    pub features: &'static PlanFeatures,
}

#[derive(Debug, Serialize)]
pub struct FeatureLookup {
    pub plan: SubscriptionPlan,
    pub feature: String,
    /// `null` when the feature is not in the catalog.
    pub value: Option<FeatureValue>,
    pub granted: bool,
}

impl FeatureLookup {
    pub fn new(plan: SubscriptionPlan, feature: String) -> Self {
        let access = access::check_feature_access(plan, &feature);
        Self {
            plan,
            feature,
            value: access.value(),
            granted: access.is_granted(),
        }
    }
}

#[tracing::instrument(name = "List plan catalog.")]
#[get("")]
pub async fn list_handler() -> Result<impl Responder> {
    let plans = SubscriptionPlan::ALL
        .into_iter()
        .map(|plan| PlanSummary {
            plan,
            rank: plan.rank(),
            features: access::plan_features(plan),
        })
        .collect::<Vec<_>>();

    Ok(JsonResponse::build().set_list(plans).ok("OK"))
}

#[tracing::instrument(name = "Check plan feature.")]
#[get("/{plan}/features/{feature}")]
pub async fn feature_handler(path: web::Path<(String, String)>) -> Result<impl Responder> {
    let (plan, feature) = path.into_inner();
    let plan = plan
        .parse::<SubscriptionPlan>()
        .map_err(|err| JsonResponse::<FeatureLookup>::build().bad_request(err.to_string()))?;

    Ok(JsonResponse::build()
        .set_item(FeatureLookup::new(plan, feature))
        .ok("OK"))
}
