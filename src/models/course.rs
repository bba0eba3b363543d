use crate::access::SubscriptionPlan;
use serde::{Deserialize, Serialize};

/// The slice of a course record that access control needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub min_plan: SubscriptionPlan,
}
