use super::plan::SubscriptionPlan;
use crate::models::{SubscriptionStatus, User};
use chrono::{NaiveDate, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

/// Quiz attempts granted to `basic` subscribers. Not backed by any record of
/// attempts actually taken.
pub const BASIC_QUIZ_ATTEMPTS: u32 = 3;

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Active means `status == active` and `today <= end_date`; a subscription
/// ending today is still active.
pub fn is_subscription_active_on(user: &User, today: NaiveDate) -> bool {
    match &user.subscription {
        None => false,
        Some(subscription) if subscription.status != SubscriptionStatus::Active => false,
        Some(subscription) if today > subscription.end_date => false,
        Some(_) => true,
    }
}

pub fn is_subscription_active(user: &User) -> bool {
    is_subscription_active_on(user, today())
}

/// The plan used for every access decision. The stored plan only counts while
/// the subscription is active.
pub fn effective_plan_on(user: &User, today: NaiveDate) -> SubscriptionPlan {
    match &user.subscription {
        Some(subscription) if is_subscription_active_on(user, today) => subscription.plan,
        _ => SubscriptionPlan::Free,
    }
}

pub fn effective_plan(user: &User) -> SubscriptionPlan {
    effective_plan_on(user, today())
}

pub fn can_access_resource_on(user: &User, min_plan: SubscriptionPlan, today: NaiveDate) -> bool {
    effective_plan_on(user, today).satisfies(min_plan)
}

pub fn can_access_resource(user: &User, min_plan: SubscriptionPlan) -> bool {
    can_access_resource_on(user, min_plan, today())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    SubscriptionExpired { required: SubscriptionPlan },
    InsufficientPlan {
        required: SubscriptionPlan,
        effective: SubscriptionPlan,
    },
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubscriptionExpired { required } => write!(
                f,
                "Your subscription has expired. Renew to a '{}' plan or higher to access this course.",
                required
            ),
            Self::InsufficientPlan {
                required,
                effective,
            } => write!(
                f,
                "This course requires a '{}' plan (you have '{}').",
                required, effective
            ),
        }
    }
}

impl Serialize for DenialReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of a course access check. `reason` is for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    pub access: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<DenialReason>,
}

impl AccessDecision {
    fn granted() -> Self {
        Self {
            access: true,
            reason: None,
        }
    }

    fn denied(reason: DenialReason) -> Self {
        Self {
            access: false,
            reason: Some(reason),
        }
    }
}

pub fn validate_course_access_on(
    user: &User,
    min_plan: SubscriptionPlan,
    today: NaiveDate,
) -> AccessDecision {
    let effective = effective_plan_on(user, today);
    if effective.satisfies(min_plan) {
        return AccessDecision::granted();
    }

    // A free-tier resource is always granted above, so min_plan is paid here.
    if !is_subscription_active_on(user, today) {
        return AccessDecision::denied(DenialReason::SubscriptionExpired { required: min_plan });
    }

    AccessDecision::denied(DenialReason::InsufficientPlan {
        required: min_plan,
        effective,
    })
}

pub fn validate_course_access(user: &User, min_plan: SubscriptionPlan) -> AccessDecision {
    validate_course_access_on(user, min_plan, today())
}

/// Remaining attempts on a quiz: a count, or `"unlimited"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizAttempts {
    Limited(u32),
    Unlimited,
}

impl Serialize for QuizAttempts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Limited(count) => serializer.serialize_u32(*count),
            Self::Unlimited => serializer.serialize_str("unlimited"),
        }
    }
}

pub fn remaining_quiz_attempts_on(user: &User, _quiz_id: &str, today: NaiveDate) -> QuizAttempts {
    match effective_plan_on(user, today) {
        SubscriptionPlan::Free => QuizAttempts::Limited(0),
        SubscriptionPlan::Basic => QuizAttempts::Limited(BASIC_QUIZ_ATTEMPTS),
        SubscriptionPlan::Pro => QuizAttempts::Unlimited,
    }
}

pub fn remaining_quiz_attempts(user: &User, quiz_id: &str) -> QuizAttempts {
    remaining_quiz_attempts_on(user, quiz_id, today())
}

/// Returns the user as access control sees them: an inactive subscription is
/// rewritten to `free`/`expired`. Nothing is written back to storage.
pub fn auto_downgrade_expired_subscription_on(user: &User, today: NaiveDate) -> User {
    let mut view = user.clone();
    if is_subscription_active_on(user, today) {
        return view;
    }
    if let Some(subscription) = view.subscription.as_mut() {
        subscription.plan = SubscriptionPlan::Free;
        subscription.status = SubscriptionStatus::Expired;
    }
    view
}

pub fn auto_downgrade_expired_subscription(user: &User) -> User {
    auto_downgrade_expired_subscription_on(user, today())
}
