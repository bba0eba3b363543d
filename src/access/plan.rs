use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subscription tier. Variants are declared in rank order, so the derived
/// `Ord` agrees with [`SubscriptionPlan::rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    Free,
    Basic,
    Pro,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown subscription plan '{0}'")]
pub struct PlanParseError(pub String);

impl SubscriptionPlan {
    pub const ALL: [SubscriptionPlan; 3] = [Self::Free, Self::Basic, Self::Pro];

    /// Numeric rank used for "at least" comparisons. Higher rank = more access.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Free => 0,
            Self::Basic => 1,
            Self::Pro => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Basic => "basic",
            Self::Pro => "pro",
        }
    }

    /// True when a holder of `self` satisfies a `required` minimum plan.
    pub fn satisfies(&self, required: SubscriptionPlan) -> bool {
        self.rank() >= required.rank()
    }
}

impl fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionPlan {
    type Err = PlanParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "basic" => Ok(Self::Basic),
            "pro" => Ok(Self::Pro),
            other => Err(PlanParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_follow_hierarchy() {
        assert_eq!(SubscriptionPlan::Free.rank(), 0);
        assert_eq!(SubscriptionPlan::Basic.rank(), 1);
        assert_eq!(SubscriptionPlan::Pro.rank(), 2);
        assert!(SubscriptionPlan::Free < SubscriptionPlan::Basic);
        assert!(SubscriptionPlan::Basic < SubscriptionPlan::Pro);
    }

    #[test]
    fn equal_plan_satisfies_requirement() {
        for plan in SubscriptionPlan::ALL {
            assert!(plan.satisfies(plan));
        }
        assert!(!SubscriptionPlan::Basic.satisfies(SubscriptionPlan::Pro));
        assert!(SubscriptionPlan::Pro.satisfies(SubscriptionPlan::Free));
    }

    #[test]
    fn parses_lowercase_identifiers_only() {
        assert_eq!("basic".parse::<SubscriptionPlan>(), Ok(SubscriptionPlan::Basic));
        assert_eq!(
            "Pro".parse::<SubscriptionPlan>(),
            Err(PlanParseError("Pro".to_string()))
        );
        assert!("enterprise".parse::<SubscriptionPlan>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&SubscriptionPlan::Pro).unwrap();
        assert_eq!(json, "\"pro\"");
        let plan: SubscriptionPlan = serde_json::from_str("\"free\"").unwrap();
        assert_eq!(plan, SubscriptionPlan::Free);
    }
}
