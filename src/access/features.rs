//! Plan catalog: the fixed table of what every plan unlocks.
//!
//! The table is a `static` of typed rows, one per plan, so every plan/feature
//! pair exists by construction and nothing can mutate it at runtime. Lookups
//! by name go through [`check_feature_access`], which reports names outside
//! the catalog as [`FeatureAccess::UnknownFeature`].

use super::plan::SubscriptionPlan;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Qualitative access level for features that are not simply on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Limited,
    Full,
}

/// A configured catalog value: `true`/`false` or a level string on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Flag(bool),
    Level(AccessLevel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    BasicCourses,
    PremiumCourses,
    Quizzes,
    ForumAccess,
    Notes,
    Certificates,
    OfflineDownloads,
    PrioritySupport,
}

impl Feature {
    pub const ALL: [Feature; 8] = [
        Self::BasicCourses,
        Self::PremiumCourses,
        Self::Quizzes,
        Self::ForumAccess,
        Self::Notes,
        Self::Certificates,
        Self::OfflineDownloads,
        Self::PrioritySupport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BasicCourses => "basic_courses",
            Self::PremiumCourses => "premium_courses",
            Self::Quizzes => "quizzes",
            Self::ForumAccess => "forum_access",
            Self::Notes => "notes",
            Self::Certificates => "certificates",
            Self::OfflineDownloads => "offline_downloads",
            Self::PrioritySupport => "priority_support",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|feature| feature.as_str() == s)
            .ok_or(())
    }
}

/// One row of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanFeatures {
    pub basic_courses: bool,
    pub premium_courses: bool,
    pub quizzes: bool,
    pub forum_access: bool,
    pub notes: AccessLevel,
    pub certificates: bool,
    pub offline_downloads: bool,
    pub priority_support: bool,
}

impl PlanFeatures {
    pub fn value(&self, feature: Feature) -> FeatureValue {
        match feature {
            Feature::BasicCourses => FeatureValue::Flag(self.basic_courses),
            Feature::PremiumCourses => FeatureValue::Flag(self.premium_courses),
            Feature::Quizzes => FeatureValue::Flag(self.quizzes),
            Feature::ForumAccess => FeatureValue::Flag(self.forum_access),
            Feature::Notes => FeatureValue::Level(self.notes),
            Feature::Certificates => FeatureValue::Flag(self.certificates),
            Feature::OfflineDownloads => FeatureValue::Flag(self.offline_downloads),
            Feature::PrioritySupport => FeatureValue::Flag(self.priority_support),
        }
    }
}

// Indexed by `SubscriptionPlan::rank`.
static PLAN_FEATURES: [PlanFeatures; 3] = [
    PlanFeatures {
        basic_courses: true,
        premium_courses: false,
        quizzes: false,
        forum_access: true,
        notes: AccessLevel::Limited,
        certificates: false,
        offline_downloads: false,
        priority_support: false,
    },
    PlanFeatures {
        basic_courses: true,
        premium_courses: false,
        quizzes: true,
        forum_access: true,
        notes: AccessLevel::Full,
        certificates: true,
        offline_downloads: false,
        priority_support: false,
    },
    PlanFeatures {
        basic_courses: true,
        premium_courses: true,
        quizzes: true,
        forum_access: true,
        notes: AccessLevel::Full,
        certificates: true,
        offline_downloads: true,
        priority_support: true,
    },
];

pub fn plan_features(plan: SubscriptionPlan) -> &'static PlanFeatures {
    &PLAN_FEATURES[plan.rank() as usize]
}

/// Result of looking a feature up by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureAccess {
    Configured(FeatureValue),
    UnknownFeature,
}

impl FeatureAccess {
    /// Any level counts as access; a disabled flag or an unknown name does not.
    pub fn is_granted(&self) -> bool {
        match self {
            Self::Configured(FeatureValue::Flag(enabled)) => *enabled,
            Self::Configured(FeatureValue::Level(_)) => true,
            Self::UnknownFeature => false,
        }
    }

    pub fn value(&self) -> Option<FeatureValue> {
        match self {
            Self::Configured(value) => Some(*value),
            Self::UnknownFeature => None,
        }
    }
}

pub fn check_feature_access(plan: SubscriptionPlan, feature_name: &str) -> FeatureAccess {
    match feature_name.parse::<Feature>() {
        Ok(feature) => FeatureAccess::Configured(plan_features(plan).value(feature)),
        Err(()) => FeatureAccess::UnknownFeature,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_pair_matches_the_table() {
        let expected: [(Feature, [FeatureValue; 3]); 8] = [
            (Feature::BasicCourses, [FeatureValue::Flag(true); 3]),
            (
                Feature::PremiumCourses,
                [FeatureValue::Flag(false), FeatureValue::Flag(false), FeatureValue::Flag(true)],
            ),
            (
                Feature::Quizzes,
                [FeatureValue::Flag(false), FeatureValue::Flag(true), FeatureValue::Flag(true)],
            ),
            (Feature::ForumAccess, [FeatureValue::Flag(true); 3]),
            (
                Feature::Notes,
                [
                    FeatureValue::Level(AccessLevel::Limited),
                    FeatureValue::Level(AccessLevel::Full),
                    FeatureValue::Level(AccessLevel::Full),
                ],
            ),
            (
                Feature::Certificates,
                [FeatureValue::Flag(false), FeatureValue::Flag(true), FeatureValue::Flag(true)],
            ),
            (
                Feature::OfflineDownloads,
                [FeatureValue::Flag(false), FeatureValue::Flag(false), FeatureValue::Flag(true)],
            ),
            (
                Feature::PrioritySupport,
                [FeatureValue::Flag(false), FeatureValue::Flag(false), FeatureValue::Flag(true)],
            ),
        ];

        for (feature, values) in expected {
            for plan in SubscriptionPlan::ALL {
                assert_eq!(
                    check_feature_access(plan, feature.as_str()),
                    FeatureAccess::Configured(values[plan.rank() as usize]),
                    "{plan}/{feature}"
                );
            }
        }
    }

    #[test]
    fn unknown_feature_is_denied() {
        for plan in SubscriptionPlan::ALL {
            let access = check_feature_access(plan, "live_tutoring");
            assert_eq!(access, FeatureAccess::UnknownFeature);
            assert!(!access.is_granted());
            assert_eq!(access.value(), None);
        }
    }

    #[test]
    fn limited_level_still_grants() {
        let access = check_feature_access(SubscriptionPlan::Free, "notes");
        assert!(access.is_granted());
        assert_eq!(
            access.value(),
            Some(FeatureValue::Level(AccessLevel::Limited))
        );
    }

    #[test]
    fn higher_plans_never_lose_features() {
        for feature in Feature::ALL {
            let granted: Vec<bool> = SubscriptionPlan::ALL
                .into_iter()
                .map(|plan| check_feature_access(plan, feature.as_str()).is_granted())
                .collect();
            assert!(granted.windows(2).all(|w| !w[0] || w[1]), "{feature}");
        }
    }

    #[test]
    fn values_serialize_as_bool_or_level() {
        assert_eq!(serde_json::to_string(&FeatureValue::Flag(true)).unwrap(), "true");
        assert_eq!(
            serde_json::to_string(&FeatureValue::Level(AccessLevel::Limited)).unwrap(),
            "\"limited\""
        );
    }
}
