//! Per-user sharing policy and the gate that consults it.
//!
//! The policy is owned by the profile record and rewritten as a whole on
//! every update. Updates are partial: only flags present in the request
//! change, everything else keeps its prior value.

use serde::{Deserialize, Serialize};

use super::Category;

/// One sharing flag per category.
///
/// Field names serialize as `shareDemographics`, `shareAffects`, ... so the
/// stored document and the update parameters use the same vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharingPolicy {
    #[serde(default)]
    pub share_demographics: bool,
    #[serde(default)]
    pub share_affects: bool,
    #[serde(default)]
    pub share_behavior: bool,
    #[serde(default)]
    pub share_cognitive_aspects: bool,
    #[serde(default)]
    pub share_interest: bool,
    #[serde(default)]
    pub share_physical_state: bool,
    #[serde(default)]
    pub share_social_relations: bool,
}

impl SharingPolicy {
    /// Policy with every category hidden. New profiles start here.
    pub fn private() -> Self {
        Self::uniform(false)
    }

    /// Policy with every category shared.
    pub fn public() -> Self {
        Self::uniform(true)
    }

    fn uniform(shared: bool) -> Self {
        Self {
            share_demographics: shared,
            share_affects: shared,
            share_behavior: shared,
            share_cognitive_aspects: shared,
            share_interest: shared,
            share_physical_state: shared,
            share_social_relations: shared,
        }
    }

    /// Returns the flag for a category.
    pub fn is_shared(&self, category: Category) -> bool {
        match category {
            Category::Demographics => self.share_demographics,
            Category::Affects => self.share_affects,
            Category::Behavior => self.share_behavior,
            Category::CognitiveAspects => self.share_cognitive_aspects,
            Category::Interest => self.share_interest,
            Category::PhysicalState => self.share_physical_state,
            Category::SocialRelations => self.share_social_relations,
        }
    }

    /// Builder: set a single flag.
    pub fn with(mut self, category: Category, shared: bool) -> Self {
        *self.flag_mut(category) = shared;
        self
    }

    fn flag_mut(&mut self, category: Category) -> &mut bool {
        match category {
            Category::Demographics => &mut self.share_demographics,
            Category::Affects => &mut self.share_affects,
            Category::Behavior => &mut self.share_behavior,
            Category::CognitiveAspects => &mut self.share_cognitive_aspects,
            Category::Interest => &mut self.share_interest,
            Category::PhysicalState => &mut self.share_physical_state,
            Category::SocialRelations => &mut self.share_social_relations,
        }
    }

    /// Applies a partial update, returning the resulting policy.
    pub fn apply(mut self, update: &PolicyUpdate) -> Self {
        for category in Category::ALL {
            if let Some(shared) = update.flag(category) {
                *self.flag_mut(category) = shared;
            }
        }
        self
    }
}

impl Default for SharingPolicy {
    fn default() -> Self {
        Self::private()
    }
}

/// Outcome of consulting the policy for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied,
}

/// The policy gate: pure, no I/O.
pub fn resolve(category: Category, policy: &SharingPolicy) -> Access {
    if policy.is_shared(category) {
        Access::Allowed
    } else {
        Access::Denied
    }
}

/// Requested flag changes; `None` leaves the stored flag untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyUpdate {
    pub share_demographics: Option<bool>,
    pub share_affects: Option<bool>,
    pub share_behavior: Option<bool>,
    pub share_cognitive_aspects: Option<bool>,
    pub share_interest: Option<bool>,
    pub share_physical_state: Option<bool>,
    pub share_social_relations: Option<bool>,
}

impl PolicyUpdate {
    /// Builder: request a flag change.
    pub fn set(mut self, category: Category, shared: bool) -> Self {
        let slot = match category {
            Category::Demographics => &mut self.share_demographics,
            Category::Affects => &mut self.share_affects,
            Category::Behavior => &mut self.share_behavior,
            Category::CognitiveAspects => &mut self.share_cognitive_aspects,
            Category::Interest => &mut self.share_interest,
            Category::PhysicalState => &mut self.share_physical_state,
            Category::SocialRelations => &mut self.share_social_relations,
        };
        *slot = Some(shared);
        self
    }

    /// Requested value for a category, if any.
    pub fn flag(&self, category: Category) -> Option<bool> {
        match category {
            Category::Demographics => self.share_demographics,
            Category::Affects => self.share_affects,
            Category::Behavior => self.share_behavior,
            Category::CognitiveAspects => self.share_cognitive_aspects,
            Category::Interest => self.share_interest,
            Category::PhysicalState => self.share_physical_state,
            Category::SocialRelations => self.share_social_relations,
        }
    }

    /// Returns true if the update changes nothing.
    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.flag(*c).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn gate_follows_flag() {
        let policy = SharingPolicy::public().with(Category::Behavior, false);
        assert_eq!(resolve(Category::Behavior, &policy), Access::Denied);
        assert_eq!(resolve(Category::Interest, &policy), Access::Allowed);
    }

    #[test]
    fn new_policies_are_private() {
        let policy = SharingPolicy::default();
        for category in Category::ALL {
            assert_eq!(resolve(category, &policy), Access::Denied);
        }
    }

    #[test]
    fn partial_update_only_touches_present_flags() {
        let policy = SharingPolicy::public()
            .with(Category::Demographics, false)
            .with(Category::Affects, false);

        let updated = policy.apply(&PolicyUpdate::default().set(Category::Affects, true));

        assert!(!updated.share_demographics);
        assert!(updated.share_affects);
        assert!(updated.share_interest);
    }

    #[test]
    fn serializes_with_share_prefixed_keys() {
        let json = serde_json::to_value(SharingPolicy::public()).unwrap();
        assert_eq!(json["shareCognitiveAspects"], true);
        assert_eq!(json["sharePhysicalState"], true);
        assert_eq!(json["shareSocialRelations"], true);
    }

    #[test]
    fn update_deserializes_missing_and_null_as_unchanged() {
        let update: PolicyUpdate =
            serde_json::from_str(r#"{"shareAffects": true, "shareBehavior": null}"#).unwrap();
        assert_eq!(update.flag(Category::Affects), Some(true));
        assert_eq!(update.flag(Category::Behavior), None);
        assert_eq!(update.flag(Category::Interest), None);
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(PolicyUpdate::default().is_empty());
        assert!(!PolicyUpdate::default().set(Category::Interest, false).is_empty());
    }

    fn arb_policy() -> impl Strategy<Value = SharingPolicy> {
        proptest::collection::vec(any::<bool>(), 7).prop_map(|flags| {
            Category::ALL
                .iter()
                .zip(flags)
                .fold(SharingPolicy::private(), |p, (c, f)| p.with(*c, f))
        })
    }

    fn arb_update() -> impl Strategy<Value = PolicyUpdate> {
        proptest::collection::vec(proptest::option::of(any::<bool>()), 7).prop_map(|flags| {
            Category::ALL
                .iter()
                .zip(flags)
                .fold(PolicyUpdate::default(), |u, (c, f)| match f {
                    Some(v) => u.set(*c, v),
                    None => u,
                })
        })
    }

    proptest! {
        #[test]
        fn update_is_partial_and_idempotent(policy in arb_policy(), update in arb_update()) {
            let once = policy.apply(&update);
            for category in Category::ALL {
                let expected = update.flag(category).unwrap_or(policy.is_shared(category));
                prop_assert_eq!(once.is_shared(category), expected);
            }
            prop_assert_eq!(once.apply(&update), once);
        }
    }
}
