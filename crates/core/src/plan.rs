// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::reconcile::VisibilityTransition;
use snowflow_domain::{
    AirConditionsPatch, FieldGroup, NaturalKey, ProductPatch, RankingPatch, SnowConditionsPatch,
    TestFieldsPatch, TestPatch, TrackConditionsPatch, Version,
};

/// The ranking row a test patch writes to, with the version read at planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingTarget {
    pub product_id: i64,
    pub expected_version: Version,
}

/// A validated, version-checked test patch ready to be written.
///
/// The plan is pure data. Executing it is the store's job, inside a single
/// transaction, one statement per entry of [`TestPatchPlan::sub_updates`].
#[derive(Debug, Clone, PartialEq)]
pub struct TestPatchPlan {
    pub test_id: i64,
    /// The stored test version at planning time.
    pub expected_version: Version,
    /// Present iff the ranking group is non-empty.
    pub ranking: Option<RankingTarget>,
    /// The single version stamped on every versioned row this patch writes.
    pub new_version: Version,
    pub patch: TestPatch,
}

/// One statement of a test patch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubUpdate<'a> {
    AirConditions(&'a AirConditionsPatch),
    SnowConditions(&'a SnowConditionsPatch),
    TrackConditions(&'a TrackConditionsPatch),
    Ranking {
        target: RankingTarget,
        patch: &'a RankingPatch,
    },
    Test(&'a TestFieldsPatch),
}

impl SubUpdate<'_> {
    #[must_use]
    pub const fn group(&self) -> FieldGroup {
        match self {
            Self::AirConditions(_) => FieldGroup::AirConditions,
            Self::SnowConditions(_) => FieldGroup::SnowConditions,
            Self::TrackConditions(_) => FieldGroup::TrackConditions,
            Self::Ranking { .. } => FieldGroup::Ranking,
            Self::Test(_) => FieldGroup::Test,
        }
    }
}

impl TestPatchPlan {
    /// Returns the statements to issue, in application order.
    ///
    /// There is exactly one entry per non-empty field group.
    #[must_use]
    pub fn sub_updates(&self) -> Vec<SubUpdate<'_>> {
        self.patch
            .groups()
            .into_iter()
            .filter_map(|group| match group {
                FieldGroup::AirConditions => Some(SubUpdate::AirConditions(&self.patch.air)),
                FieldGroup::SnowConditions => Some(SubUpdate::SnowConditions(&self.patch.snow)),
                FieldGroup::TrackConditions => {
                    Some(SubUpdate::TrackConditions(&self.patch.track))
                }
                FieldGroup::Ranking => self.ranking.map(|target| SubUpdate::Ranking {
                    target,
                    patch: &self.patch.ranking,
                }),
                FieldGroup::Test => Some(SubUpdate::Test(&self.patch.test)),
            })
            .collect()
    }

    /// Returns true if the patch writes a row that carries a version.
    ///
    /// When false, the only writes are to conditions rows and the caller is
    /// handed the commit instant instead of a stored version.
    #[must_use]
    pub fn stamps_version(&self) -> bool {
        self.patch
            .groups()
            .into_iter()
            .any(FieldGroup::is_versioned)
    }
}

/// Natural-key collision check requested by a product patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationRequest {
    /// The key the product will have after the update.
    pub key: NaturalKey,
    /// The owning team, scope of the private uniqueness rule.
    pub team: i64,
    pub transition: VisibilityTransition,
}

/// A validated, version-checked product patch ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPatchPlan {
    pub product_id: i64,
    pub expected_version: Version,
    pub new_version: Version,
    /// The caller's version, returned unchanged when the product is merged away.
    pub believed_version: Version,
    pub patch: ProductPatch,
    /// Present when the update needs a collision check.
    pub reconciliation: Option<ReconciliationRequest>,
}
