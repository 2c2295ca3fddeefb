// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::arbiter::arbitrate;
use crate::command::{ProductPatchCommand, TestPatchCommand};
use crate::error::CoreError;
use crate::plan::{ProductPatchPlan, RankingTarget, ReconciliationRequest, TestPatchPlan};
use crate::reconcile::VisibilityTransition;
use snowflow_domain::{
    EntityKind, Product, ProductPatch, Ranking, Test, TestPatch, Version, classify_product_update,
    classify_test_update, validate_temperature_range,
};

/// Plans a sparse update to a test.
///
/// Checks run in this order, and none of them touches the store:
/// version arbitration, field classification, visibility monotonicity,
/// then ranking addressing.
///
/// # Arguments
///
/// * `existing` - The test as currently stored
/// * `ranking` - The addressed ranking, if the command names a product and
///   the ranking exists
/// * `command` - The caller's update
///
/// # Errors
///
/// - `CoreError::VersionConflict` if the test changed since the caller read it
/// - `CoreError::DomainViolation` for unknown fields, invalid values, or an
///   empty update
/// - `CoreError::PublicToPrivate` if a public test would become private
/// - `CoreError::MissingRankingTarget` if ranking fields arrive without a product
/// - `CoreError::RankingNotFound` if the product is not ranked in the test
pub fn plan_test_patch(
    existing: &Test,
    ranking: Option<&Ranking>,
    command: &TestPatchCommand,
) -> Result<TestPatchPlan, CoreError> {
    arbitrate(
        EntityKind::Test,
        existing.version,
        command.believed_version,
    )?;

    let patch: TestPatch = classify_test_update(&command.updates)?;

    if existing.is_public && patch.test.is_public == Some(false) {
        return Err(CoreError::PublicToPrivate {
            entity: EntityKind::Test,
        });
    }

    let mut newest_stored: Version = existing.version;
    let ranking_target: Option<RankingTarget> = if patch.ranking.is_empty() {
        None
    } else {
        // Zero is the "no product" sentinel of the request boundary.
        let product_id: i64 = command
            .product_id
            .filter(|id| *id > 0)
            .ok_or(CoreError::MissingRankingTarget {
                test_id: existing.test_id,
            })?;
        let ranking: &Ranking = ranking
            .filter(|r| r.test_id == existing.test_id && r.product_id == product_id)
            .ok_or(CoreError::RankingNotFound {
                test_id: existing.test_id,
                product_id,
            })?;
        newest_stored = newest_stored.max(ranking.version);
        Some(RankingTarget {
            product_id,
            expected_version: ranking.version,
        })
    };

    Ok(TestPatchPlan {
        test_id: existing.test_id,
        expected_version: existing.version,
        ranking: ranking_target,
        new_version: newest_stored.successor(),
        patch,
    })
}

/// Plans a sparse update to a product.
///
/// # Errors
///
/// - `CoreError::VersionConflict` if the product changed since the caller read it
/// - `CoreError::DomainViolation` for unknown fields, invalid values, an empty
///   update, or a resulting temperature range with low not below high
/// - `CoreError::PublicToPrivate` if a public product would become private
pub fn plan_product_patch(
    existing: &Product,
    command: &ProductPatchCommand,
) -> Result<ProductPatchPlan, CoreError> {
    arbitrate(
        EntityKind::Product,
        existing.version,
        command.believed_version,
    )?;

    let patch: ProductPatch = classify_product_update(&command.updates)?;
    let updated: Product = patch.applied_to(existing);
    validate_temperature_range(updated.low_temperature, updated.high_temperature)?;

    let transition: VisibilityTransition =
        VisibilityTransition::between(existing.is_public, updated.is_public).ok_or(
            CoreError::PublicToPrivate {
                entity: EntityKind::Product,
            },
        )?;

    let reconciliation: Option<ReconciliationRequest> =
        if patch.touches_natural_key() || transition == VisibilityTransition::BecomesPublic {
            Some(ReconciliationRequest {
                key: updated.natural_key(),
                team: existing.testing_team,
                transition,
            })
        } else {
            None
        };

    Ok(ProductPatchPlan {
        product_id: existing.product_id,
        expected_version: existing.version,
        new_version: existing.version.successor(),
        believed_version: command.believed_version,
        patch,
        reconciliation,
    })
}
