// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transactional orchestration.
//!
//! Each function here opens exactly one transaction and either commits
//! every write it issues or none of them. They are generic over
//! [`RecordStore`] so the same sequence runs on every backend.

use tracing::{debug, error, info, warn};

use snowflow::{
    Collisions, ProductPatchPlan, ReconciliationOutcome, ReconciliationRequest, SubUpdate,
    TestPatchPlan, reconcile,
};
use snowflow_domain::{FieldGroup, NaturalKey, Product, Ranking, Test, TestConditions, Version};

use crate::backend::RecordStore;
use crate::data_models::{NewProduct, NewTest};
use crate::error::PersistenceError;

const PRODUCT_TARGET: &str = "product";

/// Result of executing a product patch plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductPatchOutcome {
    /// The fields were written to the product, which now has `version`.
    Updated { version: Version },
    /// The product was folded into `canonical_id` and no longer exists.
    ///
    /// `version` is the version the caller submitted.
    Merged { canonical_id: i64, version: Version },
}

impl ProductPatchOutcome {
    /// The version to hand back to the caller.
    #[must_use]
    pub const fn version(&self) -> Version {
        match self {
            Self::Updated { version } | Self::Merged { version, .. } => *version,
        }
    }
}

/// A ranking to add to a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewRanking {
    pub test_id: i64,
    pub product_id: i64,
    pub rank: i32,
    pub distance_behind: i32,
}

fn conflict(group: FieldGroup) -> PersistenceError {
    PersistenceError::Conflict {
        target: group.label().to_string(),
    }
}

/// Executes a test patch plan.
///
/// Issues one statement per non-empty group in group order. Ranking and
/// test statements are compare-and-swap on their row versions.
///
/// Returns `plan.new_version` when a versioned row was written, otherwise
/// the commit instant.
///
/// # Errors
///
/// - `PersistenceError::Conflict` naming the group whose statement wrote
///   no row, or the test if it disappeared or its version moved since
///   planning
/// - any storage error, after which nothing is written
pub fn apply_test_plan<C: RecordStore>(
    conn: &mut C,
    plan: &TestPatchPlan,
) -> Result<Version, PersistenceError> {
    let test_id: i64 = plan.test_id;
    let sub_updates: Vec<SubUpdate<'_>> = plan.sub_updates();

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let test: Test = conn
            .find_test(test_id)?
            .ok_or_else(|| conflict(FieldGroup::Test))?;
        if test.version != plan.expected_version {
            warn!(test_id, stored = %test.version, "Test changed since planning");
            return Err(conflict(FieldGroup::Test));
        }

        for sub_update in &sub_updates {
            let group: FieldGroup = sub_update.group();
            let written: usize = match *sub_update {
                SubUpdate::AirConditions(patch) => {
                    conn.update_air_conditions(test.air_conditions_id, patch)
                }
                SubUpdate::SnowConditions(patch) => {
                    conn.update_snow_conditions(test.snow_conditions_id, patch)
                }
                SubUpdate::TrackConditions(patch) => {
                    conn.update_track_conditions(test.track_conditions_id, patch)
                }
                SubUpdate::Ranking { target, patch } => {
                    conn.update_ranking(test_id, target, patch, plan.new_version)
                }
                SubUpdate::Test(patch) => {
                    conn.update_test(test_id, plan.expected_version, patch, plan.new_version)
                }
            }
            .inspect_err(|e| {
                error!(test_id, group = %group, error = %e, "Sub-update failed");
            })?;

            if written == 0 {
                warn!(test_id, group = %group, "Sub-update wrote no rows");
                return Err(conflict(group));
            }
            debug!(test_id, group = %group, "Applied sub-update");
        }
        Ok(())
    })?;

    let version: Version = if plan.stamps_version() {
        plan.new_version
    } else {
        Version::now()
    };

    info!(
        test_id,
        sub_updates = sub_updates.len(),
        %version,
        "Applied test patch"
    );
    Ok(version)
}

/// Looks up the products that share a natural key with `product_id`.
///
/// # Errors
///
/// Returns an error if a lookup fails. A lookup that finds nothing is not
/// an error.
pub fn find_collisions<C: RecordStore>(
    conn: &mut C,
    product_id: i64,
    key: &NaturalKey,
    team: i64,
) -> Result<Collisions, PersistenceError> {
    Ok(Collisions {
        public_match: conn.find_public_match(key, product_id)?,
        team_match: conn.find_team_match(key, team, product_id)?,
    })
}

/// Executes a product patch plan, reconciling against duplicates first.
///
/// # Errors
///
/// - `PersistenceError::DuplicateProduct` if the key is taken and no merge
///   applies
/// - `PersistenceError::Conflict` if the product changed since planning, or
///   if a merge would rank both products in the same test
/// - any storage error, after which nothing is written
pub fn apply_product_plan<C: RecordStore>(
    conn: &mut C,
    plan: &ProductPatchPlan,
) -> Result<ProductPatchOutcome, PersistenceError> {
    let product_id: i64 = plan.product_id;

    let outcome: ProductPatchOutcome = conn.transaction::<_, PersistenceError, _>(|conn| {
        let decision: ReconciliationOutcome = match &plan.reconciliation {
            None => ReconciliationOutcome::InPlaceUpdate,
            Some(ReconciliationRequest {
                key,
                team,
                transition,
            }) => {
                let collisions: Collisions = find_collisions(conn, product_id, key, *team)?;
                debug!(product_id, %key, ?transition, ?collisions, "Reconciling product");
                reconcile(*transition, collisions)
            }
        };

        match decision {
            ReconciliationOutcome::InPlaceUpdate => {
                let written: usize = conn.update_product(
                    product_id,
                    plan.expected_version,
                    &plan.patch,
                    plan.new_version,
                )?;
                if written == 0 {
                    warn!(product_id, "Product update wrote no rows");
                    return Err(PersistenceError::Conflict {
                        target: PRODUCT_TARGET.to_string(),
                    });
                }
                Ok(ProductPatchOutcome::Updated {
                    version: plan.new_version,
                })
            }
            ReconciliationOutcome::Merge { canonical_id } => {
                merge_product(conn, product_id, canonical_id, plan.expected_version)?;
                Ok(ProductPatchOutcome::Merged {
                    canonical_id,
                    version: plan.believed_version,
                })
            }
            ReconciliationOutcome::Reject { existing_id } => {
                info!(product_id, existing_id, "Rejected duplicate product");
                Err(PersistenceError::DuplicateProduct { existing_id })
            }
        }
    })?;

    info!(product_id, ?outcome, "Applied product patch");
    Ok(outcome)
}

/// Folds `product_id` into `canonical_id`.
///
/// Rankings are re-pointed before the product row is deleted, both inside
/// the caller's transaction.
fn merge_product<C: RecordStore>(
    conn: &mut C,
    product_id: i64,
    canonical_id: i64,
    expected_version: Version,
) -> Result<(), PersistenceError> {
    if conn.count_shared_rankings(product_id, canonical_id)? > 0 {
        warn!(
            product_id,
            canonical_id, "Both products are ranked in the same test"
        );
        return Err(conflict(FieldGroup::Ranking));
    }

    let moved: usize = conn.repoint_rankings(product_id, canonical_id)?;

    if conn.delete_product(product_id, expected_version)? == 0 {
        warn!(product_id, "Merged product changed before delete");
        return Err(PersistenceError::Conflict {
            target: PRODUCT_TARGET.to_string(),
        });
    }

    info!(product_id, canonical_id, moved, "Merged product");
    Ok(())
}

/// Creates a product after checking its natural key is free.
///
/// A private product must not collide with the team's private products; a
/// public product must not collide with public products.
///
/// # Errors
///
/// - `PersistenceError::DuplicateProduct` if the key is taken
/// - any storage error
pub fn create_product<C: RecordStore>(
    conn: &mut C,
    product: &NewProduct,
) -> Result<Product, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let key: NaturalKey = NaturalKey::derive(&product.ean_code, &product.name);
        // Ids start at 1, so 0 excludes nothing.
        let existing: Option<i64> = if product.is_public {
            conn.find_public_match(&key, 0)?
        } else {
            conn.find_team_match(&key, product.testing_team, 0)?
        };
        if let Some(existing_id) = existing {
            info!(%key, existing_id, "Rejected duplicate product");
            return Err(PersistenceError::DuplicateProduct { existing_id });
        }

        let product_id: i64 = conn.insert_product(product, Version::now())?;
        info!(product_id, %key, "Created product");

        conn.find_product(product_id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("product {product_id}")))
    })
}

/// Creates a test together with its three conditions rows.
///
/// # Errors
///
/// Returns an error if any insert fails, after which nothing is written.
pub fn create_test<C: RecordStore>(conn: &mut C, test: &NewTest) -> Result<Test, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let air_id: i64 = conn.insert_air_conditions(&test.air)?;
        let snow_id: i64 = conn.insert_snow_conditions(&test.snow)?;
        let track_id: i64 = conn.insert_track_conditions(&test.track)?;
        let test_id: i64 = conn.insert_test(test, (air_id, snow_id, track_id), Version::now())?;

        info!(test_id, testing_team = test.testing_team, "Created test");

        conn.find_test(test_id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("test {test_id}")))
    })
}

/// Ranks a product in a test.
///
/// The ranking is public exactly when the product is.
///
/// # Errors
///
/// - `PersistenceError::NotFound` if the test or product does not exist
/// - `PersistenceError::Conflict` if the product is already ranked in the test
/// - any storage error
pub fn add_ranking<C: RecordStore>(
    conn: &mut C,
    ranking: NewRanking,
) -> Result<Ranking, PersistenceError> {
    let NewRanking {
        test_id,
        product_id,
        rank,
        distance_behind,
    } = ranking;

    conn.transaction::<_, PersistenceError, _>(|conn| {
        conn.find_test(test_id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("test {test_id}")))?;
        let product: Product = conn
            .find_product(product_id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("product {product_id}")))?;

        if conn.find_ranking(test_id, product_id)?.is_some() {
            return Err(conflict(FieldGroup::Ranking));
        }

        conn.insert_ranking(&Ranking {
            test_id,
            product_id,
            rank,
            distance_behind,
            is_rank_public: product.is_public,
            version: Version::now(),
        })?;
        debug!(test_id, product_id, rank, "Added ranking");

        conn.find_ranking(test_id, product_id)?.ok_or_else(|| {
            PersistenceError::NotFound(format!("ranking {test_id}/{product_id}"))
        })
    })
}

/// Loads the three conditions rows of a test.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if a conditions row is missing, or
/// any storage error.
pub fn load_conditions<C: RecordStore>(
    conn: &mut C,
    test: &Test,
) -> Result<TestConditions, PersistenceError> {
    let test_id: i64 = test.test_id;
    let missing = |what: &str| PersistenceError::NotFound(format!("{what} for test {test_id}"));

    Ok(TestConditions {
        air: conn
            .find_air_conditions(test.air_conditions_id)?
            .ok_or_else(|| missing("air conditions"))?,
        snow: conn
            .find_snow_conditions(test.snow_conditions_id)?
            .ok_or_else(|| missing("snow conditions"))?,
        track: conn
            .find_track_conditions(test.track_conditions_id)?
            .ok_or_else(|| missing("track conditions"))?,
    })
}
