// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde_json::json;
use snowflow::TestPatchPlan;
use snowflow_domain::{
    Cloud, SnowType, TestConditions, TrackHardness, TrackType, Version, Wind,
};
use time::macros::date;

use super::{Fixture, create_ranked_fixture, plan_for_test};
use crate::error::PersistenceError;

#[test]
fn test_location_update_stamps_newer_version() {
    let Fixture {
        mut persistence,
        test,
        ..
    } = create_ranked_fixture();

    let plan: TestPatchPlan = plan_for_test(&test, None, None, json!({"location": "Beitostolen"}));
    assert_eq!(plan.sub_updates().len(), 1);

    let version: Version = persistence.apply_test_plan(&plan).unwrap();
    assert!(version.is_after(test.version));

    let stored = persistence.get_test(test.test_id).unwrap().unwrap();
    assert_eq!(stored.location, "Beitostolen");
    assert_eq!(stored.version, version);
    assert_eq!(stored.test_date, test.test_date);
}

#[test]
fn test_stale_test_version_is_a_conflict_and_leaves_row_unchanged() {
    let Fixture {
        mut persistence,
        test,
        ..
    } = create_ranked_fixture();

    let first: TestPatchPlan = plan_for_test(&test, None, None, json!({"location": "Beitostolen"}));
    let v1: Version = persistence.apply_test_plan(&first).unwrap();

    // Planned against the V0 snapshot; the stored row is now at V1.
    let stale: TestPatchPlan = plan_for_test(&test, None, None, json!({"location": "Sjusjoen"}));
    let result = persistence.apply_test_plan(&stale);

    match result.unwrap_err() {
        PersistenceError::Conflict { target } => assert_eq!(target, "test"),
        other => panic!("Expected Conflict, got: {other:?}"),
    }

    let stored = persistence.get_test(test.test_id).unwrap().unwrap();
    assert_eq!(stored.location, "Beitostolen");
    assert_eq!(stored.version, v1);
}

#[test]
fn test_resubmitting_with_returned_version_succeeds() {
    let Fixture {
        mut persistence,
        test,
        ..
    } = create_ranked_fixture();

    let first: TestPatchPlan = plan_for_test(&test, None, None, json!({"comment": "windy"}));
    let v1: Version = persistence.apply_test_plan(&first).unwrap();

    let refreshed = persistence.get_test(test.test_id).unwrap().unwrap();
    let second: TestPatchPlan =
        plan_for_test(&refreshed, None, None, json!({"comment": "windy"}));
    let v2: Version = persistence.apply_test_plan(&second).unwrap();

    assert_ne!(v1, v2);
    assert!(v2.is_after(v1));
    let stored = persistence.get_test(test.test_id).unwrap().unwrap();
    assert_eq!(stored.comment.as_deref(), Some("windy"));
}

#[test]
fn test_air_and_ranking_update_returns_ranking_version() {
    let Fixture {
        mut persistence,
        test,
        product,
        ranking,
    } = create_ranked_fixture();

    let plan: TestPatchPlan = plan_for_test(
        &test,
        Some(&ranking),
        Some(product.product_id),
        json!({"ac_temperature": -15, "rank": 3}),
    );
    assert_eq!(plan.sub_updates().len(), 2);

    let version: Version = persistence.apply_test_plan(&plan).unwrap();

    let stored_ranking = persistence
        .get_ranking(test.test_id, product.product_id)
        .unwrap()
        .unwrap();
    assert_eq!(stored_ranking.rank, 3);
    assert_eq!(stored_ranking.distance_behind, 40);
    assert_eq!(stored_ranking.version, version);

    let conditions: TestConditions = persistence.get_conditions(test.test_id).unwrap().unwrap();
    assert_eq!(conditions.air.temperature, -15.0);
    assert_eq!(conditions.air.humidity, 70);

    // The test row itself was not part of the patch.
    let stored_test = persistence.get_test(test.test_id).unwrap().unwrap();
    assert_eq!(stored_test.version, test.version);
}

#[test]
fn test_every_group_is_written_in_one_patch() {
    let Fixture {
        mut persistence,
        test,
        product,
        ranking,
    } = create_ranked_fixture();

    let plan: TestPatchPlan = plan_for_test(
        &test,
        Some(&ranking),
        Some(product.product_id),
        json!({
            "wind": "ST",
            "cloud": 4,
            "sc_temperature": -3.5,
            "snow_type": "A2",
            "track_hardness": "H5",
            "track_type": "D1",
            "distance_behind": 12,
            "is_rank_public": true,
            "test_date": "2026-01-11",
            "is_public": true,
        }),
    );
    assert_eq!(plan.sub_updates().len(), 5);

    let version: Version = persistence.apply_test_plan(&plan).unwrap();

    let conditions: TestConditions = persistence.get_conditions(test.test_id).unwrap().unwrap();
    assert_eq!(conditions.air.wind, Wind::Strong);
    assert_eq!(conditions.air.cloud, Cloud::Level4);
    assert_eq!(conditions.snow.temperature, -3.5);
    assert_eq!(conditions.snow.snow_type, SnowType::A2);
    assert_eq!(conditions.track.track_hardness, TrackHardness::H5);
    assert_eq!(conditions.track.track_type, TrackType::D1);

    let stored_ranking = persistence
        .get_ranking(test.test_id, product.product_id)
        .unwrap()
        .unwrap();
    assert_eq!(stored_ranking.distance_behind, 12);
    assert!(stored_ranking.is_rank_public);

    let stored_test = persistence.get_test(test.test_id).unwrap().unwrap();
    assert_eq!(stored_test.test_date, date!(2026 - 01 - 11));
    assert!(stored_test.is_public);
    assert_eq!(stored_test.version, version);
    assert_eq!(stored_ranking.version, version);
}

#[test]
fn test_conditions_only_update_returns_commit_time_and_keeps_versions() {
    let Fixture {
        mut persistence,
        test,
        product,
        ranking,
    } = create_ranked_fixture();

    let before: Version = Version::now();
    let plan: TestPatchPlan = plan_for_test(&test, None, None, json!({"air_humidity": 55}));
    assert!(!plan.stamps_version());

    let version: Version = persistence.apply_test_plan(&plan).unwrap();
    assert!(!before.is_after(version));

    let stored_test = persistence.get_test(test.test_id).unwrap().unwrap();
    assert_eq!(stored_test.version, test.version);
    let stored_ranking = persistence
        .get_ranking(test.test_id, product.product_id)
        .unwrap()
        .unwrap();
    assert_eq!(stored_ranking.version, ranking.version);

    let conditions: TestConditions = persistence.get_conditions(test.test_id).unwrap().unwrap();
    assert_eq!(conditions.air.humidity, 55);
}

#[test]
fn test_conditions_update_planned_on_old_test_version_is_a_conflict() {
    let Fixture {
        mut persistence,
        test,
        ..
    } = create_ranked_fixture();

    let first: TestPatchPlan = plan_for_test(&test, None, None, json!({"location": "Beitostolen"}));
    persistence.apply_test_plan(&first).unwrap();

    let stale: TestPatchPlan = plan_for_test(&test, None, None, json!({"air_humidity": 55}));
    match persistence.apply_test_plan(&stale).unwrap_err() {
        PersistenceError::Conflict { target } => assert_eq!(target, "test"),
        other => panic!("Expected Conflict, got: {other:?}"),
    }

    let conditions: TestConditions = persistence.get_conditions(test.test_id).unwrap().unwrap();
    assert_eq!(conditions.air.humidity, 70);
}

#[test]
fn test_failed_ranking_update_rolls_back_earlier_sub_updates() {
    let Fixture {
        mut persistence,
        test,
        product,
        ranking,
    } = create_ranked_fixture();

    // Move the ranking on, leaving `ranking` stale.
    let first: TestPatchPlan = plan_for_test(
        &test,
        Some(&ranking),
        Some(product.product_id),
        json!({"rank": 1}),
    );
    persistence.apply_test_plan(&first).unwrap();

    let stale: TestPatchPlan = plan_for_test(
        &test,
        Some(&ranking),
        Some(product.product_id),
        json!({"ac_temperature": -15, "location": "Sjusjoen", "rank": 3}),
    );
    let result = persistence.apply_test_plan(&stale);

    match result.unwrap_err() {
        PersistenceError::Conflict { target } => assert_eq!(target, "test rankings"),
        other => panic!("Expected Conflict, got: {other:?}"),
    }

    let conditions: TestConditions = persistence.get_conditions(test.test_id).unwrap().unwrap();
    assert_eq!(conditions.air.temperature, -8.0, "air update must roll back");
    let stored_test = persistence.get_test(test.test_id).unwrap().unwrap();
    assert_eq!(stored_test.location, "Lillehammer");
    assert_eq!(stored_test.version, test.version);
    let stored_ranking = persistence
        .get_ranking(test.test_id, product.product_id)
        .unwrap()
        .unwrap();
    assert_eq!(stored_ranking.rank, 1);
}

#[test]
fn test_conflict_message_names_the_group() {
    let err: PersistenceError = PersistenceError::Conflict {
        target: String::from("snow conditions"),
    };
    assert_eq!(
        err.to_string(),
        "Could not update the snow conditions because of a conflict, please refresh."
    );
}
