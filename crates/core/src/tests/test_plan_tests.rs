// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{create_test_ranking, create_test_test, later, updates, v0};
use crate::{CoreError, SubUpdate, TestPatchCommand, TestPatchPlan, plan_test_patch};
use serde_json::json;
use snowflow_domain::{DomainError, EntityKind, FieldGroup, Ranking, Test, Version};

fn command(product_id: Option<i64>, body: serde_json::Value, believed: Version) -> TestPatchCommand {
    TestPatchCommand {
        test_id: 1,
        product_id,
        updates: updates(body),
        believed_version: believed,
    }
}

#[test]
fn test_location_patch_plans_one_test_update() {
    let test: Test = create_test_test(false);
    let plan: TestPatchPlan =
        plan_test_patch(&test, None, &command(None, json!({"location": "X"}), v0())).unwrap();

    let sub_updates: Vec<SubUpdate<'_>> = plan.sub_updates();
    assert_eq!(sub_updates.len(), 1);
    assert_eq!(sub_updates[0].group(), FieldGroup::Test);
    assert!(plan.new_version.is_after(v0()));
    assert_eq!(plan.expected_version, v0());
    assert!(plan.stamps_version());
}

#[test]
fn test_stale_version_is_rejected_before_classification() {
    let mut test: Test = create_test_test(false);
    test.version = later();
    let result = plan_test_patch(&test, None, &command(None, json!({"bogus": 1}), v0()));
    match result.unwrap_err() {
        CoreError::VersionConflict { entity, .. } => assert_eq!(entity, EntityKind::Test),
        other => panic!("Expected VersionConflict, got: {other:?}"),
    }
}

#[test]
fn test_air_and_ranking_plan_two_sub_updates() {
    let test: Test = create_test_test(false);
    let ranking: Ranking = create_test_ranking(5);
    let plan: TestPatchPlan = plan_test_patch(
        &test,
        Some(&ranking),
        &command(Some(5), json!({"ac_temperature": -15, "rank": 3}), v0()),
    )
    .unwrap();

    let groups: Vec<FieldGroup> = plan.sub_updates().iter().map(SubUpdate::group).collect();
    assert_eq!(groups, vec![FieldGroup::AirConditions, FieldGroup::Ranking]);
    let target = plan.ranking.unwrap();
    assert_eq!(target.product_id, 5);
    assert_eq!(target.expected_version, ranking.version);
}

#[test]
fn test_sub_update_count_matches_touched_groups() {
    let test: Test = create_test_test(false);
    let plan: TestPatchPlan = plan_test_patch(
        &test,
        None,
        &command(
            None,
            json!({"ac_temperature": 1, "air_humidity": 40, "wind": "L", "snow_type": "NS"}),
            v0(),
        ),
    )
    .unwrap();
    assert_eq!(plan.sub_updates().len(), 2);
    assert!(!plan.stamps_version());
}

#[test]
fn test_ranking_fields_without_product_are_rejected() {
    let test: Test = create_test_test(false);
    let result = plan_test_patch(&test, None, &command(None, json!({"rank": 3}), v0()));
    let error: CoreError = result.unwrap_err();
    assert_eq!(error, CoreError::MissingRankingTarget { test_id: 1 });
    assert!(error.to_string().contains("/tests/{test_id}/products/{product_id}"));
}

#[test]
fn test_zero_product_id_is_the_no_product_sentinel() {
    let test: Test = create_test_test(false);
    let result = plan_test_patch(&test, None, &command(Some(0), json!({"rank": 3}), v0()));
    assert_eq!(
        result.unwrap_err(),
        CoreError::MissingRankingTarget { test_id: 1 }
    );
}

#[test]
fn test_unranked_product_is_rejected() {
    let test: Test = create_test_test(false);
    let other: Ranking = create_test_ranking(6);
    let result = plan_test_patch(
        &test,
        Some(&other),
        &command(Some(5), json!({"distance_behind": 0}), v0()),
    );
    assert_eq!(
        result.unwrap_err(),
        CoreError::RankingNotFound {
            test_id: 1,
            product_id: 5
        }
    );
}

#[test]
fn test_product_id_without_ranking_fields_is_ignored() {
    let test: Test = create_test_test(false);
    let plan: TestPatchPlan = plan_test_patch(
        &test,
        None,
        &command(Some(5), json!({"comment": "icy"}), v0()),
    )
    .unwrap();
    assert!(plan.ranking.is_none());
}

#[test]
fn test_unknown_field_is_named() {
    let test: Test = create_test_test(false);
    let result = plan_test_patch(&test, None, &command(None, json!({"bogus_field": 1}), v0()));
    assert_eq!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::InvalidField(String::from("bogus_field")))
    );
}

#[test]
fn test_public_test_cannot_become_private() {
    let test: Test = create_test_test(true);
    let result = plan_test_patch(&test, None, &command(None, json!({"is_public": false}), v0()));
    assert_eq!(
        result.unwrap_err(),
        CoreError::PublicToPrivate {
            entity: EntityKind::Test
        }
    );
}

#[test]
fn test_new_version_is_after_newer_ranking_version() {
    let test: Test = create_test_test(false);
    let mut ranking: Ranking = create_test_ranking(5);
    ranking.version = Version::parse("2999-01-01 00:00:00.000000").unwrap();
    let plan: TestPatchPlan = plan_test_patch(
        &test,
        Some(&ranking),
        &command(Some(5), json!({"rank": 1}), v0()),
    )
    .unwrap();
    assert!(plan.new_version.is_after(ranking.version));
}
