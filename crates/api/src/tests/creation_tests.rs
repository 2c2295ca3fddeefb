// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use snowflow_domain::{Product, Test, Version};
use snowflow_persistence::Persistence;
use time::macros::date;

use super::helpers::{
    create_test_official, create_test_persistence, create_test_product_request,
    create_test_researcher, create_test_test_request, seed_product, seed_test,
};
use crate::{
    AddRankingRequest, AddRankingResponse, ApiError, AuthenticatedMember, CreateProductRequest,
    CreateProductResponse, CreateTestRequest, CreateTestResponse, add_ranking, create_product,
    create_test,
};

#[test]
fn test_create_test_belongs_to_member_team() {
    let mut persistence: Persistence = create_test_persistence();
    let member: AuthenticatedMember = create_test_official(4);

    let response: CreateTestResponse =
        create_test(&mut persistence, &member, &create_test_test_request(false)).unwrap();

    let test: Test = persistence.get_test(response.test_id).unwrap().unwrap();
    assert_eq!(test.testing_team, 4);
    assert_eq!(test.test_date, date!(2026 - 01 - 09));
    assert_eq!(test.version, Version::parse(&response.version).unwrap());
    assert!(persistence.get_conditions(response.test_id).unwrap().is_some());
}

#[test]
fn test_researcher_cannot_create_public_test() {
    let mut persistence: Persistence = create_test_persistence();
    let result = create_test(
        &mut persistence,
        &create_test_researcher(1),
        &create_test_test_request(true),
    );

    match result.unwrap_err() {
        ApiError::Unauthorized { rule, .. } => assert_eq!(rule, "researcher_publish"),
        other => panic!("Expected Unauthorized, got: {other:?}"),
    }
}

#[test]
fn test_create_test_rejects_invalid_values() {
    let mut persistence: Persistence = create_test_persistence();
    let member: AuthenticatedMember = create_test_official(1);

    let mut bad_date: CreateTestRequest = create_test_test_request(false);
    bad_date.test_date = String::from("09/01/2026");
    let mut bad_humidity: CreateTestRequest = create_test_test_request(false);
    bad_humidity.air.humidity = 120;
    let mut blank_location: CreateTestRequest = create_test_test_request(false);
    blank_location.location = String::from("  ");

    for (request, expected) in [
        (bad_date, "test_date"),
        (bad_humidity, "air_humidity"),
        (blank_location, "location"),
    ] {
        match create_test(&mut persistence, &member, &request).unwrap_err() {
            ApiError::InvalidInput { field, .. } => assert_eq!(field, expected),
            other => panic!("Expected InvalidInput, got: {other:?}"),
        }
    }
}

#[test]
fn test_create_test_applies_patch_text_rules() {
    let mut persistence: Persistence = create_test_persistence();
    let member: AuthenticatedMember = create_test_official(1);

    let mut accented: CreateTestRequest = create_test_test_request(false);
    accented.location = String::from("Troms\u{00f8}");
    match create_test(&mut persistence, &member, &accented).unwrap_err() {
        ApiError::InvalidInput { field, .. } => assert_eq!(field, "location"),
        other => panic!("Expected InvalidInput, got: {other:?}"),
    }

    let mut timestamped: CreateTestRequest = create_test_test_request(false);
    timestamped.test_date = String::from("2026-01-09T08:30:00Z");
    let response: CreateTestResponse = create_test(&mut persistence, &member, &timestamped).unwrap();
    let test: Test = persistence.get_test(response.test_id).unwrap().unwrap();
    assert_eq!(test.test_date, date!(2026 - 01 - 09));
}

#[test]
fn test_create_product_belongs_to_member_team() {
    let mut persistence: Persistence = create_test_persistence();
    let member: AuthenticatedMember = create_test_official(3);

    let response: CreateProductResponse = create_product(
        &mut persistence,
        &member,
        &create_test_product_request("Blue Glide", " 7310001 ", false),
    )
    .unwrap();

    let product: Product = persistence.get_product(response.product_id).unwrap().unwrap();
    assert_eq!(product.testing_team, 3);
    assert_eq!(product.ean_code, "7310001");
    assert_eq!(response.message, "Created product 'Blue Glide'");
}

#[test]
fn test_create_product_rejects_invalid_values() {
    let mut persistence: Persistence = create_test_persistence();
    let member: AuthenticatedMember = create_test_official(1);

    let mut blank_name: CreateProductRequest = create_test_product_request("", "", false);
    blank_name.brand = String::from("Nordwax");
    let mut bad_url: CreateProductRequest = create_test_product_request("Blue Glide", "", false);
    bad_url.image_url = Some(String::from("ftp://example.com/wax.png"));
    let mut too_hot: CreateProductRequest = create_test_product_request("Blue Glide", "", false);
    too_hot.high_temperature = 150.0;

    for (request, expected) in [
        (blank_name, "name"),
        (bad_url, "image_url"),
        (too_hot, "high_temperature"),
    ] {
        match create_product(&mut persistence, &member, &request).unwrap_err() {
            ApiError::InvalidInput { field, .. } => assert_eq!(field, expected),
            other => panic!("Expected InvalidInput, got: {other:?}"),
        }
    }

    let mut inverted: CreateProductRequest = create_test_product_request("Blue Glide", "", false);
    inverted.low_temperature = 5.0;
    match create_product(&mut persistence, &member, &inverted).unwrap_err() {
        ApiError::DomainRuleViolation { rule, .. } => assert_eq!(rule, "temperature_range"),
        other => panic!("Expected DomainRuleViolation, got: {other:?}"),
    }
}

#[test]
fn test_create_product_applies_patch_text_rules() {
    let mut persistence: Persistence = create_test_persistence();
    let member: AuthenticatedMember = create_test_official(1);

    let mut accented_brand: CreateProductRequest =
        create_test_product_request("Blue Glide", "", false);
    accented_brand.brand = String::from("Sk\u{00e5}newax");
    let mut accented_ean: CreateProductRequest =
        create_test_product_request("Blue Glide", "73\u{00e9}", false);
    accented_ean.brand = String::from("Nordwax");

    for (request, expected) in [(accented_brand, "brand"), (accented_ean, "ean_code")] {
        match create_product(&mut persistence, &member, &request).unwrap_err() {
            ApiError::InvalidInput { field, .. } => assert_eq!(field, expected),
            other => panic!("Expected InvalidInput, got: {other:?}"),
        }
    }
}

#[test]
fn test_create_duplicate_product_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();
    let member: AuthenticatedMember = create_test_official(1);
    seed_product(&mut persistence, &member, "Blue Glide", "", false);

    let result = create_product(
        &mut persistence,
        &member,
        &create_test_product_request("Blue Glide", "", false),
    );

    match result.unwrap_err() {
        ApiError::DomainRuleViolation { rule, .. } => assert_eq!(rule, "unique_product"),
        other => panic!("Expected DomainRuleViolation, got: {other:?}"),
    }
}

#[test]
fn test_add_ranking_derives_visibility_from_product() {
    let mut persistence: Persistence = create_test_persistence();
    let member: AuthenticatedMember = create_test_official(1);
    let test_id: i64 = seed_test(&mut persistence, &member, false).test_id;
    let public_id: i64 = seed_product(&mut persistence, &member, "Red Klister", "1", true).product_id;

    let response: AddRankingResponse = add_ranking(
        &mut persistence,
        &member,
        test_id,
        &AddRankingRequest {
            product_id: public_id,
            rank: 1,
            distance_behind: 0,
        },
    )
    .unwrap();

    assert!(response.is_rank_public);
    assert_eq!(response.product_id, public_id);
}

#[test]
fn test_add_ranking_twice_is_a_conflict() {
    let mut persistence: Persistence = create_test_persistence();
    let member: AuthenticatedMember = create_test_official(1);
    let test_id: i64 = seed_test(&mut persistence, &member, false).test_id;
    let product_id: i64 = seed_product(&mut persistence, &member, "Blue Glide", "", false).product_id;
    let request: AddRankingRequest = AddRankingRequest {
        product_id,
        rank: 1,
        distance_behind: 0,
    };

    add_ranking(&mut persistence, &member, test_id, &request).unwrap();
    let result = add_ranking(&mut persistence, &member, test_id, &request);

    match result.unwrap_err() {
        ApiError::Conflict { message } => assert_eq!(
            message,
            "Could not update the test rankings because of a conflict, please refresh."
        ),
        other => panic!("Expected Conflict, got: {other:?}"),
    }
}

#[test]
fn test_add_ranking_requires_owning_team() {
    let mut persistence: Persistence = create_test_persistence();
    let test_id: i64 = seed_test(&mut persistence, &create_test_official(1), false).test_id;
    let other: AuthenticatedMember = create_test_official(2);
    let product_id: i64 = seed_product(&mut persistence, &other, "Blue Glide", "", false).product_id;

    let result = add_ranking(
        &mut persistence,
        &other,
        test_id,
        &AddRankingRequest {
            product_id,
            rank: 1,
            distance_behind: 0,
        },
    );

    match result.unwrap_err() {
        ApiError::Unauthorized { rule, .. } => assert_eq!(rule, "team_ownership"),
        other => panic!("Expected Unauthorized, got: {other:?}"),
    }
}

#[test]
fn test_add_ranking_rejects_hidden_product_and_bad_rank() {
    let mut persistence: Persistence = create_test_persistence();
    let member: AuthenticatedMember = create_test_official(1);
    let test_id: i64 = seed_test(&mut persistence, &member, false).test_id;
    let foreign_id: i64 = seed_product(
        &mut persistence,
        &create_test_official(2),
        "Blue Glide",
        "",
        false,
    )
    .product_id;

    let hidden = add_ranking(
        &mut persistence,
        &member,
        test_id,
        &AddRankingRequest {
            product_id: foreign_id,
            rank: 1,
            distance_behind: 0,
        },
    );
    assert!(matches!(hidden, Err(ApiError::ResourceNotFound { .. })));

    let zero_rank = add_ranking(
        &mut persistence,
        &member,
        test_id,
        &AddRankingRequest {
            product_id: foreign_id,
            rank: 0,
            distance_behind: 0,
        },
    );
    match zero_rank.unwrap_err() {
        ApiError::InvalidInput { field, .. } => assert_eq!(field, "rank"),
        other => panic!("Expected InvalidInput, got: {other:?}"),
    }
}
