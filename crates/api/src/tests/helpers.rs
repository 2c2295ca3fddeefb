// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use serde_json::Value;
use snowflow_domain::{
    Cloud, ProductStatus, ProductType, SnowHumidity, SnowType, TeamRole, TrackHardness, TrackType,
    Wind,
};
use snowflow_persistence::Persistence;

use crate::{
    AddRankingRequest, AirConditionsRequest, AuthenticatedMember, CreateProductRequest,
    CreateProductResponse, CreateTestRequest, CreateTestResponse, PatchRequest,
    SnowConditionsRequest, TrackConditionsRequest, add_ranking, create_product, create_test,
};

pub fn create_test_official(team_id: i64) -> AuthenticatedMember {
    AuthenticatedMember::new(100 + team_id, team_id, TeamRole::Official)
}

pub fn create_test_researcher(team_id: i64) -> AuthenticatedMember {
    AuthenticatedMember::new(200 + team_id, team_id, TeamRole::Researcher)
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn create_test_test_request(is_public: bool) -> CreateTestRequest {
    CreateTestRequest {
        test_date: String::from("2026-01-09"),
        location: String::from("Lillehammer"),
        comment: None,
        is_public,
        air: AirConditionsRequest {
            temperature: -8.0,
            humidity: 70,
            wind: Wind::Light,
            cloud: Cloud::Level2,
        },
        snow: SnowConditionsRequest {
            temperature: -11.5,
            snow_type: SnowType::Fs,
            snow_humidity: SnowHumidity::Ds,
        },
        track: TrackConditionsRequest {
            track_hardness: TrackHardness::H3,
            track_type: TrackType::T1,
        },
    }
}

pub fn create_test_product_request(name: &str, ean_code: &str, is_public: bool) -> CreateProductRequest {
    CreateProductRequest {
        name: name.to_string(),
        brand: String::from("Nordwax"),
        ean_code: ean_code.to_string(),
        image_url: None,
        comment: None,
        is_public,
        product_type: ProductType::Solid,
        high_temperature: -2.0,
        low_temperature: -12.0,
        status: ProductStatus::Active,
    }
}

/// Builds a patch request from a JSON object literal.
pub fn patch(updates: Value, version: &str) -> PatchRequest {
    match updates {
        Value::Object(map) => PatchRequest {
            updates: map,
            version: version.to_string(),
        },
        other => panic!("patch updates must be a JSON object, got: {other}"),
    }
}

pub fn seed_test(
    persistence: &mut Persistence,
    member: &AuthenticatedMember,
    is_public: bool,
) -> CreateTestResponse {
    create_test(persistence, member, &create_test_test_request(is_public)).unwrap()
}

pub fn seed_product(
    persistence: &mut Persistence,
    member: &AuthenticatedMember,
    name: &str,
    ean_code: &str,
    is_public: bool,
) -> CreateProductResponse {
    create_product(
        persistence,
        member,
        &create_test_product_request(name, ean_code, is_public),
    )
    .unwrap()
}

pub fn seed_ranking(
    persistence: &mut Persistence,
    member: &AuthenticatedMember,
    test_id: i64,
    product_id: i64,
    rank: i32,
) {
    add_ranking(
        persistence,
        member,
        test_id,
        &AddRankingRequest {
            product_id,
            rank,
            distance_behind: rank * 10,
        },
    )
    .unwrap();
}
