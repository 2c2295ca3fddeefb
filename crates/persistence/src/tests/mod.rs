// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::float_cmp)]

mod initialization_tests;
mod test_patch_tests;

use serde_json::{Map, Value};
use snowflow::{
    ProductPatchCommand, ProductPatchPlan, TestPatchCommand, TestPatchPlan, plan_product_patch,
    plan_test_patch,
};
use snowflow_domain::{
    Cloud, Product, ProductStatus, ProductType, Ranking, SnowHumidity, SnowType, Test,
    TrackHardness, TrackType, Version, Wind,
};
use time::macros::date;

use crate::{
    NewAirConditions, NewProduct, NewRanking, NewSnowConditions, NewTest, NewTrackConditions,
    Persistence,
};

pub fn updates(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("Expected a JSON object, got: {other:?}"),
    }
}

pub fn create_test_new_test(testing_team: i64, is_public: bool) -> NewTest {
    NewTest {
        test_date: date!(2026 - 01 - 09),
        location: String::from("Lillehammer"),
        comment: None,
        is_public,
        testing_team,
        air: NewAirConditions {
            temperature: -8.0,
            humidity: 70,
            wind: Wind::Light,
            cloud: Cloud::Level2,
        },
        snow: NewSnowConditions {
            temperature: -11.5,
            snow_type: SnowType::Fs,
            snow_humidity: SnowHumidity::Ds,
        },
        track: NewTrackConditions {
            track_hardness: TrackHardness::H3,
            track_type: TrackType::T1,
        },
    }
}

pub fn create_test_new_product(name: &str, ean_code: &str, is_public: bool) -> NewProduct {
    NewProduct {
        name: String::from(name),
        brand: String::from("Nordwax"),
        ean_code: String::from(ean_code),
        image_url: None,
        comment: None,
        is_public,
        product_type: ProductType::Solid,
        high_temperature: -2.0,
        low_temperature: -12.0,
        testing_team: 1,
        status: ProductStatus::Active,
    }
}

/// A store holding one private test of team 1 with one ranked product.
pub struct Fixture {
    pub persistence: Persistence,
    pub test: Test,
    pub product: Product,
    pub ranking: Ranking,
}

pub fn create_ranked_fixture() -> Fixture {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let test: Test = persistence
        .create_test(&create_test_new_test(1, false))
        .unwrap();
    let product: Product = persistence
        .create_product(&create_test_new_product("Blue Glide", "7310001", false))
        .unwrap();
    let ranking: Ranking = persistence
        .add_ranking(NewRanking {
            test_id: test.test_id,
            product_id: product.product_id,
            rank: 2,
            distance_behind: 40,
        })
        .unwrap();

    Fixture {
        persistence,
        test,
        product,
        ranking,
    }
}

pub fn plan_for_test(
    test: &Test,
    ranking: Option<&Ranking>,
    product_id: Option<i64>,
    value: Value,
) -> TestPatchPlan {
    let command: TestPatchCommand = TestPatchCommand {
        test_id: test.test_id,
        product_id,
        updates: updates(value),
        believed_version: test.version,
    };
    plan_test_patch(test, ranking, &command).unwrap()
}

pub fn plan_for_product(product: &Product, value: Value) -> ProductPatchPlan {
    plan_for_product_with_version(product, value, product.version)
}

pub fn plan_for_product_with_version(
    product: &Product,
    value: Value,
    believed_version: Version,
) -> ProductPatchPlan {
    let command: ProductPatchCommand = ProductPatchCommand {
        product_id: product.product_id,
        updates: updates(value),
        believed_version,
    };
    plan_product_patch(product, &command).unwrap()
}
