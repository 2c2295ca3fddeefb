// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde_json::{Map, Value};
use snowflow_domain::{Product, ProductStatus, ProductType, Ranking, Test, Version};
use time::macros::{date, datetime};

pub fn v0() -> Version {
    Version::from_datetime(datetime!(2026-01-10 09:00:00.250000 UTC))
}

pub fn later() -> Version {
    Version::from_datetime(datetime!(2026-01-10 09:05:00 UTC))
}

pub fn updates(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("Expected a JSON object, got: {other:?}"),
    }
}

pub fn create_test_test(is_public: bool) -> Test {
    Test {
        test_id: 1,
        test_date: date!(2026 - 01 - 09),
        location: String::from("Lillehammer"),
        comment: None,
        is_public,
        testing_team: 1,
        version: v0(),
        snow_conditions_id: 10,
        track_conditions_id: 20,
        air_conditions_id: 30,
    }
}

pub fn create_test_ranking(product_id: i64) -> Ranking {
    Ranking {
        test_id: 1,
        product_id,
        rank: 2,
        distance_behind: 40,
        is_rank_public: false,
        version: v0(),
    }
}

pub fn create_test_product(ean_code: &str, is_public: bool) -> Product {
    Product {
        product_id: 7,
        name: String::from("Blue Glide"),
        brand: String::from("Nordwax"),
        ean_code: String::from(ean_code),
        image_url: None,
        comment: None,
        is_public,
        product_type: ProductType::Solid,
        high_temperature: -2.0,
        low_temperature: -12.0,
        testing_team: 1,
        version: v0(),
        status: ProductStatus::Active,
    }
}
