// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use snowflow_domain::{
    Cloud, Product, ProductStatus, ProductType, Ranking, SnowHumidity, SnowType, Test,
    TestConditions, TrackHardness, TrackType, Wind,
};

/// A sparse update of a test or a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchRequest {
    /// Caller-facing field names mapped to their new values.
    pub updates: Map<String, Value>,
    /// The version the caller last observed, RFC 3339 or storage form.
    pub version: String,
}

/// The result of a successful patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchResponse {
    pub message: String,
    /// The token to submit with the next patch.
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub brand: String,
    /// Blank or absent when the product has no EAN code.
    #[serde(default)]
    pub ean_code: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    pub product_type: ProductType,
    pub high_temperature: f64,
    pub low_temperature: f64,
    pub status: ProductStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProductResponse {
    pub product_id: i64,
    pub version: String,
    pub message: String,
}

/// Air conditions for a new test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirConditionsRequest {
    pub temperature: f64,
    pub humidity: i32,
    pub wind: Wind,
    pub cloud: Cloud,
}

/// Snow conditions for a new test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnowConditionsRequest {
    pub temperature: f64,
    pub snow_type: SnowType,
    pub snow_humidity: SnowHumidity,
}

/// Track conditions for a new test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackConditionsRequest {
    pub track_hardness: TrackHardness,
    pub track_type: TrackType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTestRequest {
    /// `YYYY-MM-DD`.
    pub test_date: String,
    pub location: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    pub air: AirConditionsRequest,
    pub snow: SnowConditionsRequest,
    pub track: TrackConditionsRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTestResponse {
    pub test_id: i64,
    pub version: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddRankingRequest {
    pub product_id: i64,
    pub rank: i32,
    #[serde(default)]
    pub distance_behind: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddRankingResponse {
    pub test_id: i64,
    pub product_id: i64,
    /// Follows the product's visibility at the time of ranking.
    pub is_rank_public: bool,
    pub version: String,
    pub message: String,
}

/// A test with its conditions and the rankings the caller may see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestDetailsResponse {
    pub test: Test,
    pub conditions: TestConditions,
    pub rankings: Vec<Ranking>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub product: Product,
}
