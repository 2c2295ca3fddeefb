// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request handlers.
//!
//! Every write handler follows the same sequence: load the stored entity,
//! run the guard, plan the change, and hand the plan to persistence. Nothing
//! is written unless all earlier steps succeed.

use time::Date;
use tracing::{debug, info};

use snowflow::{
    ProductPatchCommand, ProductPatchPlan, TestPatchCommand, TestPatchPlan, plan_product_patch,
    plan_test_patch,
};
use snowflow_domain::{
    EntityKind, MAX_COMMENT_LEN, MAX_LOCATION_LEN, MAX_NAME_LEN, Product, Ranking, Test,
    TestConditions, Version, validate_date, validate_distance, validate_ean, validate_humidity,
    validate_rank, validate_required_text, validate_temperature, validate_temperature_range,
    validate_text, validate_url,
};
use snowflow_persistence::{
    NewAirConditions, NewProduct, NewRanking, NewSnowConditions, NewTest, NewTrackConditions,
    Persistence, ProductPatchOutcome,
};

use crate::auth::{AuthenticatedMember, AuthorizationService, GuardSubject, requested_visibility};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    AddRankingRequest, AddRankingResponse, CreateProductRequest, CreateProductResponse,
    CreateTestRequest, CreateTestResponse, PatchRequest, PatchResponse, ProductResponse,
    TestDetailsResponse,
};

// ============================================================================
// Loading
// ============================================================================

fn load_test(persistence: &mut Persistence, test_id: i64) -> Result<Test, ApiError> {
    persistence
        .get_test(test_id)
        .map_err(|e| translate_persistence_error(e, EntityKind::Test, test_id))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Test"),
            message: format!("Test {test_id} does not exist"),
        })
}

fn load_product(persistence: &mut Persistence, product_id: i64) -> Result<Product, ApiError> {
    persistence
        .get_product(product_id)
        .map_err(|e| translate_persistence_error(e, EntityKind::Product, product_id))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Product"),
            message: format!("Product {product_id} does not exist"),
        })
}

fn version_token(version: Version) -> Result<String, ApiError> {
    version
        .to_storage_string()
        .map_err(translate_domain_error)
}

/// Private entities of other teams are reported as missing.
const fn visible_to(member: &AuthenticatedMember, is_public: bool, owning_team: i64) -> bool {
    is_public || member.team_id == owning_team
}

// ============================================================================
// Patches
// ============================================================================

/// Applies a sparse update to a test, its conditions, and optionally the
/// ranking of `product_id` within it.
///
/// `product_id` is required when the update carries ranking fields; zero is
/// treated as absent.
///
/// # Errors
///
/// - `ApiError::InvalidInput` for a malformed version, an unknown field, an
///   invalid value, an empty update, or ranking fields without a product
/// - `ApiError::Unauthorized` if a guard rule rejects the request
/// - `ApiError::Conflict` if the caller's version is stale or a concurrent
///   write won
/// - `ApiError::ResourceNotFound` if the test or ranking does not exist
pub fn patch_test(
    persistence: &mut Persistence,
    member: &AuthenticatedMember,
    test_id: i64,
    product_id: Option<i64>,
    request: &PatchRequest,
) -> Result<PatchResponse, ApiError> {
    let believed_version: Version =
        Version::parse(&request.version).map_err(translate_domain_error)?;
    let test: Test = load_test(persistence, test_id)?;

    AuthorizationService::authorize_patch(
        member,
        &GuardSubject::from(&test),
        requested_visibility(&request.updates),
    )?;

    let ranking: Option<Ranking> = match product_id {
        Some(id) if id > 0 => persistence
            .get_ranking(test_id, id)
            .map_err(|e| translate_persistence_error(e, EntityKind::Test, test_id))?,
        _ => None,
    };

    let command: TestPatchCommand = TestPatchCommand {
        test_id,
        product_id,
        updates: request.updates.clone(),
        believed_version,
    };
    let plan: TestPatchPlan =
        plan_test_patch(&test, ranking.as_ref(), &command).map_err(translate_core_error)?;
    debug!(
        test_id,
        user_id = member.user_id,
        groups = plan.sub_updates().len(),
        "Planned test patch"
    );

    let version: Version = persistence
        .apply_test_plan(&plan)
        .map_err(|e| translate_persistence_error(e, EntityKind::Test, test_id))?;

    info!(
        test_id,
        groups = plan.sub_updates().len(),
        version = %version,
        "Applied test patch"
    );

    Ok(PatchResponse {
        message: String::from("Test updated successfully"),
        version: version_token(version)?,
    })
}

/// Applies a sparse update to a product.
///
/// A change of natural key or a transition to public triggers
/// reconciliation. When the product merges into an existing public product
/// the response carries the caller's submitted version.
///
/// # Errors
///
/// - `ApiError::InvalidInput` for a malformed version, an unknown field, an
///   invalid value, or an empty update
/// - `ApiError::Unauthorized` if a guard rule rejects the request
/// - `ApiError::DomainRuleViolation` for an inverted temperature range or a
///   natural-key collision that cannot be merged
/// - `ApiError::Conflict` if the caller's version is stale or a concurrent
///   write won
/// - `ApiError::ResourceNotFound` if the product does not exist
pub fn patch_product(
    persistence: &mut Persistence,
    member: &AuthenticatedMember,
    product_id: i64,
    request: &PatchRequest,
) -> Result<PatchResponse, ApiError> {
    let believed_version: Version =
        Version::parse(&request.version).map_err(translate_domain_error)?;
    let product: Product = load_product(persistence, product_id)?;

    AuthorizationService::authorize_patch(
        member,
        &GuardSubject::from(&product),
        requested_visibility(&request.updates),
    )?;

    let command: ProductPatchCommand = ProductPatchCommand {
        product_id,
        updates: request.updates.clone(),
        believed_version,
    };
    let plan: ProductPatchPlan =
        plan_product_patch(&product, &command).map_err(translate_core_error)?;

    let outcome: ProductPatchOutcome = persistence
        .apply_product_plan(&plan)
        .map_err(|e| translate_persistence_error(e, EntityKind::Product, product_id))?;

    let message: String = match outcome {
        ProductPatchOutcome::Updated { version } => {
            info!(product_id, version = %version, "Updated product");
            String::from("Product updated successfully")
        }
        ProductPatchOutcome::Merged { canonical_id, .. } => {
            info!(product_id, canonical_id, "Merged product into public duplicate");
            format!("Product merged into existing public product {canonical_id}")
        }
    };

    Ok(PatchResponse {
        message,
        version: version_token(outcome.version())?,
    })
}

// ============================================================================
// Creation
// ============================================================================

fn validate_product_request(request: &CreateProductRequest) -> Result<String, ApiError> {
    validate_required_text("name", &request.name, MAX_NAME_LEN).map_err(translate_domain_error)?;
    validate_required_text("brand", &request.brand, MAX_NAME_LEN)
        .map_err(translate_domain_error)?;
    let ean_code: String =
        validate_ean("ean_code", &request.ean_code).map_err(translate_domain_error)?;
    if let Some(comment) = &request.comment {
        validate_text("comment", comment, MAX_COMMENT_LEN, false)
            .map_err(translate_domain_error)?;
    }
    if let Some(url) = &request.image_url {
        validate_url("image_url", url).map_err(translate_domain_error)?;
    }
    validate_temperature("high_temperature", request.high_temperature)
        .map_err(translate_domain_error)?;
    validate_temperature("low_temperature", request.low_temperature)
        .map_err(translate_domain_error)?;
    validate_temperature_range(request.low_temperature, request.high_temperature)
        .map_err(translate_domain_error)?;
    Ok(ean_code)
}

/// Creates a product owned by the member's team.
///
/// # Errors
///
/// - `ApiError::InvalidInput` for an invalid value
/// - `ApiError::DomainRuleViolation` for an inverted temperature range or a
///   natural key that already exists
/// - `ApiError::Unauthorized` if a researcher asks for a public product
pub fn create_product(
    persistence: &mut Persistence,
    member: &AuthenticatedMember,
    request: &CreateProductRequest,
) -> Result<CreateProductResponse, ApiError> {
    AuthorizationService::authorize_create(member, EntityKind::Product, request.is_public)?;
    let ean_code: String = validate_product_request(request)?;

    let new_product: NewProduct = NewProduct {
        name: request.name.clone(),
        brand: request.brand.clone(),
        ean_code,
        image_url: request.image_url.clone(),
        comment: request.comment.clone(),
        is_public: request.is_public,
        product_type: request.product_type,
        high_temperature: request.high_temperature,
        low_temperature: request.low_temperature,
        testing_team: member.team_id,
        status: request.status,
    };
    let product: Product = persistence
        .create_product(&new_product)
        .map_err(|e| translate_persistence_error(e, EntityKind::Product, 0))?;

    info!(
        product_id = product.product_id,
        team_id = member.team_id,
        is_public = product.is_public,
        "Created product"
    );

    Ok(CreateProductResponse {
        product_id: product.product_id,
        version: version_token(product.version)?,
        message: format!("Created product '{}'", product.name),
    })
}

fn validate_test_request(request: &CreateTestRequest) -> Result<Date, ApiError> {
    let test_date: Date =
        validate_date("test_date", &request.test_date).map_err(translate_domain_error)?;
    validate_required_text("location", &request.location, MAX_LOCATION_LEN)
        .map_err(translate_domain_error)?;
    if let Some(comment) = &request.comment {
        validate_text("comment", comment, MAX_COMMENT_LEN, false)
            .map_err(translate_domain_error)?;
    }
    validate_temperature("ac_temperature", request.air.temperature)
        .map_err(translate_domain_error)?;
    validate_temperature("sc_temperature", request.snow.temperature)
        .map_err(translate_domain_error)?;
    validate_humidity("air_humidity", request.air.humidity).map_err(translate_domain_error)?;
    Ok(test_date)
}

/// Creates a test and its three conditions records for the member's team.
///
/// # Errors
///
/// - `ApiError::InvalidInput` for an invalid value
/// - `ApiError::Unauthorized` if a researcher asks for a public test
pub fn create_test(
    persistence: &mut Persistence,
    member: &AuthenticatedMember,
    request: &CreateTestRequest,
) -> Result<CreateTestResponse, ApiError> {
    AuthorizationService::authorize_create(member, EntityKind::Test, request.is_public)?;
    let test_date: Date = validate_test_request(request)?;

    let new_test: NewTest = NewTest {
        test_date,
        location: request.location.clone(),
        comment: request.comment.clone(),
        is_public: request.is_public,
        testing_team: member.team_id,
        air: NewAirConditions {
            temperature: request.air.temperature,
            humidity: request.air.humidity,
            wind: request.air.wind,
            cloud: request.air.cloud,
        },
        snow: NewSnowConditions {
            temperature: request.snow.temperature,
            snow_type: request.snow.snow_type,
            snow_humidity: request.snow.snow_humidity,
        },
        track: NewTrackConditions {
            track_hardness: request.track.track_hardness,
            track_type: request.track.track_type,
        },
    };
    let test: Test = persistence
        .create_test(&new_test)
        .map_err(|e| translate_persistence_error(e, EntityKind::Test, 0))?;

    info!(test_id = test.test_id, team_id = member.team_id, "Created test");

    Ok(CreateTestResponse {
        test_id: test.test_id,
        version: version_token(test.version)?,
        message: format!("Created test at {}", test.location),
    })
}

/// Ranks a product within a test owned by the member's team.
///
/// The product must be public or belong to the member's team.
///
/// # Errors
///
/// - `ApiError::InvalidInput` for a non-positive rank or a negative distance
/// - `ApiError::Unauthorized` if a guard rule rejects the request
/// - `ApiError::ResourceNotFound` if the test or product does not exist
/// - `ApiError::Conflict` if the product is already ranked in the test
pub fn add_ranking(
    persistence: &mut Persistence,
    member: &AuthenticatedMember,
    test_id: i64,
    request: &AddRankingRequest,
) -> Result<AddRankingResponse, ApiError> {
    let test: Test = load_test(persistence, test_id)?;
    AuthorizationService::authorize_rank(member, &test)?;

    validate_rank("rank", request.rank).map_err(translate_domain_error)?;
    validate_distance("distance_behind", request.distance_behind)
        .map_err(translate_domain_error)?;

    let product: Product = load_product(persistence, request.product_id)?;
    if !visible_to(member, product.is_public, product.testing_team) {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Product"),
            message: format!("Product {} does not exist", request.product_id),
        });
    }

    let ranking: Ranking = persistence
        .add_ranking(NewRanking {
            test_id,
            product_id: product.product_id,
            rank: request.rank,
            distance_behind: request.distance_behind,
        })
        .map_err(|e| translate_persistence_error(e, EntityKind::Test, test_id))?;

    info!(
        test_id,
        product_id = ranking.product_id,
        rank = ranking.rank,
        "Added ranking"
    );

    Ok(AddRankingResponse {
        test_id,
        product_id: ranking.product_id,
        is_rank_public: ranking.is_rank_public,
        version: version_token(ranking.version)?,
        message: format!("Ranked product {} in test {test_id}", ranking.product_id),
    })
}

// ============================================================================
// Reads
// ============================================================================

/// Returns a test with its conditions and rankings.
///
/// Callers from other teams see a public test with only its public
/// rankings; a private test of another team is reported as missing.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the test does not exist or is not
/// visible to the member.
pub fn get_test(
    persistence: &mut Persistence,
    member: &AuthenticatedMember,
    test_id: i64,
) -> Result<TestDetailsResponse, ApiError> {
    let test: Test = load_test(persistence, test_id)?;
    if !visible_to(member, test.is_public, test.testing_team) {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Test"),
            message: format!("Test {test_id} does not exist"),
        });
    }

    let conditions: TestConditions = persistence
        .get_conditions(test_id)
        .map_err(|e| translate_persistence_error(e, EntityKind::Test, test_id))?
        .ok_or_else(|| ApiError::Internal {
            message: format!("Conditions for test {test_id} are missing"),
        })?;

    let own_team: bool = member.team_id == test.testing_team;
    let rankings: Vec<Ranking> = persistence
        .list_rankings_for_test(test_id)
        .map_err(|e| translate_persistence_error(e, EntityKind::Test, test_id))?
        .into_iter()
        .filter(|r| own_team || r.is_rank_public)
        .collect();

    Ok(TestDetailsResponse {
        test,
        conditions,
        rankings,
    })
}

/// Returns a product.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the product does not exist or is
/// a private product of another team.
pub fn get_product(
    persistence: &mut Persistence,
    member: &AuthenticatedMember,
    product_id: i64,
) -> Result<ProductResponse, ApiError> {
    let product: Product = load_product(persistence, product_id)?;
    if !visible_to(member, product.is_public, product.testing_team) {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Product"),
            message: format!("Product {product_id} does not exist"),
        });
    }
    Ok(ProductResponse { product })
}
