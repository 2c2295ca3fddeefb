// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request boundary for snowflow.
//!
//! Handlers take a resolved [`AuthenticatedMember`] and a request, run the
//! authorization guard, plan the change with the core crate, and execute the
//! plan in a single persistence transaction. All failures surface as
//! [`ApiError`].

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedMember, AuthorizationService, GuardSubject, requested_visibility};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    add_ranking, create_product, create_test, get_product, get_test, patch_product, patch_test,
};
pub use request_response::{
    AddRankingRequest, AddRankingResponse, AirConditionsRequest, CreateProductRequest,
    CreateProductResponse, CreateTestRequest, CreateTestResponse, PatchRequest, PatchResponse,
    ProductResponse, SnowConditionsRequest, TestDetailsResponse, TrackConditionsRequest,
};
