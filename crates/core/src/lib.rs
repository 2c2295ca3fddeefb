// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Patch planning for snowflow.
//!
//! Everything in this crate is pure: it takes the stored entity and the
//! caller's command and produces a plan, or rejects the command. Writing a
//! plan is left to the persistence crate.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod apply;
mod arbiter;
mod command;
mod error;
mod plan;
mod reconcile;

#[cfg(test)]
mod tests;

pub use apply::{plan_product_patch, plan_test_patch};
pub use arbiter::arbitrate;
pub use command::{ProductPatchCommand, TestPatchCommand};
pub use error::CoreError;
pub use plan::{ProductPatchPlan, RankingTarget, ReconciliationRequest, SubUpdate, TestPatchPlan};
pub use reconcile::{Collisions, ReconciliationOutcome, VisibilityTransition, reconcile};
