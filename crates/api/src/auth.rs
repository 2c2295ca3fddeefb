// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller identity and the authorization guard.

use serde_json::{Map, Value};
use snowflow_domain::{EntityKind, Product, TeamRole, Test};

use crate::error::{ApiError, AuthError, translate_domain_error};

/// A resolved caller: who they are, which team they act for, and their role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedMember {
    pub user_id: i64,
    pub team_id: i64,
    pub role: TeamRole,
}

impl AuthenticatedMember {
    #[must_use]
    pub const fn new(user_id: i64, team_id: i64, role: TeamRole) -> Self {
        Self {
            user_id,
            team_id,
            role,
        }
    }

    /// Builds a member from identity claims carrying a stored role code.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationFailed` if the role code is unknown.
    pub fn from_claims(user_id: i64, team_id: i64, role_code: i32) -> Result<Self, ApiError> {
        let role: TeamRole = TeamRole::from_code(role_code).map_err(translate_domain_error)?;
        Ok(Self::new(user_id, team_id, role))
    }

    const fn is_researcher(&self) -> bool {
        matches!(self.role, TeamRole::Researcher)
    }
}

/// The parts of a stored entity the guard looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardSubject {
    pub entity: EntityKind,
    pub is_public: bool,
    pub owning_team: i64,
}

impl From<&Test> for GuardSubject {
    fn from(test: &Test) -> Self {
        Self {
            entity: EntityKind::Test,
            is_public: test.is_public,
            owning_team: test.testing_team,
        }
    }
}

impl From<&Product> for GuardSubject {
    fn from(product: &Product) -> Self {
        Self {
            entity: EntityKind::Product,
            is_public: product.is_public,
            owning_team: product.testing_team,
        }
    }
}

/// Reads the visibility a patch asks for, if it names `is_public` with a
/// boolean. Any other value is left to value validation.
#[must_use]
pub fn requested_visibility(updates: &Map<String, Value>) -> Option<bool> {
    updates.get("is_public").and_then(Value::as_bool)
}

/// Authorization service for tests and products.
///
/// Rules are checked in a fixed order and the first violation wins.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks whether `member` may patch `subject`.
    ///
    /// The rules, in order:
    /// 1. a public entity cannot be made private
    /// 2. a researcher cannot patch a public entity
    /// 3. a researcher cannot make an entity public
    /// 4. only the owning team may patch
    ///
    /// # Errors
    ///
    /// Returns the `AuthError` for the first rule that fails.
    pub fn authorize_patch(
        member: &AuthenticatedMember,
        subject: &GuardSubject,
        requested_public: Option<bool>,
    ) -> Result<(), AuthError> {
        let entity: EntityKind = subject.entity;
        if subject.is_public && requested_public == Some(false) {
            return Err(AuthError::PublicToPrivate { entity });
        }
        if member.is_researcher() && subject.is_public {
            return Err(AuthError::ResearcherOnPublic { entity });
        }
        if member.is_researcher() && requested_public == Some(true) {
            return Err(AuthError::ResearcherPublishing { entity });
        }
        if member.team_id != subject.owning_team {
            return Err(AuthError::TeamMismatch { entity });
        }
        Ok(())
    }

    /// Checks whether `member` may create an entity with the given
    /// visibility. New entities always belong to the member's team.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ResearcherPublishing` if a researcher asks for a
    /// public entity.
    pub fn authorize_create(
        member: &AuthenticatedMember,
        entity: EntityKind,
        is_public: bool,
    ) -> Result<(), AuthError> {
        if member.is_researcher() && is_public {
            return Err(AuthError::ResearcherPublishing { entity });
        }
        Ok(())
    }

    /// Checks whether `member` may add a ranking to `test`.
    ///
    /// Adding a ranking changes the test, so the patch rules apply without a
    /// visibility change.
    ///
    /// # Errors
    ///
    /// Returns the `AuthError` for the first rule that fails.
    pub fn authorize_rank(member: &AuthenticatedMember, test: &Test) -> Result<(), AuthError> {
        Self::authorize_patch(member, &GuardSubject::from(test), None)
    }
}
