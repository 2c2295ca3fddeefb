// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use snowflow::CoreError;
use snowflow_domain::{DomainError, EntityKind};
use snowflow_persistence::PersistenceError;
use thiserror::Error;
use tracing::error;

/// Authorization failures raised by the guard.
///
/// Each variant corresponds to one guard rule; `rule` names it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The request would make a public entity private.
    #[error("{entity} is public and cannot be made private")]
    PublicToPrivate { entity: EntityKind },

    /// A researcher tried to change a public entity.
    #[error("researchers cannot update a public {entity}")]
    ResearcherOnPublic { entity: EntityKind },

    /// A researcher tried to make an entity public.
    #[error("researchers cannot make a {entity} public")]
    ResearcherPublishing { entity: EntityKind },

    /// The entity belongs to another team.
    #[error("user cannot update this {entity}")]
    TeamMismatch { entity: EntityKind },
}

impl AuthError {
    /// Returns the name of the rule that was violated.
    #[must_use]
    pub const fn rule(&self) -> &'static str {
        match self {
            Self::PublicToPrivate { .. } => "visibility_monotonic",
            Self::ResearcherOnPublic { .. } => "researcher_public_entity",
            Self::ResearcherPublishing { .. } => "researcher_publish",
            Self::TeamMismatch { .. } => "team_ownership",
        }
    }
}

/// API-level errors.
///
/// These are distinct from domain/core/persistence errors and represent the
/// API contract. Storage detail never appears in an `ApiError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The caller's identity could not be resolved.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// A guard rule rejected the request.
    Unauthorized {
        /// The rule that was violated.
        rule: String,
        /// A human-readable message.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of the problem.
        message: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable message.
        message: String,
    },
    /// The caller's view is stale, or a concurrent write won.
    Conflict {
        /// A message asking the caller to refresh.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource.
        resource_type: String,
        /// A description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// An opaque message.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { rule, message } => {
                write!(f, "Unauthorized ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::Conflict { message } => write!(f, "{message}"),
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::Unauthorized {
            rule: err.rule().to_string(),
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match &err {
        DomainError::InvalidField(name) => ApiError::InvalidInput {
            field: name.clone(),
            message: err.to_string(),
        },
        DomainError::NoFieldsToUpdate => ApiError::InvalidInput {
            field: String::from("updates"),
            message: err.to_string(),
        },
        DomainError::InvalidFieldValue { field, .. } => ApiError::InvalidInput {
            field: field.clone(),
            message: err.to_string(),
        },
        DomainError::InvalidCode { kind, .. } => ApiError::InvalidInput {
            field: (*kind).to_string(),
            message: err.to_string(),
        },
        DomainError::InvalidTemperatureRange { .. } => ApiError::DomainRuleViolation {
            rule: String::from("temperature_range"),
            message: err.to_string(),
        },
        DomainError::InvalidVersion { .. } => ApiError::InvalidInput {
            field: String::from("version"),
            message: err.to_string(),
        },
        DomainError::InvalidTeamRole(_) => ApiError::AuthenticationFailed {
            reason: err.to_string(),
        },
    }
}

/// Translates a core planning error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        conflict @ CoreError::VersionConflict { .. } => ApiError::Conflict {
            message: conflict.to_string(),
        },
        missing @ CoreError::MissingRankingTarget { .. } => ApiError::InvalidInput {
            field: String::from("product_id"),
            message: missing.to_string(),
        },
        unranked @ CoreError::RankingNotFound { .. } => ApiError::ResourceNotFound {
            resource_type: String::from("Ranking"),
            message: unranked.to_string(),
        },
        visibility @ CoreError::PublicToPrivate { .. } => ApiError::DomainRuleViolation {
            rule: String::from("visibility_monotonic"),
            message: visibility.to_string(),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Conflicts and duplicates are surfaced with their caller-facing messages.
/// Everything else is logged with the entity it concerned and reported as
/// an opaque internal error.
#[must_use]
pub fn translate_persistence_error(
    err: PersistenceError,
    entity: EntityKind,
    entity_id: i64,
) -> ApiError {
    match err {
        conflict @ PersistenceError::Conflict { .. } => ApiError::Conflict {
            message: conflict.to_string(),
        },
        duplicate @ PersistenceError::DuplicateProduct { .. } => ApiError::DomainRuleViolation {
            rule: String::from("unique_product"),
            message: duplicate.to_string(),
        },
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        other => {
            error!(%entity, entity_id, error = %other, "Storage failure");
            ApiError::Internal {
                message: String::from("the request could not be completed, please retry later"),
            }
        }
    }
}
