// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use snowflow_domain::{DomainError, EntityKind, Version};

/// Errors that can occur while planning a patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The stored version is newer than the one the caller observed.
    VersionConflict {
        entity: EntityKind,
        stored: Version,
        believed: Version,
    },
    /// Ranking fields were sent without a product to address.
    MissingRankingTarget { test_id: i64 },
    /// The addressed product has no ranking in the test.
    RankingNotFound { test_id: i64, product_id: i64 },
    /// The update would make a public entity private again.
    PublicToPrivate { entity: EntityKind },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::VersionConflict { entity, .. } => write!(
                f,
                "Detected a conflict for the current {entity}, please refresh."
            ),
            Self::MissingRankingTarget { .. } => write!(
                f,
                "Invalid request URL, use '/tests/{{test_id}}/products/{{product_id}}' to update test ranks."
            ),
            Self::RankingNotFound {
                test_id,
                product_id,
            } => write!(f, "Product {product_id} is not ranked in test {test_id}"),
            Self::PublicToPrivate { entity } => {
                write!(f, "{entity} is public and cannot be made private")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
