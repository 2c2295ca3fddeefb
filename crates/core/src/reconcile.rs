// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Product reconciliation.
//!
//! A product's natural key is unique per team among private products and
//! unique globally among public products. When a private product is
//! published and a public product with the same key already exists, the
//! private product is merged into the public one rather than duplicated.
//!
//! The decision is a function of two inputs: how the update moves the
//! product's visibility, and which other products share its key.
//!
//! | transition      | public match | team match | outcome   |
//! |-----------------|--------------|------------|-----------|
//! | `BecomesPublic` | yes          | any        | merge     |
//! | `BecomesPublic` | no           | yes        | reject    |
//! | `StaysPrivate`  | any          | yes        | reject    |
//! | `StaysPublic`   | yes          | any        | reject    |
//! | otherwise       |              |            | update    |

/// How an update moves a product's visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisibilityTransition {
    StaysPrivate,
    BecomesPublic,
    StaysPublic,
}

impl VisibilityTransition {
    /// Classifies a visibility change.
    ///
    /// Returns `None` for public to private, which no update may perform.
    #[must_use]
    pub const fn between(was_public: bool, will_be_public: bool) -> Option<Self> {
        match (was_public, will_be_public) {
            (false, false) => Some(Self::StaysPrivate),
            (false, true) => Some(Self::BecomesPublic),
            (true, true) => Some(Self::StaysPublic),
            (true, false) => None,
        }
    }
}

/// Other products sharing the natural key of the product being updated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Collisions {
    /// A public product with the same key.
    pub public_match: Option<i64>,
    /// A private product of the same team with the same key.
    pub team_match: Option<i64>,
}

/// What to do with a product update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconciliationOutcome {
    /// Write the fields to the existing row.
    InPlaceUpdate,
    /// Re-point the product's rankings to `canonical_id` and retire it.
    Merge { canonical_id: i64 },
    /// The key is taken by `existing_id` and no merge applies.
    Reject { existing_id: i64 },
}

/// Decides how a product update is reconciled against colliding products.
#[must_use]
pub const fn reconcile(
    transition: VisibilityTransition,
    collisions: Collisions,
) -> ReconciliationOutcome {
    use ReconciliationOutcome::{InPlaceUpdate, Merge, Reject};
    use VisibilityTransition::{BecomesPublic, StaysPrivate, StaysPublic};

    match (transition, collisions.public_match, collisions.team_match) {
        // Publishing a duplicate of a public product: the public one wins.
        (BecomesPublic, Some(canonical_id), _) => Merge { canonical_id },
        // Publishing would leave a private twin behind in the team.
        (BecomesPublic | StaysPrivate, _, Some(existing_id))
        | (StaysPublic, Some(existing_id), _) => Reject { existing_id },
        // A private product may shadow a public one until it is published.
        (StaysPrivate, _, None) | (BecomesPublic, None, None) | (StaysPublic, None, _) => {
            InPlaceUpdate
        }
    }
}
