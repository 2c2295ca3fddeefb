// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Collisions, ReconciliationOutcome, VisibilityTransition, reconcile};

const NONE: Collisions = Collisions {
    public_match: None,
    team_match: None,
};

const PUBLIC: Collisions = Collisions {
    public_match: Some(100),
    team_match: None,
};

const TEAM: Collisions = Collisions {
    public_match: None,
    team_match: Some(200),
};

const BOTH: Collisions = Collisions {
    public_match: Some(100),
    team_match: Some(200),
};

#[test]
fn test_transition_classification() {
    assert_eq!(
        VisibilityTransition::between(false, false),
        Some(VisibilityTransition::StaysPrivate)
    );
    assert_eq!(
        VisibilityTransition::between(false, true),
        Some(VisibilityTransition::BecomesPublic)
    );
    assert_eq!(
        VisibilityTransition::between(true, true),
        Some(VisibilityTransition::StaysPublic)
    );
    assert_eq!(VisibilityTransition::between(true, false), None);
}

#[test]
fn test_no_collision_updates_in_place() {
    for transition in [
        VisibilityTransition::StaysPrivate,
        VisibilityTransition::BecomesPublic,
        VisibilityTransition::StaysPublic,
    ] {
        assert_eq!(
            reconcile(transition, NONE),
            ReconciliationOutcome::InPlaceUpdate
        );
    }
}

#[test]
fn test_publishing_onto_public_product_merges() {
    assert_eq!(
        reconcile(VisibilityTransition::BecomesPublic, PUBLIC),
        ReconciliationOutcome::Merge { canonical_id: 100 }
    );
}

#[test]
fn test_public_match_takes_precedence_over_team_match() {
    assert_eq!(
        reconcile(VisibilityTransition::BecomesPublic, BOTH),
        ReconciliationOutcome::Merge { canonical_id: 100 }
    );
}

#[test]
fn test_publishing_onto_team_private_product_is_rejected() {
    assert_eq!(
        reconcile(VisibilityTransition::BecomesPublic, TEAM),
        ReconciliationOutcome::Reject { existing_id: 200 }
    );
}

#[test]
fn test_private_duplicate_within_team_is_rejected() {
    assert_eq!(
        reconcile(VisibilityTransition::StaysPrivate, TEAM),
        ReconciliationOutcome::Reject { existing_id: 200 }
    );
}

#[test]
fn test_private_product_may_shadow_public_product() {
    assert_eq!(
        reconcile(VisibilityTransition::StaysPrivate, PUBLIC),
        ReconciliationOutcome::InPlaceUpdate
    );
}

#[test]
fn test_public_rename_onto_public_product_is_rejected() {
    assert_eq!(
        reconcile(VisibilityTransition::StaysPublic, PUBLIC),
        ReconciliationOutcome::Reject { existing_id: 100 }
    );
}

#[test]
fn test_public_product_ignores_private_twins() {
    assert_eq!(
        reconcile(VisibilityTransition::StaysPublic, TEAM),
        ReconciliationOutcome::InPlaceUpdate
    );
}
