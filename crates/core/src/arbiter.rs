// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use snowflow_domain::{EntityKind, Version};

/// Accepts an update only if nothing was written since the caller's read.
///
/// Both versions are already truncated to store precision by `Version`,
/// so a token that lost sub-microsecond digits in transit still matches.
///
/// # Errors
///
/// Returns `CoreError::VersionConflict` if `stored` is strictly after
/// `believed`.
pub fn arbitrate(entity: EntityKind, stored: Version, believed: Version) -> Result<(), CoreError> {
    if stored.is_after(believed) {
        return Err(CoreError::VersionConflict {
            entity,
            stored,
            believed,
        });
    }
    Ok(())
}
