// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde_json::{Map, Value};
use snowflow_domain::Version;

/// A sparse update addressed at a test, and optionally one of its rankings.
#[derive(Debug, Clone, PartialEq)]
pub struct TestPatchCommand {
    pub test_id: i64,
    /// The ranked product, required when ranking fields are present.
    pub product_id: Option<i64>,
    /// Caller-facing field names mapped to their new values.
    pub updates: Map<String, Value>,
    /// The version the caller last observed.
    pub believed_version: Version,
}

/// A sparse update addressed at a product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPatchCommand {
    pub product_id: i64,
    pub updates: Map<String, Value>,
    pub believed_version: Version,
}
