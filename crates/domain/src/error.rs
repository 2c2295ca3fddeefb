// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A field name is not part of any field table.
    InvalidField(String),
    /// The update contained no fields.
    NoFieldsToUpdate,
    /// A field value failed validation.
    InvalidFieldValue {
        /// The caller-facing field name.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// A categorical code is not one of the allowed values.
    InvalidCode {
        /// The kind of code (e.g. `snow_type`).
        kind: &'static str,
        /// The rejected value.
        value: String,
    },
    /// A product's low temperature is not below its high temperature.
    InvalidTemperatureRange {
        /// The resulting low temperature.
        low: String,
        /// The resulting high temperature.
        high: String,
    },
    /// A version token could not be parsed or formatted.
    InvalidVersion {
        /// The offending value.
        value: String,
        /// The underlying error message.
        error: String,
    },
    /// A team role code is unknown.
    InvalidTeamRole(i32),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidField(name) => write!(f, "invalid field: {name}"),
            Self::NoFieldsToUpdate => write!(f, "no fields to update"),
            Self::InvalidFieldValue { field, reason } => {
                write!(f, "invalid value for {field}: {reason}")
            }
            Self::InvalidCode { kind, value } => write!(f, "invalid {kind}: '{value}'"),
            Self::InvalidTemperatureRange { low, high } => write!(
                f,
                "low_temperature ({low}) must be below high_temperature ({high})"
            ),
            Self::InvalidVersion { value, error } => {
                write!(f, "invalid version '{value}': {error}")
            }
            Self::InvalidTeamRole(code) => write!(f, "invalid team role: {code}"),
        }
    }
}

impl std::error::Error for DomainError {}
