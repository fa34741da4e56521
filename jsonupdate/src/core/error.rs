//! Error taxonomy for update validation, path resolution and assignment.

use thiserror::Error;

/// Errors surfaced while validating or applying an update.
///
/// Variants are distinct and never wrap one another, so callers can match on
/// the kind after the error has travelled up the path recursion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    #[error("path not found: {path}")]
    PathNotFound { path: String },

    #[error("part of the update path is not compatible: {path:?}")]
    InvalidPath { path: String },

    #[error("destination field '{field}' is a non compatible type ({type_name})")]
    InvalidType {
        field: String,
        type_name: &'static str,
    },

    #[error("unknown update action '{action}'")]
    UnknownAction { action: String },

    #[error("invalid update config: {reason}")]
    InvalidUpdate { reason: String },

    #[error("item '{segment}' is not a mutable record")]
    ItemNotPointer { segment: String },

    #[error("item field '{field}' cannot be set")]
    ItemFieldCannotBeSet { field: String },

    #[error("incompatible types: expected {expected}, found {found}")]
    IncompatibleTypes {
        expected: &'static str,
        found: &'static str,
    },

    #[error("field '{field}' is not present")]
    FieldNotPresent { field: String },
}

impl UpdateError {
    pub fn invalid_update(reason: impl Into<String>) -> Self {
        Self::InvalidUpdate {
            reason: reason.into(),
        }
    }

    pub fn incompatible(expected: &'static str, found: &'static str) -> Self {
        Self::IncompatibleTypes { expected, found }
    }

    pub fn field_not_present(field: impl Into<String>) -> Self {
        Self::FieldNotPresent {
            field: field.into(),
        }
    }

    /// True for the collaborator's "no field with this tag" condition and for
    /// its path-level counterpart.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::FieldNotPresent { .. } | Self::PathNotFound { .. }
        )
    }

    /// Map a field-not-present failure into a path-level `PathNotFound` for
    /// `path`. Every other error is returned unchanged.
    pub fn into_path_not_found(self, path: &str) -> Self {
        match self {
            Self::FieldNotPresent { .. } => Self::PathNotFound {
                path: path.to_string(),
            },
            other => other,
        }
    }
}

/// Failure of one update inside an ordered batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("update {index} ('{field}') failed: {source}")]
pub struct BatchError {
    /// Position of the failing update in the batch.
    pub index: usize,
    /// Trimmed field path of the failing update.
    pub field: String,
    #[source]
    pub source: UpdateError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_path_not_found_only_maps_missing_fields() {
        let mapped = UpdateError::field_not_present("name").into_path_not_found("profile.name");
        assert_eq!(
            mapped,
            UpdateError::PathNotFound {
                path: "profile.name".to_string()
            }
        );

        let kept = UpdateError::incompatible("i32", "String").into_path_not_found("age");
        assert!(matches!(kept, UpdateError::IncompatibleTypes { .. }));
    }

    #[test]
    fn batch_error_exposes_original_source() {
        let err = BatchError {
            index: 2,
            field: "age".to_string(),
            source: UpdateError::incompatible("i32", "String"),
        };
        let source = std::error::Error::source(&err).expect("source");
        assert_eq!(
            source.to_string(),
            "incompatible types: expected i32, found String"
        );
        assert!(err.to_string().starts_with("update 2 ('age') failed"));
    }
}
