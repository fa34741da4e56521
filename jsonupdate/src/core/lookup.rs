//! Tag-based field lookup.
//!
//! Resolves a single path segment against a record's field table. Fields are
//! scanned in declaration order and, for each field, namespaces in priority
//! order; the first exact tag match wins.

use crate::core::error::UpdateError;
use crate::core::record::{FieldMut, Record};

/// Namespaces recognized when no configuration is supplied, highest priority
/// first.
pub const DEFAULT_NAMESPACES: &[&str] = &["json", "yaml", "toml"];

/// Ordered set of recognized tag namespaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLookup {
    namespaces: Vec<String>,
}

impl Default for TagLookup {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACES.iter().copied())
    }
}

impl TagLookup {
    pub fn new<I, S>(namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            namespaces: namespaces.into_iter().map(Into::into).collect(),
        }
    }

    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    /// Index of the field tagged `name`, if any.
    pub fn find(&self, record: &dyn Record, name: &str) -> Option<usize> {
        record.fields().iter().position(|field| {
            self.namespaces
                .iter()
                .any(|namespace| field.tag(namespace) == Some(name))
        })
    }

    /// Live handle to the field tagged `name`.
    ///
    /// Fails with [`UpdateError::FieldNotPresent`] when no field carries that
    /// tag in any recognized namespace.
    pub fn lookup<'a>(
        &self,
        record: &'a mut dyn Record,
        name: &str,
    ) -> Result<FieldMut<'a>, UpdateError> {
        let index = self
            .find(record, name)
            .ok_or_else(|| UpdateError::field_not_present(name))?;
        match record.field_mut(index) {
            FieldMut::Missing => Err(UpdateError::field_not_present(name)),
            field => Ok(field),
        }
    }
}
