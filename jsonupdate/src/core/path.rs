//! Dotted-path resolution and terminal assignment.
//!
//! A path such as `profile.address.city` is consumed one segment per call:
//! intermediate segments descend into nested records, the last segment is
//! assigned. Descent is pure navigation, so the terminal write is the only
//! observable change and a failed call leaves the record as it was.

use tracing::trace;

use crate::core::error::UpdateError;
use crate::core::lookup::TagLookup;
use crate::core::record::{FieldMut, Record};
use crate::core::value::Value;

/// Assign `value` to the field addressed by `path`, using the default tag
/// namespaces.
pub fn set_field(
    record: &mut dyn Record,
    path: &str,
    value: impl Into<Value>,
) -> Result<(), UpdateError> {
    set_field_with(&TagLookup::default(), record, path, value.into())
}

/// Assign `value` to the field addressed by `path`, resolving segments with
/// `lookup`.
///
/// Splits on the first `.` at each level, so only the terminal segment may
/// carry anything after it verbatim.
pub fn set_field_with(
    lookup: &TagLookup,
    record: &mut dyn Record,
    path: &str,
    value: Value,
) -> Result<(), UpdateError> {
    match path.split_once('.') {
        Some((head, rest)) => {
            ensure_segment(head, path)?;
            trace!(segment = head, record = record.type_name(), "descending");
            let nested = nested_record(lookup.lookup(record, head)?, head)?;
            set_field_with(lookup, nested, rest, value)
        }
        None => {
            ensure_segment(path, path)?;
            assign(lookup, record, path, value)
        }
    }
}

fn ensure_segment(segment: &str, path: &str) -> Result<(), UpdateError> {
    if segment.is_empty() {
        return Err(UpdateError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(())
}

/// Turn an intermediate field into the record to continue resolving against.
fn nested_record<'a>(
    field: FieldMut<'a>,
    segment: &str,
) -> Result<&'a mut dyn Record, UpdateError> {
    let nested = match field {
        FieldMut::Record(record) => Some(record),
        FieldMut::Optional(slot) => slot.record_mut(),
        FieldMut::Leaf(_) | FieldMut::ReadOnly | FieldMut::Missing => None,
    };
    nested.ok_or_else(|| UpdateError::ItemNotPointer {
        segment: segment.to_string(),
    })
}

fn assign(
    lookup: &TagLookup,
    record: &mut dyn Record,
    name: &str,
    value: Value,
) -> Result<(), UpdateError> {
    let owner = record.type_name();
    match lookup.lookup(record, name)? {
        FieldMut::Leaf(slot) => {
            trace!(field = name, record = owner, ty = slot.target_type(), "assigning");
            slot.assign(value)
        }
        FieldMut::Optional(slot) if value.is_null() => {
            trace!(field = name, record = owner, "clearing nested record");
            slot.clear();
            Ok(())
        }
        FieldMut::Record(nested) if value.is_null() => {
            trace!(field = name, record = owner, "resetting nested record");
            nested.reset();
            Ok(())
        }
        FieldMut::Optional(_) | FieldMut::Record(_) => Err(UpdateError::InvalidType {
            field: name.to_string(),
            type_name: "record",
        }),
        FieldMut::ReadOnly => Err(UpdateError::ItemFieldCannotBeSet {
            field: name.to_string(),
        }),
        FieldMut::Missing => Err(UpdateError::field_not_present(name)),
    }
}
