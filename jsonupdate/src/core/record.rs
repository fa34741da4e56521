//! Field tables for records addressable by tag name.
//!
//! A record type declares, once, the ordered list of its fields with their
//! tags in each namespace, plus a mutable accessor per field. The lookup and
//! path engine only ever see records through `&mut dyn Record`.

use crate::core::convert::Slot;

/// One external name a field carries within a tag namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    /// Namespace the tag belongs to (e.g. `json`).
    pub namespace: &'static str,
    /// Logical field name within that namespace.
    pub name: &'static str,
}

/// Static description of one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldTags {
    /// In-memory field name.
    pub name: &'static str,
    pub tags: &'static [Tag],
}

impl FieldTags {
    /// Tag carried in `namespace`, if any.
    pub fn tag(&self, namespace: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|tag| tag.namespace == namespace)
            .map(|tag| tag.name)
    }
}

/// Live, mutable handle to one field of a record.
pub enum FieldMut<'a> {
    /// Assignable leaf value.
    Leaf(&'a mut dyn Slot),
    /// Nested record held inline or boxed.
    Record(&'a mut dyn Record),
    /// Optional nested record, present or not.
    Optional(&'a mut dyn OptionalRecord),
    /// Field is visible to lookups but never settable.
    ReadOnly,
    /// Index is outside the record's field table.
    Missing,
}

impl FieldMut<'_> {
    /// Short description of the handle kind.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldMut::Leaf(_) => "leaf",
            FieldMut::Record(_) => "record",
            FieldMut::Optional(_) => "optional record",
            FieldMut::ReadOnly => "read-only",
            FieldMut::Missing => "missing",
        }
    }
}

/// A structured value whose fields are addressed by tag name.
pub trait Record {
    fn type_name(&self) -> &'static str;

    /// Fields in declaration order. Lookups scan them in this order.
    fn fields(&self) -> &'static [FieldTags];

    /// Mutable handle to the field at `index` in [`Record::fields`].
    fn field_mut(&mut self, index: usize) -> FieldMut<'_>;

    /// Put every field back to its zero value.
    fn reset(&mut self);
}

impl<R: Record + ?Sized> Record for Box<R> {
    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn fields(&self) -> &'static [FieldTags] {
        (**self).fields()
    }

    fn field_mut(&mut self, index: usize) -> FieldMut<'_> {
        (**self).field_mut(index)
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

/// A nested record slot that may be empty.
pub trait OptionalRecord {
    fn record_mut(&mut self) -> Option<&mut dyn Record>;

    /// Reset to the absent state.
    fn clear(&mut self);
}

impl<R: Record> OptionalRecord for Option<R> {
    fn record_mut(&mut self) -> Option<&mut dyn Record> {
        self.as_mut().map(|record| record as &mut dyn Record)
    }

    fn clear(&mut self) {
        *self = None;
    }
}

/// Implement [`Record`] from a compact field list.
///
/// Each field names its kind and its tags:
///
/// - `leaf`: any [`FromValue`](crate::core::convert::FromValue) type;
/// - `record`: a nested `Record`, inline or boxed;
/// - `optional`: `Option<R>` of a nested `Record`;
/// - `readonly`: never settable through an update.
///
/// The type must implement `Default`; [`Record::reset`] restores it.
///
/// ```
/// use jsonupdate::impl_record;
///
/// #[derive(Debug, Default)]
/// struct Profile {
///     name: String,
///     age: i32,
/// }
///
/// impl_record!(Profile {
///     name: leaf [json = "name", yaml = "name"],
///     age: leaf [json = "age"],
/// });
/// ```
#[macro_export]
macro_rules! impl_record {
    ($ty:ident {
        $( $field:ident : $kind:ident [ $( $ns:ident = $tag:literal ),* $(,)? ] ),* $(,)?
    }) => {
        impl $crate::core::record::Record for $ty {
            fn type_name(&self) -> &'static str {
                stringify!($ty)
            }

            fn fields(&self) -> &'static [$crate::core::record::FieldTags] {
                const FIELDS: &[$crate::core::record::FieldTags] = &[
                    $(
                        $crate::core::record::FieldTags {
                            name: stringify!($field),
                            tags: &[
                                $(
                                    $crate::core::record::Tag {
                                        namespace: stringify!($ns),
                                        name: $tag,
                                    },
                                )*
                            ],
                        },
                    )*
                ];
                FIELDS
            }

            fn field_mut(&mut self, index: usize) -> $crate::core::record::FieldMut<'_> {
                let mut position = 0usize;
                $(
                    if index == position {
                        return $crate::__record_field!($kind, self.$field);
                    }
                    position += 1;
                )*
                let _ = position;
                $crate::core::record::FieldMut::Missing
            }

            fn reset(&mut self) {
                *self = <Self as ::std::default::Default>::default();
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_field {
    (leaf, $place:expr) => {
        $crate::core::record::FieldMut::Leaf(&mut $place)
    };
    (record, $place:expr) => {
        $crate::core::record::FieldMut::Record(&mut $place)
    };
    (optional, $place:expr) => {
        $crate::core::record::FieldMut::Optional(&mut $place)
    };
    (readonly, $place:expr) => {{
        let _ = &$place;
        $crate::core::record::FieldMut::ReadOnly
    }};
}
