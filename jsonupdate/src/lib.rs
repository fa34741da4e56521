//! Declarative, path-addressed updates for tagged in-memory records.
//!
//! An [`Update`] names a field by a dotted tag path (`profile.name`), an
//! action (`set` or `delete`) and a value. Applying it walks nested records
//! by tag name and assigns the value at the terminal field, converting it
//! losslessly into the field's type or failing with a precise
//! [`UpdateError`].
//!
//! - **[`core`]**: Pure logic (field tables, lookup, path engine, conversion).
//!   No I/O, fully testable in isolation.
//! - **[`io`]**: Loading the lookup configuration from disk.
//!
//! ```
//! use jsonupdate::{Update, impl_record};
//!
//! #[derive(Debug, Default)]
//! struct Profile {
//!     name: String,
//! }
//!
//! #[derive(Debug, Default)]
//! struct User {
//!     age: i32,
//!     profile: Profile,
//! }
//!
//! impl_record!(Profile { name: leaf [json = "name"] });
//! impl_record!(User {
//!     age: leaf [json = "age"],
//!     profile: record [json = "profile"],
//! });
//!
//! let mut user = User::default();
//! let mut update = Update::set("profile.name", "Ada");
//! update.validate()?;
//! update.apply(&mut user)?;
//! assert_eq!(user.profile.name, "Ada");
//! # Ok::<(), jsonupdate::UpdateError>(())
//! ```

pub mod core;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use crate::core::error::{BatchError, UpdateError};
pub use crate::core::lookup::TagLookup;
pub use crate::core::path::{set_field, set_field_with};
pub use crate::core::record::{FieldMut, Record};
pub use crate::core::update::{Action, Mutation, Operation, Update, apply_all, apply_all_with};
pub use crate::core::value::Value;
