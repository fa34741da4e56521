//! Deterministic, pure logic for resolving and applying updates.
//!
//! Core modules are free of I/O side effects. They operate on caller-owned
//! records and return `Result`s the caller is expected to surface.

pub mod convert;
pub mod error;
pub mod lookup;
pub mod path;
pub mod record;
pub mod update;
pub mod value;
