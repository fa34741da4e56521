//! File-facing helpers around the pure core.

pub mod config;
