//! Internal support utilities for the derive.
//!
//! Attribute parsing and diagnostics shared by the expansion code.

pub mod attrs;
pub mod diag;
