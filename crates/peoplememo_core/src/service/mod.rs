//! Use-case services built on top of finished layouts.
//!
//! # Responsibility
//! - Answer interaction queries (hit-testing) and drawing queries (links).
//! - Prepare roster input (tag listing and filtering) before a layout call.
//! - Coordinate background layout work with one display state.
//!
//! # See also
//! - docs/architecture/layout.md

pub mod links;
pub mod roster;
pub mod session;
