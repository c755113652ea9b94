//! Plain data contract between the persistence layer and layout engines.
//!
//! # Responsibility
//! - Define the person snapshot consumed by layout engines.
//! - Define canvas geometry shared by engines, services and consumers.
//!
//! # Invariants
//! - Model values are immutable snapshots for the duration of one layout call.
//! - Nothing in this module performs I/O.
//!
//! # See also
//! - docs/architecture/layout.md

pub mod entity;
pub mod geometry;
