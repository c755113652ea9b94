//! Layout core for People Memo.
//! This crate owns node placement for the Galaxy and Neural Network views and
//! the rules shared by every surface that renders them.

pub mod layout;
pub mod logging;
pub mod model;
pub mod service;

pub use layout::category::{color_for_category, resolve_categories, TagColor};
pub use layout::config::{
    ForceConfig, LayoutConfig, LayoutConfigError, RadialConfig, DEFAULT_HIT_RADIUS,
    DEFAULT_MAX_NODES,
};
pub use layout::result::{LayoutResult, PlacedNode};
pub use layout::{ForceLayoutEngine, LayoutEngine, LayoutKind, RadialLayoutEngine};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::entity::{orbit_progress_for_days, LayoutEntity, PersonId, RECENCY_WINDOW_DAYS};
pub use model::geometry::{CanvasSize, Point, Viewport};
pub use service::hit_test::hit_test;
pub use service::links::{galaxy_connections, network_links, Link, LinkKind};
pub use service::roster::{distinct_tags, filter_by_tag};
pub use service::session::{Adoption, AdoptedLayout, LayoutSession, LayoutTicket};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
