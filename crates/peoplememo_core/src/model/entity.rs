//! Layout-facing person projection.
//!
//! # Responsibility
//! - Define the read-only snapshot of a person consumed by layout engines.
//! - Own recency normalization (`orbit_progress`) and display helpers.
//!
//! # Invariants
//! - `id` is stable and unique within one layout request.
//! - Only the first tag (the primary category) participates in placement.
//! - Engines read progress through `normalized_progress()`, which is always
//!   finite and inside `[0, 1]`.
//!
//! # See also
//! - docs/architecture/layout.md

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a person shown on a layout canvas.
pub type PersonId = Uuid;

/// Days after which a person is considered fully overdue.
pub const RECENCY_WINDOW_DAYS: f64 = 180.0;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Immutable per-request snapshot of one person for layout purposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEntity {
    /// Stable person ID mirrored into the placed node.
    pub id: PersonId,
    /// Display label source.
    pub name: String,
    /// Ordered tags; the first one is the primary category.
    #[serde(default)]
    pub tags: Vec<String>,
    /// 0.0 = met very recently, 1.0 = never met or long overdue.
    #[serde(default = "default_orbit_progress")]
    pub orbit_progress: f64,
    /// Passthrough avatar reference for the renderer.
    #[serde(default)]
    pub icon_ref: Option<String>,
    /// Passthrough recency for secondary UI (satellite indicator).
    #[serde(default)]
    pub days_since_last_meeting: Option<u32>,
}

fn default_orbit_progress() -> f64 {
    1.0
}

impl LayoutEntity {
    /// Creates an entity with a generated ID and no recorded meeting.
    pub fn new(name: impl Into<String>, tags: Vec<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name, tags)
    }

    /// Creates an entity with a caller-provided stable ID.
    ///
    /// Used when the identity already exists in the persistence layer.
    pub fn with_id(id: PersonId, name: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tags,
            orbit_progress: default_orbit_progress(),
            icon_ref: None,
            days_since_last_meeting: None,
        }
    }

    /// Sets orbit progress directly (clamped into `[0, 1]`).
    pub fn with_orbit_progress(mut self, progress: f64) -> Self {
        self.orbit_progress = normalize_progress(progress);
        self
    }

    /// Sets days since the last past meeting and derives orbit progress.
    pub fn with_last_meeting_days(mut self, days: Option<u32>) -> Self {
        self.days_since_last_meeting = days;
        self.orbit_progress = orbit_progress_for_days(days);
        self
    }

    pub fn with_icon_ref(mut self, icon_ref: impl Into<String>) -> Self {
        self.icon_ref = Some(icon_ref.into());
        self
    }

    /// Returns the primary category, if the first tag is non-blank.
    pub fn primary_tag(&self) -> Option<&str> {
        self.tags
            .first()
            .map(|tag| tag.as_str())
            .filter(|tag| !tag.trim().is_empty())
    }

    /// Orbit progress as seen by engines: finite and inside `[0, 1]`.
    pub fn normalized_progress(&self) -> f64 {
        normalize_progress(self.orbit_progress)
    }

    /// Visual glow: recent contacts shine brighter.
    pub fn glow_intensity(&self) -> f64 {
        1.0 - self.normalized_progress()
    }

    /// Up to two initials taken from the first two words of the name.
    ///
    /// Returns `"?"` for blank names.
    pub fn initials(&self) -> String {
        let mut words = WHITESPACE_RE
            .split(self.name.trim())
            .filter(|word| !word.is_empty());
        let Some(first) = words.next() else {
            return "?".to_string();
        };
        let mut initials = String::new();
        initials.extend(first.chars().next());
        if let Some(second) = words.next() {
            initials.extend(second.chars().next());
        }
        initials
    }

    /// Whether this entity carries `tag` anywhere in its tag list.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }
}

/// Normalizes days since the last meeting into orbit progress.
///
/// `None` (no past meeting) maps to the outermost orbit.
pub fn orbit_progress_for_days(days: Option<u32>) -> f64 {
    match days {
        Some(days) => (f64::from(days) / RECENCY_WINDOW_DAYS).min(1.0),
        None => 1.0,
    }
}

fn normalize_progress(progress: f64) -> f64 {
    if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        1.0
    }
}
