//! Spatial layout engines for the Galaxy and Neural Network views.
//!
//! # Responsibility
//! - Turn a person snapshot list plus a canvas size into renderable nodes.
//! - Offer both strategies behind one `LayoutEngine` contract so the caller
//!   picks the strategy, not a runtime type check.
//!
//! # Invariants
//! - Engines hold no cross-call state; every call is a pure function of its
//!   input, apart from the configured random source.
//! - At most `LayoutConfig::max_nodes` entities are processed, taken from the
//!   head of the input.
//! - Entities without a primary tag, and repeated ids, are dropped silently.
//!
//! # See also
//! - docs/architecture/layout.md

pub mod category;
pub mod config;
pub mod force;
pub mod radial;
pub mod result;
mod spatial_grid;

use crate::model::entity::{LayoutEntity, PersonId};
use crate::model::geometry::{CanvasSize, Point};
use category::{color_for_category, resolve_categories};
use config::{LayoutConfig, LayoutConfigError};
use log::warn;
use result::PlacedNode;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub use force::ForceLayoutEngine;
pub use radial::RadialLayoutEngine;
pub use result::LayoutResult;

/// Which visualization a layout is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// Radial sectors with recency orbits.
    Galaxy,
    /// Force-directed clusters around per-category anchors.
    Network,
}

impl LayoutKind {
    /// Stable string id used across FFI and CLI.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Galaxy => "galaxy",
            Self::Network => "network",
        }
    }

    /// Parses a view name; accepts the engine names as aliases.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "galaxy" | "radial" => Some(Self::Galaxy),
            "network" | "neural_network" | "force" => Some(Self::Network),
            _ => None,
        }
    }

    /// Builds the engine for this view from a validated config.
    pub fn engine(self, config: LayoutConfig) -> Result<Box<dyn LayoutEngine>, LayoutConfigError> {
        Ok(match self {
            Self::Galaxy => Box::new(RadialLayoutEngine::new(config)?),
            Self::Network => Box::new(ForceLayoutEngine::new(config)?),
        })
    }
}

/// Shared input/output contract of both layout strategies.
pub trait LayoutEngine: Send + Sync {
    fn kind(&self) -> LayoutKind;

    /// Places `entities` on `canvas`.
    ///
    /// Never fails: degenerate input (no categories, non-drawable canvas)
    /// yields an empty result.
    fn compute(&self, entities: &[LayoutEntity], canvas: CanvasSize) -> LayoutResult;
}

/// Capped, filtered view over one request's entities.
pub(crate) struct PreparedInput<'a> {
    /// Entities with a primary tag and a first-seen id, in input order.
    pub entities: Vec<&'a LayoutEntity>,
    /// Sorted distinct primary tags of `entities`.
    pub categories: Vec<String>,
}

impl<'a> PreparedInput<'a> {
    pub fn new(kind: LayoutKind, entities: &'a [LayoutEntity], max_nodes: usize) -> Self {
        if entities.len() > max_nodes {
            warn!(
                "event=entity_cap_applied module=layout status=truncated kind={} supplied={} cap={}",
                kind.as_str(),
                entities.len(),
                max_nodes
            );
        }

        let mut seen: HashSet<PersonId> = HashSet::new();
        let mut kept = Vec::with_capacity(entities.len().min(max_nodes));
        for entity in entities.iter().take(max_nodes) {
            if entity.primary_tag().is_none() {
                continue;
            }
            if !seen.insert(entity.id) {
                warn!(
                    "event=duplicate_entity module=layout status=dropped kind={} id={}",
                    kind.as_str(),
                    entity.id
                );
                continue;
            }
            kept.push(entity);
        }

        let categories = resolve_categories(kept.iter().copied());
        Self {
            entities: kept,
            categories,
        }
    }

    pub fn category_index(&self, category: &str) -> Option<usize> {
        self.categories
            .binary_search_by(|candidate| candidate.as_str().cmp(category))
            .ok()
    }
}

/// Builds the output record for `entity` at `position`.
pub(crate) fn place_node(
    entity: &LayoutEntity,
    category: &str,
    position: Point,
    config: &LayoutConfig,
) -> PlacedNode {
    let progress = entity.normalized_progress();
    PlacedNode {
        id: entity.id,
        name: entity.name.clone(),
        initials: entity.initials(),
        color: color_for_category(category),
        position,
        size: config.node_size(progress),
        glow_intensity: 1.0 - progress,
        category: category.to_string(),
        icon_ref: entity.icon_ref.clone(),
        days_since_last_meeting: entity.days_since_last_meeting,
    }
}
