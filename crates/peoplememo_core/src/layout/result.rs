//! Renderable layout output.
//!
//! # Responsibility
//! - Carry placed nodes, the resolved category list and cluster anchors back
//!   to the presentation layer.
//!
//! # Invariants
//! - Node order follows input order; ids are unique.
//! - `categories` is sorted and contains exactly the primary tags of `nodes`.
//! - `cluster_anchors` is empty for radial layouts.

use super::category::TagColor;
use super::LayoutKind;
use crate::model::entity::PersonId;
use crate::model::geometry::{Point, Viewport};
use crate::service::hit_test::hit_test;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One person after layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedNode {
    pub id: PersonId,
    pub name: String,
    pub initials: String,
    pub color: TagColor,
    /// The only field that changes across recomputations of the same input.
    pub position: Point,
    pub size: f64,
    /// `1 - orbit_progress`.
    pub glow_intensity: f64,
    /// Primary category label.
    pub category: String,
    pub icon_ref: Option<String>,
    pub days_since_last_meeting: Option<u32>,
}

/// Complete output of one layout computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub kind: LayoutKind,
    pub nodes: Vec<PlacedNode>,
    pub categories: Vec<String>,
    pub cluster_anchors: BTreeMap<String, Point>,
}

impl LayoutResult {
    /// Result with no nodes, returned for degenerate input.
    pub fn empty(kind: LayoutKind) -> Self {
        Self {
            kind,
            nodes: Vec::new(),
            categories: Vec::new(),
            cluster_anchors: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: PersonId) -> Option<&PlacedNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Nodes whose primary category equals `category`, in layout order.
    pub fn nodes_in<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a PlacedNode> + 'a {
        self.nodes
            .iter()
            .filter(move |node| node.category == category)
    }

    /// Nearest node strictly within `threshold` of a canvas-space point.
    pub fn hit_test(&self, point: Point, threshold: f64) -> Option<&PlacedNode> {
        hit_test(&self.nodes, point, threshold)
    }

    /// Like [`LayoutResult::hit_test`], for a pointer in screen space.
    pub fn hit_test_viewport(
        &self,
        screen: Point,
        viewport: &Viewport,
        threshold: f64,
    ) -> Option<&PlacedNode> {
        self.hit_test(viewport.to_canvas(screen), threshold)
    }
}
