//! Connection geometry derived from a finished layout.
//!
//! # Responsibility
//! - Compute the line segments both views draw between nodes and anchors.
//! - Keep link selection rules out of the renderer.
//!
//! # Invariants
//! - Links are derived purely from `LayoutResult`; nothing is recomputed.
//! - Output order is deterministic for a given result.

use crate::layout::result::{LayoutResult, PlacedNode};
use crate::model::geometry::{CanvasSize, Point};
use serde::{Deserialize, Serialize};

const CONNECTION_STRENGTH: f64 = 0.2;
const SPOKE_STRENGTH: f64 = 0.2;
const HUB_STRENGTH: f64 = 0.15;
/// (max distance, strength) bands for chain links, nearest first.
const CHAIN_BANDS: [(f64, f64); 2] = [(80.0, 0.2), (120.0, 0.15)];

/// Role of a link in the drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// Galaxy: two nodes sharing a category.
    Connection,
    /// Network: cluster anchor to member node.
    Spoke,
    /// Network: consecutive members of one category.
    Chain,
    /// Network: canvas center to cluster anchor.
    Hub,
}

/// One segment to draw; `strength` is the suggested opacity in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub kind: LinkKind,
    pub from: Point,
    pub to: Point,
    pub strength: f64,
}

/// Every unordered pair of nodes sharing a category.
pub fn galaxy_connections(result: &LayoutResult) -> Vec<Link> {
    let mut links = Vec::new();
    for (index, first) in result.nodes.iter().enumerate() {
        for second in &result.nodes[index + 1..] {
            if first.category == second.category {
                links.push(Link {
                    kind: LinkKind::Connection,
                    from: first.position,
                    to: second.position,
                    strength: CONNECTION_STRENGTH,
                });
            }
        }
    }
    links
}

/// Spokes, chain links and hub links for the Network view.
///
/// Chain links longer than the last band are omitted.
pub fn network_links(result: &LayoutResult, canvas: CanvasSize) -> Vec<Link> {
    let mut links = Vec::new();
    for category in &result.categories {
        let members: Vec<&PlacedNode> = result.nodes_in(category).collect();
        let anchor = result.cluster_anchors.get(category).copied();

        for (index, node) in members.iter().enumerate() {
            if let Some(anchor) = anchor {
                links.push(Link {
                    kind: LinkKind::Spoke,
                    from: anchor,
                    to: node.position,
                    strength: SPOKE_STRENGTH,
                });
            }
            if let Some(next) = members.get(index + 1) {
                let distance = node.position.distance_to(next.position);
                if let Some(strength) = chain_strength(distance) {
                    links.push(Link {
                        kind: LinkKind::Chain,
                        from: node.position,
                        to: next.position,
                        strength,
                    });
                }
            }
        }
    }

    let center = canvas.center();
    for anchor in result.cluster_anchors.values() {
        links.push(Link {
            kind: LinkKind::Hub,
            from: center,
            to: *anchor,
            strength: HUB_STRENGTH,
        });
    }
    links
}

fn chain_strength(distance: f64) -> Option<f64> {
    CHAIN_BANDS
        .iter()
        .find(|(max_distance, _)| distance < *max_distance)
        .map(|(_, strength)| *strength)
}
