//! Neural Network layout: per-category anchors plus a short force simulation.
//!
//! # Responsibility
//! - Arrange one anchor per category on a ring around the canvas center.
//! - Seed members near their anchor (farther for less recently met people).
//! - Run a fixed number of repulsion/attraction steps, clamping every step.
//!
//! # Invariants
//! - Each step reads only the previous step's positions.
//! - Repulsion applies only to pairs with `0 < d < interaction_radius`.
//! - After `compute`, every position lies inside the clamp margin.
//! - Seeding is random unless `LayoutConfig::seed` is set.

use super::config::{ForceConfig, LayoutConfig, LayoutConfigError};
use super::result::LayoutResult;
use super::spatial_grid::SpatialGrid;
use super::{place_node, LayoutEngine, LayoutKind, PreparedInput};
use crate::model::entity::LayoutEntity;
use crate::model::geometry::{CanvasSize, Point};
use log::debug;
use rand::Rng;
use std::collections::BTreeMap;
use std::f64::consts::TAU;

/// Force-directed cluster layout engine.
#[derive(Debug, Clone, Default)]
pub struct ForceLayoutEngine {
    config: LayoutConfig,
}

impl ForceLayoutEngine {
    /// Creates an engine after validating `config`.
    pub fn new(config: LayoutConfig) -> Result<Self, LayoutConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Anchor point for each category, in category order.
    pub fn anchor_points(&self, categories: &[String], canvas: CanvasSize) -> Vec<Point> {
        let center = canvas.center();
        let radius = canvas.min_dimension() / self.config.force.anchor_radius_divisor;
        let count = categories.len().max(1) as f64;
        (0..categories.len())
            .map(|index| center.offset_polar(index as f64 / count * TAU, radius))
            .collect()
    }
}

fn repulsion(point: Point, other: Point, force: &ForceConfig) -> (f64, f64) {
    let dx = point.x - other.x;
    let dy = point.y - other.y;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance > 0.0 && distance < force.interaction_radius {
        let magnitude = force.repulsion_strength / (distance * distance);
        (dx / distance * magnitude, dy / distance * magnitude)
    } else {
        (0.0, 0.0)
    }
}

fn attraction(point: Point, anchor: Point, force: &ForceConfig) -> (f64, f64) {
    let dx = anchor.x - point.x;
    let dy = anchor.y - point.y;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance > 0.0 {
        (dx / distance * force.attraction, dy / distance * force.attraction)
    } else {
        (0.0, 0.0)
    }
}

/// One simulation step; `anchors[i]` is the anchor of `positions[i]`.
fn step(positions: &[Point], anchors: &[Point], canvas: CanvasSize, force: &ForceConfig) -> Vec<Point> {
    let grid = SpatialGrid::build(positions, force.interaction_radius);
    positions
        .iter()
        .zip(anchors)
        .enumerate()
        .map(|(index, (&point, &anchor))| {
            let (mut fx, mut fy) = attraction(point, anchor, force);
            grid.for_each_candidate(point, |other| {
                if other != index {
                    let (rx, ry) = repulsion(point, positions[other], force);
                    fx += rx;
                    fy += ry;
                }
            });
            let moved = Point::new(point.x + fx * force.step, point.y + fy * force.step);
            canvas.clamp(moved, force.clamp_margin)
        })
        .collect()
}

impl LayoutEngine for ForceLayoutEngine {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Network
    }

    fn compute(&self, entities: &[LayoutEntity], canvas: CanvasSize) -> LayoutResult {
        if !canvas.is_drawable() {
            debug!(
                "event=layout_compute module=layout kind=network status=skipped reason=canvas width={} height={}",
                canvas.width, canvas.height
            );
            return LayoutResult::empty(LayoutKind::Network);
        }

        let prepared = PreparedInput::new(LayoutKind::Network, entities, self.config.max_nodes);
        if prepared.categories.is_empty() {
            return LayoutResult::empty(LayoutKind::Network);
        }

        let force = &self.config.force;
        let anchor_points = self.anchor_points(&prepared.categories, canvas);
        let mut rng = self.config.rng();

        let mut members: Vec<(&LayoutEntity, &str)> = Vec::with_capacity(prepared.entities.len());
        let mut anchors = Vec::with_capacity(prepared.entities.len());
        let mut positions = Vec::with_capacity(prepared.entities.len());
        for entity in &prepared.entities {
            let Some(category) = entity.primary_tag() else {
                continue;
            };
            let Some(index) = prepared.category_index(category) else {
                continue;
            };
            let anchor = anchor_points[index];
            let distance = force.seed_min_distance
                + entity.normalized_progress() * (force.seed_max_distance - force.seed_min_distance);
            let angle = rng.gen_range(0.0..TAU);
            members.push((*entity, category));
            anchors.push(anchor);
            positions.push(anchor.offset_polar(angle, distance));
        }

        for _ in 0..force.iterations {
            positions = step(&positions, &anchors, canvas, force);
        }

        let nodes = members
            .iter()
            .zip(&positions)
            .map(|((entity, category), position)| place_node(entity, category, *position, &self.config))
            .collect::<Vec<_>>();

        debug!(
            "event=layout_compute module=layout kind=network status=ok nodes={} categories={} iterations={}",
            nodes.len(),
            prepared.categories.len(),
            force.iterations
        );

        let cluster_anchors = prepared
            .categories
            .iter()
            .cloned()
            .zip(anchor_points)
            .collect::<BTreeMap<_, _>>();

        LayoutResult {
            kind: LayoutKind::Network,
            nodes,
            categories: prepared.categories,
            cluster_anchors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{repulsion, step, ForceLayoutEngine};
    use crate::layout::config::ForceConfig;
    use crate::model::geometry::{CanvasSize, Point};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn all_pairs_step(
        positions: &[Point],
        anchors: &[Point],
        canvas: CanvasSize,
        force: &ForceConfig,
    ) -> Vec<Point> {
        positions
            .iter()
            .enumerate()
            .map(|(index, &point)| {
                let (mut fx, mut fy) = super::attraction(point, anchors[index], force);
                for (other, &other_point) in positions.iter().enumerate() {
                    if other != index {
                        let (rx, ry) = repulsion(point, other_point, force);
                        fx += rx;
                        fy += ry;
                    }
                }
                canvas.clamp(
                    Point::new(point.x + fx * force.step, point.y + fy * force.step),
                    force.clamp_margin,
                )
            })
            .collect()
    }

    #[test]
    fn grid_step_matches_all_pairs_step() {
        let canvas = CanvasSize::new(300.0, 300.0);
        let force = ForceConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        let positions: Vec<Point> = (0..120)
            .map(|_| Point::new(rng.gen_range(0.0..300.0), rng.gen_range(0.0..300.0)))
            .collect();
        let anchors = vec![Point::new(150.0, 150.0); positions.len()];

        let fast = step(&positions, &anchors, canvas, &force);
        let slow = all_pairs_step(&positions, &anchors, canvas, &force);
        for (a, b) in fast.iter().zip(&slow) {
            assert!(a.distance_to(*b) < 1e-9, "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn repulsion_ignores_coincident_and_distant_pairs() {
        let force = ForceConfig::default();
        let origin = Point::new(0.0, 0.0);
        assert_eq!(repulsion(origin, origin, &force), (0.0, 0.0));
        assert_eq!(repulsion(origin, Point::new(50.0, 0.0), &force), (0.0, 0.0));
        let (fx, fy) = repulsion(origin, Point::new(10.0, 0.0), &force);
        assert!((fx + 0.3).abs() < 1e-12);
        assert_eq!(fy, 0.0);
    }

    #[test]
    fn anchors_sit_on_a_third_of_the_short_side() {
        let engine = ForceLayoutEngine::default();
        let canvas = CanvasSize::new(600.0, 300.0);
        let categories = vec!["A".to_string(), "B".to_string()];
        let anchors = engine.anchor_points(&categories, canvas);
        assert!((anchors[0].x - 400.0).abs() < 1e-9);
        assert!((anchors[0].y - 150.0).abs() < 1e-9);
        assert!((anchors[1].x - 200.0).abs() < 1e-9);
    }
}
