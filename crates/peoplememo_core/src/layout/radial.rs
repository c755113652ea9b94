//! Galaxy layout: category sectors, recency orbits, collision nudging.
//!
//! # Responsibility
//! - Give every primary category an equal angular sector, first one pointing up.
//! - Map orbit progress linearly from the base radius to the outermost orbit.
//! - Spread same-category members evenly across their sector, over a small
//!   number of concentric lanes.
//! - Nudge candidates that land too close to earlier placements.
//!
//! # Invariants
//! - Without collisions the output is fully determined by the input.
//! - Accepted positions are clamped to the canvas before they are checked.
//! - An overlap survives only when the perturbation budget runs out.

use super::config::{LayoutConfig, LayoutConfigError, RadialConfig};
use super::result::LayoutResult;
use super::{place_node, LayoutEngine, LayoutKind, PreparedInput};
use crate::model::entity::LayoutEntity;
use crate::model::geometry::{CanvasSize, Point};
use log::debug;
use rand::Rng;
use std::collections::{BTreeMap, HashMap};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Radial sector-and-orbit layout engine.
#[derive(Debug, Clone, Default)]
pub struct RadialLayoutEngine {
    config: LayoutConfig,
}

impl RadialLayoutEngine {
    /// Creates an engine after validating `config`.
    pub fn new(config: LayoutConfig) -> Result<Self, LayoutConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Largest radius available for orbits on `canvas`.
    pub fn max_radius(&self, canvas: CanvasSize) -> f64 {
        canvas.min_dimension() / 2.0 - self.config.radial.rim_margin
    }

    /// Orbit radius for `progress`, before any lane offset.
    ///
    /// Renderers use this to draw the orbit guide rings.
    pub fn orbit_radius(&self, canvas: CanvasSize, progress: f64) -> f64 {
        let radial = &self.config.radial;
        let outermost = self.max_radius(canvas) - radial.outer_margin;
        radial.base_radius + progress * (outermost - radial.base_radius)
    }
}

/// Angular width of one category sector.
pub fn sector_angle(category_count: usize) -> f64 {
    TAU / category_count.max(1) as f64
}

/// Angle where sector `index` starts.
pub fn sector_base_angle(index: usize, category_count: usize) -> f64 {
    index as f64 * sector_angle(category_count) - FRAC_PI_2
}

/// Position of one entity among the members of its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SectorSlot {
    index: usize,
    members: usize,
}

fn sector_slots(entities: &[&LayoutEntity]) -> Vec<SectorSlot> {
    let mut members: HashMap<&str, usize> = HashMap::new();
    for entity in entities {
        if let Some(tag) = entity.primary_tag() {
            *members.entry(tag).or_default() += 1;
        }
    }

    let mut next: HashMap<&str, usize> = HashMap::new();
    entities
        .iter()
        .map(|entity| {
            let tag = entity.primary_tag().unwrap_or_default();
            let index = next.entry(tag).or_default();
            let slot = SectorSlot {
                index: *index,
                members: members.get(tag).copied().unwrap_or(1),
            };
            *index += 1;
            slot
        })
        .collect()
}

struct Placement {
    position: Point,
    resolved: bool,
}

fn first_conflict(position: Point, used: &[Point], min_separation: f64) -> Option<f64> {
    used.iter()
        .map(|other| position.distance_to(*other))
        .find(|distance| *distance < min_separation)
}

fn avoid_collision<R: Rng>(
    candidate: Point,
    used: &[Point],
    canvas: CanvasSize,
    radial: &RadialConfig,
    rng: &mut R,
) -> Placement {
    let mut position = canvas.clamp(candidate, radial.clamp_margin);
    for _ in 0..radial.collision_attempts {
        let Some(distance) = first_conflict(position, used, radial.min_separation) else {
            return Placement {
                position,
                resolved: true,
            };
        };
        let angle = rng.gen_range(0.0..TAU);
        let shortfall = radial.min_separation - distance + radial.collision_buffer;
        position = canvas.clamp(position.offset_polar(angle, shortfall), radial.clamp_margin);
    }
    Placement {
        position,
        resolved: first_conflict(position, used, radial.min_separation).is_none(),
    }
}

impl LayoutEngine for RadialLayoutEngine {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Galaxy
    }

    fn compute(&self, entities: &[LayoutEntity], canvas: CanvasSize) -> LayoutResult {
        if !canvas.is_drawable() {
            debug!(
                "event=layout_compute module=layout kind=galaxy status=skipped reason=canvas width={} height={}",
                canvas.width, canvas.height
            );
            return LayoutResult::empty(LayoutKind::Galaxy);
        }

        let prepared = PreparedInput::new(LayoutKind::Galaxy, entities, self.config.max_nodes);
        if prepared.categories.is_empty() {
            return LayoutResult::empty(LayoutKind::Galaxy);
        }

        let radial = &self.config.radial;
        let center = canvas.center();
        let category_count = prepared.categories.len();
        let sector = sector_angle(category_count);
        let slots = sector_slots(&prepared.entities);
        let mut rng = self.config.rng();
        let mut used: Vec<Point> = Vec::with_capacity(prepared.entities.len());
        let mut nodes = Vec::with_capacity(prepared.entities.len());
        let mut unresolved = 0usize;

        for (entity, slot) in prepared.entities.iter().zip(slots) {
            let Some(category) = entity.primary_tag() else {
                continue;
            };
            let Some(sector_index) = prepared.category_index(category) else {
                continue;
            };

            let step = sector / slot.members.max(1) as f64;
            let slot_offset = step * slot.index as f64 - sector / 2.0 + step / 2.0;
            let angle = sector_base_angle(sector_index, category_count) + slot_offset;
            let lane = (slot.index % radial.lane_count) as f64 * radial.lane_spacing;
            let radius = self.orbit_radius(canvas, entity.normalized_progress()) + lane;
            let candidate = center.offset_polar(angle, radius);

            let placement = avoid_collision(candidate, &used, canvas, radial, &mut rng);
            if !placement.resolved {
                unresolved += 1;
            }
            used.push(placement.position);
            nodes.push(place_node(entity, category, placement.position, &self.config));
        }

        debug!(
            "event=layout_compute module=layout kind=galaxy status=ok nodes={} categories={} unresolved_collisions={}",
            nodes.len(),
            category_count,
            unresolved
        );

        LayoutResult {
            kind: LayoutKind::Galaxy,
            nodes,
            categories: prepared.categories,
            cluster_anchors: BTreeMap::new(),
        }
    }
}
