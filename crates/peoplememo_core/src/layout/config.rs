//! Layout tuning constants and their validation.
//!
//! # Responsibility
//! - Hold every numeric constant the engines depend on, with defaults that
//!   reproduce the shipped Galaxy and Neural Network views exactly.
//! - Reject configurations that would make an engine divide by zero or loop
//!   without bound.
//!
//! # Invariants
//! - `LayoutConfig::default()` always passes `validate()`.
//! - Partial JSON documents fill missing fields from defaults.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Hard upper bound on entities processed by one layout call.
pub const DEFAULT_MAX_NODES: usize = 500;
/// Pointer hit radius in canvas units.
pub const DEFAULT_HIT_RADIUS: f64 = 30.0;

/// Configuration error for layout construction.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutConfigError {
    InvalidValue { field: &'static str, reason: String },
    Parse(String),
}

impl Display for LayoutConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { field, reason } => {
                write!(f, "invalid layout config `{field}`: {reason}")
            }
            Self::Parse(message) => write!(f, "layout config parse failed: {message}"),
        }
    }
}

impl Error for LayoutConfigError {}

/// Top-level layout configuration shared by both engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Entities past this count are truncated from the tail of the input.
    pub max_nodes: usize,
    /// Node size for a just-met person.
    pub node_base_size: f64,
    /// Extra node size at orbit progress 1.0.
    pub node_size_growth: f64,
    /// Pointer hit radius used by hit-testing helpers.
    pub hit_radius: f64,
    /// Fixed random seed; `None` draws a fresh seed per call.
    pub seed: Option<u64>,
    pub radial: RadialConfig,
    pub force: ForceConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
            node_base_size: 8.0,
            node_size_growth: 4.0,
            hit_radius: DEFAULT_HIT_RADIUS,
            seed: None,
            radial: RadialConfig::default(),
            force: ForceConfig::default(),
        }
    }
}

/// Galaxy (radial orbit) constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialConfig {
    /// Subtracted from half the smaller canvas side to get the usable radius.
    pub rim_margin: f64,
    /// Orbit radius at progress 0.0.
    pub base_radius: f64,
    /// Subtracted from the usable radius to get the outermost orbit.
    pub outer_margin: f64,
    /// Radial distance between neighbouring lanes.
    pub lane_spacing: f64,
    /// Number of concentric lanes members are spread across.
    pub lane_count: usize,
    /// Minimum distance between two accepted positions.
    pub min_separation: f64,
    /// Perturbation attempts before an overlapping candidate is accepted.
    pub collision_attempts: usize,
    /// Added to the separation shortfall on each perturbation.
    pub collision_buffer: f64,
    /// Canvas margin applied when clamping candidates.
    pub clamp_margin: f64,
}

impl Default for RadialConfig {
    fn default() -> Self {
        Self {
            rim_margin: 40.0,
            base_radius: 50.0,
            outer_margin: 20.0,
            lane_spacing: 15.0,
            lane_count: 3,
            min_separation: 20.0,
            collision_attempts: 10,
            collision_buffer: 5.0,
            clamp_margin: 20.0,
        }
    }
}

/// Neural Network (force-directed cluster) constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Anchor ring radius is `min(width, height) / anchor_radius_divisor`.
    pub anchor_radius_divisor: f64,
    /// Seed distance from the anchor at progress 0.0.
    pub seed_min_distance: f64,
    /// Seed distance from the anchor at progress 1.0.
    pub seed_max_distance: f64,
    pub iterations: usize,
    /// Pairs at or beyond this distance do not repel.
    pub interaction_radius: f64,
    /// Numerator of the inverse-square repulsion.
    pub repulsion_strength: f64,
    /// Constant pull toward the own cluster anchor.
    pub attraction: f64,
    /// Scale applied to the summed force each step.
    pub step: f64,
    pub clamp_margin: f64,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            anchor_radius_divisor: 3.0,
            seed_min_distance: 40.0,
            seed_max_distance: 100.0,
            iterations: 50,
            interaction_radius: 50.0,
            repulsion_strength: 30.0,
            attraction: 0.5,
            step: 0.1,
            clamp_margin: 20.0,
        }
    }
}

impl LayoutConfig {
    /// Parses a (possibly partial) JSON document and validates the result.
    pub fn from_json_str(raw: &str) -> Result<Self, LayoutConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| LayoutConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every constant an engine relies on.
    ///
    /// # Errors
    /// - Zero node cap, lane count or iteration count.
    /// - Non-finite numbers, negative distances, non-positive divisors.
    pub fn validate(&self) -> Result<(), LayoutConfigError> {
        if self.max_nodes == 0 {
            return Err(invalid("max_nodes", "must be at least 1"));
        }
        non_negative("node_base_size", self.node_base_size)?;
        non_negative("node_size_growth", self.node_size_growth)?;
        positive("hit_radius", self.hit_radius)?;

        let radial = &self.radial;
        non_negative("radial.rim_margin", radial.rim_margin)?;
        non_negative("radial.base_radius", radial.base_radius)?;
        non_negative("radial.outer_margin", radial.outer_margin)?;
        non_negative("radial.lane_spacing", radial.lane_spacing)?;
        if radial.lane_count == 0 {
            return Err(invalid("radial.lane_count", "must be at least 1"));
        }
        non_negative("radial.min_separation", radial.min_separation)?;
        non_negative("radial.collision_buffer", radial.collision_buffer)?;
        non_negative("radial.clamp_margin", radial.clamp_margin)?;

        let force = &self.force;
        positive("force.anchor_radius_divisor", force.anchor_radius_divisor)?;
        non_negative("force.seed_min_distance", force.seed_min_distance)?;
        non_negative("force.seed_max_distance", force.seed_max_distance)?;
        if force.iterations == 0 {
            return Err(invalid("force.iterations", "must be at least 1"));
        }
        positive("force.interaction_radius", force.interaction_radius)?;
        non_negative("force.repulsion_strength", force.repulsion_strength)?;
        non_negative("force.attraction", force.attraction)?;
        positive("force.step", force.step)?;
        non_negative("force.clamp_margin", force.clamp_margin)?;
        Ok(())
    }

    /// Visual size for a node at the given (normalized) progress.
    pub fn node_size(&self, progress: f64) -> f64 {
        self.node_base_size + progress * self.node_size_growth
    }

    /// Fresh random source for one layout call.
    pub(crate) fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> LayoutConfigError {
    LayoutConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), LayoutConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(field, format!("must be finite and >= 0, got {value}")));
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), LayoutConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(field, format!("must be finite and > 0, got {value}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{LayoutConfig, LayoutConfigError};

    #[test]
    fn default_config_is_valid() {
        LayoutConfig::default()
            .validate()
            .expect("defaults must validate");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = LayoutConfig::from_json_str(r#"{"seed": 7, "force": {"iterations": 10}}"#)
            .expect("partial config should parse");
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.force.iterations, 10);
        assert_eq!(config.force.interaction_radius, 50.0);
        assert_eq!(config.max_nodes, 500);
        assert_eq!(config.radial.collision_attempts, 10);
    }

    #[test]
    fn rejects_zero_iterations() {
        let mut config = LayoutConfig::default();
        config.force.iterations = 0;
        let err = config.validate().expect_err("zero iterations must fail");
        assert!(matches!(
            err,
            LayoutConfigError::InvalidValue {
                field: "force.iterations",
                ..
            }
        ));
    }

    #[test]
    fn rejects_non_finite_radius() {
        let mut config = LayoutConfig::default();
        config.radial.base_radius = f64::NAN;
        let err = config.validate().expect_err("NaN must fail");
        assert!(err.to_string().contains("radial.base_radius"));
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        let err = LayoutConfig::from_json_str("{not json").expect_err("must fail");
        assert!(matches!(err, LayoutConfigError::Parse(_)));
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        use rand::Rng;
        let config = LayoutConfig {
            seed: Some(42),
            ..LayoutConfig::default()
        };
        let a: f64 = config.rng().gen();
        let b: f64 = config.rng().gen();
        assert_eq!(a, b);
    }
}
