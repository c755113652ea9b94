use peoplememo_core::{
    CanvasSize, ForceConfig, ForceLayoutEngine, LayoutConfig, LayoutConfigError, LayoutEngine,
    LayoutEntity, LayoutKind,
};
use std::f64::consts::TAU;

fn seeded(seed: u64) -> ForceLayoutEngine {
    ForceLayoutEngine::new(LayoutConfig {
        seed: Some(seed),
        ..LayoutConfig::default()
    })
    .expect("default config is valid")
}

fn roster(count: usize, tags: &[&str]) -> Vec<LayoutEntity> {
    (0..count)
        .map(|index| {
            LayoutEntity::new(format!("p{index}"), vec![tags[index % tags.len()].to_string()])
                .with_orbit_progress((index % 5) as f64 / 4.0)
        })
        .collect()
}

#[test]
fn anchors_are_evenly_spaced_on_a_third_of_the_short_side() {
    let canvas = CanvasSize::new(390.0, 600.0);
    let result = seeded(1).compute(&roster(12, &["Work", "Hobby", "School"]), canvas);

    assert_eq!(result.kind, LayoutKind::Network);
    assert_eq!(result.categories, vec!["Hobby", "School", "Work"]);
    assert_eq!(result.cluster_anchors.len(), 3);

    let center = canvas.center();
    for (index, category) in result.categories.iter().enumerate() {
        let anchor = result.cluster_anchors[category];
        assert!((anchor.distance_to(center) - 130.0).abs() < 1e-9);
        let expected = index as f64 / 3.0 * TAU;
        let gap = (anchor.angle_from(center) - expected).rem_euclid(TAU);
        assert!(gap.min(TAU - gap) < 1e-9, "{category} anchor at {anchor:?}");
    }
}

#[test]
fn positions_respect_the_clamp_margin() {
    let canvas = CanvasSize::new(200.0, 260.0);
    let result = seeded(7).compute(
        &roster(150, &["Work", "Hobby", "School", "Family", "Drinking Buddy"]),
        canvas,
    );

    assert_eq!(result.nodes.len(), 150);
    for node in &result.nodes {
        assert!(
            canvas.contains(node.position, 20.0),
            "{} at {:?}",
            node.name,
            node.position
        );
    }
}

#[test]
fn fixed_seed_reproduces_the_layout() {
    let canvas = CanvasSize::new(390.0, 600.0);
    let entities = roster(40, &["Work", "Family"]);
    let first = seeded(99).compute(&entities, canvas);
    let second = seeded(99).compute(&entities, canvas);
    assert_eq!(first, second);
}

#[test]
fn members_stay_near_their_own_anchor() {
    let canvas = CanvasSize::new(800.0, 800.0);
    let entities = roster(10, &["Work", "Hobby"]);
    let result = seeded(3).compute(&entities, canvas);

    for node in &result.nodes {
        let own = result.cluster_anchors[&node.category];
        let nearest_other = result
            .cluster_anchors
            .iter()
            .filter(|(category, _)| **category != node.category)
            .map(|(_, anchor)| node.position.distance_to(*anchor))
            .fold(f64::INFINITY, f64::min);
        assert!(node.position.distance_to(own) < nearest_other);
    }
}

#[test]
fn degenerate_input_yields_empty_result() {
    let engine = ForceLayoutEngine::default();
    assert!(engine.compute(&[], CanvasSize::new(300.0, 300.0)).is_empty());
    assert!(engine
        .compute(&roster(3, &["Work"]), CanvasSize::new(-1.0, 300.0))
        .is_empty());
    let untagged = vec![LayoutEntity::new("x", vec![String::new()])];
    let result = engine.compute(&untagged, CanvasSize::new(300.0, 300.0));
    assert!(result.is_empty());
    assert!(result.cluster_anchors.is_empty());
}

#[test]
fn entity_cap_applies_to_force_layout() {
    let entities = roster(600, &["Work", "Hobby"]);
    let result = seeded(5).compute(&entities, CanvasSize::new(600.0, 600.0));
    assert_eq!(result.nodes.len(), 500);
    for (node, entity) in result.nodes.iter().zip(&entities) {
        assert_eq!(node.id, entity.id);
    }
}

#[test]
fn invalid_force_config_is_rejected() {
    let error = ForceLayoutEngine::new(LayoutConfig {
        force: ForceConfig {
            iterations: 0,
            ..ForceConfig::default()
        },
        ..LayoutConfig::default()
    })
    .expect_err("zero iterations must be rejected");
    assert!(matches!(error, LayoutConfigError::InvalidValue { .. }));
}

#[test]
fn partial_json_config_overrides_only_named_fields() {
    let config = LayoutConfig::from_json_str(r#"{"seed": 11, "force": {"iterations": 5}}"#)
        .expect("partial config should parse");
    assert_eq!(config.seed, Some(11));
    assert_eq!(config.force.iterations, 5);
    assert_eq!(config.force.step, 0.1);
    assert_eq!(config.max_nodes, 500);

    let engine = LayoutKind::Network
        .engine(config)
        .expect("config is valid");
    assert_eq!(engine.kind(), LayoutKind::Network);
}

#[test]
fn huge_canvas_and_tiny_radius_still_lay_out() {
    let huge = CanvasSize::new(1e22, 1e22);
    let result = seeded(1).compute(&roster(4, &["Work"]), huge);
    assert_eq!(result.nodes.len(), 4);
    for node in &result.nodes {
        assert!(huge.contains(node.position, 20.0));
    }

    let engine = ForceLayoutEngine::new(LayoutConfig {
        seed: Some(1),
        force: ForceConfig {
            interaction_radius: 1e-17,
            ..ForceConfig::default()
        },
        ..LayoutConfig::default()
    })
    .expect("tiny positive radius is valid");
    let canvas = CanvasSize::new(390.0, 600.0);
    let result = engine.compute(&roster(20, &["Work", "Hobby"]), canvas);
    assert_eq!(result.nodes.len(), 20);
    for node in &result.nodes {
        assert!(canvas.contains(node.position, 20.0));
    }
}
