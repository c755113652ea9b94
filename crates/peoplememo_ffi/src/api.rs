//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose layout computation and interaction queries to Dart via FRB.
//! - Own one process-wide `LayoutSession` per view.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures are reported in envelopes; nothing is thrown.
//! - Layout calls are not `sync`; FRB runs them on its worker pool and the
//!   session decides which finished result the UI keeps.
//!
//! # See also
//! - docs/architecture/layout.md

use log::warn;
use peoplememo_core::{
    core_version as core_version_inner, distinct_tags, filter_by_tag,
    init_logging as init_logging_inner, ping as ping_inner, Adoption, CanvasSize, LayoutConfig,
    LayoutEntity, LayoutKind, LayoutResult, LayoutSession, PersonId, PlacedNode, Point, Viewport,
};
use std::sync::OnceLock;

const LAYOUT_SEED_ENV: &str = "PEOPLEMEMO_LAYOUT_SEED";

static GALAXY_SESSION: OnceLock<LayoutSession> = OnceLock::new();
static NETWORK_SESSION: OnceLock<LayoutSession> = OnceLock::new();
static LAYOUT_SEED: OnceLock<Option<u64>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Person snapshot sent from Dart for one layout request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonInput {
    /// Stable person ID in UUID string form.
    pub id: String,
    pub name: String,
    /// Ordered tags; the first non-blank one decides placement.
    pub tags: Vec<String>,
    /// `None` when the person was never met.
    pub days_since_last_meeting: Option<u32>,
    pub icon_ref: Option<String>,
}

/// Renderable node returned to Dart.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeView {
    pub id: String,
    pub name: String,
    pub initials: String,
    pub category: String,
    /// `#RRGGBB` category color.
    pub color_hex: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub glow_intensity: f64,
    pub icon_ref: Option<String>,
    pub days_since_last_meeting: Option<u32>,
}

/// Cluster anchor of the Network view.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorView {
    pub category: String,
    pub x: f64,
    pub y: f64,
}

/// Layout response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResponse {
    /// Whether the request was valid and processed.
    pub ok: bool,
    /// Human-readable response message for diagnostics.
    pub message: String,
    /// `galaxy|network`.
    pub view: String,
    /// Session generation of this request (0 when rejected before starting).
    pub generation: u64,
    /// Whether this result is now the displayed layout. Non-adopted
    /// responses carry no nodes and should be ignored by the UI.
    pub adopted: bool,
    pub nodes: Vec<NodeView>,
    pub categories: Vec<String>,
    pub anchors: Vec<AnchorView>,
}

impl LayoutResponse {
    fn failure(view: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            view: view.to_string(),
            generation: 0,
            adopted: false,
            nodes: Vec::new(),
            categories: Vec::new(),
            anchors: Vec::new(),
        }
    }

    fn from_result(result: &LayoutResult, generation: u64, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            view: result.kind.as_str().to_string(),
            generation,
            adopted: true,
            nodes: result.nodes.iter().map(to_node_view).collect(),
            categories: result.categories.clone(),
            anchors: result
                .cluster_anchors
                .iter()
                .map(|(category, point)| AnchorView {
                    category: category.clone(),
                    x: point.x,
                    y: point.y,
                })
                .collect(),
        }
    }

    fn not_adopted(kind: LayoutKind, generation: u64, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            view: kind.as_str().to_string(),
            generation,
            adopted: false,
            nodes: Vec::new(),
            categories: Vec::new(),
            anchors: Vec::new(),
        }
    }
}

/// Computes the Galaxy layout for `people` filtered by `selected_tag`.
///
/// # FFI contract
/// - Async call on the FRB worker pool; CPU-bound, bounded by the node cap.
/// - Never panics.
/// - `adopted=false` means a newer Galaxy request won.
pub fn layout_galaxy(
    people: Vec<PersonInput>,
    width: f64,
    height: f64,
    selected_tag: Option<String>,
) -> LayoutResponse {
    compute_view(
        session(LayoutKind::Galaxy),
        LayoutKind::Galaxy,
        people,
        CanvasSize::new(width, height),
        selected_tag.as_deref(),
    )
}

/// Computes the Neural Network layout for `people` filtered by `selected_tag`.
///
/// # FFI contract
/// - Async call on the FRB worker pool; CPU-bound, bounded by iterations.
/// - Never panics.
/// - `adopted=false` means a newer Network request won.
pub fn layout_network(
    people: Vec<PersonInput>,
    width: f64,
    height: f64,
    selected_tag: Option<String>,
) -> LayoutResponse {
    compute_view(
        session(LayoutKind::Network),
        LayoutKind::Network,
        people,
        CanvasSize::new(width, height),
        selected_tag.as_deref(),
    )
}

/// Returns the layout currently adopted for `view`.
///
/// # FFI contract
/// - Sync call, no computation.
/// - `ok=false` for unknown views or before the first adoption.
#[flutter_rust_bridge::frb(sync)]
pub fn current_layout(view: String) -> LayoutResponse {
    let Some(kind) = LayoutKind::parse(&view) else {
        return LayoutResponse::failure(&view, format!("unknown view `{view}`"));
    };
    match session(kind).current() {
        Some(adopted) => {
            LayoutResponse::from_result(&adopted.result, adopted.generation, "Current layout.")
        }
        None => LayoutResponse::failure(kind.as_str(), "No layout adopted yet."),
    }
}

/// Returns the ID of the node under a pointer, in screen coordinates.
///
/// `scale`, `offset_x` and `offset_y` describe the pan/zoom transform the UI
/// applied to the canvas.
///
/// # FFI contract
/// - Sync call, linear in node count.
/// - Returns `None` for unknown views, before the first adoption, or on a miss.
#[flutter_rust_bridge::frb(sync)]
pub fn hit_test_node(
    view: String,
    x: f64,
    y: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
) -> Option<String> {
    let kind = LayoutKind::parse(&view)?;
    let adopted = session(kind).current()?;
    let viewport = Viewport::new(scale, Point::new(offset_x, offset_y));
    adopted
        .result
        .hit_test_viewport(Point::new(x, y), &viewport, layout_config().hit_radius)
        .map(|node| node.id.to_string())
}

/// Every tag used by `people`, sorted, for the filter bar.
#[flutter_rust_bridge::frb(sync)]
pub fn available_tags(people: Vec<PersonInput>) -> Vec<String> {
    let entities = people
        .into_iter()
        .filter_map(|person| to_entity(person).ok())
        .collect::<Vec<_>>();
    distinct_tags(&entities)
}

fn compute_view(
    session: &LayoutSession,
    kind: LayoutKind,
    people: Vec<PersonInput>,
    canvas: CanvasSize,
    selected_tag: Option<&str>,
) -> LayoutResponse {
    let entities = match people
        .into_iter()
        .map(to_entity)
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(entities) => entities,
        Err(err) => {
            return LayoutResponse::failure(kind.as_str(), format!("layout_{} failed: {err}", kind.as_str()))
        }
    };
    let entities = filter_by_tag(&entities, normalize_tag(selected_tag));

    let ticket = session.begin(kind, canvas);
    let config = layout_config();
    match session.run(ticket, &entities, &config) {
        Ok(Adoption::Adopted) => match session.current() {
            Some(adopted) if adopted.generation == ticket.generation() => {
                let message = format!("Placed {} node(s).", adopted.result.nodes.len());
                LayoutResponse::from_result(&adopted.result, adopted.generation, message)
            }
            _ => LayoutResponse::not_adopted(kind, ticket.generation(), "Superseded by a newer layout."),
        },
        Ok(Adoption::Superseded) => {
            LayoutResponse::not_adopted(kind, ticket.generation(), "Superseded by a newer layout.")
        }
        Ok(Adoption::Skipped) => {
            LayoutResponse::not_adopted(kind, ticket.generation(), "Skipped; a newer request is pending.")
        }
        Err(err) => LayoutResponse::failure(kind.as_str(), format!("layout_{} failed: {err}", kind.as_str())),
    }
}

fn session(kind: LayoutKind) -> &'static LayoutSession {
    match kind {
        LayoutKind::Galaxy => GALAXY_SESSION.get_or_init(LayoutSession::new),
        LayoutKind::Network => NETWORK_SESSION.get_or_init(LayoutSession::new),
    }
}

fn layout_config() -> LayoutConfig {
    LayoutConfig {
        seed: resolve_layout_seed(),
        ..LayoutConfig::default()
    }
}

fn resolve_layout_seed() -> Option<u64> {
    *LAYOUT_SEED.get_or_init(|| {
        let raw = std::env::var(LAYOUT_SEED_ENV).ok()?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                warn!("event=layout_seed module=ffi status=ignored reason=not_u64");
                None
            }
        }
    })
}

fn normalize_tag(tag: Option<&str>) -> Option<&str> {
    tag.map(str::trim).filter(|tag| !tag.is_empty())
}

fn to_entity(person: PersonInput) -> Result<LayoutEntity, String> {
    let id = PersonId::parse_str(person.id.trim())
        .map_err(|err| format!("invalid person id `{}`: {err}", person.id))?;
    let mut entity = LayoutEntity::with_id(id, person.name, person.tags)
        .with_last_meeting_days(person.days_since_last_meeting);
    if let Some(icon_ref) = person.icon_ref {
        entity = entity.with_icon_ref(icon_ref);
    }
    Ok(entity)
}

fn to_node_view(node: &PlacedNode) -> NodeView {
    NodeView {
        id: node.id.to_string(),
        name: node.name.clone(),
        initials: node.initials.clone(),
        category: node.category.clone(),
        color_hex: node.color.to_hex(),
        x: node.position.x,
        y: node.position.y,
        size: node.size,
        glow_intensity: node.glow_intensity,
        icon_ref: node.icon_ref.clone(),
        days_since_last_meeting: node.days_since_last_meeting,
    }
}
