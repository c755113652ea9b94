//! CLI entry point for the layout core.
//!
//! # Responsibility
//! - Keep the plain `peoplememo` probe for checking core linkage.
//! - Run either layout engine on a JSON roster for local inspection.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use peoplememo_core::{
    distinct_tags, filter_by_tag, galaxy_connections, network_links, CanvasSize, LayoutConfig,
    LayoutEntity, LayoutKind, LayoutResult, Link, PersonId,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "peoplememo", version, about = "People Memo layout core")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a layout and print it as JSON
    Layout {
        /// View to lay out
        #[arg(long, value_enum, default_value = "galaxy")]
        view: View,
        /// Roster JSON file (array of people)
        #[arg(short = 'i', long)]
        input: PathBuf,
        #[arg(short = 'w', long, default_value_t = 390.0)]
        width: f64,
        #[arg(short = 'H', long, default_value_t = 600.0)]
        height: f64,
        /// Fixed random seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
        /// Layout config JSON; missing fields keep their defaults
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,
        /// Only lay out people carrying this tag
        #[arg(short = 't', long)]
        tag: Option<String>,
        /// Also print the connection lines of the view
        #[arg(long)]
        links: bool,
    },
    /// Print every tag used in a roster
    Tags {
        #[arg(short = 'i', long)]
        input: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum View {
    Galaxy,
    Network,
}

impl From<View> for LayoutKind {
    fn from(view: View) -> Self {
        match view {
            View::Galaxy => LayoutKind::Galaxy,
            View::Network => LayoutKind::Network,
        }
    }
}

/// One roster entry as written by hand or exported from the app.
#[derive(Debug, Deserialize)]
struct PersonRecord {
    #[serde(default)]
    id: Option<PersonId>,
    name: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    days_since_last_meeting: Option<u32>,
    /// Overrides the progress derived from `days_since_last_meeting`.
    #[serde(default)]
    orbit_progress: Option<f64>,
    #[serde(default)]
    icon_ref: Option<String>,
}

impl From<PersonRecord> for LayoutEntity {
    fn from(record: PersonRecord) -> Self {
        let id = record.id.unwrap_or_else(Uuid::new_v4);
        let mut entity = LayoutEntity::with_id(id, record.name, record.tags)
            .with_last_meeting_days(record.days_since_last_meeting);
        if let Some(progress) = record.orbit_progress {
            entity = entity.with_orbit_progress(progress);
        }
        if let Some(icon_ref) = record.icon_ref {
            entity = entity.with_icon_ref(icon_ref);
        }
        entity
    }
}

#[derive(Debug, Serialize)]
struct LayoutWithLinks<'a> {
    layout: &'a LayoutResult,
    links: Vec<Link>,
}

fn main() {
    if let Err(err) = run(Args::parse()) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    match args.command {
        None => {
            println!("peoplememo_core ping={}", peoplememo_core::ping());
            println!("peoplememo_core version={}", peoplememo_core::core_version());
        }
        Some(Command::Layout {
            view,
            input,
            width,
            height,
            seed,
            config,
            tag,
            links,
        }) => {
            let mut layout_config = load_config(config.as_deref())?;
            if seed.is_some() {
                layout_config.seed = seed;
            }
            let roster = read_roster(&input)?;
            let roster = filter_by_tag(&roster, tag.as_deref());
            let canvas = CanvasSize::new(width, height);
            let result = compute(view.into(), &roster, canvas, layout_config)?;
            let output = if links {
                let links = match result.kind {
                    LayoutKind::Galaxy => galaxy_connections(&result),
                    LayoutKind::Network => network_links(&result, canvas),
                };
                serde_json::to_string_pretty(&LayoutWithLinks {
                    layout: &result,
                    links,
                })?
            } else {
                serde_json::to_string_pretty(&result)?
            };
            println!("{output}");
        }
        Some(Command::Tags { input }) => {
            for tag in distinct_tags(&read_roster(&input)?) {
                println!("{tag}");
            }
        }
    }
    Ok(())
}

fn compute(
    kind: LayoutKind,
    roster: &[LayoutEntity],
    canvas: CanvasSize,
    config: LayoutConfig,
) -> Result<LayoutResult> {
    if !canvas.is_drawable() {
        bail!("canvas must be positive, got {}x{}", canvas.width, canvas.height);
    }
    let engine = kind.engine(config)?;
    Ok(engine.compute(roster, canvas))
}

fn load_config(path: Option<&Path>) -> Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config `{}`", path.display()))?;
    LayoutConfig::from_json_str(&raw)
        .with_context(|| format!("invalid config `{}`", path.display()))
}

fn read_roster(path: &Path) -> Result<Vec<LayoutEntity>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster `{}`", path.display()))?;
    parse_roster(&raw).with_context(|| format!("invalid roster `{}`", path.display()))
}

fn parse_roster(raw: &str) -> Result<Vec<LayoutEntity>> {
    let records: Vec<PersonRecord> = serde_json::from_str(raw)?;
    Ok(records.into_iter().map(LayoutEntity::from).collect())
}

#[cfg(test)]
mod tests {
    use super::{compute, parse_roster, Args, Command, View};
    use clap::Parser;
    use peoplememo_core::{CanvasSize, LayoutConfig, LayoutKind};

    #[test]
    fn roster_records_fill_defaults() {
        let roster = parse_roster(
            r#"[
                {"name": "Ada Lovelace", "tags": ["Work"], "days_since_last_meeting": 90},
                {"id": "67e55044-10b1-426f-9247-bb680e5fe0c8", "name": "Bob", "orbit_progress": 0.25},
                {"name": "Nobody"}
            ]"#,
        )
        .expect("roster should parse");

        assert_eq!(roster.len(), 3);
        assert_eq!(roster[0].orbit_progress, 0.5);
        assert_eq!(roster[0].days_since_last_meeting, Some(90));
        assert_eq!(
            roster[1].id.to_string(),
            "67e55044-10b1-426f-9247-bb680e5fe0c8"
        );
        assert_eq!(roster[1].orbit_progress, 0.25);
        assert_eq!(roster[2].orbit_progress, 1.0);
        assert!(roster[2].tags.is_empty());
    }

    #[test]
    fn compute_rejects_empty_canvas() {
        let error = compute(
            LayoutKind::Galaxy,
            &[],
            CanvasSize::new(0.0, 100.0),
            LayoutConfig::default(),
        )
        .expect_err("zero width should fail");
        assert!(error.to_string().contains("canvas"));
    }

    #[test]
    fn layout_arguments_parse() {
        let args = Args::try_parse_from([
            "peoplememo",
            "layout",
            "--view",
            "network",
            "--input",
            "people.json",
            "--seed",
            "7",
        ])
        .expect("arguments should parse");
        match args.command {
            Some(Command::Layout {
                view, seed, width, ..
            }) => {
                assert!(matches!(view, View::Network));
                assert_eq!(seed, Some(7));
                assert_eq!(width, 390.0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn no_subcommand_is_the_probe() {
        let args = Args::try_parse_from(["peoplememo"]).expect("bare invocation should parse");
        assert!(args.command.is_none());
    }
}
