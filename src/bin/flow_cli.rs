//! Flow Studio CLI - inspect step-flow layouts from the terminal
//!
//! Runs the same layout, fit and connector code as the canvas and prints
//! the results, either as a table or as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::{style, Emoji};
use serde::Serialize;
use std::path::{Path, PathBuf};

use flow_studio::canvas::{
    compute_layout, connectors, content_bounds, fit_to_content, Connector, LayoutConfig, Node,
    Point, Rect, Vector,
};
use flow_studio::{FlowDocument, StudioConfig};

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "+ ");
static ARROW: Emoji<'_, '_> = Emoji("→ ", "-> ");
static INFO: Emoji<'_, '_> = Emoji("ℹ ", "i ");

#[derive(Parser)]
#[command(name = "flow-cli")]
#[command(version)]
#[command(about = "Flow Studio CLI - inspect step-flow layouts from the terminal")]
#[command(long_about = r#"
Flow Studio CLI runs the canvas layout engine without a window.

Examples:
  flow-cli init flow.json                      # Write a sample document
  flow-cli layout flow.json --width 1000       # Node positions
  flow-cli fit flow.json -W 1280 -H 720        # Reset-view transform
  flow-cli paths flow.json --json              # Connector curves as JSON
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to ~/.config/flow-studio/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print node positions
    Layout {
        /// Flow document (JSON)
        file: PathBuf,

        /// Viewport width used for centering
        #[arg(short = 'W', long, default_value_t = 1280.0)]
        width: f64,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the fit-to-content viewport
    Fit {
        /// Flow document (JSON)
        file: PathBuf,

        /// Viewport width
        #[arg(short = 'W', long, default_value_t = 1280.0)]
        width: f64,

        /// Viewport height
        #[arg(short = 'H', long, default_value_t = 720.0)]
        height: f64,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print connector curves between consecutive steps
    Paths {
        /// Flow document (JSON)
        file: PathBuf,

        /// Viewport width used for centering
        #[arg(short = 'W', long, default_value_t = 1280.0)]
        width: f64,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Write a sample flow document
    Init {
        /// Destination file
        file: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FitReport {
    zoom: f64,
    pan: Vector,
    content_bounds: Option<Rect>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let config = match cli.config {
        Some(ref path) => StudioConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => StudioConfig::load(),
    };

    match cli.command {
        Commands::Layout { file, width, json } => cmd_layout(&file, width, json, &config.layout),
        Commands::Fit {
            file,
            width,
            height,
            json,
        } => cmd_fit(&file, width, height, json, &config.layout),
        Commands::Paths { file, width, json } => cmd_paths(&file, width, json, &config.layout),
        Commands::Init { file, force } => cmd_init(&file, force),
    }
}

fn load_nodes(file: &Path, width: f64, layout: &LayoutConfig) -> Result<(FlowDocument, Vec<Node>)> {
    let document = FlowDocument::load(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let nodes = compute_layout(&document.steps, &document.screen_lookup(), width, layout);
    Ok((document, nodes))
}

fn cmd_layout(file: &Path, width: f64, json: bool, layout: &LayoutConfig) -> Result<()> {
    let (document, nodes) = load_nodes(file, width, layout)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&nodes)?);
        return Ok(());
    }

    if nodes.is_empty() {
        println!("{}No steps in {}", INFO, file.display());
        return Ok(());
    }

    println!(
        "{}{} ({} steps, width {})",
        CHECK,
        style(document.name.as_deref().unwrap_or("Untitled flow")).bold(),
        nodes.len(),
        width
    );
    for (i, node) in nodes.iter().enumerate() {
        let mut flags = Vec::new();
        if node.is_first {
            flags.push("first");
        }
        if node.is_last {
            flags.push("last");
        }
        println!(
            "  {:>3}. {:<24} {} ({:>7.1}, {:>7.1}) {} {}",
            i + 1,
            style(&node.id).cyan(),
            ARROW,
            node.position.x,
            node.position.y,
            style(flags.join(",")).dim(),
            node.screen_name.as_deref().map(|s| format!("[{}]", s)).unwrap_or_default(),
        );
    }
    Ok(())
}

fn cmd_fit(file: &Path, width: f64, height: f64, json: bool, layout: &LayoutConfig) -> Result<()> {
    let (_, nodes) = load_nodes(file, width, layout)?;
    let viewport_rect = Rect::from_min_size(Point::ZERO, Vector::new(width, height));
    let viewport = fit_to_content(&nodes, viewport_rect, layout)
        .with_context(|| format!("Viewport {}x{} has no area", width, height))?;

    let report = FitReport {
        zoom: viewport.zoom(),
        pan: viewport.pan(),
        content_bounds: content_bounds(&nodes, layout),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}zoom {:.4}", CHECK, report.zoom);
    println!("{}pan  ({:.2}, {:.2})", ARROW, report.pan.x, report.pan.y);
    if let Some(bounds) = report.content_bounds {
        println!(
            "{}content ({:.1}, {:.1}) - ({:.1}, {:.1})",
            INFO, bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y
        );
    }
    Ok(())
}

fn cmd_paths(file: &Path, width: f64, json: bool, layout: &LayoutConfig) -> Result<()> {
    let (_, nodes) = load_nodes(file, width, layout)?;
    let curves: Vec<Connector> = connectors(&nodes);

    if json {
        println!("{}", serde_json::to_string_pretty(&curves)?);
        return Ok(());
    }

    if curves.is_empty() {
        println!("{}Fewer than two steps, nothing to connect", INFO);
        return Ok(());
    }

    for (pair, curve) in nodes.windows(2).zip(&curves) {
        let mid = curve.point_at(0.5);
        println!(
            "  {} {}{}  M {:.1},{:.1} C {:.1},{:.1} {:.1},{:.1} {:.1},{:.1}  mid {:.1},{:.1}",
            style(&pair[0].id).cyan(),
            ARROW,
            style(&pair[1].id).cyan(),
            curve.start.x,
            curve.start.y,
            curve.control1.x,
            curve.control1.y,
            curve.control2.x,
            curve.control2.y,
            curve.end.x,
            curve.end.y,
            mid.x,
            mid.y,
        );
    }
    Ok(())
}

fn cmd_init(file: &Path, force: bool) -> Result<()> {
    if file.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", file.display());
    }
    FlowDocument::sample()
        .save(file)
        .with_context(|| format!("Failed to write {}", file.display()))?;
    println!("{}Wrote sample flow to {}", CHECK, style(file.display()).green());
    Ok(())
}
