use crate::config::{Config, SizingMode, load_config, load_diagram};
use crate::ir::Direction;
use crate::layout::{Layout, compute_layout_with};
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::size::{HeuristicSizer, SizeEstimator};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "archlay", version, about = "Layered layout for architecture diagrams")]
pub struct Args {
    /// Diagram snapshot (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "format", value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Layout config file (JSON5)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Rank direction: TB, LR, BT or RL
    #[arg(short = 'd', long = "direction", value_parser = parse_direction)]
    pub direction: Option<Direction>,

    /// Distance between consecutive ranks
    #[arg(long = "rank-spacing")]
    pub rank_spacing: Option<f32>,

    /// Gap between neighbours within a rank
    #[arg(long = "node-spacing")]
    pub node_spacing: Option<f32>,

    /// Margin around the whole layout
    #[arg(long = "margin")]
    pub margin: Option<f32>,

    /// Measure labels with a system font instead of the character heuristic
    #[arg(long = "font-metrics")]
    pub font_metrics: bool,

    /// Log phase summaries
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Tsv,
}

fn parse_direction(token: &str) -> Result<Direction, String> {
    Direction::from_token(token).ok_or_else(|| format!("expected TB, LR, BT or RL, got `{token}`"))
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = apply_overrides(load_config(args.config.as_deref())?, &args);
    let diagram = load_diagram(args.input.as_deref())?;

    let sizer = build_sizer(&config)?;
    let layout = compute_layout_with(&diagram, &config.layout, &*sizer);
    report_diagnostics(&layout);

    match (args.format, output_file(args.output.as_deref())) {
        (OutputFormat::Json, Some(path)) => write_layout_dump(path, &layout),
        (OutputFormat::Json, None) => {
            let dump = LayoutDump::from_layout(&layout);
            write_output(&(serde_json::to_string_pretty(&dump)? + "\n"), None)
        }
        (OutputFormat::Tsv, path) => write_output(&LayoutDump::from_layout(&layout).to_tsv(), path),
    }
}

/// `-o -` and a missing `-o` both mean stdout.
fn output_file(output: Option<&Path>) -> Option<&Path> {
    output.filter(|path| *path != Path::new("-"))
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Command-line values win over the config file.
fn apply_overrides(mut config: Config, args: &Args) -> Config {
    if let Some(direction) = args.direction {
        config.layout.direction = direction;
    }
    if let Some(v) = args.rank_spacing {
        config.layout.rank_spacing = v;
    }
    if let Some(v) = args.node_spacing {
        config.layout.node_spacing = v;
    }
    if let Some(v) = args.margin {
        config.layout.margin = v;
    }
    if args.font_metrics {
        config.sizing.mode = SizingMode::FontMetrics;
    }
    config
}

#[cfg(feature = "font-metrics")]
fn build_sizer(config: &Config) -> Result<Box<dyn SizeEstimator>> {
    let sizer: Box<dyn SizeEstimator> = match config.sizing.mode {
        SizingMode::Heuristic => Box::new(HeuristicSizer),
        SizingMode::FontMetrics => Box::new(crate::text_metrics::FontMetricsSizer::new(
            config.sizing.font_family.clone(),
            config.sizing.font_size,
        )),
    };
    Ok(sizer)
}

#[cfg(not(feature = "font-metrics"))]
fn build_sizer(config: &Config) -> Result<Box<dyn SizeEstimator>> {
    match config.sizing.mode {
        SizingMode::Heuristic => Ok(Box::new(HeuristicSizer) as Box<dyn SizeEstimator>),
        SizingMode::FontMetrics => Err(anyhow::anyhow!(
            "font-metrics sizing requires building with the `font-metrics` feature"
        )),
    }
}

fn report_diagnostics(layout: &Layout) {
    let diagnostics = &layout.diagnostics;
    if !diagnostics.skipped_edges.is_empty() {
        log::warn!(
            "{} edge(s) reference unknown nodes and were left out of the layout",
            diagnostics.skipped_edges.len()
        );
    }
    if !diagnostics.reversed_edges.is_empty() {
        log::info!(
            "{} edge(s) close a cycle and were ranked as back-edges",
            diagnostics.reversed_edges.len()
        );
    }
}

fn write_output(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config_file() {
        let args = Args::parse_from([
            "archlay",
            "-i",
            "diagram.json",
            "--direction",
            "LR",
            "--rank-spacing",
            "40",
            "--font-metrics",
        ]);
        let config = apply_overrides(Config::default(), &args);
        assert_eq!(config.layout.direction, Direction::LeftRight);
        assert_eq!(config.layout.rank_spacing, 40.0);
        assert_eq!(config.layout.node_spacing, 80.0);
        assert_eq!(config.sizing.mode, SizingMode::FontMetrics);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn dash_output_means_stdout() {
        assert_eq!(output_file(Some(Path::new("-"))), None);
        assert_eq!(output_file(None), None);
        assert_eq!(
            output_file(Some(Path::new("layout.json"))),
            Some(Path::new("layout.json"))
        );
    }

    #[test]
    fn rejects_unknown_direction_flag() {
        let parsed = Args::try_parse_from(["archlay", "--direction", "up"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn heuristic_sizer_is_default() {
        let sizer = build_sizer(&Config::default()).unwrap();
        let node = crate::ir::DiagramNode::new("t", crate::ir::NodeKind::Task, "");
        assert_eq!(sizer.estimate(&node), crate::ir::Size::new(180.0, 60.0));
    }
}
