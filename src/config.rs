use crate::error::LoadError;
use crate::ir::{Diagram, Direction};
use serde::{Deserialize, Serialize};
use std::io::{self, Read};
use std::path::Path;

/// Upper bound on crossing-reduction sweeps, whatever the config asks for.
pub const MAX_ORDER_PASSES: usize = 24;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutOptions {
    pub direction: Direction,
    pub rank_spacing: f32,
    pub node_spacing: f32,
    pub margin: f32,
    pub order_passes: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            direction: Direction::TopDown,
            rank_spacing: 100.0,
            node_spacing: 80.0,
            margin: 50.0,
            order_passes: 4,
        }
    }
}

impl LayoutOptions {
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Copy with every out-of-range value replaced by its default.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let mut out = self.clone();
        if !(out.rank_spacing.is_finite() && out.rank_spacing > 0.0) {
            log::warn!(
                "rankSpacing {} is not a positive distance, using {}",
                out.rank_spacing,
                defaults.rank_spacing
            );
            out.rank_spacing = defaults.rank_spacing;
        }
        if !(out.node_spacing.is_finite() && out.node_spacing > 0.0) {
            log::warn!(
                "nodeSpacing {} is not a positive distance, using {}",
                out.node_spacing,
                defaults.node_spacing
            );
            out.node_spacing = defaults.node_spacing;
        }
        if !(out.margin.is_finite() && out.margin >= 0.0) {
            log::warn!("margin {} is invalid, using {}", out.margin, defaults.margin);
            out.margin = defaults.margin;
        }
        let passes = out.order_passes.clamp(1, MAX_ORDER_PASSES);
        if passes != out.order_passes {
            log::warn!("orderPasses {} clamped to {passes}", out.order_passes);
            out.order_passes = passes;
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizingMode {
    #[default]
    Heuristic,
    FontMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SizingConfig {
    pub mode: SizingMode,
    pub font_family: String,
    pub font_size: f32,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            mode: SizingMode::Heuristic,
            font_family: "sans-serif".to_string(),
            font_size: 14.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub layout: LayoutOptions,
    pub sizing: SizingConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    direction: Option<String>,
    rank_spacing: Option<f32>,
    node_spacing: Option<f32>,
    margin: Option<f32>,
    order_passes: Option<usize>,
    sizing: Option<SizingConfigFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SizingConfigFile {
    mode: Option<SizingMode>,
    font_family: Option<String>,
    font_size: Option<f32>,
}

pub fn load_config(path: Option<&Path>) -> Result<Config, LoadError> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path).map_err(|err| LoadError::io(path, err))?;
    parse_config(&contents)
}

/// Parses a JSON5 config document and layers it over the defaults.
pub fn parse_config(contents: &str) -> Result<Config, LoadError> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    let mut config = Config::default();

    if let Some(token) = parsed.direction {
        config.layout.direction =
            Direction::from_token(&token).ok_or_else(|| LoadError::InvalidOption {
                name: "direction",
                reason: format!("unknown direction `{token}`"),
            })?;
    }
    if let Some(v) = parsed.rank_spacing {
        config.layout.rank_spacing = v;
    }
    if let Some(v) = parsed.node_spacing {
        config.layout.node_spacing = v;
    }
    if let Some(v) = parsed.margin {
        config.layout.margin = v;
    }
    if let Some(v) = parsed.order_passes {
        config.layout.order_passes = v;
    }

    if let Some(sizing) = parsed.sizing {
        if let Some(v) = sizing.mode {
            config.sizing.mode = v;
        }
        if let Some(v) = sizing.font_family {
            config.sizing.font_family = v;
        }
        if let Some(v) = sizing.font_size {
            config.sizing.font_size = v;
        }
    }

    Ok(config)
}

/// Reads a diagram snapshot from `path`, or stdin when the path is absent or `-`.
pub fn load_diagram(path: Option<&Path>) -> Result<Diagram, LoadError> {
    let contents = match path {
        Some(path) if path != Path::new("-") => {
            std::fs::read_to_string(path).map_err(|err| LoadError::io(path, err))?
        }
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|err| LoadError::io("<stdin>", err))?;
            buf
        }
    };
    Ok(serde_json::from_str(&contents)?)
}
