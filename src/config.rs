// src/config.rs

//! Command line arguments and render settings.
//!
//! Settings come from three layers, later ones winning: built-in defaults,
//! an optional JSON file passed with `--config`, and command line flags.
//! Any field missing from the file keeps its default.

use crate::color::Metric;
use crate::layout::SizeRequest;
use crate::render::RenderMode;
use crate::sink::ColorMode;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Prints images to the terminal using colored Unicode block and line glyphs.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, disable_help_flag = true)]
pub struct Cli {
    /// Image files to print, in order.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Width in terminal cells. Use the screen width if set to 0.
    #[arg(short = 'w', value_name = "WIDTH")]
    pub width: Option<u32>,

    /// Height in terminal cells. Use the screen height if set to 0.
    #[arg(short = 'h', value_name = "HEIGHT")]
    pub height: Option<u32>,

    /// Percentage of the screen height the image may use (default 50).
    #[arg(short = 'p', value_name = "PERCENTAGE")]
    pub percentage: Option<u32>,

    /// Enhance level: 0 = spaces, 1 = lower half blocks, 2 = best-fit glyphs (default 2).
    #[arg(short = 'e', value_name = "LEVEL")]
    pub enhance: Option<u8>,

    /// Print the image at its decoded size.
    #[arg(short = 'r')]
    pub raw: bool,

    /// Use the 256-color palette instead of 24-bit color.
    #[arg(short = '8')]
    pub palette256: bool,

    /// Color distance used to score glyph candidates.
    #[arg(long, value_enum)]
    pub metric: Option<Metric>,

    /// Render rows on a thread pool.
    #[arg(long)]
    pub parallel: bool,

    /// JSON file with default settings.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print this help.
    #[arg(short = '?', long = "help", action = ArgAction::Help)]
    pub help: Option<bool>,
}

/// Everything that controls how an image is sized and drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Width in cells; `Some(0)` is the full screen width.
    pub width: Option<u32>,
    /// Height in cells; `Some(0)` is the full screen height.
    pub height: Option<u32>,
    /// Share of the screen height used when neither width nor height is set.
    pub percentage: u32,
    pub mode: RenderMode,
    /// Skip resizing.
    pub raw: bool,
    pub color_mode: ColorMode,
    pub metric: Metric,
    pub parallel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: None,
            height: None,
            percentage: 50,
            mode: RenderMode::Glyph,
            raw: false,
            color_mode: ColorMode::TrueColor,
            metric: Metric::Weighted,
            parallel: false,
        }
    }
}

impl RenderConfig {
    /// Reads settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_json(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let config: RenderConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the effective configuration for a parsed command line.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli)?;
        Ok(config)
    }

    /// Overrides settings with the flags present on the command line.
    pub fn apply_cli(&mut self, cli: &Cli) -> Result<()> {
        if cli.width.is_some() {
            self.width = cli.width;
        }
        if cli.height.is_some() {
            self.height = cli.height;
        }
        if let Some(percentage) = cli.percentage {
            self.percentage = percentage;
        }
        if let Some(level) = cli.enhance {
            self.mode = RenderMode::try_from(level)?;
        }
        if let Some(metric) = cli.metric {
            self.metric = metric;
        }
        self.raw |= cli.raw;
        self.parallel |= cli.parallel;
        if cli.palette256 {
            self.color_mode = ColorMode::Palette256;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.percentage > 100 {
            bail!("Percentage should be between 0 and 100");
        }
        Ok(())
    }

    pub fn size_request(&self) -> SizeRequest {
        SizeRequest {
            width: self.width,
            height: self.height,
            percentage: self.percentage,
        }
    }
}
