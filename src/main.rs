// src/main.rs

//! Main entry point for the `blockterm` image printer.

use blockterm::config::{Cli, RenderConfig};
use blockterm::layout::{TerminalSize, FALLBACK_TERMINAL_SIZE};
use blockterm::render::render_file;

use anyhow::Context;
use clap::Parser;
use log::{debug, info};
use std::io::{self, Write};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the rendered image.
    // Default filter is "warn" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_micros()
        .init();

    let cli = Cli::parse();
    let config = RenderConfig::from_cli(&cli)?;
    debug!("Effective configuration: {:?}", config);

    let screen = if config.raw {
        FALLBACK_TERMINAL_SIZE
    } else {
        TerminalSize::detect()
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for path in &cli.files {
        let rendered = render_file(path, &config, screen)?;
        out.write_all(&rendered)
            .with_context(|| format!("Failed to write {} to stdout", path.display()))?;
        info!("Printed {} ({} bytes)", path.display(), rendered.len());
    }
    out.flush().context("Failed to flush stdout")?;
    Ok(())
}
