//! mrsprite: synthesize sprite textures from saved or scripted control points.
//!
//! # Usage
//!
//! ```text
//! mrsprite render points.json --output Particle.bmp --preview preview.png
//! mrsprite replay session.json --save-points points.json --output sprite.png
//! mrsprite inspect points.json --json
//! ```

#![allow(clippy::print_stdout)]

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

use mrsprite::cli::{Cli, Command};
use mrsprite::{CliError, commands, logger};

fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    match cli.command {
        Command::Render(ref args) => {
            let summary = commands::render(args)?;
            log::info!(
                "rendered {} points to {} ({})",
                summary.points,
                args.output.display(),
                summary.format,
            );
        }
        Command::Replay(ref args) => {
            let summary = commands::replay(args)?;
            log::info!(
                "replayed {} events: {} inserted, {} rejected, {} deleted, {} moves, {} points left",
                summary.events,
                summary.inserted,
                summary.rejected,
                summary.deleted,
                summary.moved,
                summary.points,
            );
            if summary.skipped > 0 {
                log::warn!("synthesis skipped on {} refreshes", summary.skipped);
            }
        }
        Command::Inspect(ref args) => {
            let (report, text) = commands::inspect(args)?;
            println!("{text}");
            if !report.is_clean() {
                return Ok(ExitCode::from(2));
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    });

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
