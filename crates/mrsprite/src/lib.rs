//! mrsprite: command-line front end for the sprite synthesizer.
//!
//! The binary parses [`cli::Cli`] and hands each subcommand to
//! [`commands`]. Everything here is a library so the subcommands can be
//! driven from tests without spawning a process.

pub mod cli;
pub mod commands;
pub mod logger;

use std::path::PathBuf;

/// Errors surfaced by a subcommand.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// `--config-json` did not parse.
    #[error("invalid --config-json: {0}")]
    Config(#[source] serde_json::Error),

    /// The event script could not be read.
    #[error("cannot read script {}: {source}", path.display())]
    ScriptUnreadable {
        /// Script path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The event script is not a JSON array of editor events.
    #[error("malformed script {}: {source}", path.display())]
    ScriptMalformed {
        /// Script path.
        path: PathBuf,
        /// Parse error.
        source: serde_json::Error,
    },

    /// A point list could not be loaded or saved.
    #[error(transparent)]
    Persistence(#[from] mrsprite_io::PersistenceFailure),

    /// A texture or preview could not be exported.
    #[error(transparent)]
    Export(#[from] mrsprite_io::ExportFailure),

    /// Synthesis could not run.
    #[error(transparent)]
    Core(#[from] mrsprite_core::CoreError),

    /// A text output (SVG, report) could not be written.
    #[error("cannot write {}: {source}", path.display())]
    Write {
        /// Output path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The report could not be serialized.
    #[error("cannot serialize report: {0}")]
    Report(#[source] serde_json::Error),
}
