// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Transcodec CLI
//!
//! Command-line access to the plugin registry and composite identifiers.
//!
//! ## Usage
//!
//! ```sh
//! # List registered plugins
//! transcodec plugins list
//!
//! # Compute the composite identifier of a pipeline
//! transcodec id encode --serializer json --processors zstd,crc32
//!
//! # Explain a composite identifier
//! transcodec id decode 0x0110200000000000
//!
//! # Frame a JSON document and restore it
//! transcodec frame pack input.json output.bin --serializer json --processors zstd
//! transcodec frame unpack output.bin restored.json
//! ```

mod cmd;
mod common;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use cmd::{FrameCmd, IdCmd, PluginsCmd};
use common::{Context, Result};

/// Transcodec - pluggable serializer/processor pipelines
///
/// Every pipeline is identified by a 64-bit composite identifier: one
/// serializer byte followed by up to seven processor bytes.
#[derive(Parser, Clone)]
#[command(name = "transcodec")]
#[command(about = "Serializer and processor pipelines with self-describing identifiers", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    /// Registry configuration file (TOML); all built-ins when omitted
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Inspect registered plugins
    #[command(subcommand)]
    Plugins(PluginsCmd),

    /// Encode and decode composite identifiers
    #[command(subcommand)]
    Id(IdCmd),

    /// Pack and unpack framed documents
    #[command(subcommand)]
    Frame(FrameCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let ctx = Context::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Plugins(cmd) => cmd.run(&ctx),
        Commands::Id(cmd) => cmd.run(&ctx),
        Commands::Frame(cmd) => cmd.run(&ctx),
    }
}

fn main() {
    let result = run();

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
