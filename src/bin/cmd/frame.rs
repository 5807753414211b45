// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Frame command - pack JSON documents into framed pipelines and back.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Subcommand;
use serde_json::Value;
use transcodec::pipeline::{self, Pipeline};

use crate::common::{format_size, split_names, Context, Result};

/// Frame operations.
#[derive(Subcommand, Clone, Debug)]
pub enum FrameCmd {
    /// Serialize and process a JSON document into a frame
    Pack {
        /// Input JSON file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output frame file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Serializer name
        #[arg(short, long, default_value = "json")]
        serializer: String,

        /// Comma separated processor names, in forward order
        #[arg(short, long, default_value = "")]
        processors: String,

        /// Transform option override (key=value), repeatable
        #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
        options: Vec<String>,
    },

    /// Reverse a frame and write the document as pretty JSON
    Unpack {
        /// Input frame file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output JSON file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Transform option override (key=value), repeatable
        #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
        options: Vec<String>,
    },

    /// Show the pipeline a frame was produced with
    Info {
        /// Input frame file
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
}

impl FrameCmd {
    pub fn run(self, ctx: &Context) -> Result<()> {
        match self {
            FrameCmd::Pack {
                input,
                output,
                serializer,
                processors,
                options,
            } => cmd_pack(ctx, input, output, &serializer, &processors, &options),
            FrameCmd::Unpack {
                input,
                output,
                options,
            } => cmd_unpack(ctx, input, output, &options),
            FrameCmd::Info { input } => cmd_info(ctx, input),
        }
    }
}

fn cmd_pack(
    ctx: &Context,
    input: PathBuf,
    output: PathBuf,
    serializer: &str,
    processors: &str,
    overrides: &[String],
) -> Result<()> {
    let options = ctx.options_with(overrides)?;
    let pipeline = Pipeline::from_names(&ctx.registry, serializer, &split_names(processors))?;

    let reader = BufReader::new(
        File::open(&input).with_context(|| format!("opening {}", input.display()))?,
    );
    let value: Value = serde_json::from_reader(reader)
        .with_context(|| format!("parsing {} as JSON", input.display()))?;

    let frame = pipeline.to_frame(&value, &options)?;
    fs::write(&output, &frame).with_context(|| format!("writing {}", output.display()))?;

    println!(
        "{} -> {} ({}, id {})",
        input.display(),
        output.display(),
        format_size(frame.len() as u64),
        pipeline.id()
    );
    Ok(())
}

fn cmd_unpack(ctx: &Context, input: PathBuf, output: PathBuf, overrides: &[String]) -> Result<()> {
    let options = ctx.options_with(overrides)?;
    let frame = fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
    let value = pipeline::from_frame(&ctx.registry, &frame, &options)?;

    let text = serde_json::to_string_pretty(&value)?;
    fs::write(&output, text).with_context(|| format!("writing {}", output.display()))?;
    println!("{} -> {}", input.display(), output.display());
    Ok(())
}

fn cmd_info(ctx: &Context, input: PathBuf) -> Result<()> {
    let frame = fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
    let pipeline = pipeline::resolve_frame(&ctx.registry, &mut frame.as_slice())?;

    println!("=== {} ===", input.display());
    println!("Identifier:  {}", pipeline.id());
    println!("Serializer:  {}", pipeline.serializer().name());
    let names: Vec<&str> = pipeline.processors().iter().map(|p| p.name()).collect();
    println!(
        "Processors:  {}",
        if names.is_empty() {
            "(none)".to_string()
        } else {
            names.join(" -> ")
        }
    );
    println!("Size:        {}", format_size(frame.len() as u64));
    Ok(())
}
