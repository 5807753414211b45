// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Id command - encode and decode composite identifiers.

use clap::Subcommand;
use transcodec::{codec, CompositeId, Pipeline};

use crate::common::{split_names, Context, Result};

/// Composite identifier operations.
#[derive(Subcommand, Clone, Debug)]
pub enum IdCmd {
    /// Compute the identifier of a serializer and processor chain
    Encode {
        /// Serializer name
        #[arg(short, long)]
        serializer: String,

        /// Comma separated processor names, in forward order
        #[arg(short, long, default_value = "")]
        processors: String,
    },

    /// Show the serializer and processors an identifier refers to
    Decode {
        /// Identifier in hex (e.g., 0x0110200000000000)
        #[arg(value_name = "ID")]
        id: CompositeId,

        /// Fail if any identifier is not registered
        #[arg(long)]
        strict: bool,
    },
}

impl IdCmd {
    pub fn run(self, ctx: &Context) -> Result<()> {
        match self {
            IdCmd::Encode {
                serializer,
                processors,
            } => cmd_encode(ctx, &serializer, &processors),
            IdCmd::Decode { id, strict } => cmd_decode(ctx, id, strict),
        }
    }
}

fn cmd_encode(ctx: &Context, serializer: &str, processors: &str) -> Result<()> {
    let pipeline = Pipeline::from_names(&ctx.registry, serializer, &split_names(processors))?;
    println!("{}", pipeline.id());
    Ok(())
}

fn cmd_decode(ctx: &Context, id: CompositeId, strict: bool) -> Result<()> {
    let decoded = codec::decode(&ctx.registry, id);
    if strict {
        decoded.clone().resolve()?;
    }

    let serializer = decoded
        .serializer()
        .map(|s| s.name().to_string())
        .unwrap_or_else(|| format!("?{:02x}", id.serializer_id()));
    let processors: Vec<String> = decoded
        .processors()
        .iter()
        .zip(id.processor_ids())
        .map(|(slot, pid)| match slot {
            Some(p) => p.name().to_string(),
            None => format!("?{pid:02x}"),
        })
        .collect();

    println!("serializer: {serializer}");
    println!("processors: {}", processors.join(" -> "));
    if !id.is_canonical() {
        println!("warning: identifier has a processor after an empty slot");
    }
    Ok(())
}
