// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Plugins command - list registered serializers and processors.

use clap::Subcommand;
use serde::Serialize;

use crate::common::{Context, Result};

/// Plugin catalog operations.
#[derive(Subcommand, Clone, Debug)]
pub enum PluginsCmd {
    /// List every registered plugin with its identifier
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct PluginEntry {
    kind: &'static str,
    name: &'static str,
    identifier: String,
}

impl PluginsCmd {
    pub fn run(self, ctx: &Context) -> Result<()> {
        match self {
            PluginsCmd::List { json } => cmd_list(ctx, json),
        }
    }
}

fn cmd_list(ctx: &Context, json: bool) -> Result<()> {
    let mut entries: Vec<PluginEntry> = ctx
        .registry
        .serializers()
        .values()
        .map(|s| PluginEntry {
            kind: "serializer",
            name: s.name(),
            identifier: format!("{:#04x}", s.identifier()),
        })
        .collect();
    entries.extend(ctx.registry.processors().values().map(|p| PluginEntry {
        kind: "processor",
        name: p.name(),
        identifier: format!("{:#04x}", p.identifier()),
    }));

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{:<12} {:<10} {:<6}", "KIND", "NAME", "ID");
    for entry in &entries {
        println!(
            "{:<12} {:<10} {:<6}",
            entry.kind, entry.name, entry.identifier
        );
    }
    Ok(())
}
