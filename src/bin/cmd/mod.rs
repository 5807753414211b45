// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI subcommands.

mod frame;
mod id;
mod plugins;

pub use frame::FrameCmd;
pub use id::IdCmd;
pub use plugins::PluginsCmd;
