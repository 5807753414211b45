// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::any::Any;
use std::io::{self, Read, Write};
use std::sync::Arc;

use transcodec::plugin::{Plugin, Processor};
use transcodec::registry::{BuiltinSource, PluginRegistry};
use transcodec::{Options, Result};

// ============================================================================
// Test Plugins
// ============================================================================

/// XORs every byte with its identifier; its own inverse.
///
/// Each identifier is a distinct type, so several can share one registry.
pub struct XorProcessor<const ID: u8> {
    pub name: &'static str,
}

impl<const ID: u8> XorProcessor<ID> {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl<const ID: u8> Plugin for XorProcessor<ID> {
    fn identifier(&self) -> u8 {
        ID
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<const ID: u8> Processor for XorProcessor<ID> {
    fn forward(&self, input: &mut dyn Read, output: &mut dyn Write, _: &Options) -> Result<u64> {
        let mut data = Vec::new();
        input.read_to_end(&mut data)?;
        data.iter_mut().for_each(|b| *b ^= ID);
        output.write_all(&data)?;
        Ok(data.len() as u64)
    }

    fn reverse(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        options: &Options,
    ) -> Result<u64> {
        self.forward(input, output, options)
    }
}

/// Passes bytes through unchanged.
pub struct IdentityProcessor;

impl Plugin for IdentityProcessor {
    fn identifier(&self) -> u8 {
        0x7f
    }

    fn name(&self) -> &'static str {
        "identity"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Processor for IdentityProcessor {
    fn forward(&self, input: &mut dyn Read, output: &mut dyn Write, _: &Options) -> Result<u64> {
        Ok(io::copy(input, output)?)
    }

    fn reverse(&self, input: &mut dyn Read, output: &mut dyn Write, _: &Options) -> Result<u64> {
        Ok(io::copy(input, output)?)
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Registry holding every built-in plugin.
pub fn builtin_registry() -> PluginRegistry {
    PluginRegistry::from_source(&BuiltinSource).expect("built-in plugins register cleanly")
}

/// XOR processors at 0x40..=0x47 named `x0`..`x7`.
pub fn xor_processors() -> Vec<Arc<dyn Processor>> {
    vec![
        Arc::new(XorProcessor::<0x40>::new("x0")),
        Arc::new(XorProcessor::<0x41>::new("x1")),
        Arc::new(XorProcessor::<0x42>::new("x2")),
        Arc::new(XorProcessor::<0x43>::new("x3")),
        Arc::new(XorProcessor::<0x44>::new("x4")),
        Arc::new(XorProcessor::<0x45>::new("x5")),
        Arc::new(XorProcessor::<0x46>::new("x6")),
        Arc::new(XorProcessor::<0x47>::new("x7")),
    ]
}

/// Registry holding the built-ins plus the first `count` XOR processors.
pub fn extended_registry(count: usize) -> PluginRegistry {
    let registry = builtin_registry();
    for processor in xor_processors().into_iter().take(count) {
        registry
            .register_processor(processor)
            .expect("xor processors have distinct identifiers");
    }
    registry
}

/// Identifiers of a processor chain, in order.
pub fn ids_of(processors: &[Arc<dyn Processor>]) -> Vec<u8> {
    processors.iter().map(|p| p.identifier()).collect()
}
