// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Registry integration tests.
//!
//! Tests cover:
//! - Silent re-registration of the same implementation
//! - Conflicts between implementations sharing an identifier
//! - Idempotent discovery across sources
//! - Configuration-driven discovery
//! - Concurrent access

mod common;

use std::sync::Arc;
use std::thread;

use common::{builtin_registry, IdentityProcessor, XorProcessor};
use transcodec::plugin::builtin::{
    Bzip2Processor, JsonSerializer, Lz4Processor, ZstdProcessor, ZSTD_ID,
};
use transcodec::registry::{
    BuiltinSource, ChainSource, ConfigSource, LazyRegistry, PluginRegistry, Registration,
    StaticSource,
};
use transcodec::{CodecError, PluginKind, Processor, RegistryConfig};

fn catalog_view(registry: &PluginRegistry) -> Vec<(PluginKind, &'static str, u8)> {
    let mut view: Vec<_> = registry
        .serializers()
        .into_iter()
        .map(|(name, s)| (PluginKind::Serializer, name, s.identifier()))
        .collect();
    view.extend(
        registry
            .processors()
            .into_iter()
            .map(|(name, p)| (PluginKind::Processor, name, p.identifier())),
    );
    view
}

// ============================================================================
// Registration Rules
// ============================================================================

#[test]
fn test_reregistering_same_type_is_noop() {
    let registry = builtin_registry();
    let before = catalog_view(&registry);

    assert_eq!(
        registry.add_processor(ZstdProcessor).unwrap(),
        Registration::AlreadyPresent
    );
    assert_eq!(
        registry.register_processor(Arc::new(ZstdProcessor)).unwrap(),
        Registration::AlreadyPresent
    );
    assert_eq!(
        registry.add_serializer(JsonSerializer).unwrap(),
        Registration::AlreadyPresent
    );
    assert_eq!(catalog_view(&registry), before);
}

#[test]
fn test_conflicting_types_rejected() {
    let registry = builtin_registry();
    let err = registry
        .add_processor(XorProcessor::<{ ZSTD_ID }>::new("impostor"))
        .unwrap_err();

    match err {
        CodecError::ConflictingRegistration {
            kind,
            identifier,
            existing,
            incoming,
        } => {
            assert_eq!(kind, PluginKind::Processor);
            assert_eq!(identifier, ZSTD_ID);
            assert_eq!(existing, "zstd");
            assert_eq!(incoming, "impostor");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(registry.processor_of::<XorProcessor<{ ZSTD_ID }>>().is_none());
}

#[test]
fn test_second_instance_of_type_is_noop() {
    let registry = builtin_registry();
    assert_eq!(
        registry.add_processor(XorProcessor::<0x40>::new("a")).unwrap(),
        Registration::Added
    );
    assert_eq!(
        registry.add_processor(XorProcessor::<0x40>::new("b")).unwrap(),
        Registration::AlreadyPresent
    );

    assert!(registry.processor_named("b").is_none());
    let typed = registry.processor_of::<XorProcessor<0x40>>().unwrap();
    assert_eq!(typed.name(), "a");
    assert_eq!(registry.processor_count(), 5);
}

#[test]
fn test_identifier_shared_across_kinds() {
    // Serializers and processors live in separate identifier spaces.
    let registry = builtin_registry();
    registry
        .add_processor(XorProcessor::<0x01>::new("low"))
        .unwrap();
    assert_eq!(registry.serializer(0x01).unwrap().name(), "json");
    assert_eq!(registry.processor(0x01).unwrap().name(), "low");
}

#[test]
fn test_manual_plugin_decodable() {
    let registry = builtin_registry();
    registry.add_processor(IdentityProcessor).unwrap();

    let decoded = registry.decode(0x017f_1000_0000_0000u64).resolve().unwrap();
    let names: Vec<_> = decoded.processors.iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["identity", "zstd"]);
}

// ============================================================================
// Discovery
// ============================================================================

#[test]
fn test_discovery_twice_is_stable() {
    let registry = PluginRegistry::new();
    registry.discover(&BuiltinSource).unwrap();
    let first = catalog_view(&registry);

    let report = registry.discover(&BuiltinSource).unwrap();
    assert_eq!(report.added(), 0);
    assert_eq!(catalog_view(&registry), first);
}

#[test]
fn test_discovery_rejects_conflicting_candidates() {
    let source = ChainSource::new()
        .with(BuiltinSource)
        .with(StaticSource::new().with_processor(XorProcessor::<0x11>::new("fake-lz4")));

    let err = PluginRegistry::from_source(&source).unwrap_err();
    assert!(err.is_configuration_error());
    assert!(matches!(
        err,
        CodecError::ConflictingRegistration {
            identifier: 0x11,
            ..
        }
    ));
}

#[test]
fn test_discovery_after_manual_registration() {
    let registry = PluginRegistry::new();
    registry.add_processor(Lz4Processor).unwrap();
    registry.add_processor(IdentityProcessor).unwrap();

    let report = registry.discover(&BuiltinSource).unwrap();
    assert_eq!(report.processors_added, 3);
    assert_eq!(report.processors_present, 1);
    assert_eq!(registry.processor_count(), 5);
}

#[test]
fn test_config_driven_discovery() {
    let config: RegistryConfig = r#"
        [serializers]
        enabled = ["toml"]

        [processors]
        enabled = ["bzip2"]
    "#
    .parse()
    .unwrap();
    let registry = PluginRegistry::from_source(&ConfigSource::new(&config).unwrap()).unwrap();

    assert!(registry.serializer_named("json").is_none());
    assert!(registry.serializer_named("toml").is_some());
    assert!(registry.processor_of::<Bzip2Processor>().is_some());
    assert_eq!(registry.processor_count(), 1);
}

#[test]
fn test_lazy_registry_shared_between_threads() {
    let lazy = Arc::new(LazyRegistry::new(BuiltinSource));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let lazy = Arc::clone(&lazy);
            thread::spawn(move || {
                let registry = lazy.get().unwrap();
                registry.processor(ZSTD_ID).map(|p| p.name())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some("zstd"));
    }
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_readers_during_late_registration() {
    let registry = Arc::new(builtin_registry());

    let writer = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            let late: Vec<Arc<dyn Processor>> = vec![
                Arc::new(XorProcessor::<0x60>::new("late0")),
                Arc::new(XorProcessor::<0x61>::new("late1")),
                Arc::new(XorProcessor::<0x62>::new("late2")),
                Arc::new(XorProcessor::<0x63>::new("late3")),
            ];
            for processor in late {
                registry.register_processor(processor).unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for _ in 0..200 {
                    let decoded = registry.decode(0x0110_6000_0000_0000u64);
                    assert!(decoded.serializer().is_some());
                    assert!(decoded.processors()[0].is_some());
                    // Either not yet visible, or fully registered under both keys.
                    if let Some(p) = &decoded.processors()[1] {
                        assert_eq!(registry.processor_named(p.name()).unwrap().identifier(), 0x60);
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(registry.processor_count(), 8);
}
