// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests panic on failure

//! Registry documents written to disk and read back.

use std::fs;

use memlayout::{
    export_xml, import_xml, CompoundBuilder, EnumBuilder, Registry, Type,
};

fn populated_registry() -> Registry {
    let mut reg = Registry::with_standard_types().unwrap();
    reg.add(
        EnumBuilder::new("/laser/State")
            .symbol("IDLE")
            .symbol_value("FAULT", 100)
            .build()
            .unwrap(),
    )
    .unwrap();
    let mut scan = CompoundBuilder::new("/laser/Scan", 24)
        .field("state", "/laser/State", 0)
        .field("count", "/uint32_t", 4)
        .field("stamp", "/uint64_t", 8)
        .field("min_range", "/double", 16)
        .align(8)
        .build()
        .unwrap();
    scan.metadata_mut().add_source_location("scan.h", 7);
    reg.add(scan).unwrap();
    reg.build_array("/laser/Scan", 4).unwrap();
    reg.build_pointer("/laser/Scan").unwrap();
    reg.build_container("/std/vector", &["/laser/Scan"]).unwrap();
    reg.alias("/laser/Scan", "/laser/LaserScan").unwrap();
    reg
}

fn assert_registries_equal(a: &Registry, b: &Registry) {
    let a_types: Vec<&Type> = a.iter().collect();
    let b_types: Vec<&Type> = b.iter().collect();
    assert_eq!(a_types.len(), b_types.len());
    for (x, y) in a_types.iter().zip(&b_types) {
        assert_eq!(x, y, "type {} does not round-trip", x.name());
    }
    assert_eq!(a.aliases(), b.aliases());
}

#[test]
fn roundtrip_through_a_file() {
    let reg = populated_registry();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.tlb");

    fs::write(&path, export_xml(&reg)).unwrap();
    let document = fs::read_to_string(&path).unwrap();
    let reloaded = import_xml(&document, *reg.config()).unwrap();

    assert_registries_equal(&reg, &reloaded);
}

#[test]
fn seeded_registry_roundtrips() {
    let reg = Registry::with_standard_types().unwrap();
    let reloaded = import_xml(&export_xml(&reg), *reg.config()).unwrap();
    assert_registries_equal(&reg, &reloaded);

    // the reloaded registry answers the same C-spelling queries
    assert_eq!(
        reloaded.get("/unsigned long int").unwrap().name(),
        reloaded.get("/long unsigned int").unwrap().name()
    );
}

#[test]
fn namespace_queries_survive_reload() {
    let reg = populated_registry();
    let reloaded = import_xml(&export_xml(&reg), *reg.config()).unwrap();
    let names: Vec<&str> = reloaded
        .iter_namespace("/laser")
        .map(Type::name)
        .collect();
    assert_eq!(
        names,
        ["/laser/State", "/laser/Scan", "/laser/Scan[4]", "/laser/Scan*"]
    );
}

#[test]
fn merge_after_reload_is_idempotent() {
    let reg = populated_registry();
    let mut reloaded = import_xml(&export_xml(&reg), *reg.config()).unwrap();
    reloaded.merge(&reg).unwrap();
    assert_eq!(reloaded.len(), reg.len());
}
