// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::cast_possible_truncation)] // Test parameters
#![allow(clippy::missing_panics_doc)] // Tests panic on failure

//! End-to-end walks: seeded primitives, compound and array buffers,
//! enum symbol resolution, container plug-ins and alias round-trips.

use memlayout::{
    export_xml, import_xml, BufferSource, CompoundBuilder, ContainerKind, EnumBuilder, EnumSpec,
    Registry, Result, Scalar, Type, ValueVisit, ValueWalk, WalkEnv,
};

/// Collects `(leaf name, integer value)` pairs in visit order.
#[derive(Default)]
struct Trace {
    leaves: Vec<(String, i64)>,
}

impl ValueVisit for Trace {
    fn visit_numeric(&mut self, ty: &Type, value: Scalar) -> Result<bool> {
        self.leaves
            .push((ty.name().to_string(), value.as_i64().unwrap_or(0)));
        Ok(true)
    }

    fn visit_enum(&mut self, ty: &Type, spec: &EnumSpec, value: i64) -> Result<bool> {
        let cell = match spec.symbol_of(value) {
            Some(symbol) => (format!("{}:{}", ty.name(), symbol), value),
            None => (ty.name().to_string(), value),
        };
        self.leaves.push(cell);
        Ok(true)
    }
}

fn compound_registry() -> Registry {
    let mut reg = Registry::with_standard_types().unwrap();
    reg.add(
        CompoundBuilder::new("/S", 8)
            .field("a", "/int8_t", 0)
            .field("b", "/int32_t", 4)
            .build()
            .unwrap(),
    )
    .unwrap();
    reg
}

#[test]
fn seeded_primitives_resolve_c_spellings() {
    let reg = Registry::with_standard_types().unwrap();
    assert!(reg.has("/int"));
    let int = reg.get("/int").unwrap();
    assert_eq!(int.name(), "/int32_t");
    assert_eq!(int.size(), 4);
    assert!(std::ptr::eq(int, reg.get("/signed").unwrap()));
}

#[test]
fn compound_walk_yields_leaf_sequence() {
    let reg = compound_registry();
    let buf = [0x01u8, 0x00, 0x00, 0x00, 0x2a, 0x00, 0x00, 0x00];
    let source = BufferSource::new(0, &buf);
    let mut walk = ValueWalk::new(&reg, &source);
    let mut trace = Trace::default();
    walk.apply(&mut trace, reg.get("/S").unwrap(), 0).unwrap();
    assert_eq!(
        trace.leaves,
        [("/int8_t".to_string(), 1), ("/int32_t".to_string(), 42)]
    );
    assert_eq!(walk.depth(), 0);
}

#[test]
fn array_of_compound_walks_both_elements() {
    let mut reg = compound_registry();
    reg.add(Type::array("/arr", "/S", 2, 16).unwrap()).unwrap();

    let one = [0x01u8, 0x00, 0x00, 0x00, 0x2a, 0x00, 0x00, 0x00];
    let mut buf = Vec::new();
    buf.extend_from_slice(&one);
    buf.extend_from_slice(&one);

    let source = BufferSource::new(0, &buf);
    let mut walk = ValueWalk::new(&reg, &source);
    let mut trace = Trace::default();
    walk.apply(&mut trace, reg.get("/arr").unwrap(), 0).unwrap();

    let values: Vec<i64> = trace.leaves.iter().map(|(_, v)| *v).collect();
    assert_eq!(values, [1, 42, 1, 42]);
}

#[test]
fn enum_walk_resolves_symbols_with_integer_fallback() {
    let mut reg = Registry::with_standard_types().unwrap();
    reg.add(
        EnumBuilder::new("/E")
            .symbol("RED")
            .symbol("GREEN")
            .symbol("BLUE")
            .build()
            .unwrap(),
    )
    .unwrap();
    let e = reg.get("/E").unwrap();
    assert_eq!(e.size(), 4);

    let buf = [0x01u8, 0x00, 0x00, 0x00];
    let source = BufferSource::new(0, &buf);
    let mut walk = ValueWalk::new(&reg, &source);
    let mut trace = Trace::default();
    walk.apply(&mut trace, e, 0).unwrap();
    assert_eq!(trace.leaves, [("/E:GREEN".to_string(), 1)]);

    // value without a symbol is delivered as the raw integer
    let buf = [0x07u8, 0x00, 0x00, 0x00];
    let source = BufferSource::new(0, &buf);
    let mut walk = ValueWalk::new(&reg, &source);
    let mut trace = Trace::default();
    walk.apply(&mut trace, e, 0).unwrap();
    assert_eq!(trace.leaves, [("/E".to_string(), 7)]);
    assert!(matches!(
        e.enum_symbol(7),
        Err(memlayout::Error::ValueNotFound { value: 7, .. })
    ));
}

/// A container plug-in that reports a fixed list of element addresses,
/// the way a recorder-specific collection would.
struct FixedSeq {
    addresses: Vec<u64>,
}

impl ContainerKind for FixedSeq {
    fn name(&self) -> &str {
        "/test/seq"
    }

    fn build(&self, registry: &Registry, args: &[&str]) -> Result<Type> {
        let element = registry.get(args[0])?;
        Type::container(
            format!("/test/seq<{}>", element.name()),
            "/test/seq",
            element.name(),
            8,
        )
    }

    fn walk_elements(
        &self,
        _env: &WalkEnv<'_>,
        _ty: &Type,
        _addr: u64,
        each: &mut dyn FnMut(usize, u64) -> Result<bool>,
    ) -> Result<bool> {
        for (index, addr) in self.addresses.iter().enumerate() {
            if !each(index, *addr)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[test]
fn container_plugin_drives_element_callbacks() {
    let mut reg = Registry::with_standard_types().unwrap();
    reg.container_kinds_mut().register(Box::new(FixedSeq {
        addresses: vec![0x100, 0x104, 0x108],
    }));
    reg.build_container("/test/seq", &["/int32_t"]).unwrap();

    let mut buf = vec![0u8; 0x10c];
    for (i, v) in [11i32, 22, 33].iter().enumerate() {
        let at = 0x100 + i * 4;
        buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
    }
    let source = BufferSource::new(0, &buf);
    let mut walk = ValueWalk::new(&reg, &source);
    let mut trace = Trace::default();
    walk.apply(&mut trace, reg.get("/test/seq</int32_t>").unwrap(), 0)
        .unwrap();

    let values: Vec<i64> = trace.leaves.iter().map(|(_, v)| *v).collect();
    assert_eq!(values, [11, 22, 33]);
    assert_eq!(walk.depth(), 0);
}

#[test]
fn alias_roundtrip_through_text_format() {
    let mut reg = Registry::with_standard_types().unwrap();
    reg.alias("/int32_t", "/foo").unwrap();

    let xml = export_xml(&reg);
    let reloaded = import_xml(&xml, *reg.config()).unwrap();

    let foo = reloaded.get("/foo").unwrap();
    assert_eq!(foo.name(), "/int32_t");
    assert!(std::ptr::eq(foo, reloaded.get("/int32_t").unwrap()));
}

#[test]
fn every_seeded_reference_is_closed() {
    let reg = Registry::with_standard_types().unwrap();
    for ty in reg.iter() {
        if let Some(spec) = ty.array_spec() {
            assert!(reg.has(&spec.element));
        }
        if let Some(fields) = ty.fields() {
            for field in fields {
                assert!(reg.has(&field.type_name), "{} dangles", field.type_name);
            }
        }
        if let Some(spec) = ty.container_spec() {
            assert!(reg.has(&spec.element));
        }
    }
}

#[test]
fn empty_compound_walks_as_leaf() {
    let mut reg = Registry::with_standard_types().unwrap();
    reg.add(CompoundBuilder::new("/Blob", 16).build().unwrap())
        .unwrap();

    struct CountCompound(usize);
    impl ValueVisit for CountCompound {
        fn visit_compound(
            &mut self,
            walk: &mut ValueWalk<'_>,
            ty: &Type,
            spec: &memlayout::CompoundSpec,
            addr: u64,
        ) -> Result<bool> {
            self.0 += 1;
            walk.each_field(self, ty, spec, addr)
        }
    }

    let buf = [0u8; 16];
    let source = BufferSource::new(0, &buf);
    let mut walk = ValueWalk::new(&reg, &source);
    let mut counter = CountCompound(0);
    assert!(walk
        .apply(&mut counter, reg.get("/Blob").unwrap(), 0)
        .unwrap());
    assert_eq!(counter.0, 1);
}
