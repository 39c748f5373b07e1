// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dispatch over the closed type-variant sum.
//!
//! [`walk_type`] matches on the category and invokes one hook per
//! variant. Composite hooks default to recursion through the
//! `recurse_*` helpers; an override that wants the default descent
//! simply calls the helper itself, possibly wrapped in its own
//! bookkeeping (the CSV header visitor does exactly that to build
//! `a.b[0].c` paths).

use crate::error::{Error, Result};
use crate::model::{
    ArraySpec, CompoundSpec, ContainerSpec, EnumSpec, Field, NumericKind, PointerSpec, Type,
    TypeKind,
};
use crate::registry::Registry;

/// Tolerant type visitor: every hook is provided, scalars default to
/// "keep walking" and composites to plain recursion. Override only what
/// you need.
pub trait TypeVisit {
    /// The null type. Tolerant visitors accept it.
    fn visit_null(&mut self, ty: &Type) -> Result<bool> {
        let _ = ty;
        Ok(true)
    }

    /// A fixed-width numeric.
    fn visit_numeric(&mut self, ty: &Type, kind: NumericKind) -> Result<bool> {
        let _ = (ty, kind);
        Ok(true)
    }

    /// A character type.
    fn visit_character(&mut self, ty: &Type) -> Result<bool> {
        let _ = ty;
        Ok(true)
    }

    /// An enumeration.
    fn visit_enum(&mut self, ty: &Type, spec: &EnumSpec) -> Result<bool> {
        let _ = (ty, spec);
        Ok(true)
    }

    /// An opaque leaf.
    fn visit_opaque(&mut self, ty: &Type) -> Result<bool> {
        let _ = ty;
        Ok(true)
    }

    /// A pointer; the default descends into the pointee type.
    fn visit_pointer(&mut self, reg: &Registry, ty: &Type, spec: &PointerSpec) -> Result<bool>
    where
        Self: Sized,
    {
        let _ = ty;
        recurse_pointer(self, reg, spec)
    }

    /// An array; the default descends into the element type once.
    fn visit_array(&mut self, reg: &Registry, ty: &Type, spec: &ArraySpec) -> Result<bool>
    where
        Self: Sized,
    {
        let _ = ty;
        recurse_array(self, reg, spec)
    }

    /// A container; the default descends into the element type.
    fn visit_container(&mut self, reg: &Registry, ty: &Type, spec: &ContainerSpec) -> Result<bool>
    where
        Self: Sized,
    {
        let _ = ty;
        recurse_container(self, reg, spec)
    }

    /// A compound; the default iterates its fields in declaration order.
    fn visit_compound(&mut self, reg: &Registry, ty: &Type, spec: &CompoundSpec) -> Result<bool>
    where
        Self: Sized,
    {
        recurse_fields(self, reg, ty, spec)
    }

    /// One field of a compound; the default descends into its type.
    fn visit_field(&mut self, reg: &Registry, compound: &Type, field: &Field) -> Result<bool>
    where
        Self: Sized,
    {
        let _ = compound;
        recurse_field(self, reg, field)
    }
}

/// Strict type visitor: every scalar hook must be provided, and null
/// types abort the walk with [`Error::NullTypeFound`] unless overridden.
///
/// Any `TypeVisitStrict` is automatically a [`TypeVisit`], so both
/// flavors share [`walk_type`].
pub trait TypeVisitStrict {
    /// A fixed-width numeric.
    fn visit_numeric(&mut self, ty: &Type, kind: NumericKind) -> Result<bool>;

    /// A character type.
    fn visit_character(&mut self, ty: &Type) -> Result<bool>;

    /// An enumeration.
    fn visit_enum(&mut self, ty: &Type, spec: &EnumSpec) -> Result<bool>;

    /// An opaque leaf.
    fn visit_opaque(&mut self, ty: &Type) -> Result<bool>;

    /// The null type: rejected by default.
    fn visit_null(&mut self, ty: &Type) -> Result<bool> {
        Err(Error::NullTypeFound(ty.name().to_string()))
    }

    /// A pointer; the default descends into the pointee type.
    fn visit_pointer(&mut self, reg: &Registry, ty: &Type, spec: &PointerSpec) -> Result<bool>
    where
        Self: Sized,
    {
        let _ = ty;
        recurse_pointer(self, reg, spec)
    }

    /// An array; the default descends into the element type once.
    fn visit_array(&mut self, reg: &Registry, ty: &Type, spec: &ArraySpec) -> Result<bool>
    where
        Self: Sized,
    {
        let _ = ty;
        recurse_array(self, reg, spec)
    }

    /// A container; the default descends into the element type.
    fn visit_container(&mut self, reg: &Registry, ty: &Type, spec: &ContainerSpec) -> Result<bool>
    where
        Self: Sized,
    {
        let _ = ty;
        recurse_container(self, reg, spec)
    }

    /// A compound; the default iterates its fields in declaration order.
    fn visit_compound(&mut self, reg: &Registry, ty: &Type, spec: &CompoundSpec) -> Result<bool>
    where
        Self: Sized,
    {
        recurse_fields(self, reg, ty, spec)
    }

    /// One field of a compound; the default descends into its type.
    fn visit_field(&mut self, reg: &Registry, compound: &Type, field: &Field) -> Result<bool>
    where
        Self: Sized,
    {
        let _ = compound;
        recurse_field(self, reg, field)
    }
}

impl<V: TypeVisitStrict> TypeVisit for V {
    fn visit_null(&mut self, ty: &Type) -> Result<bool> {
        TypeVisitStrict::visit_null(self, ty)
    }

    fn visit_numeric(&mut self, ty: &Type, kind: NumericKind) -> Result<bool> {
        TypeVisitStrict::visit_numeric(self, ty, kind)
    }

    fn visit_character(&mut self, ty: &Type) -> Result<bool> {
        TypeVisitStrict::visit_character(self, ty)
    }

    fn visit_enum(&mut self, ty: &Type, spec: &EnumSpec) -> Result<bool> {
        TypeVisitStrict::visit_enum(self, ty, spec)
    }

    fn visit_opaque(&mut self, ty: &Type) -> Result<bool> {
        TypeVisitStrict::visit_opaque(self, ty)
    }

    fn visit_pointer(&mut self, reg: &Registry, ty: &Type, spec: &PointerSpec) -> Result<bool> {
        TypeVisitStrict::visit_pointer(self, reg, ty, spec)
    }

    fn visit_array(&mut self, reg: &Registry, ty: &Type, spec: &ArraySpec) -> Result<bool> {
        TypeVisitStrict::visit_array(self, reg, ty, spec)
    }

    fn visit_container(&mut self, reg: &Registry, ty: &Type, spec: &ContainerSpec) -> Result<bool> {
        TypeVisitStrict::visit_container(self, reg, ty, spec)
    }

    fn visit_compound(&mut self, reg: &Registry, ty: &Type, spec: &CompoundSpec) -> Result<bool> {
        TypeVisitStrict::visit_compound(self, reg, ty, spec)
    }

    fn visit_field(&mut self, reg: &Registry, compound: &Type, field: &Field) -> Result<bool> {
        TypeVisitStrict::visit_field(self, reg, compound, field)
    }
}

/// Dispatch one type to the matching hook of `visitor`.
///
/// Returns whatever the hook returns: `Ok(false)` propagates upward and
/// terminates the walk cleanly.
pub fn walk_type<V: TypeVisit>(visitor: &mut V, reg: &Registry, ty: &Type) -> Result<bool> {
    match ty.kind() {
        TypeKind::Null => visitor.visit_null(ty),
        TypeKind::Numeric(kind) => visitor.visit_numeric(ty, *kind),
        TypeKind::Character => visitor.visit_character(ty),
        TypeKind::Enum(spec) => visitor.visit_enum(ty, spec),
        TypeKind::Opaque => visitor.visit_opaque(ty),
        TypeKind::Pointer(spec) => visitor.visit_pointer(reg, ty, spec),
        TypeKind::Array(spec) => visitor.visit_array(reg, ty, spec),
        TypeKind::Container(spec) => visitor.visit_container(reg, ty, spec),
        TypeKind::Compound(spec) => visitor.visit_compound(reg, ty, spec),
    }
}

/// Default descent of a pointer: dispatch the pointee type.
pub fn recurse_pointer<V: TypeVisit>(
    visitor: &mut V,
    reg: &Registry,
    spec: &PointerSpec,
) -> Result<bool> {
    walk_type(visitor, reg, reg.get(&spec.pointee)?)
}

/// Default descent of an array: dispatch the element type once.
pub fn recurse_array<V: TypeVisit>(
    visitor: &mut V,
    reg: &Registry,
    spec: &ArraySpec,
) -> Result<bool> {
    walk_type(visitor, reg, reg.get(&spec.element)?)
}

/// Default descent of a container: dispatch the element type.
pub fn recurse_container<V: TypeVisit>(
    visitor: &mut V,
    reg: &Registry,
    spec: &ContainerSpec,
) -> Result<bool> {
    walk_type(visitor, reg, reg.get(&spec.element)?)
}

/// Default descent of a compound: invoke the field hook per field, in
/// declaration order, stopping early when a hook returns `Ok(false)`.
pub fn recurse_fields<V: TypeVisit>(
    visitor: &mut V,
    reg: &Registry,
    compound: &Type,
    spec: &CompoundSpec,
) -> Result<bool> {
    for field in spec.fields() {
        if !visitor.visit_field(reg, compound, field)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Default descent of one field: dispatch the field's type.
pub fn recurse_field<V: TypeVisit>(visitor: &mut V, reg: &Registry, field: &Field) -> Result<bool> {
    walk_type(visitor, reg, reg.get(&field.type_name)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CompoundBuilder, EnumBuilder};
    use crate::registry::Registry;

    /// Collects the names of every scalar leaf in visit order.
    #[derive(Default)]
    struct LeafCollector {
        leaves: Vec<String>,
    }

    impl TypeVisit for LeafCollector {
        fn visit_numeric(&mut self, ty: &Type, _kind: NumericKind) -> Result<bool> {
            self.leaves.push(ty.name().to_string());
            Ok(true)
        }

        fn visit_character(&mut self, ty: &Type) -> Result<bool> {
            self.leaves.push(ty.name().to_string());
            Ok(true)
        }

        fn visit_enum(&mut self, ty: &Type, _spec: &EnumSpec) -> Result<bool> {
            self.leaves.push(ty.name().to_string());
            Ok(true)
        }
    }

    fn sample_registry() -> Registry {
        let mut reg = Registry::with_standard_types().unwrap();
        reg.add(
            EnumBuilder::new("/Mode")
                .symbol("OFF")
                .symbol("ON")
                .build()
                .unwrap(),
        )
        .unwrap();
        reg.add(
            CompoundBuilder::new("/Reading", 12)
                .field("id", "/int32_t", 0)
                .field("mode", "/Mode", 4)
                .field("raw", "/uint32_t", 8)
                .build()
                .unwrap(),
        )
        .unwrap();
        reg
    }

    #[test]
    fn compound_fields_in_declaration_order() {
        let reg = sample_registry();
        let mut collector = LeafCollector::default();
        let done = walk_type(&mut collector, &reg, reg.get("/Reading").unwrap()).unwrap();
        assert!(done);
        assert_eq!(collector.leaves, ["/int32_t", "/Mode", "/uint32_t"]);
    }

    #[test]
    fn early_termination_stops_iteration() {
        struct StopAtFirst {
            seen: usize,
        }
        impl TypeVisit for StopAtFirst {
            fn visit_numeric(&mut self, _ty: &Type, _kind: NumericKind) -> Result<bool> {
                self.seen += 1;
                Ok(false)
            }
            fn visit_enum(&mut self, _ty: &Type, _spec: &EnumSpec) -> Result<bool> {
                self.seen += 1;
                Ok(false)
            }
        }

        let reg = sample_registry();
        let mut v = StopAtFirst { seen: 0 };
        let done = walk_type(&mut v, &reg, reg.get("/Reading").unwrap()).unwrap();
        assert!(!done);
        assert_eq!(v.seen, 1);
    }

    #[test]
    fn arrays_and_pointers_recurse_into_targets() {
        let mut reg = sample_registry();
        reg.build_array("/Reading", 3).unwrap();
        let mut collector = LeafCollector::default();
        walk_type(&mut collector, &reg, reg.get("/Reading[3]").unwrap()).unwrap();
        // type-level walk descends once, not per element
        assert_eq!(collector.leaves.len(), 3);

        reg.build_pointer("/int32_t").unwrap();
        let mut collector = LeafCollector::default();
        walk_type(&mut collector, &reg, reg.get("/int32_t*").unwrap()).unwrap();
        assert_eq!(collector.leaves, ["/int32_t"]);
    }

    #[test]
    fn strict_visitor_rejects_null() {
        struct Strict;
        impl TypeVisitStrict for Strict {
            fn visit_numeric(&mut self, _ty: &Type, _kind: NumericKind) -> Result<bool> {
                Ok(true)
            }
            fn visit_character(&mut self, _ty: &Type) -> Result<bool> {
                Ok(true)
            }
            fn visit_enum(&mut self, _ty: &Type, _spec: &EnumSpec) -> Result<bool> {
                Ok(true)
            }
            fn visit_opaque(&mut self, _ty: &Type) -> Result<bool> {
                Ok(true)
            }
        }

        let reg = sample_registry();
        let err = walk_type(&mut Strict, &reg, reg.get("/nil").unwrap()).unwrap_err();
        assert!(matches!(err, Error::NullTypeFound(_)));
        // scalars still work
        assert!(walk_type(&mut Strict, &reg, reg.get("/int32_t").unwrap()).unwrap());
    }

    #[test]
    fn tolerant_visitor_accepts_null() {
        let reg = sample_registry();
        let mut collector = LeafCollector::default();
        assert!(walk_type(&mut collector, &reg, reg.get("/nil").unwrap()).unwrap());
    }

    #[test]
    fn missing_pointee_fails_at_walk_time() {
        let mut reg = Registry::default();
        reg.build_pointer("/ghost").unwrap();
        let mut collector = LeafCollector::default();
        let err = walk_type(&mut collector, &reg, reg.get("/ghost*").unwrap()).unwrap_err();
        assert!(matches!(err, Error::TargetMissing(_)));
    }
}
