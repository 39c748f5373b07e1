// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The owning store of type descriptions.
//!
//! A [`Registry`] maps canonical qualified names to owned [`Type`]s,
//! plus a secondary map of aliases. Types refer to each other by name,
//! so the registry forms a name-indexed DAG; every borrow handed out
//! lives as long as the registry. The lifecycle is append-only: create,
//! optionally seed, populate, then share read-only.
//!
//! # Example
//!
//! ```rust
//! use memlayout::{Registry, CompoundBuilder};
//!
//! let mut registry = Registry::with_standard_types().unwrap();
//! registry
//!     .add(
//!         CompoundBuilder::new("/Reading", 8)
//!             .field("id", "/int8_t", 0)
//!             .field("value", "/int32_t", 4)
//!             .build()
//!             .unwrap(),
//!     )
//!     .unwrap();
//!
//! assert!(registry.has("/Reading"));
//! assert_eq!(registry.get("/unsigned long int").unwrap().size(), 8);
//! ```

mod standard;

pub use standard::seed_standard_types;

use std::collections::HashMap;

use crate::config::RegistryConfig;
use crate::containers::ContainerKinds;
use crate::error::{Error, Result};
use crate::model::{Type, TypeKind};
use crate::typename::{normalize_namespace, validate_type_name};

/// Named, aliased, namespaced collection of types.
pub struct Registry {
    config: RegistryConfig,
    types: HashMap<String, Type>,
    aliases: HashMap<String, String>,
    /// Canonical names in registration order; drives iteration and the
    /// text-format export.
    order: Vec<String>,
    container_kinds: ContainerKinds,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("types", &self.types)
            .field("aliases", &self.aliases)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// An empty registry for the given target.
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        Registry {
            config,
            types: HashMap::new(),
            aliases: HashMap::new(),
            order: Vec::new(),
            container_kinds: ContainerKinds::new(),
        }
    }

    /// An LP64 little-endian registry seeded with the standard types.
    pub fn with_standard_types() -> Result<Self> {
        Self::with_standard_types_for(RegistryConfig::default())
    }

    /// A seeded registry for an explicit target configuration.
    pub fn with_standard_types_for(config: RegistryConfig) -> Result<Self> {
        let mut registry = Registry::new(config);
        seed_standard_types(&mut registry)?;
        Ok(registry)
    }

    /// The target description this registry was created with.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Installed container plug-ins.
    #[must_use]
    pub fn container_kinds(&self) -> &ContainerKinds {
        &self.container_kinds
    }

    /// Install or replace container plug-ins (construction phase only).
    pub fn container_kinds_mut(&mut self) -> &mut ContainerKinds {
        &mut self.container_kinds
    }

    /// Resolve a name (following aliases) to its canonical name.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&str> {
        if let Some((canonical, _)) = self.types.get_key_value(name) {
            return Some(canonical.as_str());
        }
        self.aliases.get(name).map(String::as_str)
    }

    /// Whether `name` (canonical or alias) is known.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Borrow the canonical type behind `name`, following aliases.
    pub fn get(&self, name: &str) -> Result<&Type> {
        self.find(name)
            .ok_or_else(|| Error::TargetMissing(name.to_string()))
    }

    /// Like [`Registry::get`], but `None` on a miss.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Type> {
        let canonical = self.resolve(name)?;
        self.types.get(canonical)
    }

    /// Mutable borrow of a canonical type, for the construction phase
    /// (attaching metadata, asserting alignment).
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Type> {
        let canonical = self
            .resolve(name)
            .ok_or_else(|| Error::TargetMissing(name.to_string()))?
            .to_string();
        self.types
            .get_mut(&canonical)
            .ok_or(Error::TargetMissing(canonical))
    }

    /// Number of canonical types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry holds no type.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Canonical types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Type> {
        self.order.iter().filter_map(|name| self.types.get(name))
    }

    /// Canonical types whose qualified name lives under `namespace`, in
    /// registration order. `/std` matches `/std/string` but not `/stdio`.
    pub fn iter_namespace<'r>(&'r self, namespace: &str) -> impl Iterator<Item = &'r Type> {
        let prefix = normalize_namespace(namespace);
        self.iter()
            .filter(move |ty| ty.name().starts_with(&prefix))
    }

    /// Whether two names denote the same type. Equality within one
    /// registry is canonical-name equality after alias resolution; the
    /// acyclic reference graph makes a structural comparison redundant.
    #[must_use]
    pub fn same_type(&self, a: &str, b: &str) -> bool {
        match (self.resolve(a), self.resolve(b)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Alias pairs `(alias, canonical)`, sorted by alias name.
    #[must_use]
    pub fn aliases(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .aliases
            .iter()
            .map(|(a, c)| (a.as_str(), c.as_str()))
            .collect();
        pairs.sort();
        pairs
    }

    /// Install a type under its canonical name.
    ///
    /// Fails with [`Error::AlreadyRegistered`] when the name is taken
    /// (as canonical or alias), with [`Error::TargetMissing`] when an
    /// array element, compound field or container element is not yet
    /// registered, and with [`Error::InvalidType`] when the declared
    /// sizes do not hold together. Pointer pointees are exempt from the
    /// existence check; they must resolve by the time the value is
    /// walked.
    pub fn add(&mut self, ty: Type) -> Result<()> {
        validate_type_name(ty.name())?;
        if self.has(ty.name()) {
            return Err(Error::AlreadyRegistered(ty.name().to_string()));
        }
        self.check_references(&ty)?;
        self.order.push(ty.name().to_string());
        self.types.insert(ty.name().to_string(), ty);
        Ok(())
    }

    fn check_references(&self, ty: &Type) -> Result<()> {
        match ty.kind() {
            TypeKind::Array(spec) => {
                let element = self.get(&spec.element)?;
                let expected = element.size() * spec.dimension;
                if ty.size() != expected {
                    return Err(Error::InvalidType {
                        name: ty.name().to_string(),
                        reason: format!(
                            "array size {} does not match {} x {}",
                            ty.size(),
                            spec.dimension,
                            element.size()
                        ),
                    });
                }
            }
            TypeKind::Compound(spec) => {
                for field in spec.fields() {
                    let field_ty = self.get(&field.type_name)?;
                    if field.offset + field_ty.size() > ty.size() {
                        return Err(Error::InvalidType {
                            name: ty.name().to_string(),
                            reason: format!(
                                "field {} at offset {} overflows size {}",
                                field.name,
                                field.offset,
                                ty.size()
                            ),
                        });
                    }
                }
                if self.config.strict_layout {
                    self.check_overlaps(ty)?;
                }
            }
            TypeKind::Container(spec) => {
                self.get(&spec.element)?;
                if self.container_kinds.get(&spec.kind).is_none() {
                    return Err(Error::UnsupportedType {
                        name: ty.name().to_string(),
                        reason: format!("unknown container kind {}", spec.kind),
                    });
                }
            }
            TypeKind::Pointer(_) => {} // resolved lazily, at walk time
            _ => {}
        }
        Ok(())
    }

    fn check_overlaps(&self, ty: &Type) -> Result<()> {
        let fields = ty.fields().unwrap_or(&[]);
        let mut spans: Vec<(usize, usize, &str)> = Vec::with_capacity(fields.len());
        for field in fields {
            let size = self.get(&field.type_name)?.size();
            spans.push((field.offset, field.offset + size, &field.name));
        }
        spans.sort();
        for pair in spans.windows(2) {
            let (_, end, first) = pair[0];
            let (start, _, second) = pair[1];
            if start < end {
                return Err(Error::InvalidType {
                    name: ty.name().to_string(),
                    reason: format!("fields {} and {} overlap", first, second),
                });
            }
        }
        Ok(())
    }

    /// Create a new name for an existing canonical entry.
    ///
    /// `canonical` may itself be an alias; it is resolved first.
    /// Aliasing is idempotent: re-binding a name to the canonical it
    /// already resolves to succeeds silently.
    pub fn alias(&mut self, canonical: &str, new_name: &str) -> Result<()> {
        validate_type_name(new_name)?;
        let target = self
            .resolve(canonical)
            .ok_or_else(|| Error::TargetMissing(canonical.to_string()))?
            .to_string();
        if let Some(existing) = self.resolve(new_name) {
            if existing == target {
                return Ok(());
            }
            return Err(Error::AliasClash {
                name: new_name.to_string(),
                existing: existing.to_string(),
                requested: target,
            });
        }
        self.aliases.insert(new_name.to_string(), target);
        Ok(())
    }

    /// Import every canonical type and alias of `other`.
    ///
    /// A name both registries define with equal structure is kept once
    /// (metadata is unioned); equal name with different structure is an
    /// [`Error::AlreadyRegistered`] conflict.
    pub fn merge(&mut self, other: &Registry) -> Result<()> {
        for ty in other.iter() {
            if let Some(existing) = self.types.get_mut(ty.name()) {
                if !existing.same_structure(ty) {
                    return Err(Error::AlreadyRegistered(ty.name().to_string()));
                }
                existing.metadata_mut().merge(ty.metadata());
                crate::debug!("merge: {} already present, unioned metadata", ty.name());
                continue;
            }
            self.add(ty.clone())?;
        }
        for (alias, canonical) in other.aliases() {
            self.alias(canonical, alias)?;
        }
        Ok(())
    }

    /// Register a fixed-length array of `element` under the derived
    /// name `<element>[dimension]`, and return it.
    pub fn build_array(&mut self, element: &str, dimension: usize) -> Result<&Type> {
        let element = self.get(element)?;
        let name = format!("{}[{}]", element.name(), dimension);
        let size = element.size() * dimension;
        let ty = Type::array(&name, element.name(), dimension, size)?;
        if !self.has(&name) {
            self.add(ty)?;
        }
        self.get(&name)
    }

    /// Register a pointer to `pointee` under the derived name
    /// `<pointee>*`, and return it. The pointee does not have to be
    /// registered yet.
    pub fn build_pointer(&mut self, pointee: &str) -> Result<&Type> {
        let pointee = self
            .resolve(pointee)
            .map_or_else(|| pointee.to_string(), str::to_string);
        let name = format!("{}*", pointee);
        if !self.has(&name) {
            let ty = Type::pointer(&name, &pointee, self.config.pointer_size)?;
            self.add(ty)?;
        }
        self.get(&name)
    }

    /// Instantiate a container through its plug-in and register it.
    ///
    /// `args` are element type references handed to the factory; the
    /// canonical name (e.g. `/std/vector</int32_t>`) is synthesized by
    /// the kind. Re-instantiating an existing container is a no-op.
    pub fn build_container(&mut self, kind: &str, args: &[&str]) -> Result<&Type> {
        let ty = {
            let kind = self
                .container_kinds
                .get(kind)
                .ok_or_else(|| Error::UnsupportedType {
                    name: kind.to_string(),
                    reason: "unknown container kind".to_string(),
                })?;
            kind.build(self, args)?
        };
        let name = ty.name().to_string();
        if !self.has(&name) {
            self.add(ty)?;
        }
        self.get(&name)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new(RegistryConfig::default())
    }
}
