// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Container plug-ins.
//!
//! A container kind is a named plug-in that knows two things about a
//! variable-size collection: how to build a [`Type`] for it (the
//! factory) and how to enumerate the addresses of its elements in a raw
//! value (the iteration). The engine never learns the storage details;
//! it hands the plug-in a [`WalkEnv`] and a per-element callback.
//!
//! Kinds live in an explicit [`ContainerKinds`] set owned by the
//! registry, installed at seeding time; there is no hidden global.
//!
//! The built-in kinds model the LP64 libstdc++ layouts: `std::vector`
//! is three pointers (begin, end, end-of-capacity), `std::string` is a
//! data pointer, a length and a 16-byte small-string block. Other ABIs
//! need their own plug-ins.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::model::{Category, Type};
use crate::registry::Registry;
use crate::visit::WalkEnv;

/// A pluggable implementation of one container family.
pub trait ContainerKind: Send + Sync {
    /// Canonical kind name, e.g. `/std/vector`.
    fn name(&self) -> &str;

    /// Build the container [`Type`] for the given element references.
    /// The instance name (e.g. `/std/vector</int32_t>`) is synthesized
    /// here; the caller registers the result.
    fn build(&self, registry: &Registry, args: &[&str]) -> Result<Type>;

    /// Enumerate the elements of the container value at `addr`, calling
    /// `each(index, element_addr)` once per element in logical order.
    /// Stops and returns `Ok(false)` when the callback does.
    fn walk_elements(
        &self,
        env: &WalkEnv<'_>,
        ty: &Type,
        addr: u64,
        each: &mut dyn FnMut(usize, u64) -> Result<bool>,
    ) -> Result<bool>;
}

/// The set of installed container kinds.
#[derive(Default)]
pub struct ContainerKinds {
    kinds: HashMap<String, Box<dyn ContainerKind>>,
}

impl ContainerKinds {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A set with the built-in kinds installed.
    #[must_use]
    pub fn with_standard() -> Self {
        let mut kinds = Self::new();
        kinds.register(Box::new(StdString));
        kinds.register(Box::new(StdVector));
        kinds
    }

    /// Install a kind, replacing any previous one of the same name.
    pub fn register(&mut self, kind: Box<dyn ContainerKind>) {
        self.kinds.insert(kind.name().to_string(), kind);
    }

    /// Look a kind up by its canonical name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn ContainerKind> {
        self.kinds.get(name).map(Box::as_ref)
    }

    /// Installed kind names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.kinds.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of installed kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether no kind is installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl fmt::Debug for ContainerKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContainerKinds").field(&self.names()).finish()
    }
}

fn element_spec<'t>(ty: &'t Type) -> Result<&'t str> {
    ty.container_spec()
        .map(|spec| spec.element.as_str())
        .ok_or_else(|| Error::UnsupportedType {
            name: ty.name().to_string(),
            reason: "not a container type".to_string(),
        })
}

/// `std::vector<T>`: begin/end/end-of-capacity pointers, elements
/// contiguous from `begin`.
pub struct StdVector;

impl StdVector {
    /// Canonical kind name.
    pub const NAME: &'static str = "/std/vector";
}

impl ContainerKind for StdVector {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn build(&self, registry: &Registry, args: &[&str]) -> Result<Type> {
        let [element] = args else {
            return Err(Error::InvalidType {
                name: Self::NAME.to_string(),
                reason: format!("expected one element type, got {}", args.len()),
            });
        };
        let element = registry.get(element)?;
        let name = format!("{}<{}>", Self::NAME, element.name());
        let size = 3 * registry.config().pointer_size;
        Type::container(name, Self::NAME, element.name(), size)
    }

    fn walk_elements(
        &self,
        env: &WalkEnv<'_>,
        ty: &Type,
        addr: u64,
        each: &mut dyn FnMut(usize, u64) -> Result<bool>,
    ) -> Result<bool> {
        let pointer_size = env.registry().config().pointer_size as u64;
        let begin = env.read_pointer(addr)?;
        let end = env.read_pointer(addr + pointer_size)?;
        let element = env.registry().get(element_spec(ty)?)?;
        let stride = element.size() as u64;
        if stride == 0 || end <= begin {
            return Ok(true);
        }
        let count = (end - begin) / stride;
        for index in 0..count {
            if !each(index as usize, begin + index * stride)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// `std::string`: data pointer, length, small-string block. Always
/// instantiated as `/std/string` over a 1-byte character element.
pub struct StdString;

impl StdString {
    /// Canonical kind name.
    pub const NAME: &'static str = "/std/string";

    /// Element type used when the factory gets no argument.
    pub const DEFAULT_ELEMENT: &'static str = "/char8_t";
}

impl ContainerKind for StdString {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn build(&self, registry: &Registry, args: &[&str]) -> Result<Type> {
        let element_name = match args {
            [] => Self::DEFAULT_ELEMENT,
            [element] => *element,
            _ => {
                return Err(Error::InvalidType {
                    name: Self::NAME.to_string(),
                    reason: format!("expected at most one element type, got {}", args.len()),
                })
            }
        };
        let element = registry.get(element_name)?;
        if element.category() != Category::Character || element.size() != 1 {
            return Err(Error::InvalidType {
                name: Self::NAME.to_string(),
                reason: format!("element {} is not a 1-byte character", element.name()),
            });
        }
        let size = 4 * registry.config().pointer_size;
        Type::container(Self::NAME, Self::NAME, element.name(), size)
    }

    fn walk_elements(
        &self,
        env: &WalkEnv<'_>,
        ty: &Type,
        addr: u64,
        each: &mut dyn FnMut(usize, u64) -> Result<bool>,
    ) -> Result<bool> {
        let pointer_size = env.registry().config().pointer_size as u64;
        let data = env.read_pointer(addr)?;
        let length = env.read_pointer(addr + pointer_size)?;
        let element = env.registry().get(element_spec(ty)?)?;
        let stride = element.size().max(1) as u64;
        for index in 0..length {
            if !each(index as usize, data + index * stride)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Read a whole `std::string` value out of the source in one go.
///
/// Convenience for renderers that want the text rather than a
/// per-character walk.
pub fn read_std_string(env: &WalkEnv<'_>, addr: u64) -> Result<String> {
    let pointer_size = env.registry().config().pointer_size as u64;
    let data = env.read_pointer(addr)?;
    let length = env.read_pointer(addr + pointer_size)?;
    let length = usize::try_from(length).map_err(|_| Error::OutOfBounds {
        addr: data,
        len: usize::MAX,
    })?;
    let bytes = env.read_bytes(data, length)?;
    Ok(String::from_utf8_lossy(bytes).into_owned())
}
