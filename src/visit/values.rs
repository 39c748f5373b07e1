// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Layout-directed walk of raw values.
//!
//! A [`ValueWalk`] pairs the type dispatch with a cursor over raw
//! bytes. The cursor is a stack of addresses: a frame is pushed when
//! the walk enters a composite and popped when it leaves, and the top
//! always points at the start of the subtree being visited. The engine
//! restores the stack on every exit path, including errors and early
//! termination, so the depth at exit equals the depth at entry.
//!
//! Addresses are plain `u64` values resolved through a [`MemorySource`].
//! The engine never dereferences memory itself; a read that the source
//! cannot satisfy surfaces as [`Error::OutOfBounds`] instead of the
//! undefined behavior a raw-pointer walk would risk.

use std::fmt;

use crate::config::ByteOrder;
use crate::error::{Error, Result};
use crate::model::{
    ArraySpec, CompoundSpec, ContainerSpec, EnumSpec, Field, NumericKind, PointerSpec, Type,
    TypeKind,
};
use crate::registry::Registry;

/// Byte provider for the value walk.
///
/// `read` returns `None` when any byte of `addr..addr+len` is outside
/// the memory the source models.
pub trait MemorySource {
    /// Borrow `len` bytes starting at `addr`.
    fn read(&self, addr: u64, len: usize) -> Option<&[u8]>;
}

/// A [`MemorySource`] over one contiguous buffer mapped at a base
/// address.
pub struct BufferSource<'b> {
    base: u64,
    bytes: &'b [u8],
}

impl<'b> BufferSource<'b> {
    /// Map `bytes` at `base`. Pointers inside the buffer are expected
    /// to hold addresses in `base..base + bytes.len()`.
    #[must_use]
    pub fn new(base: u64, bytes: &'b [u8]) -> Self {
        BufferSource { base, bytes }
    }

    /// The address the buffer starts at.
    #[must_use]
    pub fn base(&self) -> u64 {
        self.base
    }
}

impl MemorySource for BufferSource<'_> {
    fn read(&self, addr: u64, len: usize) -> Option<&[u8]> {
        let start = usize::try_from(addr.checked_sub(self.base)?).ok()?;
        let end = start.checked_add(len)?;
        self.bytes.get(start..end)
    }
}

/// A scalar delivered by value to a visitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::I8(v) => write!(f, "{}", v),
            Scalar::I16(v) => write!(f, "{}", v),
            Scalar::I32(v) => write!(f, "{}", v),
            Scalar::I64(v) => write!(f, "{}", v),
            Scalar::U8(v) => write!(f, "{}", v),
            Scalar::U16(v) => write!(f, "{}", v),
            Scalar::U32(v) => write!(f, "{}", v),
            Scalar::U64(v) => write!(f, "{}", v),
            Scalar::F32(v) => write!(f, "{}", v),
            Scalar::F64(v) => write!(f, "{}", v),
        }
    }
}

impl Scalar {
    /// The value widened to `i64`, when it is an integer.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Scalar::I8(v) => Some(i64::from(v)),
            Scalar::I16(v) => Some(i64::from(v)),
            Scalar::I32(v) => Some(i64::from(v)),
            Scalar::I64(v) => Some(v),
            Scalar::U8(v) => Some(i64::from(v)),
            Scalar::U16(v) => Some(i64::from(v)),
            Scalar::U32(v) => Some(i64::from(v)),
            Scalar::U64(v) => i64::try_from(v).ok(),
            Scalar::F32(_) | Scalar::F64(_) => None,
        }
    }

    /// The value widened to `f64`, when it is a float.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Scalar::F32(v) => Some(f64::from(v)),
            Scalar::F64(v) => Some(v),
            _ => None,
        }
    }
}

/// Read-side context handed to container plug-ins: the registry and the
/// memory source of the walk, without the cursor stack.
#[derive(Clone, Copy)]
pub struct WalkEnv<'a> {
    registry: &'a Registry,
    source: &'a dyn MemorySource,
}

impl<'a> WalkEnv<'a> {
    /// Bundle a registry and a source.
    #[must_use]
    pub fn new(registry: &'a Registry, source: &'a dyn MemorySource) -> Self {
        WalkEnv { registry, source }
    }

    /// The registry driving the walk.
    #[must_use]
    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Borrow bytes, reporting [`Error::OutOfBounds`] on a miss.
    pub fn read_bytes(&self, addr: u64, len: usize) -> Result<&'a [u8]> {
        self.source
            .read(addr, len)
            .ok_or(Error::OutOfBounds { addr, len })
    }

    /// Read one pointer-wide unsigned value at `addr`.
    pub fn read_pointer(&self, addr: u64) -> Result<u64> {
        let config = self.registry.config();
        let bytes = self.read_bytes(addr, config.pointer_size)?;
        Ok(read_uint(bytes, config.byte_order))
    }
}

fn read_uint(bytes: &[u8], order: ByteOrder) -> u64 {
    let fold = |acc: u64, b: &u8| (acc << 8) | u64::from(*b);
    match order {
        ByteOrder::Little => bytes.iter().rev().fold(0, fold),
        ByteOrder::Big => bytes.iter().fold(0, fold),
    }
}

fn read_sint(bytes: &[u8], order: ByteOrder) -> i64 {
    let raw = read_uint(bytes, order);
    let bits = bytes.len() * 8;
    if bits >= 64 {
        raw as i64
    } else {
        let shift = 64 - bits as u32;
        ((raw << shift) as i64) >> shift
    }
}

/// Visitor of raw values. Every hook is provided; scalars default to
/// "keep walking", composites to the engine recursion. `Ok(false)`
/// terminates the walk cleanly.
pub trait ValueVisit {
    /// A null value (leaf).
    fn visit_null(&mut self, ty: &Type, addr: u64) -> Result<bool> {
        let _ = (ty, addr);
        Ok(true)
    }

    /// An opaque value (leaf).
    fn visit_opaque(&mut self, ty: &Type, addr: u64) -> Result<bool> {
        let _ = (ty, addr);
        Ok(true)
    }

    /// A numeric, reinterpreted at the type's width and kind.
    fn visit_numeric(&mut self, ty: &Type, value: Scalar) -> Result<bool> {
        let _ = (ty, value);
        Ok(true)
    }

    /// A single character.
    fn visit_character(&mut self, ty: &Type, value: char) -> Result<bool> {
        let _ = (ty, value);
        Ok(true)
    }

    /// An enum value, sign-extended from its storage width. The symbol
    /// table is delivered so the visitor can look the symbol up.
    fn visit_enum(&mut self, ty: &Type, spec: &EnumSpec, value: i64) -> Result<bool> {
        let _ = (ty, spec, value);
        Ok(true)
    }

    /// A pointer value. The default follows it; the engine does no null
    /// check, that decision belongs to the visitor.
    fn visit_pointer(
        &mut self,
        walk: &mut ValueWalk<'_>,
        ty: &Type,
        spec: &PointerSpec,
        target: u64,
    ) -> Result<bool>
    where
        Self: Sized,
    {
        let _ = ty;
        walk.follow_pointer(self, spec, target)
    }

    /// An array value. The default visits every element in index order.
    fn visit_array(
        &mut self,
        walk: &mut ValueWalk<'_>,
        ty: &Type,
        spec: &ArraySpec,
        addr: u64,
    ) -> Result<bool>
    where
        Self: Sized,
    {
        let _ = ty;
        walk.each_element(self, spec, addr)
    }

    /// A compound value. The default visits every field in declaration
    /// order; a compound with no fields is thereby a leaf.
    fn visit_compound(
        &mut self,
        walk: &mut ValueWalk<'_>,
        ty: &Type,
        spec: &CompoundSpec,
        addr: u64,
    ) -> Result<bool>
    where
        Self: Sized,
    {
        walk.each_field(self, ty, spec, addr)
    }

    /// One field of a compound. The default descends into its type.
    fn visit_field(
        &mut self,
        walk: &mut ValueWalk<'_>,
        compound: &Type,
        field: &Field,
        addr: u64,
    ) -> Result<bool>
    where
        Self: Sized,
    {
        let _ = compound;
        walk.descend_field(self, field, addr)
    }

    /// A container value. The default iterates elements through the
    /// container's plug-in.
    fn visit_container(
        &mut self,
        walk: &mut ValueWalk<'_>,
        ty: &Type,
        spec: &ContainerSpec,
        addr: u64,
    ) -> Result<bool>
    where
        Self: Sized,
    {
        walk.container_elements(self, ty, spec, addr)
    }
}

/// The value-walk engine: registry, byte source and cursor stack.
pub struct ValueWalk<'r> {
    registry: &'r Registry,
    source: &'r dyn MemorySource,
    stack: Vec<u64>,
}

impl<'r> ValueWalk<'r> {
    /// A walk over `source`, typed by `registry`.
    #[must_use]
    pub fn new(registry: &'r Registry, source: &'r dyn MemorySource) -> Self {
        ValueWalk {
            registry,
            source,
            stack: Vec::new(),
        }
    }

    /// The registry driving the walk.
    #[must_use]
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// The read-side context, for visitors that fetch bytes themselves.
    #[must_use]
    pub fn env(&self) -> WalkEnv<'r> {
        WalkEnv::new(self.registry, self.source)
    }

    /// Current cursor-stack depth. Equal at entry and exit of
    /// [`ValueWalk::apply`], whatever happens in between.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Walk the value of `ty` at `addr`, delivering hooks to `visitor`.
    pub fn apply<V: ValueVisit>(&mut self, visitor: &mut V, ty: &Type, addr: u64) -> Result<bool> {
        self.stack.push(addr);
        let outcome = self.dispatch(visitor, ty, addr);
        self.stack.pop();
        outcome
    }

    fn dispatch<V: ValueVisit>(&mut self, visitor: &mut V, ty: &Type, addr: u64) -> Result<bool> {
        match ty.kind() {
            TypeKind::Null => visitor.visit_null(ty, addr),
            TypeKind::Opaque => visitor.visit_opaque(ty, addr),
            TypeKind::Numeric(kind) => {
                let value = self.read_scalar(ty, *kind, addr)?;
                visitor.visit_numeric(ty, value)
            }
            TypeKind::Character => {
                if ty.size() != 1 {
                    return Err(Error::UnsupportedType {
                        name: ty.name().to_string(),
                        reason: format!("unsupported character size {}", ty.size()),
                    });
                }
                let bytes = self.env().read_bytes(addr, 1)?;
                visitor.visit_character(ty, bytes[0] as char)
            }
            TypeKind::Enum(spec) => {
                let bytes = self.env().read_bytes(addr, ty.size())?;
                let value = read_sint(bytes, self.registry.config().byte_order);
                visitor.visit_enum(ty, spec, value)
            }
            TypeKind::Pointer(spec) => {
                let target = self.env().read_pointer(addr)?;
                visitor.visit_pointer(self, ty, spec, target)
            }
            TypeKind::Array(spec) => visitor.visit_array(self, ty, spec, addr),
            TypeKind::Compound(spec) => visitor.visit_compound(self, ty, spec, addr),
            TypeKind::Container(spec) => visitor.visit_container(self, ty, spec, addr),
        }
    }

    fn read_scalar(&self, ty: &Type, kind: NumericKind, addr: u64) -> Result<Scalar> {
        let order = self.registry.config().byte_order;
        let bytes = self.env().read_bytes(addr, ty.size())?;
        let scalar = match (kind, ty.size()) {
            (NumericKind::SInt, 1) => Scalar::I8(read_sint(bytes, order) as i8),
            (NumericKind::SInt, 2) => Scalar::I16(read_sint(bytes, order) as i16),
            (NumericKind::SInt, 4) => Scalar::I32(read_sint(bytes, order) as i32),
            (NumericKind::SInt, 8) => Scalar::I64(read_sint(bytes, order)),
            (NumericKind::UInt, 1) => Scalar::U8(read_uint(bytes, order) as u8),
            (NumericKind::UInt, 2) => Scalar::U16(read_uint(bytes, order) as u16),
            (NumericKind::UInt, 4) => Scalar::U32(read_uint(bytes, order) as u32),
            (NumericKind::UInt, 8) => Scalar::U64(read_uint(bytes, order)),
            (NumericKind::Float, 4) => Scalar::F32(f32::from_bits(read_uint(bytes, order) as u32)),
            (NumericKind::Float, 8) => Scalar::F64(f64::from_bits(read_uint(bytes, order))),
            (_, size) => {
                return Err(Error::UnsupportedType {
                    name: ty.name().to_string(),
                    reason: format!("unsupported numeric size {}", size),
                })
            }
        };
        Ok(scalar)
    }

    /// Default pointer descent: push the dereferenced address, walk the
    /// pointee, pop.
    pub fn follow_pointer<V: ValueVisit>(
        &mut self,
        visitor: &mut V,
        spec: &PointerSpec,
        target: u64,
    ) -> Result<bool> {
        let pointee = self.registry.get(&spec.pointee)?;
        self.stack.push(target);
        let outcome = self.dispatch(visitor, pointee, target);
        self.stack.pop();
        outcome
    }

    /// Default array descent: one frame for the array, the top rewritten
    /// to `base + i * element.size` per index.
    pub fn each_element<V: ValueVisit>(
        &mut self,
        visitor: &mut V,
        spec: &ArraySpec,
        base: u64,
    ) -> Result<bool> {
        let element = self.registry.get(&spec.element)?;
        let stride = element.size() as u64;
        self.stack.push(base);
        let mut outcome = Ok(true);
        for index in 0..spec.dimension {
            let addr = base + stride * index as u64;
            if let Some(top) = self.stack.last_mut() {
                *top = addr;
            }
            match self.dispatch(visitor, element, addr) {
                Ok(true) => {}
                other => {
                    outcome = other;
                    break;
                }
            }
        }
        self.stack.pop();
        outcome
    }

    /// Default compound descent: field hook per field, declaration order.
    pub fn each_field<V: ValueVisit>(
        &mut self,
        visitor: &mut V,
        compound: &Type,
        spec: &CompoundSpec,
        base: u64,
    ) -> Result<bool> {
        for field in spec.fields() {
            let addr = base + field.offset as u64;
            if !visitor.visit_field(self, compound, field, addr)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Default field descent: push the field address, walk its type, pop.
    pub fn descend_field<V: ValueVisit>(
        &mut self,
        visitor: &mut V,
        field: &Field,
        addr: u64,
    ) -> Result<bool> {
        let ty = self.registry.get(&field.type_name)?;
        self.stack.push(addr);
        let outcome = self.dispatch(visitor, ty, addr);
        self.stack.pop();
        outcome
    }

    /// Default container descent: delegate element iteration to the
    /// container's plug-in, recursing into each reported element.
    pub fn container_elements<V: ValueVisit>(
        &mut self,
        visitor: &mut V,
        ty: &Type,
        spec: &ContainerSpec,
        addr: u64,
    ) -> Result<bool> {
        let reg = self.registry;
        let kind = reg
            .container_kinds()
            .get(&spec.kind)
            .ok_or_else(|| Error::UnsupportedType {
                name: ty.name().to_string(),
                reason: format!("unknown container kind {}", spec.kind),
            })?;
        let element = reg.get(&spec.element)?;
        let env = WalkEnv::new(reg, self.source);
        let mut each = |_index: usize, element_addr: u64| -> Result<bool> {
            self.stack.push(element_addr);
            let outcome = self.dispatch(visitor, element, element_addr);
            self.stack.pop();
            outcome
        };
        kind.walk_elements(&env, ty, addr, &mut each)
    }
}
