// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The type model.
//!
//! A [`Type`] is a variant-tagged description of a C/C++ data layout:
//! its qualified name, byte size, alignment, the variant payload, and
//! side-band [`Metadata`]. Types refer to each other **by qualified
//! name only**; the registry is the owning arena that resolves those
//! references.
//!
//! # Example
//!
//! ```rust
//! use memlayout::{CompoundBuilder, NumericKind, Type};
//!
//! let sample = Type::numeric("/int32_t", 4, NumericKind::SInt).unwrap();
//! assert_eq!(sample.size(), 4);
//!
//! let compound = CompoundBuilder::new("/Reading", 8)
//!     .field("id", "/int8_t", 0)
//!     .field("value", "/int32_t", 4)
//!     .build()
//!     .unwrap();
//! assert_eq!(compound.fields().unwrap().len(), 2);
//! ```

mod builder;

pub use builder::{CompoundBuilder, EnumBuilder};

use crate::error::{Error, Result};
use crate::metadata::Metadata;
use crate::typename::validate_type_name;

/// Sizes a numeric or enum storage may take.
pub const NUMERIC_SIZES: [usize; 4] = [1, 2, 4, 8];

/// The nine-way tag selecting which description is in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Null,
    Numeric,
    Character,
    Enum,
    Array,
    Pointer,
    Compound,
    Opaque,
    Container,
}

impl Category {
    /// Lowercase tag, also the element name in the registry text format.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Null => "null",
            Category::Numeric => "numeric",
            Category::Character => "character",
            Category::Enum => "enum",
            Category::Array => "array",
            Category::Pointer => "pointer",
            Category::Compound => "compound",
            Category::Opaque => "opaque",
            Category::Container => "container",
        }
    }
}

/// Interpretation of a numeric type's bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    /// Two's-complement signed integer.
    SInt,
    /// Unsigned integer.
    UInt,
    /// IEEE-754 binary float (size 4 or 8).
    Float,
}

impl NumericKind {
    /// Tag used by the registry text format.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NumericKind::SInt => "sint",
            NumericKind::UInt => "uint",
            NumericKind::Float => "float",
        }
    }

    /// Parse the text-format tag back.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "sint" => Some(NumericKind::SInt),
            "uint" => Some(NumericKind::UInt),
            "float" => Some(NumericKind::Float),
            _ => None,
        }
    }
}

/// One symbol of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// Symbolic name, unique within the enum.
    pub symbol: String,
    /// Integral value. Several symbols may share one value.
    pub value: i64,
}

/// Ordered symbol table of an enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumSpec {
    values: Vec<EnumValue>,
}

impl EnumSpec {
    /// Empty symbol table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(symbol, value)` pairs, keeping declaration order.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, i64)>) -> Self {
        EnumSpec {
            values: pairs
                .into_iter()
                .map(|(symbol, value)| EnumValue {
                    symbol: symbol.into(),
                    value,
                })
                .collect(),
        }
    }

    /// Value of `symbol`, if declared.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<i64> {
        self.values
            .iter()
            .find(|v| v.symbol == symbol)
            .map(|v| v.value)
    }

    /// First declared symbol carrying `value`, if any.
    #[must_use]
    pub fn symbol_of(&self, value: i64) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.value == value)
            .map(|v| v.symbol.as_str())
    }

    /// Symbols in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &EnumValue> {
        self.values.iter()
    }

    /// Number of declared symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no symbol is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn duplicate_symbol(&self) -> Option<&str> {
        for (i, v) in self.values.iter().enumerate() {
            if self.values[..i].iter().any(|o| o.symbol == v.symbol) {
                return Some(&v.symbol);
            }
        }
        None
    }
}

/// Fixed-length homogeneous sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArraySpec {
    /// Qualified name of the element type.
    pub element: String,
    /// Number of elements; zero is legal.
    pub dimension: usize,
}

/// Indirection to another type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerSpec {
    /// Qualified name of the pointed-to type. May be registered after
    /// the pointer, as long as it exists before traversal.
    pub pointee: String,
}

/// One field of a compound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name, unique within the compound.
    pub name: String,
    /// Qualified name of the field's type.
    pub type_name: String,
    /// Byte offset from the start of the compound.
    pub offset: usize,
}

/// Named record with explicitly laid-out fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSpec {
    fields: Vec<Field>,
}

impl CompoundSpec {
    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn duplicate_field(&self) -> Option<&str> {
        for (i, f) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|o| o.name == f.name) {
                return Some(&f.name);
            }
        }
        None
    }
}

/// Variable-size collection backed by a container plug-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    /// Canonical container-kind name, e.g. `/std/vector`.
    pub kind: String,
    /// Qualified name of the element type.
    pub element: String,
}

/// Payload of a type description.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Absence of a value; size 0.
    Null,
    /// Fixed-width integer or float.
    Numeric(NumericKind),
    /// Single character, semantically distinct from a small integer.
    Character,
    /// Symbolic integer.
    Enum(EnumSpec),
    /// Fixed-length sequence.
    Array(ArraySpec),
    /// Indirection; size is the registry's pointer width.
    Pointer(PointerSpec),
    /// Record with named, explicitly placed fields.
    Compound(CompoundSpec),
    /// Known by name and size only; walked as a leaf.
    Opaque,
    /// Variable-size collection; walked through its plug-in.
    Container(ContainerSpec),
}

/// A complete type description.
#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    name: String,
    size: usize,
    align: usize,
    kind: TypeKind,
    metadata: Metadata,
}

impl Type {
    fn new(name: impl Into<String>, size: usize, align: usize, kind: TypeKind) -> Result<Self> {
        let name = name.into();
        validate_type_name(&name)?;
        Ok(Type {
            name,
            size,
            align,
            kind,
            metadata: Metadata::new(),
        })
    }

    /// The null type: size 0, no value.
    pub fn null(name: impl Into<String>) -> Result<Self> {
        Type::new(name, 0, 1, TypeKind::Null)
    }

    /// A fixed-width numeric. Size must be 1, 2, 4 or 8; floats only 4
    /// or 8.
    pub fn numeric(name: impl Into<String>, size: usize, kind: NumericKind) -> Result<Self> {
        let name = name.into();
        if !NUMERIC_SIZES.contains(&size) {
            return Err(Error::InvalidType {
                name,
                reason: format!("illegal numeric size {}", size),
            });
        }
        if kind == NumericKind::Float && size != 4 && size != 8 {
            return Err(Error::InvalidType {
                name,
                reason: format!("illegal float size {}", size),
            });
        }
        Type::new(name, size, size, TypeKind::Numeric(kind))
    }

    /// A character type, size 1, 2 or 4.
    pub fn character(name: impl Into<String>, size: usize) -> Result<Self> {
        let name = name.into();
        if !matches!(size, 1 | 2 | 4) {
            return Err(Error::InvalidType {
                name,
                reason: format!("illegal character size {}", size),
            });
        }
        Type::new(name, size, size, TypeKind::Character)
    }

    /// An enumeration with signed storage of the given width.
    pub fn enumeration(name: impl Into<String>, size: usize, spec: EnumSpec) -> Result<Self> {
        let name = name.into();
        if !NUMERIC_SIZES.contains(&size) {
            return Err(Error::InvalidType {
                name,
                reason: format!("illegal enum storage size {}", size),
            });
        }
        if let Some(symbol) = spec.duplicate_symbol() {
            return Err(Error::InvalidType {
                name,
                reason: format!("duplicate symbol {:?}", symbol),
            });
        }
        Type::new(name, size, size, TypeKind::Enum(spec))
    }

    /// A fixed-length array. `size` must be `dimension` times the
    /// element size; the registry checks this at registration.
    pub fn array(
        name: impl Into<String>,
        element: impl Into<String>,
        dimension: usize,
        size: usize,
    ) -> Result<Self> {
        Type::new(
            name,
            size,
            1,
            TypeKind::Array(ArraySpec {
                element: element.into(),
                dimension,
            }),
        )
    }

    /// A pointer of the given width (the registry's pointer size).
    pub fn pointer(
        name: impl Into<String>,
        pointee: impl Into<String>,
        size: usize,
    ) -> Result<Self> {
        Type::new(
            name,
            size,
            size,
            TypeKind::Pointer(PointerSpec {
                pointee: pointee.into(),
            }),
        )
    }

    /// A compound with an explicit overall size. Zero fields with a
    /// positive size is legal and walks as a leaf.
    pub fn compound(name: impl Into<String>, size: usize, fields: Vec<Field>) -> Result<Self> {
        let name = name.into();
        let spec = CompoundSpec { fields };
        if let Some(field) = spec.duplicate_field() {
            return Err(Error::FieldExists {
                compound: name,
                field: field.to_string(),
            });
        }
        Type::new(name, size, 1, TypeKind::Compound(spec))
    }

    /// An externally-defined type: name and size known, internals not.
    pub fn opaque(name: impl Into<String>, size: usize) -> Result<Self> {
        Type::new(name, size, 1, TypeKind::Opaque)
    }

    /// A container instance bound to a plug-in kind.
    pub fn container(
        name: impl Into<String>,
        kind: impl Into<String>,
        element: impl Into<String>,
        size: usize,
    ) -> Result<Self> {
        Type::new(
            name,
            size,
            1,
            TypeKind::Container(ContainerSpec {
                kind: kind.into(),
                element: element.into(),
            }),
        )
    }

    /// Qualified name the type is stored under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte size of one value of this type.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Alignment requirement. Defaults to the size for scalars; for
    /// composites it is whatever the importer asserted.
    #[must_use]
    pub fn align(&self) -> usize {
        self.align
    }

    /// Override the alignment (importer-provided attribute).
    pub fn set_align(&mut self, align: usize) {
        self.align = align.max(1);
    }

    /// The variant payload.
    #[must_use]
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// The nine-way dispatch tag.
    #[must_use]
    pub fn category(&self) -> Category {
        match self.kind {
            TypeKind::Null => Category::Null,
            TypeKind::Numeric(_) => Category::Numeric,
            TypeKind::Character => Category::Character,
            TypeKind::Enum(_) => Category::Enum,
            TypeKind::Array(_) => Category::Array,
            TypeKind::Pointer(_) => Category::Pointer,
            TypeKind::Compound(_) => Category::Compound,
            TypeKind::Opaque => Category::Opaque,
            TypeKind::Container(_) => Category::Container,
        }
    }

    /// Side-band annotations.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Mutable annotations (construction phase only).
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Numeric interpretation, if this is a numeric.
    #[must_use]
    pub fn numeric_kind(&self) -> Option<NumericKind> {
        match &self.kind {
            TypeKind::Numeric(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Symbol table, if this is an enum.
    #[must_use]
    pub fn enum_spec(&self) -> Option<&EnumSpec> {
        match &self.kind {
            TypeKind::Enum(spec) => Some(spec),
            _ => None,
        }
    }

    /// Element/dimension description, if this is an array.
    #[must_use]
    pub fn array_spec(&self) -> Option<&ArraySpec> {
        match &self.kind {
            TypeKind::Array(spec) => Some(spec),
            _ => None,
        }
    }

    /// Pointee description, if this is a pointer.
    #[must_use]
    pub fn pointer_spec(&self) -> Option<&PointerSpec> {
        match &self.kind {
            TypeKind::Pointer(spec) => Some(spec),
            _ => None,
        }
    }

    /// Field list, if this is a compound.
    #[must_use]
    pub fn fields(&self) -> Option<&[Field]> {
        match &self.kind {
            TypeKind::Compound(spec) => Some(spec.fields()),
            _ => None,
        }
    }

    /// Kind/element description, if this is a container.
    #[must_use]
    pub fn container_spec(&self) -> Option<&ContainerSpec> {
        match &self.kind {
            TypeKind::Container(spec) => Some(spec),
            _ => None,
        }
    }

    /// Field of a compound by name.
    pub fn field(&self, name: &str) -> Result<&Field> {
        let fields = self.fields().ok_or_else(|| Error::FieldNotFound {
            compound: self.name.clone(),
            field: name.to_string(),
        })?;
        fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| Error::FieldNotFound {
                compound: self.name.clone(),
                field: name.to_string(),
            })
    }

    /// Symbol of an enum value; [`Error::ValueNotFound`] on a miss.
    pub fn enum_symbol(&self, value: i64) -> Result<&str> {
        self.enum_spec()
            .and_then(|spec| spec.symbol_of(value))
            .ok_or(Error::ValueNotFound {
                enum_name: self.name.clone(),
                value,
            })
    }

    /// Structural equality: category, size, alignment and payload, with
    /// referenced types compared by name. Metadata and the own name are
    /// ignored; within one registry, name equality after alias
    /// resolution is the cheaper equivalent.
    #[must_use]
    pub fn same_structure(&self, other: &Type) -> bool {
        self.size == other.size && self.align == other.align && self.kind == other.kind
    }
}
