// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # memlayout - compiler-independent C/C++ layout introspection
//!
//! A registry of type descriptions plus a layout-directed traversal of
//! raw byte buffers, so tools can read binary records produced by
//! native code without linking against it: logging pipelines, data
//! recorder replayers, inter-language bridges.
//!
//! ## Quick Start
//!
//! ```rust
//! use memlayout::{BufferSource, CompoundBuilder, Registry, Scalar, Type, ValueVisit, ValueWalk};
//!
//! fn main() -> memlayout::Result<()> {
//!     let mut registry = Registry::with_standard_types()?;
//!     registry.add(
//!         CompoundBuilder::new("/Reading", 8)
//!             .field("id", "/int8_t", 0)
//!             .field("value", "/int32_t", 4)
//!             .build()?,
//!     )?;
//!
//!     struct Print;
//!     impl ValueVisit for Print {
//!         fn visit_numeric(&mut self, ty: &Type, value: Scalar) -> memlayout::Result<bool> {
//!             println!("{} = {}", ty.name(), value);
//!             Ok(true)
//!         }
//!     }
//!
//!     let raw = [0x01u8, 0, 0, 0, 0x2a, 0, 0, 0];
//!     let source = BufferSource::new(0, &raw);
//!     let mut walk = ValueWalk::new(&registry, &source);
//!     walk.apply(&mut Print, registry.get("/Reading")?, 0)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------+
//! |                        Consumers                             |
//! |      CSV rendering | recorder replay | language bridges      |
//! +--------------------------------------------------------------+
//! |                        Traversal                             |
//! |   walk_type (type trees)  |  ValueWalk (raw byte cursors)    |
//! +--------------------------------------------------------------+
//! |                        Registry                              |
//! |   canonical names | aliases | namespaces | container kinds   |
//! +--------------------------------------------------------------+
//! |                        Type model                            |
//! |  null numeric character enum array pointer compound          |
//! |  opaque container  +  metadata                               |
//! +--------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Registry`] | Owning store of types, keyed by qualified name |
//! | [`Type`] | One variant-tagged layout description |
//! | [`TypeVisit`] / [`TypeVisitStrict`] | Hooks over the type tree |
//! | [`ValueWalk`] / [`ValueVisit`] | Synchronized walk of type and raw bytes |
//! | [`ContainerKind`] | Plug-in for variable-size collections |
//! | [`CsvOutput`] | Header and line rendering of walked values |
//!
//! ## Modules Overview
//!
//! - [`model`] - the type descriptions (start here)
//! - [`registry`] - the owning store and standard-type seeding
//! - [`visit`] - type and value traversal
//! - [`containers`] - container plug-ins
//! - [`tlb`] - the XML registry exchange format
//! - [`csv`] - CSV rendering of types and values
//!
//! ## Concurrency
//!
//! A registry is single-writer during construction and read-only
//! afterwards; once populated it may be shared across threads without
//! synchronization, and walks over distinct visitor instances are
//! independent.

/// Registry configuration (pointer width, byte order, C width table).
pub mod config;
/// Container plug-ins (kind registry, std::string/std::vector).
pub mod containers;
/// CSV rendering of types and values.
pub mod csv;
/// Crate-wide error type.
pub mod error;
/// Compile-time configurable logging (zero-cost when disabled).
pub mod logging;
/// Side-band metadata attached to types.
pub mod metadata;
/// The type model: variants, builders.
pub mod model;
/// The owning type store and standard-type seeding.
pub mod registry;
/// The XML registry exchange format.
pub mod tlb;
/// Qualified-name grammar helpers.
pub mod typename;
/// Type-tree and raw-value traversal.
pub mod visit;

pub use config::{ByteOrder, CWidths, RegistryConfig};
pub use containers::{read_std_string, ContainerKind, ContainerKinds, StdString, StdVector};
pub use csv::{CsvOptions, CsvOutput};
pub use error::{Error, Result};
pub use metadata::Metadata;
pub use model::{
    ArraySpec, Category, CompoundBuilder, CompoundSpec, ContainerSpec, EnumBuilder, EnumSpec,
    EnumValue, Field, NumericKind, PointerSpec, Type, TypeKind,
};
pub use registry::{seed_standard_types, Registry};
pub use tlb::{export_xml, import_xml, import_xml_into};
pub use visit::{
    walk_type, BufferSource, MemorySource, Scalar, TypeVisit, TypeVisitStrict, ValueVisit,
    ValueWalk, WalkEnv,
};
