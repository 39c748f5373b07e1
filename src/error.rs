// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for the type model, registry, visitors and text format.

use std::fmt;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All failure modes of the crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A type was constructed or registered with illegal parameters
    /// (bad numeric size, float of size other than 4/8, duplicate enum
    /// symbol, array size mismatch, field outside the compound, ...).
    InvalidType {
        /// Qualified name of the offending type.
        name: String,
        /// What was wrong with it.
        reason: String,
    },
    /// The name does not follow the qualified-name grammar.
    BadName(String),
    /// `Registry::add` on a name that is already taken.
    AlreadyRegistered(String),
    /// A referenced or aliased type is not present in the registry.
    TargetMissing(String),
    /// `Registry::alias` would rebind a name to a different canonical type.
    AliasClash {
        /// The alias being created.
        name: String,
        /// Canonical name the alias currently resolves to.
        existing: String,
        /// Canonical name the caller asked for.
        requested: String,
    },
    /// A compound already has a field with that name.
    FieldExists {
        /// Compound type name.
        compound: String,
        /// Offending field name.
        field: String,
    },
    /// A compound has no field with that name.
    FieldNotFound {
        /// Compound type name.
        compound: String,
        /// Requested field name.
        field: String,
    },
    /// A visitor or the walk engine was asked to handle a variant or
    /// width it cannot.
    UnsupportedType {
        /// Qualified name of the type.
        name: String,
        /// Why it cannot be handled.
        reason: String,
    },
    /// A strict visitor encountered the null type.
    NullTypeFound(String),
    /// The registry text format contained an unexpected node or attribute.
    MalformedXml {
        /// Node or attribute that was found.
        node: String,
        /// What was expected instead.
        expected: String,
    },
    /// A required attribute was absent from a text-format element.
    MissingAttribute {
        /// Element the attribute belongs to.
        node: String,
        /// Name of the missing attribute.
        attribute: String,
    },
    /// An enum has no symbol for the given integral value.
    ValueNotFound {
        /// Enum type name.
        enum_name: String,
        /// The integral value that missed.
        value: i64,
    },
    /// A memory read fell outside the bytes the source can provide.
    ///
    /// A raw-pointer walk would make this undefined behavior; going
    /// through a checked source turns it into an error.
    OutOfBounds {
        /// Address of the failed read.
        addr: u64,
        /// Number of bytes requested.
        len: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidType { name, reason } => {
                write!(f, "invalid type {}: {}", name, reason)
            }
            Error::BadName(name) => write!(f, "invalid type name: {:?}", name),
            Error::AlreadyRegistered(name) => {
                write!(f, "type name already registered: {}", name)
            }
            Error::TargetMissing(name) => write!(f, "no type named {}", name),
            Error::AliasClash {
                name,
                existing,
                requested,
            } => write!(
                f,
                "alias {} already resolves to {}, cannot rebind to {}",
                name, existing, requested
            ),
            Error::FieldExists { compound, field } => {
                write!(f, "{} already has a field named {}", compound, field)
            }
            Error::FieldNotFound { compound, field } => {
                write!(f, "{} has no field named {}", compound, field)
            }
            Error::UnsupportedType { name, reason } => {
                write!(f, "unsupported type {}: {}", name, reason)
            }
            Error::NullTypeFound(name) => {
                write!(f, "strict visitor reached null type {}", name)
            }
            Error::MalformedXml { node, expected } => {
                write!(f, "malformed XML: found {}, expected {}", node, expected)
            }
            Error::MissingAttribute { node, attribute } => {
                write!(f, "element <{}> is missing attribute {:?}", node, attribute)
            }
            Error::ValueNotFound { enum_name, value } => {
                write!(f, "{} has no symbol for value {}", enum_name, value)
            }
            Error::OutOfBounds { addr, len } => {
                write!(f, "cannot read {} bytes at address {:#x}", len, addr)
            }
        }
    }
}

impl std::error::Error for Error {}
