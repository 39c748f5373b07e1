// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registry configuration - Single Source of Truth
//!
//! Every target-dependent constant lives here: pointer width, byte order,
//! and the width table for the plain C integer spellings. The registry
//! owns one [`RegistryConfig`] and every derived size (pointers, seeded
//! aliases, built-in containers) is computed from it. **Never hardcode a
//! pointer width elsewhere!**

/// Byte order of the target the raw buffers were produced on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Least-significant byte first.
    Little,
    /// Most-significant byte first.
    Big,
}

impl ByteOrder {
    /// Byte order of the machine this code runs on.
    #[must_use]
    pub fn host() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }
}

/// Widths, in bytes, of the plain C integer types on the target.
///
/// Used by the standard-type seeding to map every C spelling
/// (`/short`, `/unsigned long int`, ...) to the right fixed-width
/// canonical type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CWidths {
    /// `short` width (2 on every mainstream ABI).
    pub short_bytes: usize,
    /// `int` width.
    pub int_bytes: usize,
    /// `long` width (4 on ILP32 and Windows, 8 on LP64).
    pub long_bytes: usize,
    /// `long long` width.
    pub long_long_bytes: usize,
}

impl CWidths {
    /// The LP64 data model (Linux/macOS 64-bit).
    #[must_use]
    pub fn lp64() -> Self {
        CWidths {
            short_bytes: 2,
            int_bytes: 4,
            long_bytes: 8,
            long_long_bytes: 8,
        }
    }

    /// The ILP32 data model (32-bit targets).
    #[must_use]
    pub fn ilp32() -> Self {
        CWidths {
            short_bytes: 2,
            int_bytes: 4,
            long_bytes: 4,
            long_long_bytes: 8,
        }
    }
}

impl Default for CWidths {
    fn default() -> Self {
        CWidths::lp64()
    }
}

/// Target description a registry is created with.
///
/// A registry describes exactly one target layout; mixing descriptions
/// from different targets in one registry is not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Size of a data pointer on the target, in bytes.
    pub pointer_size: usize,
    /// Byte order of raw value buffers handed to the value walk.
    pub byte_order: ByteOrder,
    /// Width table for the C integer spellings.
    pub c_widths: CWidths,
    /// When set, registering a compound rejects fields whose storage
    /// overlaps. Off by default: unions and importer-provided layouts
    /// legitimately overlap.
    pub strict_layout: bool,
}

impl RegistryConfig {
    /// LP64 little-endian target, the common case.
    #[must_use]
    pub fn lp64() -> Self {
        RegistryConfig {
            pointer_size: 8,
            byte_order: ByteOrder::Little,
            c_widths: CWidths::lp64(),
            strict_layout: false,
        }
    }

    /// Configuration matching the machine this code runs on.
    #[must_use]
    pub fn host() -> Self {
        RegistryConfig {
            pointer_size: std::mem::size_of::<usize>(),
            byte_order: ByteOrder::host(),
            c_widths: CWidths::default(),
            strict_layout: false,
        }
    }

    /// Enable field-overlap checking for compounds.
    #[must_use]
    pub fn with_strict_layout(mut self) -> Self {
        self.strict_layout = true;
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig::lp64()
    }
}
