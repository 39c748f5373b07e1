// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builders for compound and enum descriptions.

use crate::error::Result;
use crate::model::{EnumSpec, EnumValue, Field, Type};

/// Builder for compound types.
///
/// Offsets are explicit; the overall size is asserted up front, the way
/// an importer reports a record it measured.
#[derive(Debug)]
pub struct CompoundBuilder {
    name: String,
    size: usize,
    align: Option<usize>,
    fields: Vec<Field>,
}

impl CompoundBuilder {
    /// Start a compound of the given qualified name and overall size.
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        CompoundBuilder {
            name: name.into(),
            size,
            align: None,
            fields: Vec::new(),
        }
    }

    /// Append a field at an explicit byte offset.
    #[must_use]
    pub fn field(
        mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        offset: usize,
    ) -> Self {
        self.fields.push(Field {
            name: name.into(),
            type_name: type_name.into(),
            offset,
        });
        self
    }

    /// Assert the alignment the importer measured.
    #[must_use]
    pub fn align(mut self, align: usize) -> Self {
        self.align = Some(align);
        self
    }

    /// Build the type. Fails on duplicate field names or a bad name.
    pub fn build(self) -> Result<Type> {
        let mut ty = Type::compound(self.name, self.size, self.fields)?;
        if let Some(align) = self.align {
            ty.set_align(align);
        }
        Ok(ty)
    }
}

/// Builder for enumeration types.
#[derive(Debug)]
pub struct EnumBuilder {
    name: String,
    size: usize,
    values: Vec<EnumValue>,
    next_value: i64,
}

impl EnumBuilder {
    /// Start an enum with the default 4-byte signed storage.
    pub fn new(name: impl Into<String>) -> Self {
        EnumBuilder {
            name: name.into(),
            size: 4,
            values: Vec::new(),
            next_value: 0,
        }
    }

    /// Override the storage width (1, 2, 4 or 8 bytes).
    #[must_use]
    pub fn storage_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Append a symbol with the next auto-incremented value.
    #[must_use]
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.values.push(EnumValue {
            symbol: symbol.into(),
            value: self.next_value,
        });
        self.next_value += 1;
        self
    }

    /// Append a symbol with an explicit value.
    #[must_use]
    pub fn symbol_value(mut self, symbol: impl Into<String>, value: i64) -> Self {
        self.values.push(EnumValue {
            symbol: symbol.into(),
            value,
        });
        self.next_value = value + 1;
        self
    }

    /// Build the type. Fails on duplicate symbols, a bad storage size
    /// or a bad name.
    pub fn build(self) -> Result<Type> {
        let spec = EnumSpec::from_pairs(self.values.into_iter().map(|v| (v.symbol, v.value)));
        Type::enumeration(self.name, self.size, spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn compound_builder() {
        let ty = CompoundBuilder::new("/Reading", 16)
            .field("id", "/int32_t", 0)
            .field("value", "/double", 8)
            .align(8)
            .build()
            .unwrap();
        assert_eq!(ty.size(), 16);
        assert_eq!(ty.align(), 8);
        assert_eq!(ty.field("value").unwrap().offset, 8);
    }

    #[test]
    fn compound_builder_duplicate_field() {
        let err = CompoundBuilder::new("/S", 8)
            .field("a", "/int32_t", 0)
            .field("a", "/int32_t", 4)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::FieldExists { .. }));
    }

    #[test]
    fn enum_builder_auto_increment() {
        let ty = EnumBuilder::new("/Color")
            .symbol("RED")
            .symbol("GREEN")
            .symbol_value("BLUE", 10)
            .symbol("CYAN")
            .build()
            .unwrap();
        let spec = ty.enum_spec().unwrap();
        assert_eq!(spec.get("GREEN"), Some(1));
        assert_eq!(spec.get("BLUE"), Some(10));
        assert_eq!(spec.get("CYAN"), Some(11));
        assert_eq!(ty.size(), 4);
    }

    #[test]
    fn enum_builder_storage_size() {
        let ty = EnumBuilder::new("/Tiny")
            .storage_size(1)
            .symbol("A")
            .build()
            .unwrap();
        assert_eq!(ty.size(), 1);
    }
}
