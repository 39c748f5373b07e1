// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! CSV rendering of types and values.
//!
//! The header names every scalar leaf by its access path: fields joined
//! with `.`, array indices as `[i]`, pointer dereference as `*(...)`.
//! The line formatter walks a raw value and renders one cell per leaf,
//! so a header and a line produced from the same type always have the
//! same number of columns.

use std::collections::VecDeque;

use crate::containers::{read_std_string, StdString};
use crate::error::Result;
use crate::model::{
    ArraySpec, CompoundSpec, ContainerSpec, EnumSpec, Field, NumericKind, PointerSpec, Type,
};
use crate::registry::Registry;
use crate::visit::{
    recurse_array, recurse_field, recurse_fields, recurse_pointer, walk_type, MemorySource,
    Scalar, TypeVisitStrict, ValueVisit, ValueWalk,
};

/// Rendering conventions for value cells.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Cell separator. The original tooling used a single space.
    pub separator: String,
    /// Render characters as their integer value instead of the glyph.
    pub char_as_number: bool,
    /// Render `/std/string` values as one delimited cell instead of one
    /// cell per character. `None` falls back to per-element cells.
    pub string_delimiter: Option<char>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            separator: " ".to_string(),
            char_as_number: true,
            string_delimiter: Some('"'),
        }
    }
}

/// CSV formatter bound to one type of one registry.
pub struct CsvOutput<'r> {
    registry: &'r Registry,
    ty: &'r Type,
    options: CsvOptions,
}

impl<'r> CsvOutput<'r> {
    /// A formatter with the default conventions.
    #[must_use]
    pub fn new(registry: &'r Registry, ty: &'r Type) -> Self {
        CsvOutput {
            registry,
            ty,
            options: CsvOptions::default(),
        }
    }

    /// A formatter with explicit conventions.
    #[must_use]
    pub fn with_options(registry: &'r Registry, ty: &'r Type, options: CsvOptions) -> Self {
        CsvOutput {
            registry,
            ty,
            options,
        }
    }

    /// The header row: one column per scalar leaf, paths rooted at
    /// `basename`.
    pub fn header(&self, basename: &str) -> Result<String> {
        let mut visitor = HeaderVisitor::new(basename);
        walk_type(&mut visitor, self.registry, self.ty)?;
        Ok(visitor.headers.join(&self.options.separator))
    }

    /// One line: the value of `self.ty` at `addr`, one cell per leaf.
    pub fn line(&self, source: &dyn MemorySource, addr: u64) -> Result<String> {
        let mut walk = ValueWalk::new(self.registry, source);
        let mut visitor = LineVisitor {
            options: &self.options,
            cells: Vec::new(),
        };
        walk.apply(&mut visitor, self.ty, addr)?;
        Ok(visitor.cells.join(&self.options.separator))
    }
}

/// Builds leaf paths while descending the type tree.
struct HeaderVisitor {
    parts: VecDeque<String>,
    headers: Vec<String>,
}

impl HeaderVisitor {
    fn new(basename: &str) -> Self {
        let mut parts = VecDeque::new();
        parts.push_back(basename.to_string());
        HeaderVisitor {
            parts,
            headers: Vec::new(),
        }
    }

    fn output(&mut self) {
        let mut path = String::new();
        for part in &self.parts {
            path.push_str(part);
        }
        self.headers.push(path);
    }
}

impl TypeVisitStrict for HeaderVisitor {
    fn visit_numeric(&mut self, _ty: &Type, _kind: NumericKind) -> Result<bool> {
        self.output();
        Ok(true)
    }

    fn visit_character(&mut self, _ty: &Type) -> Result<bool> {
        self.output();
        Ok(true)
    }

    fn visit_enum(&mut self, _ty: &Type, _spec: &EnumSpec) -> Result<bool> {
        self.output();
        Ok(true)
    }

    fn visit_opaque(&mut self, _ty: &Type) -> Result<bool> {
        self.output();
        Ok(true)
    }

    fn visit_null(&mut self, _ty: &Type) -> Result<bool> {
        self.output();
        Ok(true)
    }

    fn visit_pointer(&mut self, reg: &Registry, _ty: &Type, spec: &PointerSpec) -> Result<bool> {
        self.parts.push_front("*(".to_string());
        self.parts.push_back(")".to_string());
        let keep = recurse_pointer(self, reg, spec);
        self.parts.pop_front();
        self.parts.pop_back();
        keep
    }

    fn visit_array(&mut self, reg: &Registry, _ty: &Type, spec: &ArraySpec) -> Result<bool> {
        for index in 0..spec.dimension {
            self.parts.push_back(format!("[{}]", index));
            let keep = recurse_array(self, reg, spec);
            self.parts.pop_back();
            if !keep? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn visit_compound(&mut self, reg: &Registry, ty: &Type, spec: &CompoundSpec) -> Result<bool> {
        self.parts.push_back(".".to_string());
        let keep = recurse_fields(self, reg, ty, spec);
        self.parts.pop_back();
        keep
    }

    fn visit_field(&mut self, reg: &Registry, _compound: &Type, field: &Field) -> Result<bool> {
        self.parts.push_back(field.name.clone());
        let keep = recurse_field(self, reg, field);
        self.parts.pop_back();
        keep
    }
}

/// Renders one cell per scalar leaf of a raw value.
struct LineVisitor<'o> {
    options: &'o CsvOptions,
    cells: Vec<String>,
}

impl ValueVisit for LineVisitor<'_> {
    fn visit_null(&mut self, ty: &Type, _addr: u64) -> Result<bool> {
        self.cells.push(format!("<{}>", ty.name()));
        Ok(true)
    }

    fn visit_opaque(&mut self, ty: &Type, _addr: u64) -> Result<bool> {
        self.cells.push(format!("<{}>", ty.name()));
        Ok(true)
    }

    fn visit_numeric(&mut self, _ty: &Type, value: Scalar) -> Result<bool> {
        self.cells.push(value.to_string());
        Ok(true)
    }

    fn visit_character(&mut self, _ty: &Type, value: char) -> Result<bool> {
        if self.options.char_as_number {
            self.cells.push((value as u32).to_string());
        } else {
            self.cells.push(value.to_string());
        }
        Ok(true)
    }

    fn visit_enum(&mut self, _ty: &Type, spec: &EnumSpec, value: i64) -> Result<bool> {
        match spec.symbol_of(value) {
            Some(symbol) => self.cells.push(symbol.to_string()),
            None => self.cells.push(value.to_string()),
        }
        Ok(true)
    }

    fn visit_container(
        &mut self,
        walk: &mut ValueWalk<'_>,
        ty: &Type,
        spec: &ContainerSpec,
        addr: u64,
    ) -> Result<bool> {
        if spec.kind == StdString::NAME {
            if let Some(delimiter) = self.options.string_delimiter {
                let text = read_std_string(&walk.env(), addr)?;
                self.cells.push(format!("{}{}{}", delimiter, text, delimiter));
                return Ok(true);
            }
        }
        walk.container_elements(self, ty, spec, addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CompoundBuilder, EnumBuilder};
    use crate::visit::BufferSource;

    fn registry() -> Registry {
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
    fn header_paths_for_compound() {
        let reg = registry();
        let output = CsvOutput::new(&reg, reg.get("/S").unwrap());
        assert_eq!(output.header("s").unwrap(), "s.a s.b");
    }

    #[test]
    fn header_paths_for_arrays_and_pointers() {
        let mut reg = registry();
        reg.build_array("/S", 2).unwrap();
        let output = CsvOutput::new(&reg, reg.get("/S[2]").unwrap());
        assert_eq!(
            output.header("v").unwrap(),
            "v[0].a v[0].b v[1].a v[1].b"
        );

        reg.build_pointer("/int32_t").unwrap();
        let output = CsvOutput::new(&reg, reg.get("/int32_t*").unwrap());
        assert_eq!(output.header("p").unwrap(), "*(p)");
    }

    #[test]
    fn line_matches_header_column_count() {
        let reg = registry();
        let buf = [0x01u8, 0, 0, 0, 0x2a, 0, 0, 0];
        let source = BufferSource::new(0, &buf);
        let output = CsvOutput::new(&reg, reg.get("/S").unwrap());
        let header = output.header("s").unwrap();
        let line = output.line(&source, 0).unwrap();
        assert_eq!(line, "1 42");
        assert_eq!(
            header.split(' ').count(),
            line.split(' ').count()
        );
    }

    #[test]
    fn enum_cells_fall_back_to_integers() {
        let reg = registry();
        let output = CsvOutput::new(&reg, reg.get("/Mode").unwrap());

        let buf = 1i32.to_le_bytes();
        let source = BufferSource::new(0, &buf);
        assert_eq!(output.line(&source, 0).unwrap(), "ON");

        let buf = 7i32.to_le_bytes();
        let source = BufferSource::new(0, &buf);
        assert_eq!(output.line(&source, 0).unwrap(), "7");
    }

    #[test]
    fn characters_render_by_convention() {
        let reg = registry();
        let buf = [b'A'];
        let source = BufferSource::new(0, &buf);

        let output = CsvOutput::new(&reg, reg.get("/char8_t").unwrap());
        assert_eq!(output.line(&source, 0).unwrap(), "65");

        let options = CsvOptions {
            char_as_number: false,
            ..CsvOptions::default()
        };
        let output = CsvOutput::with_options(&reg, reg.get("/char8_t").unwrap(), options);
        assert_eq!(output.line(&source, 0).unwrap(), "A");
    }

    #[test]
    fn std_string_renders_delimited() {
        let reg = registry();
        let mut buf = vec![0u8; 0x25];
        buf[0..8].copy_from_slice(&0x3020u64.to_le_bytes());
        buf[8..16].copy_from_slice(&5u64.to_le_bytes());
        buf[0x20..0x25].copy_from_slice(b"hello");
        let source = BufferSource::new(0x3000, &buf);
        let output = CsvOutput::new(&reg, reg.get("/std/string").unwrap());
        assert_eq!(output.line(&source, 0x3000).unwrap(), "\"hello\"");
    }

    #[test]
    fn opaque_and_null_render_as_placeholders() {
        let mut reg = registry();
        reg.add(Type::opaque("/mystery", 4).unwrap()).unwrap();
        let buf = [0u8; 4];
        let source = BufferSource::new(0, &buf);
        let output = CsvOutput::new(&reg, reg.get("/mystery").unwrap());
        assert_eq!(output.line(&source, 0).unwrap(), "</mystery>");
    }
}
