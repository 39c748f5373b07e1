// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registry text format.
//!
//! An XML document with a `<registry>` root whose children declare one
//! type, alias or metadata entry each:
//!
//! ```xml
//! <registry>
//!   <numeric name="/int32_t" category="sint" size="4" align="4"/>
//!   <compound name="/S" size="8" align="1">
//!     <field name="a" type="/int8_t" offset="0"/>
//!     <field name="b" type="/int32_t" offset="4"/>
//!   </compound>
//!   <alias name="/int" to="/int32_t"/>
//!   <metadata name="/S" key="source_file_line">laser.h:12</metadata>
//! </registry>
//! ```
//!
//! Import is single-pass in document order, so a type must be declared
//! before anything that references it (pointers excepted). Unknown
//! elements and attributes are rejected; export writes canonical types
//! in registration order followed by the sorted aliases, which reloads
//! into an equal registry.

use crate::config::RegistryConfig;
use crate::containers::ContainerKinds;
use crate::error::{Error, Result};
use crate::model::{EnumSpec, Field, NumericKind, Type, TypeKind};
use crate::registry::Registry;

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Load a registry document into a fresh registry for `config`, with
/// the standard container kinds preinstalled.
pub fn import_xml(xml: &str, config: RegistryConfig) -> Result<Registry> {
    let mut registry = Registry::new(config);
    *registry.container_kinds_mut() = ContainerKinds::with_standard();
    import_xml_into(&mut registry, xml)?;
    Ok(registry)
}

/// Load a registry document into an existing registry.
pub fn import_xml_into(registry: &mut Registry, xml: &str) -> Result<()> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| Error::MalformedXml {
        node: e.to_string(),
        expected: "well-formed XML".to_string(),
    })?;
    let root = doc.root_element();
    if root.tag_name().name() != "registry" {
        return Err(Error::MalformedXml {
            node: root.tag_name().name().to_string(),
            expected: "registry".to_string(),
        });
    }
    check_attributes(root, &[])?;

    let mut count = 0usize;
    for node in root.children().filter(roxmltree::Node::is_element) {
        match node.tag_name().name() {
            "null" => {
                check_attributes(node, &["name", "align"])?;
                let ty = Type::null(required(node, "name")?)?;
                registry.add(with_align(ty, node)?)?;
            }
            "numeric" => {
                check_attributes(node, &["name", "category", "size", "align"])?;
                let category = required(node, "category")?;
                let kind = NumericKind::parse(category).ok_or_else(|| Error::MalformedXml {
                    node: format!("numeric@category={}", category),
                    expected: "sint|uint|float".to_string(),
                })?;
                let ty = Type::numeric(
                    required(node, "name")?,
                    required_usize(node, "size")?,
                    kind,
                )?;
                registry.add(with_align(ty, node)?)?;
            }
            "character" => {
                check_attributes(node, &["name", "size", "align"])?;
                let ty = Type::character(required(node, "name")?, required_usize(node, "size")?)?;
                registry.add(with_align(ty, node)?)?;
            }
            "enum" => {
                check_attributes(node, &["name", "size", "align"])?;
                let size = optional_usize(node, "size")?.unwrap_or(4);
                let mut pairs = Vec::new();
                for child in node.children().filter(roxmltree::Node::is_element) {
                    if child.tag_name().name() != "value" {
                        return Err(Error::MalformedXml {
                            node: child.tag_name().name().to_string(),
                            expected: "value".to_string(),
                        });
                    }
                    check_attributes(child, &["symbol", "value"])?;
                    pairs.push((
                        required(child, "symbol")?.to_string(),
                        required_i64(child, "value")?,
                    ));
                }
                let ty = Type::enumeration(
                    required(node, "name")?,
                    size,
                    EnumSpec::from_pairs(pairs),
                )?;
                registry.add(with_align(ty, node)?)?;
            }
            "array" => {
                check_attributes(node, &["name", "of", "dimension", "align"])?;
                let element = required(node, "of")?;
                let dimension = required_usize(node, "dimension")?;
                let size = registry.get(element)?.size() * dimension;
                let ty = Type::array(required(node, "name")?, element, dimension, size)?;
                registry.add(with_align(ty, node)?)?;
            }
            "pointer" => {
                check_attributes(node, &["name", "of", "align"])?;
                let ty = Type::pointer(
                    required(node, "name")?,
                    required(node, "of")?,
                    registry.config().pointer_size,
                )?;
                registry.add(with_align(ty, node)?)?;
            }
            "compound" => {
                check_attributes(node, &["name", "size", "align"])?;
                let mut fields = Vec::new();
                for child in node.children().filter(roxmltree::Node::is_element) {
                    if child.tag_name().name() != "field" {
                        return Err(Error::MalformedXml {
                            node: child.tag_name().name().to_string(),
                            expected: "field".to_string(),
                        });
                    }
                    check_attributes(child, &["name", "type", "offset"])?;
                    fields.push(Field {
                        name: required(child, "name")?.to_string(),
                        type_name: required(child, "type")?.to_string(),
                        offset: required_usize(child, "offset")?,
                    });
                }
                let ty = Type::compound(
                    required(node, "name")?,
                    required_usize(node, "size")?,
                    fields,
                )?;
                registry.add(with_align(ty, node)?)?;
            }
            "opaque" => {
                check_attributes(node, &["name", "size", "align"])?;
                let ty = Type::opaque(required(node, "name")?, required_usize(node, "size")?)?;
                registry.add(with_align(ty, node)?)?;
            }
            "container" => {
                check_attributes(node, &["name", "kind", "of", "size", "align"])?;
                let ty = Type::container(
                    required(node, "name")?,
                    required(node, "kind")?,
                    required(node, "of")?,
                    required_usize(node, "size")?,
                )?;
                registry.add(with_align(ty, node)?)?;
            }
            "alias" => {
                check_attributes(node, &["name", "to"])?;
                registry.alias(required(node, "to")?, required(node, "name")?)?;
                continue;
            }
            "metadata" => {
                check_attributes(node, &["name", "key"])?;
                let name = required(node, "name")?;
                let key = required(node, "key")?;
                let value = node.text().unwrap_or("").to_string();
                registry.get_mut(name)?.metadata_mut().add(key, value);
                continue;
            }
            other => {
                return Err(Error::MalformedXml {
                    node: other.to_string(),
                    expected:
                        "null|numeric|character|enum|array|pointer|compound|opaque|container|alias|metadata"
                            .to_string(),
                });
            }
        }
        count += 1;
    }

    crate::info!("registry document declared {} types", count);
    Ok(())
}

fn required<'a>(node: roxmltree::Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name).ok_or_else(|| Error::MissingAttribute {
        node: node.tag_name().name().to_string(),
        attribute: name.to_string(),
    })
}

fn required_usize(node: roxmltree::Node<'_, '_>, name: &str) -> Result<usize> {
    parse_number(node, name, required(node, name)?)
}

fn required_i64(node: roxmltree::Node<'_, '_>, name: &str) -> Result<i64> {
    parse_number(node, name, required(node, name)?)
}

fn optional_usize(node: roxmltree::Node<'_, '_>, name: &str) -> Result<Option<usize>> {
    node.attribute(name)
        .map(|raw| parse_number(node, name, raw))
        .transpose()
}

fn parse_number<T: std::str::FromStr>(
    node: roxmltree::Node<'_, '_>,
    name: &str,
    raw: &str,
) -> Result<T> {
    raw.parse().map_err(|_| Error::MalformedXml {
        node: format!("{}@{}={}", node.tag_name().name(), name, raw),
        expected: "integer".to_string(),
    })
}

fn check_attributes(node: roxmltree::Node<'_, '_>, allowed: &[&str]) -> Result<()> {
    for attribute in node.attributes() {
        if !allowed.contains(&attribute.name()) {
            return Err(Error::MalformedXml {
                node: format!("{}@{}", node.tag_name().name(), attribute.name()),
                expected: allowed.join("|"),
            });
        }
    }
    Ok(())
}

fn with_align(mut ty: Type, node: roxmltree::Node<'_, '_>) -> Result<Type> {
    if let Some(align) = optional_usize(node, "align")? {
        ty.set_align(align);
    }
    Ok(ty)
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Serialize a registry to the text format.
///
/// Canonical types are written in registration order, each followed by
/// its metadata entries, then the aliases sorted by name. Reloading the
/// result yields an equal registry.
#[must_use]
pub fn export_xml(registry: &Registry) -> String {
    let mut out = String::from("<registry>\n");
    for ty in registry.iter() {
        write_type(&mut out, ty);
        for (key, values) in ty.metadata().iter() {
            for value in values {
                out.push_str(&format!(
                    "  <metadata name=\"{}\" key=\"{}\">{}</metadata>\n",
                    escape(ty.name()),
                    escape(key),
                    escape(value)
                ));
            }
        }
    }
    for (alias, canonical) in registry.aliases() {
        out.push_str(&format!(
            "  <alias name=\"{}\" to=\"{}\"/>\n",
            escape(alias),
            escape(canonical)
        ));
    }
    out.push_str("</registry>\n");
    out
}

fn write_type(out: &mut String, ty: &Type) {
    let name = escape(ty.name());
    let align = ty.align();
    match ty.kind() {
        TypeKind::Null => {
            out.push_str(&format!("  <null name=\"{}\" align=\"{}\"/>\n", name, align));
        }
        TypeKind::Numeric(kind) => {
            out.push_str(&format!(
                "  <numeric name=\"{}\" category=\"{}\" size=\"{}\" align=\"{}\"/>\n",
                name,
                kind.as_str(),
                ty.size(),
                align
            ));
        }
        TypeKind::Character => {
            out.push_str(&format!(
                "  <character name=\"{}\" size=\"{}\" align=\"{}\"/>\n",
                name,
                ty.size(),
                align
            ));
        }
        TypeKind::Enum(spec) => {
            out.push_str(&format!(
                "  <enum name=\"{}\" size=\"{}\" align=\"{}\">\n",
                name,
                ty.size(),
                align
            ));
            for value in spec.iter() {
                out.push_str(&format!(
                    "    <value symbol=\"{}\" value=\"{}\"/>\n",
                    escape(&value.symbol),
                    value.value
                ));
            }
            out.push_str("  </enum>\n");
        }
        TypeKind::Array(spec) => {
            out.push_str(&format!(
                "  <array name=\"{}\" of=\"{}\" dimension=\"{}\" align=\"{}\"/>\n",
                name,
                escape(&spec.element),
                spec.dimension,
                align
            ));
        }
        TypeKind::Pointer(spec) => {
            out.push_str(&format!(
                "  <pointer name=\"{}\" of=\"{}\" align=\"{}\"/>\n",
                name,
                escape(&spec.pointee),
                align
            ));
        }
        TypeKind::Compound(spec) => {
            out.push_str(&format!(
                "  <compound name=\"{}\" size=\"{}\" align=\"{}\">\n",
                name,
                ty.size(),
                align
            ));
            for field in spec.fields() {
                out.push_str(&format!(
                    "    <field name=\"{}\" type=\"{}\" offset=\"{}\"/>\n",
                    escape(&field.name),
                    escape(&field.type_name),
                    field.offset
                ));
            }
            out.push_str("  </compound>\n");
        }
        TypeKind::Opaque => {
            out.push_str(&format!(
                "  <opaque name=\"{}\" size=\"{}\" align=\"{}\"/>\n",
                name,
                ty.size(),
                align
            ));
        }
        TypeKind::Container(spec) => {
            out.push_str(&format!(
                "  <container name=\"{}\" kind=\"{}\" of=\"{}\" size=\"{}\" align=\"{}\"/>\n",
                name,
                escape(&spec.kind),
                escape(&spec.element),
                ty.size(),
                align
            ));
        }
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CompoundBuilder, EnumBuilder};

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
        let mut compound = CompoundBuilder::new("/Reading", 12)
            .field("id", "/int32_t", 0)
            .field("mode", "/Mode", 4)
            .field("raw", "/uint32_t", 8)
            .align(4)
            .build()
            .unwrap();
        compound.metadata_mut().add_source_location("laser.h", 42);
        compound.metadata_mut().add("base_classes", "/base/Sample");
        reg.add(compound).unwrap();
        reg.build_array("/Reading", 2).unwrap();
        reg.build_pointer("/Reading").unwrap();
        reg.build_container("/std/vector", &["/int32_t"]).unwrap();
        reg.alias("/Reading", "/laser/Reading").unwrap();
        reg
    }

    fn assert_registries_equal(a: &Registry, b: &Registry) {
        let a_types: Vec<&Type> = a.iter().collect();
        let b_types: Vec<&Type> = b.iter().collect();
        assert_eq!(a_types.len(), b_types.len());
        for (x, y) in a_types.iter().zip(&b_types) {
            assert_eq!(x, y, "type {} does not round-trip", x.name());
        }
        assert_eq!(a.aliases(), b.aliases());
    }

    #[test]
    fn roundtrip_preserves_everything() {
        let reg = sample_registry();
        let xml = export_xml(&reg);
        let reloaded = import_xml(&xml, *reg.config()).unwrap();
        assert_registries_equal(&reg, &reloaded);

        // and a second generation is byte-identical
        assert_eq!(xml, export_xml(&reloaded));
    }

    #[test]
    fn metadata_survives_roundtrip() {
        let reg = sample_registry();
        let reloaded = import_xml(&export_xml(&reg), *reg.config()).unwrap();
        let meta = reloaded.get("/Reading").unwrap().metadata();
        assert_eq!(meta.source_location(), Some("laser.h:42"));
        assert_eq!(meta.get("base_classes"), ["/base/Sample"]);
    }

    #[test]
    fn unknown_element_rejected() {
        let xml = "<registry><widget name=\"/x\"/></registry>";
        let err = import_xml(xml, RegistryConfig::default()).unwrap_err();
        match err {
            Error::MalformedXml { node, .. } => assert_eq!(node, "widget"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn unknown_attribute_rejected() {
        let xml = "<registry><numeric name=\"/n\" category=\"sint\" size=\"4\" weird=\"1\"/></registry>";
        let err = import_xml(xml, RegistryConfig::default()).unwrap_err();
        assert!(matches!(err, Error::MalformedXml { .. }));
    }

    #[test]
    fn missing_attribute_rejected() {
        let xml = "<registry><numeric name=\"/n\" size=\"4\"/></registry>";
        let err = import_xml(xml, RegistryConfig::default()).unwrap_err();
        match err {
            Error::MissingAttribute { node, attribute } => {
                assert_eq!(node, "numeric");
                assert_eq!(attribute, "category");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn bad_root_rejected() {
        let err = import_xml("<types/>", RegistryConfig::default()).unwrap_err();
        match err {
            Error::MalformedXml { node, expected } => {
                assert_eq!(node, "types");
                assert_eq!(expected, "registry");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn bad_category_rejected() {
        let xml = "<registry><numeric name=\"/n\" category=\"complex\" size=\"4\"/></registry>";
        let err = import_xml(xml, RegistryConfig::default()).unwrap_err();
        assert!(matches!(err, Error::MalformedXml { .. }));
    }

    #[test]
    fn template_names_escape_and_reload() {
        let reg = sample_registry();
        let xml = export_xml(&reg);
        assert!(xml.contains("&lt;/int32_t&gt;"));
        let reloaded = import_xml(&xml, *reg.config()).unwrap();
        assert!(reloaded.has("/std/vector</int32_t>"));
    }

    #[test]
    fn forward_reference_fails_cleanly() {
        let xml = "<registry>\
                   <compound name=\"/S\" size=\"4\"><field name=\"a\" type=\"/int32_t\" offset=\"0\"/></compound>\
                   <numeric name=\"/int32_t\" category=\"sint\" size=\"4\"/>\
                   </registry>";
        let err = import_xml(xml, RegistryConfig::default()).unwrap_err();
        assert!(matches!(err, Error::TargetMissing(_)));
    }

    #[test]
    fn metadata_for_unknown_type_fails() {
        let xml = "<registry><metadata name=\"/ghost\" key=\"k\">v</metadata></registry>";
        let err = import_xml(xml, RegistryConfig::default()).unwrap_err();
        assert!(matches!(err, Error::TargetMissing(_)));
    }
}
