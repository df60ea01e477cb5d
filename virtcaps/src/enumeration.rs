//! Enumerated option support.
//!
//! Domain capability documents describe every configurable option as a node
//! that is either supported or not, lists its legal values, and may nest
//! further named enums:
//!
//! ```text
//! <loader supported='yes'>
//!   <value>/usr/share/OVMF/OVMF_CODE.fd</value>
//!   <enum name='type'>
//!     <value>rom</value>
//!     <value>pflash</value>
//!   </enum>
//! </loader>
//! ```

use std::sync::OnceLock;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::xml::Element;

/// One configurable option: a supported flag, its legal values and its
/// nested enums.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnumNode {
    /// Option name (element name, or the `name` attribute of an `<enum>`).
    pub name: String,
    /// Whether the option is supported.
    pub supported: bool,
    /// Legal values in document order. Always empty when unsupported.
    pub values: Vec<String>,
    /// Nested enums in document order.
    pub enums: OptionGroup,
}

impl EnumNode {
    /// Build an unsupported node, the stand-in for anything the document omits.
    pub fn unsupported(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse an option element, or produce an unsupported node if absent.
    pub(crate) fn parse_opt(name: &str, el: Option<Element<'_, '_>>) -> Self {
        match el {
            Some(el) => Self::parse(name, el),
            None => Self::unsupported(name),
        }
    }

    /// Parse a bare `<enum>` listed under a supported parent, or produce an
    /// unsupported node if absent.
    pub(crate) fn parse_enum_opt(name: &str, el: Option<Element<'_, '_>>) -> Self {
        match el {
            Some(el) => Self::parse_node(name, el, true),
            None => Self::unsupported(name),
        }
    }

    /// Parse an option element. It is supported only with `supported='yes'`.
    pub(crate) fn parse(name: &str, el: Element<'_, '_>) -> Self {
        Self::parse_node(name, el, false)
    }

    /// `implicit` marks nodes listed under a supported parent, which carry
    /// no `supported` attribute of their own.
    fn parse_node(name: &str, el: Element<'_, '_>, implicit: bool) -> Self {
        let supported = match el.yes_no("supported") {
            Some(supported) => supported,
            None => implicit && el.attr("supported").is_none(),
        };
        if !supported {
            return Self::unsupported(name);
        }

        let enums = el
            .children_named("enum")
            .map(|child| {
                let child_name = child.attr_or_empty("name");
                Self::parse_node(&child_name, child, true)
            })
            .collect();

        Self {
            name: name.to_string(),
            supported,
            values: el.child_texts("value"),
            enums,
        }
    }

    /// Legal values in document order.
    pub fn get_values(&self) -> &[String] {
        &self.values
    }

    /// Check if `value` is among the legal values.
    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Names of nested enums in document order.
    pub fn enum_names(&self) -> Vec<&str> {
        self.enums.enum_names()
    }

    /// Get a nested enum. Fails when the document does not define it.
    pub fn get_enum(&self, name: &str) -> Result<&EnumNode> {
        self.enums.get_enum(name)
    }

    /// Check a value of a nested enum; absent enums have no values.
    pub fn enum_has_value(&self, name: &str, value: &str) -> bool {
        self.enums.get(name).has_value(value)
    }
}

/// Named collection of [`EnumNode`]s in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OptionGroup {
    nodes: Vec<EnumNode>,
}

impl FromIterator<EnumNode> for OptionGroup {
    fn from_iter<I: IntoIterator<Item = EnumNode>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl OptionGroup {
    /// Parse every child element of `el` as an option, keyed by element name.
    pub(crate) fn parse_children(el: Option<Element<'_, '_>>) -> Self {
        match el {
            Some(el) => el.elements().map(|c| EnumNode::parse(c.name(), c)).collect(),
            None => Self::default(),
        }
    }

    /// Look up an option. Absent options resolve to a shared unsupported node.
    pub fn get(&self, name: &str) -> &EnumNode {
        static ABSENT: OnceLock<EnumNode> = OnceLock::new();
        self.find(name)
            .unwrap_or_else(|| ABSENT.get_or_init(EnumNode::default))
    }

    /// Look up an option, failing when the document does not define it.
    pub fn get_enum(&self, name: &str) -> Result<&EnumNode> {
        self.find(name).ok_or_else(|| Error::not_found("enum", name))
    }

    /// Check if the document defines `name`, supported or not.
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Option names in document order.
    pub fn enum_names(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnumNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn find(&self, name: &str) -> Option<&EnumNode> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    const LOADER: &str = r#"
        <os supported='yes'>
          <loader supported='yes'>
            <value>/foo/bar</value>
            <value>/tmp/my_path</value>
            <enum name='type'>
              <value>rom</value>
              <value>pflash</value>
            </enum>
            <enum name='readonly'>
              <value>yes</value>
              <value>no</value>
            </enum>
          </loader>
        </os>"#;

    fn loader() -> EnumNode {
        let doc = parse_document(LOADER, "os").unwrap();
        let root = Element::root(&doc);
        EnumNode::parse_opt("loader", root.child("loader"))
    }

    #[test]
    fn test_values_in_document_order() {
        let node = loader();
        assert!(node.supported);
        assert_eq!(node.get_values(), ["/foo/bar", "/tmp/my_path"]);
        assert_eq!(node.enum_names(), vec!["type", "readonly"]);
        assert_eq!(node.get_enum("type").unwrap().get_values(), ["rom", "pflash"]);
        assert_eq!(node.get_enum("readonly").unwrap().get_values(), ["yes", "no"]);
    }

    #[test]
    fn test_get_enum_missing_is_not_found() {
        let err = loader().get_enum("secure").unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("secure"));
    }

    #[test]
    fn test_enum_has_value() {
        let node = loader();
        assert!(node.enum_has_value("type", "pflash"));
        assert!(!node.enum_has_value("type", "stateless"));
        assert!(!node.enum_has_value("secure", "yes"));
    }

    #[test]
    fn test_explicit_no_drops_values() {
        let xml = r#"<devices>
            <rng supported='no'><enum name='model'><value>virtio</value></enum></rng>
        </devices>"#;
        let doc = parse_document(xml, "devices").unwrap();
        let group = OptionGroup::parse_children(Some(Element::root(&doc)));
        let rng = group.get_enum("rng").unwrap();
        assert!(!rng.supported);
        assert!(rng.get_values().is_empty());
        assert!(rng.enum_names().is_empty());
    }

    #[test]
    fn test_missing_marker_is_unsupported() {
        let xml = r#"<devices>
            <rng><value>/x</value><enum name='model'><value>virtio</value></enum></rng>
            <tpm supported='yes'><enum name='model'><value>tpm-crb</value></enum></tpm>
        </devices>"#;
        let doc = parse_document(xml, "devices").unwrap();
        let group = OptionGroup::parse_children(Some(Element::root(&doc)));

        let rng = group.get_enum("rng").unwrap();
        assert!(!rng.supported);
        assert!(rng.get_values().is_empty());
        assert!(rng.enum_names().is_empty());

        let tpm = group.get("tpm");
        assert!(tpm.supported);
        let model = tpm.get_enum("model").unwrap();
        assert!(model.supported);
        assert_eq!(model.get_values(), ["tpm-crb"]);
    }

    #[test]
    fn test_loader_without_marker_is_unsupported() {
        let doc = parse_document("<os><loader><value>/x</value></loader></os>", "os").unwrap();
        let loader = EnumNode::parse_opt("loader", Element::root(&doc).child("loader"));
        assert_eq!(loader, EnumNode::unsupported("loader"));
    }

    #[test]
    fn test_absent_matches_explicit_no() {
        let absent = EnumNode::parse_opt("loader", None);
        assert_eq!(absent, EnumNode::unsupported("loader"));
        assert!(!absent.supported);
        assert!(absent.get_values().is_empty());
    }

    #[test]
    fn test_group_get_defaults_to_unsupported() {
        let group = OptionGroup::default();
        assert!(group.is_empty());
        assert!(!group.contains("tpm"));
        assert!(!group.get("tpm").supported);
        assert!(group.get_enum("tpm").is_err());
    }

    #[test]
    fn test_group_preserves_order() {
        let xml = r#"<features>
            <gic supported='no'/>
            <vmcoreinfo supported='yes'/>
            <genid supported='yes'/>
        </features>"#;
        let doc = parse_document(xml, "features").unwrap();
        let group = OptionGroup::parse_children(Some(Element::root(&doc)));
        assert_eq!(group.enum_names(), vec!["gic", "vmcoreinfo", "genid"]);
        assert_eq!(group.len(), 3);
        assert!(group.get("genid").supported);
        assert!(group.contains("gic"));
        assert!(!group.get("gic").supported);
    }
}
