//! Typed access to capability documents.
//!
//! All "element may be absent" defaulting lives here: accessors return empty
//! strings, empty lists, `None` or a caller-supplied default instead of
//! failing. Model builders never touch `roxmltree` directly.

use crate::error::{Error, Result};

/// Parse `text` and check the root element name.
pub(crate) fn parse_document<'a>(
    text: &'a str,
    expected_root: &'static str,
) -> Result<roxmltree::Document<'a>> {
    let doc = roxmltree::Document::parse(text)?;
    let found = doc.root_element().tag_name().name();
    if found != expected_root {
        return Err(Error::UnexpectedRoot {
            expected: expected_root,
            found: found.to_string(),
        });
    }
    Ok(doc)
}

/// Thin element wrapper exposing defaulting accessors.
#[derive(Clone, Copy)]
pub(crate) struct Element<'a, 'input> {
    node: roxmltree::Node<'a, 'input>,
}

impl<'a, 'input> Element<'a, 'input> {
    pub(crate) fn root(doc: &'a roxmltree::Document<'input>) -> Self {
        Self {
            node: doc.root_element(),
        }
    }

    pub(crate) fn name(&self) -> &'a str {
        self.node.tag_name().name()
    }

    /// First child element called `name`.
    pub(crate) fn child(&self, name: &str) -> Option<Element<'a, 'input>> {
        self.node
            .children()
            .find(|n| n.is_element() && n.tag_name().name() == name)
            .map(|node| Element { node })
    }

    /// Child elements called `name`, in document order.
    pub(crate) fn children_named<'n>(
        &self,
        name: &'n str,
    ) -> impl Iterator<Item = Element<'a, 'input>> + 'n
    where
        'a: 'n,
        'input: 'n,
    {
        self.node
            .children()
            .filter(move |n| n.is_element() && n.tag_name().name() == name)
            .map(|node| Element { node })
    }

    /// First child element called `name` whose `attr` equals `value`.
    pub(crate) fn child_where(
        &self,
        name: &str,
        attr: &str,
        value: &str,
    ) -> Option<Element<'a, 'input>> {
        self.children_named(name).find(|c| c.attr(attr) == Some(value))
    }

    /// All child elements, in document order.
    pub(crate) fn elements(&self) -> impl Iterator<Item = Element<'a, 'input>> {
        self.node
            .children()
            .filter(|n| n.is_element())
            .map(|node| Element { node })
    }

    /// Follow a `/`-separated path of child element names.
    pub(crate) fn path(&self, path: &str) -> Option<Element<'a, 'input>> {
        path.split('/')
            .filter(|s| !s.is_empty())
            .try_fold(*self, |el, name| el.child(name))
    }

    pub(crate) fn attr(&self, name: &str) -> Option<&'a str> {
        self.node.attribute(name)
    }

    /// Attribute text, or an empty string.
    pub(crate) fn attr_or_empty(&self, name: &str) -> String {
        self.attr(name).unwrap_or_default().to_string()
    }

    /// Trimmed text content, or an empty string.
    pub(crate) fn text(&self) -> String {
        self.node.text().unwrap_or_default().trim().to_string()
    }

    /// Trimmed text of the child element `name`, or an empty string.
    pub(crate) fn child_text(&self, name: &str) -> String {
        self.child(name).map(|c| c.text()).unwrap_or_default()
    }

    /// Trimmed text of the child element `name`, `None` if absent or empty.
    pub(crate) fn child_text_opt(&self, name: &str) -> Option<String> {
        self.child(name).map(|c| c.text()).filter(|t| !t.is_empty())
    }

    /// Texts of every child element called `name`.
    pub(crate) fn child_texts(&self, name: &str) -> Vec<String> {
        self.children_named(name).map(|c| c.text()).collect()
    }

    /// Tri-state `yes`/`no` attribute: `None` when absent or unrecognized.
    pub(crate) fn yes_no(&self, name: &str) -> Option<bool> {
        match self.attr(name)? {
            "yes" | "on" | "true" => Some(true),
            "no" | "off" | "false" => Some(false),
            other => {
                tracing::warn!(
                    element = self.name(),
                    attribute = name,
                    value = other,
                    "unrecognized boolean value"
                );
                None
            }
        }
    }

    /// Numeric attribute; absent or unparsable values yield `default`.
    pub(crate) fn u32_attr_or(&self, name: &str, default: u32) -> u32 {
        match self.attr(name) {
            None => default,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(
                    element = self.name(),
                    attribute = name,
                    value = raw,
                    default,
                    "unparsable count, using default"
                );
                default
            }),
        }
    }

    /// Numeric attribute, `None` if absent or unparsable.
    pub(crate) fn u32_attr(&self, name: &str) -> Option<u32> {
        self.attr(name).and_then(|raw| raw.trim().parse().ok())
    }

    /// Numeric child text, `None` if absent or unparsable.
    pub(crate) fn child_u32(&self, name: &str) -> Option<u32> {
        self.child_text_opt(name).and_then(|t| t.parse().ok())
    }

    pub(crate) fn child_u64(&self, name: &str) -> Option<u64> {
        self.child_text_opt(name).and_then(|t| t.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
        <root>
          <a x='1' flag='yes' bad='maybe'>
            <b> hello </b>
            <b>world</b>
            <c n='  7 '/>
          </a>
        </root>"#;

    #[test]
    fn test_root_mismatch() {
        let err = parse_document(DOC, "capabilities").err().unwrap();
        assert!(matches!(err, Error::UnexpectedRoot { .. }));
        assert!(err.to_string().contains("<root>"));
    }

    #[test]
    fn test_malformed() {
        let err = parse_document("<root><a></root>", "root").err().unwrap();
        assert!(matches!(err, Error::Document(_)));
    }

    #[test]
    fn test_path_and_texts() {
        let doc = parse_document(DOC, "root").unwrap();
        let root = Element::root(&doc);
        let a = root.path("a").unwrap();
        assert_eq!(a.child_text("b"), "hello");
        assert_eq!(a.child_texts("b"), vec!["hello", "world"]);
        assert_eq!(root.path("a/c").unwrap().u32_attr_or("n", 1), 7);
        assert!(root.path("a/missing").is_none());
        assert!(root.child_where("a", "x", "1").is_some());
        assert!(root.child_where("a", "x", "2").is_none());
        assert_eq!(a.child_text("missing"), "");
        assert!(a.child_text_opt("missing").is_none());
    }

    #[test]
    fn test_attribute_defaults() {
        let doc = parse_document(DOC, "root").unwrap();
        let a = Element::root(&doc).child("a").unwrap();
        assert_eq!(a.attr_or_empty("x"), "1");
        assert_eq!(a.attr_or_empty("nope"), "");
        assert_eq!(a.yes_no("flag"), Some(true));
        assert_eq!(a.yes_no("bad"), None);
        assert_eq!(a.yes_no("nope"), None);
        assert_eq!(a.u32_attr_or("bad", 1), 1);
        assert_eq!(a.u32_attr_or("nope", 1), 1);
    }
}
