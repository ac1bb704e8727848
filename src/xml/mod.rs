//! Minimal owned DOM used as the backing store for the metadata model.
//!
//! The rest of the crate addresses this tree exclusively through the
//! capability surface below: find/find-all by qualified name, child
//! creation/removal, attribute and text access, and descendant
//! iteration. Tags are stored fully qualified as `{namespace-uri}local`
//! (the ElementTree convention), so no node ever depends on prefix
//! context.
//!
//! Nodes are cheap reference-counted handles with interior mutability;
//! cloning a handle aliases the same element. The model is
//! single-threaded by design.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub use error::XmlError;
pub use reader::parse;
pub use writer::serialize;

mod error;
mod reader;
mod writer;

#[cfg(test)]
mod tests;

/// Build a qualified tag name from a namespace URI and a local name.
pub fn qn(namespace: &str, local: &str) -> String {
    format!("{{{namespace}}}{local}")
}

/// Split a qualified tag into its namespace URI and local name, or
/// `None` when the tag carries no namespace.
pub fn split_qn(tag: &str) -> Option<(&str, &str)> {
    let rest = tag.strip_prefix('{')?;
    let end = rest.find('}')?;
    Some((&rest[..end], &rest[end + 1..]))
}

struct NodeData {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<XmlNode>,
    text: Option<String>,
}

/// A handle to one element in the tree. Clones alias the same element.
#[derive(Clone)]
pub struct XmlNode {
    inner: Rc<RefCell<NodeData>>,
}

impl XmlNode {
    /// Create a detached element with the given (qualified) tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(NodeData {
                tag: tag.into(),
                attrs: Vec::new(),
                children: Vec::new(),
                text: None,
            })),
        }
    }

    /// The element's qualified tag.
    pub fn tag(&self) -> String {
        self.inner.borrow().tag.clone()
    }

    /// Whether two handles alias the same element.
    pub fn same_node(&self, other: &XmlNode) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// First direct child with the given qualified tag.
    pub fn find(&self, tag: &str) -> Option<XmlNode> {
        self.inner
            .borrow()
            .children
            .iter()
            .find(|c| c.inner.borrow().tag == tag)
            .cloned()
    }

    /// All direct children with the given qualified tag, in document order.
    pub fn find_all(&self, tag: &str) -> Vec<XmlNode> {
        self.inner
            .borrow()
            .children
            .iter()
            .filter(|c| c.inner.borrow().tag == tag)
            .cloned()
            .collect()
    }

    /// Create a child with the given qualified tag and append it.
    pub fn create_child(&self, tag: &str) -> XmlNode {
        let child = XmlNode::new(tag);
        self.append(child.clone());
        child
    }

    /// Append an existing (detached) element as the last child.
    pub fn append(&self, child: XmlNode) {
        self.inner.borrow_mut().children.push(child);
    }

    /// Remove a direct child, matched by element identity. Returns
    /// whether anything was removed.
    pub fn remove_child(&self, child: &XmlNode) -> bool {
        let mut data = self.inner.borrow_mut();
        let before = data.children.len();
        data.children.retain(|c| !Rc::ptr_eq(&c.inner, &child.inner));
        data.children.len() != before
    }

    /// All direct children, in document order.
    pub fn children(&self) -> Vec<XmlNode> {
        self.inner.borrow().children.clone()
    }

    /// Attribute value, or `None` when absent.
    pub fn attr(&self, name: &str) -> Option<String> {
        self.inner
            .borrow()
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    /// Set (or replace) an attribute, preserving first-write order.
    pub fn set_attr(&self, name: &str, value: impl Into<String>) {
        let value = value.into();
        let mut data = self.inner.borrow_mut();
        if let Some(entry) = data.attrs.iter_mut().find(|(k, _)| k == name) {
            entry.1 = value;
        } else {
            data.attrs.push((name.to_string(), value));
        }
    }

    /// All attributes, in document order.
    pub fn attrs(&self) -> Vec<(String, String)> {
        self.inner.borrow().attrs.clone()
    }

    /// The element's text content, or `None` when it has none.
    pub fn text(&self) -> Option<String> {
        self.inner.borrow().text.clone()
    }

    /// Set the element's text content.
    pub fn set_text(&self, value: impl Into<String>) {
        self.inner.borrow_mut().text = Some(value.into());
    }

    /// The element followed by every descendant, depth-first. Used by
    /// the namespace scan; documents are small enough that collecting
    /// is fine.
    pub fn iter_descendants(&self) -> Vec<XmlNode> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into(&self, out: &mut Vec<XmlNode>) {
        out.push(self.clone());
        for child in self.inner.borrow().children.iter() {
            child.collect_into(out);
        }
    }
}

impl fmt::Debug for XmlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.inner.borrow();
        f.debug_struct("XmlNode")
            .field("tag", &data.tag)
            .field("attrs", &data.attrs)
            .field("children", &data.children.len())
            .finish()
    }
}
