//! Namespace resolution over a parsed tree.
//!
//! OME-XML documents spread their elements over three schema
//! namespaces: the primary schema (`ome`), structured annotations
//! (`sa`) and the screen/plate/well schema (`spw`). Exact URIs vary by
//! schema release, so the resolver scans the tags actually present and
//! classifies each namespace URI by the schema-name segment of its
//! path. A key never seen by the scan stays unresolved; accessors that
//! must create elements in an unresolved namespace fall back to the
//! canonical release URI.

use std::sync::OnceLock;

use regex::Regex;

use crate::constants::{NS_OME_DEFAULT, NS_SA_DEFAULT, NS_SCHEMA_PATTERN, NS_SPW_DEFAULT};
use crate::xml::{split_qn, XmlNode};

fn schema_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(NS_SCHEMA_PATTERN).expect("schema namespace pattern is valid")
    })
}

/// The namespace URIs a document actually uses, keyed by schema role.
#[derive(Debug, Clone, Default)]
pub struct Namespaces {
    /// Primary OME schema namespace, if any element used it.
    pub ome: Option<String>,
    /// Structured-annotations namespace, if any element used it.
    pub sa: Option<String>,
    /// Screen/plate/well namespace, if any element used it.
    pub spw: Option<String>,
}

impl Namespaces {
    /// Scan a subtree and record, for each schema role, the most
    /// recently seen namespace URI among the tags that match the
    /// schema pattern.
    pub fn scan(root: &XmlNode) -> Self {
        let mut table = Self::default();
        let pattern = schema_pattern();
        for node in root.iter_descendants() {
            let tag = node.tag();
            let Some((uri, _)) = split_qn(&tag) else {
                continue;
            };
            let Some(captures) = pattern.captures(uri) else {
                continue;
            };
            match captures["key"].to_lowercase().as_str() {
                "ome" => table.ome = Some(uri.to_string()),
                "sa" => table.sa = Some(uri.to_string()),
                "spw" => table.spw = Some(uri.to_string()),
                _ => {}
            }
        }
        table
    }

    /// Whether the primary schema namespace was resolved. A document
    /// where this is false is not OME-XML.
    pub fn primary_resolved(&self) -> bool {
        self.ome.is_some()
    }

    /// Primary schema URI (canonical release URI when unresolved).
    pub fn ome(&self) -> &str {
        self.ome.as_deref().unwrap_or(NS_OME_DEFAULT)
    }

    /// Structured-annotations URI (canonical release URI when unresolved).
    pub fn sa(&self) -> &str {
        self.sa.as_deref().unwrap_or(NS_SA_DEFAULT)
    }

    /// Screen/plate/well URI (canonical release URI when unresolved).
    pub fn spw(&self) -> &str {
        self.spw.as_deref().unwrap_or(NS_SPW_DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::qn;

    #[test]
    fn scan_classifies_schema_namespaces() {
        let root = XmlNode::new(qn("http://www.openmicroscopy.org/Schemas/OME/2016-06", "OME"));
        root.create_child(&qn(
            "http://www.openmicroscopy.org/Schemas/SPW/2016-06",
            "Plate",
        ));
        let table = Namespaces::scan(&root);
        assert!(table.primary_resolved());
        assert_eq!(table.ome(), "http://www.openmicroscopy.org/Schemas/OME/2016-06");
        assert_eq!(table.spw, Some("http://www.openmicroscopy.org/Schemas/SPW/2016-06".into()));
        // Never encountered: unresolved, but the accessor falls back.
        assert!(table.sa.is_none());
        assert_eq!(table.sa(), NS_SA_DEFAULT);
    }

    #[test]
    fn scan_ignores_foreign_namespaces() {
        let root = XmlNode::new(qn("urn:some:other:schema", "Data"));
        let table = Namespaces::scan(&root);
        assert!(!table.primary_resolved());
    }

    #[test]
    fn later_uri_wins_per_key() {
        let root = XmlNode::new(qn("http://www.openmicroscopy.org/Schemas/OME/2013-06", "OME"));
        root.create_child(&qn(
            "http://www.openmicroscopy.org/Schemas/OME/2016-06",
            "Image",
        ));
        let table = Namespaces::scan(&root);
        assert_eq!(table.ome(), "http://www.openmicroscopy.org/Schemas/OME/2016-06");
    }
}
