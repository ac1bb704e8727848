//! Structured annotations and the original-metadata overlay.
//!
//! Structured annotations let the document carry metadata from other
//! file formats, for example TIFF tag values. Vendor/tag key-value
//! pairs are materialized as `XMLAnnotation` subtrees holding an
//! `OriginalMetadata` element with nested `Key` and `Value` children;
//! the overlay below reads them back as a flat sequence. The mapping
//! is a derived view, not an index: lookups re-walk the annotations,
//! duplicate keys are legal, and the first match wins.

use std::collections::{HashMap, VecDeque};

use crate::collection::{set_count, CountPolicy};
use crate::constants::NS_ORIGINAL_METADATA;
use crate::entity::{child_text, set_child_text, HasNode, Identified};
use crate::error::{refused, ValidationError};
use crate::ident;
use crate::namespaces::Namespaces;
use crate::xml::{qn, XmlNode};

/// The original-metadata key under which the page name of the indexed
/// TIFF page is stored (TIFF IFD numbers 285 and onward).
pub fn page_name_key(index: usize) -> String {
    format!("PageName #{index}")
}

/// The `StructuredAnnotations` container element.
#[derive(Clone)]
pub struct StructuredAnnotations {
    node: XmlNode,
    ns: Namespaces,
}

impl StructuredAnnotations {
    pub(crate) fn new(node: XmlNode, ns: Namespaces) -> Self {
        Self { node, ns }
    }

    /// IDs of all annotations in the container, in document order.
    pub fn keys(&self) -> Vec<String> {
        self.node
            .children()
            .into_iter()
            .filter_map(|child| child.attr("ID"))
            .collect()
    }

    /// Whether an annotation with the given ID exists.
    pub fn contains(&self, id: &str) -> bool {
        self.node
            .children()
            .iter()
            .any(|child| child.attr("ID").as_deref() == Some(id))
    }

    /// The annotation with the given ID, if it exists.
    pub fn get(&self, id: &str) -> Option<Annotation> {
        self.node
            .children()
            .into_iter()
            .find(|child| child.attr("ID").as_deref() == Some(id))
            .map(|node| Annotation::new(node, self.ns.clone()))
    }

    /// Record an original-metadata key/value pair (for instance a TIFF
    /// tag name and its value) as a new annotation subtree. Returns
    /// the freshly generated annotation ID, which can be used to tie
    /// the entry to an image through an `AnnotationRef`.
    pub fn add_original_metadata(&self, key: &str, value: &str) -> String {
        let annotation = self.node.create_child(&qn(self.ns.sa(), "XMLAnnotation"));
        let id = ident::fresh_id("Annotation");
        annotation.set_attr("ID", &id);
        let holder = annotation.create_child(&qn(self.ns.sa(), "Value"));
        let entry = holder.create_child(&qn(NS_ORIGINAL_METADATA, "OriginalMetadata"));
        entry
            .create_child(&qn(NS_ORIGINAL_METADATA, "Key"))
            .set_text(key);
        entry
            .create_child(&qn(NS_ORIGINAL_METADATA, "Value"))
            .set_text(value);
        id
    }

    /// Iterate over all original-metadata entries as
    /// `(annotation_id, key, value)`. Lazy and single-pass; entries
    /// with a missing `Key` or `Value` are skipped with a warning.
    pub fn iter_original_metadata(&self) -> OriginalMetadataIter {
        OriginalMetadataIter {
            annotations: self
                .node
                .find_all(&qn(self.ns.sa(), "XMLAnnotation"))
                .into(),
            pending: VecDeque::new(),
            sa_value_tag: qn(self.ns.sa(), "Value"),
        }
    }

    /// Whether any entry carries the given key.
    pub fn has_original_metadata(&self, key: &str) -> bool {
        self.iter_original_metadata().any(|(_, k, _)| k == key)
    }

    /// The value of the first entry carrying the given key. A fresh
    /// walk per call; duplicate keys resolve to the first match.
    pub fn original_metadata_value(&self, key: &str) -> Option<String> {
        self.iter_original_metadata()
            .find(|(_, k, _)| k == key)
            .map(|(_, _, v)| v)
    }

    /// Collect the entries belonging to a set of annotation IDs as a
    /// key-to-value map.
    pub fn original_metadata_for_ids(&self, ids: &[&str]) -> HashMap<String, String> {
        self.iter_original_metadata()
            .filter(|(id, _, _)| ids.contains(&id.as_str()))
            .map(|(_, key, value)| (key, value))
            .collect()
    }
}

/// Lazy iterator over original-metadata entries. Safe to drop half-way
/// through; each entry is produced on demand.
pub struct OriginalMetadataIter {
    annotations: VecDeque<XmlNode>,
    pending: VecDeque<(String, String, String)>,
    sa_value_tag: String,
}

impl Iterator for OriginalMetadataIter {
    type Item = (String, String, String);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.pending.pop_front() {
                return Some(entry);
            }
            let annotation = self.annotations.pop_front()?;
            let Some(id) = annotation.attr("ID") else {
                log::warn!("skipping an XMLAnnotation with no ID");
                continue;
            };
            for holder in annotation.find_all(&self.sa_value_tag) {
                for entry in holder.find_all(&qn(NS_ORIGINAL_METADATA, "OriginalMetadata")) {
                    let key = child_text(&entry, &qn(NS_ORIGINAL_METADATA, "Key"));
                    let value = child_text(&entry, &qn(NS_ORIGINAL_METADATA, "Value"));
                    match (key, value) {
                        (Some(key), Some(value)) => {
                            self.pending.push_back((id.clone(), key, value));
                        }
                        _ => log::warn!("original metadata entry {id} is missing its Key or Value"),
                    }
                }
            }
        }
    }
}

/// One annotation in the container, of any concrete annotation type.
#[derive(Clone)]
pub struct Annotation {
    node: XmlNode,
    ns: Namespaces,
}

impl HasNode for Annotation {
    fn node(&self) -> &XmlNode {
        &self.node
    }
    fn namespaces(&self) -> &Namespaces {
        &self.ns
    }
}

impl Identified for Annotation {
    const KIND: &'static str = "Annotation";
}

impl Annotation {
    pub(crate) fn new(node: XmlNode, ns: Namespaces) -> Self {
        Self { node, ns }
    }

    /// ID of the experimenter who authored the annotation, if set.
    pub fn annotator(&self) -> Option<String> {
        self.node.attr("Annotator")
    }

    /// Set the authoring experimenter, validated as an `Experimenter`
    /// identifier.
    pub fn set_annotator(&self, value: &str) -> Result<(), ValidationError> {
        if !ident::validate("Experimenter", value) {
            return Err(refused(ValidationError::InvalidId {
                kind: "Experimenter",
                value: value.to_string(),
            }));
        }
        self.node.set_attr("Annotator", value);
        Ok(())
    }

    /// Free-text description, if present.
    pub fn description(&self) -> Option<String> {
        child_text(&self.node, &qn(self.ns.ome(), "Description"))
    }

    /// Set the description, creating the child on demand.
    pub fn set_description(&self, text: &str) {
        set_child_text(&self.node, &qn(self.ns.ome(), "Description"), text);
    }

    /// The annotation's value payload, if present.
    pub fn value(&self) -> Option<String> {
        child_text(&self.node, &qn(self.ns.ome(), "Value"))
    }

    /// Set the value payload, creating the child on demand.
    pub fn set_value(&self, text: &str) {
        set_child_text(&self.node, &qn(self.ns.ome(), "Value"), text);
    }

    /// Number of `AnnotationRef` children.
    pub fn annotation_ref_count(&self) -> usize {
        self.node
            .find_all(&qn(self.ns.ome(), "AnnotationRef"))
            .len()
    }

    /// Resize the `AnnotationRef` collection. New references start
    /// without a target.
    pub fn set_annotation_ref_count(&self, count: usize) -> Result<(), ValidationError> {
        let tag = qn(self.ns.ome(), "AnnotationRef");
        set_count(&self.node, &tag, "AnnotationRef", count, CountPolicy::AllowEmpty, |_| {
            Ok(XmlNode::new(tag.clone()))
        })
    }

    /// The indexed `AnnotationRef` child, if it exists.
    pub fn annotation_ref(&self, index: usize) -> Option<AnnotationRef> {
        self.node
            .find_all(&qn(self.ns.ome(), "AnnotationRef"))
            .get(index)
            .map(|node| AnnotationRef::new(node.clone(), self.ns.clone()))
    }
}

/// A reference from an entity to an annotation.
#[derive(Clone)]
pub struct AnnotationRef {
    node: XmlNode,
    ns: Namespaces,
}

impl HasNode for AnnotationRef {
    fn node(&self) -> &XmlNode {
        &self.node
    }
    fn namespaces(&self) -> &Namespaces {
        &self.ns
    }
}

impl Identified for AnnotationRef {
    const KIND: &'static str = "Annotation";
}

impl AnnotationRef {
    pub(crate) fn new(node: XmlNode, ns: Namespaces) -> Self {
        Self { node, ns }
    }
}
