//! The root document type tying everything together.
//!
//! An [`OmeXml`] owns the parsed tree and the resolved namespace
//! table. Entity accessors handed out from here are transient views
//! into that tree; mutating a view mutates the document directly.

use chrono::Local;

use crate::annotations::StructuredAnnotations;
use crate::collection::{set_count, CountPolicy};
use crate::constants::{DEFAULT_DOCUMENT, DO_XYCTZ, NS_ORIGINAL_METADATA, PT_UINT8};
use crate::entity::Identified;
use crate::error::{FormatError, ValidationError};
use crate::ident;
use crate::image::{Channel, Image, Pixels};
use crate::instrument::Instrument;
use crate::namespaces::Namespaces;
use crate::plate::Plates;
use crate::roi::{Rectangle, Roi, Shape};
use crate::xml::{self, qn, XmlError, XmlNode};

/// The current time in `xsd:dateTime` form, used to stamp acquisition
/// dates on freshly created images.
fn xsd_now() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// An OME-XML metadata document.
///
/// Construct one by parsing existing XML with [`OmeXml::from_str`], or
/// start from the built-in default template with [`OmeXml::new`]:
///
/// ```
/// use omemeta::OmeXml;
///
/// let doc = OmeXml::new();
/// let image = doc.image(0).expect("the default document has one image");
/// image.set_name("MyImage");
/// let xml = doc.to_xml().expect("serialization succeeds");
/// assert!(xml.contains("MyImage"));
/// ```
pub struct OmeXml {
    root: XmlNode,
    ns: Namespaces,
}

impl OmeXml {
    /// Start from the default template: one 512x512 uint8 image with a
    /// single channel, acquisition date stamped now.
    pub fn new() -> Self {
        let doc = Self::from_str(DEFAULT_DOCUMENT).expect("built-in default document is valid");
        if let Some(image) = doc.image(0) {
            image.set_acquisition_date(&xsd_now());
        }
        doc
    }

    /// Parse a document from XML text. Fails if the text is not
    /// well-formed XML or no element uses the primary OME namespace.
    pub fn from_str(text: &str) -> Result<Self, FormatError> {
        let root = xml::parse(text)?;
        let ns = Namespaces::scan(&root);
        if !ns.primary_resolved() {
            return Err(FormatError::NotOmeXml);
        }
        Ok(Self { root, ns })
    }

    /// Parse a document from raw bytes (must be UTF-8).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        let text = std::str::from_utf8(bytes).map_err(|e| FormatError::Xml(XmlError::Utf8(e)))?;
        Self::from_str(text)
    }

    /// The root element of the document tree.
    pub fn root(&self) -> &XmlNode {
        &self.root
    }

    /// The resolved namespace table.
    pub fn namespaces(&self) -> &Namespaces {
        &self.ns
    }

    /// Serialize the document, re-declaring the `ome`, `sa` and `spw`
    /// prefixes (resolved URI, or the canonical release URI when a
    /// namespace was never seen) plus the fixed original-metadata
    /// namespace on the root element.
    pub fn to_xml(&self) -> Result<String, XmlError> {
        let declared = vec![
            ("ome".to_string(), self.ns.ome().to_string()),
            ("sa".to_string(), self.ns.sa().to_string()),
            ("spw".to_string(), self.ns.spw().to_string()),
            ("om".to_string(), NS_ORIGINAL_METADATA.to_string()),
        ];
        xml::serialize(&self.root, &declared)
    }

    /// The number of images (= series) in the document.
    pub fn image_count(&self) -> usize {
        self.root.find_all(&qn(self.ns.ome(), "Image")).len()
    }

    /// Resize the image collection. The document must keep at least
    /// one image. Every new image is a complete default: generated ID,
    /// name `default.png`, acquisition date stamped now, and a nested
    /// single-channel 512x512 uint8 `Pixels` block. The subtree is
    /// built detached and attached only once complete, so a failure
    /// mid-construction never leaves a partial image in the tree.
    pub fn set_image_count(&self, count: usize) -> Result<(), ValidationError> {
        let tag = qn(self.ns.ome(), "Image");
        let ns = self.ns.clone();
        set_count(&self.root, &tag, "Image", count, CountPolicy::NonEmpty, |_| {
            default_image(&ns)
        })
    }

    /// The indexed image, if it exists.
    pub fn image(&self, index: usize) -> Option<Image> {
        self.root
            .find_all(&qn(self.ns.ome(), "Image"))
            .get(index)
            .map(|node| Image::new(node.clone(), self.ns.clone()))
    }

    /// The indexed instrument, if it exists.
    pub fn instrument(&self, index: usize) -> Option<Instrument> {
        self.root
            .find_all(&qn(self.ns.ome(), "Instrument"))
            .get(index)
            .map(|node| Instrument::new(node.clone(), self.ns.clone()))
    }

    /// The number of ROIs in the document.
    pub fn roi_count(&self) -> usize {
        self.root.find_all(&qn(self.ns.ome(), "ROI")).len()
    }

    /// Resize the ROI collection. The collection may not be emptied.
    /// Every new ROI gets the canonical `ROI:<index>` identifier, a
    /// `Marker <index>` name and a nested `Union`/`Rectangle` with a
    /// deterministic default geometry and a red stroke.
    pub fn set_roi_count(&self, count: usize) -> Result<(), ValidationError> {
        let tag = qn(self.ns.ome(), "ROI");
        let ns = self.ns.clone();
        set_count(&self.root, &tag, "ROI", count, CountPolicy::NonEmpty, |index| {
            default_roi(&ns, index)
        })
    }

    /// The indexed ROI, if it exists.
    pub fn roi(&self, index: usize) -> Option<Roi> {
        self.root
            .find_all(&qn(self.ns.ome(), "ROI"))
            .get(index)
            .map(|node| Roi::new(node.clone(), self.ns.clone()))
    }

    /// The document's plates.
    pub fn plates(&self) -> Plates {
        Plates::new(self.root.clone(), self.ns.clone())
    }

    /// The structured-annotations container, created on demand.
    pub fn structured_annotations(&self) -> StructuredAnnotations {
        let tag = qn(self.ns.sa(), "StructuredAnnotations");
        let node = self
            .root
            .find(&tag)
            .unwrap_or_else(|| self.root.create_child(&tag));
        StructuredAnnotations::new(node, self.ns.clone())
    }
}

impl Default for OmeXml {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a complete default image subtree, detached from the document.
fn default_image(ns: &Namespaces) -> Result<XmlNode, ValidationError> {
    let node = XmlNode::new(qn(ns.ome(), "Image"));
    let image = Image::new(node.clone(), ns.clone());
    image.set_id(&ident::fresh_id("Image"))?;
    image.set_name("default.png");
    image.set_acquisition_date(&xsd_now());

    let pixels_node = node.create_child(&qn(ns.ome(), "Pixels"));
    let pixels = Pixels::new(pixels_node.clone(), ns.clone());
    pixels.set_id(&ident::fresh_id("Pixels"))?;
    pixels.set_dimension_order(DO_XYCTZ);
    pixels.set_pixel_type(PT_UINT8);
    pixels.set_size_c(1);
    pixels.set_size_t(1);
    pixels.set_size_x(512);
    pixels.set_size_y(512);
    pixels.set_size_z(1);

    let channel_node = pixels_node.create_child(&qn(ns.ome(), "Channel"));
    let channel = Channel::new(channel_node, ns.clone());
    let channel_id = ident::fresh_id("Channel");
    channel.set_id(&channel_id)?;
    channel.set_name(&channel_id);
    channel.set_samples_per_pixel(1);

    Ok(node)
}

/// Build a complete default ROI subtree, detached from the document.
fn default_roi(ns: &Namespaces, index: usize) -> Result<XmlNode, ValidationError> {
    let node = XmlNode::new(qn(ns.ome(), "ROI"));
    let roi = Roi::new(node.clone(), ns.clone());
    roi.set_id(&index.to_string());
    roi.set_name(&format!("Marker {index}"));

    let union = node.create_child(&qn(ns.ome(), "Union"));
    let rect_node = union.create_child(&qn(ns.ome(), "Rectangle"));
    let rect = Rectangle::new(rect_node, ns.clone());
    rect.set_id(&format!("Shape:{index}:0"))?;
    rect.set_the_z(0)?;
    rect.set_the_c(0)?;
    rect.set_the_t(0)?;
    rect.set_stroke_color(-16776961); // red
    rect.set_stroke_width(20.0);
    rect.set_text(&index.to_string());
    rect.set_width(512.0);
    rect.set_height(512.0);
    rect.set_x(0.0);
    rect.set_y(0.0);

    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_document_matches_the_template_contract() {
        let doc = OmeXml::new();
        assert_eq!(doc.image_count(), 1);
        let image = doc.image(0).unwrap();
        assert_eq!(image.id().as_deref(), Some("Image:0"));
        assert_eq!(image.name().as_deref(), Some("default.png"));
        assert!(image.acquisition_date().is_some());
        let pixels = image.pixels().unwrap();
        assert_eq!(pixels.size_x().unwrap(), Some(512));
        assert_eq!(pixels.size_y().unwrap(), Some(512));
        assert_eq!(pixels.size_z().unwrap(), Some(1));
        assert_eq!(pixels.pixel_type().as_deref(), Some(PT_UINT8));
        assert_eq!(pixels.channel_count(), 1);
    }

    #[test]
    fn parse_refuses_non_ome_documents() {
        let err = OmeXml::from_str("<data xmlns=\"urn:other\"><x/></data>");
        assert!(matches!(err, Err(FormatError::NotOmeXml)));
        assert!(OmeXml::from_str("not xml at all <<<").is_err());
    }

    #[test]
    fn image_growth_builds_complete_defaults() {
        let doc = OmeXml::new();
        doc.set_image_count(3).unwrap();
        assert_eq!(doc.image_count(), 3);
        for index in 1..3 {
            let image = doc.image(index).unwrap();
            assert!(image.id().unwrap().starts_with("Image:"));
            let pixels = image.pixels().unwrap();
            assert_eq!(pixels.dimension_order().as_deref(), Some(DO_XYCTZ));
            assert_eq!(pixels.channel_count(), 1);
        }
        // Distinct generated identifiers per creation call.
        assert_ne!(doc.image(1).unwrap().id(), doc.image(2).unwrap().id());
    }

    #[test]
    fn image_collection_may_never_be_emptied() {
        let doc = OmeXml::new();
        assert!(doc.set_image_count(0).is_err());
        assert_eq!(doc.image_count(), 1);
    }

    #[test]
    fn roi_growth_populates_the_default_rectangle() {
        let doc = OmeXml::new();
        doc.set_roi_count(2).unwrap();
        assert_eq!(doc.roi_count(), 2);
        let roi = doc.roi(1).unwrap();
        assert_eq!(roi.id().as_deref(), Some("ROI:1"));
        assert_eq!(roi.name().as_deref(), Some("Marker 1"));
        let rect = roi.union().unwrap().rectangle().unwrap();
        assert_eq!(rect.id().as_deref(), Some("Shape:1:0"));
        assert_eq!(rect.stroke_color().unwrap(), Some(-16776961));
        assert_eq!(rect.width().unwrap(), Some(512.0));
        assert_eq!(rect.the_t().unwrap(), Some(0));
    }

    #[test]
    fn structured_annotations_container_is_created_once() {
        let doc = OmeXml::new();
        let first = doc.structured_annotations();
        first.add_original_metadata("Make", "Zeiss");
        let second = doc.structured_annotations();
        assert!(second.has_original_metadata("Make"));
        assert_eq!(doc.root().find_all(&qn(doc.namespaces().sa(), "StructuredAnnotations")).len(), 1);
    }
}
