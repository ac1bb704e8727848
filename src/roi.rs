//! Region-of-interest accessors: `Roi`, its shape `Union`, the
//! `Rectangle` shape, `RoiRef` back-references and the shared [`Shape`]
//! capability.
//!
//! ROI identifiers follow a canonical convention: the value written is
//! always `ROI:` + suffix, whatever the caller passed, and the
//! `ROIRef` on the image side must encode the identical canonical form
//! for the pair to be considered linked. The convention is enforced by
//! the setters only; neither side checks that the other exists.

use crate::annotations::AnnotationRef;
use crate::collection::{set_count, CountPolicy};
use crate::entity::{
    get_bool_attr, get_color_attr, get_float_attr, get_int_attr, set_enum_attr, set_unit_attr,
    HasNode, Identified,
};
use crate::error::{refused, ValidationError};
use crate::namespaces::Namespaces;
use crate::units::{Quantity, FILL_RULES, FONT_FAMILIES, FONT_STYLES};
use crate::xml::{qn, XmlNode};

fn canonical_roi_id(value: &str) -> String {
    let suffix = value
        .get(..4)
        .filter(|prefix| prefix.eq_ignore_ascii_case("ROI:"))
        .map(|_| &value[4..])
        .unwrap_or(value);
    format!("ROI:{suffix}")
}

/// Drawing and plane-placement attributes shared by every shape kind.
pub trait Shape: HasNode {
    /// Fill color as signed 32-bit RGBA.
    fn fill_color(&self) -> Result<Option<i32>, ValidationError> {
        get_color_attr(self.node(), "FillColor")
    }

    /// Set the fill color.
    fn set_fill_color(&self, value: i32) {
        self.node().set_attr("FillColor", value.to_string());
    }

    /// Fill rule, if set.
    fn fill_rule(&self) -> Option<String> {
        self.node().attr("FillRule")
    }

    /// Set the fill rule (`EvenOdd` or `NonZero`).
    fn set_fill_rule(&self, value: &str) -> Result<(), ValidationError> {
        set_enum_attr(self.node(), "FillRule", FILL_RULES, value)
    }

    /// Stroke color as signed 32-bit RGBA (`-16776961` is red).
    fn stroke_color(&self) -> Result<Option<i32>, ValidationError> {
        get_color_attr(self.node(), "StrokeColor")
    }

    /// Set the stroke color.
    fn set_stroke_color(&self, value: i32) {
        self.node().set_attr("StrokeColor", value.to_string());
    }

    /// Stroke width.
    fn stroke_width(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(self.node(), "StrokeWidth")
    }

    /// Set the stroke width. Units are set by `StrokeWidthUnit`,
    /// defaulted to `pixel` when absent.
    fn set_stroke_width(&self, value: f64) {
        self.node().set_attr("StrokeWidth", value.to_string());
        crate::entity::default_unit(self.node(), "StrokeWidthUnit", "pixel");
    }

    /// Unit of the stroke width.
    fn stroke_width_unit(&self) -> Option<String> {
        self.node().attr("StrokeWidthUnit")
    }

    /// Set the unit of the stroke width.
    fn set_stroke_width_unit(&self, value: &str) -> Result<(), ValidationError> {
        set_unit_attr(self.node(), "StrokeWidthUnit", Quantity::Length, value)
    }

    /// Stroke dash pattern, if set.
    fn stroke_dash_array(&self) -> Option<String> {
        self.node().attr("StrokeDashArray")
    }

    /// Set the stroke dash pattern.
    fn set_stroke_dash_array(&self, value: &str) {
        self.node().set_attr("StrokeDashArray", value);
    }

    /// Text label attached to the shape.
    fn text(&self) -> Option<String> {
        self.node().attr("Text")
    }

    /// Set the text label.
    fn set_text(&self, value: &str) {
        self.node().set_attr("Text", value);
    }

    /// Font family of the text label.
    fn font_family(&self) -> Option<String> {
        self.node().attr("FontFamily")
    }

    /// Set the font family (one of the five generic CSS families).
    fn set_font_family(&self, value: &str) -> Result<(), ValidationError> {
        set_enum_attr(self.node(), "FontFamily", FONT_FAMILIES, value)
    }

    /// Font size of the text label.
    fn font_size(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(self.node(), "FontSize")
    }

    /// Set the font size. Must not be negative; units are set by
    /// `FontSizeUnit`, defaulted to `pt` when absent.
    fn set_font_size(&self, value: i64) -> Result<(), ValidationError> {
        if value < 0 {
            return Err(refused(ValidationError::OutOfRange {
                attr: "FontSize",
                detail: format!("{value} is negative"),
            }));
        }
        self.node().set_attr("FontSize", value.to_string());
        crate::entity::default_unit(self.node(), "FontSizeUnit", "pt");
        Ok(())
    }

    /// Unit of the font size.
    fn font_size_unit(&self) -> Option<String> {
        self.node().attr("FontSizeUnit")
    }

    /// Set the unit of the font size.
    fn set_font_size_unit(&self, value: &str) -> Result<(), ValidationError> {
        set_unit_attr(self.node(), "FontSizeUnit", Quantity::Length, value)
    }

    /// Font style of the text label.
    fn font_style(&self) -> Option<String> {
        self.node().attr("FontStyle")
    }

    /// Set the font style.
    fn set_font_style(&self, value: &str) -> Result<(), ValidationError> {
        set_enum_attr(self.node(), "FontStyle", FONT_STYLES, value)
    }

    /// Whether the shape is locked against interactive editing.
    fn locked(&self) -> Result<Option<bool>, ValidationError> {
        get_bool_attr(self.node(), "Locked")
    }

    /// Lock or unlock the shape.
    fn set_locked(&self, value: bool) {
        self.node().set_attr("Locked", if value { "true" } else { "false" });
    }

    /// The Z index the shape is placed on.
    fn the_z(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(self.node(), "TheZ")
    }

    /// Set the Z index. Must not be negative.
    fn set_the_z(&self, value: i64) -> Result<(), ValidationError> {
        set_plane_index(self.node(), "TheZ", value)
    }

    /// The channel index the shape is placed on.
    fn the_c(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(self.node(), "TheC")
    }

    /// Set the channel index. Must not be negative.
    fn set_the_c(&self, value: i64) -> Result<(), ValidationError> {
        set_plane_index(self.node(), "TheC", value)
    }

    /// The T index the shape is placed on.
    fn the_t(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(self.node(), "TheT")
    }

    /// Set the T index. Must not be negative.
    fn set_the_t(&self, value: i64) -> Result<(), ValidationError> {
        set_plane_index(self.node(), "TheT", value)
    }

    /// The shape's affine transform, if one is attached.
    fn transform(&self) -> Option<AffineTransform> {
        self.node()
            .find(&qn(self.namespaces().ome(), "Transform"))
            .map(AffineTransform::new)
    }

    /// The shape's affine transform, created on demand.
    fn ensure_transform(&self) -> AffineTransform {
        let tag = qn(self.namespaces().ome(), "Transform");
        let node = self
            .node()
            .find(&tag)
            .unwrap_or_else(|| self.node().create_child(&tag));
        AffineTransform::new(node)
    }

    /// Number of `AnnotationRef` children.
    fn annotation_ref_count(&self) -> usize {
        self.node()
            .find_all(&qn(self.namespaces().ome(), "AnnotationRef"))
            .len()
    }

    /// Resize the `AnnotationRef` collection. New references start
    /// without a target; callers point them at annotations afterwards.
    fn set_annotation_ref_count(&self, count: usize) -> Result<(), ValidationError> {
        let tag = qn(self.namespaces().ome(), "AnnotationRef");
        set_count(self.node(), &tag, "AnnotationRef", count, CountPolicy::AllowEmpty, |_| {
            Ok(XmlNode::new(tag.clone()))
        })
    }

    /// The indexed `AnnotationRef` child, if it exists.
    fn annotation_ref(&self, index: usize) -> Option<AnnotationRef> {
        self.node()
            .find_all(&qn(self.namespaces().ome(), "AnnotationRef"))
            .get(index)
            .map(|node| AnnotationRef::new(node.clone(), self.namespaces().clone()))
    }
}

fn set_plane_index(node: &XmlNode, attr: &'static str, value: i64) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(refused(ValidationError::OutOfRange {
            attr,
            detail: format!("{value} is negative"),
        }));
    }
    node.set_attr(attr, value.to_string());
    Ok(())
}

/// A 2x3 affine transform attached to a shape:
///
/// ```text
/// | A00 A01 A02 |
/// | A10 A11 A12 |
/// |  0   0   1  |
/// ```
#[derive(Clone)]
pub struct AffineTransform {
    node: XmlNode,
}

impl AffineTransform {
    pub(crate) fn new(node: XmlNode) -> Self {
        Self { node }
    }

    /// Read one matrix component by attribute name.
    fn component(&self, attr: &str) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, attr)
    }

    /// The A00 component.
    pub fn a00(&self) -> Result<Option<f64>, ValidationError> {
        self.component("A00")
    }

    /// The A01 component.
    pub fn a01(&self) -> Result<Option<f64>, ValidationError> {
        self.component("A01")
    }

    /// The A02 component.
    pub fn a02(&self) -> Result<Option<f64>, ValidationError> {
        self.component("A02")
    }

    /// The A10 component.
    pub fn a10(&self) -> Result<Option<f64>, ValidationError> {
        self.component("A10")
    }

    /// The A11 component.
    pub fn a11(&self) -> Result<Option<f64>, ValidationError> {
        self.component("A11")
    }

    /// The A12 component.
    pub fn a12(&self) -> Result<Option<f64>, ValidationError> {
        self.component("A12")
    }

    /// Write the full matrix, row-major `[[A00, A01, A02], [A10, A11, A12]]`.
    pub fn set_matrix(&self, matrix: [[f64; 3]; 2]) {
        let [[a00, a01, a02], [a10, a11, a12]] = matrix;
        self.node.set_attr("A00", a00.to_string());
        self.node.set_attr("A01", a01.to_string());
        self.node.set_attr("A02", a02.to_string());
        self.node.set_attr("A10", a10.to_string());
        self.node.set_attr("A11", a11.to_string());
        self.node.set_attr("A12", a12.to_string());
    }
}

/// One `ROI` element under the document root.
#[derive(Clone)]
pub struct Roi {
    node: XmlNode,
    ns: Namespaces,
}

impl HasNode for Roi {
    fn node(&self) -> &XmlNode {
        &self.node
    }
    fn namespaces(&self) -> &Namespaces {
        &self.ns
    }
}

impl Roi {
    pub(crate) fn new(node: XmlNode, ns: Namespaces) -> Self {
        Self { node, ns }
    }

    /// The `ID` attribute, if set.
    pub fn id(&self) -> Option<String> {
        self.node.attr("ID")
    }

    /// Set the ID, canonicalized to the `ROI:` prefix whatever the
    /// caller passed.
    pub fn set_id(&self, value: &str) {
        self.node.set_attr("ID", canonical_roi_id(value));
    }

    /// The `Name` attribute, if set.
    pub fn name(&self) -> Option<String> {
        self.node.attr("Name")
    }

    /// Set the `Name` attribute.
    pub fn set_name(&self, value: &str) {
        self.node.set_attr("Name", value);
    }

    /// The ROI's shape union, if present.
    pub fn union(&self) -> Option<ShapeUnion> {
        self.node
            .find(&qn(self.ns.ome(), "Union"))
            .map(|node| ShapeUnion::new(node, self.ns.clone()))
    }
}

/// The `Union` element grouping an ROI's shapes.
#[derive(Clone)]
pub struct ShapeUnion {
    node: XmlNode,
    ns: Namespaces,
}

impl ShapeUnion {
    pub(crate) fn new(node: XmlNode, ns: Namespaces) -> Self {
        Self { node, ns }
    }

    /// The union's rectangle, if present. Rectangles are the only
    /// shape kind modeled so far.
    pub fn rectangle(&self) -> Option<Rectangle> {
        self.node
            .find(&qn(self.ns.ome(), "Rectangle"))
            .map(|node| Rectangle::new(node, self.ns.clone()))
    }
}

/// A rectangle shape inside an ROI union.
#[derive(Clone)]
pub struct Rectangle {
    node: XmlNode,
    ns: Namespaces,
}

impl HasNode for Rectangle {
    fn node(&self) -> &XmlNode {
        &self.node
    }
    fn namespaces(&self) -> &Namespaces {
        &self.ns
    }
}

impl Identified for Rectangle {
    const KIND: &'static str = "Shape";
}

impl Shape for Rectangle {}

impl Rectangle {
    pub(crate) fn new(node: XmlNode, ns: Namespaces) -> Self {
        Self { node, ns }
    }

    /// X coordinate of the top-left corner.
    pub fn x(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "X")
    }

    /// Set the X coordinate of the top-left corner.
    pub fn set_x(&self, value: f64) {
        self.node.set_attr("X", value.to_string());
    }

    /// Y coordinate of the top-left corner.
    pub fn y(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "Y")
    }

    /// Set the Y coordinate of the top-left corner.
    pub fn set_y(&self, value: f64) {
        self.node.set_attr("Y", value.to_string());
    }

    /// Width of the rectangle.
    pub fn width(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "Width")
    }

    /// Set the width.
    pub fn set_width(&self, value: f64) {
        self.node.set_attr("Width", value.to_string());
    }

    /// Height of the rectangle.
    pub fn height(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "Height")
    }

    /// Set the height.
    pub fn set_height(&self, value: f64) {
        self.node.set_attr("Height", value.to_string());
    }
}

/// A `ROIRef` back-reference from an image to an ROI.
#[derive(Clone)]
pub struct RoiRef {
    node: XmlNode,
    ns: Namespaces,
}

impl HasNode for RoiRef {
    fn node(&self) -> &XmlNode {
        &self.node
    }
    fn namespaces(&self) -> &Namespaces {
        &self.ns
    }
}

impl RoiRef {
    pub(crate) fn new(node: XmlNode, ns: Namespaces) -> Self {
        Self { node, ns }
    }

    /// The `ID` attribute, if set.
    pub fn id(&self) -> Option<String> {
        self.node.attr("ID")
    }

    /// Set the target ROI ID, canonicalized to the `ROI:` prefix so it
    /// pairs with the ROI's own canonical form.
    pub fn set_id(&self, value: &str) {
        self.node.set_attr("ID", canonical_roi_id(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rectangle() -> Rectangle {
        Rectangle::new(XmlNode::new("Rectangle"), Namespaces::default())
    }

    #[test]
    fn roi_ids_are_canonicalized() {
        assert_eq!(canonical_roi_id("5"), "ROI:5");
        assert_eq!(canonical_roi_id("ROI:5"), "ROI:5");
        assert_eq!(canonical_roi_id("roi:5"), "ROI:5");
        assert_eq!(canonical_roi_id(""), "ROI:");
    }

    #[test]
    fn roi_and_roiref_agree_on_the_canonical_form() {
        let roi = Roi::new(XmlNode::new("ROI"), Namespaces::default());
        let roiref = RoiRef::new(XmlNode::new("ROIRef"), Namespaces::default());
        roi.set_id("7");
        roiref.set_id("ROI:7");
        assert_eq!(roi.id(), roiref.id());
    }

    #[test]
    fn shape_enums_are_closed_sets() {
        let rect = rectangle();
        rect.set_fill_rule("EvenOdd").unwrap();
        assert!(rect.set_fill_rule("Winding").is_err());
        assert_eq!(rect.fill_rule().as_deref(), Some("EvenOdd"));

        rect.set_font_family("monospace").unwrap();
        assert!(rect.set_font_family("Comic Sans").is_err());
        rect.set_font_style("BoldItalic").unwrap();
        assert!(rect.set_font_style("Underline").is_err());
    }

    #[test]
    fn stroke_width_and_font_size_default_their_units() {
        let rect = rectangle();
        rect.set_stroke_width(20.0);
        assert_eq!(rect.stroke_width_unit().as_deref(), Some("pixel"));
        rect.set_font_size(12).unwrap();
        assert_eq!(rect.font_size_unit().as_deref(), Some("pt"));
        assert!(rect.set_font_size(-1).is_err());
    }

    #[test]
    fn plane_indices_must_be_non_negative() {
        let rect = rectangle();
        rect.set_the_z(3).unwrap();
        assert!(rect.set_the_z(-1).is_err());
        assert_eq!(rect.the_z().unwrap(), Some(3));
    }

    #[test]
    fn transform_is_created_on_demand() {
        let rect = rectangle();
        assert!(rect.transform().is_none());
        rect.ensure_transform().set_matrix([[1.0, 0.0, 5.0], [0.0, 1.0, -5.0]]);
        let transform = rect.transform().unwrap();
        assert_eq!(transform.a02().unwrap(), Some(5.0));
        assert_eq!(transform.a12().unwrap(), Some(-5.0));
    }
}
