//! Screen/plate/well accessors and the well addressing engine.
//!
//! A plate carries independent naming conventions for its row and
//! column axes, each either letter-based or number-based. A well's
//! canonical name is derived from its zero-based coordinates by
//! applying the row's convention to the row index and the column's
//! convention to the column index, in that order: row 1, column 2
//! under the default conventions is `B03`.

use crate::constants::WELL_ROW_ALPHABET;
use crate::entity::{
    child_text, get_color_attr, get_float_attr, get_int_attr, reference_id, set_child_text,
    set_reference, HasNode, Identified,
};
use crate::error::{refused, ValidationError};
use crate::ident;
use crate::namespaces::Namespaces;
use crate::xml::{qn, XmlNode};

/// Per-axis well-naming policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingConvention {
    /// Indices render as letters: 0 is `A`, 15 is `P`. The alphabet is
    /// fixed at sixteen letters; higher indices have no name.
    Letter,
    /// Indices render as one-based, zero-padded two-digit numbers.
    Number,
}

impl NamingConvention {
    /// The attribute value this convention is stored as.
    pub fn as_str(self) -> &'static str {
        match self {
            NamingConvention::Letter => "letter",
            NamingConvention::Number => "number",
        }
    }

    /// Parse a stored attribute value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "letter" => Some(NamingConvention::Letter),
            "number" => Some(NamingConvention::Number),
            _ => None,
        }
    }
}

/// Render one axis of a well name.
fn axis_part(
    index: i64,
    convention: NamingConvention,
    attr: &'static str,
) -> Result<String, ValidationError> {
    match convention {
        NamingConvention::Number => {
            if index < 0 {
                return Err(refused(ValidationError::OutOfRange {
                    attr,
                    detail: format!("{index} is negative"),
                }));
            }
            Ok(format!("{:02}", index + 1))
        }
        NamingConvention::Letter => usize::try_from(index)
            .ok()
            .and_then(|i| WELL_ROW_ALPHABET.as_bytes().get(i).copied())
            .map(|letter| char::from(letter).to_string())
            .ok_or_else(|| {
                refused(ValidationError::OutOfRange {
                    attr,
                    detail: format!(
                        "{index} is outside the {}-letter alphabet",
                        WELL_ROW_ALPHABET.len()
                    ),
                })
            }),
    }
}

/// Derive a canonical well name from zero-based coordinates and the
/// two axis conventions. `well_name(1, 2, Letter, Number)` is `B03`.
pub fn well_name(
    row: i64,
    column: i64,
    row_convention: NamingConvention,
    column_convention: NamingConvention,
) -> Result<String, ValidationError> {
    let row_part = axis_part(row, row_convention, "Row")?;
    let column_part = axis_part(column, column_convention, "Column")?;
    Ok(format!("{row_part}{column_part}"))
}

/// List-like view of the `Plate` elements under the document root.
#[derive(Clone)]
pub struct Plates {
    root: XmlNode,
    ns: Namespaces,
}

impl Plates {
    pub(crate) fn new(root: XmlNode, ns: Namespaces) -> Self {
        Self { root, ns }
    }

    fn plate_tag(&self) -> String {
        qn(self.ns.spw(), "Plate")
    }

    /// Number of plates in the document.
    pub fn len(&self) -> usize {
        self.root.find_all(&self.plate_tag()).len()
    }

    /// Whether the document has no plates.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The indexed plate, if it exists.
    pub fn get(&self, index: usize) -> Option<Plate> {
        self.root
            .find_all(&self.plate_tag())
            .get(index)
            .map(|node| Plate::new(node.clone(), self.ns.clone()))
    }

    /// Iterate over all plates in document order.
    pub fn iter(&self) -> impl Iterator<Item = Plate> + '_ {
        self.root
            .find_all(&self.plate_tag())
            .into_iter()
            .map(|node| Plate::new(node, self.ns.clone()))
    }

    /// Create a plate with the given name and a freshly generated ID.
    pub fn new_plate(&self, name: &str) -> Plate {
        let node = self.root.create_child(&self.plate_tag());
        let plate = Plate::new(node, self.ns.clone());
        // Generated inside the call so repeated calls cannot share an ID.
        plate.node.set_attr("ID", ident::fresh_id("Plate"));
        plate.set_name(name);
        plate
    }

    /// Create a plate with a caller-supplied ID, validated against the
    /// `Plate` kind.
    pub fn new_plate_with_id(&self, name: &str, id: &str) -> Result<Plate, ValidationError> {
        if !ident::validate("Plate", id) {
            return Err(refused(ValidationError::InvalidId {
                kind: "Plate",
                value: id.to_string(),
            }));
        }
        let node = self.root.create_child(&self.plate_tag());
        let plate = Plate::new(node, self.ns.clone());
        plate.node.set_attr("ID", id);
        plate.set_name(name);
        Ok(plate)
    }
}

/// One `Plate` element.
#[derive(Clone)]
pub struct Plate {
    node: XmlNode,
    ns: Namespaces,
}

impl HasNode for Plate {
    fn node(&self) -> &XmlNode {
        &self.node
    }
    fn namespaces(&self) -> &Namespaces {
        &self.ns
    }
}

impl Identified for Plate {
    const KIND: &'static str = "Plate";
}

impl Plate {
    pub(crate) fn new(node: XmlNode, ns: Namespaces) -> Self {
        Self { node, ns }
    }

    /// The `Name` attribute, if set.
    pub fn name(&self) -> Option<String> {
        self.node.attr("Name")
    }

    /// Set the `Name` attribute.
    pub fn set_name(&self, value: &str) {
        self.node.set_attr("Name", value);
    }

    /// The `Status` attribute, if set.
    pub fn status(&self) -> Option<String> {
        self.node.attr("Status")
    }

    /// Set the `Status` attribute.
    pub fn set_status(&self, value: &str) {
        self.node.set_attr("Status", value);
    }

    /// External identifier assigned by the facility, if set.
    pub fn external_identifier(&self) -> Option<String> {
        self.node.attr("ExternalIdentifier")
    }

    /// Set the external identifier.
    pub fn set_external_identifier(&self, value: &str) {
        self.node.set_attr("ExternalIdentifier", value);
    }

    /// The column-axis naming convention, if stored. Absent reads as
    /// `None`; the addressing engine then falls back to `Number`.
    pub fn column_naming_convention(&self) -> Result<Option<NamingConvention>, ValidationError> {
        convention_attr(&self.node, "ColumnNamingConvention")
    }

    /// Set the column-axis naming convention.
    pub fn set_column_naming_convention(&self, value: NamingConvention) {
        self.node.set_attr("ColumnNamingConvention", value.as_str());
    }

    /// The row-axis naming convention, if stored. Absent reads as
    /// `None`; the addressing engine then falls back to `Letter`.
    pub fn row_naming_convention(&self) -> Result<Option<NamingConvention>, ValidationError> {
        convention_attr(&self.node, "RowNamingConvention")
    }

    /// Set the row-axis naming convention.
    pub fn set_row_naming_convention(&self, value: NamingConvention) {
        self.node.set_attr("RowNamingConvention", value.as_str());
    }

    /// X origin of the well grid.
    pub fn well_origin_x(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "WellOriginX")
    }

    /// Set the X origin of the well grid.
    pub fn set_well_origin_x(&self, value: f64) {
        self.node.set_attr("WellOriginX", value.to_string());
    }

    /// Y origin of the well grid.
    pub fn well_origin_y(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "WellOriginY")
    }

    /// Set the Y origin of the well grid.
    pub fn set_well_origin_y(&self, value: f64) {
        self.node.set_attr("WellOriginY", value.to_string());
    }

    /// Number of rows in the plate.
    pub fn rows(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(&self.node, "Rows")
    }

    /// Set the number of rows.
    pub fn set_rows(&self, value: i64) {
        self.node.set_attr("Rows", value.to_string());
    }

    /// Number of columns in the plate.
    pub fn columns(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(&self.node, "Columns")
    }

    /// Set the number of columns.
    pub fn set_columns(&self, value: i64) {
        self.node.set_attr("Columns", value.to_string());
    }

    /// Free-text description of the plate, if present.
    pub fn description(&self) -> Option<String> {
        child_text(&self.node, &qn(self.ns.spw(), "Description"))
    }

    /// Set the plate description, creating the child on demand.
    pub fn set_description(&self, text: &str) {
        set_child_text(&self.node, &qn(self.ns.spw(), "Description"), text);
    }

    /// The plate's wells.
    pub fn wells(&self) -> Wells {
        Wells::new(self.clone())
    }

    /// Derive a well's canonical name under this plate's conventions
    /// (row defaults to letters, column to numbers when unset).
    pub fn well_name_of(&self, well: &Well) -> Result<String, ValidationError> {
        let row = well
            .row()?
            .ok_or(ValidationError::MissingAttribute { attr: "Row" })?;
        let column = well
            .column()?
            .ok_or(ValidationError::MissingAttribute { attr: "Column" })?;
        let row_convention = self
            .row_naming_convention()?
            .unwrap_or(NamingConvention::Letter);
        let column_convention = self
            .column_naming_convention()?
            .unwrap_or(NamingConvention::Number);
        well_name(row, column, row_convention, column_convention)
    }
}

fn convention_attr(
    node: &XmlNode,
    attr: &'static str,
) -> Result<Option<NamingConvention>, ValidationError> {
    match node.attr(attr) {
        None => Ok(None),
        Some(raw) => NamingConvention::parse(&raw).map(Some).ok_or_else(|| {
            refused(ValidationError::Malformed {
                attr: attr.to_string(),
                value: raw,
            })
        }),
    }
}

/// Lookup-and-create view over a plate's wells. Wells resolve by
/// sequential index, by `(row, column)` coordinates, or by name --
/// where a name is first matched against every well's derived
/// canonical name and then against literal IDs.
#[derive(Clone)]
pub struct Wells {
    plate: Plate,
}

impl Wells {
    pub(crate) fn new(plate: Plate) -> Self {
        Self { plate }
    }

    fn well_tag(&self) -> String {
        qn(self.plate.ns.spw(), "Well")
    }

    fn all(&self) -> Vec<Well> {
        self.plate
            .node
            .find_all(&self.well_tag())
            .into_iter()
            .map(|node| Well::new(node, self.plate.ns.clone()))
            .collect()
    }

    /// Number of wells on the plate.
    pub fn len(&self) -> usize {
        self.plate.node.find_all(&self.well_tag()).len()
    }

    /// Whether the plate has no wells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The well at a sequential document-order index.
    pub fn get(&self, index: usize) -> Option<Well> {
        self.plate
            .node
            .find_all(&self.well_tag())
            .get(index)
            .map(|node| Well::new(node.clone(), self.plate.ns.clone()))
    }

    /// The well at zero-based `(row, column)` coordinates.
    pub fn by_coordinates(&self, row: i64, column: i64) -> Option<Well> {
        self.all().into_iter().find(|well| {
            well.row().ok().flatten() == Some(row) && well.column().ok().flatten() == Some(column)
        })
    }

    /// The well matching a name. Derived canonical names are tried
    /// first across every well, then literal IDs; a miss is `None`,
    /// never an error.
    pub fn by_name(&self, key: &str) -> Option<Well> {
        let wells = self.all();
        for well in &wells {
            if self.plate.well_name_of(well).ok().as_deref() == Some(key) {
                return Some(well.clone());
            }
        }
        wells.into_iter().find(|well| well.id().as_deref() == Some(key))
    }

    /// Iterate over all wells in document order.
    pub fn iter(&self) -> impl Iterator<Item = Well> + '_ {
        self.all().into_iter()
    }

    /// Create a well at the given coordinates with a freshly generated
    /// ID.
    pub fn new_well(&self, row: i64, column: i64) -> Well {
        let node = self.plate.node.create_child(&self.well_tag());
        let well = Well::new(node, self.plate.ns.clone());
        well.node.set_attr("ID", ident::fresh_id("Well"));
        well.set_row(row);
        well.set_column(column);
        well
    }

    /// Create a well with a caller-supplied ID, validated against the
    /// `Well` kind.
    pub fn new_well_with_id(
        &self,
        row: i64,
        column: i64,
        id: &str,
    ) -> Result<Well, ValidationError> {
        if !ident::validate("Well", id) {
            return Err(refused(ValidationError::InvalidId {
                kind: "Well",
                value: id.to_string(),
            }));
        }
        let well = self.new_well(row, column);
        well.node.set_attr("ID", id);
        Ok(well)
    }
}

/// One `Well` element.
#[derive(Clone)]
pub struct Well {
    node: XmlNode,
    ns: Namespaces,
}

impl HasNode for Well {
    fn node(&self) -> &XmlNode {
        &self.node
    }
    fn namespaces(&self) -> &Namespaces {
        &self.ns
    }
}

impl Identified for Well {
    const KIND: &'static str = "Well";
}

impl Well {
    pub(crate) fn new(node: XmlNode, ns: Namespaces) -> Self {
        Self { node, ns }
    }

    /// Zero-based row coordinate.
    pub fn row(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(&self.node, "Row")
    }

    /// Set the row coordinate.
    pub fn set_row(&self, value: i64) {
        self.node.set_attr("Row", value.to_string());
    }

    /// Zero-based column coordinate.
    pub fn column(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(&self.node, "Column")
    }

    /// Set the column coordinate.
    pub fn set_column(&self, value: i64) {
        self.node.set_attr("Column", value.to_string());
    }

    /// Display color of the well, as signed 32-bit RGBA.
    pub fn color(&self) -> Result<Option<i32>, ValidationError> {
        get_color_attr(&self.node, "Color")
    }

    /// Set the display color.
    pub fn set_color(&self, value: i32) {
        self.node.set_attr("Color", value.to_string());
    }

    /// Free-text external description, if set.
    pub fn external_description(&self) -> Option<String> {
        self.node.attr("ExternalDescription")
    }

    /// Set the external description.
    pub fn set_external_description(&self, value: &str) {
        self.node.set_attr("ExternalDescription", value);
    }

    /// External identifier assigned by the facility, if set.
    pub fn external_identifier(&self) -> Option<String> {
        self.node.attr("ExternalIdentifier")
    }

    /// Set the external identifier.
    pub fn set_external_identifier(&self, value: &str) {
        self.node.set_attr("ExternalIdentifier", value);
    }

    /// The well's imaging sites.
    pub fn samples(&self) -> WellSamples {
        WellSamples::new(self.clone())
    }
}

/// List-like view of the `WellSample` elements in a well.
#[derive(Clone)]
pub struct WellSamples {
    well: Well,
}

impl WellSamples {
    pub(crate) fn new(well: Well) -> Self {
        Self { well }
    }

    fn sample_tag(&self) -> String {
        qn(self.well.ns.spw(), "WellSample")
    }

    /// Number of samples in the well.
    pub fn len(&self) -> usize {
        self.well.node.find_all(&self.sample_tag()).len()
    }

    /// Whether the well has no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The indexed sample, if it exists.
    pub fn get(&self, index: usize) -> Option<WellSample> {
        self.well
            .node
            .find_all(&self.sample_tag())
            .get(index)
            .map(|node| WellSample::new(node.clone(), self.well.ns.clone()))
    }

    /// Iterate over all samples in document order.
    pub fn iter(&self) -> impl Iterator<Item = WellSample> + '_ {
        self.well
            .node
            .find_all(&self.sample_tag())
            .into_iter()
            .map(|node| WellSample::new(node, self.well.ns.clone()))
    }

    /// Create a sample with a freshly generated ID and the next free
    /// `Index` (one past the highest index currently present).
    pub fn new_sample(&self) -> WellSample {
        let next_index = self
            .iter()
            .filter_map(|sample| sample.index().ok().flatten())
            .max()
            .map_or(0, |max| max + 1);
        let node = self.well.node.create_child(&self.sample_tag());
        let sample = WellSample::new(node, self.well.ns.clone());
        sample.node.set_attr("ID", ident::fresh_id("WellSample"));
        sample.set_index(next_index);
        sample
    }
}

/// One imaging site within a well.
#[derive(Clone)]
pub struct WellSample {
    node: XmlNode,
    ns: Namespaces,
}

impl HasNode for WellSample {
    fn node(&self) -> &XmlNode {
        &self.node
    }
    fn namespaces(&self) -> &Namespaces {
        &self.ns
    }
}

impl Identified for WellSample {
    const KIND: &'static str = "WellSample";
}

impl WellSample {
    pub(crate) fn new(node: XmlNode, ns: Namespaces) -> Self {
        Self { node, ns }
    }

    /// X position of the site within the well.
    pub fn position_x(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "PositionX")
    }

    /// Set the site X position.
    pub fn set_position_x(&self, value: f64) {
        self.node.set_attr("PositionX", value.to_string());
    }

    /// Y position of the site within the well.
    pub fn position_y(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "PositionY")
    }

    /// Set the site Y position.
    pub fn set_position_y(&self, value: f64) {
        self.node.set_attr("PositionY", value.to_string());
    }

    /// Acquisition timepoint of the site (ISO-8601 text), if set.
    pub fn timepoint(&self) -> Option<String> {
        self.node.attr("Timepoint")
    }

    /// Set the acquisition timepoint.
    pub fn set_timepoint(&self, value: &str) {
        self.node.set_attr("Timepoint", value);
    }

    /// Acquisition-order index of the site.
    pub fn index(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(&self.node, "Index")
    }

    /// Set the acquisition-order index.
    pub fn set_index(&self, value: i64) {
        self.node.set_attr("Index", value.to_string());
    }

    /// Target ID of the `ImageRef` child, if present.
    pub fn image_ref(&self) -> Option<String> {
        reference_id(&self.node, &qn(self.ns.spw(), "ImageRef"))
    }

    /// Point this site at its image (upsert).
    pub fn set_image_ref(&self, id: &str) -> Result<(), ValidationError> {
        set_reference(&self.node, &qn(self.ns.spw(), "ImageRef"), "Image", id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn canonical_names_follow_each_axis_convention() {
        let letter = NamingConvention::Letter;
        let number = NamingConvention::Number;
        assert_eq!(well_name(0, 0, letter, number).unwrap(), "A01");
        assert_eq!(well_name(1, 2, letter, number).unwrap(), "B03");
        assert_eq!(well_name(15, 0, letter, number).unwrap(), "P01");
        assert_eq!(well_name(3, 3, number, number).unwrap(), "0404");
        assert_eq!(well_name(1, 1, letter, letter).unwrap(), "BB");
    }

    #[test]
    fn letter_axis_rejects_indices_past_the_alphabet() {
        let result = well_name(16, 0, NamingConvention::Letter, NamingConvention::Number);
        assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));
        assert!(well_name(-1, 0, NamingConvention::Letter, NamingConvention::Number).is_err());
        assert!(well_name(0, -1, NamingConvention::Letter, NamingConvention::Number).is_err());
    }

    proptest! {
        #[test]
        fn every_valid_coordinate_has_a_unique_name(
            row in 0i64..16,
            column in 0i64..64,
        ) {
            let name = well_name(
                row,
                column,
                NamingConvention::Letter,
                NamingConvention::Number,
            ).unwrap();
            prop_assert!(name.len() >= 3);
            // The name decomposes back into the same coordinates.
            let letter = name.as_bytes()[0];
            prop_assert_eq!(i64::from(letter - b'A'), row);
            let number: i64 = name[1..].parse().unwrap();
            prop_assert_eq!(number - 1, column);
        }
    }

    #[test]
    fn convention_attr_distinguishes_absent_from_malformed() {
        let node = XmlNode::new("Plate");
        assert_eq!(convention_attr(&node, "RowNamingConvention").unwrap(), None);
        node.set_attr("RowNamingConvention", "letter");
        assert_eq!(
            convention_attr(&node, "RowNamingConvention").unwrap(),
            Some(NamingConvention::Letter)
        );
        node.set_attr("RowNamingConvention", "roman");
        assert!(convention_attr(&node, "RowNamingConvention").is_err());
    }
}
