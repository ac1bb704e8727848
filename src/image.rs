//! Accessors for the image side of the document: `Image`, its `Pixels`
//! element and the repeated `Channel`, `Plane` and `TiffData` children.

use crate::collection::{set_count, CountPolicy};
use crate::entity::{
    child_text, default_unit, get_color_attr, get_float_attr, get_int_attr, reference_id,
    set_child_text, set_reference, set_unit_attr, HasNode, Identified,
};
use crate::error::{refused, ValidationError};
use crate::ident;
use crate::instrument::{DetectorSettings, LightSourceSettings};
use crate::namespaces::Namespaces;
use crate::roi::RoiRef;
use crate::units::{self, Quantity};
use crate::xml::{qn, XmlNode};

/// One `Image` element (a series) under the document root.
#[derive(Clone)]
pub struct Image {
    node: XmlNode,
    ns: Namespaces,
}

impl HasNode for Image {
    fn node(&self) -> &XmlNode {
        &self.node
    }
    fn namespaces(&self) -> &Namespaces {
        &self.ns
    }
}

impl Identified for Image {
    const KIND: &'static str = "Image";
}

impl Image {
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

    /// The acquisition date in ISO-8601 form, if recorded.
    pub fn acquisition_date(&self) -> Option<String> {
        child_text(&self.node, &qn(self.ns.ome(), "AcquisitionDate"))
    }

    /// Set the acquisition date (ISO-8601 text), creating the child
    /// element on demand.
    pub fn set_acquisition_date(&self, date: &str) {
        set_child_text(&self.node, &qn(self.ns.ome(), "AcquisitionDate"), date);
    }

    /// Target ID of the `ExperimenterRef` child, if present.
    pub fn experimenter_ref(&self) -> Option<String> {
        reference_id(&self.node, &qn(self.ns.ome(), "ExperimenterRef"))
    }

    /// Point this image at an experimenter (upsert).
    pub fn set_experimenter_ref(&self, id: &str) -> Result<(), ValidationError> {
        set_reference(&self.node, &qn(self.ns.ome(), "ExperimenterRef"), "Experimenter", id)
    }

    /// Target ID of the `ExperimentRef` child, if present.
    pub fn experiment_ref(&self) -> Option<String> {
        reference_id(&self.node, &qn(self.ns.ome(), "ExperimentRef"))
    }

    /// Point this image at an experiment (upsert).
    pub fn set_experiment_ref(&self, id: &str) -> Result<(), ValidationError> {
        set_reference(&self.node, &qn(self.ns.ome(), "ExperimentRef"), "Experiment", id)
    }

    /// Target ID of the `ExperimenterGroupRef` child, if present.
    pub fn experimenter_group_ref(&self) -> Option<String> {
        reference_id(&self.node, &qn(self.ns.ome(), "ExperimenterGroupRef"))
    }

    /// Point this image at an experimenter group (upsert).
    pub fn set_experimenter_group_ref(&self, id: &str) -> Result<(), ValidationError> {
        set_reference(
            &self.node,
            &qn(self.ns.ome(), "ExperimenterGroupRef"),
            "ExperimenterGroup",
            id,
        )
    }

    /// Target ID of the `InstrumentRef` child, if present.
    pub fn instrument_ref(&self) -> Option<String> {
        reference_id(&self.node, &qn(self.ns.ome(), "InstrumentRef"))
    }

    /// Point this image at an instrument (upsert).
    pub fn set_instrument_ref(&self, id: &str) -> Result<(), ValidationError> {
        set_reference(&self.node, &qn(self.ns.ome(), "InstrumentRef"), "Instrument", id)
    }

    /// Target ID of the `ObjectiveSettings` child, if present.
    pub fn objective_settings(&self) -> Option<String> {
        reference_id(&self.node, &qn(self.ns.ome(), "ObjectiveSettings"))
    }

    /// Point this image at an objective (upsert).
    pub fn set_objective_settings(&self, id: &str) -> Result<(), ValidationError> {
        set_reference(&self.node, &qn(self.ns.ome(), "ObjectiveSettings"), "Objective", id)
    }

    /// The image's `Pixels` element, if present.
    pub fn pixels(&self) -> Option<Pixels> {
        self.node
            .find(&qn(self.ns.ome(), "Pixels"))
            .map(|node| Pixels::new(node, self.ns.clone()))
    }

    /// Number of `ROIRef` children.
    pub fn roiref_count(&self) -> usize {
        self.node.find_all(&qn(self.ns.ome(), "ROIRef")).len()
    }

    /// Resize the `ROIRef` collection. New references target the
    /// canonical `ROI:<index>` ID for their slot; the matching ROI must
    /// use the identical form for the pair to be linked.
    pub fn set_roiref_count(&self, count: usize) -> Result<(), ValidationError> {
        let tag = qn(self.ns.ome(), "ROIRef");
        let ns = self.ns.clone();
        set_count(&self.node, &tag, "ROIRef", count, CountPolicy::AllowEmpty, |index| {
            let node = XmlNode::new(tag.clone());
            RoiRef::new(node.clone(), ns.clone()).set_id(&index.to_string());
            Ok(node)
        })
    }

    /// The indexed `ROIRef` child, if it exists.
    pub fn roiref(&self, index: usize) -> Option<RoiRef> {
        self.node
            .find_all(&qn(self.ns.ome(), "ROIRef"))
            .get(index)
            .map(|node| RoiRef::new(node.clone(), self.ns.clone()))
    }
}

/// The `Pixels` element: extents, pixel encoding and the plane-level
/// child collections.
#[derive(Clone)]
pub struct Pixels {
    node: XmlNode,
    ns: Namespaces,
}

impl HasNode for Pixels {
    fn node(&self) -> &XmlNode {
        &self.node
    }
    fn namespaces(&self) -> &Namespaces {
        &self.ns
    }
}

impl Identified for Pixels {
    const KIND: &'static str = "Pixels";
}

impl Pixels {
    pub(crate) fn new(node: XmlNode, ns: Namespaces) -> Self {
        Self { node, ns }
    }

    /// The plane ordering code (e.g. `XYCZT`), if set. Compare against
    /// the `DO_*` constants.
    pub fn dimension_order(&self) -> Option<String> {
        self.node.attr("DimensionOrder")
    }

    /// Set the plane ordering code.
    pub fn set_dimension_order(&self, value: &str) {
        self.node.set_attr("DimensionOrder", value);
    }

    /// The pixel encoding (`Type` attribute, e.g. `uint8`), if set.
    /// Compare against the `PT_*` constants.
    pub fn pixel_type(&self) -> Option<String> {
        self.node.attr("Type")
    }

    /// Set the pixel encoding.
    pub fn set_pixel_type(&self, value: &str) {
        self.node.set_attr("Type", value);
    }

    /// Image extent in X, in pixels.
    pub fn size_x(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(&self.node, "SizeX")
    }

    /// Set the image extent in X.
    pub fn set_size_x(&self, value: i64) {
        self.node.set_attr("SizeX", value.to_string());
    }

    /// Image extent in Y, in pixels.
    pub fn size_y(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(&self.node, "SizeY")
    }

    /// Set the image extent in Y.
    pub fn set_size_y(&self, value: i64) {
        self.node.set_attr("SizeY", value.to_string());
    }

    /// Number of focal planes.
    pub fn size_z(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(&self.node, "SizeZ")
    }

    /// Set the number of focal planes.
    pub fn set_size_z(&self, value: i64) {
        self.node.set_attr("SizeZ", value.to_string());
    }

    /// Number of channels the pixel data claims.
    pub fn size_c(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(&self.node, "SizeC")
    }

    /// Set the claimed channel count.
    pub fn set_size_c(&self, value: i64) {
        self.node.set_attr("SizeC", value.to_string());
    }

    /// Number of timepoints.
    pub fn size_t(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(&self.node, "SizeT")
    }

    /// Set the number of timepoints.
    pub fn set_size_t(&self, value: i64) {
        self.node.set_attr("SizeT", value.to_string());
    }

    /// Length of a single pixel in X.
    pub fn physical_size_x(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "PhysicalSizeX")
    }

    /// Set the pixel length in X. Units are set by
    /// `PhysicalSizeXUnit`, defaulted to `µm` when absent.
    pub fn set_physical_size_x(&self, value: f64) {
        self.node.set_attr("PhysicalSizeX", value.to_string());
        default_unit(&self.node, "PhysicalSizeXUnit", "µm");
    }

    /// Unit of the pixel length in X.
    pub fn physical_size_x_unit(&self) -> Option<String> {
        self.node.attr("PhysicalSizeXUnit")
    }

    /// Set the unit of the pixel length in X.
    pub fn set_physical_size_x_unit(&self, value: &str) -> Result<(), ValidationError> {
        set_unit_attr(&self.node, "PhysicalSizeXUnit", Quantity::Length, value)
    }

    /// Length of a single pixel in Y.
    pub fn physical_size_y(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "PhysicalSizeY")
    }

    /// Set the pixel length in Y (unit defaulted to `µm`).
    pub fn set_physical_size_y(&self, value: f64) {
        self.node.set_attr("PhysicalSizeY", value.to_string());
        default_unit(&self.node, "PhysicalSizeYUnit", "µm");
    }

    /// Unit of the pixel length in Y.
    pub fn physical_size_y_unit(&self) -> Option<String> {
        self.node.attr("PhysicalSizeYUnit")
    }

    /// Set the unit of the pixel length in Y.
    pub fn set_physical_size_y_unit(&self, value: &str) -> Result<(), ValidationError> {
        set_unit_attr(&self.node, "PhysicalSizeYUnit", Quantity::Length, value)
    }

    /// Voxel depth in Z, absent for 2D images.
    pub fn physical_size_z(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "PhysicalSizeZ")
    }

    /// Set the voxel depth in Z (unit defaulted to `µm`).
    pub fn set_physical_size_z(&self, value: f64) {
        self.node.set_attr("PhysicalSizeZ", value.to_string());
        default_unit(&self.node, "PhysicalSizeZUnit", "µm");
    }

    /// Unit of the voxel depth in Z.
    pub fn physical_size_z_unit(&self) -> Option<String> {
        self.node.attr("PhysicalSizeZUnit")
    }

    /// Set the unit of the voxel depth in Z.
    pub fn set_physical_size_z_unit(&self, value: &str) -> Result<(), ValidationError> {
        set_unit_attr(&self.node, "PhysicalSizeZUnit", Quantity::Length, value)
    }

    /// Time between successive planes.
    pub fn time_increment(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "TimeIncrement")
    }

    /// Set the time between successive planes. Units are set by
    /// `TimeIncrementUnit`, defaulted to `s` when absent.
    pub fn set_time_increment(&self, value: f64) {
        self.node.set_attr("TimeIncrement", value.to_string());
        default_unit(&self.node, "TimeIncrementUnit", "s");
    }

    /// Unit of the time increment.
    pub fn time_increment_unit(&self) -> Option<String> {
        self.node.attr("TimeIncrementUnit")
    }

    /// Set the unit of the time increment.
    pub fn set_time_increment_unit(&self, value: &str) -> Result<(), ValidationError> {
        set_unit_attr(&self.node, "TimeIncrementUnit", Quantity::Time, value)
    }

    /// Number of `Channel` children.
    pub fn channel_count(&self) -> usize {
        self.node.find_all(&qn(self.ns.ome(), "Channel")).len()
    }

    /// Resize the `Channel` collection. Every new channel gets a fresh
    /// generated ID (also used as its name) and `SamplesPerPixel=1`.
    pub fn set_channel_count(&self, count: usize) -> Result<(), ValidationError> {
        let tag = qn(self.ns.ome(), "Channel");
        let ns = self.ns.clone();
        set_count(&self.node, &tag, "Channel", count, CountPolicy::AllowEmpty, |_| {
            let node = XmlNode::new(tag.clone());
            let channel = Channel::new(node.clone(), ns.clone());
            let id = ident::fresh_id("Channel");
            channel.set_id(&id)?;
            channel.set_name(&id);
            channel.set_samples_per_pixel(1);
            Ok(node)
        })
    }

    /// The indexed `Channel` child, if it exists.
    pub fn channel(&self, index: usize) -> Option<Channel> {
        self.node
            .find_all(&qn(self.ns.ome(), "Channel"))
            .get(index)
            .map(|node| Channel::new(node.clone(), self.ns.clone()))
    }

    /// Number of `Plane` children. An image with a single interleaved
    /// color plane will often have none.
    pub fn plane_count(&self) -> usize {
        self.node.find_all(&qn(self.ns.ome(), "Plane")).len()
    }

    /// Resize the `Plane` collection. New planes start with no indices
    /// set; callers fill in `TheZ`/`TheC`/`TheT` afterwards.
    pub fn set_plane_count(&self, count: usize) -> Result<(), ValidationError> {
        let tag = qn(self.ns.ome(), "Plane");
        set_count(&self.node, &tag, "Plane", count, CountPolicy::AllowEmpty, |_| {
            Ok(XmlNode::new(tag.clone()))
        })
    }

    /// The indexed `Plane` child, if it exists.
    pub fn plane(&self, index: usize) -> Option<Plane> {
        self.node
            .find_all(&qn(self.ns.ome(), "Plane"))
            .get(index)
            .map(|node| Plane::new(node.clone(), self.ns.clone()))
    }

    /// Number of `TiffData` children.
    pub fn tiffdata_count(&self) -> usize {
        self.node.find_all(&qn(self.ns.ome(), "TiffData")).len()
    }

    /// Resize the `TiffData` collection (symmetric grow/shrink, like
    /// every other plane-level collection).
    pub fn set_tiffdata_count(&self, count: usize) -> Result<(), ValidationError> {
        let tag = qn(self.ns.ome(), "TiffData");
        set_count(&self.node, &tag, "TiffData", count, CountPolicy::AllowEmpty, |_| {
            Ok(XmlNode::new(tag.clone()))
        })
    }

    /// The indexed `TiffData` child, if it exists.
    pub fn tiffdata(&self, index: usize) -> Option<TiffData> {
        self.node
            .find_all(&qn(self.ns.ome(), "TiffData"))
            .get(index)
            .map(|node| TiffData::new(node.clone(), self.ns.clone()))
    }
}

/// One acquisition channel under `Pixels`.
#[derive(Clone)]
pub struct Channel {
    node: XmlNode,
    ns: Namespaces,
}

impl HasNode for Channel {
    fn node(&self) -> &XmlNode {
        &self.node
    }
    fn namespaces(&self) -> &Namespaces {
        &self.ns
    }
}

impl Identified for Channel {
    const KIND: &'static str = "Channel";
}

impl Channel {
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

    /// Samples per pixel for this channel.
    pub fn samples_per_pixel(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(&self.node, "SamplesPerPixel")
    }

    /// Set samples per pixel.
    pub fn set_samples_per_pixel(&self, value: i64) {
        self.node.set_attr("SamplesPerPixel", value.to_string());
    }

    /// The method of illumination used to capture the channel.
    pub fn illumination_type(&self) -> Option<String> {
        self.node.attr("IlluminationType")
    }

    /// Set the illumination method.
    pub fn set_illumination_type(&self, value: &str) {
        self.node.set_attr("IlluminationType", value);
    }

    /// Adjustable pinhole diameter for confocal microscopes.
    pub fn pinhole_size(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "PinholeSize")
    }

    /// Set the pinhole diameter. Must be positive; units are set by
    /// `PinholeSizeUnit`, defaulted to `µm` when absent.
    pub fn set_pinhole_size(&self, value: f64) -> Result<(), ValidationError> {
        if value <= 0.0 {
            return Err(refused(ValidationError::OutOfRange {
                attr: "PinholeSize",
                detail: format!("{value} is not a positive number"),
            }));
        }
        self.node.set_attr("PinholeSize", value.to_string());
        default_unit(&self.node, "PinholeSizeUnit", "µm");
        Ok(())
    }

    /// Unit of the pinhole diameter.
    pub fn pinhole_size_unit(&self) -> Option<String> {
        self.node.attr("PinholeSizeUnit")
    }

    /// Set the unit of the pinhole diameter.
    pub fn set_pinhole_size_unit(&self, value: &str) -> Result<(), ValidationError> {
        set_unit_attr(&self.node, "PinholeSizeUnit", Quantity::Length, value)
    }

    /// Acquisition mode, if set.
    pub fn acquisition_mode(&self) -> Option<String> {
        self.node.attr("AcquisitionMode")
    }

    /// Set the acquisition mode.
    pub fn set_acquisition_mode(&self, value: &str) {
        self.node.set_attr("AcquisitionMode", value);
    }

    /// Contrast method, if set.
    pub fn contrast_method(&self) -> Option<String> {
        self.node.attr("ContrastMethod")
    }

    /// Set the contrast method.
    pub fn set_contrast_method(&self, value: &str) {
        self.node.set_attr("ContrastMethod", value);
    }

    /// Excitation wavelength for fluorescence channels.
    pub fn excitation_wavelength(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "ExcitationWavelength")
    }

    /// Set the excitation wavelength. Must be positive; units are set
    /// by `ExcitationWavelengthUnit`, defaulted to `nm` when absent.
    pub fn set_excitation_wavelength(&self, value: f64) -> Result<(), ValidationError> {
        if value <= 0.0 {
            return Err(refused(ValidationError::OutOfRange {
                attr: "ExcitationWavelength",
                detail: format!("{value} is not a positive number"),
            }));
        }
        self.node.set_attr("ExcitationWavelength", value.to_string());
        default_unit(&self.node, "ExcitationWavelengthUnit", "nm");
        Ok(())
    }

    /// Unit of the excitation wavelength.
    pub fn excitation_wavelength_unit(&self) -> Option<String> {
        self.node.attr("ExcitationWavelengthUnit")
    }

    /// Set the unit of the excitation wavelength.
    pub fn set_excitation_wavelength_unit(&self, value: &str) -> Result<(), ValidationError> {
        set_unit_attr(&self.node, "ExcitationWavelengthUnit", Quantity::Length, value)
    }

    /// Name of the fluorophore that produced this channel.
    pub fn fluor(&self) -> Option<String> {
        self.node.attr("Fluor")
    }

    /// Set the fluorophore name.
    pub fn set_fluor(&self, value: &str) {
        self.node.set_attr("Fluor", value);
    }

    /// Combined transmittance of any neutral-density filters used.
    pub fn nd_filter(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "NDFilter")
    }

    /// Set the neutral-density transmittance: the fraction of light
    /// the filters pass at maximum, from 0.0 to 1.0.
    pub fn set_nd_filter(&self, value: f64) -> Result<(), ValidationError> {
        if !units::is_percent_fraction(value) {
            return Err(refused(ValidationError::OutOfRange {
                attr: "NDFilter",
                detail: format!("{value} is not within [0.0, 1.0]"),
            }));
        }
        self.node.set_attr("NDFilter", value.to_string());
        Ok(())
    }

    /// Pockels-cell setting: the amount the beam polarization is
    /// rotated by.
    pub fn pockel_cell_setting(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(&self.node, "PockelCellSetting")
    }

    /// Set the Pockels-cell setting.
    pub fn set_pockel_cell_setting(&self, value: i64) {
        self.node.set_attr("PockelCellSetting", value.to_string());
    }

    /// Display color of the channel, as signed 32-bit RGBA.
    pub fn color(&self) -> Result<Option<i32>, ValidationError> {
        get_color_attr(&self.node, "Color")
    }

    /// Set the display color.
    pub fn set_color(&self, value: i32) {
        self.node.set_attr("Color", value.to_string());
    }

    /// The channel's light-source settings, created on demand.
    pub fn light_source_settings(&self) -> LightSourceSettings {
        let tag = qn(self.ns.ome(), "LightSourceSettings");
        let node = self
            .node
            .find(&tag)
            .unwrap_or_else(|| self.node.create_child(&tag));
        LightSourceSettings::new(node, self.ns.clone())
    }

    /// The channel's detector settings, created on demand.
    pub fn detector_settings(&self) -> DetectorSettings {
        let tag = qn(self.ns.ome(), "DetectorSettings");
        let node = self
            .node
            .find(&tag)
            .unwrap_or_else(|| self.node.create_child(&tag));
        DetectorSettings::new(node, self.ns.clone())
    }
}

/// One 2-dimensional image plane: the Z/C/T indices plus optional
/// stage position, exposure and timing data.
#[derive(Clone)]
pub struct Plane {
    node: XmlNode,
    ns: Namespaces,
}

impl HasNode for Plane {
    fn node(&self) -> &XmlNode {
        &self.node
    }
    fn namespaces(&self) -> &Namespaces {
        &self.ns
    }
}

impl Plane {
    pub(crate) fn new(node: XmlNode, ns: Namespaces) -> Self {
        Self { node, ns }
    }

    /// The Z index of the plane.
    pub fn the_z(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(&self.node, "TheZ")
    }

    /// Set the Z index.
    pub fn set_the_z(&self, value: i64) {
        self.node.set_attr("TheZ", value.to_string());
    }

    /// The channel index of the plane.
    pub fn the_c(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(&self.node, "TheC")
    }

    /// Set the channel index.
    pub fn set_the_c(&self, value: i64) {
        self.node.set_attr("TheC", value.to_string());
    }

    /// The T index of the plane.
    pub fn the_t(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(&self.node, "TheT")
    }

    /// Set the T index.
    pub fn set_the_t(&self, value: i64) {
        self.node.set_attr("TheT", value.to_string());
    }

    /// Seconds since the beginning of the experiment.
    pub fn delta_t(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "DeltaT")
    }

    /// Set the time offset from the start of the experiment.
    pub fn set_delta_t(&self, value: f64) {
        self.node.set_attr("DeltaT", value.to_string());
    }

    /// Exposure duration for this plane.
    pub fn exposure_time(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "ExposureTime")
    }

    /// Set the exposure duration.
    pub fn set_exposure_time(&self, value: f64) {
        self.node.set_attr("ExposureTime", value.to_string());
    }

    /// X position of the stage.
    pub fn position_x(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "PositionX")
    }

    /// Set the stage X position.
    pub fn set_position_x(&self, value: f64) {
        self.node.set_attr("PositionX", value.to_string());
    }

    /// Unit of the stage X position.
    pub fn position_x_unit(&self) -> Option<String> {
        self.node.attr("PositionXUnit")
    }

    /// Set the unit of the stage X position.
    pub fn set_position_x_unit(&self, value: &str) -> Result<(), ValidationError> {
        set_unit_attr(&self.node, "PositionXUnit", Quantity::Length, value)
    }

    /// Y position of the stage.
    pub fn position_y(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "PositionY")
    }

    /// Set the stage Y position.
    pub fn set_position_y(&self, value: f64) {
        self.node.set_attr("PositionY", value.to_string());
    }

    /// Unit of the stage Y position.
    pub fn position_y_unit(&self) -> Option<String> {
        self.node.attr("PositionYUnit")
    }

    /// Set the unit of the stage Y position.
    pub fn set_position_y_unit(&self, value: &str) -> Result<(), ValidationError> {
        set_unit_attr(&self.node, "PositionYUnit", Quantity::Length, value)
    }

    /// Z position of the stage.
    pub fn position_z(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "PositionZ")
    }

    /// Set the stage Z position.
    pub fn set_position_z(&self, value: f64) {
        self.node.set_attr("PositionZ", value.to_string());
    }

    /// Unit of the stage Z position.
    pub fn position_z_unit(&self) -> Option<String> {
        self.node.attr("PositionZUnit")
    }

    /// Set the unit of the stage Z position.
    pub fn set_position_z_unit(&self, value: &str) -> Result<(), ValidationError> {
        set_unit_attr(&self.node, "PositionZUnit", Quantity::Length, value)
    }
}

/// One `TiffData` block mapping a plane onto a TIFF IFD.
#[derive(Clone)]
pub struct TiffData {
    node: XmlNode,
    ns: Namespaces,
}

impl HasNode for TiffData {
    fn node(&self) -> &XmlNode {
        &self.node
    }
    fn namespaces(&self) -> &Namespaces {
        &self.ns
    }
}

impl TiffData {
    pub(crate) fn new(node: XmlNode, ns: Namespaces) -> Self {
        Self { node, ns }
    }

    /// The Z index of the first plane in this block.
    pub fn first_z(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(&self.node, "FirstZ")
    }

    /// Set the Z index of the first plane.
    pub fn set_first_z(&self, value: i64) {
        self.node.set_attr("FirstZ", value.to_string());
    }

    /// The channel index of the first plane in this block.
    pub fn first_c(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(&self.node, "FirstC")
    }

    /// Set the channel index of the first plane.
    pub fn set_first_c(&self, value: i64) {
        self.node.set_attr("FirstC", value.to_string());
    }

    /// The T index of the first plane in this block.
    pub fn first_t(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(&self.node, "FirstT")
    }

    /// Set the T index of the first plane.
    pub fn set_first_t(&self, value: i64) {
        self.node.set_attr("FirstT", value.to_string());
    }

    /// Plane index within the TIFF file.
    pub fn ifd(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(&self.node, "IFD")
    }

    /// Set the plane index within the TIFF file.
    pub fn set_ifd(&self, value: i64) {
        self.node.set_attr("IFD", value.to_string());
    }

    /// Number of planes this block covers (normally 1).
    pub fn plane_count(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(&self.node, "PlaneCount")
    }

    /// Set the number of planes this block covers.
    pub fn set_plane_count(&self, value: i64) {
        self.node.set_attr("PlaneCount", value.to_string());
    }
}
