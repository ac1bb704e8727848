//! Accessors for the `Instrument` element, its hardware sub-specs and
//! the per-channel settings elements that reference them.

use std::sync::OnceLock;

use regex::Regex;

use crate::entity::{
    default_unit, get_float_attr, get_int_attr, set_unit_attr, HasNode, Identified,
    ManufacturerSpec,
};
use crate::error::{refused, ValidationError};
use crate::namespaces::Namespaces;
use crate::units::Quantity;
use crate::xml::{qn, XmlNode};

/// The `Instrument` element: microscope description plus the light
/// sources, detectors and optics attached to it.
#[derive(Clone)]
pub struct Instrument {
    node: XmlNode,
    ns: Namespaces,
}

impl HasNode for Instrument {
    fn node(&self) -> &XmlNode {
        &self.node
    }
    fn namespaces(&self) -> &Namespaces {
        &self.ns
    }
}

impl Identified for Instrument {
    const KIND: &'static str = "Instrument";
}

impl Instrument {
    pub(crate) fn new(node: XmlNode, ns: Namespaces) -> Self {
        Self { node, ns }
    }

    fn indexed_child(&self, local: &str, index: usize) -> Option<XmlNode> {
        self.node
            .find_all(&qn(self.ns.ome(), local))
            .get(index)
            .cloned()
    }

    /// The microscope description, if present.
    pub fn microscope(&self) -> Option<Microscope> {
        self.node
            .find(&qn(self.ns.ome(), "Microscope"))
            .map(|node| Microscope::new(node, self.ns.clone()))
    }

    /// The indexed light source, if it exists.
    pub fn light_source(&self, index: usize) -> Option<LightSource> {
        self.indexed_child("LightSourceGroup", index)
            .map(|node| LightSource::new(node, self.ns.clone()))
    }

    /// The indexed detector, if it exists.
    pub fn detector(&self, index: usize) -> Option<Detector> {
        self.indexed_child("Detector", index)
            .map(|node| Detector::new(node, self.ns.clone()))
    }

    /// The indexed objective, if it exists.
    pub fn objective(&self, index: usize) -> Option<Objective> {
        self.indexed_child("Objective", index)
            .map(|node| Objective::new(node, self.ns.clone()))
    }

    /// The indexed filter set, if it exists.
    pub fn filter_set(&self, index: usize) -> Option<FilterSet> {
        self.indexed_child("FilterSet", index)
            .map(|node| FilterSet::new(node, self.ns.clone()))
    }

    /// The indexed filter, if it exists.
    pub fn filter(&self, index: usize) -> Option<Filter> {
        self.indexed_child("Filter", index)
            .map(|node| Filter::new(node, self.ns.clone()))
    }

    /// The indexed dichroic, if it exists.
    pub fn dichroic(&self, index: usize) -> Option<Dichroic> {
        self.indexed_child("Dichroic", index)
            .map(|node| Dichroic::new(node, self.ns.clone()))
    }
}

/// The `Microscope` element under `Instrument`.
#[derive(Clone)]
pub struct Microscope {
    node: XmlNode,
    ns: Namespaces,
}

impl HasNode for Microscope {
    fn node(&self) -> &XmlNode {
        &self.node
    }
    fn namespaces(&self) -> &Namespaces {
        &self.ns
    }
}

impl ManufacturerSpec for Microscope {}

impl Microscope {
    pub(crate) fn new(node: XmlNode, ns: Namespaces) -> Self {
        Self { node, ns }
    }

    /// The microscope body type (e.g. `Upright`, `Inverted`).
    pub fn microscope_type(&self) -> Option<String> {
        self.node.attr("Type")
    }

    /// Set the microscope body type.
    pub fn set_microscope_type(&self, value: &str) {
        self.node.set_attr("Type", value);
    }
}

/// A light source attached to the instrument.
#[derive(Clone)]
pub struct LightSource {
    node: XmlNode,
    ns: Namespaces,
}

impl HasNode for LightSource {
    fn node(&self) -> &XmlNode {
        &self.node
    }
    fn namespaces(&self) -> &Namespaces {
        &self.ns
    }
}

impl Identified for LightSource {
    const KIND: &'static str = "LightSource";
}

impl ManufacturerSpec for LightSource {}

impl LightSource {
    pub(crate) fn new(node: XmlNode, ns: Namespaces) -> Self {
        Self { node, ns }
    }

    /// The light source's output power.
    pub fn power(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "Power")
    }

    /// Set the output power. Units are set by `PowerUnit`, defaulted
    /// to `mW` when absent.
    pub fn set_power(&self, value: f64) {
        self.node.set_attr("Power", value.to_string());
        default_unit(&self.node, "PowerUnit", "mW");
    }

    /// Unit of the output power.
    pub fn power_unit(&self) -> Option<String> {
        self.node.attr("PowerUnit")
    }

    /// Set the unit of the output power.
    pub fn set_power_unit(&self, value: &str) -> Result<(), ValidationError> {
        set_unit_attr(&self.node, "PowerUnit", Quantity::Power, value)
    }
}

/// A detector attached to the instrument.
#[derive(Clone)]
pub struct Detector {
    node: XmlNode,
    ns: Namespaces,
}

impl HasNode for Detector {
    fn node(&self) -> &XmlNode {
        &self.node
    }
    fn namespaces(&self) -> &Namespaces {
        &self.ns
    }
}

impl Identified for Detector {
    const KIND: &'static str = "Detector";
}

impl ManufacturerSpec for Detector {}

impl Detector {
    pub(crate) fn new(node: XmlNode, ns: Namespaces) -> Self {
        Self { node, ns }
    }

    /// Detector gain.
    pub fn gain(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "Gain")
    }

    /// Set the detector gain.
    pub fn set_gain(&self, value: f64) {
        self.node.set_attr("Gain", value.to_string());
    }

    /// Detector voltage.
    pub fn voltage(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "Voltage")
    }

    /// Set the detector voltage.
    pub fn set_voltage(&self, value: f64) {
        self.node.set_attr("Voltage", value.to_string());
    }

    /// Unit of the detector voltage.
    pub fn voltage_unit(&self) -> Option<String> {
        self.node.attr("VoltageUnit")
    }

    /// Set the unit of the detector voltage.
    pub fn set_voltage_unit(&self, value: &str) -> Result<(), ValidationError> {
        set_unit_attr(&self.node, "VoltageUnit", Quantity::ElectricPotential, value)
    }

    /// Detector technology (e.g. `CCD`, `PMT`).
    pub fn detector_type(&self) -> Option<String> {
        self.node.attr("Type")
    }

    /// Set the detector technology.
    pub fn set_detector_type(&self, value: &str) {
        self.node.set_attr("Type", value);
    }
}

/// An objective attached to the instrument.
#[derive(Clone)]
pub struct Objective {
    node: XmlNode,
    ns: Namespaces,
}

impl HasNode for Objective {
    fn node(&self) -> &XmlNode {
        &self.node
    }
    fn namespaces(&self) -> &Namespaces {
        &self.ns
    }
}

impl Identified for Objective {
    const KIND: &'static str = "Objective";
}

impl ManufacturerSpec for Objective {}

impl Objective {
    pub(crate) fn new(node: XmlNode, ns: Namespaces) -> Self {
        Self { node, ns }
    }

    /// Numerical aperture of the lens.
    pub fn lens_na(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "LensNA")
    }

    /// Set the numerical aperture.
    pub fn set_lens_na(&self, value: f64) {
        self.node.set_attr("LensNA", value.to_string());
    }

    /// Magnification as marked by the manufacturer.
    pub fn nominal_magnification(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "NominalMagnification")
    }

    /// Set the nominal magnification.
    pub fn set_nominal_magnification(&self, value: f64) {
        self.node.set_attr("NominalMagnification", value.to_string());
    }

    /// Magnification as measured.
    pub fn calibrated_magnification(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "CalibratedMagnification")
    }

    /// Set the calibrated magnification.
    pub fn set_calibrated_magnification(&self, value: f64) {
        self.node.set_attr("CalibratedMagnification", value.to_string());
    }

    /// Working distance of the objective.
    pub fn working_distance(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "WorkingDistance")
    }

    /// Set the working distance.
    pub fn set_working_distance(&self, value: f64) {
        self.node.set_attr("WorkingDistance", value.to_string());
    }

    /// Unit of the working distance.
    pub fn working_distance_unit(&self) -> Option<String> {
        self.node.attr("WorkingDistanceUnit")
    }

    /// Set the unit of the working distance.
    pub fn set_working_distance_unit(&self, value: &str) -> Result<(), ValidationError> {
        set_unit_attr(&self.node, "WorkingDistanceUnit", Quantity::Length, value)
    }
}

/// A filter set attached to the instrument.
#[derive(Clone)]
pub struct FilterSet {
    node: XmlNode,
    ns: Namespaces,
}

impl HasNode for FilterSet {
    fn node(&self) -> &XmlNode {
        &self.node
    }
    fn namespaces(&self) -> &Namespaces {
        &self.ns
    }
}

impl Identified for FilterSet {
    const KIND: &'static str = "FilterSet";
}

impl ManufacturerSpec for FilterSet {}

impl FilterSet {
    pub(crate) fn new(node: XmlNode, ns: Namespaces) -> Self {
        Self { node, ns }
    }
}

/// A filter attached to the instrument.
#[derive(Clone)]
pub struct Filter {
    node: XmlNode,
    ns: Namespaces,
}

impl HasNode for Filter {
    fn node(&self) -> &XmlNode {
        &self.node
    }
    fn namespaces(&self) -> &Namespaces {
        &self.ns
    }
}

impl Identified for Filter {
    const KIND: &'static str = "Filter";
}

impl ManufacturerSpec for Filter {}

impl Filter {
    pub(crate) fn new(node: XmlNode, ns: Namespaces) -> Self {
        Self { node, ns }
    }

    /// Filter type (e.g. `BandPass`, `LongPass`).
    pub fn filter_type(&self) -> Option<String> {
        self.node.attr("Type")
    }

    /// Set the filter type.
    pub fn set_filter_type(&self, value: &str) {
        self.node.set_attr("Type", value);
    }

    /// Which filter wheel this filter sits in.
    pub fn filter_wheel(&self) -> Option<String> {
        self.node.attr("FilterWheel")
    }

    /// Set the filter wheel.
    pub fn set_filter_wheel(&self, value: &str) {
        self.node.set_attr("FilterWheel", value);
    }
}

/// A dichroic attached to the instrument.
#[derive(Clone)]
pub struct Dichroic {
    node: XmlNode,
    ns: Namespaces,
}

impl HasNode for Dichroic {
    fn node(&self) -> &XmlNode {
        &self.node
    }
    fn namespaces(&self) -> &Namespaces {
        &self.ns
    }
}

impl Identified for Dichroic {
    const KIND: &'static str = "Dichroic";
}

impl ManufacturerSpec for Dichroic {}

impl Dichroic {
    pub(crate) fn new(node: XmlNode, ns: Namespaces) -> Self {
        Self { node, ns }
    }
}

fn binning_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+x\d+$").expect("binning pattern is valid"))
}

/// Per-channel detector settings: a reference to a `Detector` plus the
/// overrides used during acquisition.
#[derive(Clone)]
pub struct DetectorSettings {
    node: XmlNode,
    ns: Namespaces,
}

impl HasNode for DetectorSettings {
    fn node(&self) -> &XmlNode {
        &self.node
    }
    fn namespaces(&self) -> &Namespaces {
        &self.ns
    }
}

impl Identified for DetectorSettings {
    // The ID attribute names the detector these settings apply to.
    const KIND: &'static str = "Detector";
}

impl DetectorSettings {
    pub(crate) fn new(node: XmlNode, ns: Namespaces) -> Self {
        Self { node, ns }
    }

    /// Gain used during acquisition.
    pub fn gain(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "Gain")
    }

    /// Set the acquisition gain.
    pub fn set_gain(&self, value: f64) {
        self.node.set_attr("Gain", value.to_string());
    }

    /// Voltage used during acquisition.
    pub fn voltage(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "Voltage")
    }

    /// Set the acquisition voltage.
    pub fn set_voltage(&self, value: f64) {
        self.node.set_attr("Voltage", value.to_string());
    }

    /// Unit of the acquisition voltage.
    pub fn voltage_unit(&self) -> Option<String> {
        self.node.attr("VoltageUnit")
    }

    /// Set the unit of the acquisition voltage.
    pub fn set_voltage_unit(&self, value: &str) -> Result<(), ValidationError> {
        set_unit_attr(&self.node, "VoltageUnit", Quantity::ElectricPotential, value)
    }

    /// Zoom applied at the detector.
    pub fn zoom(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "Zoom")
    }

    /// Set the detector zoom.
    pub fn set_zoom(&self, value: f64) {
        self.node.set_attr("Zoom", value.to_string());
    }

    /// The speed at which the detector can count pixels, like a baud
    /// rate. Used by CCD and EMCCD detectors.
    pub fn read_out_rate(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "ReadOutRate")
    }

    /// Set the read-out rate. Must be positive; units are set by
    /// `ReadOutRateUnit`, defaulted to `MHz` when absent.
    pub fn set_read_out_rate(&self, value: f64) -> Result<(), ValidationError> {
        if value <= 0.0 {
            return Err(refused(ValidationError::OutOfRange {
                attr: "ReadOutRate",
                detail: format!("{value} is not a positive number"),
            }));
        }
        self.node.set_attr("ReadOutRate", value.to_string());
        default_unit(&self.node, "ReadOutRateUnit", "MHz");
        Ok(())
    }

    /// Unit of the read-out rate.
    pub fn read_out_rate_unit(&self) -> Option<String> {
        self.node.attr("ReadOutRateUnit")
    }

    /// Set the unit of the read-out rate.
    pub fn set_read_out_rate_unit(&self, value: &str) -> Result<(), ValidationError> {
        set_unit_attr(&self.node, "ReadOutRateUnit", Quantity::Frequency, value)
    }

    /// The binning in `NxN` form, if set.
    pub fn binning(&self) -> Option<String> {
        self.node.attr("Binning")
    }

    /// Set the binning from a string in `NxN` form (e.g. `8x8`).
    pub fn set_binning(&self, value: &str) -> Result<(), ValidationError> {
        if !binning_pattern().is_match(value) {
            return Err(refused(ValidationError::OutOfRange {
                attr: "Binning",
                detail: format!("{value:?} is not in NxN form"),
            }));
        }
        self.node.set_attr("Binning", value);
        Ok(())
    }

    /// Set a square binning from a single factor (`8` becomes `8x8`).
    pub fn set_binning_factor(&self, factor: u32) {
        self.node.set_attr("Binning", format!("{factor}x{factor}"));
    }

    /// Number of sequential frames averaged to improve signal-to-noise.
    pub fn integration(&self) -> Result<Option<i64>, ValidationError> {
        get_int_attr(&self.node, "Integration")
    }

    /// Set the frame-integration count. Must be at least 1.
    pub fn set_integration(&self, value: i64) -> Result<(), ValidationError> {
        if value < 1 {
            return Err(refused(ValidationError::OutOfRange {
                attr: "Integration",
                detail: format!("{value} is not a positive integer"),
            }));
        }
        self.node.set_attr("Integration", value.to_string());
        Ok(())
    }
}

/// Per-channel light-source settings: a reference to a `LightSource`
/// plus the attenuation and wavelength used during acquisition.
#[derive(Clone)]
pub struct LightSourceSettings {
    node: XmlNode,
    ns: Namespaces,
}

impl HasNode for LightSourceSettings {
    fn node(&self) -> &XmlNode {
        &self.node
    }
    fn namespaces(&self) -> &Namespaces {
        &self.ns
    }
}

impl Identified for LightSourceSettings {
    // The ID attribute names the light source these settings apply to.
    const KIND: &'static str = "LightSource";
}

impl LightSourceSettings {
    pub(crate) fn new(node: XmlNode, ns: Namespaces) -> Self {
        Self { node, ns }
    }

    /// Attenuation applied to the light source.
    pub fn attenuation(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "Attenuation")
    }

    /// Set the attenuation: a fraction from 0.0 to 1.0.
    pub fn set_attenuation(&self, value: f64) -> Result<(), ValidationError> {
        if !crate::units::is_percent_fraction(value) {
            return Err(refused(ValidationError::OutOfRange {
                attr: "Attenuation",
                detail: format!("{value} is not within [0.0, 1.0]"),
            }));
        }
        self.node.set_attr("Attenuation", value.to_string());
        Ok(())
    }

    /// Wavelength the light source was used at.
    pub fn wavelength(&self) -> Result<Option<f64>, ValidationError> {
        get_float_attr(&self.node, "Wavelength")
    }

    /// Set the wavelength. Must not be negative; units are set by
    /// `WavelengthUnit`, defaulted to `nm` when absent.
    pub fn set_wavelength(&self, value: f64) -> Result<(), ValidationError> {
        if value < 0.0 {
            return Err(refused(ValidationError::OutOfRange {
                attr: "Wavelength",
                detail: format!("{value} is negative"),
            }));
        }
        self.node.set_attr("Wavelength", value.to_string());
        default_unit(&self.node, "WavelengthUnit", "nm");
        Ok(())
    }

    /// Unit of the wavelength.
    pub fn wavelength_unit(&self) -> Option<String> {
        self.node.attr("WavelengthUnit")
    }

    /// Set the unit of the wavelength.
    pub fn set_wavelength_unit(&self, value: &str) -> Result<(), ValidationError> {
        set_unit_attr(&self.node, "WavelengthUnit", Quantity::Length, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> DetectorSettings {
        DetectorSettings::new(XmlNode::new("DetectorSettings"), Namespaces::default())
    }

    #[test]
    fn binning_accepts_nxn_and_factor_shorthand() {
        let s = settings();
        s.set_binning("8x8").unwrap();
        assert_eq!(s.binning().as_deref(), Some("8x8"));
        s.set_binning_factor(16);
        assert_eq!(s.binning().as_deref(), Some("16x16"));
        assert!(s.set_binning("8by8").is_err());
        assert_eq!(s.binning().as_deref(), Some("16x16"));
    }

    #[test]
    fn integration_requires_a_positive_count() {
        let s = settings();
        assert!(s.set_integration(0).is_err());
        assert_eq!(s.integration().unwrap(), None);
        s.set_integration(4).unwrap();
        assert_eq!(s.integration().unwrap(), Some(4));
    }

    #[test]
    fn read_out_rate_defaults_its_unit() {
        let s = settings();
        s.set_read_out_rate(10.0).unwrap();
        assert_eq!(s.read_out_rate_unit().as_deref(), Some("MHz"));
        assert!(s.set_read_out_rate(-1.0).is_err());
        assert_eq!(s.read_out_rate().unwrap(), Some(10.0));
    }

    #[test]
    fn settings_ids_validate_against_the_referenced_kind() {
        let s = settings();
        assert!(s.set_id("Detector:0").is_ok());
        assert!(s.set_id("Image:0").is_err());
        assert_eq!(s.id().as_deref(), Some("Detector:0"));
    }
}
