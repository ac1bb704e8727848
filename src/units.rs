//! Closed value domains: physical-quantity unit sets, appearance
//! enumerations and bounded numeric checks.
//!
//! The unit sets are fixed by the schema; validation is strict
//! membership, no normalization. Measured-attribute setters in the
//! accessor layer consult these sets for the paired unit attribute and
//! inject the attribute's documented default unit when none is set.

use std::fmt;

/// Units accepted for lengths: the SI prefix ladder plus imperial,
/// astronomical and the abstract `pixel`/`reference frame` units.
pub const LENGTH_UNITS: &[&str] = &[
    "Ym", "Zm", "Em", "Pm", "Tm", "Gm", "Mm", "km", "hm", "dam", "m", "dm", "cm", "mm", "µm",
    "nm", "pm", "fm", "am", "zm", "ym", "Å", "thou", "li", "in", "ft", "yd", "mi", "ua", "ly",
    "pc", "pt", "pixel", "reference frame",
];

/// Units accepted for time spans: the SI prefix ladder plus minute,
/// hour and day.
pub const TIME_UNITS: &[&str] = &[
    "Ys", "Zs", "Es", "Ps", "Ts", "Gs", "Ms", "ks", "hs", "das", "s", "ds", "cs", "ms", "µs",
    "ns", "ps", "fs", "as", "zs", "ys", "min", "h", "d",
];

/// Units accepted for radiant power.
pub const POWER_UNITS: &[&str] = &[
    "YW", "ZW", "EW", "PW", "TW", "GW", "MW", "kW", "hW", "daW", "W", "dW", "cW", "mW", "µW",
    "nW", "pW", "fW", "aW", "zW", "yW",
];

/// Units accepted for pressure: the pascal ladder plus bar, atmosphere,
/// psi, torr and mercury-column variants.
pub const PRESSURE_UNITS: &[&str] = &[
    "YPa", "ZPa", "EPa", "PPa", "TPa", "GPa", "MPa", "kPa", "hPa", "daPa", "Pa", "dPa", "cPa",
    "mPa", "µPa", "nPa", "pPa", "fPa", "aPa", "zPa", "yPa", "bar", "Mbar", "kbar", "dbar",
    "cbar", "mbar", "atm", "psi", "Torr", "mTorr", "mm Hg",
];

/// Units accepted for temperature.
pub const TEMPERATURE_UNITS: &[&str] = &["°C", "°F", "K", "°R"];

/// Units accepted for frequency.
pub const FREQUENCY_UNITS: &[&str] = &[
    "YHz", "ZHz", "EHz", "PHz", "THz", "GHz", "MHz", "kHz", "hHz", "daHz", "Hz", "dHz", "cHz",
    "mHz", "µHz", "nHz", "pHz", "fHz", "aHz", "zHz", "yHz",
];

/// Units accepted for electric potential.
pub const ELECTRIC_POTENTIAL_UNITS: &[&str] = &[
    "YV", "ZV", "EV", "PV", "TV", "GV", "MV", "kV", "hV", "daV", "V", "dV", "cV", "mV", "µV",
    "nV", "pV", "fV", "aV", "zV", "yV",
];

/// Units accepted for plane angles.
pub const ANGLE_UNITS: &[&str] = &["deg", "rad", "gon"];

/// Font families a shape may request.
pub const FONT_FAMILIES: &[&str] = &["serif", "sans-serif", "cursive", "fantasy", "monospace"];

/// Fill rules a shape may use.
pub const FILL_RULES: &[&str] = &["EvenOdd", "NonZero"];

/// Font styles a shape may use.
pub const FONT_STYLES: &[&str] = &["Bold", "BoldItalic", "Italic", "Normal"];

/// Marker decorations a shape may carry.
pub const MARKERS: &[&str] = &["Arrow"];

/// A physical-quantity family with a closed set of unit tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// Lengths and distances.
    Length,
    /// Time spans.
    Time,
    /// Radiant power.
    Power,
    /// Pressure.
    Pressure,
    /// Temperature.
    Temperature,
    /// Frequency.
    Frequency,
    /// Electric potential.
    ElectricPotential,
    /// Plane angle.
    Angle,
}

impl Quantity {
    /// The closed set of unit tokens for this family.
    pub fn units(self) -> &'static [&'static str] {
        match self {
            Quantity::Length => LENGTH_UNITS,
            Quantity::Time => TIME_UNITS,
            Quantity::Power => POWER_UNITS,
            Quantity::Pressure => PRESSURE_UNITS,
            Quantity::Temperature => TEMPERATURE_UNITS,
            Quantity::Frequency => FREQUENCY_UNITS,
            Quantity::ElectricPotential => ELECTRIC_POTENTIAL_UNITS,
            Quantity::Angle => ANGLE_UNITS,
        }
    }

    /// Strict membership test for a unit token.
    pub fn is_valid_unit(self, token: &str) -> bool {
        self.units().contains(&token)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quantity::Length => "length",
            Quantity::Time => "time",
            Quantity::Power => "power",
            Quantity::Pressure => "pressure",
            Quantity::Temperature => "temperature",
            Quantity::Frequency => "frequency",
            Quantity::ElectricPotential => "electric potential",
            Quantity::Angle => "angle",
        };
        f.write_str(name)
    }
}

/// Whether a value is a percent fraction, i.e. within `[0.0, 1.0]`.
pub fn is_percent_fraction(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

/// Whether a value fits the schema's color type: a signed 32-bit RGBA
/// encoding (`-1` is solid white, `-16776961` is red).
pub fn is_color(value: i64) -> bool {
    i32::try_from(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_membership_is_strict() {
        assert!(Quantity::Length.is_valid_unit("µm"));
        assert!(Quantity::Length.is_valid_unit("reference frame"));
        assert!(!Quantity::Length.is_valid_unit("um"));
        assert!(!Quantity::Length.is_valid_unit("Meter"));

        assert!(Quantity::Time.is_valid_unit("min"));
        assert!(Quantity::Frequency.is_valid_unit("MHz"));
        assert!(Quantity::ElectricPotential.is_valid_unit("mV"));
        assert!(Quantity::Pressure.is_valid_unit("mm Hg"));
        assert!(Quantity::Temperature.is_valid_unit("°C"));
        assert!(!Quantity::Temperature.is_valid_unit("C"));
        assert!(Quantity::Angle.is_valid_unit("rad"));
    }

    #[test]
    fn percent_fraction_bounds_are_inclusive() {
        assert!(is_percent_fraction(0.0));
        assert!(is_percent_fraction(0.5));
        assert!(is_percent_fraction(1.0));
        assert!(!is_percent_fraction(1.5));
        assert!(!is_percent_fraction(-0.01));
    }

    #[test]
    fn color_must_fit_signed_32_bits() {
        assert!(is_color(-1));
        assert!(is_color(-16776961));
        assert!(is_color(i64::from(i32::MAX)));
        assert!(!is_color(i64::from(i32::MAX) + 1));
        assert!(!is_color(i64::from(i32::MIN) - 1));
    }
}
