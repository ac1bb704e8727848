//! Cross-cutting accessor capabilities.
//!
//! Entities are independent node wrappers composed from small traits
//! rather than a base-class hierarchy: [`HasNode`] binds a view to its
//! element, [`Identified`] adds the kind-scoped ID pair, and
//! [`ManufacturerSpec`] adds the manufacturer/model/serial/lot block
//! shared by hardware entities. Free helpers below implement the
//! getter rule used everywhere: an absent attribute reads as
//! `Ok(None)`, a malformed one as an error.

use crate::error::{refused, ValidationError};
use crate::ident;
use crate::namespaces::Namespaces;
use crate::units::Quantity;
use crate::xml::XmlNode;

/// A typed view bound to one element of the document tree.
pub trait HasNode {
    /// The element this view reads and writes.
    fn node(&self) -> &XmlNode;
    /// The document's resolved namespace table.
    fn namespaces(&self) -> &Namespaces;
}

/// An entity with a kind-scoped LSID identifier.
pub trait Identified: HasNode {
    /// The entity kind the `ID` attribute is validated against.
    const KIND: &'static str;

    /// The `ID` attribute, if set.
    fn id(&self) -> Option<String> {
        self.node().attr("ID")
    }

    /// Set the `ID` attribute. Refuses values that do not match this
    /// entity kind's LSID pattern, leaving the prior value in place.
    fn set_id(&self, value: &str) -> Result<(), ValidationError> {
        if !ident::validate(Self::KIND, value) {
            return Err(refused(ValidationError::InvalidId {
                kind: Self::KIND,
                value: value.to_string(),
            }));
        }
        self.node().set_attr("ID", value);
        Ok(())
    }
}

/// The manufacturer-specification block shared by hardware entities.
pub trait ManufacturerSpec: HasNode {
    /// The `Manufacturer` attribute, if set.
    fn manufacturer(&self) -> Option<String> {
        self.node().attr("Manufacturer")
    }

    /// Set the `Manufacturer` attribute.
    fn set_manufacturer(&self, value: &str) {
        self.node().set_attr("Manufacturer", value);
    }

    /// The `Model` attribute, if set.
    fn model(&self) -> Option<String> {
        self.node().attr("Model")
    }

    /// Set the `Model` attribute.
    fn set_model(&self, value: &str) {
        self.node().set_attr("Model", value);
    }

    /// The `SerialNumber` attribute, if set.
    fn serial_number(&self) -> Option<String> {
        self.node().attr("SerialNumber")
    }

    /// Set the `SerialNumber` attribute.
    fn set_serial_number(&self, value: &str) {
        self.node().set_attr("SerialNumber", value);
    }

    /// The `LotNumber` attribute, if set.
    fn lot_number(&self) -> Option<String> {
        self.node().attr("LotNumber")
    }

    /// Set the `LotNumber` attribute.
    fn set_lot_number(&self, value: &str) {
        self.node().set_attr("LotNumber", value);
    }
}

/// Read an integer attribute. Absent reads as `Ok(None)`; text that is
/// not an integer is a [`ValidationError::Malformed`].
pub(crate) fn get_int_attr(node: &XmlNode, attr: &str) -> Result<Option<i64>, ValidationError> {
    match node.attr(attr) {
        None => Ok(None),
        Some(raw) => raw.parse::<i64>().map(Some).map_err(|_| {
            refused(ValidationError::Malformed {
                attr: attr.to_string(),
                value: raw,
            })
        }),
    }
}

/// Read a float attribute with the same absent/malformed split.
pub(crate) fn get_float_attr(node: &XmlNode, attr: &str) -> Result<Option<f64>, ValidationError> {
    match node.attr(attr) {
        None => Ok(None),
        Some(raw) => raw.parse::<f64>().map(Some).map_err(|_| {
            refused(ValidationError::Malformed {
                attr: attr.to_string(),
                value: raw,
            })
        }),
    }
}

/// Read a color attribute, additionally requiring the signed 32-bit
/// domain.
pub(crate) fn get_color_attr(node: &XmlNode, attr: &str) -> Result<Option<i32>, ValidationError> {
    match node.attr(attr) {
        None => Ok(None),
        Some(raw) => raw.parse::<i32>().map(Some).map_err(|_| {
            refused(ValidationError::Malformed {
                attr: attr.to_string(),
                value: raw,
            })
        }),
    }
}

/// Read a boolean attribute (`true`/`false`, with `1`/`0` tolerated).
pub(crate) fn get_bool_attr(node: &XmlNode, attr: &str) -> Result<Option<bool>, ValidationError> {
    match node.attr(attr) {
        None => Ok(None),
        Some(raw) => match raw.as_str() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(refused(ValidationError::Malformed {
                attr: attr.to_string(),
                value: raw,
            })),
        },
    }
}

/// Validate and write a unit attribute against its quantity family.
pub(crate) fn set_unit_attr(
    node: &XmlNode,
    attr: &'static str,
    quantity: Quantity,
    value: &str,
) -> Result<(), ValidationError> {
    if !quantity.is_valid_unit(value) {
        return Err(refused(ValidationError::InvalidUnit {
            attr,
            quantity,
            value: value.to_string(),
        }));
    }
    node.set_attr(attr, value);
    Ok(())
}

/// Validate and write an attribute constrained to a closed set.
pub(crate) fn set_enum_attr(
    node: &XmlNode,
    attr: &'static str,
    allowed: &'static [&'static str],
    value: &str,
) -> Result<(), ValidationError> {
    if !allowed.contains(&value) {
        return Err(refused(ValidationError::InvalidEnum {
            attr,
            value: value.to_string(),
            allowed,
        }));
    }
    node.set_attr(attr, value);
    Ok(())
}

/// Inject the documented default unit for a measured attribute when no
/// unit has been set yet. Emits a diagnostic so the defaulting is
/// visible.
pub(crate) fn default_unit(node: &XmlNode, unit_attr: &str, default: &str) {
    if node.attr(unit_attr).is_none() {
        log::info!("{unit_attr} not set, defaulting to {default}");
        node.set_attr(unit_attr, default);
    }
}

/// Text of a direct child element, if the child exists.
pub(crate) fn child_text(node: &XmlNode, qualified_tag: &str) -> Option<String> {
    node.find(qualified_tag).and_then(|child| child.text())
}

/// Write text into a direct child element, creating the child on
/// demand.
pub(crate) fn set_child_text(node: &XmlNode, qualified_tag: &str, text: &str) {
    let child = node
        .find(qualified_tag)
        .unwrap_or_else(|| node.create_child(qualified_tag));
    child.set_text(text);
}

/// ID carried by a reference child element, if the child exists.
pub(crate) fn reference_id(node: &XmlNode, qualified_tag: &str) -> Option<String> {
    node.find(qualified_tag).and_then(|child| child.attr("ID"))
}

/// Upsert a reference child element pointing at another entity. The
/// target ID is validated against the referenced entity's kind; only
/// its syntactic form is checked, never its existence.
pub(crate) fn set_reference(
    node: &XmlNode,
    qualified_tag: &str,
    kind: &'static str,
    id: &str,
) -> Result<(), ValidationError> {
    if !ident::validate(kind, id) {
        return Err(refused(ValidationError::InvalidId {
            kind,
            value: id.to_string(),
        }));
    }
    let child = node
        .find(qualified_tag)
        .unwrap_or_else(|| node.create_child(qualified_tag));
    child.set_attr("ID", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_malformed_are_distinct() {
        let node = XmlNode::new("n");
        assert_eq!(get_int_attr(&node, "SizeX").unwrap(), None);
        node.set_attr("SizeX", "512");
        assert_eq!(get_int_attr(&node, "SizeX").unwrap(), Some(512));
        node.set_attr("SizeX", "lots");
        assert!(matches!(
            get_int_attr(&node, "SizeX"),
            Err(ValidationError::Malformed { .. })
        ));
    }

    #[test]
    fn default_unit_never_overwrites() {
        let node = XmlNode::new("n");
        default_unit(&node, "WavelengthUnit", "nm");
        assert_eq!(node.attr("WavelengthUnit").as_deref(), Some("nm"));
        default_unit(&node, "WavelengthUnit", "µm");
        assert_eq!(node.attr("WavelengthUnit").as_deref(), Some("nm"));
    }

    #[test]
    fn reference_upsert_creates_then_reuses_the_child() {
        let node = XmlNode::new("n");
        set_reference(&node, "InstrumentRef", "Instrument", "Instrument:0").unwrap();
        set_reference(&node, "InstrumentRef", "Instrument", "Instrument:1").unwrap();
        assert_eq!(node.find_all("InstrumentRef").len(), 1);
        assert_eq!(reference_id(&node, "InstrumentRef").as_deref(), Some("Instrument:1"));
    }

    #[test]
    fn reference_upsert_refuses_wrong_kind() {
        let node = XmlNode::new("n");
        let err = set_reference(&node, "InstrumentRef", "Instrument", "Image:1");
        assert!(matches!(err, Err(ValidationError::InvalidId { .. })));
        assert!(node.find("InstrumentRef").is_none());
    }
}
