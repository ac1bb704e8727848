//! Crate error taxonomy.
//!
//! Two failure families exist: a document that cannot be constructed at
//! all ([`FormatError`], fatal), and a mutation that is refused while
//! the document stays intact ([`ValidationError`], local). Lookups that
//! miss are expressed as `Option`/iterator exhaustion, never as errors.

use crate::units::Quantity;
use crate::xml::XmlError;

/// Fatal errors raised while constructing a document.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// No element in the document uses the primary OME schema
    /// namespace, so the input is not OME-XML.
    #[error("document is not OME-XML: primary schema namespace not found")]
    NotOmeXml,

    /// The input could not be parsed as XML at all.
    #[error(transparent)]
    Xml(#[from] XmlError),
}

/// A refused mutation. The attribute or collection named in the error
/// keeps its prior state; nothing is partially written.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// An identifier does not match the LSID pattern for its entity
    /// kind (`urn:lsid:<authority>:<Kind>:<suffix>` or `<Kind>:<suffix>`).
    #[error("{kind} ID does not match the LSID pattern: {value:?}")]
    InvalidId {
        /// Entity kind the identifier was validated against.
        kind: &'static str,
        /// The rejected candidate.
        value: String,
    },

    /// A value outside a closed enumerated set.
    #[error("{attr} must be one of {allowed:?}, got {value:?}")]
    InvalidEnum {
        /// Attribute being written.
        attr: &'static str,
        /// The rejected value.
        value: String,
        /// The closed set of accepted values.
        allowed: &'static [&'static str],
    },

    /// A unit token outside its physical-quantity family.
    #[error("{value:?} is not a valid {quantity} unit for {attr}")]
    InvalidUnit {
        /// Attribute whose unit was being written.
        attr: &'static str,
        /// Physical-quantity family the attribute requires.
        quantity: Quantity,
        /// The rejected token.
        value: String,
    },

    /// A numeric value outside its documented domain.
    #[error("{attr} is out of range: {detail}")]
    OutOfRange {
        /// Attribute being written.
        attr: &'static str,
        /// What the domain requires.
        detail: String,
    },

    /// An attribute that should hold a number (or other typed value)
    /// holds text that does not parse. Distinct from the attribute
    /// being absent, which reads as `None`.
    #[error("attribute {attr} holds a malformed value {value:?}")]
    Malformed {
        /// Attribute that failed to parse.
        attr: String,
        /// The raw text found.
        value: String,
    },

    /// A derived operation needed an attribute that is not present.
    #[error("required attribute {attr} is absent")]
    MissingAttribute {
        /// The absent attribute.
        attr: &'static str,
    },

    /// A cardinality write the collection's policy does not allow.
    #[error("invalid count {requested} for the {collection} collection")]
    InvalidCount {
        /// The collection being resized.
        collection: &'static str,
        /// The rejected count.
        requested: usize,
    },
}

/// Log a refused mutation on the diagnostic channel and hand the error
/// back for the caller.
pub(crate) fn refused(err: ValidationError) -> ValidationError {
    log::error!("{err}");
    err
}
