//! # omemeta - OME-XML Microscopy Metadata Object Model
//!
//! `omemeta` is a structured, schema-aware reader/writer for OME-XML
//! microscopy metadata documents. It lets callers construct, inspect
//! and mutate the fixed catalogue of domain entities (images, pixels,
//! channels, planes, regions of interest, plates, wells, instruments,
//! annotations) without hand-manipulating raw tree nodes, while
//! enforcing the format's structural and value rules: kind-scoped
//! identifiers, cross-reference syntax, closed unit vocabularies and
//! default-unit injection.
//!
//! ## Key Behaviors
//!
//! - **Typed accessors over a live tree**: every entity is a cheap
//!   view bound to one element; mutating the view mutates the
//!   document. Absent attributes read as `None`, malformed ones as
//!   errors - never sentinel strings.
//!
//! - **Cardinality-managed collections**: counts are derived from live
//!   children and settable. Growing creates fully-populated defaults
//!   (a new image arrives with its `Pixels` and `Channel` in place);
//!   shrinking removes from the tail.
//!
//! - **Validated writes**: identifier, enum, unit and range rules are
//!   checked before anything touches the tree. A refused write leaves
//!   the prior state intact and reports through both the returned
//!   error and the `log` diagnostic channel.
//!
//! - **Well addressing**: plates carry independent letter/number
//!   naming conventions per axis; well names like `B03` are derived,
//!   never stored.
//!
//! - **Original-metadata overlay**: vendor/tag key-value pairs ride on
//!   structured annotations and read back as a flat first-match-wins
//!   mapping.
//!
//! ## Quick Start
//!
//! ```
//! use omemeta::OmeXml;
//!
//! // A fresh document starts from the default template: one 512x512
//! // uint8 image with a single channel.
//! let doc = OmeXml::new();
//! let image = doc.image(0).unwrap();
//! image.set_name("MyImage");
//!
//! // Make it a three-color image; each new channel gets a generated
//! // ID and SamplesPerPixel=1.
//! let pixels = image.pixels().unwrap();
//! pixels.set_channel_count(3)?;
//! pixels.channel(0).unwrap().set_name("Red");
//! pixels.channel(1).unwrap().set_name("Green");
//! pixels.channel(2).unwrap().set_name("Blue");
//!
//! let xml = doc.to_xml().expect("serialization succeeds");
//! let roundtrip = OmeXml::from_str(&xml).expect("own output parses");
//! assert_eq!(roundtrip.image(0).unwrap().pixels().unwrap().channel_count(), 3);
//! # Ok::<(), omemeta::ValidationError>(())
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`document`]: the [`OmeXml`] root - parse, default template,
//!   serialize, root-level collections
//! - [`image`], [`instrument`], [`roi`], [`plate`], [`annotations`]:
//!   the entity accessor layer
//! - [`entity`]: the composable capabilities entities share
//!   (node binding, kind-scoped IDs, manufacturer specs)
//! - [`units`]: closed unit vocabularies and bounded numeric domains
//! - [`ident`]: LSID-style identifier validation
//! - [`namespaces`]: schema-namespace resolution over parsed trees
//! - [`xml`]: the minimal owned DOM and its quick-xml parse/serialize
//!   boundary
//!
//! ## Concurrency
//!
//! A document is a single-threaded, exclusively-owned structure; node
//! handles are `Rc`-based and not `Send`. Hosts that share a document
//! across tasks must serialize access externally.

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod annotations;
pub mod constants;
pub mod document;
pub mod entity;
pub mod error;
pub mod ident;
pub mod image;
pub mod instrument;
pub mod namespaces;
pub mod plate;
pub mod roi;
pub mod units;
pub mod xml;

mod collection;

pub use document::OmeXml;
pub use error::{FormatError, ValidationError};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::annotations::{Annotation, AnnotationRef, StructuredAnnotations};
    pub use crate::document::OmeXml;
    pub use crate::entity::{HasNode, Identified, ManufacturerSpec};
    pub use crate::error::{FormatError, ValidationError};
    pub use crate::image::{Channel, Image, Pixels, Plane, TiffData};
    pub use crate::instrument::{
        Detector, DetectorSettings, Dichroic, Filter, FilterSet, Instrument, LightSource,
        LightSourceSettings, Microscope, Objective,
    };
    pub use crate::plate::{
        well_name, NamingConvention, Plate, Plates, Well, WellSample, WellSamples, Wells,
    };
    pub use crate::roi::{AffineTransform, Rectangle, Roi, RoiRef, Shape, ShapeUnion};
    pub use crate::units::Quantity;
    pub use crate::xml::XmlNode;
}
