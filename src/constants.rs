//! Schema constants: namespace URIs, dimension orders, pixel types and
//! the default document template.

/// Canonical URI of the primary OME schema namespace.
pub const NS_OME_DEFAULT: &str = "http://www.openmicroscopy.org/Schemas/OME/2016-06";

/// Canonical URI of the structured-annotations schema namespace.
pub const NS_SA_DEFAULT: &str = "http://www.openmicroscopy.org/Schemas/SA/2016-06";

/// Canonical URI of the screen/plate/well schema namespace.
pub const NS_SPW_DEFAULT: &str = "http://www.openmicroscopy.org/Schemas/SPW/2016-06";

/// Namespace used for vendor/tag original-metadata annotation payloads.
pub const NS_ORIGINAL_METADATA: &str = "openmicroscopy.org/OriginalMetadata";

/// Pattern matched against element namespace URIs to classify them into
/// the logical `ome`/`sa`/`spw` keys. The captured `key` segment is
/// lower-cased before comparison.
pub const NS_SCHEMA_PATTERN: &str = r"^http://www\.openmicroscopy\.org/Schemas/(?P<key>\w+)/";

/// Dimension order: XYZCT.
pub const DO_XYZCT: &str = "XYZCT";
/// Dimension order: XYZTC.
pub const DO_XYZTC: &str = "XYZTC";
/// Dimension order: XYCTZ.
pub const DO_XYCTZ: &str = "XYCTZ";
/// Dimension order: XYCZT.
pub const DO_XYCZT: &str = "XYCZT";
/// Dimension order: XYTCZ.
pub const DO_XYTCZ: &str = "XYTCZ";
/// Dimension order: XYTZC.
pub const DO_XYTZC: &str = "XYTZC";

/// All valid plane orderings for the `DimensionOrder` attribute.
pub const DIMENSION_ORDERS: &[&str] = &[
    DO_XYZCT, DO_XYZTC, DO_XYCTZ, DO_XYCZT, DO_XYTCZ, DO_XYTZC,
];

/// Pixel type: signed 8-bit integer.
pub const PT_INT8: &str = "int8";
/// Pixel type: signed 16-bit integer.
pub const PT_INT16: &str = "int16";
/// Pixel type: signed 32-bit integer.
pub const PT_INT32: &str = "int32";
/// Pixel type: unsigned 8-bit integer.
pub const PT_UINT8: &str = "uint8";
/// Pixel type: unsigned 16-bit integer.
pub const PT_UINT16: &str = "uint16";
/// Pixel type: unsigned 32-bit integer.
pub const PT_UINT32: &str = "uint32";
/// Pixel type: single-precision float.
pub const PT_FLOAT: &str = "float";
/// Pixel type: double-precision float.
pub const PT_DOUBLE: &str = "double";

/// Fixed row alphabet for the letter well-naming convention. Sixteen
/// letters; a row index at or beyond 16 has no letter name.
pub const WELL_ROW_ALPHABET: &str = "ABCDEFGHIJKLMNOP";

/// The minimal document a fresh [`crate::OmeXml`] starts from: one
/// 512x512 uint8 image with a single Z/T/C plane and one channel.
/// Callers may rely on this exact structure; the acquisition date is
/// re-stamped at construction time.
pub const DEFAULT_DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<OME xmlns="http://www.openmicroscopy.org/Schemas/OME/2016-06"
     xmlns:sa="http://www.openmicroscopy.org/Schemas/SA/2016-06"
     xmlns:spw="http://www.openmicroscopy.org/Schemas/SPW/2016-06">
  <Image ID="Image:0" Name="default.png">
    <AcquisitionDate>2016-01-01T00:00:00</AcquisitionDate>
    <Pixels BigEndian="false" DimensionOrder="XYCZT" ID="Pixels:0" Interleaved="false" SizeC="1" SizeT="1" SizeX="512" SizeY="512" SizeZ="1" Type="uint8">
      <Channel ID="Channel:0:0" SamplesPerPixel="1"/>
    </Pixels>
  </Image>
</OME>"#;
