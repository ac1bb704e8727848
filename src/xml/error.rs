/// Errors that can occur while parsing or serializing the tree.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// Error from the underlying XML parser.
    #[error("XML parsing error: {0}")]
    Parse(#[from] quick_xml::Error),

    /// A malformed attribute in the input.
    #[error("malformed attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// Non-UTF-8 bytes where text was expected.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// I/O error while writing serialized output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Close tags did not line up with open tags.
    #[error("invalid document structure: {0}")]
    InvalidStructure(String),
}
