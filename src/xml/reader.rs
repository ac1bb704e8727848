//! Pull parser building the owned tree, using quick-xml with namespace
//! resolution so every element lands with a `{uri}local` tag.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

use super::{qn, XmlError, XmlNode};

/// Parse an XML document into a tree, resolving element namespaces.
pub fn parse(xml: &str) -> Result<XmlNode, XmlError> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let node = element_from_start(&reader, &e)?;
                attach(&stack, &mut root, node.clone())?;
                stack.push(node);
            }
            Event::Empty(e) => {
                let node = element_from_start(&reader, &e)?;
                attach(&stack, &mut root, node)?;
            }
            Event::Text(t) => {
                if let Some(current) = stack.last() {
                    let text = t.unescape()?;
                    if !text.is_empty() {
                        current.set_text(text.as_ref());
                    }
                }
            }
            Event::CData(t) => {
                if let Some(current) = stack.last() {
                    current.set_text(std::str::from_utf8(&t)?);
                }
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    root.ok_or_else(|| XmlError::InvalidStructure("document has no root element".to_string()))
}

fn element_from_start<R>(reader: &NsReader<R>, e: &BytesStart<'_>) -> Result<XmlNode, XmlError> {
    let (resolution, local) = reader.resolve_element(e.name());
    let local = std::str::from_utf8(local.as_ref())?;
    let tag = match resolution {
        ResolveResult::Bound(Namespace(uri)) => qn(std::str::from_utf8(uri)?, local),
        _ => local.to_string(),
    };

    let node = XmlNode::new(tag);
    for attr in e.attributes() {
        let attr = attr?;
        let key = attr.key.as_ref();
        // Namespace declarations are consumed by the resolver, not
        // stored as attributes; the serializer re-declares prefixes.
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            continue;
        }
        let name = std::str::from_utf8(key)?;
        let value = attr.decode_and_unescape_value(reader.decoder())?;
        node.set_attr(name, value.as_ref());
    }
    Ok(node)
}

fn attach(stack: &[XmlNode], root: &mut Option<XmlNode>, node: XmlNode) -> Result<(), XmlError> {
    match stack.last() {
        Some(parent) => {
            parent.append(node);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(node);
            Ok(())
        }
        None => Err(XmlError::InvalidStructure(
            "multiple root elements".to_string(),
        )),
    }
}
