//! Tree serializer. Namespace prefixes are declared once on the root
//! element; every namespaced tag below is written with its prefix.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::{split_qn, XmlError, XmlNode};

/// Serialize a tree to an XML string.
///
/// `namespaces` is the `(prefix, uri)` table to declare on the root
/// element. Namespace URIs found in the tree but missing from the
/// table get generated `ns0`, `ns1`, ... prefixes.
pub fn serialize(root: &XmlNode, namespaces: &[(String, String)]) -> Result<String, XmlError> {
    let mut prefixes: Vec<(String, String)> = namespaces.to_vec();
    let mut generated = 0usize;
    for node in root.iter_descendants() {
        if let Some((uri, _)) = split_qn(&node.tag()) {
            if !prefixes.iter().any(|(_, u)| u == uri) {
                prefixes.push((format!("ns{generated}"), uri.to_string()));
                generated += 1;
            }
        }
    }

    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, root, &prefixes, true)?;

    String::from_utf8(writer.into_inner()).map_err(|e| XmlError::Utf8(e.utf8_error()))
}

fn prefixed_tag(tag: &str, prefixes: &[(String, String)]) -> Result<String, XmlError> {
    match split_qn(tag) {
        Some((uri, local)) => prefixes
            .iter()
            .find(|(_, u)| u == uri)
            .map(|(p, _)| format!("{p}:{local}"))
            .ok_or_else(|| {
                XmlError::InvalidStructure(format!("no prefix bound for namespace {uri}"))
            }),
        None => Ok(tag.to_string()),
    }
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    node: &XmlNode,
    prefixes: &[(String, String)],
    is_root: bool,
) -> Result<(), XmlError> {
    let name = prefixed_tag(&node.tag(), prefixes)?;
    let mut start = BytesStart::new(name.clone());
    if is_root {
        for (prefix, uri) in prefixes {
            start.push_attribute((format!("xmlns:{prefix}").as_str(), uri.as_str()));
        }
    }
    for (key, value) in node.attrs() {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    let text = node.text();
    let children = node.children();
    if text.is_none() && children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = text {
        writer.write_event(Event::Text(BytesText::new(&text)))?;
    }
    for child in &children {
        write_element(writer, child, prefixes, false)?;
    }
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
