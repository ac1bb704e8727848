use super::*;

const SAMPLE: &str = r#"<?xml version="1.0"?>
<root xmlns="urn:example:main" xmlns:x="urn:example:extra" id="r1">
  <child name="first">hello</child>
  <x:child name="second"/>
  <child name="third">&lt;escaped&gt;</child>
</root>"#;

#[test]
fn qualified_name_helpers() {
    let tag = qn("urn:example:main", "child");
    assert_eq!(tag, "{urn:example:main}child");
    assert_eq!(split_qn(&tag), Some(("urn:example:main", "child")));
    assert_eq!(split_qn("bare"), None);
}

#[test]
fn parse_resolves_namespaces() {
    let root = parse(SAMPLE).unwrap();
    assert_eq!(root.tag(), "{urn:example:main}root");
    assert_eq!(root.attr("id").as_deref(), Some("r1"));

    let children = root.find_all("{urn:example:main}child");
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].text().as_deref(), Some("hello"));
    assert_eq!(children[1].text().as_deref(), Some("<escaped>"));

    let extra = root.find("{urn:example:extra}child").unwrap();
    assert_eq!(extra.attr("name").as_deref(), Some("second"));
}

#[test]
fn attribute_upsert_preserves_order() {
    let node = XmlNode::new("n");
    node.set_attr("a", "1");
    node.set_attr("b", "2");
    node.set_attr("a", "3");
    assert_eq!(
        node.attrs(),
        vec![("a".to_string(), "3".to_string()), ("b".to_string(), "2".to_string())]
    );
}

#[test]
fn remove_child_by_identity() {
    let parent = XmlNode::new("p");
    let first = parent.create_child("c");
    let second = parent.create_child("c");
    assert!(parent.remove_child(&first));
    assert!(!parent.remove_child(&first));
    let left = parent.find_all("c");
    assert_eq!(left.len(), 1);
    assert!(left[0].same_node(&second));
}

#[test]
fn serialize_roundtrip() {
    let root = parse(SAMPLE).unwrap();
    let namespaces = vec![
        ("m".to_string(), "urn:example:main".to_string()),
        ("x".to_string(), "urn:example:extra".to_string()),
    ];
    let text = serialize(&root, &namespaces).unwrap();
    assert!(text.contains("xmlns:m=\"urn:example:main\""));
    assert!(text.contains("<m:root"));

    let reparsed = parse(&text).unwrap();
    assert_eq!(reparsed.tag(), "{urn:example:main}root");
    assert_eq!(reparsed.find_all("{urn:example:main}child").len(), 2);
    assert_eq!(
        reparsed.find("{urn:example:extra}child").unwrap().attr("name").as_deref(),
        Some("second")
    );
}

#[test]
fn serialize_generates_prefixes_for_unlisted_namespaces() {
    let root = XmlNode::new("{urn:example:other}root");
    let text = serialize(&root, &[]).unwrap();
    assert!(text.contains("xmlns:ns0=\"urn:example:other\""));
    assert!(text.contains("<ns0:root"));
}

#[test]
fn text_escaping_survives_roundtrip() {
    let root = XmlNode::new("root");
    root.set_text("a < b & c");
    root.set_attr("note", "say \"hi\"");
    let text = serialize(&root, &[]).unwrap();
    let reparsed = parse(&text).unwrap();
    assert_eq!(reparsed.text().as_deref(), Some("a < b & c"));
    assert_eq!(reparsed.attr("note").as_deref(), Some("say \"hi\""));
}
