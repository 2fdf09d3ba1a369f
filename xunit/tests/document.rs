use xunit::{XmlDocument, XmlParseError};

const XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!-- generated -->
<t:assemblies xmlns:t="urn:test">
  <t:assembly name="a.dll">
    <collection name="first">
      <test name="one" t:result="Pass">hello <b>big</b> world</test>
      <test name="two" note="&lt;escaped&gt; &amp; more">
        <message><![CDATA[<raw> & text]]></message>
      </test>
    </collection>
    <collection name="second">
      <test name="three" />
    </collection>
  </t:assembly>
</t:assemblies>"#;

fn names<'a>(elements: impl Iterator<Item = xunit::Element<'a>>) -> Vec<&'a str> {
    elements
        .map(|element| element.attribute("name").unwrap_or(element.name()))
        .collect()
}

#[test]
fn builds_tree_with_local_names() {
    let document = XmlDocument::parse_str(XML, "doc.xml").unwrap();
    assert_eq!(document.source(), "doc.xml");

    let root = document.root().unwrap();
    assert_eq!(root.name(), "assemblies");
    assert!(root.parent().is_none());

    let assembly = root.child("assembly").unwrap();
    assert_eq!(assembly.attribute("name"), Some("a.dll"));
    pretty_assertions::assert_eq!(names(assembly.children()), vec!["first", "second"]);
}

#[test]
fn descendants_follow_document_order() {
    let document = XmlDocument::parse_str(XML, "doc.xml").unwrap();
    pretty_assertions::assert_eq!(
        names(document.descendants("test")),
        vec!["one", "two", "three"]
    );
    pretty_assertions::assert_eq!(names(document.descendants("assemblies")), vec!["assemblies"]);

    let first = document.descendants("collection").next().unwrap();
    pretty_assertions::assert_eq!(names(first.descendants("test")), vec!["one", "two"]);
    assert_eq!(first.descendants("collection").count(), 0);
}

#[test]
fn ancestors_are_nearest_first() {
    let document = XmlDocument::parse_str(
        r#"<suite name="outer"><suite name="inner"><case><test name="t" /></case></suite></suite>"#,
        "doc.xml",
    )
    .unwrap();
    let test = document.descendants("test").next().unwrap();
    pretty_assertions::assert_eq!(names(test.ancestors("suite")), vec!["inner", "outer"]);
    assert_eq!(test.ancestors("missing").count(), 0);
}

#[test]
fn values_are_unescaped_and_concatenated() {
    let document = XmlDocument::parse_str(XML, "doc.xml").unwrap();
    let mut tests = document.descendants("test");

    let one = tests.next().unwrap();
    assert_eq!(one.value(), "hello big world");
    assert_eq!(one.attribute("result"), Some("Pass"));

    let two = tests.next().unwrap();
    assert_eq!(two.attribute("note"), Some("<escaped> & more"));
    assert_eq!(two.child("message").unwrap().value(), "<raw> & text");

    let three = tests.next().unwrap();
    assert_eq!(three.value(), "");
    assert!(three.child("message").is_none());
}

#[test]
fn empty_input_has_no_root() {
    let document = XmlDocument::parse_str("<?xml version=\"1.0\"?>\n", "empty.xml").unwrap();
    assert!(document.root().is_none());
    assert_eq!(document.descendants("test").count(), 0);
}

#[test]
fn rejects_malformed_documents() {
    assert!(XmlDocument::parse_str("<a><b></b>", "doc.xml").is_err());
    assert!(matches!(
        XmlDocument::parse_str("<a></a><b />", "doc.xml"),
        Err(XmlParseError::MultipleRoots)
    ));
    assert!(XmlDocument::parse_str("<a></b>", "doc.xml").is_err());
}

#[test]
fn load_reports_missing_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("missing.xml");
    let error = XmlDocument::load(&path).unwrap_err();
    assert!(error
        .to_string()
        .starts_with(&format!("could not read {}", path.display())));
}
