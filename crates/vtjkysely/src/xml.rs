//! Namespace-aware XML element tree.
//!
//! This module is the wire layer of the crate: documents are parsed into an owned [`Element`]
//! tree (with prefixes resolved to namespace URIs) and typed records are translated to and from
//! that tree by the [`crate::binding`] layer. Rendering assigns the preferred prefixes from
//! [`crate::namespaces`] and declares every namespace once, on the root element.
//!
//! Whitespace-only text between elements is dropped; any other text is kept verbatim.

use crate::namespaces;
use crate::{VtjError, VtjResult};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use quick_xml::Writer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Static qualified name used in schema declarations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Name {
    pub namespace: Option<&'static str>,
    pub local: &'static str,
}

impl Name {
    pub const fn new(namespace: &'static str, local: &'static str) -> Self {
        Self {
            namespace: Some(namespace),
            local,
        }
    }

    pub const fn unqualified(local: &'static str) -> Self {
        Self {
            namespace: None,
            local,
        }
    }

    /// Name in the web-service namespace.
    pub const fn vtj(local: &'static str) -> Self {
        Self::new(namespaces::VTJ_WS, local)
    }

    /// Name in the product schema namespace.
    pub const fn schema(local: &'static str) -> Self {
        Self::new(namespaces::VTJ_SCHEMA, local)
    }

    /// Name in the X-Road header namespace.
    pub const fn xroad(local: &'static str) -> Self {
        Self::new(namespaces::XROAD, local)
    }

    /// Name in the X-Road identifiers namespace.
    pub const fn identifiers(local: &'static str) -> Self {
        Self::new(namespaces::XROAD_IDENTIFIERS, local)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_qualified(f, self.namespace, self.local)
    }
}

fn write_qualified(f: &mut fmt::Formatter<'_>, namespace: Option<&str>, local: &str) -> fmt::Result {
    match namespace {
        None => f.write_str(local),
        Some(ns) if ns == namespaces::XML => write!(f, "xml:{local}"),
        Some(ns) => match namespaces::preferred_prefix(ns) {
            Some(prefix) => write!(f, "{prefix}:{local}"),
            None => write!(f, "{{{ns}}}{local}"),
        },
    }
}

/// An attribute with its namespace resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub local_name: String,
    pub value: String,
}

/// An owned XML element with resolved namespaces.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub local_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Element {
    pub fn new(name: Name) -> Self {
        Self {
            namespace: name.namespace.map(str::to_owned),
            local_name: name.local.to_owned(),
            ..Self::default()
        }
    }

    /// Element with the given name and text content.
    pub fn with_text(name: Name, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(name)
        }
    }

    /// Whether this element matches `name`.
    ///
    /// Unqualified elements match by local name alone, in lax and strict decoding alike, so
    /// documents from namespace-unaware peers bind. Qualified elements must be in the declared
    /// namespace; anything else is reported as a wrong-namespace violation.
    pub fn is(&self, name: Name) -> bool {
        self.local_name == name.local
            && match self.namespace.as_deref() {
                None => true,
                Some(ns) => Some(ns) == name.namespace,
            }
    }

    /// Whether this element has exactly the qualified name `name`.
    pub fn has_name(&self, name: Name) -> bool {
        self.local_name == name.local && self.namespace.as_deref() == name.namespace
    }

    /// Display form of the element name (`prefix:local` for known namespaces).
    pub fn display_name(&self) -> String {
        QualifiedDisplay(self.namespace.as_deref(), &self.local_name).to_string()
    }

    pub fn child(&self, name: Name) -> Option<&Element> {
        self.children.iter().find(|c| c.is(name))
    }

    pub fn children_named(&self, name: Name) -> impl Iterator<Item = &Element> {
        self.children.iter().filter(move |c| c.is(name))
    }

    /// Text of the first child named `name`.
    ///
    /// A present but empty child reads as `Some("")`, an absent child as `None`.
    pub fn child_text(&self, name: Name) -> Option<String> {
        self.child(name).map(Element::text_content)
    }

    /// Text content of this element, empty if there is none.
    pub fn text_content(&self) -> String {
        self.text.clone().unwrap_or_default()
    }

    /// Value of an unqualified attribute.
    pub fn attribute(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.is_none() && a.local_name == local)
            .map(|a| a.value.as_str())
    }

    /// Value of the attribute with exactly the qualified name `name`.
    pub fn attribute_ns(&self, name: Name) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.local_name == name.local && a.namespace.as_deref() == name.namespace)
            .map(|a| a.value.as_str())
    }

    pub fn set_attribute(&mut self, name: Name, value: impl Into<String>) {
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|a| a.local_name == name.local && a.namespace.as_deref() == name.namespace)
        {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute {
                namespace: name.namespace.map(str::to_owned),
                local_name: name.local.to_owned(),
                value,
            }),
        }
    }

    /// Set an attribute only when a value is present.
    pub fn set_optional_attribute(&mut self, name: Name, value: Option<&str>) {
        if let Some(value) = value {
            self.set_attribute(name, value);
        }
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Append a text-only child when a value is present.
    pub fn push_text_child(&mut self, name: Name, value: Option<&str>) {
        if let Some(value) = value {
            self.children.push(Element::with_text(name, value));
        }
    }

    fn append_text(&mut self, text: &str) {
        match &mut self.text {
            Some(existing) => existing.push_str(text),
            None => self.text = Some(text.to_owned()),
        }
    }
}

struct QualifiedDisplay<'a>(Option<&'a str>, &'a str);

impl fmt::Display for QualifiedDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_qualified(f, self.0, self.1)
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse an XML document into an element tree.
///
/// # Errors
///
/// Returns [`VtjError`] if the document is not well-formed, uses an undeclared prefix, or has
/// no root element.
pub fn parse_document(xml: &str) -> VtjResult<Element> {
    let mut reader = NsReader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let (resolved, event) = reader.read_resolved_event()?;
        let namespace = owned_namespace(resolved)?;
        match event {
            Event::Start(start) => {
                let element = open_element(&reader, namespace, &start)?;
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = open_element(&reader, namespace, &start)?;
                close_element(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| {
                    VtjError::MalformedDocument("unbalanced end tag".to_string())
                })?;
                close_element(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                append_text(&mut stack, &text);
            }
            Event::CData(data) => {
                let text = std::str::from_utf8(&data)?;
                append_text(&mut stack, text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(VtjError::MalformedDocument(format!(
            "element {} is not closed",
            open.display_name()
        )));
    }

    root.ok_or_else(|| VtjError::MalformedDocument("document has no root element".to_string()))
}

fn owned_namespace(resolved: ResolveResult<'_>) -> VtjResult<Option<String>> {
    match resolved {
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Bound(ns) => Ok(Some(std::str::from_utf8(ns.as_ref())?.to_owned())),
        ResolveResult::Unknown(prefix) => Err(VtjError::UnknownPrefix(
            String::from_utf8_lossy(&prefix).into_owned(),
        )),
    }
}

fn open_element(
    reader: &NsReader<&[u8]>,
    namespace: Option<String>,
    start: &BytesStart<'_>,
) -> VtjResult<Element> {
    let local_name = std::str::from_utf8(start.local_name().as_ref())?.to_owned();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let (resolved, local) = reader.resolve_attribute(attr.key);
        let namespace = match resolved {
            ResolveResult::Unknown(prefix) if prefix == b"xml" => {
                Some(namespaces::XML.to_string())
            }
            other => owned_namespace(other)?,
        };
        attributes.push(Attribute {
            namespace,
            local_name: std::str::from_utf8(local.as_ref())?.to_owned(),
            value: attr.unescape_value()?.into_owned(),
        });
    }

    Ok(Element {
        namespace,
        local_name,
        attributes,
        children: Vec::new(),
        text: None,
    })
}

fn close_element(
    stack: &mut [Element],
    root: &mut Option<Element>,
    mut element: Element,
) -> VtjResult<()> {
    // Whitespace is content in a leaf and indentation between child elements.
    let indentation_only = element.text.as_deref().is_some_and(|t| t.trim().is_empty());
    if indentation_only && !element.children.is_empty() {
        element.text = None;
    }
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(VtjError::MalformedDocument(
            "document has more than one root element".to_string(),
        )),
    }
}

fn append_text(stack: &mut [Element], text: &str) {
    if let Some(current) = stack.last_mut() {
        current.append_text(text);
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Options controlling [`render_document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Indentation width in spaces; `None` writes everything on one line.
    pub indent: Option<usize>,
    /// Whether to write the `<?xml ...?>` declaration.
    pub declaration: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: None,
            declaration: true,
        }
    }
}

/// Render an element tree as an XML document.
///
/// # Errors
///
/// Returns [`VtjError`] if writing fails.
pub fn render_document(root: &Element, options: RenderOptions) -> VtjResult<String> {
    let table = PrefixTable::collect(root);
    let mut writer = match options.indent {
        Some(width) if width > 0 => Writer::new_with_indent(Vec::new(), b' ', width),
        _ => Writer::new(Vec::new()),
    };

    if options.declaration {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    }
    write_element(&mut writer, root, &table, true)?;

    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    element: &Element,
    table: &PrefixTable,
    declare_namespaces: bool,
) -> VtjResult<()> {
    let qname = table.qualify(element.namespace.as_deref(), &element.local_name);
    let mut start = BytesStart::new(qname.as_str());

    if declare_namespaces {
        for (uri, prefix) in &table.entries {
            let key = format!("xmlns:{prefix}");
            start.push_attribute((key.as_str(), uri.as_str()));
        }
    }
    for attribute in &element.attributes {
        let key = table.qualify(attribute.namespace.as_deref(), &attribute.local_name);
        start.push_attribute((key.as_str(), attribute.value.as_str()));
    }

    let text = element.text.as_deref().filter(|t| !t.is_empty());
    if element.children.is_empty() && text.is_none() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for child in &element.children {
        write_element(writer, child, table, false)?;
    }
    writer.write_event(Event::End(BytesEnd::new(qname.as_str())))?;
    Ok(())
}

/// Namespace URI to prefix assignments for one rendered document.
struct PrefixTable {
    entries: Vec<(String, String)>,
    generated: usize,
}

impl PrefixTable {
    fn collect(root: &Element) -> Self {
        let mut table = Self {
            entries: Vec::new(),
            generated: 0,
        };
        table.visit(root);
        table
    }

    fn visit(&mut self, element: &Element) {
        if let Some(ns) = &element.namespace {
            self.register(ns);
        }
        for attribute in &element.attributes {
            if let Some(ns) = &attribute.namespace {
                self.register(ns);
            }
        }
        for child in &element.children {
            self.visit(child);
        }
    }

    fn register(&mut self, namespace: &str) {
        if namespace == namespaces::XML || self.prefix(namespace).is_some() {
            return;
        }
        let prefix = match namespaces::preferred_prefix(namespace) {
            Some(prefix) => prefix.to_string(),
            None => {
                self.generated += 1;
                format!("ns{}", self.generated)
            }
        };
        self.entries.push((namespace.to_string(), prefix));
    }

    fn prefix(&self, namespace: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(uri, _)| uri == namespace)
            .map(|(_, prefix)| prefix.as_str())
    }

    fn qualify(&self, namespace: Option<&str>, local: &str) -> String {
        match namespace {
            None => local.to_string(),
            Some(ns) if ns == namespaces::XML => format!("xml:{local}"),
            Some(ns) => match self.prefix(ns) {
                Some(prefix) => format!("{prefix}:{local}"),
                None => local.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::{VTJ_SCHEMA, VTJ_WS, XML, XROAD_IDENTIFIERS};

    #[test]
    fn resolves_prefixed_and_default_namespaces() {
        let input = r#"<?xml version="1.0" encoding="UTF-8"?>
<ns1:HenkilonTunnusKysely xmlns:ns1="http://xml.vrk.fi/ws/vtj/vtjkysely/1">
  <ns1:request>
    <Henkilotunnus xmlns="http://xml.vrk.fi/schema/vtjkysely">010101A123N</Henkilotunnus>
  </ns1:request>
</ns1:HenkilonTunnusKysely>"#;

        let root = parse_document(input).expect("parse");
        assert!(root.has_name(Name::vtj("HenkilonTunnusKysely")));
        let request = root.child(Name::vtj("request")).expect("request child");
        let hetu = &request.children[0];
        assert_eq!(hetu.namespace.as_deref(), Some(VTJ_SCHEMA));
        assert_eq!(hetu.text.as_deref(), Some("010101A123N"));
    }

    #[test]
    fn resolves_attribute_namespaces() {
        let input = r#"<xrd:client xmlns:xrd="http://x-road.eu/xsd/xroad.xsd"
            xmlns:id="http://x-road.eu/xsd/identifiers" id:objectType="SUBSYSTEM">
            <xrd:title xml:lang="fi" plain="yes">Otsikko</xrd:title>
        </xrd:client>"#;

        let root = parse_document(input).expect("parse");
        assert_eq!(
            root.attribute_ns(Name::identifiers("objectType")),
            Some("SUBSYSTEM")
        );
        assert_eq!(root.attributes.len(), 1, "xmlns declarations are not attributes");
        assert_eq!(root.attributes[0].namespace.as_deref(), Some(XROAD_IDENTIFIERS));

        let title = &root.children[0];
        assert_eq!(title.attribute_ns(Name::new(XML, "lang")), Some("fi"));
        assert_eq!(title.attribute("plain"), Some("yes"));
        assert_eq!(title.attribute("lang"), None);
    }

    #[test]
    fn keeps_text_verbatim_and_unescapes_entities() {
        let input = "<a><b> Sepon &amp; Maijan </b><c><![CDATA[<raw>]]></c><d></d>\n</a>";
        let root = parse_document(input).expect("parse");
        assert_eq!(root.text, None, "whitespace between elements is dropped");
        assert_eq!(root.children[0].text.as_deref(), Some(" Sepon & Maijan "));
        assert_eq!(root.children[1].text.as_deref(), Some("<raw>"));
        assert_eq!(root.child_text(Name::unqualified("d")), Some(String::new()));
        assert_eq!(root.child_text(Name::unqualified("e")), None);
    }

    #[test]
    fn whitespace_only_leaf_text_survives_a_round_trip() {
        let mut root = Element::new(Name::vtj("request"));
        root.push_text_child(Name::vtj("SoSoNimi"), Some(" "));
        root.push_text_child(Name::vtj("Vara1"), Some("\n\t"));

        for indent in [None, Some(2)] {
            let options = RenderOptions {
                indent,
                declaration: true,
            };
            let xml = render_document(&root, options).expect("render");
            let reparsed = parse_document(&xml).expect("reparse");
            assert_eq!(reparsed, root, "indent {indent:?}: {xml}");
        }
    }

    #[test]
    fn rejects_undeclared_prefix() {
        let err = parse_document("<foo:bar/>").expect_err("unknown prefix");
        assert!(matches!(err, VtjError::UnknownPrefix(prefix) if prefix == "foo"));
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(parse_document("<a><b></a>").is_err());
        assert!(matches!(
            parse_document("   "),
            Err(VtjError::MalformedDocument(_))
        ));
        assert!(matches!(
            parse_document("<a>"),
            Err(VtjError::MalformedDocument(_)) | Err(VtjError::Xml(_))
        ));
    }

    #[test]
    fn unqualified_elements_match_any_declared_namespace() {
        let element = Element::new(Name::unqualified("Sukunimi"));
        assert!(element.is(Name::schema("Sukunimi")));
        assert!(!element.has_name(Name::schema("Sukunimi")));

        let foreign = Element::new(Name::new("urn:other", "Sukunimi"));
        assert!(!foreign.is(Name::schema("Sukunimi")));
    }

    #[test]
    fn renders_namespaces_once_on_root() {
        let mut root = Element::new(Name::vtj("HenkilonTunnusKyselyResponse"));
        let mut document = Element::new(Name::schema("VTJHenkiloVastaussanoma"));
        document.set_attribute(Name::unqualified("versio"), "1.0");
        document.push_text_child(Name::schema("Paluukoodi"), Some("Haku onnistui & ok"));
        document.push_text_child(Name::schema("Tyhja"), None);
        root.push_child(document);
        root.push_child(Element::new(Name::vtj("response")));

        let xml = render_document(&root, RenderOptions::default()).expect("render");
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(&format!(
            "<vtj:HenkilonTunnusKyselyResponse xmlns:vtj=\"{VTJ_WS}\" xmlns:vtjkysely=\"{VTJ_SCHEMA}\">"
        )));
        assert_eq!(xml.matches("xmlns:vtjkysely").count(), 1);
        assert!(xml.contains("<vtjkysely:VTJHenkiloVastaussanoma versio=\"1.0\">"));
        assert!(xml.contains("<vtjkysely:Paluukoodi>Haku onnistui &amp; ok</vtjkysely:Paluukoodi>"));
        assert!(xml.contains("<vtj:response/>"));
        assert!(!xml.contains("Tyhja"));

        let reparsed = parse_document(&xml).expect("reparse");
        assert_eq!(reparsed, root);
    }

    #[test]
    fn generates_prefixes_for_unknown_namespaces() {
        let mut root = Element::new(Name::new("urn:example:a", "root"));
        root.push_child(Element::with_text(Name::new("urn:example:b", "leaf"), "x"));
        root.set_attribute(Name::new(XML, "lang"), "sv");

        let options = RenderOptions {
            indent: Some(2),
            declaration: false,
        };
        let xml = render_document(&root, options).expect("render");
        assert!(xml.starts_with("<ns1:root xmlns:ns1=\"urn:example:a\" xmlns:ns2=\"urn:example:b\" xml:lang=\"sv\">"));
        assert!(xml.contains("\n  <ns2:leaf>x</ns2:leaf>"));

        let reparsed = parse_document(&xml).expect("reparse");
        assert_eq!(reparsed, root);
    }
}
