//! In-memory XML element tree and namespace-aware field lookups.
//!
//! Transaction reports are small enough to be read whole, so a document is
//! tokenised once with `quick_xml` into an owned [`Element`] tree. All field
//! lookups then go through an [`Extractor`], which carries the namespace of
//! the document being mapped and never fails on a missing tag.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use std::io::Read;

/// A single XML element with its resolved namespace.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    namespace: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Local (unprefixed) tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace URI the element is bound to, empty when unbound.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Direct text content, empty for `<Tag/>` and `<Tag></Tag>` alike.
    /// Surrounding whitespace inside a value is kept.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Attribute value by local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child elements in document order.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    fn from_start(start: &BytesStart<'_>, namespace: String) -> Result<Self> {
        let name = utf8(start.local_name().as_ref())?;

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = attr.key.as_ref();
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }
            let key = utf8(attr.key.local_name().as_ref())?;
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }

        Ok(Element {
            name,
            namespace,
            attributes,
            text: String::new(),
            children: Vec::new(),
        })
    }
}

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: Element,
}

impl XmlDocument {
    /// Parse a document from any source implementing `Read`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::fs::File;
    /// use unavista_mifid2::xml_tree::XmlDocument;
    ///
    /// let mut file = File::open("report.xml")?;
    /// let document = XmlDocument::from_read(&mut file)?;
    /// println!("root: {}", document.root().name());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut xml_content = String::new();
        reader.read_to_string(&mut xml_content)?;

        Self::parse(&xml_content)
    }

    /// Parse a document held in memory.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = NsReader::from_str(xml);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_resolved_event()? {
                (ns, Event::Start(start)) => {
                    let element = Element::from_start(&start, namespace_of(&ns)?)?;
                    stack.push(element);
                }
                (ns, Event::Empty(start)) => {
                    let element = Element::from_start(&start, namespace_of(&ns)?)?;
                    attach(&mut stack, &mut root, element)?;
                }
                (_, Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| Error::XmlError("unexpected closing tag".to_string()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                (_, Event::Text(text)) => {
                    // Indentation between tags is dropped, field values are kept as written
                    let text = text.unescape()?;
                    if text.trim().is_empty() {
                        continue;
                    }
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                (_, Event::CData(cdata)) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&utf8(&cdata.into_inner())?);
                    }
                }
                (_, Event::Eof) => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(Error::XmlError(format!(
                "unexpected end of document inside <{}>",
                stack.last().map(|e| e.name.as_str()).unwrap_or_default()
            )));
        }

        root.map(|root| XmlDocument { root })
            .ok_or_else(|| Error::XmlError("document has no root element".to_string()))
    }

    /// The document element.
    pub fn root(&self) -> &Element {
        &self.root
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(Error::XmlError(format!(
                "second root element <{}>",
                element.name
            )))
        }
    }
    Ok(())
}

fn namespace_of(ns: &ResolveResult<'_>) -> Result<String> {
    match ns {
        ResolveResult::Bound(namespace) => utf8(namespace.as_ref()),
        ResolveResult::Unbound => Ok(String::new()),
        ResolveResult::Unknown(prefix) => Err(Error::XmlError(format!(
            "unknown namespace prefix '{}'",
            String::from_utf8_lossy(prefix)
        ))),
    }
}

fn utf8(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| Error::XmlError(e.to_string()))
}

/// Namespace-qualified lookups over an [`Element`] tree.
///
/// Every lookup tolerates absent nodes: element lookups return `None`,
/// text and attribute lookups return an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extractor {
    namespace: String,
}

impl Extractor {
    /// Lookups qualified by the given namespace URI (empty for none).
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// Lookups qualified by the namespace of the document element.
    pub fn for_document(document: &XmlDocument) -> Self {
        Self::new(document.root().namespace())
    }

    /// Namespace URI used to qualify tags.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn matches(&self, element: &Element, tag: &str) -> bool {
        element.name == tag && element.namespace == self.namespace
    }

    /// First child with the given tag.
    pub fn child<'a>(&self, element: &'a Element, tag: &str) -> Option<&'a Element> {
        element.children.iter().find(|child| self.matches(child, tag))
    }

    /// All children with the given tag, in document order.
    pub fn children<'a>(&self, element: &'a Element, tag: &str) -> Vec<&'a Element> {
        element
            .children
            .iter()
            .filter(|child| self.matches(child, tag))
            .collect()
    }

    /// Whether a child with the given tag exists.
    pub fn has(&self, element: &Element, tag: &str) -> bool {
        self.child(element, tag).is_some()
    }

    /// Text of the first child with the given tag.
    pub fn text(&self, element: &Element, tag: &str) -> String {
        self.child(element, tag)
            .map(|child| child.text().to_string())
            .unwrap_or_default()
    }

    /// Attribute of the first child with the given tag.
    pub fn attr(&self, element: &Element, tag: &str, attr: &str) -> String {
        self.child(element, tag)
            .and_then(|child| child.attribute(attr))
            .map(str::to_string)
            .unwrap_or_default()
    }

    /// Descend one tag per level; `None` as soon as a level is missing.
    /// An empty path yields the element itself.
    pub fn path<'a>(&self, element: &'a Element, tags: &[&str]) -> Option<&'a Element> {
        tags.iter()
            .try_fold(element, |current, tag| self.child(current, tag))
    }

    /// Text at the end of a tag path, empty when any level is missing.
    pub fn path_text(&self, element: &Element, tags: &[&str]) -> String {
        self.path(element, tags)
            .map(|found| found.text().to_string())
            .unwrap_or_default()
    }
}
