//! Owned XML node arena for SVG documents.
//!
//! Every node of the source is kept (elements, text, CDATA, comments,
//! processing instructions, declaration, doctype) so a converted document
//! serializes back with everything the converter did not touch intact.
//! Attribute order is preserved.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use regex::Regex;
use std::collections::HashMap;

lazy_static! {
    /// Internal-subset entity declaration: `<!ENTITY name "value">`
    static ref RE_ENTITY_DECL: Regex =
        Regex::new(r#"<!ENTITY\s+([A-Za-z_:][\w.:-]*)\s+(?:"([^"]*)"|'([^']*)')\s*>"#).unwrap();
}

/// Index of a node in its [`SvgDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in document (parse) order for parsed nodes.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// An element: qualified name and ordered attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    /// Qualified name as written (`text`, `svg:g`)
    pub name: String,
    /// Attributes in source order, values unescaped
    pub attributes: IndexMap<String, String>,
}

impl Element {
    /// Create an element without attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Name without namespace prefix.
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Attribute value, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Content of one node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Element with children
    Element(Element),
    /// Character data, unescaped
    Text(String),
    /// CDATA section content
    CData(String),
    /// Comment body
    Comment(String),
    /// Processing instruction body
    ProcessingInstruction(String),
    /// XML declaration body (`xml version="1.0"`)
    Declaration(String),
    /// Doctype body
    DocType(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A parsed SVG document.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    nodes: Vec<Node>,
    top_level: Vec<NodeId>,
    root: NodeId,
}

/// Strip a namespace prefix from a qualified name.
pub fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

/// Collect the attributes of a start tag, unescaping values.
///
/// Values with undecodable entities are kept as written. Malformed
/// attributes are skipped.
pub fn collect_attributes(start: &BytesStart<'_>) -> IndexMap<String, String> {
    collect_attributes_with(start, &HashMap::new())
}

/// Like [`collect_attributes`], also resolving the general entities a
/// document declared in its DOCTYPE.
pub fn collect_attributes_with(
    start: &BytesStart<'_>,
    entities: &HashMap<String, String>,
) -> IndexMap<String, String> {
    let mut attributes = IndexMap::new();
    for attr in start.attributes().with_checks(false) {
        let attr = match attr {
            Ok(a) => a,
            Err(e) => {
                log::debug!("Skipping malformed attribute: {}", e);
                continue;
            },
        };
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = match attr.unescape_value_with(|name| entities.get(name).map(String::as_str)) {
            Ok(v) => v.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        attributes.insert(key, value);
    }
    attributes
}

/// Entity declarations of a DOCTYPE internal subset.
///
/// Only literal values are supported; external (`SYSTEM`/`PUBLIC`) and
/// parameter entities are ignored.
pub fn doctype_entities(doctype: &str) -> HashMap<String, String> {
    RE_ENTITY_DECL
        .captures_iter(doctype)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_string();
            let value = caps.get(2).or_else(|| caps.get(3))?.as_str().to_string();
            Some((name, value))
        })
        .collect()
}

impl SvgDocument {
    /// Parse an SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Xml`] for malformed XML, mismatched tags, or a
    /// document without a root element.
    pub fn parse(source: &str) -> Result<Self> {
        let mut reader = Reader::from_str(source);
        reader.trim_text(false);
        reader.check_end_names(true);

        let mut doc = SvgDocument {
            nodes: Vec::new(),
            top_level: Vec::new(),
            root: NodeId(0),
        };
        let mut stack: Vec<NodeId> = Vec::new();
        let mut root: Option<NodeId> = None;
        let mut entities: HashMap<String, String> = HashMap::new();

        loop {
            let event = reader.read_event().map_err(|e| {
                Error::Xml(format!("at byte {}: {}", reader.buffer_position(), e))
            })?;
            let parent = stack.last().copied();
            match event {
                Event::Start(e) => {
                    let element = Element {
                        name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                        attributes: collect_attributes_with(&e, &entities),
                    };
                    let id = doc.push(NodeKind::Element(element), parent);
                    if parent.is_none() && root.is_none() {
                        root = Some(id);
                    }
                    stack.push(id);
                },
                Event::Empty(e) => {
                    let element = Element {
                        name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                        attributes: collect_attributes_with(&e, &entities),
                    };
                    let id = doc.push(NodeKind::Element(element), parent);
                    if parent.is_none() && root.is_none() {
                        root = Some(id);
                    }
                },
                Event::End(_) => {
                    stack.pop();
                },
                Event::Text(e) => {
                    let text = match e.unescape_with(|name| entities.get(name).map(String::as_str)) {
                        Ok(t) => t.into_owned(),
                        Err(_) => String::from_utf8_lossy(&e).into_owned(),
                    };
                    // Whitespace between top-level nodes is dropped.
                    if parent.is_some() || !text.trim().is_empty() {
                        doc.push(NodeKind::Text(text), parent);
                    }
                },
                Event::CData(e) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    doc.push(NodeKind::CData(text), parent);
                },
                Event::Comment(e) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    doc.push(NodeKind::Comment(text), parent);
                },
                Event::PI(e) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    doc.push(NodeKind::ProcessingInstruction(text), parent);
                },
                Event::Decl(e) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    doc.push(NodeKind::Declaration(text), parent);
                },
                Event::DocType(e) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    entities = doctype_entities(&text);
                    if !entities.is_empty() {
                        log::debug!("DOCTYPE declares {} entities", entities.len());
                    }
                    doc.push(NodeKind::DocType(text), parent);
                },
                Event::Eof => break,
            }
        }

        if !stack.is_empty() {
            return Err(Error::Xml("unexpected end of document: unclosed element".to_string()));
        }
        doc.root = root.ok_or_else(|| Error::Xml("document has no root element".to_string()))?;
        log::debug!("Parsed document: {} nodes", doc.nodes.len());
        Ok(doc)
    }

    fn push(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.top_level.push(id),
        }
        id
    }

    /// The document element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes, including detached ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True for a document without nodes (never the case after `parse`).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Content of a node.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Element data, or `None` for non-element nodes.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Mutable element data, or `None` for non-element nodes.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Local element name, or `None` for non-element nodes.
    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::local_name)
    }

    /// Attribute of an element node.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.attribute(name))
    }

    /// Set an attribute on an element node. Ignored for other node kinds.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(e) = self.element_mut(id) {
            e.attributes.insert(name.to_string(), value.into());
        }
    }

    /// Parent node; `None` for top-level nodes.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Children in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Ancestors from the parent up to the top level.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |p| self.parent(*p))
    }

    /// Append a new node as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        self.push(kind, Some(parent))
    }

    /// Append a new element as the last child of `parent`.
    pub fn append_element(&mut self, parent: NodeId, element: Element) -> NodeId {
        self.append_child(parent, NodeKind::Element(element))
    }

    /// Insert a new node as the first child of `parent`.
    pub fn prepend_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.insert(0, id);
        id
    }

    /// `id` and all its descendants in pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Elements with local name `name` under the root, in document order.
    pub fn elements_named(&self, name: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|id| self.local_name(*id) == Some(name))
            .collect()
    }

    /// Element whose `id` attribute equals `value`.
    pub fn find_by_id(&self, value: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|id| self.attribute(*id, "id") == Some(value))
    }

    /// Concatenated text and CDATA of a node and its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            match self.kind(node) {
                NodeKind::Text(t) | NodeKind::CData(t) => out.push_str(t),
                _ => {},
            }
        }
        out
    }

    /// Text and CDATA of direct children only.
    pub fn own_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            match self.kind(*child) {
                NodeKind::Text(t) | NodeKind::CData(t) => out.push_str(t),
                _ => {},
            }
        }
        out
    }

    /// Serialize the document back to XML.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        for id in &self.top_level {
            self.write_node(&mut writer, *id)?;
            if !matches!(self.kind(*id), NodeKind::Text(_)) {
                writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;
            }
        }
        let bytes = writer.into_inner();
        Ok(String::from_utf8(bytes).map_err(|e| e.utf8_error())?)
    }

    fn write_node(&self, writer: &mut Writer<Vec<u8>>, id: NodeId) -> Result<()> {
        match self.kind(id) {
            NodeKind::Element(element) => {
                let mut start = BytesStart::new(element.name.as_str());
                for (key, value) in &element.attributes {
                    start.push_attribute((key.as_str(), value.as_str()));
                }
                let children = self.children(id);
                if children.is_empty() {
                    writer.write_event(Event::Empty(start))?;
                } else {
                    writer.write_event(Event::Start(start))?;
                    for child in children {
                        self.write_node(writer, *child)?;
                    }
                    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
                }
            },
            NodeKind::Text(text) => {
                writer.write_event(Event::Text(BytesText::new(text)))?;
            },
            NodeKind::CData(text) => {
                writer.write_event(Event::CData(BytesCData::new(text.as_str())))?;
            },
            NodeKind::Comment(text) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?;
            },
            NodeKind::ProcessingInstruction(text) => {
                writer.write_event(Event::PI(BytesText::from_escaped(text.as_str())))?;
            },
            NodeKind::Declaration(text) => {
                let start = BytesStart::from_content(text.as_str(), 3);
                writer.write_event(Event::Decl(BytesDecl::from_start(start)))?;
            },
            NodeKind::DocType(text) => {
                writer.write_event(Event::DocType(BytesText::from_escaped(text.as_str())))?;
            },
        }
        Ok(())
    }
}
