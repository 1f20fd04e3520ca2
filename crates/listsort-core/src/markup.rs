//! Markup reading and writing for [`Document`] trees.
//!
//! Fragments are read as well-formed XHTML-style markup with `quick-xml`.
//! Whitespace-only text between elements is discarded; all other text is
//! kept as text nodes. Comments, processing instructions and doctypes are
//! skipped.

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::document::{Document, NodeId};
use crate::error::{DomError, DomResult};
use crate::logging::targets;

/// Tag of the element wrapping a fragment with several top-level nodes.
pub const FRAGMENT_ROOT_TAG: &str = "body";

impl Document {
    /// Parse a markup fragment into new nodes and return the fragment root.
    ///
    /// A fragment with exactly one top-level element yields that element. A
    /// fragment with several top-level nodes is wrapped in a `<body>`
    /// element, which is returned instead.
    ///
    /// On error every node created for the fragment is destroyed again.
    pub fn parse_fragment(&mut self, markup: &str) -> DomResult<NodeId> {
        let mut created = Vec::new();
        self.read_fragment(markup, &mut created).inspect_err(|err| {
            tracing::debug!(target: targets::DOCUMENT, %err, discarded = created.len(), "fragment rejected");
            for &node in &created {
                if self.contains(node) {
                    let _ = self.destroy(node);
                }
            }
        })
    }

    /// `created` collects every new node in creation order, so parents come
    /// before their children.
    fn read_fragment(&mut self, markup: &str, created: &mut Vec<NodeId>) -> DomResult<NodeId> {
        let mut reader = Reader::from_str(markup);
        let mut stack: Vec<NodeId> = Vec::new();
        let mut top_level: Vec<NodeId> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    let element = self.element_from_start(&start, created)?;
                    self.attach(&stack, &mut top_level, element)?;
                    stack.push(element);
                }
                Event::Empty(start) => {
                    let element = self.element_from_start(&start, created)?;
                    self.attach(&stack, &mut top_level, element)?;
                }
                Event::End(end) => {
                    let open = stack
                        .pop()
                        .ok_or_else(|| DomError::Markup("unexpected closing tag".into()))?;
                    let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                    if self.tag_name(open)? != name {
                        return Err(DomError::Markup(format!(
                            "closing tag </{name}> does not match <{}>",
                            self.tag_name(open)?
                        )));
                    }
                }
                Event::Text(text) => {
                    let value = text.unescape().map_err(quick_xml::Error::from)?.into_owned();
                    if !value.trim().is_empty() {
                        let node = self.create_text(value);
                        created.push(node);
                        self.attach(&stack, &mut top_level, node)?;
                    }
                }
                Event::CData(data) => {
                    let value = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    let node = self.create_text(value);
                    created.push(node);
                    self.attach(&stack, &mut top_level, node)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(&open) = stack.last() {
            return Err(DomError::Markup(format!(
                "unclosed element <{}>",
                self.tag_name(open)?
            )));
        }

        let root = match top_level.as_slice() {
            [] => return Err(DomError::Markup("fragment contains no elements".into())),
            [single] if self.is_element(*single) => *single,
            _ => {
                let body = self.create_element(FRAGMENT_ROOT_TAG);
                created.push(body);
                for node in top_level {
                    self.append_child(body, node)?;
                }
                body
            }
        };
        tracing::debug!(target: targets::DOCUMENT, node_count = self.node_count(), "fragment parsed");
        Ok(root)
    }

    fn element_from_start(
        &mut self,
        start: &BytesStart<'_>,
        created: &mut Vec<NodeId>,
    ) -> DomResult<NodeId> {
        let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let element = self.create_element(tag);
        created.push(element);
        for attribute in start.attributes() {
            let attribute = attribute.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(quick_xml::Error::from)?
                .into_owned();
            self.set_attribute(element, key, value)?;
        }
        Ok(element)
    }

    fn attach(
        &mut self,
        stack: &[NodeId],
        top_level: &mut Vec<NodeId>,
        node: NodeId,
    ) -> DomResult<()> {
        match stack.last() {
            Some(&parent) => self.append_child(parent, node),
            None => {
                top_level.push(node);
                Ok(())
            }
        }
    }

    /// Serialize a node and its subtree.
    ///
    /// Every element is written with an explicit closing tag so the output
    /// can be read back by [`parse_fragment`](Self::parse_fragment).
    pub fn outer_html(&self, id: NodeId) -> DomResult<String> {
        let mut out = String::new();
        self.write_node(id, &mut out)?;
        Ok(out)
    }

    /// Serialize the children of a node.
    pub fn inner_html(&self, id: NodeId) -> DomResult<String> {
        let mut out = String::new();
        for &child in self.children(id)? {
            self.write_node(child, &mut out)?;
        }
        Ok(out)
    }

    fn write_node(&self, id: NodeId, out: &mut String) -> DomResult<()> {
        if let Some(text) = self.text(id)? {
            out.push_str(&escape(text));
            return Ok(());
        }

        let tag = self.tag_name(id)?;
        out.push('<');
        out.push_str(tag);
        for (key, value) in self.attributes(id)? {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }
        out.push('>');
        for &child in self.children(id)? {
            self.write_node(child, out)?;
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
        Ok(())
    }
}
