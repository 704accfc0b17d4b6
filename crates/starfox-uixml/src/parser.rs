use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::ast::{Attribute, Document, Element, Node};
use crate::error::{line_col, ParseError};

// ── Parser ────────────────────────────────────────────────────────────────

/// Streaming tree builder on top of `quick_xml::Reader`.
///
/// Open elements live on `stack`; a closing tag pops the innermost one and
/// attaches it to its parent (or makes it the document root).
pub struct Parser<'s> {
    src: &'s str,
    reader: Reader<&'s [u8]>,
    stack: Vec<Element>,
    root: Option<Element>,
}

impl<'s> Parser<'s> {
    pub fn new(src: &'s str) -> Self {
        let mut reader = Reader::from_str(src);
        reader.config_mut().trim_text(true);
        Self { src, reader, stack: Vec::new(), root: None }
    }

    fn err_here(&self, msg: impl Into<String>) -> ParseError {
        ParseError::at_offset(msg, self.src, self.reader.buffer_position() as usize)
    }

    // ── Document ──────────────────────────────────────────────────────────

    pub fn parse_document(mut self) -> Result<Document, ParseError> {
        loop {
            let before = self.reader.buffer_position() as usize;
            let event = match self.reader.read_event() {
                Ok(ev) => ev,
                Err(e) => {
                    let at = self.reader.error_position() as usize;
                    return Err(ParseError::at_offset(e.to_string(), self.src, at));
                }
            };

            match event {
                Event::Start(start) => {
                    let el = self.open_element(&start, before)?;
                    self.stack.push(el);
                }
                Event::Empty(start) => {
                    let el = self.open_element(&start, before)?;
                    self.attach(el)?;
                }
                Event::End(_) => {
                    // quick-xml already verified the end name matches.
                    let Some(el) = self.stack.pop() else {
                        return Err(self.err_here("unexpected closing tag"));
                    };
                    self.attach(el)?;
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| self.err_here(e.to_string()))?
                        .into_owned();
                    self.push_text(text)?;
                }
                Event::CData(data) => {
                    let text = String::from_utf8_lossy(&data).into_owned();
                    self.push_text(text)?;
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions and doctypes
                // carry nothing the UI tree needs.
                _ => {}
            }
        }

        if let Some(open) = self.stack.last() {
            return Err(self.err_here(format!("unclosed element <{}>", open.tag)));
        }
        match self.root {
            Some(root) => Ok(Document { root }),
            None => Err(ParseError::new("document has no root element", 1, 1)),
        }
    }

    // ── Elements ──────────────────────────────────────────────────────────

    fn open_element(&self, start: &BytesStart<'_>, before: usize) -> Result<Element, ParseError> {
        let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();

        // `before` may sit on whitespace that was trimmed away; the tag itself
        // starts at the next `<`.
        let tag_offset = self.src[before.min(self.src.len())..]
            .find('<')
            .map(|i| before + i)
            .unwrap_or(before);
        let (line, _) = line_col(self.src, tag_offset);

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| ParseError::at_offset(
                format!("malformed attribute on <{tag}>: {e}"),
                self.src,
                tag_offset,
            ))?;
            let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| ParseError::at_offset(e.to_string(), self.src, tag_offset))?
                .into_owned();
            attributes.push(Attribute { name, value });
        }

        Ok(Element { tag, attributes, children: Vec::new(), line })
    }

    fn attach(&mut self, el: Element) -> Result<(), ParseError> {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(Node::Element(el));
            Ok(())
        } else if self.root.is_none() {
            self.root = Some(el);
            Ok(())
        } else {
            Err(self.err_here(format!("second root element <{}>", el.tag)))
        }
    }

    fn push_text(&mut self, text: String) -> Result<(), ParseError> {
        if text.trim().is_empty() {
            return Ok(());
        }
        match self.stack.last_mut() {
            Some(parent) => {
                parent.children.push(Node::Text(text));
                Ok(())
            }
            None => Err(self.err_here("text outside the root element")),
        }
    }
}

// ── Public parse entry point ──────────────────────────────────────────────

/// Parse a UIXML source string into a [`Document`].
pub fn parse_str(src: &str) -> Result<Document, ParseError> {
    Parser::new(src).parse_document()
}
