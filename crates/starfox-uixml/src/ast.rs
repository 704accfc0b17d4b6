//! Node tree produced by [`parse_str`](crate::parse_str).

// ── Document ──────────────────────────────────────────────────────────────

/// A parsed UIXML document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    /// First element named `tag` in document order, the root included.
    ///
    /// Tag comparison is exact; UIXML tag names are case-sensitive at this
    /// level and any case folding is the caller's business.
    pub fn find_first(&self, tag: &str) -> Option<&Element> {
        self.root.find_first(tag)
    }
}

// ── Attribute ─────────────────────────────────────────────────────────────

/// One `name="value"` pair, with entities already unescaped.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

// ── Element ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
    /// 1-based line of the opening tag.
    pub line: usize,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), attributes: Vec::new(), children: Vec::new(), line: 1 }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute { name: name.into(), value: value.into() });
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Value of the attribute called `name`, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    /// Direct element children, text skipped.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Depth-first search for the first element named `tag`, `self` included.
    pub fn find_first(&self, tag: &str) -> Option<&Element> {
        if self.tag == tag {
            return Some(self);
        }
        self.elements().find_map(|e| e.find_first(tag))
    }
}

// ── Node ──────────────────────────────────────────────────────────────────

/// A child of an [`Element`].
///
/// Whitespace-only text between tags is dropped by the parser, so a `Text`
/// node always carries visible content.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    /// Tag name for element nodes; `None` for text.
    pub fn tag_name(&self) -> Option<&str> {
        self.as_element().map(|e| e.tag.as_str())
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Text(s.to_string())
    }
}
