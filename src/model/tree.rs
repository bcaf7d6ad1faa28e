//! Read-only tree representation of the exporter's XML output

use indexmap::IndexMap;

/// One element of the tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Element name
    pub name: String,
    /// Attributes in document order
    pub attributes: IndexMap<String, String>,
    /// Trimmed text content, if the element had any
    pub text: Option<String>,
    /// Child elements in document order
    pub children: Vec<Node>,
}

impl Node {
    /// Create an element with no attributes, text or children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add an attribute (builder style)
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the text content (builder style)
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append a child element (builder style)
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Shorthand for a `<name>text</name>` leaf
    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name).with_text(text)
    }

    /// Get an attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Text content, or the empty string
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Whether the element has no child elements
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// A plain value: no child elements and no attributes
    pub fn is_scalar(&self) -> bool {
        self.is_leaf() && self.attributes.is_empty()
    }

    /// Direct children with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// All descendants with the given name, in document order, each paired
    /// with its node path
    pub fn descendants_named<'a>(&'a self, name: &str, base: &str) -> Vec<(String, &'a Node)> {
        let mut found = Vec::new();
        collect_named(self, name, base, &mut found);
        found
    }
}

fn collect_named<'a>(node: &'a Node, name: &str, path: &str, found: &mut Vec<(String, &'a Node)>) {
    for (i, child) in node.children.iter().enumerate() {
        let child_path = format!("{}/{}[{}]", path, child.name, i + 1);
        if child.name == name {
            found.push((child_path.clone(), child));
        }
        collect_named(child, name, &child_path, found);
    }
}

/// A parsed tree document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub root: Node,
}

impl Document {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    /// Node path of the root element, e.g. `/Database`
    pub fn root_path(&self) -> String {
        format!("/{}", self.root.name)
    }

    /// Whether the root has no child elements at all
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }
}
