// Materialized markup nodes.
// A flat, owned view of one container's children, independent of any DOM crate.

/// One child of a detail container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A styled field title such as `Faculty:`.
    Label(String),
    /// A bare text run between elements.
    Text(String),
    /// A `<br>`.
    LineBreak,
    Link {
        text: String,
        href: Option<String>,
    },
    Table(TableNode),
    /// Any other element; carried so positions stay honest, never matched.
    Other(String),
}

impl Node {
    pub fn label(text: impl Into<String>) -> Self {
        Node::Label(text.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Node::Link {
            text: text.into(),
            href: Some(href.into()),
        }
    }

    /// Visible text of the node, untrimmed.
    pub fn content(&self) -> &str {
        match self {
            Node::Label(text) | Node::Text(text) | Node::Other(text) => text,
            Node::Link { text, .. } => text,
            Node::Table(table) => table.caption.as_deref().unwrap_or(""),
            Node::LineBreak => "",
        }
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Node::Label(_))
    }
}

/// A table read into a grid of trimmed cell strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableNode {
    pub caption: Option<String>,
    /// Body rows in document order; row 0 holds the column headers.
    pub rows: Vec<Vec<String>>,
}

impl TableNode {
    pub fn new(caption: impl Into<String>, rows: Vec<Vec<&str>>) -> Self {
        Self {
            caption: Some(caption.into()),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(str::to_string).collect())
                .collect(),
        }
    }
}
