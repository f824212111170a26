// DOM helpers over `scraper`.
// Materializes element children into extractor nodes.

use scraper::{ElementRef, Node as DomNode, Selector};

use crate::error::{CatalogError, Result};
use crate::extract::{Node, TableNode};

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| CatalogError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// Concatenated text of an element and its descendants.
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Direct element children with the given tag name.
pub fn child_elements<'a>(
    element: ElementRef<'a>,
    tag: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == tag)
}

/// First descendant element with the given tag name.
pub fn first_descendant<'a>(element: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == tag)
}

/// Children of `element` as extractor nodes, in document order.
///
/// Comments and processing instructions are dropped.
pub fn child_nodes(element: ElementRef<'_>) -> Vec<Node> {
    element
        .children()
        .filter_map(|child| match child.value() {
            DomNode::Text(text) => Some(Node::Text(text.to_string())),
            DomNode::Element(_) => ElementRef::wrap(child).map(element_node),
            _ => None,
        })
        .collect()
}

fn element_node(element: ElementRef<'_>) -> Node {
    match element.value().name() {
        "span" => Node::Label(text_of(element)),
        "br" => Node::LineBreak,
        "a" => Node::Link {
            text: text_of(element),
            href: element.value().attr("href").map(str::to_string),
        },
        "table" => Node::Table(read_table(element)),
        _ => Node::Other(text_of(element)),
    }
}

/// Read a table's caption and body rows as trimmed cell text.
pub fn read_table(table: ElementRef<'_>) -> TableNode {
    let caption = child_elements(table, "caption")
        .next()
        .map(|caption| text_of(caption).trim().to_string());

    let rows = child_elements(table, "tbody")
        .flat_map(|tbody| child_elements(tbody, "tr"))
        .map(|row| {
            row.children()
                .filter_map(ElementRef::wrap)
                .filter(|cell| matches!(cell.value().name(), "td" | "th"))
                .map(|cell| text_of(cell).trim().to_string())
                .collect()
        })
        .collect();

    TableNode { caption, rows }
}
