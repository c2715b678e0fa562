//! Markup parsing (fragment string → tree nodes).
//!
//! Pipeline: fragment → html5ever DOM → [`Node`]s. The fragment is fed
//! through a full document parse and its content read back out of the
//! synthesized `<body>`, which keeps us on the stable TendrilSink API.
//! Inline marks are accumulated on the way down the DOM and canonicalized,
//! and adjacent text runs with identical marks are merged, so parser output
//! is always in canonical form.

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::error::ModelError;
use crate::node::{canonical_marks, Mark, Node, NodeKind, TableRole};

/// Parse a block-level fragment (`<p>`, `<ol>`/`<ul>`, `<table>`) into
/// nodes, one per top-level block.
pub fn parse_fragment(markup: &str) -> Result<Vec<Node>, ModelError> {
    // The DOM must outlive the conversion: dropping the RcDom detaches
    // every node's children, leaving any retained handle empty.
    let (_dom, body) = parse_body(markup)?;
    let mut out = Vec::new();
    for child in body.children.borrow().iter() {
        match &child.data {
            NodeData::Element { .. } => out.push(convert_block(child)?),
            NodeData::Text { contents } => {
                if !contents.borrow().trim().is_empty() {
                    return Err(ModelError::Markup(
                        "unexpected text at block level".to_string(),
                    ));
                }
            }
            _ => {}
        }
    }
    Ok(out)
}

/// Parse an inline-only fragment (titles, captions) into inline nodes.
pub fn parse_inline(markup: &str) -> Result<Vec<Node>, ModelError> {
    if markup.is_empty() {
        return Ok(Vec::new());
    }
    let (_dom, body) = parse_body(markup)?;
    let mut out = Vec::new();
    for child in body.children.borrow().iter() {
        collect_inline(child, &[], &mut out);
    }
    Ok(out)
}

fn parse_body(markup: &str) -> Result<(RcDom, Handle), ModelError> {
    let dom: RcDom = parse_document(RcDom::default(), ParseOpts::default()).one(markup);
    let html = child_element(&dom.document, "html")
        .ok_or_else(|| ModelError::Markup("no html element in parsed fragment".to_string()))?;
    let body = child_element(&html, "body")
        .ok_or_else(|| ModelError::Markup("no body element in parsed fragment".to_string()))?;
    Ok((dom, body))
}

fn child_element(node: &Handle, tag: &str) -> Option<Handle> {
    node.children
        .borrow()
        .iter()
        .find(|child| element_tag(child).as_deref() == Some(tag))
        .cloned()
}

fn element_tag(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

fn attr(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == name)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

fn class(node: &Handle) -> Option<String> {
    attr(node, "class")
}

fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

fn collect_text(node: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &node.data {
        out.push_str(&contents.borrow());
    }
    for child in node.children.borrow().iter() {
        collect_text(child, out);
    }
}

fn convert_block(node: &Handle) -> Result<Node, ModelError> {
    let tag = element_tag(node)
        .ok_or_else(|| ModelError::Markup("expected an element at block level".to_string()))?;
    match tag.as_str() {
        "p" => {
            let mut content = Vec::new();
            for child in node.children.borrow().iter() {
                collect_inline(child, &[], &mut content);
            }
            Ok(Node::new(
                NodeKind::Paragraph {
                    id: String::new(),
                    style: None,
                    placeholder: None,
                },
                content,
            ))
        }
        "ol" => convert_list(node, true),
        "ul" => convert_list(node, false),
        "table" => convert_table(node),
        other => Err(ModelError::Markup(format!(
            "unsupported block tag '{other}'"
        ))),
    }
}

fn convert_list(node: &Handle, ordered: bool) -> Result<Node, ModelError> {
    let kind = if ordered {
        NodeKind::OrderedList { id: String::new() }
    } else {
        NodeKind::BulletList { id: String::new() }
    };
    let mut items = Vec::new();
    for child in node.children.borrow().iter() {
        match element_tag(child).as_deref() {
            Some("li") => items.push(convert_list_item(child)?),
            Some(other) => {
                return Err(ModelError::Markup(format!(
                    "unexpected '{other}' inside a list"
                )))
            }
            None => {}
        }
    }
    Ok(Node::new(kind, items))
}

fn convert_list_item(node: &Handle) -> Result<Node, ModelError> {
    let mut content = Vec::new();
    for child in node.children.borrow().iter() {
        match element_tag(child).as_deref() {
            Some("ol") => content.push(convert_list(child, true)?),
            Some("ul") => content.push(convert_list(child, false)?),
            _ => collect_inline(child, &[], &mut content),
        }
    }
    Ok(Node::new(NodeKind::ListItem, content))
}

fn convert_table(node: &Handle) -> Result<Node, ModelError> {
    let mut sections = Vec::new();
    for child in node.children.borrow().iter() {
        let role = match element_tag(child).as_deref() {
            Some("thead") => TableRole::Header,
            Some("tbody") => TableRole::Body,
            Some("tfoot") => TableRole::Footer,
            Some(other) => {
                return Err(ModelError::Markup(format!(
                    "unexpected '{other}' inside a table"
                )))
            }
            None => continue,
        };
        sections.push(convert_table_section(child, role)?);
    }
    Ok(Node::new(NodeKind::Table { id: String::new() }, sections))
}

fn convert_table_section(node: &Handle, role: TableRole) -> Result<Node, ModelError> {
    let mut rows = Vec::new();
    for child in node.children.borrow().iter() {
        match element_tag(child).as_deref() {
            Some("tr") => rows.push(convert_table_row(child, role)?),
            Some(other) => {
                return Err(ModelError::Markup(format!(
                    "unexpected '{other}' inside a row group"
                )))
            }
            None => {}
        }
    }
    Ok(Node::new(NodeKind::TableSection { role }, rows))
}

fn convert_table_row(node: &Handle, role: TableRole) -> Result<Node, ModelError> {
    let mut cells = Vec::new();
    for child in node.children.borrow().iter() {
        match element_tag(child).as_deref() {
            Some("td") | Some("th") => {
                let mut content = Vec::new();
                for grandchild in child.children.borrow().iter() {
                    collect_inline(grandchild, &[], &mut content);
                }
                // The header flag follows the row group, not the cell tag,
                // so re-decoding normalizes stray tagging.
                cells.push(Node::new(
                    NodeKind::TableCell {
                        header: role == TableRole::Header,
                    },
                    content,
                ));
            }
            Some(other) => {
                return Err(ModelError::Markup(format!(
                    "unexpected '{other}' inside a table row"
                )))
            }
            None => {}
        }
    }
    Ok(Node::new(NodeKind::TableRow, cells))
}

fn collect_inline(node: &Handle, marks: &[Mark], out: &mut Vec<Node>) {
    match &node.data {
        NodeData::Text { contents } => {
            push_text(out, &contents.borrow(), marks);
        }
        NodeData::Element { .. } => {
            let tag = element_tag(node).unwrap_or_default();
            let added = match tag.as_str() {
                "strong" | "b" => Some(Mark::Bold),
                "em" | "i" => Some(Mark::Italic),
                "u" => Some(Mark::Underline),
                "s" | "del" => Some(Mark::Strikethrough),
                "sub" => Some(Mark::Subscript),
                "sup" => Some(Mark::Superscript),
                "a" => Some(Mark::Link {
                    href: attr(node, "href").unwrap_or_default(),
                }),
                "br" => {
                    out.push(Node::leaf(NodeKind::HardBreak));
                    return;
                }
                "span" => match class(node).as_deref() {
                    Some("smallcaps") => Some(Mark::SmallCaps),
                    Some("citation") => {
                        out.push(Node::leaf(NodeKind::Citation {
                            id: attr(node, "data-id").unwrap_or_default(),
                            rids: attr(node, "data-rids")
                                .unwrap_or_default()
                                .split_whitespace()
                                .map(str::to_string)
                                .collect(),
                            text: text_content(node),
                        }));
                        return;
                    }
                    Some("cross-reference") => {
                        out.push(Node::leaf(NodeKind::CrossReference {
                            id: attr(node, "data-id").unwrap_or_default(),
                            rid: attr(node, "data-ref").unwrap_or_default(),
                            text: text_content(node),
                        }));
                        return;
                    }
                    Some("footnote") => {
                        out.push(Node::leaf(NodeKind::Footnote {
                            id: attr(node, "data-id").unwrap_or_default(),
                            contents: String::new(),
                        }));
                        return;
                    }
                    // Unknown spans are transparent.
                    _ => None,
                },
                // Unknown inline tags are transparent: keep their text.
                _ => None,
            };

            let mut inner = marks.to_vec();
            if let Some(mark) = added {
                inner.push(mark);
                canonical_marks(&mut inner);
            }
            for child in node.children.borrow().iter() {
                collect_inline(child, &inner, out);
            }
        }
        _ => {}
    }
}

fn push_text(out: &mut Vec<Node>, text: &str, marks: &[Mark]) {
    if text.is_empty() {
        return;
    }
    if let Some(Node {
        kind: NodeKind::Text {
            text: prev,
            marks: prev_marks,
        },
        ..
    }) = out.last_mut()
    {
        if prev_marks.as_slice() == marks {
            prev.push_str(text);
            return;
        }
    }
    out.push(Node::leaf(NodeKind::Text {
        text: text.to_string(),
        marks: marks.to_vec(),
    }));
}
