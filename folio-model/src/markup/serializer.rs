//! Markup serialization (tree nodes → fragment string).
//!
//! A hand-written canonical writer rather than a DOM round-trip: output is
//! byte-stable, mark tags nest in canonical order, and adjacent text runs
//! with identical marks are merged before writing. Together with the
//! parser's normalization this makes `serialize(parse(f)) == f` hold for
//! every fragment the writer itself produces.

use crate::error::ModelError;
use crate::node::{Mark, Node, NodeKind, TableRole};

/// Serialize one block node (`paragraph`, list, `table`) to a fragment,
/// including the wrapping tag.
pub fn serialize_node(node: &Node) -> Result<String, ModelError> {
    match &node.kind {
        NodeKind::Paragraph { .. } => Ok(format!("<p>{}</p>", serialize_inline(&node.children)?)),
        NodeKind::OrderedList { .. } => serialize_list(node, "ol"),
        NodeKind::BulletList { .. } => serialize_list(node, "ul"),
        NodeKind::Table { .. } => serialize_table(node, false, false),
        other => Err(ModelError::UnhandledNode(other.name())),
    }
}

/// Serialize inline content only, without any wrapping tag. Used for
/// section titles and captions.
pub fn serialize_inline(content: &[Node]) -> Result<String, ModelError> {
    let mut out = String::new();
    let mut pending: Option<(String, Vec<Mark>)> = None;

    for node in content {
        match &node.kind {
            NodeKind::Text { text, marks } => {
                if text.is_empty() {
                    continue;
                }
                match &mut pending {
                    Some((buf, pending_marks)) if pending_marks == marks => buf.push_str(text),
                    _ => {
                        flush_text(&mut out, pending.take());
                        pending = Some((text.clone(), marks.clone()));
                    }
                }
            }
            _ => {
                flush_text(&mut out, pending.take());
                serialize_atom(&mut out, node)?;
            }
        }
    }
    flush_text(&mut out, pending);
    Ok(out)
}

/// Serialize a table node, marking the header/footer row groups hidden when
/// the owning table element suppresses them.
pub fn serialize_table(
    table: &Node,
    suppress_header: bool,
    suppress_footer: bool,
) -> Result<String, ModelError> {
    if !matches!(table.kind, NodeKind::Table { .. }) {
        return Err(ModelError::UnhandledNode(table.kind.name()));
    }
    let mut out = String::from("<table>");
    for section in &table.children {
        let NodeKind::TableSection { role } = section.kind else {
            return Err(ModelError::UnhandledNode(section.kind.name()));
        };
        let (tag, hidden) = match role {
            TableRole::Header => ("thead", suppress_header),
            TableRole::Body => ("tbody", false),
            TableRole::Footer => ("tfoot", suppress_footer),
        };
        if hidden {
            out.push_str(&format!("<{tag} data-hidden=\"true\">"));
        } else {
            out.push_str(&format!("<{tag}>"));
        }
        for row in &section.children {
            if !matches!(row.kind, NodeKind::TableRow) {
                return Err(ModelError::UnhandledNode(row.kind.name()));
            }
            out.push_str("<tr>");
            // Header rows get th, everything else td; the tag follows the
            // row group so encode normalizes mis-tagged input.
            let cell_tag = if role == TableRole::Header { "th" } else { "td" };
            for cell in &row.children {
                if !matches!(cell.kind, NodeKind::TableCell { .. }) {
                    return Err(ModelError::UnhandledNode(cell.kind.name()));
                }
                out.push_str(&format!(
                    "<{cell_tag}>{}</{cell_tag}>",
                    serialize_inline(&cell.children)?
                ));
            }
            out.push_str("</tr>");
        }
        out.push_str(&format!("</{tag}>"));
    }
    out.push_str("</table>");
    Ok(out)
}

fn serialize_list(list: &Node, tag: &str) -> Result<String, ModelError> {
    let mut out = format!("<{tag}>");
    for item in &list.children {
        if !matches!(item.kind, NodeKind::ListItem) {
            return Err(ModelError::UnhandledNode(item.kind.name()));
        }
        out.push_str("<li>");
        // List items hold inline runs interleaved with nested lists.
        let mut run: Vec<Node> = Vec::new();
        for child in &item.children {
            match &child.kind {
                NodeKind::OrderedList { .. } | NodeKind::BulletList { .. } => {
                    out.push_str(&serialize_inline(&run)?);
                    run.clear();
                    out.push_str(&serialize_node(child)?);
                }
                _ => run.push(child.clone()),
            }
        }
        out.push_str(&serialize_inline(&run)?);
        out.push_str("</li>");
    }
    out.push_str(&format!("</{tag}>"));
    Ok(out)
}

fn serialize_atom(out: &mut String, node: &Node) -> Result<(), ModelError> {
    match &node.kind {
        NodeKind::HardBreak => {
            out.push_str("<br>");
            Ok(())
        }
        NodeKind::Citation { id, rids, text } => {
            out.push_str("<span class=\"citation\" data-id=\"");
            out.push_str(&escape_attr(id));
            out.push('"');
            if !rids.is_empty() {
                out.push_str(" data-rids=\"");
                out.push_str(&escape_attr(&rids.join(" ")));
                out.push('"');
            }
            out.push('>');
            out.push_str(&escape_text(text));
            out.push_str("</span>");
            Ok(())
        }
        NodeKind::CrossReference { id, rid, text } => {
            out.push_str(&format!(
                "<span class=\"cross-reference\" data-id=\"{}\" data-ref=\"{}\">{}</span>",
                escape_attr(id),
                escape_attr(rid),
                escape_text(text)
            ));
            Ok(())
        }
        NodeKind::Footnote { id, .. } => {
            out.push_str(&format!(
                "<span class=\"footnote\" data-id=\"{}\"></span>",
                escape_attr(id)
            ));
            Ok(())
        }
        other => Err(ModelError::UnhandledNode(other.name())),
    }
}

fn flush_text(out: &mut String, pending: Option<(String, Vec<Mark>)>) {
    let Some((text, marks)) = pending else {
        return;
    };
    for mark in &marks {
        out.push_str(open_tag(mark).as_str());
    }
    out.push_str(&escape_text(&text));
    for mark in marks.iter().rev() {
        out.push_str(close_tag(mark));
    }
}

fn open_tag(mark: &Mark) -> String {
    match mark {
        Mark::Bold => "<strong>".to_string(),
        Mark::Italic => "<em>".to_string(),
        Mark::Underline => "<u>".to_string(),
        Mark::Strikethrough => "<s>".to_string(),
        Mark::SmallCaps => "<span class=\"smallcaps\">".to_string(),
        Mark::Subscript => "<sub>".to_string(),
        Mark::Superscript => "<sup>".to_string(),
        Mark::Link { href } => format!("<a href=\"{}\">", escape_attr(href)),
    }
}

fn close_tag(mark: &Mark) -> &'static str {
    match mark {
        Mark::Bold => "</strong>",
        Mark::Italic => "</em>",
        Mark::Underline => "</u>",
        Mark::Strikethrough => "</s>",
        Mark::SmallCaps => "</span>",
        Mark::Subscript => "</sub>",
        Mark::Superscript => "</sup>",
        Mark::Link { .. } => "</a>",
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}
