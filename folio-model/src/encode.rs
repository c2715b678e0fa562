//! The inverse transform: document tree → flat object map.
//!
//! The walk is pre-order. Every descendant that carries an id and is not a
//! placeholder is encoded into the output map; structural nodes (titles,
//! captions, rows, cells, list items, text) are folded into their owner's
//! serialized fields instead of being emitted on their own. Placeholders
//! are skipped for emission but their ids still appear in the owning
//! section's `elementIDs`, so an unresolved link survives a save without a
//! fabricated record ever entering the map.
//!
//! Section `priority` values come from one shared cursor advanced across
//! the whole walk, which gives a total order consistent with document order
//! even across mixed section-variant siblings.

use crate::error::ModelError;
use crate::markup::{serialize_inline, serialize_node, serialize_table};
use crate::node::{Node, NodeKind};
use crate::object::{
    Citation, CrossReference, Equation, EquationElement, Figure, FigureElement, Footnote,
    ListElement, Listing, ListingElement, Object, ObjectMap, OpaqueElement, ParagraphElement,
    Section, Table, TableElement,
};
use crate::registry::is_element;

/// Encode a document tree rooted at a manuscript node.
///
/// The result is a set of partial records keyed by id; persisting each
/// entry is the caller's job.
pub fn encode(root: &Node) -> Result<ObjectMap, ModelError> {
    if !matches!(root.kind, NodeKind::Manuscript) {
        return Err(ModelError::UnhandledNode(root.kind.name()));
    }
    let mut out = ObjectMap::new();
    let mut cursor = PriorityCursor::default();
    for child in &root.children {
        walk(child, &Scope::root(), &mut out, &mut cursor)?;
    }
    Ok(out)
}

/// Shared sibling-ordering cursor, advanced once per section in pre-order.
#[derive(Debug, Default)]
struct PriorityCursor {
    next: i64,
}

impl PriorityCursor {
    fn take(&mut self) -> i64 {
        let priority = self.next;
        self.next += 1;
        priority
    }
}

/// Ancestor context threaded through the walk: the section id chain (for
/// `path`) and the nearest id-bearing ancestor (for a citation's
/// `containingObject`).
struct Scope<'a> {
    section_path: Vec<String>,
    container: Option<&'a str>,
    table_element: Option<(bool, bool)>,
}

impl<'a> Scope<'a> {
    fn root() -> Self {
        Scope {
            section_path: Vec::new(),
            container: None,
            table_element: None,
        }
    }

    fn in_section(&self, id: &'a str) -> Self {
        let mut section_path = self.section_path.clone();
        section_path.push(id.to_string());
        Scope {
            section_path,
            container: Some(id),
            table_element: None,
        }
    }

    fn in_container(&self, id: &'a str) -> Self {
        Scope {
            section_path: self.section_path.clone(),
            container: Some(id),
            table_element: None,
        }
    }

    fn in_table_element(&self, id: &'a str, suppress_header: bool, suppress_footer: bool) -> Self {
        Scope {
            section_path: self.section_path.clone(),
            container: Some(id),
            table_element: Some((suppress_header, suppress_footer)),
        }
    }
}

fn walk<'a>(
    node: &'a Node,
    scope: &Scope<'a>,
    out: &mut ObjectMap,
    cursor: &mut PriorityCursor,
) -> Result<(), ModelError> {
    match &node.kind {
        NodeKind::Manuscript => Err(ModelError::UnhandledNode("manuscript")),

        NodeKind::Section { id, category } => {
            encode_section(node, id, category.clone(), scope, out, cursor)
        }
        NodeKind::BibliographySection { id } => encode_section(
            node,
            id,
            Some(crate::category::CATEGORY_BIBLIOGRAPHY.to_string()),
            scope,
            out,
            cursor,
        ),
        NodeKind::TocSection { id } => encode_section(
            node,
            id,
            Some(crate::category::CATEGORY_TOC.to_string()),
            scope,
            out,
            cursor,
        ),

        NodeKind::Paragraph {
            id,
            style,
            placeholder,
        } => {
            out.insert(Object::ParagraphElement(ParagraphElement {
                id: id.clone(),
                contents: serialize_node(node)?,
                paragraph_style: style.clone(),
                placeholder_inner_html: placeholder.clone(),
            }));
            walk_children(node, &scope.in_container(id), out, cursor)
        }

        NodeKind::OrderedList { id } => {
            out.insert(Object::ListElement(ListElement {
                id: id.clone(),
                contents: serialize_node(node)?,
                list_style: "order".to_string(),
            }));
            walk_children(node, &scope.in_container(id), out, cursor)
        }
        NodeKind::BulletList { id } => {
            out.insert(Object::ListElement(ListElement {
                id: id.clone(),
                contents: serialize_node(node)?,
                list_style: "bullet".to_string(),
            }));
            walk_children(node, &scope.in_container(id), out, cursor)
        }

        NodeKind::FigureElement { id, style } => {
            let (contained, caption) = contained_parts(node)?;
            out.insert(Object::FigureElement(FigureElement {
                id: id.clone(),
                contained_object_id: contained,
                caption,
                figure_style: style.clone(),
            }));
            walk_children(node, &scope.in_container(id), out, cursor)
        }
        NodeKind::TableElement {
            id,
            suppress_header,
            suppress_footer,
        } => {
            let (contained, caption) = contained_parts(node)?;
            out.insert(Object::TableElement(TableElement {
                id: id.clone(),
                contained_object_id: contained,
                caption,
                suppress_header: *suppress_header,
                suppress_footer: *suppress_footer,
            }));
            walk_children(
                node,
                &scope.in_table_element(id, *suppress_header, *suppress_footer),
                out,
                cursor,
            )
        }
        NodeKind::EquationElement { id } => {
            let (contained, caption) = contained_parts(node)?;
            out.insert(Object::EquationElement(EquationElement {
                id: id.clone(),
                contained_object_id: contained,
                caption,
            }));
            walk_children(node, &scope.in_container(id), out, cursor)
        }
        NodeKind::ListingElement { id } => {
            let (contained, caption) = contained_parts(node)?;
            out.insert(Object::ListingElement(ListingElement {
                id: id.clone(),
                contained_object_id: contained,
                caption,
            }));
            walk_children(node, &scope.in_container(id), out, cursor)
        }

        NodeKind::Figure { id, src, title } => {
            out.insert(Object::Figure(Figure {
                id: id.clone(),
                src: src.clone(),
                title: title.clone(),
            }));
            Ok(())
        }
        NodeKind::Table { id } => {
            // Row-group visibility markers mirror the owning element's
            // suppress flags, so the stored fragment is self-describing.
            let (suppress_header, suppress_footer) = scope.table_element.unwrap_or((false, false));
            out.insert(Object::Table(Table {
                id: id.clone(),
                contents: serialize_table(node, suppress_header, suppress_footer)?,
            }));
            walk_children(node, &scope.in_container(id), out, cursor)
        }
        NodeKind::Equation { id, tex } => {
            out.insert(Object::Equation(Equation {
                id: id.clone(),
                tex: tex.clone(),
            }));
            Ok(())
        }
        NodeKind::Listing {
            id,
            contents,
            language,
        } => {
            out.insert(Object::Listing(Listing {
                id: id.clone(),
                contents: contents.clone(),
                language: language.clone(),
            }));
            Ok(())
        }

        NodeKind::FootnotesElement { id, contents } => {
            out.insert(Object::FootnotesElement(OpaqueElement {
                id: id.clone(),
                contents: contents.clone(),
            }));
            Ok(())
        }
        NodeKind::BibliographyElement { id, contents } => {
            out.insert(Object::BibliographyElement(OpaqueElement {
                id: id.clone(),
                contents: contents.clone(),
            }));
            Ok(())
        }
        NodeKind::TocElement { id, contents } => {
            out.insert(Object::TocElement(OpaqueElement {
                id: id.clone(),
                contents: contents.clone(),
            }));
            Ok(())
        }

        NodeKind::Citation { id, rids, .. } => {
            out.insert(Object::Citation(Citation {
                id: id.clone(),
                containing_object: scope.container.map(str::to_string),
                embedded_citation_items: rids.clone(),
            }));
            Ok(())
        }
        NodeKind::Footnote { id, contents } => {
            out.insert(Object::Footnote(Footnote {
                id: id.clone(),
                contents: contents.clone(),
            }));
            Ok(())
        }
        NodeKind::CrossReference { id, rid, .. } => {
            out.insert(Object::CrossReference(CrossReference {
                id: id.clone(),
                referenced_object: rid.clone(),
            }));
            Ok(())
        }

        // Placeholders are never written back.
        NodeKind::Placeholder { .. } | NodeKind::PlaceholderElement { .. } => Ok(()),

        // Structural kinds fold into their owner's serialized fields.
        NodeKind::SectionTitle
        | NodeKind::Caption
        | NodeKind::TableSection { .. }
        | NodeKind::TableRow
        | NodeKind::TableCell { .. }
        | NodeKind::ListItem
        | NodeKind::Text { .. }
        | NodeKind::HardBreak => walk_children(node, scope, out, cursor),
    }
}

fn walk_children<'a>(
    node: &'a Node,
    scope: &Scope<'a>,
    out: &mut ObjectMap,
    cursor: &mut PriorityCursor,
) -> Result<(), ModelError> {
    for child in &node.children {
        walk(child, scope, out, cursor)?;
    }
    Ok(())
}

fn encode_section<'a>(
    node: &'a Node,
    id: &'a str,
    category: Option<String>,
    scope: &Scope<'a>,
    out: &mut ObjectMap,
    cursor: &mut PriorityCursor,
) -> Result<(), ModelError> {
    let priority = cursor.take();

    let title = match node.child_where(|c| matches!(c.kind, NodeKind::SectionTitle)) {
        Some(title_node) => {
            let markup = serialize_inline(&title_node.children)?;
            (!markup.is_empty()).then_some(markup)
        }
        None => return Err(ModelError::InvalidSectionContent(id.to_string())),
    };

    // Direct element children only; nested sections order themselves by
    // priority and placeholder elements keep their original ids alive.
    let element_ids = node
        .children
        .iter()
        .filter(|child| is_element(&child.kind))
        .filter_map(|child| child.kind.id().map(str::to_string))
        .collect();

    let scope = scope.in_section(id);
    out.insert(Object::Section(Section {
        id: id.to_string(),
        priority,
        path: scope.section_path.clone(),
        element_ids,
        title,
        category,
    }));
    walk_children(node, &scope, out, cursor)
}

/// Split a wrapper element's children into (contained object id, serialized
/// caption). The content model guarantees exactly one contained node (or a
/// placeholder) followed by one caption.
fn contained_parts(node: &Node) -> Result<(String, String), ModelError> {
    match node.children.as_slice() {
        [content, caption] if matches!(caption.kind, NodeKind::Caption) => {
            let contained = content
                .kind
                .id()
                .ok_or(ModelError::UnhandledNode(content.kind.name()))?
                .to_string();
            Ok((contained, serialize_inline(&caption.children)?))
        }
        _ => Err(ModelError::UnhandledNode(node.kind.name())),
    }
}
