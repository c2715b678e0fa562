//! The forward transform: flat object snapshot → document tree.
//!
//! # The High-Level Concept
//!
//! The snapshot is a flat map of records that reference each other three
//! ways (section paths, ordered element-id lists, single contained-object
//! ids). The decoder reconstructs the hierarchy by starting from the
//! root-level sections and resolving references outward, so the result is a
//! single well-formed tree regardless of the map's iteration order.
//!
//! # Failure Semantics
//!
//! Two classes, deliberately asymmetric:
//!
//! - A dangling reference (an element or contained-object id absent from
//!   the snapshot) is substituted with a placeholder node and decoding
//!   continues. Manuscripts are edited collaboratively and offline, so
//!   references may momentarily dangle; the rest of the document must stay
//!   editable.
//! - A content-model violation, a wrongly-typed contained object, or an
//!   unknown list style aborts the whole pass. The snapshot is not a valid
//!   instance of the schema and a partial tree would be unsafe to persist.
//!
//! Decoding is a pure function of the snapshot: repeated passes over an
//! identical snapshot yield structurally equal trees.

use tracing::debug;

use crate::category::{choose_section_variant, infer_category_from_elements, SectionVariant};
use crate::error::ModelError;
use crate::ids::IdGenerator;
use crate::markup::{parse_fragment, parse_inline};
use crate::node::{valid_section_children, Node, NodeKind};
use crate::object::{Object, ObjectMap, Section};
use crate::registry::ObjectKind;

/// Decodes one snapshot. Constructed per pass; the snapshot is treated as
/// immutable for the decoder's lifetime.
pub struct Decoder<'a> {
    objects: &'a ObjectMap,
    ids: &'a dyn IdGenerator,
}

impl<'a> Decoder<'a> {
    pub fn new(objects: &'a ObjectMap, ids: &'a dyn IdGenerator) -> Self {
        Decoder { objects, ids }
    }

    /// Entry point: reconstruct the whole document.
    ///
    /// Root-level sections are those whose `path` has no ancestor entry.
    /// They are decoded in `(priority, id)` order. A snapshot with no root
    /// sections yields a root with one synthesized empty section, so the
    /// document always has an editable location.
    pub fn build_document(&self) -> Result<Node, ModelError> {
        let mut roots: Vec<&Section> = self
            .objects
            .values()
            .filter_map(|object| match object {
                Object::Section(section) if section.path.len() <= 1 => Some(section),
                _ => None,
            })
            .collect();
        roots.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.id.cmp(&b.id)));

        let mut children = Vec::with_capacity(roots.len().max(1));
        for section in roots {
            children.push(self.decode_section(section)?);
        }
        if children.is_empty() {
            let id = self.ids.generate(ObjectKind::Section);
            debug!(%id, "snapshot has no root sections, synthesizing one");
            children.push(Node::new(
                NodeKind::Section { id, category: None },
                vec![Node::leaf(NodeKind::SectionTitle)],
            ));
        }
        Ok(Node::new(NodeKind::Manuscript, children))
    }

    /// Decode a single persisted object into its tree node.
    pub fn decode_one(&self, object: &Object) -> Result<Node, ModelError> {
        match object {
            Object::Section(section) => self.decode_section(section),
            Object::ParagraphElement(el) => {
                let kind = NodeKind::Paragraph {
                    id: el.id.clone(),
                    style: el.paragraph_style.clone(),
                    placeholder: el.placeholder_inner_html.clone(),
                };
                Ok(Node::new(kind, self.parse_paragraph_body(&el.contents)?))
            }
            Object::ListElement(el) => self.decode_list(el),
            Object::FigureElement(el) => {
                let content = match self.contained(&el.contained_object_id, el)? {
                    Some(Object::Figure(figure)) => Node::leaf(NodeKind::Figure {
                        id: figure.id.clone(),
                        src: figure.src.clone(),
                        title: figure.title.clone(),
                    }),
                    Some(other) => return Err(mismatch(&el.id, other)),
                    None => self.placeholder(&el.contained_object_id, "A figure"),
                };
                Ok(Node::new(
                    NodeKind::FigureElement {
                        id: el.id.clone(),
                        style: el.figure_style.clone(),
                    },
                    vec![content, self.caption(&el.caption)?],
                ))
            }
            Object::TableElement(el) => {
                let content = match self.contained(&el.contained_object_id, el)? {
                    Some(Object::Table(table)) => self.decode_table(&table.id, &table.contents)?,
                    Some(other) => return Err(mismatch(&el.id, other)),
                    None => self.placeholder(&el.contained_object_id, "A table"),
                };
                Ok(Node::new(
                    NodeKind::TableElement {
                        id: el.id.clone(),
                        suppress_header: el.suppress_header,
                        suppress_footer: el.suppress_footer,
                    },
                    vec![content, self.caption(&el.caption)?],
                ))
            }
            Object::EquationElement(el) => {
                let content = match self.contained(&el.contained_object_id, el)? {
                    Some(Object::Equation(eq)) => Node::leaf(NodeKind::Equation {
                        id: eq.id.clone(),
                        tex: eq.tex.clone(),
                    }),
                    Some(other) => return Err(mismatch(&el.id, other)),
                    None => self.placeholder(&el.contained_object_id, "An equation"),
                };
                Ok(Node::new(
                    NodeKind::EquationElement { id: el.id.clone() },
                    vec![content, self.caption(&el.caption)?],
                ))
            }
            Object::ListingElement(el) => {
                let content = match self.contained(&el.contained_object_id, el)? {
                    Some(Object::Listing(listing)) => Node::leaf(NodeKind::Listing {
                        id: listing.id.clone(),
                        contents: listing.contents.clone(),
                        language: listing.language.clone(),
                    }),
                    Some(other) => return Err(mismatch(&el.id, other)),
                    None => self.placeholder(&el.contained_object_id, "A listing"),
                };
                Ok(Node::new(
                    NodeKind::ListingElement { id: el.id.clone() },
                    vec![content, self.caption(&el.caption)?],
                ))
            }
            Object::Figure(figure) => Ok(Node::leaf(NodeKind::Figure {
                id: figure.id.clone(),
                src: figure.src.clone(),
                title: figure.title.clone(),
            })),
            Object::Table(table) => self.decode_table(&table.id, &table.contents),
            Object::Equation(eq) => Ok(Node::leaf(NodeKind::Equation {
                id: eq.id.clone(),
                tex: eq.tex.clone(),
            })),
            Object::Listing(listing) => Ok(Node::leaf(NodeKind::Listing {
                id: listing.id.clone(),
                contents: listing.contents.clone(),
                language: listing.language.clone(),
            })),
            // Opaque blocks: the stored fragment is re-rendered by the view
            // layer, never edited structurally, so it rides along verbatim.
            Object::FootnotesElement(el) => Ok(Node::leaf(NodeKind::FootnotesElement {
                id: el.id.clone(),
                contents: el.contents.clone(),
            })),
            Object::BibliographyElement(el) => Ok(Node::leaf(NodeKind::BibliographyElement {
                id: el.id.clone(),
                contents: el.contents.clone(),
            })),
            Object::TocElement(el) => Ok(Node::leaf(NodeKind::TocElement {
                id: el.id.clone(),
                contents: el.contents.clone(),
            })),
            Object::Citation(citation) => Ok(Node::leaf(NodeKind::Citation {
                id: citation.id.clone(),
                rids: citation.embedded_citation_items.clone(),
                text: String::new(),
            })),
            Object::Footnote(footnote) => Ok(Node::leaf(NodeKind::Footnote {
                id: footnote.id.clone(),
                contents: footnote.contents.clone(),
            })),
            Object::CrossReference(xref) => Ok(Node::leaf(NodeKind::CrossReference {
                id: xref.id.clone(),
                rid: xref.referenced_object.clone(),
                text: String::new(),
            })),
        }
    }

    fn decode_section(&self, section: &Section) -> Result<Node, ModelError> {
        // Elements first: each id resolves either to a real object or to a
        // placeholder element carrying the unresolved id.
        let mut resolved: Vec<&Object> = Vec::new();
        let mut elements: Vec<Node> = Vec::new();
        for element_id in &section.element_ids {
            match self.objects.get(element_id) {
                Some(object) => {
                    resolved.push(object);
                    elements.push(self.decode_one(object)?);
                }
                None => {
                    debug!(section = %section.id, element = %element_id, "element unresolved, substituting placeholder");
                    elements.push(Node::leaf(NodeKind::PlaceholderElement {
                        id: element_id.clone(),
                    }));
                }
            }
        }

        let title = Node::new(NodeKind::SectionTitle, self.parse_title(section)?);

        let mut subsections: Vec<&Section> = self
            .objects
            .values()
            .filter_map(|object| match object {
                Object::Section(sub)
                    if sub.path.len() >= 2 && sub.path[sub.path.len() - 2] == section.id =>
                {
                    Some(sub)
                }
                _ => None,
            })
            .collect();
        subsections.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.id.cmp(&b.id)));

        let mut children = Vec::with_capacity(1 + elements.len() + subsections.len());
        children.push(title);
        children.extend(elements);
        for sub in subsections {
            children.push(self.decode_section(sub)?);
        }
        if !valid_section_children(&children) {
            return Err(ModelError::InvalidSectionContent(section.id.clone()));
        }

        // Inference over the resolved child elements only covers legacy
        // records that predate explicit categories.
        let category = section
            .category
            .as_deref()
            .or_else(|| infer_category_from_elements(&resolved));
        let kind = match choose_section_variant(category) {
            SectionVariant::Bibliography => NodeKind::BibliographySection {
                id: section.id.clone(),
            },
            SectionVariant::Toc => NodeKind::TocSection {
                id: section.id.clone(),
            },
            SectionVariant::Plain => NodeKind::Section {
                id: section.id.clone(),
                category: section.category.clone(),
            },
        };
        Ok(Node::new(kind, children))
    }

    fn decode_list(&self, el: &crate::object::ListElement) -> Result<Node, ModelError> {
        let kind = match el.list_style.as_str() {
            "order" => NodeKind::OrderedList { id: el.id.clone() },
            "bullet" => NodeKind::BulletList { id: el.id.clone() },
            other => {
                return Err(ModelError::UnknownListStyle {
                    id: el.id.clone(),
                    style: other.to_string(),
                })
            }
        };
        let items = if el.contents.is_empty() {
            Vec::new()
        } else {
            let mut blocks = parse_fragment(&el.contents)?;
            match blocks.pop() {
                Some(list)
                    if blocks.is_empty()
                        && matches!(
                            list.kind,
                            NodeKind::OrderedList { .. } | NodeKind::BulletList { .. }
                        ) =>
                {
                    let mut items = list.children;
                    for item in &mut items {
                        self.resolve_inline_refs(&mut item.children);
                    }
                    items
                }
                _ => {
                    return Err(ModelError::Markup(format!(
                        "expected a single list fragment in {}",
                        el.id
                    )))
                }
            }
        };
        Ok(Node::new(kind, items))
    }

    fn decode_table(&self, id: &str, contents: &str) -> Result<Node, ModelError> {
        if contents.is_empty() {
            return Ok(Node::leaf(NodeKind::Table { id: id.to_string() }));
        }
        let mut blocks = parse_fragment(contents)?;
        match blocks.pop() {
            Some(mut table) if blocks.is_empty() && matches!(table.kind, NodeKind::Table { .. }) => {
                table.kind = NodeKind::Table { id: id.to_string() };
                self.resolve_inline_refs(&mut table.children);
                Ok(table)
            }
            _ => Err(ModelError::Markup(format!(
                "expected a single table fragment in {id}"
            ))),
        }
    }

    fn parse_paragraph_body(&self, contents: &str) -> Result<Vec<Node>, ModelError> {
        if contents.is_empty() {
            return Ok(Vec::new());
        }
        let mut blocks = parse_fragment(contents)?;
        match blocks.pop() {
            Some(para) if blocks.is_empty() && matches!(para.kind, NodeKind::Paragraph { .. }) => {
                let mut content = para.children;
                self.resolve_inline_refs(&mut content);
                Ok(content)
            }
            _ => Err(ModelError::Markup(
                "expected a single paragraph fragment".to_string(),
            )),
        }
    }

    fn parse_title(&self, section: &Section) -> Result<Vec<Node>, ModelError> {
        let mut content = parse_inline(section.title.as_deref().unwrap_or_default())?;
        self.resolve_inline_refs(&mut content);
        Ok(content)
    }

    fn caption(&self, markup: &str) -> Result<Node, ModelError> {
        let mut content = parse_inline(markup)?;
        self.resolve_inline_refs(&mut content);
        Ok(Node::new(NodeKind::Caption, content))
    }

    /// Markup carries only a marker's id; the authoritative data lives on
    /// the marker's record. Footnote text comes from the Footnote record,
    /// and citation item ids come from the Citation record, with the markup
    /// attributes only a fallback. A marker whose record is absent keeps
    /// its markup-derived fields, the inline analogue of placeholder
    /// substitution.
    fn resolve_inline_refs(&self, nodes: &mut Vec<Node>) {
        for node in nodes {
            match &mut node.kind {
                NodeKind::Footnote { id, contents } => {
                    if let Some(Object::Footnote(footnote)) = self.objects.get(id) {
                        *contents = footnote.contents.clone();
                    }
                }
                NodeKind::Citation { id, rids, .. } => {
                    if let Some(Object::Citation(citation)) = self.objects.get(id) {
                        *rids = citation.embedded_citation_items.clone();
                    }
                }
                _ => {}
            }
            self.resolve_inline_refs(&mut node.children);
        }
    }

    fn contained<'b>(
        &'b self,
        id: &str,
        element: &dyn ElementRecord,
    ) -> Result<Option<&'b Object>, ModelError> {
        match self.objects.get(id) {
            Some(object) => Ok(Some(object)),
            None => {
                debug!(element = %element.id(), contained = %id, "contained object unresolved, substituting placeholder");
                Ok(None)
            }
        }
    }

    fn placeholder(&self, missing_id: &str, label: &str) -> Node {
        // Keeps the original dangling id; a later save must not invent a
        // new id for content that may still be created or linked.
        Node::leaf(NodeKind::Placeholder {
            id: missing_id.to_string(),
            label: label.to_string(),
        })
    }
}

fn mismatch(element: &str, found: &Object) -> ModelError {
    ModelError::ContainedObjectMismatch {
        element: element.to_string(),
        target: format!("{} ({})", found.id(), found.kind().tag()),
    }
}

/// The shared face of the four contained-object wrapper records, for log
/// context only.
trait ElementRecord {
    fn id(&self) -> &str;
}

macro_rules! element_record {
    ($($ty:ty),+) => {
        $(impl ElementRecord for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })+
    };
}

element_record!(
    crate::object::FigureElement,
    crate::object::TableElement,
    crate::object::EquationElement,
    crate::object::ListingElement
);
