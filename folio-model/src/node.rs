//! The document tree.
//!
//! A [`Node`] is a kind plus an ordered list of children; all structure is
//! uniform so tree walks (the encoder, [`Node::find_first`]) never need
//! per-kind traversal code. The kind set is closed: decode and encode match
//! on it exhaustively, which is what turns "unregistered node type" into a
//! compile-time impossibility for known kinds.
//!
//! Node identity is the `id` attribute mirrored from the originating
//! persisted object (or freshly generated for synthesized nodes). It is the
//! join key between the tree and the flat object map and must be unique
//! within one document.

use serde::{Deserialize, Serialize};

/// One node of the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind, children: Vec<Node>) -> Self {
        Node { kind, children }
    }

    pub fn leaf(kind: NodeKind) -> Self {
        Node {
            kind,
            children: Vec::new(),
        }
    }

    /// Pre-order search for the first node matching `pred`, including self.
    pub fn find_first(&self, pred: &dyn Fn(&Node) -> bool) -> Option<&Node> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_first(pred))
    }

    /// Locate a node by its id attribute. Used by incremental-update logic
    /// to target one node for mutation.
    pub fn find_by_id(&self, id: &str) -> Option<&Node> {
        self.find_first(&|n| n.kind.id() == Some(id))
    }

    /// First direct child matching `pred`.
    pub fn child_where(&self, pred: impl Fn(&Node) -> bool) -> Option<&Node> {
        self.children.iter().find(|c| pred(c))
    }
}

/// Which stripe of a table a row group belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TableRole {
    Header,
    Body,
    Footer,
}

/// Inline formatting applied to a text run. Kept in canonical order (see
/// [`canonical_marks`]) so serialized markup is a fixed point under
/// parse/serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mark", rename_all = "camelCase")]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    SmallCaps,
    Subscript,
    Superscript,
    Link { href: String },
}

impl Mark {
    fn rank(&self) -> u8 {
        match self {
            Mark::Bold => 0,
            Mark::Italic => 1,
            Mark::Underline => 2,
            Mark::Strikethrough => 3,
            Mark::SmallCaps => 4,
            Mark::Subscript => 5,
            Mark::Superscript => 6,
            Mark::Link { .. } => 7,
        }
    }
}

/// Sort marks into canonical nesting order and drop duplicates.
pub fn canonical_marks(marks: &mut Vec<Mark>) {
    marks.sort_by_key(Mark::rank);
    marks.dedup();
}

/// The closed set of node kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum NodeKind {
    /// Document root. Carries no id: it is synthesized on every decode and
    /// never persisted, so repeated decodes of one snapshot compare equal.
    Manuscript,
    Section {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        category: Option<String>,
    },
    BibliographySection {
        id: String,
    },
    TocSection {
        id: String,
    },
    SectionTitle,
    Paragraph {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    FigureElement {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<String>,
    },
    Figure {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    TableElement {
        id: String,
        #[serde(default)]
        suppress_header: bool,
        #[serde(default)]
        suppress_footer: bool,
    },
    Table {
        id: String,
    },
    TableSection {
        role: TableRole,
    },
    TableRow,
    TableCell {
        #[serde(default)]
        header: bool,
    },
    EquationElement {
        id: String,
    },
    Equation {
        id: String,
        tex: String,
    },
    ListingElement {
        id: String,
    },
    Listing {
        id: String,
        contents: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    OrderedList {
        id: String,
    },
    BulletList {
        id: String,
    },
    ListItem,
    /// Opaque pre-rendered footnote block; the view re-renders `contents`.
    FootnotesElement {
        id: String,
        contents: String,
    },
    /// Opaque pre-rendered bibliography block.
    BibliographyElement {
        id: String,
        contents: String,
    },
    /// Opaque pre-rendered table of contents block.
    TocElement {
        id: String,
        contents: String,
    },
    Caption,
    /// Stands in for a missing contained object (figure, table, equation,
    /// listing). Keeps the original dangling id so a later save does not
    /// invent a new one.
    Placeholder {
        id: String,
        label: String,
    },
    /// Stands in for a section element whose id did not resolve.
    PlaceholderElement {
        id: String,
    },
    Citation {
        id: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        rids: Vec<String>,
        #[serde(default)]
        text: String,
    },
    CrossReference {
        id: String,
        rid: String,
        #[serde(default)]
        text: String,
    },
    /// Inline footnote marker; `contents` mirrors the referenced Footnote
    /// object and is empty while the reference dangles.
    Footnote {
        id: String,
        #[serde(default)]
        contents: String,
    },
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        marks: Vec<Mark>,
    },
    HardBreak,
}

impl NodeKind {
    /// Display name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Manuscript => "manuscript",
            NodeKind::Section { .. } => "section",
            NodeKind::BibliographySection { .. } => "bibliography_section",
            NodeKind::TocSection { .. } => "toc_section",
            NodeKind::SectionTitle => "section_title",
            NodeKind::Paragraph { .. } => "paragraph",
            NodeKind::FigureElement { .. } => "figure_element",
            NodeKind::Figure { .. } => "figure",
            NodeKind::TableElement { .. } => "table_element",
            NodeKind::Table { .. } => "table",
            NodeKind::TableSection { .. } => "table_section",
            NodeKind::TableRow => "table_row",
            NodeKind::TableCell { .. } => "table_cell",
            NodeKind::EquationElement { .. } => "equation_element",
            NodeKind::Equation { .. } => "equation",
            NodeKind::ListingElement { .. } => "listing_element",
            NodeKind::Listing { .. } => "listing",
            NodeKind::OrderedList { .. } => "ordered_list",
            NodeKind::BulletList { .. } => "bullet_list",
            NodeKind::ListItem => "list_item",
            NodeKind::FootnotesElement { .. } => "footnotes_element",
            NodeKind::BibliographyElement { .. } => "bibliography_element",
            NodeKind::TocElement { .. } => "toc_element",
            NodeKind::Caption => "caption",
            NodeKind::Placeholder { .. } => "placeholder",
            NodeKind::PlaceholderElement { .. } => "placeholder_element",
            NodeKind::Citation { .. } => "citation",
            NodeKind::CrossReference { .. } => "cross_reference",
            NodeKind::Footnote { .. } => "footnote",
            NodeKind::Text { .. } => "text",
            NodeKind::HardBreak => "hard_break",
        }
    }

    /// The id attribute, for kinds that carry one.
    pub fn id(&self) -> Option<&str> {
        match self {
            NodeKind::Section { id, .. }
            | NodeKind::BibliographySection { id }
            | NodeKind::TocSection { id }
            | NodeKind::Paragraph { id, .. }
            | NodeKind::FigureElement { id, .. }
            | NodeKind::Figure { id, .. }
            | NodeKind::TableElement { id, .. }
            | NodeKind::Table { id }
            | NodeKind::EquationElement { id }
            | NodeKind::Equation { id, .. }
            | NodeKind::ListingElement { id }
            | NodeKind::Listing { id, .. }
            | NodeKind::OrderedList { id }
            | NodeKind::BulletList { id }
            | NodeKind::FootnotesElement { id, .. }
            | NodeKind::BibliographyElement { id, .. }
            | NodeKind::TocElement { id, .. }
            | NodeKind::Placeholder { id, .. }
            | NodeKind::PlaceholderElement { id }
            | NodeKind::Citation { id, .. }
            | NodeKind::CrossReference { id, .. }
            | NodeKind::Footnote { id, .. } => Some(id),
            NodeKind::Manuscript
            | NodeKind::SectionTitle
            | NodeKind::TableSection { .. }
            | NodeKind::TableRow
            | NodeKind::TableCell { .. }
            | NodeKind::ListItem
            | NodeKind::Caption
            | NodeKind::Text { .. }
            | NodeKind::HardBreak => None,
        }
    }

    /// Whether this kind is one of the three section variants.
    pub fn is_section(&self) -> bool {
        matches!(
            self,
            NodeKind::Section { .. } | NodeKind::BibliographySection { .. } | NodeKind::TocSection { .. }
        )
    }

    /// Whether this kind may appear in inline content (titles, captions,
    /// paragraph bodies, table cells, list items).
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            NodeKind::Text { .. }
                | NodeKind::HardBreak
                | NodeKind::Citation { .. }
                | NodeKind::CrossReference { .. }
                | NodeKind::Footnote { .. }
        )
    }

    /// Whether this kind stands in for unresolved content. Placeholders are
    /// never encoded back into the object map.
    pub fn is_placeholder(&self) -> bool {
        matches!(
            self,
            NodeKind::Placeholder { .. } | NodeKind::PlaceholderElement { .. }
        )
    }
}

/// Content-model check for a section's assembled children: exactly one
/// leading title, then elements (or placeholder elements), then nested
/// sections, with no interleaving.
pub fn valid_section_children(children: &[Node]) -> bool {
    let mut iter = children.iter();
    if !matches!(iter.next().map(|n| &n.kind), Some(NodeKind::SectionTitle)) {
        return false;
    }
    let mut in_subsections = false;
    for child in iter {
        if child.kind.is_section() {
            in_subsections = true;
        } else if in_subsections || !crate::registry::is_element(&child.kind) {
            return false;
        }
    }
    true
}

/// Content-model check for figure/table/equation/listing elements: one
/// contained node (or a placeholder), then one caption.
pub fn valid_contained_children(children: &[Node], content: impl Fn(&NodeKind) -> bool) -> bool {
    match children {
        [first, second] => {
            (content(&first.kind) || matches!(first.kind, NodeKind::Placeholder { .. }))
                && matches!(second.kind, NodeKind::Caption)
        }
        _ => false,
    }
}

/// Content-model check for a table: at most one section per role, in
/// header/body/footer order.
pub fn valid_table_children(children: &[Node]) -> bool {
    let mut last: Option<TableRole> = None;
    for child in children {
        let NodeKind::TableSection { role } = child.kind else {
            return false;
        };
        if let Some(prev) = last {
            if role <= prev {
                return false;
            }
        }
        last = Some(role);
    }
    true
}
