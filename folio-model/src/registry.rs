//! Registry of persisted object kinds and their relation to tree nodes.
//!
//! Every object type that participates in persistence is listed in
//! [`ObjectKind`]; the tag doubles as the id prefix (`"Section:..."`).
//! The mapping to and from node kinds is written as exhaustive matches over
//! the two closed enums, so a registry gap for a known kind is a compile
//! error rather than a runtime lookup miss.

use crate::node::NodeKind;

/// The closed set of persisted object types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Section,
    ParagraphElement,
    ListElement,
    FigureElement,
    Figure,
    TableElement,
    Table,
    EquationElement,
    Equation,
    ListingElement,
    Listing,
    FootnotesElement,
    BibliographyElement,
    TocElement,
    Citation,
    Footnote,
    CrossReference,
}

impl ObjectKind {
    /// The wire tag, used both as `objectType` and as the id prefix.
    pub fn tag(&self) -> &'static str {
        match self {
            ObjectKind::Section => "Section",
            ObjectKind::ParagraphElement => "ParagraphElement",
            ObjectKind::ListElement => "ListElement",
            ObjectKind::FigureElement => "FigureElement",
            ObjectKind::Figure => "Figure",
            ObjectKind::TableElement => "TableElement",
            ObjectKind::Table => "Table",
            ObjectKind::EquationElement => "EquationElement",
            ObjectKind::Equation => "Equation",
            ObjectKind::ListingElement => "ListingElement",
            ObjectKind::Listing => "Listing",
            ObjectKind::FootnotesElement => "FootnotesElement",
            ObjectKind::BibliographyElement => "BibliographyElement",
            ObjectKind::TocElement => "TocElement",
            ObjectKind::Citation => "Citation",
            ObjectKind::Footnote => "Footnote",
            ObjectKind::CrossReference => "CrossReference",
        }
    }

    /// Look a kind up by its wire tag.
    pub fn from_tag(tag: &str) -> Option<ObjectKind> {
        Some(match tag {
            "Section" => ObjectKind::Section,
            "ParagraphElement" => ObjectKind::ParagraphElement,
            "ListElement" => ObjectKind::ListElement,
            "FigureElement" => ObjectKind::FigureElement,
            "Figure" => ObjectKind::Figure,
            "TableElement" => ObjectKind::TableElement,
            "Table" => ObjectKind::Table,
            "EquationElement" => ObjectKind::EquationElement,
            "Equation" => ObjectKind::Equation,
            "ListingElement" => ObjectKind::ListingElement,
            "Listing" => ObjectKind::Listing,
            "FootnotesElement" => ObjectKind::FootnotesElement,
            "BibliographyElement" => ObjectKind::BibliographyElement,
            "TocElement" => ObjectKind::TocElement,
            "Citation" => ObjectKind::Citation,
            "Footnote" => ObjectKind::Footnote,
            "CrossReference" => ObjectKind::CrossReference,
            _ => return None,
        })
    }

    /// The object kind a node kind persists as, or `None` for structural
    /// kinds that are folded into their parent's record (titles, captions,
    /// table internals, plain text) and for placeholders.
    pub fn for_node(kind: &NodeKind) -> Option<ObjectKind> {
        Some(match kind {
            NodeKind::Section { .. }
            | NodeKind::BibliographySection { .. }
            | NodeKind::TocSection { .. } => ObjectKind::Section,
            NodeKind::Paragraph { .. } => ObjectKind::ParagraphElement,
            NodeKind::OrderedList { .. } | NodeKind::BulletList { .. } => ObjectKind::ListElement,
            NodeKind::FigureElement { .. } => ObjectKind::FigureElement,
            NodeKind::Figure { .. } => ObjectKind::Figure,
            NodeKind::TableElement { .. } => ObjectKind::TableElement,
            NodeKind::Table { .. } => ObjectKind::Table,
            NodeKind::EquationElement { .. } => ObjectKind::EquationElement,
            NodeKind::Equation { .. } => ObjectKind::Equation,
            NodeKind::ListingElement { .. } => ObjectKind::ListingElement,
            NodeKind::Listing { .. } => ObjectKind::Listing,
            NodeKind::FootnotesElement { .. } => ObjectKind::FootnotesElement,
            NodeKind::BibliographyElement { .. } => ObjectKind::BibliographyElement,
            NodeKind::TocElement { .. } => ObjectKind::TocElement,
            NodeKind::Citation { .. } => ObjectKind::Citation,
            NodeKind::Footnote { .. } => ObjectKind::Footnote,
            NodeKind::CrossReference { .. } => ObjectKind::CrossReference,
            NodeKind::Manuscript
            | NodeKind::SectionTitle
            | NodeKind::Caption
            | NodeKind::TableSection { .. }
            | NodeKind::TableRow
            | NodeKind::TableCell { .. }
            | NodeKind::ListItem
            | NodeKind::Placeholder { .. }
            | NodeKind::PlaceholderElement { .. }
            | NodeKind::Text { .. }
            | NodeKind::HardBreak => return None,
        })
    }
}

/// Whether a node kind is first-class section content, i.e. belongs in the
/// owning section's `elementIDs`. Nested sections are structural and are
/// reconstructed from `path` instead; a placeholder element keeps the
/// dangling id it stands in for, so the reference survives a save.
pub fn is_element(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Paragraph { .. }
            | NodeKind::OrderedList { .. }
            | NodeKind::BulletList { .. }
            | NodeKind::FigureElement { .. }
            | NodeKind::TableElement { .. }
            | NodeKind::EquationElement { .. }
            | NodeKind::ListingElement { .. }
            | NodeKind::FootnotesElement { .. }
            | NodeKind::BibliographyElement { .. }
            | NodeKind::TocElement { .. }
            | NodeKind::PlaceholderElement { .. }
    )
}
