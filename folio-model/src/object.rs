//! Persisted objects: the flat, identifier-keyed records the document is
//! stored as.
//!
//! [`Object`] is a closed tagged union over the `objectType` wire tag. An
//! unknown tag fails at snapshot deserialization, which is the one runtime
//! fatal left for genuinely unexpected or legacy data; for every known kind
//! the decode/encode dispatch is an exhaustive match.
//!
//! Relationships between records are expressed three ways:
//! - containment path: `Section.path` lists the full ancestor id chain,
//!   innermost last (including the section itself);
//! - ordered reference lists: `Section.elementIDs`;
//! - single back-references: an element's `containedObjectID`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::registry::ObjectKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    /// Sibling ordering key; absent values compare as 0.
    #[serde(default)]
    pub priority: i64,
    /// Ancestor id chain, innermost (self) last. Root sections have a path
    /// of length zero or one.
    #[serde(default)]
    pub path: Vec<String>,
    /// Ordered ids of the section's direct content elements.
    #[serde(rename = "elementIDs", default, skip_serializing_if = "Vec::is_empty")]
    pub element_ids: Vec<String>,
    /// Inline markup fragment, no wrapping tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphElement {
    pub id: String,
    /// A `<p>` markup fragment.
    #[serde(default)]
    pub contents: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_style: Option<String>,
    #[serde(
        rename = "placeholderInnerHTML",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub placeholder_inner_html: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListElement {
    pub id: String,
    /// An `<ol>` or `<ul>` markup fragment.
    #[serde(default)]
    pub contents: String,
    /// `"order"` or `"bullet"`; anything else is a data-integrity error.
    pub list_style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FigureElement {
    pub id: String,
    #[serde(rename = "containedObjectID", default)]
    pub contained_object_id: String,
    /// Inline markup fragment for the caption, possibly empty.
    #[serde(default)]
    pub caption: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub figure_style: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Figure {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableElement {
    pub id: String,
    #[serde(rename = "containedObjectID", default)]
    pub contained_object_id: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub suppress_header: bool,
    #[serde(default)]
    pub suppress_footer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,
    /// A `<table>` fragment with explicit thead/tbody/tfoot row groups.
    #[serde(default)]
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquationElement {
    pub id: String,
    #[serde(rename = "containedObjectID", default)]
    pub contained_object_id: String,
    #[serde(default)]
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equation {
    pub id: String,
    #[serde(default)]
    pub tex: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingElement {
    pub id: String,
    #[serde(rename = "containedObjectID", default)]
    pub contained_object_id: String,
    #[serde(default)]
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    /// Raw source text, not markup.
    #[serde(default)]
    pub contents: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Shared shape of the three opaque pre-rendered blocks (footnotes,
/// bibliography, table of contents). `contents` is re-rendered by the view
/// layer, never edited structurally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpaqueElement {
    pub id: String,
    #[serde(default)]
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub id: String,
    /// The element the citation appears in; re-derived on encode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containing_object: Option<String>,
    /// Ordered citation-item ids.
    #[serde(default)]
    pub embedded_citation_items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Footnote {
    pub id: String,
    #[serde(default)]
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossReference {
    pub id: String,
    #[serde(default)]
    pub referenced_object: String,
}

/// A persisted object, dispatched on the `objectType` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "objectType")]
pub enum Object {
    Section(Section),
    ParagraphElement(ParagraphElement),
    ListElement(ListElement),
    FigureElement(FigureElement),
    Figure(Figure),
    TableElement(TableElement),
    Table(Table),
    EquationElement(EquationElement),
    Equation(Equation),
    ListingElement(ListingElement),
    Listing(Listing),
    FootnotesElement(OpaqueElement),
    BibliographyElement(OpaqueElement),
    TocElement(OpaqueElement),
    Citation(Citation),
    Footnote(Footnote),
    CrossReference(CrossReference),
}

impl Object {
    pub fn id(&self) -> &str {
        match self {
            Object::Section(o) => &o.id,
            Object::ParagraphElement(o) => &o.id,
            Object::ListElement(o) => &o.id,
            Object::FigureElement(o) => &o.id,
            Object::Figure(o) => &o.id,
            Object::TableElement(o) => &o.id,
            Object::Table(o) => &o.id,
            Object::EquationElement(o) => &o.id,
            Object::Equation(o) => &o.id,
            Object::ListingElement(o) => &o.id,
            Object::Listing(o) => &o.id,
            Object::FootnotesElement(o) => &o.id,
            Object::BibliographyElement(o) => &o.id,
            Object::TocElement(o) => &o.id,
            Object::Citation(o) => &o.id,
            Object::Footnote(o) => &o.id,
            Object::CrossReference(o) => &o.id,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::Section(_) => ObjectKind::Section,
            Object::ParagraphElement(_) => ObjectKind::ParagraphElement,
            Object::ListElement(_) => ObjectKind::ListElement,
            Object::FigureElement(_) => ObjectKind::FigureElement,
            Object::Figure(_) => ObjectKind::Figure,
            Object::TableElement(_) => ObjectKind::TableElement,
            Object::Table(_) => ObjectKind::Table,
            Object::EquationElement(_) => ObjectKind::EquationElement,
            Object::Equation(_) => ObjectKind::Equation,
            Object::ListingElement(_) => ObjectKind::ListingElement,
            Object::Listing(_) => ObjectKind::Listing,
            Object::FootnotesElement(_) => ObjectKind::FootnotesElement,
            Object::BibliographyElement(_) => ObjectKind::BibliographyElement,
            Object::TocElement(_) => ObjectKind::TocElement,
            Object::Citation(_) => ObjectKind::Citation,
            Object::Footnote(_) => ObjectKind::Footnote,
            Object::CrossReference(_) => ObjectKind::CrossReference,
        }
    }
}

/// An id-keyed snapshot of persisted objects.
///
/// The decoder treats one of these as immutable for the duration of a pass;
/// the encoder produces a fresh one. Persisting the entries is the caller's
/// job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectMap {
    objects: HashMap<String, Object>,
}

impl ObjectMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-object lookup, the snapshot provider's `getOne`.
    pub fn get(&self, id: &str) -> Option<&Object> {
        self.objects.get(id)
    }

    /// Insert an object keyed by its own id, replacing any previous entry.
    pub fn insert(&mut self, object: Object) {
        self.objects.insert(object.id().to_string(), object);
    }

    pub fn remove(&mut self, id: &str) -> Option<Object> {
        self.objects.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.objects.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &Object> {
        self.objects.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Object)> {
        self.objects.iter()
    }
}

impl FromIterator<Object> for ObjectMap {
    fn from_iter<I: IntoIterator<Item = Object>>(iter: I) -> Self {
        let mut map = ObjectMap::new();
        for object in iter {
            map.insert(object);
        }
        map
    }
}
