//! Section category resolution.
//!
//! A section record decodes into one of three structural variants. Explicit
//! `category` metadata is authoritative; for records that predate explicit
//! categorization, a legacy heuristic peeks at the first resolved content
//! element instead. The heuristic is a compatibility shim, not a source of
//! truth, and is consulted only when `category` is absent.

use crate::object::Object;

pub const CATEGORY_BIBLIOGRAPHY: &str = "bibliography";
pub const CATEGORY_TOC: &str = "toc";

/// Which structural node a section record decodes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionVariant {
    Plain,
    Bibliography,
    Toc,
}

/// Resolve the variant from explicit category metadata. Unknown categories
/// decode as plain sections and keep their category string on the node.
pub fn choose_section_variant(category: Option<&str>) -> SectionVariant {
    match category {
        Some(CATEGORY_BIBLIOGRAPHY) => SectionVariant::Bibliography,
        Some(CATEGORY_TOC) => SectionVariant::Toc,
        _ => SectionVariant::Plain,
    }
}

/// Legacy fallback for uncategorized records: guess from the object type of
/// the first resolved element. Placeholder substitutes never reach here.
pub fn infer_category_from_elements(elements: &[&Object]) -> Option<&'static str> {
    match elements.first() {
        Some(Object::BibliographyElement(_)) => Some(CATEGORY_BIBLIOGRAPHY),
        Some(Object::TocElement(_)) => Some(CATEGORY_TOC),
        _ => None,
    }
}
