//! Decode-direction tests: snapshot → tree.

use folio_model::node::NodeKind;
use folio_model::object::{Equation, Figure, Listing, Table};
use folio_model::{Node, Object};

use crate::support::*;

fn text(node: &Node) -> &str {
    match &node.kind {
        NodeKind::Text { text, .. } => text,
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn one_section_one_paragraph() {
    let map = snapshot(vec![
        titled_section("Section:S1", 0, "Intro", &["ParagraphElement:P1"]),
        paragraph("ParagraphElement:P1", "<p>Hello</p>"),
    ]);
    let root = decode(&map);

    assert!(matches!(root.kind, NodeKind::Manuscript));
    assert_eq!(root.children.len(), 1);

    let section = &root.children[0];
    assert_eq!(section.kind.id(), Some("Section:S1"));
    assert_eq!(section.children.len(), 2);

    let title = &section.children[0];
    assert!(matches!(title.kind, NodeKind::SectionTitle));
    assert_eq!(text(&title.children[0]), "Intro");

    let para = &section.children[1];
    assert_eq!(para.kind.id(), Some("ParagraphElement:P1"));
    assert_eq!(text(&para.children[0]), "Hello");
}

#[test]
fn absent_element_id_decodes_to_placeholder_element() {
    let map = snapshot(vec![
        titled_section(
            "Section:S1",
            0,
            "Intro",
            &["ParagraphElement:P1", "ParagraphElement:P2"],
        ),
        paragraph("ParagraphElement:P1", "<p>Hello</p>"),
    ]);
    let root = decode(&map);
    let section = &root.children[0];
    assert_eq!(section.children.len(), 3);
    assert!(matches!(
        section.children[1].kind,
        NodeKind::Paragraph { .. }
    ));
    assert_eq!(
        section.children[2].kind,
        NodeKind::PlaceholderElement {
            id: "ParagraphElement:P2".into()
        }
    );
}

#[test]
fn root_sections_sort_by_priority() {
    let map = snapshot(vec![
        section("Section:late", 5, &["Section:late"], &[]),
        section("Section:early", 1, &["Section:early"], &[]),
    ]);
    let root = decode(&map);
    assert_eq!(root.children[0].kind.id(), Some("Section:early"));
    assert_eq!(root.children[1].kind.id(), Some("Section:late"));
}

#[test]
fn equal_priorities_break_ties_by_id() {
    let map = snapshot(vec![
        section("Section:b", 3, &["Section:b"], &[]),
        section("Section:a", 3, &["Section:a"], &[]),
        section("Section:c", 3, &["Section:c"], &[]),
    ]);
    // Deterministic regardless of map iteration order.
    for _ in 0..10 {
        let root = decode(&map);
        let ids: Vec<_> = root
            .children
            .iter()
            .map(|n| n.kind.id().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["Section:a", "Section:b", "Section:c"]);
    }
}

#[test]
fn empty_snapshot_yields_one_synthesized_section() {
    let root = decode(&snapshot(vec![]));
    assert_eq!(root.children.len(), 1);
    let section = &root.children[0];
    assert!(section.kind.id().unwrap().starts_with("Section:"));
    assert_eq!(section.children.len(), 1);
    assert!(matches!(section.children[0].kind, NodeKind::SectionTitle));
    assert!(section.children[0].children.is_empty());
}

#[test]
fn missing_table_decodes_to_labeled_placeholder_with_caption() {
    let map = snapshot(vec![
        section("Section:S1", 0, &["Section:S1"], &["TableElement:T1"]),
        table_element("TableElement:T1", "Table:missing", "Results by year"),
    ]);
    let root = decode(&map);
    let element = &root.children[0].children[1];
    assert!(matches!(element.kind, NodeKind::TableElement { .. }));
    assert_eq!(
        element.children[0].kind,
        NodeKind::Placeholder {
            id: "Table:missing".into(),
            label: "A table".into()
        }
    );
    let caption = &element.children[1];
    assert!(matches!(caption.kind, NodeKind::Caption));
    assert_eq!(text(&caption.children[0]), "Results by year");
}

#[test]
fn each_wrapper_kind_gets_its_own_placeholder_label() {
    let map = snapshot(vec![
        section(
            "Section:S1",
            0,
            &["Section:S1"],
            &[
                "FigureElement:1",
                "EquationElement:1",
                "ListingElement:1",
            ],
        ),
        figure_element("FigureElement:1", "Figure:gone", ""),
        equation_element("EquationElement:1", "Equation:gone"),
        listing_element("ListingElement:1", "Listing:gone"),
    ]);
    let root = decode(&map);
    let labels: Vec<_> = root.children[0].children[1..]
        .iter()
        .map(|el| match &el.children[0].kind {
            NodeKind::Placeholder { label, .. } => label.clone(),
            other => panic!("expected placeholder, got {other:?}"),
        })
        .collect();
    assert_eq!(labels, vec!["A figure", "An equation", "A listing"]);
}

#[test]
fn resolved_wrappers_build_real_content_nodes() {
    let map = snapshot(vec![
        section(
            "Section:S1",
            0,
            &["Section:S1"],
            &[
                "FigureElement:1",
                "TableElement:1",
                "EquationElement:1",
                "ListingElement:1",
            ],
        ),
        figure_element("FigureElement:1", "Figure:1", "A photo"),
        Object::Figure(Figure {
            id: "Figure:1".into(),
            src: Some("blob:abc".into()),
            title: Some("photo".into()),
        }),
        table_element("TableElement:1", "Table:1", ""),
        Object::Table(Table {
            id: "Table:1".into(),
            contents: "<table><tbody><tr><td>x</td></tr></tbody></table>".into(),
        }),
        equation_element("EquationElement:1", "Equation:1"),
        Object::Equation(Equation {
            id: "Equation:1".into(),
            tex: "e = mc^2".into(),
        }),
        listing_element("ListingElement:1", "Listing:1"),
        Object::Listing(Listing {
            id: "Listing:1".into(),
            contents: "fn main() {}".into(),
            language: Some("rust".into()),
        }),
    ]);
    let root = decode(&map);
    let elements = &root.children[0].children[1..];

    assert_eq!(
        elements[0].children[0].kind,
        NodeKind::Figure {
            id: "Figure:1".into(),
            src: Some("blob:abc".into()),
            title: Some("photo".into())
        }
    );

    let table = &elements[1].children[0];
    assert_eq!(table.kind.id(), Some("Table:1"));
    assert!(matches!(
        table.children[0].kind,
        NodeKind::TableSection { .. }
    ));

    assert_eq!(
        elements[2].children[0].kind,
        NodeKind::Equation {
            id: "Equation:1".into(),
            tex: "e = mc^2".into()
        }
    );
    assert_eq!(
        elements[3].children[0].kind,
        NodeKind::Listing {
            id: "Listing:1".into(),
            contents: "fn main() {}".into(),
            language: Some("rust".into())
        }
    );
}

#[test]
fn lists_decode_by_declared_style() {
    let map = snapshot(vec![
        section(
            "Section:S1",
            0,
            &["Section:S1"],
            &["ListElement:1", "ListElement:2"],
        ),
        list("ListElement:1", "order", "<ol><li>one</li></ol>"),
        list("ListElement:2", "bullet", "<ul><li>dot</li></ul>"),
    ]);
    let root = decode(&map);
    let elements = &root.children[0].children[1..];
    assert!(matches!(elements[0].kind, NodeKind::OrderedList { .. }));
    assert!(matches!(elements[1].kind, NodeKind::BulletList { .. }));
    assert!(matches!(elements[0].children[0].kind, NodeKind::ListItem));
}

#[test]
fn deep_section_nesting_follows_paths() {
    let map = snapshot(vec![
        section("Section:top", 0, &["Section:top"], &[]),
        section("Section:mid", 0, &["Section:top", "Section:mid"], &[]),
        section(
            "Section:leaf",
            0,
            &["Section:top", "Section:mid", "Section:leaf"],
            &[],
        ),
    ]);
    let root = decode(&map);
    let top = &root.children[0];
    let mid = &top.children[1];
    assert_eq!(mid.kind.id(), Some("Section:mid"));
    let leaf = &mid.children[1];
    assert_eq!(leaf.kind.id(), Some("Section:leaf"));
}

#[test]
fn find_by_id_locates_decoded_nodes() {
    let map = snapshot(vec![
        titled_section("Section:S1", 0, "Intro", &["ParagraphElement:P1"]),
        paragraph("ParagraphElement:P1", "<p>Hello</p>"),
    ]);
    let root = decode(&map);
    assert!(root.find_by_id("ParagraphElement:P1").is_some());
    assert!(root.find_by_id("ParagraphElement:P9").is_none());
}

#[test]
fn opaque_blocks_keep_their_fragment_verbatim() {
    let fragment = "<p class=\"bib-item\">[1] Doe, J. (2021).</p>";
    let map = snapshot(vec![
        section("Section:S1", 0, &["Section:S1"], &["BibliographyElement:1"]),
        bibliography_element("BibliographyElement:1", fragment),
    ]);
    let root = decode(&map);
    let section = &root.children[0];
    // Inference kicks in: a section led by a bibliography element is a
    // bibliography section even without an explicit category.
    assert!(matches!(section.kind, NodeKind::BibliographySection { .. }));
    assert_eq!(
        section.children[1].kind,
        NodeKind::BibliographyElement {
            id: "BibliographyElement:1".into(),
            contents: fragment.into()
        }
    );
}

#[test]
fn inline_references_decode_inside_paragraphs() {
    let map = snapshot(vec![
        titled_section("Section:S1", 0, "Intro", &["ParagraphElement:P1"]),
        paragraph(
            "ParagraphElement:P1",
            "<p>see <span class=\"citation\" data-id=\"Citation:1\" data-rids=\"BibliographyItem:a\">(Doe)</span>\
             <span class=\"cross-reference\" data-id=\"CrossReference:1\" data-ref=\"FigureElement:1\">Figure 1</span>\
             <span class=\"footnote\" data-id=\"Footnote:1\"></span></p>",
        ),
        footnote("Footnote:1", "An aside."),
    ]);
    let root = decode(&map);
    let para = &root.children[0].children[1];
    assert_eq!(
        para.children[1].kind,
        NodeKind::Citation {
            id: "Citation:1".into(),
            rids: vec!["BibliographyItem:a".into()],
            text: "(Doe)".into()
        }
    );
    assert_eq!(
        para.children[2].kind,
        NodeKind::CrossReference {
            id: "CrossReference:1".into(),
            rid: "FigureElement:1".into(),
            text: "Figure 1".into()
        }
    );
    assert_eq!(
        para.children[3].kind,
        NodeKind::Footnote {
            id: "Footnote:1".into(),
            contents: "An aside.".into()
        }
    );
}
