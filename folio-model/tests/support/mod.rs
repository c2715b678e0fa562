//! Shared builders for snapshot fixtures.

use folio_model::ids::SequentialIds;
use folio_model::object::{
    EquationElement, FigureElement, Footnote, ListElement, ListingElement, OpaqueElement,
    ParagraphElement, Section, TableElement,
};
use folio_model::{Decoder, Node, Object, ObjectMap};

pub fn snapshot(objects: Vec<Object>) -> ObjectMap {
    objects.into_iter().collect()
}

pub fn decode(map: &ObjectMap) -> Node {
    let ids = SequentialIds::new();
    Decoder::new(map, &ids)
        .build_document()
        .expect("decode failed")
}

pub fn section(id: &str, priority: i64, path: &[&str], element_ids: &[&str]) -> Object {
    Object::Section(Section {
        id: id.into(),
        priority,
        path: path.iter().map(|s| s.to_string()).collect(),
        element_ids: element_ids.iter().map(|s| s.to_string()).collect(),
        title: Some(format!("Title {id}")),
        category: None,
    })
}

pub fn titled_section(id: &str, priority: i64, title: &str, element_ids: &[&str]) -> Object {
    Object::Section(Section {
        id: id.into(),
        priority,
        path: vec![id.to_string()],
        element_ids: element_ids.iter().map(|s| s.to_string()).collect(),
        title: Some(title.into()),
        category: None,
    })
}

pub fn paragraph(id: &str, contents: &str) -> Object {
    Object::ParagraphElement(ParagraphElement {
        id: id.into(),
        contents: contents.into(),
        paragraph_style: None,
        placeholder_inner_html: None,
    })
}

pub fn list(id: &str, style: &str, contents: &str) -> Object {
    Object::ListElement(ListElement {
        id: id.into(),
        contents: contents.into(),
        list_style: style.into(),
    })
}

pub fn figure_element(id: &str, contained: &str, caption: &str) -> Object {
    Object::FigureElement(FigureElement {
        id: id.into(),
        contained_object_id: contained.into(),
        caption: caption.into(),
        figure_style: None,
    })
}

pub fn table_element(id: &str, contained: &str, caption: &str) -> Object {
    Object::TableElement(TableElement {
        id: id.into(),
        contained_object_id: contained.into(),
        caption: caption.into(),
        suppress_header: false,
        suppress_footer: false,
    })
}

pub fn equation_element(id: &str, contained: &str) -> Object {
    Object::EquationElement(EquationElement {
        id: id.into(),
        contained_object_id: contained.into(),
        caption: String::new(),
    })
}

pub fn listing_element(id: &str, contained: &str) -> Object {
    Object::ListingElement(ListingElement {
        id: id.into(),
        contained_object_id: contained.into(),
        caption: String::new(),
    })
}

pub fn bibliography_element(id: &str, contents: &str) -> Object {
    Object::BibliographyElement(OpaqueElement {
        id: id.into(),
        contents: contents.into(),
    })
}

pub fn footnote(id: &str, contents: &str) -> Object {
    Object::Footnote(Footnote {
        id: id.into(),
        contents: contents.into(),
    })
}
