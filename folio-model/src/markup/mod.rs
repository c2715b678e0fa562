//! Markup fragments: the wire format for rich content fields.
//!
//! Content-bearing fields of persisted objects (`contents`, `title`,
//! `caption`) are serialized markup strings. The vocabulary is fixed and
//! versioned; extending it requires changing the parse and serialize sides
//! symmetrically.
//!
//! # Library Choice
//!
//! Parsing uses the `html5ever` + `markup5ever_rcdom` ecosystem from the
//! Servo project: a browser-grade, WHATWG-compliant parser that handles
//! malformed input gracefully, which matters because fragments may have
//! been produced by older clients. Serialization is a hand-written
//! canonical writer so output is byte-stable: `serialize(parse(f)) == f`
//! for any `f` the writer itself produced.
//!
//! # Vocabulary
//!
//! | Node / mark        | Markup                                                  |
//! |--------------------|---------------------------------------------------------|
//! | Paragraph          | `<p>…</p>`                                              |
//! | Ordered list       | `<ol><li>…</li></ol>`                                   |
//! | Bullet list        | `<ul><li>…</li></ul>`                                   |
//! | Table              | `<table><thead>…<tbody>…<tfoot>…</table>`               |
//! | Bold               | `<strong>` (also `<b>` on input)                        |
//! | Italic             | `<em>` (also `<i>` on input)                            |
//! | Underline          | `<u>`                                                   |
//! | Strikethrough      | `<s>` (also `<del>` on input)                           |
//! | Small caps         | `<span class="smallcaps">`                              |
//! | Sub/superscript    | `<sub>` / `<sup>`                                       |
//! | Link               | `<a href="…">`                                          |
//! | Line break         | `<br>`                                                  |
//! | Citation           | `<span class="citation" data-id data-rids>text</span>`  |
//! | Cross-reference    | `<span class="cross-reference" data-id data-ref>…</span>` |
//! | Footnote marker    | `<span class="footnote" data-id></span>`                |
//!
//! Cell tags inside tables follow the row group: header rows serialize as
//! `<th>`, body and footer rows as `<td>`, and the parser derives the
//! header flag from the row group rather than the tag, so a decode/encode
//! cycle normalizes stray tagging instead of oscillating.

pub mod parser;
pub mod serializer;

pub use parser::{parse_fragment, parse_inline};
pub use serializer::{serialize_inline, serialize_node, serialize_table};
