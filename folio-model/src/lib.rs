//! Document model for structured manuscripts
//!
//!     This crate is the editing core of a manuscript editor: a typed
//!     document tree, and a bidirectional transformer between that tree and
//!     the flat object graph the persistence layer stores.
//!
//!     TLDR:
//!         - Decode: flat object snapshot -> one hierarchical document tree.
//!         - Encode: tree -> flat map of partial records, keyed by id.
//!         - The two are inverses for content that has not been edited;
//!           that round trip is the central correctness property here.
//!         - Dangling references decode into placeholders and keep the rest
//!           of the document editable; schema violations abort the pass.
//!
//! Architecture
//!
//!     The goal is to keep one uniform tree (node.rs) so every walk, check
//!     and transform is a plain recursion instead of per-kind traversal
//!     code. The kind set is a closed enum: decode and encode match on it
//!     exhaustively, so an unhandled kind is a compile error, and the only
//!     runtime fatal left for unknown data is an unrecognized objectType
//!     tag at snapshot deserialization.
//!
//!     This is a pure lib: it powers folio-cli but assumes no shell
//!     environment, no std print, no env vars.
//!
//!     The file structure:
//!     .
//!     ├── error.rs
//!     ├── registry.rs             # node kind <-> object type tag mapping
//!     ├── ids.rs                  # id generation (injected, so tests can
//!     │                             be deterministic)
//!     ├── category.rs             # section variant selection
//!     ├── object.rs               # persisted records + snapshot map
//!     ├── node.rs                 # the document tree + content models
//!     ├── decode.rs               # snapshot -> tree
//!     ├── encode.rs               # tree -> snapshot
//!     └── markup                  # fragment wire format
//!         ├── parser.rs
//!         └── serializer.rs
//!
//! Testing
//!     tests
//!     ├── lib.rs                  # registers the subdirectory mods
//!     ├── support/
//!     ├── decode/
//!     ├── encode/
//!     └── roundtrip/
//!
//!     Note that rust does not by default discover tests in subdirectories,
//!     so we need to include these in the mod.
//!
//! Core Algorithms
//!
//!     The hard part is reconstructing a tree from a flat, partially
//!     ordered, referentially linked collection of records, and writing it
//!     back without disturbing identity or order. Sections carry their
//!     ancestor chain (path) and an ordered element-id list; wrapper
//!     elements carry a single contained-object id; sibling order is a
//!     numeric priority assigned from one shared cursor on encode. See
//!     decode.rs and encode.rs for the two directions, and markup/ for the
//!     fragment format their content fields share.
//!
//! Library Choices
//!
//!     Markup parsing is offloaded to html5ever rather than hand-rolled;
//!     we only walk the DOM it produces. The canonical serializer is ours,
//!     because the round-trip law needs byte-stable output and a DOM
//!     round-trip does not give that. Records are serde types so the
//!     snapshot is plain JSON at the boundary.

pub mod category;
pub mod decode;
pub mod encode;
pub mod error;
pub mod ids;
pub mod markup;
pub mod node;
pub mod object;
pub mod registry;

pub use decode::Decoder;
pub use encode::encode;
pub use error::ModelError;
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use node::{Node, NodeKind};
pub use object::{Object, ObjectMap};
pub use registry::ObjectKind;
