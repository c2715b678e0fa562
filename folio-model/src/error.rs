//! Error types for decode and encode passes.
//!
//! Only data-integrity conditions are errors: a snapshot or tree that is not
//! a valid instance of the schema aborts the whole pass. Dangling references
//! are not represented here at all; they are recovered locally with
//! placeholder nodes during decode.

use thiserror::Error;

/// Fatal error raised while decoding a snapshot or encoding a tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A decoded section's assembled children do not satisfy the section
    /// content model (title, then elements, then subsections).
    #[error("invalid content for section {0}")]
    InvalidSectionContent(String),

    /// An element's `containedObjectID` resolved to an object of the wrong
    /// type (e.g. a table element pointing at a paragraph).
    #[error("element {element} contains {target}, which is not a valid contained object")]
    ContainedObjectMismatch { element: String, target: String },

    /// A list element carries a list style outside the known set.
    #[error("unknown list style '{style}' on {id}")]
    UnknownListStyle { id: String, style: String },

    /// The encoder was asked to emit a node kind that has no persisted form.
    #[error("unhandled model: {0}")]
    UnhandledNode(&'static str),

    /// A markup fragment could not be interpreted as the expected block.
    #[error("markup error: {0}")]
    Markup(String),
}
