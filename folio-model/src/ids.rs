//! Identifier generation.
//!
//! Ids are `"<Tag>:<suffix>"` where the tag comes from the object registry.
//! Generation is behind a trait so the decoder can be handed a deterministic
//! source in tests instead of reaching for ambient randomness.

use std::cell::Cell;

use uuid::Uuid;

use crate::registry::ObjectKind;

/// Source of fresh, globally unique object ids.
pub trait IdGenerator {
    fn generate(&self, kind: ObjectKind) -> String;
}

/// Production generator: a random 128-bit UUID suffix, upper-cased.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn generate(&self, kind: ObjectKind) -> String {
        format!(
            "{}:{}",
            kind.tag(),
            Uuid::new_v4().to_string().to_uppercase()
        )
    }
}

/// Deterministic generator for tests and tooling: `"<Tag>:gen-N"`.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: Cell<u64>,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn generate(&self, kind: ObjectKind) -> String {
        let n = self.next.get();
        self.next.set(n + 1);
        format!("{}:gen-{n}", kind.tag())
    }
}

/// Split an id into its `(tag, suffix)` halves at the first colon.
pub fn split_id(id: &str) -> Option<(&str, &str)> {
    id.split_once(':')
}
