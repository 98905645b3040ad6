//! ID generation utilities.

use ulid::Ulid;
use uuid::Uuid;

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are:
    /// - Lexicographically sortable
    /// - Monotonically increasing within the same millisecond
    /// - Shorter than UUIDs when represented as strings
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate an opaque random access token.
    #[must_use]
    pub fn generate_token(&self) -> String {
        // UUID v4 for tokens (no time component)
        Uuid::new_v4().simple().to_string()
    }
}
