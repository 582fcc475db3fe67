//! Link entity representing a slug → destination mapping.

use chrono::{DateTime, Utc};

/// A redirect mapping.
///
/// `slug` is the identity and never changes; `destination` and `description`
/// are replaced together on upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub slug: String,
    pub destination: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        slug: String,
        destination: String,
        description: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            slug,
            destination,
            description,
            created_at,
            updated_at,
        }
    }

    /// Returns true if the mapping has been overwritten since creation.
    pub fn was_updated(&self) -> bool {
        self.updated_at > self.created_at
    }
}

/// Input data for an upsert, already validated and normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub slug: String,
    pub destination: String,
    pub description: Option<String>,
}
