//! Document type catalogue model.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A catalogue entry describing a kind of document citizens can request.
///
/// ## Invariants
/// - `name` is globally unique and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DocumentType {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Validated input for creating a document type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocumentType {
    pub name: String,
    pub description: Option<String>,
}

/// Merge-patch input for updating a document type. `None` leaves the stored
/// value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentTypePatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl DocumentTypePatch {
    /// Whether the patch carries no changes at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}
