//! Domain layer: entities, validators, lifecycle services, and ports.
//!
//! Everything here is transport and datastore agnostic. The inbound HTTP
//! adapter and the Diesel persistence adapters depend on this module, never
//! the other way around.

pub mod doctype;
mod doctype_service;
pub mod document;
mod document_service;
pub mod error;
pub mod ports;
pub mod user;
mod user_service;
pub mod validation;

pub use self::doctype::{DocumentType, DocumentTypePatch, NewDocumentType};
pub use self::doctype_service::DocumentTypeService;
pub use self::document::{
    Document, DocumentDetails, DocumentPatch, DocumentStatus, NewDocumentRequest, UnknownStatus,
};
pub use self::document_service::DocumentService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::user::{NewUser, UnknownRole, User, UserPatch, UserRole};
pub use self::user_service::UserService;
