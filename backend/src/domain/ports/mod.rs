//! Driven ports: repository traits implemented by persistence adapters.
//!
//! Lifecycle services depend on these traits only, so tests can substitute
//! in-memory fakes and the HTTP layer never sees Diesel types.

mod doctype_repository;
mod document_repository;
pub(crate) mod macros;
mod user_repository;

pub(crate) use macros::define_port_error;

pub use doctype_repository::{DocumentTypeRepository, DocumentTypeRepositoryError};
pub use document_repository::{DocumentRepository, DocumentRepositoryError};
pub use user_repository::{UserRepository, UserRepositoryError};
