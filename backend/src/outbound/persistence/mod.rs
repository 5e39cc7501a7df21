//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` with `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types; business logic stays in the lifecycle services.
//! - **Internal models**: row structs (`models.rs`) and schema definitions
//!   (`schema.rs`) never leak to the domain layer.
//! - **Strongly typed errors**: datastore failures are classified
//!   (`error_mapping.rs`) and mapped to the port error enums; unique and
//!   foreign key violations keep their meaning so services can report
//!   conflicts and referential blocks even when a concurrent writer races a
//!   validation read.

mod diesel_doctype_repository;
mod diesel_document_repository;
mod diesel_user_repository;
mod error_mapping;
mod models;
mod pool;
mod schema;

pub use diesel_doctype_repository::DieselDocumentTypeRepository;
pub use diesel_document_repository::DieselDocumentRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
