//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; regenerate with
//! `diesel print-schema` when the migrations change.

diesel::table! {
    /// Registered user accounts.
    users (user_id) {
        /// Primary key.
        user_id -> Int8,
        /// Unique login name.
        username -> Varchar,
        /// Unique contact address.
        email -> Varchar,
        /// Opaque credential; hashing happens before it reaches this layer.
        password_hash -> Varchar,
        /// One of: citizen, admin, employee.
        role -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Catalogue of requestable document kinds.
    document_types (doctype_id) {
        /// Primary key.
        doctype_id -> Int8,
        /// Unique display name.
        name -> Varchar,
        /// Optional free-text description.
        description -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Document requests linking a user to a document type.
    documents (document_id) {
        /// Primary key.
        document_id -> Int8,
        /// Owning user.
        user_id -> Int8,
        /// Requested document kind.
        doctype_id -> Int8,
        /// One of: pending, approved, rejected, in_progress.
        status -> Varchar,
        /// Server-assigned creation timestamp.
        request_date -> Timestamptz,
        /// Set when the request leaves the pending state; nullable.
        issue_date -> Nullable<Timestamptz>,
        /// Optional free-text notes.
        notes -> Nullable<Varchar>,
    }
}

diesel::joinable!(documents -> users (user_id));
diesel::joinable!(documents -> document_types (doctype_id));

diesel::allow_tables_to_appear_in_same_query!(documents, document_types, users);
