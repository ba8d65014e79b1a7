//! # Q&A Database Crate
//!
//! This crate is the only place that knows about SQL. It owns the
//! PostgreSQL connection pool and exposes the `questions` / `answers`
//! tables through the [`QaRepository`] trait.
//!
//! ## Architectural Principles
//!
//! - **One statement per operation:** every repository method issues exactly
//!   one parameterized statement. There are no transactions and no retries;
//!   atomicity of each call is the database's responsibility.
//! - **Opaque identifiers:** path ids are passed through as text and cast in
//!   SQL, so malformed ids are rejected by the database itself.
//! - **Injectable:** handlers hold an `Arc<dyn QaRepository>`, which lets tests
//!   substitute [`InMemoryRepository`] (feature `memory`) for Postgres.
//!
//! ## Public API
//!
//! - `connect`: builds the `PgPool` from `DatabaseSettings`.
//! - `DbRepository`: the Postgres implementation of `QaRepository`.
//! - `DbError`: the error type returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::connect;
pub use error::DbError;
#[cfg(any(test, feature = "memory"))]
pub use memory::InMemoryRepository;
pub use repository::{DbRepository, QaRepository};
