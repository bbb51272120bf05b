//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: in-process repositories used when no database is configured
//!
//! Adapters are thin translators between domain types and storage
//! representations. They contain no business logic beyond the atomicity and
//! compare-and-set guarantees the repository ports promise.

pub mod memory;
pub mod persistence;
