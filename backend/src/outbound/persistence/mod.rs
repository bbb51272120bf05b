//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the driven repository ports backed by
//! PostgreSQL via Diesel, with async support through `diesel-async` and
//! `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Atomic units**: multi-row changes run inside one database transaction
//!   and guard on the expected prior status in the `WHERE` clause.
//!
//! # Example
//!
//! ```ignore
//! use marketplace::outbound::persistence::{
//!     DbPool, DieselTransactionRepository, PoolConfig, run_migrations,
//! };
//!
//! run_migrations("postgres://localhost/market").await?;
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/market")).await?;
//! let repo = DieselTransactionRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_chat_message_repository;
mod diesel_community_post_repository;
mod diesel_notification_repository;
mod diesel_transaction_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_chat_message_repository::DieselChatMessageRepository;
pub use diesel_community_post_repository::DieselCommunityPostRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_transaction_repository::DieselTransactionRepository;
pub use migrations::run_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
