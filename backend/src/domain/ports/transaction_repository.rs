//! Driven port for items, transactions, and reviews.
//!
//! Every method that changes more than one row is a single atomic unit:
//! either all of its effects become visible or none do.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::define_port_error;
use crate::domain::{
    Item, ItemId, PageLimit, Review, TransactionDetail, TransactionId, TransactionScope,
    TransactionStatus, UserId,
};

define_port_error! {
    /// Errors raised when persisting transactions.
    pub enum TransactionRepositoryError {
        Connection { message: String } => "transaction store connection failed: {message}",
        Query { message: String } => "transaction store query failed: {message}",
        ItemNotFound { item_id: ItemId } => "item {item_id} does not exist",
        ItemUnavailable { item_id: ItemId } => "item {item_id} is not on sale",
        TransactionNotFound { transaction_id: TransactionId } =>
            "transaction {transaction_id} does not exist",
        StatusChanged { transaction_id: TransactionId, expected: TransactionStatus } =>
            "transaction {transaction_id} is no longer {expected}",
        ReviewExists { transaction_id: TransactionId } =>
            "transaction {transaction_id} has already been reviewed",
    }
}

/// Everything needed to open a transaction on an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRecord {
    /// Identifier for the new transaction.
    pub transaction_id: TransactionId,
    /// Item being bought.
    pub item_id: ItemId,
    /// Purchasing user.
    pub buyer_id: UserId,
    /// Opaque payment collaborator reference.
    pub payment_reference: Option<String>,
    /// Purchase time.
    pub created_at: DateTime<Utc>,
}

/// What happens to the item when a transition is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemEffect {
    /// The item stays bound to the transaction.
    Keep,
    /// The item goes back on sale.
    Relist,
}

/// A compare-and-set status change applied as one atomic unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    /// Transaction to change.
    pub transaction_id: TransactionId,
    /// Status the transaction must still be in.
    pub from: TransactionStatus,
    /// Status to move to.
    pub to: TransactionStatus,
    /// Effect on the item.
    pub item_effect: ItemEffect,
    /// Review inserted alongside the status change.
    pub review: Option<Review>,
    /// When the change takes effect; stored as the transaction's
    /// `updated_at`.
    pub at: DateTime<Utc>,
}

/// Persistence for the purchase lifecycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Fetch an item by id.
    async fn find_item(&self, item_id: &ItemId) -> Result<Option<Item>, TransactionRepositoryError>;

    /// Flip an on-sale item away from sale and insert a PURCHASED
    /// transaction capturing its price.
    ///
    /// Fails with `ItemUnavailable` when the item is no longer on sale at
    /// the moment of the flip.
    async fn purchase(
        &self,
        record: &PurchaseRecord,
    ) -> Result<TransactionDetail, TransactionRepositoryError>;

    /// Fetch a transaction and its item.
    async fn find_transaction(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<Option<TransactionDetail>, TransactionRepositoryError>;

    /// Transactions `user_id` bought or sold within `scope`, newest first,
    /// each with its item.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        scope: TransactionScope,
        limit: PageLimit,
    ) -> Result<Vec<TransactionDetail>, TransactionRepositoryError>;

    /// Apply a status change if the transaction is still in `from`.
    ///
    /// Fails with `StatusChanged` when another transition won the race and
    /// with `ReviewExists` when the transaction already carries a review.
    async fn apply_transition(
        &self,
        transition: &StatusTransition,
    ) -> Result<TransactionDetail, TransactionRepositoryError>;
}
