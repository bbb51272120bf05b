//! Driving ports for the purchase lifecycle.

use async_trait::async_trait;

use crate::domain::{
    Error, ItemId, PageLimit, ReviewRole, TransactionDetail, TransactionId, TransactionScope,
    UserId,
};

/// Open a transaction on an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePurchaseRequest {
    /// Item to buy.
    pub item_id: ItemId,
    /// Purchasing user.
    pub buyer_id: UserId,
    /// Opaque payment collaborator reference.
    pub payment_reference: Option<String>,
}

/// Identify a transaction and the user acting on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionActionRequest {
    /// Transaction to act on.
    pub transaction_id: TransactionId,
    /// Authenticated caller.
    pub actor_id: UserId,
}

/// List the caller's purchases and sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListTransactionsRequest {
    /// Authenticated caller; matched as buyer or seller.
    pub user_id: UserId,
    /// Whether closed transactions are included.
    pub scope: TransactionScope,
    /// Page size.
    pub limit: PageLimit,
}

/// Review a transaction and close it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostReviewRequest {
    /// Transaction being reviewed.
    pub transaction_id: TransactionId,
    /// Authenticated reviewer.
    pub rater_id: UserId,
    /// Raw star rating; validated by the service.
    pub rating: i64,
    /// Free text.
    pub comment: String,
    /// Side the reviewer claims to be on.
    pub role: ReviewRole,
}

/// State-changing operations on transactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionCommand: Send + Sync {
    /// Buy an on-sale item. Concurrent purchases of one item yield exactly
    /// one success.
    async fn create_purchase(&self, request: CreatePurchaseRequest) -> Result<TransactionDetail, Error>;

    /// Seller marks a PURCHASED transaction as shipped.
    async fn mark_shipped(&self, request: TransactionActionRequest) -> Result<TransactionDetail, Error>;

    /// A party reviews the transaction, closing it.
    async fn post_review(&self, request: PostReviewRequest) -> Result<TransactionDetail, Error>;

    /// A party cancels a PURCHASED transaction and the item is relisted.
    async fn cancel(&self, request: TransactionActionRequest) -> Result<TransactionDetail, Error>;
}

/// Read access to transactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionQuery: Send + Sync {
    /// Fetch a transaction visible to the caller.
    ///
    /// Transactions the caller is not a party to are reported as missing.
    async fn get_transaction(&self, request: TransactionActionRequest) -> Result<TransactionDetail, Error>;

    /// Transactions where the caller is buyer or seller, newest first.
    async fn list_for_user(
        &self,
        request: ListTransactionsRequest,
    ) -> Result<Vec<TransactionDetail>, Error>;
}
