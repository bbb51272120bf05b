//! In-process items, transactions, and reviews.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{
    ItemEffect, PurchaseRecord, StatusTransition, TransactionRepository,
    TransactionRepositoryError,
};
use crate::domain::{
    Item, ItemId, ItemStatus, PageLimit, Review, Transaction, TransactionDetail, TransactionDraft,
    TransactionId, TransactionScope, TransactionStatus, UserId,
};

#[derive(Default)]
struct MarketTables {
    items: HashMap<ItemId, Item>,
    transactions: HashMap<TransactionId, Transaction>,
    reviews: HashMap<TransactionId, Review>,
}

impl MarketTables {
    fn detail(&self, transaction: Transaction) -> Result<TransactionDetail, TransactionRepositoryError> {
        let item = self
            .items
            .get(&transaction.item_id())
            .cloned()
            .ok_or_else(|| TransactionRepositoryError::item_not_found(transaction.item_id()))?;
        Ok(TransactionDetail { transaction, item })
    }
}

/// Transaction repository backed by process memory.
#[derive(Default)]
pub struct InMemoryMarketStore {
    tables: Mutex<MarketTables>,
}

impl InMemoryMarketStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a listed item.
    pub async fn insert_item(&self, item: Item) {
        self.tables.lock().await.items.insert(item.id(), item);
    }

    /// Review attached to a transaction, if any.
    pub async fn review_for(&self, transaction_id: &TransactionId) -> Option<Review> {
        self.tables.lock().await.reviews.get(transaction_id).cloned()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryMarketStore {
    async fn find_item(&self, item_id: &ItemId) -> Result<Option<Item>, TransactionRepositoryError> {
        Ok(self.tables.lock().await.items.get(item_id).cloned())
    }

    async fn purchase(
        &self,
        record: &PurchaseRecord,
    ) -> Result<TransactionDetail, TransactionRepositoryError> {
        let mut tables = self.tables.lock().await;
        let item = tables
            .items
            .get(&record.item_id)
            .ok_or_else(|| TransactionRepositoryError::item_not_found(record.item_id))?;
        if !item.is_on_sale() {
            return Err(TransactionRepositoryError::item_unavailable(record.item_id));
        }

        let sold = item.with_status(ItemStatus::SoldOrInProgress);
        let transaction = Transaction::new(TransactionDraft {
            id: record.transaction_id,
            item_id: record.item_id,
            buyer_id: record.buyer_id,
            seller_id: sold.seller_id(),
            price_snapshot: sold.price(),
            status: TransactionStatus::Purchased,
            payment_reference: record.payment_reference.clone(),
            created_at: record.created_at,
        });
        tables.items.insert(sold.id(), sold.clone());
        tables
            .transactions
            .insert(transaction.id(), transaction.clone());
        Ok(TransactionDetail {
            transaction,
            item: sold,
        })
    }

    async fn find_transaction(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<Option<TransactionDetail>, TransactionRepositoryError> {
        let tables = self.tables.lock().await;
        tables
            .transactions
            .get(transaction_id)
            .cloned()
            .map(|transaction| tables.detail(transaction))
            .transpose()
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        scope: TransactionScope,
        limit: PageLimit,
    ) -> Result<Vec<TransactionDetail>, TransactionRepositoryError> {
        let tables = self.tables.lock().await;
        let mut mine: Vec<&Transaction> = tables
            .transactions
            .values()
            .filter(|tx| tx.role_of(user_id).is_some() && scope.includes(tx.status()))
            .collect();
        mine.sort_by_key(|tx| std::cmp::Reverse((tx.created_at(), tx.id())));
        mine.into_iter()
            .take(limit.get())
            .map(|tx| tables.detail(tx.clone()))
            .collect()
    }

    async fn apply_transition(
        &self,
        transition: &StatusTransition,
    ) -> Result<TransactionDetail, TransactionRepositoryError> {
        let mut tables = self.tables.lock().await;
        let current = tables
            .transactions
            .get(&transition.transaction_id)
            .ok_or_else(|| TransactionRepositoryError::transaction_not_found(transition.transaction_id))?;
        if current.status() != transition.from {
            return Err(TransactionRepositoryError::status_changed(
                transition.transaction_id,
                transition.from,
            ));
        }
        if transition.review.is_some() && tables.reviews.contains_key(&transition.transaction_id) {
            return Err(TransactionRepositoryError::review_exists(
                transition.transaction_id,
            ));
        }

        let updated = current.with_status(transition.to);
        if transition.item_effect == ItemEffect::Relist {
            let relisted = tables
                .items
                .get(&updated.item_id())
                .map(|item| item.with_status(ItemStatus::OnSale))
                .ok_or_else(|| TransactionRepositoryError::item_not_found(updated.item_id()))?;
            tables.items.insert(relisted.id(), relisted);
        }
        if let Some(review) = &transition.review {
            tables.reviews.insert(review.transaction_id(), review.clone());
        }
        tables.transactions.insert(updated.id(), updated.clone());
        tables.detail(updated)
    }
}
