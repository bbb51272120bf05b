//! Purchase lifecycle service.
//!
//! Validates each request against the current transaction, computes the
//! target status, and hands the repository a compare-and-set transition so
//! a concurrent change surfaces as a conflict instead of being overwritten.
//! Events are dispatched only after the transition is stored; a failed
//! dispatch is logged and does not undo the transition.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use super::ports::{
    CreatePurchaseRequest, EventDispatch, ItemEffect, ListTransactionsRequest, PostReviewRequest,
    PurchaseRecord, StatusTransition, TransactionActionRequest, TransactionCommand,
    TransactionQuery, TransactionRepository, TransactionRepositoryError,
};
use super::{
    CompletionStatus, DomainEvent, Error, PAYMENT_REFERENCE_MAX, Rating, Review, ReviewDraft,
    ReviewId, ReviewRole, TransactionDetail, TransactionId, TransactionStatus, TransitionError,
};

/// Drives transactions through their lifecycle.
#[derive(Clone)]
pub struct TransactionService<R> {
    repository: Arc<R>,
    events: Arc<dyn EventDispatch>,
    clock: Arc<dyn Clock>,
    completion: CompletionStatus,
}

impl<R> TransactionService<R>
where
    R: TransactionRepository,
{
    /// Create a service completing reviewed transactions as `COMPLETED`.
    pub fn new(repository: Arc<R>, events: Arc<dyn EventDispatch>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            events,
            clock,
            completion: CompletionStatus::default(),
        }
    }

    /// Choose the status a review moves a transaction into.
    #[must_use]
    pub const fn with_completion(mut self, completion: CompletionStatus) -> Self {
        self.completion = completion;
        self
    }

    async fn load(&self, transaction_id: &TransactionId) -> Result<TransactionDetail, Error> {
        self.repository
            .find_transaction(transaction_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| transaction_not_found(transaction_id))
    }

    /// Load a transaction the actor is a party to, hiding others.
    async fn load_for_party(
        &self,
        request: &TransactionActionRequest,
    ) -> Result<(TransactionDetail, ReviewRole), Error> {
        let detail = self.load(&request.transaction_id).await?;
        let role = detail
            .transaction
            .role_of(&request.actor_id)
            .ok_or_else(|| transaction_not_found(&request.transaction_id))?;
        Ok((detail, role))
    }

    async fn transition(&self, transition: StatusTransition) -> Result<TransactionDetail, Error> {
        self.repository
            .apply_transition(&transition)
            .await
            .map_err(map_repository_error)
    }

    async fn notify(&self, event: DomainEvent) {
        let kind = event.kind();
        let recipient = event.recipient();
        if let Err(error) = self.events.dispatch(event).await {
            warn!(
                %recipient,
                %kind,
                code = ?error.code(),
                %error,
                "failed to dispatch transaction event"
            );
        }
    }
}

#[async_trait]
impl<R> TransactionCommand for TransactionService<R>
where
    R: TransactionRepository,
{
    async fn create_purchase(&self, request: CreatePurchaseRequest) -> Result<TransactionDetail, Error> {
        let item = self
            .repository
            .find_item(&request.item_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("item {} not found", request.item_id)))?;
        if item.seller_id() == request.buyer_id {
            return Err(Error::invalid_request("you cannot purchase your own item"));
        }
        if !item.is_on_sale() {
            return Err(Error::conflict("item is no longer on sale"));
        }

        let payment_reference = request
            .payment_reference
            .filter(|reference| !reference.trim().is_empty());
        if let Some(reference) = &payment_reference {
            let length = reference.chars().count();
            if length > PAYMENT_REFERENCE_MAX {
                return Err(Error::invalid_request(format!(
                    "payment reference must be at most {PAYMENT_REFERENCE_MAX} characters"
                ))
                .with_details(serde_json::json!({
                    "field": "paymentReference",
                    "length": length,
                })));
            }
        }

        let record = PurchaseRecord {
            transaction_id: TransactionId::random(),
            item_id: request.item_id,
            buyer_id: request.buyer_id,
            payment_reference,
            created_at: self.clock.utc(),
        };
        let detail = self
            .repository
            .purchase(&record)
            .await
            .map_err(map_repository_error)?;
        info!(
            transaction_id = %detail.transaction.id(),
            item_id = %detail.item.id(),
            buyer_id = %request.buyer_id,
            "item purchased"
        );

        self.notify(DomainEvent::ItemSold {
            seller_id: detail.transaction.seller_id(),
            item_id: detail.item.id(),
            item_title: detail.item.title().to_owned(),
        })
        .await;
        Ok(detail)
    }

    async fn mark_shipped(&self, request: TransactionActionRequest) -> Result<TransactionDetail, Error> {
        let (current, role) = self.load_for_party(&request).await?;
        if role != ReviewRole::Seller {
            return Err(Error::forbidden("only the seller can mark a transaction as shipped"));
        }
        let from = current.transaction.status();
        let to = from.ship().map_err(map_transition_error)?;

        let detail = self
            .transition(StatusTransition {
                transaction_id: request.transaction_id,
                from,
                to,
                item_effect: ItemEffect::Keep,
                review: None,
                at: self.clock.utc(),
            })
            .await?;
        info!(transaction_id = %request.transaction_id, "transaction shipped");

        self.notify(DomainEvent::ItemShipped {
            buyer_id: detail.transaction.buyer_id(),
            item_id: detail.item.id(),
            item_title: detail.item.title().to_owned(),
        })
        .await;
        Ok(detail)
    }

    async fn post_review(&self, request: PostReviewRequest) -> Result<TransactionDetail, Error> {
        let rating = Rating::new(request.rating).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(serde_json::json!({ "field": "rating", "value": request.rating }))
        })?;
        let (current, actual_role) = self
            .load_for_party(&TransactionActionRequest {
                transaction_id: request.transaction_id,
                actor_id: request.rater_id,
            })
            .await?;
        if actual_role != request.role {
            return Err(Error::invalid_request(format!(
                "you are the {} in this transaction",
                actual_role.as_str().to_ascii_lowercase()
            ))
            .with_details(serde_json::json!({ "field": "role", "value": request.role.as_str() })));
        }
        let from = current.transaction.status();
        let to = from
            .complete(self.completion)
            .map_err(map_transition_error)?;
        let reviewed_at = self.clock.utc();
        let review = Review::new(ReviewDraft {
            id: ReviewId::random(),
            transaction_id: request.transaction_id,
            rater_id: request.rater_id,
            rating,
            comment: request.comment,
            role: actual_role,
            created_at: reviewed_at,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        let detail = self
            .transition(StatusTransition {
                transaction_id: request.transaction_id,
                from,
                to,
                item_effect: ItemEffect::Keep,
                review: Some(review),
                at: reviewed_at,
            })
            .await?;
        info!(
            transaction_id = %request.transaction_id,
            status = %to,
            "transaction reviewed"
        );

        let recipient = detail.transaction.counterparty(actual_role);
        let item_id = detail.item.id();
        let item_title = detail.item.title().to_owned();
        let event = match self.completion {
            CompletionStatus::Completed => DomainEvent::TransactionCompleted {
                recipient,
                item_id,
                item_title,
            },
            CompletionStatus::Received => DomainEvent::TransactionReceived {
                recipient,
                item_id,
                item_title,
            },
        };
        self.notify(event).await;
        Ok(detail)
    }

    async fn cancel(&self, request: TransactionActionRequest) -> Result<TransactionDetail, Error> {
        let (current, _) = self.load_for_party(&request).await?;
        let from = current.transaction.status();
        let to = from.cancel().map_err(map_transition_error)?;

        let detail = self
            .transition(StatusTransition {
                transaction_id: request.transaction_id,
                from,
                to,
                item_effect: ItemEffect::Relist,
                review: None,
                at: self.clock.utc(),
            })
            .await?;
        info!(
            transaction_id = %request.transaction_id,
            canceled_by = %request.actor_id,
            "transaction canceled"
        );

        self.notify(DomainEvent::TransactionCanceled {
            seller_id: detail.transaction.seller_id(),
            item_id: detail.item.id(),
            item_title: detail.item.title().to_owned(),
        })
        .await;
        Ok(detail)
    }
}

#[async_trait]
impl<R> TransactionQuery for TransactionService<R>
where
    R: TransactionRepository,
{
    async fn get_transaction(&self, request: TransactionActionRequest) -> Result<TransactionDetail, Error> {
        self.load_for_party(&request).await.map(|(detail, _)| detail)
    }

    async fn list_for_user(
        &self,
        request: ListTransactionsRequest,
    ) -> Result<Vec<TransactionDetail>, Error> {
        self.repository
            .list_for_user(&request.user_id, request.scope, request.limit)
            .await
            .map_err(map_repository_error)
    }
}

fn transaction_not_found(transaction_id: &TransactionId) -> Error {
    Error::not_found(format!("transaction {transaction_id} not found"))
}

fn map_transition_error(error: TransitionError) -> Error {
    let status = match error {
        TransitionError::AlreadyShipped | TransitionError::CancelAfterShipment => {
            TransactionStatus::Shipped
        }
        TransitionError::Closed { status } => status,
    };
    Error::conflict(error.to_string()).with_details(serde_json::json!({ "status": status.as_str() }))
}

pub(crate) fn map_repository_error(error: TransactionRepositoryError) -> Error {
    match error {
        TransactionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("transaction store unavailable: {message}"))
        }
        TransactionRepositoryError::Query { message } => {
            Error::internal(format!("transaction store error: {message}"))
        }
        err @ (TransactionRepositoryError::ItemNotFound { .. }
        | TransactionRepositoryError::TransactionNotFound { .. }) => Error::not_found(err.to_string()),
        TransactionRepositoryError::ItemUnavailable { .. } => {
            Error::conflict("item is no longer on sale")
        }
        err @ (TransactionRepositoryError::StatusChanged { .. }
        | TransactionRepositoryError::ReviewExists { .. }) => Error::conflict(err.to_string()),
    }
}

#[cfg(test)]
#[path = "transaction_service_tests.rs"]
mod tests;
