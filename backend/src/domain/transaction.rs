//! Purchase transactions and their lifecycle.
//!
//! ```text
//! PURCHASED ──ship──▶ SHIPPED ──review──▶ COMPLETED | RECEIVED
//!     │                                        ▲
//!     ├──────────────review────────────────────┘
//!     └──cancel──▶ CANCELED
//! ```
//!
//! Status only moves forward. The methods on [`TransactionStatus`] compute
//! the target of a transition or explain why it is not allowed; the
//! repository then applies it with a compare-and-set on the prior status.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::item::UnknownStatusError;
use super::{Item, ItemId, Price, ReviewRole, TransactionId, UserId};

/// Maximum length, in characters, of a payment collaborator reference.
pub const PAYMENT_REFERENCE_MAX: usize = 255;

/// Lifecycle state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionStatus {
    /// Paid for; awaiting shipment.
    Purchased,
    /// Handed to the carrier by the seller.
    Shipped,
    /// Acknowledged by the counterparty.
    Received,
    /// Reviewed and closed.
    Completed,
    /// Abandoned before shipment.
    Canceled,
}

impl TransactionStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Purchased,
        Self::Shipped,
        Self::Received,
        Self::Completed,
        Self::Canceled,
    ];

    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Purchased => "PURCHASED",
            Self::Shipped => "SHIPPED",
            Self::Received => "RECEIVED",
            Self::Completed => "COMPLETED",
            Self::Canceled => "CANCELED",
        }
    }

    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Received | Self::Completed | Self::Canceled)
    }

    /// Target of a ship transition.
    pub const fn ship(self) -> Result<Self, TransitionError> {
        match self {
            Self::Purchased => Ok(Self::Shipped),
            Self::Shipped => Err(TransitionError::AlreadyShipped),
            other => Err(TransitionError::Closed { status: other }),
        }
    }

    /// Target of a review transition.
    pub const fn complete(self, completion: CompletionStatus) -> Result<Self, TransitionError> {
        if self.is_terminal() {
            return Err(TransitionError::Closed { status: self });
        }
        Ok(completion.status())
    }

    /// Target of a cancel transition.
    pub const fn cancel(self) -> Result<Self, TransitionError> {
        match self {
            Self::Purchased => Ok(Self::Canceled),
            Self::Shipped => Err(TransitionError::CancelAfterShipment),
            other => Err(TransitionError::Closed { status: other }),
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PURCHASED" => Ok(Self::Purchased),
            "SHIPPED" => Ok(Self::Shipped),
            "RECEIVED" => Ok(Self::Received),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELED" => Ok(Self::Canceled),
            other => Err(UnknownStatusError(other.to_owned())),
        }
    }
}

/// Reasons a transition is refused. All of them surface as conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Shipping twice.
    #[error("transaction has already been shipped")]
    AlreadyShipped,
    /// Canceling after the seller shipped.
    #[error("transaction cannot be canceled once shipped")]
    CancelAfterShipment,
    /// Any transition out of a terminal state.
    #[error("transaction is already {status}")]
    Closed {
        /// The terminal status the transaction is in.
        status: TransactionStatus,
    },
}

/// Terminal status a review moves the transaction into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionStatus {
    /// Reviewing closes the transaction.
    #[default]
    Completed,
    /// Reviewing acknowledges receipt.
    Received,
}

impl CompletionStatus {
    /// The transaction status this completion produces.
    #[must_use]
    pub const fn status(self) -> TransactionStatus {
        match self {
            Self::Completed => TransactionStatus::Completed,
            Self::Received => TransactionStatus::Received,
        }
    }
}

impl FromStr for CompletionStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "completed" => Ok(Self::Completed),
            "received" => Ok(Self::Received),
            _ => Err(UnknownStatusError(s.to_owned())),
        }
    }
}

/// Which of a user's transactions a listing includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionScope {
    /// Every transaction, whatever its status.
    #[default]
    All,
    /// Only transactions that can still change.
    Open,
}

impl TransactionScope {
    /// Whether a transaction in `status` belongs to this scope.
    #[must_use]
    pub const fn includes(self, status: TransactionStatus) -> bool {
        match self {
            Self::All => true,
            Self::Open => !status.is_terminal(),
        }
    }

    /// Statuses this scope admits.
    #[must_use]
    pub fn statuses(self) -> Vec<TransactionStatus> {
        TransactionStatus::ALL
            .into_iter()
            .filter(|status| self.includes(*status))
            .collect()
    }
}

impl FromStr for TransactionScope {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "open" => Ok(Self::Open),
            _ => Err(UnknownStatusError(s.to_owned())),
        }
    }
}

/// Input used to construct a [`Transaction`].
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    /// Transaction identifier.
    pub id: TransactionId,
    /// Item being bought.
    pub item_id: ItemId,
    /// Purchasing user.
    pub buyer_id: UserId,
    /// Item owner at the time of purchase.
    pub seller_id: UserId,
    /// Price captured at purchase.
    pub price_snapshot: Price,
    /// Current status.
    pub status: TransactionStatus,
    /// Opaque reference handed over by the payment collaborator.
    pub payment_reference: Option<String>,
    /// Purchase time.
    pub created_at: DateTime<Utc>,
}

/// A buyer/seller agreement over one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    id: TransactionId,
    item_id: ItemId,
    buyer_id: UserId,
    seller_id: UserId,
    price_snapshot: Price,
    status: TransactionStatus,
    payment_reference: Option<String>,
    created_at: DateTime<Utc>,
}

impl Transaction {
    /// Construct a transaction from its parts.
    #[must_use]
    pub fn new(draft: TransactionDraft) -> Self {
        Self {
            id: draft.id,
            item_id: draft.item_id,
            buyer_id: draft.buyer_id,
            seller_id: draft.seller_id,
            price_snapshot: draft.price_snapshot,
            status: draft.status,
            payment_reference: draft.payment_reference,
            created_at: draft.created_at,
        }
    }

    /// Transaction identifier.
    #[must_use]
    pub const fn id(&self) -> TransactionId {
        self.id
    }

    /// Item being bought.
    #[must_use]
    pub const fn item_id(&self) -> ItemId {
        self.item_id
    }

    /// Purchasing user.
    #[must_use]
    pub const fn buyer_id(&self) -> UserId {
        self.buyer_id
    }

    /// Selling user.
    #[must_use]
    pub const fn seller_id(&self) -> UserId {
        self.seller_id
    }

    /// Price captured at purchase.
    #[must_use]
    pub const fn price_snapshot(&self) -> Price {
        self.price_snapshot
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> TransactionStatus {
        self.status
    }

    /// Payment collaborator reference, if one was supplied.
    #[must_use]
    pub fn payment_reference(&self) -> Option<&str> {
        self.payment_reference.as_deref()
    }

    /// Purchase time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Role `user` plays in this transaction, if any.
    #[must_use]
    pub fn role_of(&self, user: &UserId) -> Option<ReviewRole> {
        if *user == self.buyer_id {
            Some(ReviewRole::Buyer)
        } else if *user == self.seller_id {
            Some(ReviewRole::Seller)
        } else {
            None
        }
    }

    /// The other party relative to `role`.
    #[must_use]
    pub const fn counterparty(&self, role: ReviewRole) -> UserId {
        match role {
            ReviewRole::Buyer => self.seller_id,
            ReviewRole::Seller => self.buyer_id,
        }
    }

    /// Copy of this transaction in a different status.
    #[must_use]
    pub fn with_status(&self, status: TransactionStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

/// A transaction together with the item it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDetail {
    /// The transaction.
    pub transaction: Transaction,
    /// The item as currently stored.
    pub item: Item,
}
