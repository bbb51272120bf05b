//! Listed items and their availability flag.

use std::fmt;
use std::str::FromStr;

use super::{ItemId, UserId};

/// Maximum number of characters allowed in an item title.
pub const ITEM_TITLE_MAX: usize = 255;

/// Availability of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemStatus {
    /// Listed and purchasable.
    OnSale,
    /// Bound to a live or completed transaction.
    SoldOrInProgress,
    /// Not yet published by the seller.
    Draft,
}

impl ItemStatus {
    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnSale => "ON_SALE",
            Self::SoldOrInProgress => "SOLD_OR_IN_PROGRESS",
            Self::Draft => "DRAFT",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatusError(pub String);

impl FromStr for ItemStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ON_SALE" => Ok(Self::OnSale),
            "SOLD_OR_IN_PROGRESS" => Ok(Self::SoldOrInProgress),
            "DRAFT" => Ok(Self::Draft),
            other => Err(UnknownStatusError(other.to_owned())),
        }
    }
}

/// Price in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(i64);

/// Validation errors for item fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemValidationError {
    /// Prices cannot be negative.
    #[error("price must not be negative")]
    NegativePrice,
    /// Titles cannot be blank.
    #[error("item title must not be empty")]
    EmptyTitle,
    /// Titles are capped at [`ITEM_TITLE_MAX`] characters.
    #[error("item title must be at most {max} characters")]
    TitleTooLong {
        /// The limit that was exceeded.
        max: usize,
    },
}

impl Price {
    /// Validate a price amount.
    pub const fn new(minor_units: i64) -> Result<Self, ItemValidationError> {
        if minor_units < 0 {
            return Err(ItemValidationError::NegativePrice);
        }
        Ok(Self(minor_units))
    }

    /// Amount in minor currency units.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }
}

/// Input used to construct an [`Item`].
#[derive(Debug, Clone)]
pub struct ItemDraft {
    /// Item identifier.
    pub id: ItemId,
    /// Owner of the listing.
    pub seller_id: UserId,
    /// Display title, used in notification content.
    pub title: String,
    /// Current asking price.
    pub price: Price,
    /// Availability.
    pub status: ItemStatus,
}

/// A listed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    seller_id: UserId,
    title: String,
    price: Price,
    status: ItemStatus,
}

impl Item {
    /// Validate and construct an item.
    pub fn new(draft: ItemDraft) -> Result<Self, ItemValidationError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(ItemValidationError::EmptyTitle);
        }
        if title.chars().count() > ITEM_TITLE_MAX {
            return Err(ItemValidationError::TitleTooLong {
                max: ITEM_TITLE_MAX,
            });
        }
        Ok(Self {
            id: draft.id,
            seller_id: draft.seller_id,
            title: title.to_owned(),
            price: draft.price,
            status: draft.status,
        })
    }

    /// Item identifier.
    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.id
    }

    /// Seller who owns the listing.
    #[must_use]
    pub const fn seller_id(&self) -> UserId {
        self.seller_id
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current asking price.
    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    /// Availability.
    #[must_use]
    pub const fn status(&self) -> ItemStatus {
        self.status
    }

    /// Whether the item can be purchased right now.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.status == ItemStatus::OnSale
    }

    /// Copy of this item with a different availability.
    #[must_use]
    pub fn with_status(&self, status: ItemStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}
