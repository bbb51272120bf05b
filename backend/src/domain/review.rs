//! Reviews that close a transaction.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::item::UnknownStatusError;
use super::{ReviewId, TransactionId, UserId};

/// Maximum number of characters in a review comment.
pub const REVIEW_COMMENT_MAX: usize = 1000;

/// Validation errors for review fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewValidationError {
    /// Ratings are whole stars from 1 to 5.
    #[error("rating must be between 1 and 5, got {value}")]
    RatingOutOfRange {
        /// Rejected value.
        value: i64,
    },
    /// Comments are capped at [`REVIEW_COMMENT_MAX`] characters.
    #[error("comment must be at most {max} characters")]
    CommentTooLong {
        /// The limit that was exceeded.
        max: usize,
    },
}

/// Star rating from 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u8);

impl Rating {
    /// Validate a rating.
    pub fn new(value: i64) -> Result<Self, ReviewValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|stars| (1..=5).contains(stars))
            .map(Self)
            .ok_or(ReviewValidationError::RatingOutOfRange { value })
    }

    /// Number of stars.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// Side of the transaction the reviewer is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewRole {
    /// Reviewer bought the item.
    Buyer,
    /// Reviewer sold the item.
    Seller,
}

impl ReviewRole {
    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buyer => "BUYER",
            Self::Seller => "SELLER",
        }
    }
}

impl fmt::Display for ReviewRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewRole {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUYER" => Ok(Self::Buyer),
            "SELLER" => Ok(Self::Seller),
            other => Err(UnknownStatusError(other.to_owned())),
        }
    }
}

/// Input used to construct a [`Review`].
#[derive(Debug, Clone)]
pub struct ReviewDraft {
    /// Review identifier.
    pub id: ReviewId,
    /// Reviewed transaction.
    pub transaction_id: TransactionId,
    /// Author of the review.
    pub rater_id: UserId,
    /// Star rating.
    pub rating: Rating,
    /// Free text; may be empty.
    pub comment: String,
    /// Side the author is on.
    pub role: ReviewRole,
    /// Submission time.
    pub created_at: DateTime<Utc>,
}

/// A review attached one-to-one to a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    id: ReviewId,
    transaction_id: TransactionId,
    rater_id: UserId,
    rating: Rating,
    comment: String,
    role: ReviewRole,
    created_at: DateTime<Utc>,
}

impl Review {
    /// Validate and construct a review.
    pub fn new(draft: ReviewDraft) -> Result<Self, ReviewValidationError> {
        let comment = draft.comment.trim();
        if comment.chars().count() > REVIEW_COMMENT_MAX {
            return Err(ReviewValidationError::CommentTooLong {
                max: REVIEW_COMMENT_MAX,
            });
        }
        Ok(Self {
            id: draft.id,
            transaction_id: draft.transaction_id,
            rater_id: draft.rater_id,
            rating: draft.rating,
            comment: comment.to_owned(),
            role: draft.role,
            created_at: draft.created_at,
        })
    }

    /// Review identifier.
    #[must_use]
    pub const fn id(&self) -> ReviewId {
        self.id
    }

    /// Reviewed transaction.
    #[must_use]
    pub const fn transaction_id(&self) -> TransactionId {
        self.transaction_id
    }

    /// Author of the review.
    #[must_use]
    pub const fn rater_id(&self) -> UserId {
        self.rater_id
    }

    /// Star rating.
    #[must_use]
    pub const fn rating(&self) -> Rating {
        self.rating
    }

    /// Free text.
    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Side the author is on.
    #[must_use]
    pub const fn role(&self) -> ReviewRole {
        self.role
    }

    /// Submission time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
