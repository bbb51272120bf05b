//! Strongly typed identifiers for marketplace entities.
//!
//! Every identifier wraps a UUID and serialises as its hyphenated string
//! form. Distinct types keep an item id from being passed where a
//! transaction id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raised when an identifier cannot be parsed from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} must be a valid UUID")]
pub struct InvalidIdError {
    kind: &'static str,
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Parse an identifier from its textual form.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, InvalidIdError> {
                Uuid::parse_str(raw.as_ref().trim())
                    .map(Self)
                    .map_err(|_| InvalidIdError { kind: $kind })
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_id!(
    /// Stable user identifier issued by the identity provider.
    UserId,
    "user id"
);
define_id!(
    /// Identifier of a listed item.
    ItemId,
    "item id"
);
define_id!(
    /// Identifier of a purchase transaction.
    TransactionId,
    "transaction id"
);
define_id!(
    /// Identifier of a transaction review.
    ReviewId,
    "review id"
);
define_id!(
    /// Identifier of a stored notification.
    NotificationId,
    "notification id"
);
define_id!(
    /// Identifier of a direct chat message.
    ChatMessageId,
    "chat message id"
);
define_id!(
    /// Identifier of a community.
    CommunityId,
    "community id"
);
define_id!(
    /// Identifier of a post made in a community.
    CommunityPostId,
    "community post id"
);
define_id!(
    /// Identifier of a single live push connection.
    ///
    /// Two connections for the same user never share an id, which lets a
    /// closing connection avoid evicting its replacement.
    ConnectionId,
    "connection id"
);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6 ")]
    fn parses_hyphenated_uuids(#[case] raw: &str) {
        let id = UserId::new(raw).expect("valid user id");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[test]
    fn rejection_names_the_identifier_kind() {
        let err = TransactionId::new("abc").expect_err("invalid id");
        assert_eq!(err.to_string(), "transaction id must be a valid UUID");
    }

    #[test]
    fn serialises_as_a_plain_string() {
        let id = ItemId::from_uuid(Uuid::nil());
        let value = serde_json::to_value(id).expect("serialise id");
        assert_eq!(value, serde_json::json!("00000000-0000-0000-0000-000000000000"));
    }

    #[test]
    fn random_ids_are_distinct() {
        assert_ne!(ConnectionId::random(), ConnectionId::random());
    }
}
