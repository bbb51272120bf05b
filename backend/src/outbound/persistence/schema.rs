//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Listed items and their availability.
    items (id) {
        id -> Uuid,
        seller_id -> Uuid,
        title -> Varchar,
        /// Asking price in minor currency units.
        price_minor -> Int8,
        /// One of `ON_SALE`, `SOLD_OR_IN_PROGRESS`, `DRAFT`.
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Purchase transactions. A partial unique index on `item_id` keeps at
    /// most one non-terminal transaction per item.
    transactions (id) {
        id -> Uuid,
        item_id -> Uuid,
        buyer_id -> Uuid,
        seller_id -> Uuid,
        price_snapshot_minor -> Int8,
        status -> Varchar,
        payment_reference -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reviews, at most one per transaction.
    reviews (id) {
        id -> Uuid,
        transaction_id -> Uuid,
        rater_id -> Uuid,
        rating -> Int2,
        comment -> Text,
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only notification log.
    notifications (id) {
        id -> Uuid,
        user_id -> Uuid,
        kind -> Varchar,
        content -> Text,
        related_id -> Uuid,
        is_read -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Direct messages between users.
    chat_messages (id) {
        id -> Uuid,
        sender_id -> Uuid,
        receiver_id -> Uuid,
        content -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Posts on community boards.
    community_posts (id) {
        id -> Uuid,
        community_id -> Uuid,
        author_id -> Uuid,
        content -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(transactions -> items (item_id));
diesel::joinable!(reviews -> transactions (transaction_id));

diesel::allow_tables_to_appear_in_same_query!(
    items,
    transactions,
    reviews,
    notifications,
    chat_messages,
    community_posts,
);
