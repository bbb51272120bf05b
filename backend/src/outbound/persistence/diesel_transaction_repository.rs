//! PostgreSQL-backed `TransactionRepository` using Diesel.
//!
//! Purchases and transitions each run inside one database transaction. The
//! status checks are part of the `UPDATE ... WHERE` clause, so two racing
//! requests cannot both observe the prior state.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{
    ItemEffect, PurchaseRecord, StatusTransition, TransactionRepository,
    TransactionRepositoryError,
};
use crate::domain::{
    Item, ItemId, ItemStatus, PageLimit, Transaction, TransactionDetail, TransactionId,
    TransactionScope, TransactionStatus, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ItemRow, NewReviewRow, NewTransactionRow, RowConversionError, TransactionRow};
use super::pool::{DbPool, PoolError};
use super::schema::{items, reviews, transactions};

/// Diesel-backed implementation of the transaction repository port.
#[derive(Clone)]
pub struct DieselTransactionRepository {
    pool: DbPool,
}

impl DieselTransactionRepository {
    /// Create a new repository with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a database transaction closure.
enum UnitFailure {
    Diesel(DieselError),
    Rejected(TransactionRepositoryError),
}

impl From<DieselError> for UnitFailure {
    fn from(error: DieselError) -> Self {
        Self::Diesel(error)
    }
}

fn map_pool_error(error: PoolError) -> TransactionRepositoryError {
    map_basic_pool_error(error, |message| {
        TransactionRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: DieselError) -> TransactionRepositoryError {
    map_basic_diesel_error(
        error,
        TransactionRepositoryError::query,
        TransactionRepositoryError::connection,
    )
}

/// Map a unit failure, turning a unique violation into `on_unique`.
fn map_unit_failure(
    failure: UnitFailure,
    on_unique: impl FnOnce() -> TransactionRepositoryError,
) -> TransactionRepositoryError {
    match failure {
        UnitFailure::Rejected(error) => error,
        UnitFailure::Diesel(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            on_unique()
        }
        UnitFailure::Diesel(error) => map_diesel_error(error),
    }
}

fn map_row_error(error: RowConversionError) -> TransactionRepositoryError {
    TransactionRepositoryError::query(error.to_string())
}

fn to_detail(
    transaction_row: TransactionRow,
    item_row: ItemRow,
) -> Result<TransactionDetail, TransactionRepositoryError> {
    Ok(TransactionDetail {
        transaction: Transaction::try_from(transaction_row).map_err(map_row_error)?,
        item: Item::try_from(item_row).map_err(map_row_error)?,
    })
}

/// Stored status strings admitted by `scope`.
fn scope_filter(scope: TransactionScope) -> Vec<&'static str> {
    scope
        .statuses()
        .into_iter()
        .map(TransactionStatus::as_str)
        .collect()
}

#[async_trait]
impl TransactionRepository for DieselTransactionRepository {
    async fn find_item(&self, item_id: &ItemId) -> Result<Option<Item>, TransactionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ItemRow> = items::table
            .find(*item_id.as_uuid())
            .select(ItemRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Item::try_from).transpose().map_err(map_row_error)
    }

    async fn purchase(
        &self,
        record: &PurchaseRecord,
    ) -> Result<TransactionDetail, TransactionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let item_id = record.item_id;

        let (transaction_row, item_row) = conn
            .transaction::<_, UnitFailure, _>(|conn| {
                async move {
                    let sold: Option<ItemRow> = diesel::update(
                        items::table
                            .filter(items::id.eq(*item_id.as_uuid()))
                            .filter(items::status.eq(ItemStatus::OnSale.as_str())),
                    )
                    .set(items::status.eq(ItemStatus::SoldOrInProgress.as_str()))
                    .returning(ItemRow::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;

                    let Some(item_row) = sold else {
                        let exists: i64 = items::table
                            .filter(items::id.eq(*item_id.as_uuid()))
                            .count()
                            .get_result(conn)
                            .await?;
                        return Err(UnitFailure::Rejected(if exists == 0 {
                            TransactionRepositoryError::item_not_found(item_id)
                        } else {
                            TransactionRepositoryError::item_unavailable(item_id)
                        }));
                    };

                    let new_row = NewTransactionRow {
                        id: *record.transaction_id.as_uuid(),
                        item_id: item_row.id,
                        buyer_id: *record.buyer_id.as_uuid(),
                        seller_id: item_row.seller_id,
                        price_snapshot_minor: item_row.price_minor,
                        status: TransactionStatus::Purchased.as_str(),
                        payment_reference: record.payment_reference.as_deref(),
                        created_at: record.created_at,
                        updated_at: record.created_at,
                    };
                    let transaction_row: TransactionRow = diesel::insert_into(transactions::table)
                        .values(&new_row)
                        .returning(TransactionRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok((transaction_row, item_row))
                }
                .scope_boxed()
            })
            .await
            .map_err(|failure| {
                map_unit_failure(failure, || {
                    TransactionRepositoryError::item_unavailable(item_id)
                })
            })?;

        to_detail(transaction_row, item_row)
    }

    async fn find_transaction(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<Option<TransactionDetail>, TransactionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(TransactionRow, ItemRow)> = transactions::table
            .inner_join(items::table)
            .filter(transactions::id.eq(*transaction_id.as_uuid()))
            .select((TransactionRow::as_select(), ItemRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|(transaction_row, item_row)| to_detail(transaction_row, item_row))
            .transpose()
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        scope: TransactionScope,
        limit: PageLimit,
    ) -> Result<Vec<TransactionDetail>, TransactionRepositoryError> {
        let user = *user_id.as_uuid();
        let statuses = scope_filter(scope);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Served by the buyer_id and seller_id indexes.
        let rows: Vec<(TransactionRow, ItemRow)> = transactions::table
            .inner_join(items::table)
            .filter(
                transactions::buyer_id
                    .eq(user)
                    .or(transactions::seller_id.eq(user)),
            )
            .filter(transactions::status.eq_any(statuses))
            .order((transactions::created_at.desc(), transactions::id.desc()))
            .limit(i64::try_from(limit.get()).unwrap_or(i64::MAX))
            .select((TransactionRow::as_select(), ItemRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(transaction_row, item_row)| to_detail(transaction_row, item_row))
            .collect()
    }

    async fn apply_transition(
        &self,
        transition: &StatusTransition,
    ) -> Result<TransactionDetail, TransactionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let transaction_id = transition.transaction_id;

        let (transaction_row, item_row) = conn
            .transaction::<_, UnitFailure, _>(|conn| {
                async move {
                    let updated: Option<TransactionRow> = diesel::update(
                        transactions::table
                            .filter(transactions::id.eq(*transaction_id.as_uuid()))
                            .filter(transactions::status.eq(transition.from.as_str())),
                    )
                    .set((
                        transactions::status.eq(transition.to.as_str()),
                        transactions::updated_at.eq(transition.at),
                    ))
                    .returning(TransactionRow::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;

                    let Some(transaction_row) = updated else {
                        let exists: i64 = transactions::table
                            .filter(transactions::id.eq(*transaction_id.as_uuid()))
                            .count()
                            .get_result(conn)
                            .await?;
                        return Err(UnitFailure::Rejected(if exists == 0 {
                            TransactionRepositoryError::transaction_not_found(transaction_id)
                        } else {
                            TransactionRepositoryError::status_changed(
                                transaction_id,
                                transition.from,
                            )
                        }));
                    };

                    if let Some(review) = &transition.review {
                        diesel::insert_into(reviews::table)
                            .values(NewReviewRow::from(review))
                            .execute(conn)
                            .await?;
                    }

                    let item_row: ItemRow = match transition.item_effect {
                        ItemEffect::Relist => {
                            diesel::update(items::table.find(transaction_row.item_id))
                                .set(items::status.eq(ItemStatus::OnSale.as_str()))
                                .returning(ItemRow::as_returning())
                                .get_result(conn)
                                .await?
                        }
                        ItemEffect::Keep => {
                            items::table
                                .find(transaction_row.item_id)
                                .select(ItemRow::as_select())
                                .first(conn)
                                .await?
                        }
                    };
                    Ok((transaction_row, item_row))
                }
                .scope_boxed()
            })
            .await
            .map_err(|failure| {
                map_unit_failure(failure, || {
                    TransactionRepositoryError::review_exists(transaction_id)
                })
            })?;

        to_detail(transaction_row, item_row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::DatabaseErrorInformation;
    use rstest::rstest;

    struct StubInfo;

    impl DatabaseErrorInformation for StubInfo {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("reviews")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            Some("reviews_transaction_id_key")
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind) -> UnitFailure {
        UnitFailure::Diesel(DieselError::DatabaseError(kind, Box::new(StubInfo)))
    }

    #[rstest]
    fn unique_violations_map_to_the_supplied_conflict() {
        let tx_id = TransactionId::random();
        let mapped = map_unit_failure(
            database_error(DatabaseErrorKind::UniqueViolation),
            || TransactionRepositoryError::review_exists(tx_id),
        );
        assert_eq!(mapped, TransactionRepositoryError::review_exists(tx_id));
    }

    #[rstest]
    fn closed_connections_map_to_connection_errors() {
        let mapped = map_unit_failure(database_error(DatabaseErrorKind::ClosedConnection), || {
            TransactionRepositoryError::review_exists(TransactionId::random())
        });
        assert!(matches!(mapped, TransactionRepositoryError::Connection { .. }));
    }

    #[rstest]
    #[case(TransactionScope::Open, &["PURCHASED", "SHIPPED"])]
    #[case(
        TransactionScope::All,
        &["PURCHASED", "SHIPPED", "RECEIVED", "COMPLETED", "CANCELED"]
    )]
    fn scopes_filter_on_stored_status_strings(
        #[case] scope: TransactionScope,
        #[case] expected: &[&str],
    ) {
        assert_eq!(scope_filter(scope), expected.to_vec());
    }

    #[rstest]
    fn rejections_pass_through_unchanged() {
        let item_id = ItemId::random();
        let mapped = map_unit_failure(
            UnitFailure::Rejected(TransactionRepositoryError::item_unavailable(item_id)),
            || TransactionRepositoryError::query("unused"),
        );
        assert_eq!(mapped, TransactionRepositoryError::item_unavailable(item_id));
    }
}
