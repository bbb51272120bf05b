//! Purchase lifecycle HTTP handlers.
//!
//! ```text
//! POST /api/v1/items/{item_id}/purchase
//! GET  /api/v1/transactions?scope=open&limit=20
//! GET  /api/v1/transactions/{transaction_id}
//! POST /api/v1/transactions/{transaction_id}/ship
//! POST /api/v1/transactions/{transaction_id}/review
//! POST /api/v1/transactions/{transaction_id}/cancel
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{
    CreatePurchaseRequest, ListTransactionsRequest, PostReviewRequest, TransactionActionRequest,
};
use crate::domain::{
    Error, ItemId, PageLimit, ReviewRole, TransactionId, TransactionScope, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::TransactionResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

const ITEM_ID: FieldName = FieldName::new("itemId");
const TRANSACTION_ID: FieldName = FieldName::new("transactionId");

/// Optional body for `POST /api/v1/items/{item_id}/purchase`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    /// Opaque reference from the payment collaborator, stored verbatim.
    #[schema(example = "pi_3Nx2fL")]
    pub payment_reference: Option<String>,
}

/// Body for `POST /api/v1/transactions/{transaction_id}/review`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    /// Score from 1 to 5.
    #[schema(example = 5)]
    pub rating: i64,
    /// Free text, at most 1000 characters.
    #[serde(default)]
    pub comment: String,
    /// `BUYER` or `SELLER`; must match the caller's side of the transaction.
    #[schema(example = "BUYER")]
    pub role: String,
}

/// Query for `GET /api/v1/transactions`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TransactionListQuery {
    /// `all` (default) or `open` for transactions that can still change.
    pub scope: Option<String>,
    /// Maximum number of records, clamped to 1..=100 (default 50).
    pub limit: Option<usize>,
}

fn parse_scope(raw: Option<&str>) -> Result<TransactionScope, Error> {
    raw.map_or(Ok(TransactionScope::default()), |value| {
        value.parse().map_err(|_| {
            Error::invalid_request("scope must be all or open").with_details(json!({
                "field": "scope",
                "value": value,
                "code": "invalid_scope",
            }))
        })
    })
}

fn parse_role(raw: &str) -> Result<ReviewRole, Error> {
    raw.trim().to_ascii_uppercase().parse().map_err(|_| {
        Error::invalid_request("role must be BUYER or SELLER").with_details(json!({
            "field": "role",
            "value": raw,
            "code": "invalid_role",
        }))
    })
}

fn action(
    session: &SessionContext,
    transaction_id: &str,
) -> Result<TransactionActionRequest, Error> {
    let actor_id: UserId = session.require_user_id()?;
    Ok(TransactionActionRequest {
        transaction_id: parse_id::<TransactionId>(transaction_id, TRANSACTION_ID)?,
        actor_id,
    })
}

/// Buy an on-sale item.
#[utoipa::path(
    post,
    path = "/api/v1/items/{item_id}/purchase",
    params(("item_id" = String, Path, description = "Item to buy")),
    request_body(content = PurchaseRequest, description = "Optional payment reference"),
    responses(
        (status = 201, description = "Transaction opened", body = TransactionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Item not found", body = Error),
        (status = 409, description = "Item is no longer on sale", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["transactions"],
    operation_id = "createPurchase"
)]
#[post("/items/{item_id}/purchase")]
pub async fn create_purchase(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: Option<web::Json<PurchaseRequest>>,
) -> ApiResult<HttpResponse> {
    let buyer_id = session.require_user_id()?;
    let item_id = parse_id::<ItemId>(&path.into_inner(), ITEM_ID)?;
    let PurchaseRequest { payment_reference } =
        payload.map(web::Json::into_inner).unwrap_or_default();
    let detail = state
        .transactions
        .create_purchase(CreatePurchaseRequest {
            item_id,
            buyer_id,
            payment_reference,
        })
        .await?;
    Ok(HttpResponse::Created().json(TransactionResponse::from(&detail)))
}

/// The caller's purchases and sales, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    params(TransactionListQuery),
    responses(
        (status = 200, description = "Transactions, newest first", body = [TransactionResponse]),
        (status = 400, description = "Unknown scope", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["transactions"],
    operation_id = "listTransactions"
)]
#[get("/transactions")]
pub async fn list_transactions(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<TransactionListQuery>,
) -> ApiResult<web::Json<Vec<TransactionResponse>>> {
    let user_id = session.require_user_id()?;
    let scope = parse_scope(query.scope.as_deref())?;
    let details = state
        .transactions_query
        .list_for_user(ListTransactionsRequest {
            user_id,
            scope,
            limit: PageLimit::clamped(query.limit),
        })
        .await?;
    Ok(web::Json(
        details.iter().map(TransactionResponse::from).collect(),
    ))
}

/// Fetch a transaction the caller is party to.
#[utoipa::path(
    get,
    path = "/api/v1/transactions/{transaction_id}",
    params(("transaction_id" = String, Path, description = "Transaction")),
    responses(
        (status = 200, description = "Transaction", body = TransactionResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["transactions"],
    operation_id = "getTransaction"
)]
#[get("/transactions/{transaction_id}")]
pub async fn get_transaction(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<TransactionResponse>> {
    let request = action(&session, &path.into_inner())?;
    let detail = state.transactions_query.get_transaction(request).await?;
    Ok(web::Json(TransactionResponse::from(&detail)))
}

/// Mark a purchased item as shipped. Seller only.
#[utoipa::path(
    post,
    path = "/api/v1/transactions/{transaction_id}/ship",
    params(("transaction_id" = String, Path, description = "Transaction")),
    responses(
        (status = 200, description = "Shipped", body = TransactionResponse),
        (status = 403, description = "Caller is not the seller", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Not in PURCHASED", body = Error)
    ),
    tags = ["transactions"],
    operation_id = "markShipped"
)]
#[post("/transactions/{transaction_id}/ship")]
pub async fn mark_shipped(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<TransactionResponse>> {
    let request = action(&session, &path.into_inner())?;
    let detail = state.transactions.mark_shipped(request).await?;
    Ok(web::Json(TransactionResponse::from(&detail)))
}

/// Review the counterparty and close the transaction.
#[utoipa::path(
    post,
    path = "/api/v1/transactions/{transaction_id}/review",
    params(("transaction_id" = String, Path, description = "Transaction")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Reviewed and closed", body = TransactionResponse),
        (status = 400, description = "Invalid rating, comment, or role", body = Error),
        (status = 403, description = "Caller is not a party", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Already closed or reviewed", body = Error)
    ),
    tags = ["transactions"],
    operation_id = "postReview"
)]
#[post("/transactions/{transaction_id}/review")]
pub async fn post_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<web::Json<TransactionResponse>> {
    let TransactionActionRequest {
        transaction_id,
        actor_id,
    } = action(&session, &path.into_inner())?;
    let ReviewRequest {
        rating,
        comment,
        role,
    } = payload.into_inner();
    let detail = state
        .transactions
        .post_review(PostReviewRequest {
            transaction_id,
            rater_id: actor_id,
            rating,
            comment,
            role: parse_role(&role)?,
        })
        .await?;
    Ok(web::Json(TransactionResponse::from(&detail)))
}

/// Cancel a transaction that has not shipped and relist its item.
#[utoipa::path(
    post,
    path = "/api/v1/transactions/{transaction_id}/cancel",
    params(("transaction_id" = String, Path, description = "Transaction")),
    responses(
        (status = 200, description = "Canceled", body = TransactionResponse),
        (status = 403, description = "Caller is not a party", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Already shipped or closed", body = Error)
    ),
    tags = ["transactions"],
    operation_id = "cancelTransaction"
)]
#[post("/transactions/{transaction_id}/cancel")]
pub async fn cancel(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<TransactionResponse>> {
    let request = action(&session, &path.into_inner())?;
    let detail = state.transactions.cancel(request).await?;
    Ok(web::Json(TransactionResponse::from(&detail)))
}

#[cfg(test)]
#[path = "transactions_tests.rs"]
mod tests;
