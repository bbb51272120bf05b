//! Engagement HTTP handlers.
//!
//! ```text
//! POST /api/v1/items/{item_id}/like
//! POST /api/v1/items/{item_id}/comments {"content":"Is the lid included?"}
//! POST /api/v1/users/{user_id}/follow
//! POST /api/v1/communities/{community_id}/posts {"content":"Swap meet Sunday"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    CommunityPostRequest, FollowRequest, ItemCommentRequest, ItemReactionRequest,
};
use crate::domain::{CommunityId, Error, ItemId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::CommunityPostResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

const ITEM_ID: FieldName = FieldName::new("itemId");

/// Body carrying free text for comments and community posts.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentRequest {
    /// Text; 500 characters at most for comments, 2000 for posts.
    #[schema(example = "Is the lid included?")]
    pub content: String,
}

/// Like an item; the seller is notified.
#[utoipa::path(
    post,
    path = "/api/v1/items/{item_id}/like",
    params(("item_id" = String, Path, description = "Item to like")),
    responses(
        (status = 204, description = "Liked"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Item not found", body = Error)
    ),
    tags = ["engagement"],
    operation_id = "likeItem"
)]
#[post("/items/{item_id}/like")]
pub async fn like_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor_id = session.require_user_id()?;
    let item_id = parse_id::<ItemId>(&path.into_inner(), ITEM_ID)?;
    state
        .engagement
        .like_item(ItemReactionRequest { actor_id, item_id })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Comment on an item; the seller is notified.
#[utoipa::path(
    post,
    path = "/api/v1/items/{item_id}/comments",
    params(("item_id" = String, Path, description = "Item to comment on")),
    request_body = ContentRequest,
    responses(
        (status = 204, description = "Comment accepted"),
        (status = 400, description = "Empty or oversized comment", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Item not found", body = Error)
    ),
    tags = ["engagement"],
    operation_id = "commentOnItem"
)]
#[post("/items/{item_id}/comments")]
pub async fn comment_on_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ContentRequest>,
) -> ApiResult<HttpResponse> {
    let actor_id = session.require_user_id()?;
    let item_id = parse_id::<ItemId>(&path.into_inner(), ITEM_ID)?;
    state
        .engagement
        .comment_on_item(ItemCommentRequest {
            actor_id,
            item_id,
            content: payload.into_inner().content,
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Follow a user; they are notified.
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/follow",
    params(("user_id" = String, Path, description = "User to follow")),
    responses(
        (status = 204, description = "Followed"),
        (status = 400, description = "Following yourself", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["engagement"],
    operation_id = "followUser"
)]
#[post("/users/{user_id}/follow")]
pub async fn follow_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let follower_id = session.require_user_id()?;
    let followed_id = parse_id::<UserId>(&path.into_inner(), FieldName::new("userId"))?;
    state
        .engagement
        .follow_user(FollowRequest {
            follower_id,
            followed_id,
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Post to a community board; recent posters are notified.
#[utoipa::path(
    post,
    path = "/api/v1/communities/{community_id}/posts",
    params(("community_id" = String, Path, description = "Community to post in")),
    request_body = ContentRequest,
    responses(
        (status = 201, description = "Post stored", body = CommunityPostResponse),
        (status = 400, description = "Empty or oversized post", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["engagement"],
    operation_id = "postToCommunity"
)]
#[post("/communities/{community_id}/posts")]
pub async fn post_to_community(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ContentRequest>,
) -> ApiResult<HttpResponse> {
    let author_id = session.require_user_id()?;
    let community_id =
        parse_id::<CommunityId>(&path.into_inner(), FieldName::new("communityId"))?;
    let post = state
        .engagement
        .post_to_community(CommunityPostRequest {
            author_id,
            community_id,
            content: payload.into_inner().content,
        })
        .await?;
    Ok(HttpResponse::Created().json(CommunityPostResponse::from(&post)))
}
