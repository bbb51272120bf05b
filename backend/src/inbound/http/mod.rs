//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod engagement;
pub mod error;
pub mod health;
pub mod messages;
pub mod notifications;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod transactions;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register the `/api/v1` handlers and extractor configuration.
///
/// The caller supplies `web::Data<HttpState>` and the session middleware.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(error::json_config())
            .app_data(error::query_config())
            .app_data(error::path_config())
            .service(auth::login)
            .service(auth::logout)
            .service(transactions::create_purchase)
            .service(transactions::list_transactions)
            .service(transactions::get_transaction)
            .service(transactions::mark_shipped)
            .service(transactions::post_review)
            .service(transactions::cancel)
            .service(notifications::list_notifications)
            .service(notifications::mark_notification_read)
            .service(messages::send_message)
            .service(messages::chat_threads)
            .service(messages::chat_history)
            .service(engagement::like_item)
            .service(engagement::comment_on_item)
            .service(engagement::follow_user)
            .service(engagement::post_to_community),
    );
}
