//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use serde_json::json;

use crate::domain::UserId;
use crate::domain::ports::{
    ChatMessaging, Engagement, FIXTURE_TOKEN_PREFIX, FixtureIdentityVerifier, IdentityVerifier,
    MockChatMessaging, MockEngagement, MockNotificationInbox, MockTransactionCommand,
    MockTransactionQuery, NotificationInbox, TransactionCommand, TransactionQuery,
};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Ports for handler tests.
///
/// Defaults accept `dev-token:` logins and use mocks without expectations,
/// so any unexpected port call fails the test.
pub struct TestPorts {
    pub identity: Arc<dyn IdentityVerifier>,
    pub transactions: Arc<dyn TransactionCommand>,
    pub transactions_query: Arc<dyn TransactionQuery>,
    pub inbox: Arc<dyn NotificationInbox>,
    pub chat: Arc<dyn ChatMessaging>,
    pub engagement: Arc<dyn Engagement>,
}

impl Default for TestPorts {
    fn default() -> Self {
        Self {
            identity: Arc::new(FixtureIdentityVerifier),
            transactions: Arc::new(MockTransactionCommand::new()),
            transactions_query: Arc::new(MockTransactionQuery::new()),
            inbox: Arc::new(MockNotificationInbox::new()),
            chat: Arc::new(MockChatMessaging::new()),
            engagement: Arc::new(MockEngagement::new()),
        }
    }
}

/// App with the full `/api/v1` surface over `ports`.
pub fn test_app(
    ports: TestPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let TestPorts {
        identity,
        transactions,
        transactions_query,
        inbox,
        chat,
        engagement,
    } = ports;
    let state = HttpState::new(HttpStatePorts {
        identity,
        transactions,
        transactions_query,
        inbox,
        chat,
        engagement,
    });
    App::new()
        .wrap(test_session_middleware())
        .app_data(web::Data::new(state))
        .configure(configure_api)
}

/// Log `user` in through `POST /api/v1/login` and return the session cookie.
pub async fn login_cookie<S, B>(app: &S, user: &UserId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "token": format!("{FIXTURE_TOKEN_PREFIX}{user}") }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "login failed: {}", res.status());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
