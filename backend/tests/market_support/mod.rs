//! Shared wiring for marketplace integration tests.
//!
//! Builds the services over in-process stores exactly as the server does
//! when no database is configured.
#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::{Arc, Mutex};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::{App, test, web};
use async_trait::async_trait;
use marketplace::domain::ports::{
    DisconnectReason, EventDispatch, FixtureIdentityVerifier, PushChannel, PushChannelError,
    TransactionCommand,
};
use marketplace::domain::{
    ChatService, CompletionStatus, ConnectionId, ConnectionRegistry, EngagementService, Item,
    ItemDraft, ItemId, ItemStatus, NotificationDispatcher, NotificationService, Price,
    PushPayload, TransactionService, UserId,
};
use marketplace::inbound::http::configure_api;
use marketplace::inbound::http::state::{HttpState, HttpStatePorts};
use marketplace::outbound::memory::{
    InMemoryChatStore, InMemoryCommunityStore, InMemoryMarketStore, InMemoryNotificationStore,
};
use mockable::DefaultClock;

/// Services and stores for one test.
pub struct Market {
    pub store: Arc<InMemoryMarketStore>,
    pub notifications: Arc<InMemoryNotificationStore>,
    pub registry: Arc<ConnectionRegistry>,
    pub service: Arc<TransactionService<InMemoryMarketStore>>,
    pub http_state: HttpState,
}

impl Market {
    pub fn new() -> Self {
        Self::with_completion(CompletionStatus::Completed)
    }

    pub fn with_completion(completion: CompletionStatus) -> Self {
        let store = Arc::new(InMemoryMarketStore::new());
        let notifications = Arc::new(InMemoryNotificationStore::new());
        let chat = Arc::new(InMemoryChatStore::new());
        let registry = Arc::new(ConnectionRegistry::new());
        let dispatcher: Arc<dyn EventDispatch> = Arc::new(NotificationDispatcher::new(
            notifications.clone(),
            chat.clone(),
            registry.clone(),
            Arc::new(DefaultClock),
        ));
        let service = Arc::new(
            TransactionService::new(store.clone(), dispatcher.clone(), Arc::new(DefaultClock))
                .with_completion(completion),
        );
        let engagement = Arc::new(EngagementService::new(
            store.clone(),
            Arc::new(InMemoryCommunityStore::new()),
            dispatcher.clone(),
            Arc::new(DefaultClock),
        ));
        let http_state = HttpState::new(HttpStatePorts {
            identity: Arc::new(FixtureIdentityVerifier),
            transactions: service.clone(),
            transactions_query: service.clone(),
            inbox: Arc::new(NotificationService::new(notifications.clone())),
            chat: Arc::new(ChatService::new(chat, dispatcher)),
            engagement,
        });
        Self {
            store,
            notifications,
            registry,
            service,
            http_state,
        }
    }

    pub fn commands(&self) -> Arc<dyn TransactionCommand> {
        self.service.clone()
    }

    /// List an on-sale item for `seller`.
    pub async fn list_item(&self, seller: UserId, price_minor: i64) -> ItemId {
        let item = Item::new(ItemDraft {
            id: ItemId::random(),
            seller_id: seller,
            title: "Vintage lamp".to_owned(),
            price: Price::new(price_minor).expect("valid price"),
            status: ItemStatus::OnSale,
        })
        .expect("valid item");
        let id = item.id();
        self.store.insert_item(item).await;
        id
    }

    pub async fn item_status(&self, item_id: ItemId) -> ItemStatus {
        use marketplace::domain::ports::TransactionRepository as _;
        self.store
            .find_item(&item_id)
            .await
            .expect("store reachable")
            .expect("item exists")
            .status()
    }
}

/// Build the `/api/v1` app with a cookie session.
pub fn api_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(
            SessionMiddleware::builder(CookieSessionStore::default(), Key::from(&[0_u8; 64]))
                .cookie_name("session".to_owned())
                .cookie_secure(false)
                .build(),
        )
        .app_data(web::Data::new(state))
        .configure(configure_api)
}

/// Log `user` in through the fixture identity token and return the cookie.
pub async fn login<S, B>(app: &S, user: &UserId) -> Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(serde_json::json!({ "token": format!("dev-token:{user}") }))
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

/// Push channel that records payloads in memory.
pub struct RecordingChannel {
    id: ConnectionId,
    pushed: Mutex<Vec<PushPayload>>,
}

impl RecordingChannel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: ConnectionId::random(),
            pushed: Mutex::new(Vec::new()),
        })
    }

    pub fn pushed(&self) -> Vec<PushPayload> {
        self.pushed.lock().expect("recording lock").clone()
    }
}

#[async_trait]
impl PushChannel for RecordingChannel {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn push(&self, payload: &PushPayload) -> Result<(), PushChannelError> {
        self.pushed.lock().expect("recording lock").push(payload.clone());
        Ok(())
    }

    async fn close(&self, _reason: DisconnectReason) {}
}
