//! Builders wiring stores, the dispatcher, and services into adapter state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use marketplace::domain::ports::{
    ChatMessageRepository, CommunityPostRepository, EventDispatch, FixtureIdentityVerifier,
    NotificationRepository, TransactionRepository,
};
use marketplace::domain::{
    ChatService, CompletionStatus, ConnectionRegistry, EngagementService, NotificationDispatcher,
    NotificationService, TransactionService,
};
use marketplace::inbound::http::state::{HttpState, HttpStatePorts};
use marketplace::inbound::ws::state::WsState;
use marketplace::outbound::memory::{
    InMemoryChatStore, InMemoryCommunityStore, InMemoryMarketStore, InMemoryNotificationStore,
};
use marketplace::outbound::persistence::{
    DieselChatMessageRepository, DieselCommunityPostRepository, DieselNotificationRepository,
    DieselTransactionRepository,
};

use super::ServerConfig;

/// Adapter state shared by every worker.
pub(super) struct AppStates {
    pub(super) http: web::Data<HttpState>,
    pub(super) ws: web::Data<WsState>,
}

/// One backend's worth of stores.
struct Stores<R, N, C, P> {
    transactions: Arc<R>,
    notifications: Arc<N>,
    chat: Arc<C>,
    posts: Arc<P>,
}

/// Wire services over one set of stores.
///
/// Every service that raises notifications shares one dispatcher, so all of
/// them deliver through the same registry.
fn build_ports<R, N, C, P>(
    stores: Stores<R, N, C, P>,
    registry: Arc<ConnectionRegistry>,
    completion: CompletionStatus,
) -> HttpStatePorts
where
    R: TransactionRepository + 'static,
    N: NotificationRepository + 'static,
    C: ChatMessageRepository + 'static,
    P: CommunityPostRepository + 'static,
{
    let Stores {
        transactions,
        notifications,
        chat,
        posts,
    } = stores;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let dispatcher: Arc<dyn EventDispatch> = Arc::new(NotificationDispatcher::new(
        notifications.clone(),
        chat.clone(),
        registry,
        clock.clone(),
    ));
    let engagement = Arc::new(EngagementService::new(
        transactions.clone(),
        posts,
        dispatcher.clone(),
        clock.clone(),
    ));
    let service = Arc::new(
        TransactionService::new(transactions, dispatcher.clone(), clock).with_completion(completion),
    );
    HttpStatePorts {
        identity: Arc::new(FixtureIdentityVerifier),
        transactions: service.clone(),
        transactions_query: service,
        inbox: Arc::new(NotificationService::new(notifications)),
        chat: Arc::new(ChatService::new(chat, dispatcher)),
        engagement,
    }
}

/// Build HTTP and WebSocket state, choosing Diesel adapters when a pool is
/// configured and in-process stores otherwise.
pub(super) fn build_states(config: &ServerConfig) -> AppStates {
    let registry = Arc::new(ConnectionRegistry::new());
    let ports = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL stores");
            build_ports(
                Stores {
                    transactions: Arc::new(DieselTransactionRepository::new(pool.clone())),
                    notifications: Arc::new(DieselNotificationRepository::new(pool.clone())),
                    chat: Arc::new(DieselChatMessageRepository::new(pool.clone())),
                    posts: Arc::new(DieselCommunityPostRepository::new(pool.clone())),
                },
                registry.clone(),
                config.completion,
            )
        }
        None => {
            info!("no database configured; using in-process stores");
            build_ports(
                Stores {
                    transactions: Arc::new(InMemoryMarketStore::new()),
                    notifications: Arc::new(InMemoryNotificationStore::new()),
                    chat: Arc::new(InMemoryChatStore::new()),
                    posts: Arc::new(InMemoryCommunityStore::new()),
                },
                registry.clone(),
                config.completion,
            )
        }
    };
    AppStates {
        http: web::Data::new(HttpState::new(ports)),
        ws: web::Data::new(WsState::new(registry, &config.allowed_origins)),
    }
}
