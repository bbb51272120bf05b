//! In-process adapters for local development and tests.
//!
//! Each store keeps its rows behind one `tokio::sync::Mutex`, so every
//! repository call is a single critical section and multi-row effects are
//! atomic with respect to other calls.

mod chat_store;
mod community_store;
mod market_store;
mod notification_store;

pub use chat_store::InMemoryChatStore;
pub use community_store::InMemoryCommunityStore;
pub use market_store::InMemoryMarketStore;
pub use notification_store::InMemoryNotificationStore;
