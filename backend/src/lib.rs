//! Marketplace transaction backbone.
//!
//! Purchases move items through a guarded state machine, every step is
//! recorded as a notification, and connected users receive pushes over a
//! WebSocket channel.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
