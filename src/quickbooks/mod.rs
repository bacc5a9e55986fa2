// QuickBooks Online collaborators
// Auth (OAuth2 + token file) and the accounting REST API behind a trait

pub mod api;
pub mod auth;
pub mod http;

pub use api::{AccountingService, EntityRef, EntityType};
pub use auth::{AuthConfig, OAuthToken, QbAuthProvider, QbEnvironment};
pub use http::QbOnlineClient;
