//! Facebook Graph API credential type.

pub mod auth;
pub mod credential;
pub mod test_request;
mod utils;

pub use self::utils::ServerError;

pub const GRAPH_BASE_URL: &str = "https://graph.facebook.com";
pub const GRAPH_API_VERSION: &str = "v20.0";
