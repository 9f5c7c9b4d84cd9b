//! Slack Web API integration for the skill.
//!
//! - **Gateway** (`gateway`) - the trait the orchestration layer depends on:
//!   presence set, snooze set / end / query
//! - **HTTP client** (`http`) - reqwest-backed implementation speaking the
//!   `users.profile.set` and `dnd.*` form endpoints
//!
//! The user's access token arrives per request through account linking and is
//! passed into every call; the gateway itself holds no credentials.

pub mod gateway;
pub mod http;

pub use gateway::{NoopSlackGateway, SlackError, SlackGateway};
pub use http::HttpSlackGateway;
