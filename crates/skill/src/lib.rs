//! Voice-skill layer: Alexa request/response model and intent orchestration.
//!
//! - **Request model** (`request`) - the subset of the Alexa envelope the
//!   skill reads: access token, device id, consent token, intent slots
//! - **Response builders** (`response`) - tell / ask / link-account responses
//! - **Intents** (`intents`) - dispatcher plus one handler per intent; the
//!   status handler runs the lookup chain and the Slack writes
//!
//! Handlers never surface errors to the platform: every failure folds into a
//! single spoken sentence (internal detail goes to the log).

pub mod intents;
pub mod request;
pub mod response;

pub use intents::{skill_dispatcher, IntentDispatcher, IntentHandler, IntentKind, RequestContext};
pub use request::{Intent, Request, RequestEnvelope, Slot};
pub use response::ResponseEnvelope;
