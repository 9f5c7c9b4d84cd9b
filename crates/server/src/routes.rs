use std::sync::Arc;

use awaybot_skill::{IntentDispatcher, RequestContext, RequestEnvelope, ResponseEnvelope};
use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use tracing::info;

pub fn router(dispatcher: Arc<IntentDispatcher>) -> Router {
    Router::new().route("/alexa", post(alexa)).with_state(dispatcher)
}

/// Single skill webhook. Alexa always expects a 200 with a response
/// envelope; failures inside a handler come back as spoken sentences.
pub async fn alexa(
    State(dispatcher): State<Arc<IntentDispatcher>>,
    Json(envelope): Json<RequestEnvelope>,
) -> Json<ResponseEnvelope> {
    let ctx = RequestContext::for_envelope(&envelope, Utc::now());
    let response = dispatcher.dispatch(&envelope, &ctx).await;

    info!(
        event_name = "server.alexa.responded",
        request_id = %ctx.request_id,
        ends_session = response.ends_session(),
        "skill response produced"
    );

    Json(response)
}
