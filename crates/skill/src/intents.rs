use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use awaybot_core::{
    classify_status, compute_snooze_minutes, normalize_spoken_time, speak_time, SkillFailure,
    StatusProfile,
};
use awaybot_location::OffsetResolver;
use awaybot_slack::SlackGateway;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::request::RequestEnvelope;
use crate::response::{self, ResponseEnvelope};

const REPROMPT: &str = "I'm sorry, I didn't hear you. Could you say that again?";
const LINK_ACCOUNT: &str =
    "Please connect your Slack account to Alexa using the Alexa app on your phone.";

/// Per-request context. `received_at` is the single "now" every time
/// calculation in the request uses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
    pub received_at: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>, received_at: DateTime<Utc>) -> Self {
        Self { request_id: request_id.into(), received_at }
    }

    pub fn for_envelope(envelope: &RequestEnvelope, received_at: DateTime<Utc>) -> Self {
        Self::new(envelope.request_id(), received_at)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntentKind {
    Launch,
    SetStatus,
    ClearStatus,
    Help,
    Stop,
    Cancel,
    SessionEnded,
    Unhandled,
}

/// Routes a parsed envelope to the handler key. Unknown intent names fall
/// through to [`IntentKind::Unhandled`].
pub fn intent_kind(envelope: &RequestEnvelope) -> IntentKind {
    use crate::request::Request;

    match &envelope.request {
        Request::Launch { .. } => IntentKind::Launch,
        Request::SessionEnded => IntentKind::SessionEnded,
        Request::Unknown => IntentKind::Unhandled,
        Request::Intent { intent, .. } => match intent.name.as_str() {
            "SlackStatusIntent" => IntentKind::SetStatus,
            "SlackClearStatusIntent" => IntentKind::ClearStatus,
            "AMAZON.HelpIntent" => IntentKind::Help,
            "AMAZON.StopIntent" => IntentKind::Stop,
            "AMAZON.CancelIntent" => IntentKind::Cancel,
            _ => IntentKind::Unhandled,
        },
    }
}

#[async_trait]
pub trait IntentHandler: Send + Sync {
    fn kind(&self) -> IntentKind;

    /// Handlers never error outward; failures fold into a spoken sentence.
    async fn handle(&self, envelope: &RequestEnvelope, ctx: &RequestContext) -> ResponseEnvelope;
}

#[derive(Default)]
pub struct IntentDispatcher {
    handlers: HashMap<IntentKind, Arc<dyn IntentHandler>>,
}

impl IntentDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H>(&mut self, handler: H)
    where
        H: IntentHandler + 'static,
    {
        self.handlers.insert(handler.kind(), Arc::new(handler));
    }

    pub async fn dispatch(
        &self,
        envelope: &RequestEnvelope,
        ctx: &RequestContext,
    ) -> ResponseEnvelope {
        let kind = intent_kind(envelope);
        info!(
            event_name = "skill.request.received",
            request_id = %ctx.request_id,
            intent_kind = ?kind,
            "dispatching skill request"
        );

        let handler = self
            .handlers
            .get(&kind)
            .or_else(|| self.handlers.get(&IntentKind::Unhandled));

        match handler {
            Some(handler) => handler.handle(envelope, ctx).await,
            None => unhandled_response(),
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

/// The full handler set wired to real (or scripted) gateways.
pub fn skill_dispatcher(
    resolver: Arc<OffsetResolver>,
    slack: Arc<dyn SlackGateway>,
) -> IntentDispatcher {
    let mut dispatcher = IntentDispatcher::new();
    dispatcher.register(LaunchHandler);
    dispatcher.register(SetStatusHandler::new(resolver, slack.clone()));
    dispatcher.register(ClearStatusHandler::new(slack));
    dispatcher.register(HelpHandler);
    dispatcher.register(AcknowledgeHandler { kind: IntentKind::Stop });
    dispatcher.register(AcknowledgeHandler { kind: IntentKind::Cancel });
    dispatcher.register(SessionEndedHandler);
    dispatcher.register(UnhandledHandler);
    dispatcher
}

fn unhandled_response() -> ResponseEnvelope {
    response::ask("I didn't get that. What would you like to do?", REPROMPT)
}

pub struct LaunchHandler;

#[async_trait]
impl IntentHandler for LaunchHandler {
    fn kind(&self) -> IntentKind {
        IntentKind::Launch
    }

    async fn handle(&self, envelope: &RequestEnvelope, _ctx: &RequestContext) -> ResponseEnvelope {
        if envelope.access_token().is_some() {
            response::ask("What would you like to do?", REPROMPT)
        } else {
            response::tell_with_link_account_card(LINK_ACCOUNT)
        }
    }
}

/// Sets the spoken status and snoozes notifications until the spoken time.
///
/// The sequence is strictly ordered: resolve the device's UTC offset
/// (address, geocode, timezone), compute the snooze minutes, write the
/// snooze, then write the presence. The first failure aborts the rest and
/// becomes the spoken reply; already-applied steps are not rolled back.
pub struct SetStatusHandler {
    resolver: Arc<OffsetResolver>,
    slack: Arc<dyn SlackGateway>,
}

impl SetStatusHandler {
    pub fn new(resolver: Arc<OffsetResolver>, slack: Arc<dyn SlackGateway>) -> Self {
        Self { resolver, slack }
    }

    async fn apply(
        &self,
        token: &str,
        device_id: &str,
        consent_token: &str,
        spoken_status: &str,
        local_time: &str,
        ctx: &RequestContext,
    ) -> Result<String, SkillFailure> {
        let offset = self
            .resolver
            .resolve_device_offset(device_id, consent_token, ctx.received_at)
            .await?;
        let minutes = compute_snooze_minutes(local_time, offset, ctx.received_at)?;

        self.slack.set_snooze(token, minutes).await?;

        let spoken_until = speak_time(local_time);
        let mut profile = classify_status(spoken_status);
        profile.text = format!("{} until {}", profile.text, spoken_until);
        self.slack.set_presence(token, &profile).await?;

        info!(
            event_name = "skill.status.applied",
            request_id = %ctx.request_id,
            offset_minutes = offset,
            snooze_minutes = minutes,
            status_text = %profile.text,
            "status set and notifications snoozed"
        );

        Ok(spoken_until)
    }
}

#[async_trait]
impl IntentHandler for SetStatusHandler {
    fn kind(&self) -> IntentKind {
        IntentKind::SetStatus
    }

    async fn handle(&self, envelope: &RequestEnvelope, ctx: &RequestContext) -> ResponseEnvelope {
        let Some(token) = envelope.access_token() else {
            return response::tell_with_link_account_card(LINK_ACCOUNT);
        };
        let Some(intent) = envelope.intent() else {
            return unhandled_response();
        };

        let Some(spoken_status) = intent.slot_value("status") else {
            return response::ask("I didn't get your status, please try again.", REPROMPT);
        };
        let Some(spoken_time) = intent.slot_value("time") else {
            return response::ask("I didn't get the time, please try again.", REPROMPT);
        };

        let (Some(device_id), Some(consent_token)) =
            (envelope.device_id(), envelope.consent_token())
        else {
            let failure = SkillFailure::Permission {
                detail: "device id or consent token missing from request".to_owned(),
            };
            warn!(
                event_name = "skill.status.permission_missing",
                request_id = %ctx.request_id,
                error = %failure,
                "status request lacked location permission"
            );
            return response::tell(failure.spoken_message());
        };

        let local_time = normalize_spoken_time(spoken_time);

        match self.apply(token, device_id, consent_token, spoken_status, &local_time, ctx).await {
            Ok(spoken_until) => response::tell(format!(
                "Okay, I'll change your status and snooze your notifications until {spoken_until}."
            )),
            Err(failure) => {
                warn!(
                    event_name = "skill.status.failed",
                    request_id = %ctx.request_id,
                    error = %failure,
                    "status sequence aborted"
                );
                response::tell(failure.spoken_message())
            }
        }
    }
}

/// Clears the status fields and, when a snooze window is active, ends it
/// immediately instead of letting it expire.
pub struct ClearStatusHandler {
    slack: Arc<dyn SlackGateway>,
}

impl ClearStatusHandler {
    pub fn new(slack: Arc<dyn SlackGateway>) -> Self {
        Self { slack }
    }

    async fn clear(&self, token: &str, ctx: &RequestContext) -> Result<(), SkillFailure> {
        self.slack.set_presence(token, &StatusProfile::cleared()).await?;

        if self.slack.snooze_active(token).await? {
            self.slack.end_snooze(token).await?;
            info!(
                event_name = "skill.clear.snooze_ended",
                request_id = %ctx.request_id,
                "active snooze ended while clearing status"
            );
        }

        Ok(())
    }
}

#[async_trait]
impl IntentHandler for ClearStatusHandler {
    fn kind(&self) -> IntentKind {
        IntentKind::ClearStatus
    }

    async fn handle(&self, envelope: &RequestEnvelope, ctx: &RequestContext) -> ResponseEnvelope {
        let Some(token) = envelope.access_token() else {
            return response::tell_with_link_account_card(LINK_ACCOUNT);
        };

        match self.clear(token, ctx).await {
            Ok(()) => response::tell("Okay, I'll clear your status."),
            Err(failure) => {
                warn!(
                    event_name = "skill.clear.failed",
                    request_id = %ctx.request_id,
                    error = %failure,
                    "clear sequence aborted"
                );
                response::tell(failure.spoken_message())
            }
        }
    }
}

pub struct HelpHandler;

#[async_trait]
impl IntentHandler for HelpHandler {
    fn kind(&self) -> IntentKind {
        IntentKind::Help
    }

    async fn handle(&self, _envelope: &RequestEnvelope, _ctx: &RequestContext) -> ResponseEnvelope {
        let text = concat!(
            "<p>Here are a few things you can do:</p>",
            "<p>To set your status and snooze your notifications, say: I'm in status until ",
            "time, for example: I'm grabbing coffee until 5:00 pm.</p>",
            "<p>To clear your status, say: clear my status.</p>",
        );
        response::ask_ssml(text, REPROMPT)
    }
}

/// Stop and cancel both just acknowledge.
pub struct AcknowledgeHandler {
    pub kind: IntentKind,
}

#[async_trait]
impl IntentHandler for AcknowledgeHandler {
    fn kind(&self) -> IntentKind {
        self.kind
    }

    async fn handle(&self, _envelope: &RequestEnvelope, _ctx: &RequestContext) -> ResponseEnvelope {
        response::tell("Okay")
    }
}

pub struct SessionEndedHandler;

#[async_trait]
impl IntentHandler for SessionEndedHandler {
    fn kind(&self) -> IntentKind {
        IntentKind::SessionEnded
    }

    async fn handle(&self, _envelope: &RequestEnvelope, _ctx: &RequestContext) -> ResponseEnvelope {
        response::empty()
    }
}

pub struct UnhandledHandler;

#[async_trait]
impl IntentHandler for UnhandledHandler {
    fn kind(&self) -> IntentKind {
        IntentKind::Unhandled
    }

    async fn handle(&self, _envelope: &RequestEnvelope, _ctx: &RequestContext) -> ResponseEnvelope {
        unhandled_response()
    }
}
