use serde::Serialize;

/// An Alexa skill response envelope, version `1.0`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResponseEnvelope {
    pub version: &'static str,
    pub response: Response,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    pub should_end_session: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum OutputSpeech {
    #[serde(rename = "PlainText")]
    Plain { text: String },
    #[serde(rename = "SSML")]
    Ssml { ssml: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Card {
    #[serde(rename = "LinkAccount")]
    LinkAccount,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

/// Speaks `text` and ends the session.
pub fn tell(text: impl Into<String>) -> ResponseEnvelope {
    envelope(Response {
        output_speech: Some(OutputSpeech::Plain { text: text.into() }),
        card: None,
        reprompt: None,
        should_end_session: true,
    })
}

/// Speaks `text`, shows the account-linking card, and ends the session.
pub fn tell_with_link_account_card(text: impl Into<String>) -> ResponseEnvelope {
    envelope(Response {
        output_speech: Some(OutputSpeech::Plain { text: text.into() }),
        card: Some(Card::LinkAccount),
        reprompt: None,
        should_end_session: true,
    })
}

/// Speaks `text` and keeps the session open, reprompting after a pause.
pub fn ask(text: impl Into<String>, reprompt: impl Into<String>) -> ResponseEnvelope {
    envelope(Response {
        output_speech: Some(OutputSpeech::Plain { text: text.into() }),
        card: None,
        reprompt: Some(Reprompt {
            output_speech: OutputSpeech::Plain { text: reprompt.into() },
        }),
        should_end_session: false,
    })
}

/// SSML variant of [`ask`], used for structured help text.
pub fn ask_ssml(ssml: impl Into<String>, reprompt: impl Into<String>) -> ResponseEnvelope {
    envelope(Response {
        output_speech: Some(OutputSpeech::Ssml { ssml: format!("<speak>{}</speak>", ssml.into()) }),
        card: None,
        reprompt: Some(Reprompt {
            output_speech: OutputSpeech::Plain { text: reprompt.into() },
        }),
        should_end_session: false,
    })
}

/// No speech at all; acknowledges session-ended notifications.
pub fn empty() -> ResponseEnvelope {
    envelope(Response {
        output_speech: None,
        card: None,
        reprompt: None,
        should_end_session: true,
    })
}

fn envelope(response: Response) -> ResponseEnvelope {
    ResponseEnvelope { version: "1.0", response }
}

impl ResponseEnvelope {
    /// Spoken text, for plain and SSML speech alike.
    pub fn speech_text(&self) -> Option<&str> {
        match &self.response.output_speech {
            Some(OutputSpeech::Plain { text }) => Some(text),
            Some(OutputSpeech::Ssml { ssml }) => Some(ssml),
            None => None,
        }
    }

    pub fn ends_session(&self) -> bool {
        self.response.should_end_session
    }

    pub fn has_link_account_card(&self) -> bool {
        matches!(self.response.card, Some(Card::LinkAccount))
    }
}

#[cfg(test)]
mod tests {
    use super::{ask, empty, tell, tell_with_link_account_card};

    #[test]
    fn tell_speaks_and_ends_the_session() {
        let response = tell("Okay");
        assert_eq!(response.speech_text(), Some("Okay"));
        assert!(response.ends_session());
        assert!(!response.has_link_account_card());
    }

    #[test]
    fn ask_keeps_the_session_open_with_a_reprompt() {
        let response = ask("What would you like to do?", "Could you say that again?");
        assert!(!response.ends_session());
        assert!(response.response.reprompt.is_some());
    }

    #[test]
    fn link_account_card_serializes_with_the_platform_type_tag() {
        let response = tell_with_link_account_card("Please connect your Slack account.");
        let json = serde_json::to_value(&response).expect("response should serialize");

        assert_eq!(json["version"], "1.0");
        assert_eq!(json["response"]["card"]["type"], "LinkAccount");
        assert_eq!(json["response"]["outputSpeech"]["type"], "PlainText");
        assert_eq!(json["response"]["shouldEndSession"], true);
    }

    #[test]
    fn empty_response_has_no_speech() {
        let response = empty();
        assert_eq!(response.speech_text(), None);
        let json = serde_json::to_value(&response).expect("response should serialize");
        assert!(json["response"].get("outputSpeech").is_none());
    }
}
