use thiserror::Error;

use crate::schedule::ScheduleError;

/// Terminal failure for one skill request. Each variant carries internal
/// detail for logging and maps to exactly one user-facing spoken sentence;
/// the detail is never spoken. Nothing here is retried.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SkillFailure {
    #[error("location consent missing: {detail}")]
    Permission { detail: String },
    #[error("device address lookup failed: {detail}")]
    AddressLookup { detail: String },
    #[error("geocoding failed: {detail}")]
    Geocode { detail: String },
    #[error("timezone lookup failed: {detail}")]
    Timezone { detail: String },
    #[error("presence update failed: {detail}")]
    Presence { detail: String },
    #[error("snooze set failed: {detail}")]
    SetSnooze { detail: String },
    #[error("snooze end failed: {detail}")]
    EndSnooze { detail: String },
    #[error("snooze status check failed: {detail}")]
    SnoozeStatus { detail: String },
    #[error("snooze schedule could not be computed: {detail}")]
    Schedule { detail: String },
}

impl SkillFailure {
    /// The single sentence spoken back to the user for this failure.
    pub fn spoken_message(&self) -> &'static str {
        match self {
            Self::Permission { .. } | Self::AddressLookup { .. } => {
                "I'm sorry, I couldn't get your location. Make sure you've given this skill \
                 permission to use your address in the Alexa app."
            }
            Self::Geocode { .. } => "I'm sorry, I couldn't understand that address.",
            Self::Timezone { .. } => {
                "I'm sorry, I couldn't get the timezone for that location."
            }
            Self::Presence { .. } => "I couldn't set your Slack status.",
            Self::SetSnooze { .. } => "I couldn't snooze your Slack notifications.",
            Self::EndSnooze { .. } => "I couldn't end your Slack snooze.",
            Self::SnoozeStatus { .. } => "I couldn't check your Slack snooze.",
            Self::Schedule { .. } => "I didn't get the time, please try again.",
        }
    }
}

impl From<ScheduleError> for SkillFailure {
    fn from(error: ScheduleError) -> Self {
        Self::Schedule { detail: error.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::SkillFailure;
    use crate::schedule::ScheduleError;

    #[test]
    fn permission_and_lookup_share_the_location_sentence() {
        let permission = SkillFailure::Permission { detail: "no consent token".to_owned() };
        let lookup = SkillFailure::AddressLookup { detail: "status 403".to_owned() };
        assert_eq!(permission.spoken_message(), lookup.spoken_message());
        assert!(permission.spoken_message().contains("couldn't get your location"));
    }

    #[test]
    fn spoken_messages_never_leak_internal_detail() {
        let failure = SkillFailure::Presence { detail: "HTTP 500 body=oops".to_owned() };
        assert!(!failure.spoken_message().contains("500"));
        assert_eq!(failure.spoken_message(), "I couldn't set your Slack status.");
    }

    #[test]
    fn schedule_errors_map_to_the_time_reprompt() {
        let failure = SkillFailure::from(ScheduleError::InvalidTime("later".to_owned()));
        assert_eq!(failure.spoken_message(), "I didn't get the time, please try again.");
    }
}
