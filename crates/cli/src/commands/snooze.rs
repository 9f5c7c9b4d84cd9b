use awaybot_core::{compute_snooze_minutes, normalize_spoken_time, speak_time};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct SnoozeOutcome {
    status: &'static str,
    local_time: String,
    offset_minutes: i32,
    snooze_minutes: i64,
    until: String,
}

/// Runs the scheduling math offline, without touching any gateway. Useful
/// for verifying what the skill would do for a given time and offset.
pub fn run(time: &str, offset: i32, now: Option<&str>) -> CommandResult {
    let now = match now {
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(parsed) => parsed.with_timezone(&Utc),
            Err(error) => {
                return CommandResult {
                    exit_code: 2,
                    output: format!("invalid --now value `{raw}`: {error}"),
                };
            }
        },
        None => Utc::now(),
    };

    let local_time = normalize_spoken_time(time);
    match compute_snooze_minutes(&local_time, offset, now) {
        Ok(minutes) => {
            let outcome = SnoozeOutcome {
                status: "ok",
                local_time: local_time.clone(),
                offset_minutes: offset,
                snooze_minutes: minutes,
                until: speak_time(&local_time),
            };
            let output = serde_json::to_string_pretty(&outcome)
                .unwrap_or_else(|error| format!("snooze serialization failed: {error}"));
            CommandResult { exit_code: 0, output }
        }
        Err(error) => CommandResult { exit_code: 1, output: format!("snooze failed: {error}") },
    }
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn computes_the_window_for_a_fixed_reference_instant() {
        let result = run("17:00", -300, Some("2026-04-20T19:00:00Z"));

        assert_eq!(result.exit_code, 0);
        let payload: serde_json::Value =
            serde_json::from_str(&result.output).expect("output should be json");
        assert_eq!(payload["snooze_minutes"], 180);
        assert_eq!(payload["until"], "5:00 pm");
    }

    #[test]
    fn normalizes_daypart_symbols() {
        let result = run("EV", 0, Some("2026-04-20T18:00:00Z"));

        let payload: serde_json::Value =
            serde_json::from_str(&result.output).expect("output should be json");
        assert_eq!(payload["local_time"], "19:00");
        assert_eq!(payload["snooze_minutes"], 60);
    }

    #[test]
    fn rejects_an_unparseable_time() {
        let result = run("five pm", 0, Some("2026-04-20T18:00:00Z"));

        assert_eq!(result.exit_code, 1);
        assert!(result.output.contains("snooze failed"));
    }

    #[test]
    fn rejects_an_unparseable_reference_instant() {
        let result = run("17:00", 0, Some("yesterday"));

        assert_eq!(result.exit_code, 2);
        assert!(result.output.contains("invalid --now value"));
    }
}
