//! Snooze scheduling math: spoken-time normalization and the conversion of a
//! local wall-clock time plus a device UTC offset into a snooze duration.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Utc};
use thiserror::Error;

/// One day in minutes; the snooze window never spans more than a day.
pub const MAX_SNOOZE_MINUTES: i64 = 1440;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("unparseable local time `{0}` (expected HH:MM)")]
    InvalidTime(String),
    #[error("utc offset of {0} minutes is outside the representable range")]
    OffsetOutOfRange(i32),
}

/// Maps coarse daypart symbols to fixed canonical clock times.
///
/// The voice platform delivers dayparts as two-letter codes (`MO`, `AF`,
/// `EV`, `NI`); the spelled-out words are accepted too. Anything else passes
/// through unchanged, so the function is a fixed point on its own output.
pub fn normalize_spoken_time(token: &str) -> String {
    match token {
        "MO" | "morning" => "09:00".to_owned(),
        "AF" | "afternoon" => "13:00".to_owned(),
        "EV" | "evening" => "19:00".to_owned(),
        "NI" | "night" => "21:00".to_owned(),
        other => other.to_owned(),
    }
}

/// Computes how many whole minutes to snooze so that notifications resume at
/// `local_time` in the zone described by `offset_minutes`.
///
/// The `HH:MM` digits name a wall-clock time at the device's offset; the
/// target is anchored on the current UTC date and the digits are kept while
/// the instant shifts to the offset. A target at or before "now" means the
/// user is talking about tomorrow. Offsets are applied as raw minutes, so
/// 30- and 45-minute zones are honored exactly.
pub fn compute_snooze_minutes(
    local_time: &str,
    offset_minutes: i32,
    now: DateTime<Utc>,
) -> Result<i64, ScheduleError> {
    let time = NaiveTime::parse_from_str(local_time, "%H:%M")
        .map_err(|_| ScheduleError::InvalidTime(local_time.to_owned()))?;
    let offset = FixedOffset::east_opt(offset_minutes.saturating_mul(60))
        .ok_or(ScheduleError::OffsetOutOfRange(offset_minutes))?;

    let mut target = now
        .date_naive()
        .and_time(time)
        .and_local_timezone(offset)
        .single()
        .ok_or(ScheduleError::OffsetOutOfRange(offset_minutes))?;
    let now_local = now.with_timezone(&offset);

    // Exact equality counts as "already passed today".
    if now_local >= target {
        target += Duration::days(1);
    }

    let mut minutes = (target - now_local).num_minutes();

    // Anchoring on the UTC date misses by a whole day when the local date
    // disagrees with the UTC date: it overshoots when the local date trails
    // (negative offsets shortly after UTC midnight) and undershoots when the
    // local date is ahead (positive offsets shortly after local midnight).
    if minutes > MAX_SNOOZE_MINUTES {
        minutes -= MAX_SNOOZE_MINUTES;
    } else if minutes < 0 {
        minutes += MAX_SNOOZE_MINUTES;
    }

    Ok(minutes)
}

/// Renders a canonical `HH:MM` time the way it is spoken back to the user,
/// e.g. `17:00` becomes `5:00 pm`. Unparseable input is returned as-is.
pub fn speak_time(local_time: &str) -> String {
    match NaiveTime::parse_from_str(local_time, "%H:%M") {
        Ok(time) => time.format("%-I:%M %P").to_string(),
        Err(_) => local_time.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{compute_snooze_minutes, normalize_spoken_time, speak_time, ScheduleError};

    #[test]
    fn dayparts_map_to_fixed_canonical_times() {
        assert_eq!(normalize_spoken_time("MO"), "09:00");
        assert_eq!(normalize_spoken_time("AF"), "13:00");
        assert_eq!(normalize_spoken_time("EV"), "19:00");
        assert_eq!(normalize_spoken_time("NI"), "21:00");
        assert_eq!(normalize_spoken_time("morning"), "09:00");
        assert_eq!(normalize_spoken_time("night"), "21:00");
    }

    #[test]
    fn explicit_times_pass_through_unchanged() {
        assert_eq!(normalize_spoken_time("17:45"), "17:45");
        assert_eq!(normalize_spoken_time("some nonsense"), "some nonsense");
    }

    #[test]
    fn normalization_is_idempotent() {
        for token in ["MO", "AF", "EV", "NI", "08:30", "garbage"] {
            let once = normalize_spoken_time(token);
            assert_eq!(normalize_spoken_time(&once), once);
        }
    }

    #[test]
    fn one_hour_ahead_at_zero_offset_is_sixty_minutes() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap();
        assert_eq!(compute_snooze_minutes("09:00", 0, now), Ok(60));
    }

    #[test]
    fn exact_equality_rolls_to_next_day() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        assert_eq!(compute_snooze_minutes("09:00", 0, now), Ok(1440));
    }

    #[test]
    fn elapsed_seconds_truncate_the_rolled_day() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 30).unwrap();
        assert_eq!(compute_snooze_minutes("09:00", 0, now), Ok(1439));
    }

    #[test]
    fn target_already_passed_rolls_to_tomorrow() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 10, 15, 0).unwrap();
        assert_eq!(compute_snooze_minutes("09:00", 0, now), Ok(1365));
    }

    #[test]
    fn negative_offset_shifts_the_comparison() {
        // Local time at -05:00 is 10:00, so 13:00 is three hours out.
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap();
        assert_eq!(compute_snooze_minutes("13:00", -300, now), Ok(180));
    }

    #[test]
    fn half_hour_offset_is_applied_as_raw_minutes() {
        // +05:30: local time is 07:30, 90 minutes before 09:00.
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 2, 0, 0).unwrap();
        assert_eq!(compute_snooze_minutes("09:00", 330, now), Ok(90));
    }

    #[test]
    fn forty_five_minute_offset_is_applied_as_raw_minutes() {
        // +05:45: local time is 08:45, 75 minutes before 10:00.
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 3, 0, 0).unwrap();
        assert_eq!(compute_snooze_minutes("10:00", 345, now), Ok(75));
    }

    #[test]
    fn correction_repairs_day_overshoot_for_trailing_local_date() {
        // 01:00 UTC on the 2nd is 20:00 on the 1st at -05:00. The target is
        // anchored on the UTC date, so 21:30 lands a day late and the final
        // correction brings it back to the 90 real minutes remaining.
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 1, 0, 0).unwrap();
        assert_eq!(compute_snooze_minutes("21:30", -300, now), Ok(90));
    }

    #[test]
    fn correction_repairs_day_undershoot_for_leading_local_date() {
        // 23:40 UTC on the 15th is 05:10 on the 16th at +05:30. The target is
        // anchored on the UTC date, so midnight lands a day early and the
        // final correction brings it forward to the 1130 real minutes
        // remaining.
        let now = Utc.with_ymd_and_hms(2026, 6, 15, 23, 40, 0).unwrap();
        assert_eq!(compute_snooze_minutes("00:00", 330, now), Ok(1130));
    }

    #[test]
    fn result_stays_within_a_day_across_offsets() {
        let now = Utc.with_ymd_and_hms(2026, 6, 15, 23, 40, 0).unwrap();
        for offset in [-720, -300, -90, 0, 90, 330, 345, 720] {
            for time in ["00:00", "06:30", "12:00", "23:59"] {
                let minutes = compute_snooze_minutes(time, offset, now).unwrap();
                assert!(
                    (0..=1440).contains(&minutes),
                    "minutes {minutes} out of range for {time} at offset {offset}"
                );
            }
        }
    }

    #[test]
    fn unparseable_time_is_rejected() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap();
        assert_eq!(
            compute_snooze_minutes("not a time", 0, now),
            Err(ScheduleError::InvalidTime("not a time".to_owned()))
        );
    }

    #[test]
    fn offsets_beyond_a_day_are_rejected() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap();
        assert_eq!(
            compute_snooze_minutes("09:00", 1440, now),
            Err(ScheduleError::OffsetOutOfRange(1440))
        );
    }

    #[test]
    fn spoken_rendering_uses_twelve_hour_clock() {
        assert_eq!(speak_time("17:00"), "5:00 pm");
        assert_eq!(speak_time("09:05"), "9:05 am");
        assert_eq!(speak_time("00:30"), "12:30 am");
        assert_eq!(speak_time("12:00"), "12:00 pm");
    }

    #[test]
    fn spoken_rendering_passes_unparseable_input_through() {
        assert_eq!(speak_time("later"), "later");
    }
}
