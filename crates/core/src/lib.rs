pub mod config;
pub mod errors;
pub mod schedule;
pub mod status;

pub use errors::SkillFailure;
pub use schedule::{
    compute_snooze_minutes, normalize_spoken_time, speak_time, ScheduleError, MAX_SNOOZE_MINUTES,
};
pub use status::{classify_status, StatusProfile};
