use async_trait::async_trait;
use awaybot_core::SkillFailure;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::error;

use crate::geocode::GeoPoint;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TimezoneError {
    #[error("timezone provider returned status `{status}`")]
    Provider { status: String },
    #[error("timezone request failed: {0}")]
    Transport(String),
}

impl From<TimezoneError> for SkillFailure {
    fn from(error: TimezoneError) -> Self {
        Self::Timezone { detail: error.to_string() }
    }
}

#[async_trait]
pub trait TimezoneGateway: Send + Sync {
    /// Resolves the signed minute offset from UTC (standard + daylight
    /// saving) in effect at `point` for the instant `epoch_seconds`.
    async fn utc_offset_minutes(
        &self,
        point: GeoPoint,
        epoch_seconds: i64,
    ) -> Result<i32, TimezoneError>;
}

#[derive(Debug, Deserialize)]
pub(crate) struct TimezoneResponse {
    status: String,
    #[serde(rename = "rawOffset", default)]
    raw_offset_seconds: i64,
    #[serde(rename = "dstOffset", default)]
    dst_offset_seconds: i64,
}

pub(crate) fn offset_from_response(body: TimezoneResponse) -> Result<i32, TimezoneError> {
    if body.status != "OK" {
        return Err(TimezoneError::Provider { status: body.status });
    }

    Ok(((body.raw_offset_seconds + body.dst_offset_seconds) / 60) as i32)
}

pub struct HttpTimezoneGateway {
    client: reqwest::Client,
    url: String,
    api_key: SecretString,
}

impl HttpTimezoneGateway {
    pub fn new(client: reqwest::Client, url: impl Into<String>, api_key: SecretString) -> Self {
        Self { client, url: url.into(), api_key }
    }
}

#[async_trait]
impl TimezoneGateway for HttpTimezoneGateway {
    async fn utc_offset_minutes(
        &self,
        point: GeoPoint,
        epoch_seconds: i64,
    ) -> Result<i32, TimezoneError> {
        let location = format!("{},{}", point.lat, point.lng);
        let timestamp = epoch_seconds.to_string();

        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("location", location.as_str()),
                ("timestamp", timestamp.as_str()),
                ("key", self.api_key.expose_secret()),
            ])
            .send()
            .await
            .map_err(|err| TimezoneError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            error!(
                event_name = "location.timezone.http_failed",
                status = status.as_u16(),
                "timezone endpoint returned non-success"
            );
            return Err(TimezoneError::Provider { status: status.as_u16().to_string() });
        }

        let body: TimezoneResponse =
            response.json().await.map_err(|err| TimezoneError::Transport(err.to_string()))?;

        match offset_from_response(body) {
            Ok(offset) => Ok(offset),
            Err(err) => {
                error!(
                    event_name = "location.timezone.provider_failed",
                    error = %err,
                    "timezone provider rejected the location"
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{offset_from_response, TimezoneError, TimezoneResponse};

    #[test]
    fn offsets_sum_standard_and_daylight_saving() {
        // Pacific daylight time: -8h standard plus 1h DST.
        let body: TimezoneResponse = serde_json::from_str(
            r#"{"status": "OK", "rawOffset": -28800, "dstOffset": 3600}"#,
        )
        .expect("response should deserialize");

        assert_eq!(offset_from_response(body), Ok(-420));
    }

    #[test]
    fn fractional_hour_zones_survive_the_division() {
        // +05:45 with no DST.
        let body: TimezoneResponse =
            serde_json::from_str(r#"{"status": "OK", "rawOffset": 20700, "dstOffset": 0}"#)
                .expect("response should deserialize");

        assert_eq!(offset_from_response(body), Ok(345));
    }

    #[test]
    fn non_ok_status_is_a_provider_error() {
        let body: TimezoneResponse = serde_json::from_str(r#"{"status": "INVALID_REQUEST"}"#)
            .expect("response should deserialize");

        assert_eq!(
            offset_from_response(body),
            Err(TimezoneError::Provider { status: "INVALID_REQUEST".to_owned() })
        );
    }
}
