use async_trait::async_trait;
use awaybot_core::SkillFailure;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::error;

/// A geocoded point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GeocodeError {
    #[error("geocoding provider returned status `{status}`")]
    Provider { status: String },
    #[error("geocoding provider returned no results")]
    NoResults,
    #[error("geocoding request failed: {0}")]
    Transport(String),
}

impl From<GeocodeError> for SkillFailure {
    fn from(error: GeocodeError) -> Self {
        Self::Geocode { detail: error.to_string() }
    }
}

#[async_trait]
pub trait GeocodeGateway: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<GeoPoint, GeocodeError>;
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

pub(crate) fn point_from_response(body: GeocodeResponse) -> Result<GeoPoint, GeocodeError> {
    if body.status != "OK" {
        return Err(GeocodeError::Provider { status: body.status });
    }

    let first = body.results.into_iter().next().ok_or(GeocodeError::NoResults)?;
    Ok(GeoPoint { lat: first.geometry.location.lat, lng: first.geometry.location.lng })
}

pub struct HttpGeocodeGateway {
    client: reqwest::Client,
    url: String,
    api_key: SecretString,
}

impl HttpGeocodeGateway {
    pub fn new(client: reqwest::Client, url: impl Into<String>, api_key: SecretString) -> Self {
        Self { client, url: url.into(), api_key }
    }
}

#[async_trait]
impl GeocodeGateway for HttpGeocodeGateway {
    async fn geocode(&self, address: &str) -> Result<GeoPoint, GeocodeError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("address", address), ("key", self.api_key.expose_secret())])
            .send()
            .await
            .map_err(|err| GeocodeError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            error!(
                event_name = "location.geocode.http_failed",
                status = status.as_u16(),
                "geocoding endpoint returned non-success"
            );
            return Err(GeocodeError::Provider { status: status.as_u16().to_string() });
        }

        let body: GeocodeResponse =
            response.json().await.map_err(|err| GeocodeError::Transport(err.to_string()))?;

        match point_from_response(body) {
            Ok(point) => Ok(point),
            Err(err) => {
                error!(
                    event_name = "location.geocode.provider_failed",
                    error = %err,
                    "geocoding provider rejected the address"
                );
                Err(err)
            }
        }
    }
}
