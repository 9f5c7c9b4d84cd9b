use async_trait::async_trait;
use awaybot_core::SkillFailure;
use serde::Deserialize;
use thiserror::Error;
use tracing::error;

/// Coarse device location from the voice platform's settings API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceAddress {
    pub postal_code: String,
    pub country_code: String,
}

impl DeviceAddress {
    /// The address string handed to the geocoder, e.g. `98109 US`.
    pub fn query_string(&self) -> String {
        format!("{} {}", self.postal_code, self.country_code)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("location consent was not granted for this device")]
    MissingPermission,
    #[error("device address endpoint returned status {status}")]
    Lookup { status: u16 },
    #[error("device address request failed: {0}")]
    Transport(String),
}

impl From<AddressError> for SkillFailure {
    fn from(error: AddressError) -> Self {
        match error {
            AddressError::MissingPermission => {
                Self::Permission { detail: error.to_string() }
            }
            AddressError::Lookup { .. } | AddressError::Transport(_) => {
                Self::AddressLookup { detail: error.to_string() }
            }
        }
    }
}

#[async_trait]
pub trait DeviceAddressGateway: Send + Sync {
    async fn country_and_postal_code(
        &self,
        device_id: &str,
        consent_token: &str,
    ) -> Result<DeviceAddress, AddressError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CountryAndPostalCodeBody {
    postal_code: String,
    country_code: String,
}

pub struct HttpDeviceAddressGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDeviceAddressGateway {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self { client, base_url: base_url.into() }
    }
}

#[async_trait]
impl DeviceAddressGateway for HttpDeviceAddressGateway {
    async fn country_and_postal_code(
        &self,
        device_id: &str,
        consent_token: &str,
    ) -> Result<DeviceAddress, AddressError> {
        let url = format!(
            "{}/v1/devices/{}/settings/address/countryAndPostalCode",
            self.base_url, device_id
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(consent_token)
            .send()
            .await
            .map_err(|err| AddressError::Transport(err.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::FORBIDDEN {
            error!(
                event_name = "location.address.forbidden",
                device_id,
                "device address endpoint denied access; consent likely revoked"
            );
            return Err(AddressError::MissingPermission);
        }
        if !status.is_success() {
            error!(
                event_name = "location.address.lookup_failed",
                device_id,
                status = status.as_u16(),
                "device address endpoint returned non-success"
            );
            return Err(AddressError::Lookup { status: status.as_u16() });
        }

        let body: CountryAndPostalCodeBody =
            response.json().await.map_err(|err| AddressError::Transport(err.to_string()))?;

        Ok(DeviceAddress { postal_code: body.postal_code, country_code: body.country_code })
    }
}

#[cfg(test)]
mod tests {
    use awaybot_core::SkillFailure;

    use super::{AddressError, CountryAndPostalCodeBody, DeviceAddress};

    #[test]
    fn query_string_joins_postal_and_country() {
        let address =
            DeviceAddress { postal_code: "98109".to_owned(), country_code: "US".to_owned() };
        assert_eq!(address.query_string(), "98109 US");
    }

    #[test]
    fn body_deserializes_platform_field_names() {
        let body: CountryAndPostalCodeBody =
            serde_json::from_str(r#"{"postalCode":"10115","countryCode":"DE"}"#)
                .expect("body should deserialize");
        assert_eq!(body.postal_code, "10115");
        assert_eq!(body.country_code, "DE");
    }

    #[test]
    fn missing_permission_maps_to_the_permission_failure() {
        let failure = SkillFailure::from(AddressError::MissingPermission);
        assert!(matches!(failure, SkillFailure::Permission { .. }));
    }

    #[test]
    fn lookup_failure_maps_to_the_address_lookup_failure() {
        let failure = SkillFailure::from(AddressError::Lookup { status: 500 });
        assert!(matches!(failure, SkillFailure::AddressLookup { ref detail } if detail.contains("500")));
    }
}
