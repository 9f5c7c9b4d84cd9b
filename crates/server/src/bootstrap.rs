use std::sync::Arc;
use std::time::Duration;

use awaybot_core::config::{AppConfig, ConfigError, LoadOptions};
use awaybot_location::{
    HttpDeviceAddressGateway, HttpGeocodeGateway, HttpTimezoneGateway, OffsetResolver,
};
use awaybot_skill::{skill_dispatcher, IntentDispatcher};
use awaybot_slack::HttpSlackGateway;
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub dispatcher: Arc<IntentDispatcher>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("http client construction failed: {0}")]
    HttpClient(#[source] reqwest::Error),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

/// Wires the shared HTTP client, the outbound gateways, the offset
/// resolver, and the intent dispatcher from an already-loaded config.
pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        request_id = "bootstrap",
        "starting application bootstrap"
    );

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http.timeout_secs))
        .build()
        .map_err(BootstrapError::HttpClient)?;

    let resolver = Arc::new(OffsetResolver::new(
        Arc::new(HttpDeviceAddressGateway::new(client.clone(), config.alexa.address_base_url.clone())),
        Arc::new(HttpGeocodeGateway::new(
            client.clone(),
            config.maps.geocode_url.clone(),
            config.maps.api_key.clone(),
        )),
        Arc::new(HttpTimezoneGateway::new(
            client.clone(),
            config.maps.timezone_url.clone(),
            config.maps.api_key.clone(),
        )),
    ));
    let slack = Arc::new(HttpSlackGateway::new(client, config.slack.base_url.clone()));

    let dispatcher = Arc::new(skill_dispatcher(resolver, slack));

    info!(
        event_name = "system.bootstrap.gateways_wired",
        request_id = "bootstrap",
        handler_count = dispatcher.handler_count(),
        "outbound gateways and intent handlers wired"
    );

    Ok(Application { config, dispatcher })
}

#[cfg(test)]
mod tests {
    use awaybot_core::config::{ConfigOverrides, LoadOptions};

    use super::bootstrap;

    #[tokio::test]
    async fn bootstrap_fails_fast_without_a_maps_api_key() {
        let result = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                maps_api_key: Some(String::new()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .await;

        assert!(result.is_err());
        let message = result.err().expect("error").to_string();
        assert!(message.contains("maps.api_key"));
    }

    #[tokio::test]
    async fn bootstrap_wires_every_intent_handler() {
        let app = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                maps_api_key: Some("test-key".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .await
        .expect("bootstrap should succeed with an api key override");

        assert_eq!(app.dispatcher.handler_count(), 8);
    }
}
