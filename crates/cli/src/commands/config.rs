use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use awaybot_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_key: &str| {
        field_source(key_path, env_key, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "maps.api_key",
        "<redacted>",
        source("maps.api_key", "AWAYBOT_MAPS_API_KEY"),
    ));
    lines.push(render_line(
        "maps.geocode_url",
        &config.maps.geocode_url,
        source("maps.geocode_url", "AWAYBOT_MAPS_GEOCODE_URL"),
    ));
    lines.push(render_line(
        "maps.timezone_url",
        &config.maps.timezone_url,
        source("maps.timezone_url", "AWAYBOT_MAPS_TIMEZONE_URL"),
    ));
    lines.push(render_line(
        "alexa.address_base_url",
        &config.alexa.address_base_url,
        source("alexa.address_base_url", "AWAYBOT_ALEXA_ADDRESS_BASE_URL"),
    ));
    lines.push(render_line(
        "slack.base_url",
        &config.slack.base_url,
        source("slack.base_url", "AWAYBOT_SLACK_BASE_URL"),
    ));
    lines.push(render_line(
        "http.timeout_secs",
        &config.http.timeout_secs.to_string(),
        source("http.timeout_secs", "AWAYBOT_HTTP_TIMEOUT_SECS"),
    ));
    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        source("server.bind_address", "AWAYBOT_SERVER_BIND_ADDRESS"),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        source("server.port", "AWAYBOT_SERVER_PORT"),
    ));
    lines.push(render_line(
        "server.graceful_shutdown_secs",
        &config.server.graceful_shutdown_secs.to_string(),
        source("server.graceful_shutdown_secs", "AWAYBOT_SERVER_GRACEFUL_SHUTDOWN_SECS"),
    ));
    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", "AWAYBOT_LOGGING_LEVEL"),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", "AWAYBOT_LOGGING_FORMAT"),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("awaybot.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/awaybot.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: &str,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if env::var_os(env_key).is_some() {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
