use awaybot_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_maps_api_key(&config));
            checks.push(check_endpoint_urls(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["maps_api_key_readiness", "endpoint_urls"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_maps_api_key(config: &AppConfig) -> DoctorCheck {
    let key = config.maps.api_key.expose_secret();
    if key.trim().is_empty() {
        DoctorCheck {
            name: "maps_api_key_readiness",
            status: CheckStatus::Fail,
            details: "maps.api_key is empty".to_string(),
        }
    } else {
        DoctorCheck {
            name: "maps_api_key_readiness",
            status: CheckStatus::Pass,
            details: format!("api key present ({} characters)", key.len()),
        }
    }
}

fn check_endpoint_urls(config: &AppConfig) -> DoctorCheck {
    let endpoints = [
        ("maps.geocode_url", config.maps.geocode_url.as_str()),
        ("maps.timezone_url", config.maps.timezone_url.as_str()),
        ("alexa.address_base_url", config.alexa.address_base_url.as_str()),
        ("slack.base_url", config.slack.base_url.as_str()),
    ];

    let insecure: Vec<&str> = endpoints
        .iter()
        .filter(|(_, url)| !url.starts_with("https://"))
        .map(|(name, _)| *name)
        .collect();

    if insecure.is_empty() {
        DoctorCheck {
            name: "endpoint_urls",
            status: CheckStatus::Pass,
            details: "all outbound endpoints use https".to_string(),
        }
    } else {
        DoctorCheck {
            name: "endpoint_urls",
            status: CheckStatus::Fail,
            details: format!("endpoints without https: {}", insecure.join(", ")),
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
