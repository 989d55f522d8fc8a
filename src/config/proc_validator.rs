//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Checks settings (server, logging, http bounds)
//! - Checks telco credentials per flow in use
//! - Checks the CIBA assertion block and the MEC gateway headers

use std::net::IpAddr;

use tracing::{error, info};

use crate::config::settings::SettingsConfig;
use crate::config::telco::{
    CibaConfig, ClientPair, ScopedClient, ServiceConfig, SessionFlow, SubjectType, TelcoConfig,
};
use crate::observability::metrics::get_metrics;
use crate::utils::constants::{API_VERSION_MEC_QOS_V1, MAX_ASSERTION_VALIDITY_SECS};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub async fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_telco(&cfg.telco, &mut errors);

    if errors.is_empty() {
        info!("config is valid");
        return Ok(());
    }

    let metrics = get_metrics().await;
    for err in &errors {
        error!("config validation: {}", err);
        metrics.config_validation_errors.inc();
    }
    Err(errors)
}

fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if settings.server.host.trim().is_empty() {
        errors.push("settings.server.host must not be empty".to_string());
    }
    if settings.server.port.parse::<u16>().is_err() {
        errors.push(format!(
            "settings.server.port '{}' is not a valid port",
            settings.server.port
        ));
    }
    if let Some(logging) = &settings.logging {
        if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' must be one of {:?}",
                logging.level, LOG_LEVELS
            ));
        }
    }
    if settings.metrics.is_enabled && !settings.metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            settings.metrics.path
        ));
    }
    if settings.http.timeout_ms == 0 {
        errors.push("settings.http.timeout_ms must be greater than 0".to_string());
    }
    if settings.http.connect_timeout_ms == 0 {
        errors.push("settings.http.connect_timeout_ms must be greater than 0".to_string());
    }
}

fn validate_telco(telco: &TelcoConfig, errors: &mut Vec<String>) {
    if telco.api_version.trim().is_empty() {
        errors.push("telco.api_version must not be empty".to_string());
    }
    validate_url("telco.auth_server_url", &telco.auth_server_url, errors);
    validate_url("telco.api_base_url", &telco.api_base_url, errors);

    for (name, path) in [
        ("token_path", &telco.endpoints.token_path),
        ("bc_authorize_path", &telco.endpoints.bc_authorize_path),
        ("client_credentials_path", &telco.endpoints.client_credentials_path),
    ] {
        if !path.starts_with('/') {
            errors.push(format!("telco.endpoints.{} '{}' must start with '/'", name, path));
        }
    }

    validate_client_pair("telco.session", &telco.session, errors);

    match (telco.session_flow, &telco.ciba) {
        (SessionFlow::Ciba, None) => {
            errors.push("telco.ciba is required when session_flow is 'ciba'".to_string())
        }
        (_, Some(ciba)) => validate_ciba(ciba, errors),
        (SessionFlow::ClientCredentials, None) => {}
    }

    if let Some(purpose) = &telco.purpose {
        validate_scoped_client("telco.purpose", purpose, false, errors);
    }
    if let Some(app) = &telco.app {
        validate_scoped_client("telco.app", app, true, errors);
    }

    if telco.api_version.trim() == API_VERSION_MEC_QOS_V1 {
        match &telco.gateway_headers {
            None => errors.push(format!(
                "telco.gateway_headers is required for api_version '{}'",
                API_VERSION_MEC_QOS_V1
            )),
            Some(headers) if headers.subject_name.trim().is_empty() => errors
                .push("telco.gateway_headers.subject_name must not be empty".to_string()),
            Some(_) => {}
        }
    }
}

fn validate_url(field: &str, url: &str, errors: &mut Vec<String>) {
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        errors.push(format!("{} '{}' must be an http(s) URL", field, url));
    }
}

fn validate_client_pair(field: &str, pair: &ClientPair, errors: &mut Vec<String>) {
    if pair.client_id.trim().is_empty() {
        errors.push(format!("{}.client_id must not be empty", field));
    }
    if pair.client_secret.is_empty() {
        errors.push(format!("{}.client_secret must not be empty", field));
    }
}

fn validate_scoped_client(
    field: &str,
    client: &ScopedClient,
    delete_required: bool,
    errors: &mut Vec<String>,
) {
    validate_client_pair(field, &client.credentials, errors);
    if client.scopes.create.trim().is_empty() {
        errors.push(format!("{}.scopes.create must not be empty", field));
    }
    if client.scopes.read.trim().is_empty() {
        errors.push(format!("{}.scopes.read must not be empty", field));
    }
    match &client.scopes.delete {
        Some(scope) if scope.trim().is_empty() => {
            errors.push(format!("{}.scopes.delete must not be empty", field))
        }
        None if delete_required => {
            errors.push(format!("{}.scopes.delete is required", field))
        }
        _ => {}
    }
}

fn validate_ciba(ciba: &CibaConfig, errors: &mut Vec<String>) {
    if ciba.issuer.trim().is_empty() {
        errors.push("telco.ciba.issuer must not be empty".to_string());
    }
    if ciba.private_key_path.trim().is_empty() {
        errors.push("telco.ciba.private_key_path must not be empty".to_string());
    }
    if ciba.purpose.trim().is_empty() {
        errors.push("telco.ciba.purpose must not be empty".to_string());
    }
    if ciba.validity_seconds <= 0 || ciba.validity_seconds > MAX_ASSERTION_VALIDITY_SECS {
        errors.push(format!(
            "telco.ciba.validity_seconds must be within 1..={}, got {}",
            MAX_ASSERTION_VALIDITY_SECS, ciba.validity_seconds
        ));
    }

    let hint = &ciba.login_hint;
    match hint.hint_type {
        SubjectType::PhoneNumber => {
            let digits = hint.value.strip_prefix('+').unwrap_or_default();
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                errors.push(format!(
                    "telco.ciba.login_hint.value '{}' is not an E.164 phone number",
                    hint.value
                ));
            }
        }
        SubjectType::Ip => {
            if hint.value.parse::<IpAddr>().is_err() {
                errors.push(format!(
                    "telco.ciba.login_hint.value '{}' is not an IP address",
                    hint.value
                ));
            }
        }
    }
}
