//! Configuration validation.
//!
//! Validation is a pure function over [`ClientConfig`] and reports every
//! problem found, not just the first.

use std::fmt;

use crate::config::schema::{ClientConfig, MIN_REFRESH_MARGIN_SECS, MIN_RETRY_BASE_DELAY_MS};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "relay.url", &config.relay.url);
    check_url(&mut errors, "ledger.rpc_url", &config.ledger.rpc_url);

    if config.relay.request_timeout_secs == 0 {
        errors.push(ValidationError::new("relay.request_timeout_secs", "must be greater than 0"));
    }
    if config.ledger.request_timeout_secs == 0 {
        errors.push(ValidationError::new("ledger.request_timeout_secs", "must be greater than 0"));
    }
    if matches!(config.relay.uuid.as_deref(), Some(uuid) if uuid.trim().is_empty()) {
        errors.push(ValidationError::new("relay.uuid", "must not be blank when set"));
    }

    if config.auth.refresh_margin_secs < MIN_REFRESH_MARGIN_SECS {
        errors.push(ValidationError::new(
            "auth.refresh_margin_secs",
            format!("must be at least {MIN_REFRESH_MARGIN_SECS}"),
        ));
    }
    if config.auth.retry_base_delay_ms < MIN_RETRY_BASE_DELAY_MS {
        errors.push(ValidationError::new(
            "auth.retry_base_delay_ms",
            format!("must be at least {MIN_RETRY_BASE_DELAY_MS}"),
        ));
    }

    let confirmation = &config.confirmation;
    if confirmation.relay_poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "confirmation.relay_poll_interval_ms",
            "must be greater than 0",
        ));
    }
    if confirmation.ledger_poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "confirmation.ledger_poll_interval_ms",
            "must be greater than 0",
        ));
    }
    if confirmation.deadline() < confirmation.ledger_poll_interval() {
        errors.push(ValidationError::new(
            "confirmation.deadline_secs",
            "must cover at least one ledger poll interval",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("invalid URL '{value}': {e}"))),
    }
}
