use std::collections::HashSet;

use url::Url;

use crate::monitoring::{EndpointSpec, ProbeKind};

/// Validation results with specific error messages
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self { is_valid: true, error: None }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self { is_valid: false, error: Some(msg.into()) }
    }

    /// Chain another check, keeping the first failure
    pub fn and_then(self, next: impl FnOnce() -> ValidationResult) -> ValidationResult {
        if self.is_valid { next() } else { self }
    }
}

/// Validate an endpoint name. Names key the status table, so they cannot contain `|`.
pub fn validate_endpoint_name(name: &str) -> ValidationResult {
    if name.trim().is_empty() {
        return ValidationResult::err("Endpoint name cannot be empty");
    }

    if name.contains('|') {
        return ValidationResult::err(format!("Endpoint name '{name}' cannot contain '|'"));
    }

    if name.trim() != name {
        return ValidationResult::err(format!(
            "Endpoint name '{name}' cannot start or end with whitespace"
        ));
    }

    ValidationResult::ok()
}

/// Validate a TCP host and port
pub fn validate_tcp_endpoint(host: &str, port: u16) -> ValidationResult {
    if host.trim().is_empty() {
        return ValidationResult::err("TCP target cannot be empty");
    }

    if host.contains("://") {
        return ValidationResult::err(format!(
            "TCP target '{host}' must be a host name or IP address, not a URL"
        ));
    }

    if port == 0 {
        return ValidationResult::err("Port 0 is not valid");
    }

    ValidationResult::ok()
}

/// Validate an HTTP/HTTPS content check
pub fn validate_content_endpoint(target: &str, marker: &str) -> ValidationResult {
    if target.trim().is_empty() {
        return ValidationResult::err("Target cannot be empty");
    }

    match Url::parse(target) {
        Ok(url) => {
            let scheme = url.scheme();
            if scheme != "http" && scheme != "https" {
                return ValidationResult::err(format!(
                    "Invalid scheme '{scheme}'. Must be http or https"
                ));
            }

            if url.host_str().is_none() {
                return ValidationResult::err("URL must have a valid host");
            }
        }
        Err(e) => {
            if !target.contains("://") {
                return ValidationResult::err("URL must include scheme (http:// or https://)");
            }
            return ValidationResult::err(format!("Invalid URL: {e}"));
        }
    }

    if marker.is_empty() {
        return ValidationResult::err("Unavailable marker cannot be empty");
    }

    ValidationResult::ok()
}

/// Validate a single endpoint according to its probe kind
pub fn validate_endpoint(endpoint: &EndpointSpec) -> ValidationResult {
    validate_endpoint_name(&endpoint.name).and_then(|| match &endpoint.probe {
        ProbeKind::Tcp { port } => validate_tcp_endpoint(&endpoint.target, *port),
        ProbeKind::Content { unavailable_marker } => {
            validate_content_endpoint(&endpoint.target, unavailable_marker)
        }
    })
}

/// Validate the whole endpoint list: non-empty, every entry valid, names unique
pub fn validate_endpoints(endpoints: &[EndpointSpec]) -> ValidationResult {
    if endpoints.is_empty() {
        return ValidationResult::err("At least one endpoint must be configured");
    }

    let mut names = HashSet::new();
    for endpoint in endpoints {
        let result = validate_endpoint(endpoint);
        if !result.is_valid {
            let reason = result.error.unwrap_or_default();
            return ValidationResult::err(format!("Endpoint '{}': {reason}", endpoint.name));
        }
        if !names.insert(endpoint.name.as_str()) {
            return ValidationResult::err(format!("Duplicate endpoint name '{}'", endpoint.name));
        }
    }

    ValidationResult::ok()
}

/// Validate the refresh interval
pub fn validate_interval(interval_seconds: u64) -> ValidationResult {
    const MIN_INTERVAL: u64 = 1;
    const MAX_INTERVAL: u64 = 86400; // 24 hours

    if !(MIN_INTERVAL..=MAX_INTERVAL).contains(&interval_seconds) {
        return ValidationResult::err(format!(
            "Refresh interval must be between {MIN_INTERVAL} and {MAX_INTERVAL} seconds (got {interval_seconds})"
        ));
    }

    ValidationResult::ok()
}

/// Validate the probe timeout
pub fn validate_timeout_ms(timeout_ms: u64) -> ValidationResult {
    const MIN_TIMEOUT: u64 = 100;
    const MAX_TIMEOUT: u64 = 300_000; // 5 minutes

    if !(MIN_TIMEOUT..=MAX_TIMEOUT).contains(&timeout_ms) {
        return ValidationResult::err(format!(
            "Probe timeout must be between {MIN_TIMEOUT} and {MAX_TIMEOUT} ms (got {timeout_ms})"
        ));
    }

    ValidationResult::ok()
}
