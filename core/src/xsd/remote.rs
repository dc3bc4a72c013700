//! Schema validation delegated to an external HTTP service.
//!
//! The raw document is POSTed to `{base}/validate/{schema}`. A 2xx answer means
//! valid; any other status is a violation whose message is the response body.
//! Transport failures and timeouts are reported as violations too, so a broken
//! service never lets a document through.

use std::time::Duration;

use ureq::Agent;

use super::XmlSchemaValidator;

/// Client for a remote XML-Schema validation service.
#[derive(Clone)]
pub struct RemoteXsdValidator {
    agent: Agent,
    base_url: String,
}

impl std::fmt::Debug for RemoteXsdValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteXsdValidator")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl RemoteXsdValidator {
    /// Creates a client for the service at `base_url` with a global per-call timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: Agent::new_with_config(config),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The URL documents for `schema` are sent to.
    pub fn endpoint(&self, schema: &str) -> String {
        format!("{}/validate/{schema}", self.base_url)
    }
}

impl XmlSchemaValidator for RemoteXsdValidator {
    fn validate(&self, xml: &str, schema: &str) -> Result<(), String> {
        let url = self.endpoint(schema);
        tracing::debug!(%url, "delegating XML schema validation");

        let mut response = self
            .agent
            .post(&url)
            .header("Content-Type", "application/xml")
            .send(xml)
            .map_err(|e| {
                tracing::warn!(%url, error = %e, "schema service unreachable");
                format!("schema validation service failed: {e}")
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .body_mut()
            .read_to_string()
            .unwrap_or_default();
        let message = body.trim();
        if message.is_empty() {
            Err(format!("schema validation failed with status {}", status.as_u16()))
        } else {
            Err(message.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let validator = RemoteXsdValidator::new("http://localhost:9000/", Duration::from_secs(1));
        assert_eq!(
            validator.endpoint("sensor"),
            "http://localhost:9000/validate/sensor"
        );
    }

    #[test]
    fn test_unreachable_service_fails_closed() {
        // Port 9 (discard) on loopback is closed in test environments.
        let validator = RemoteXsdValidator::new("http://127.0.0.1:9", Duration::from_millis(500));
        let err = validator.validate("<sensor/>", "sensor").unwrap_err();
        assert!(err.starts_with("schema validation service failed"), "{err}");
    }
}
