//! Blocking HTTP transport.
//!
//! One request per call, no retries. Default headers are fixed when the
//! transport is built and sent with every request; non-2xx responses are
//! turned into `RedmineError` before any body mapping happens.

use std::time::Duration;

use ureq::http::Response;
use ureq::{Agent, Body, RequestBuilder};

use crate::error::{RedmineError, Result};

pub struct Transport {
    agent: Agent,
    base_url: String,
    headers: Vec<(String, String)>,
}

impl Transport {
    pub fn new(base_url: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            headers: Vec::new(),
        }
    }

    /// Set the headers sent with every request.
    pub fn with_headers(mut self, headers: &[(&str, &str)]) -> Self {
        self.headers = headers
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn get(&self, path: &str) -> Result<Vec<u8>> {
        log::debug!("GET {}", path);
        let request = self.with_defaults(self.agent.get(&self.url(path)), None);
        self.finish("GET", path, request.call())
    }

    pub fn post(&self, path: &str, body: &[u8]) -> Result<Vec<u8>> {
        log::debug!("POST {}", path);
        let request = self.with_defaults(self.agent.post(&self.url(path)), None);
        self.finish("POST", path, request.send(body))
    }

    pub fn put(&self, path: &str, body: &[u8]) -> Result<Vec<u8>> {
        log::debug!("PUT {}", path);
        let request = self.with_defaults(self.agent.put(&self.url(path)), None);
        self.finish("PUT", path, request.send(body))
    }

    /// DELETE without a body; the response body is only read for error
    /// reporting.
    pub fn delete(&self, path: &str) -> Result<()> {
        log::debug!("DELETE {}", path);
        let request = self.with_defaults(self.agent.delete(&self.url(path)), None);
        self.finish("DELETE", path, request.call())?;
        Ok(())
    }

    /// POST raw bytes as `application/octet-stream` (file uploads).
    pub fn post_octets(&self, path: &str, bytes: &[u8]) -> Result<Vec<u8>> {
        log::debug!("POST {} ({} bytes)", path, bytes.len());
        let request = self
            .with_defaults(self.agent.post(&self.url(path)), Some("Content-Type"))
            .header("Content-Type", "application/octet-stream");
        self.finish("POST", path, request.send(bytes))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_defaults<B>(
        &self,
        mut request: RequestBuilder<B>,
        skip: Option<&str>,
    ) -> RequestBuilder<B> {
        for (name, value) in &self.headers {
            if skip.is_some_and(|s| s.eq_ignore_ascii_case(name)) {
                continue;
            }
            request = request.header(name.as_str(), value.as_str());
        }
        request
    }

    fn finish(
        &self,
        method: &str,
        path: &str,
        result: std::result::Result<Response<Body>, ureq::Error>,
    ) -> Result<Vec<u8>> {
        let mut response = result?;
        let status = response.status().as_u16();
        log::debug!("{} {} -> {}", method, path, status);

        let body = response.body_mut().read_to_vec()?;
        if (200..300).contains(&status) {
            return Ok(body);
        }
        Err(status_error(status, path, &body))
    }
}

/// Join `key=value` fragments into a `?`-prefixed query string.
pub fn compile_query<S: AsRef<str>>(filters: &[S]) -> String {
    if filters.is_empty() {
        return String::new();
    }
    let joined: Vec<&str> = filters.iter().map(|f| f.as_ref()).collect();
    format!("?{}", joined.join("&"))
}

fn status_error(status: u16, path: &str, body: &[u8]) -> RedmineError {
    match status {
        401 => RedmineError::Unauthorized,
        404 => RedmineError::NotFound(path.to_string()),
        _ => RedmineError::Api {
            status,
            message: error_message(status, body),
        },
    }
}

/// Redmine reports validation failures as `{"errors": ["...", ...]}`.
fn error_message(status: u16, body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        if let Some(errors) = value.get("errors").and_then(|e| e.as_array()) {
            let messages: Vec<&str> = errors.iter().filter_map(|e| e.as_str()).collect();
            if !messages.is_empty() {
                return messages.join("; ");
            }
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        format!("HTTP {}", status)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_query_empty_filters() {
        let filters: [&str; 0] = [];
        assert_eq!(compile_query(&filters), "");
    }

    #[test]
    fn compile_query_joins_in_order() {
        assert_eq!(
            compile_query(&["project_id=1", "status_id=open", "limit=5"]),
            "?project_id=1&status_id=open&limit=5"
        );
        assert_eq!(compile_query(&["q=x".to_string()]), "?q=x");
    }

    #[test]
    fn validation_errors_are_joined() {
        let body = br#"{"errors": ["Subject cannot be blank", "Tracker is invalid"]}"#;
        assert_eq!(
            error_message(422, body),
            "Subject cannot be blank; Tracker is invalid"
        );
    }

    #[test]
    fn non_json_error_body_is_used_verbatim() {
        assert_eq!(error_message(500, b"  Internal error \n"), "Internal error");
        assert_eq!(error_message(503, b""), "HTTP 503");
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(status_error(401, "/x", b""), RedmineError::Unauthorized));
        assert!(matches!(
            status_error(404, "/issues/9.json", b""),
            RedmineError::NotFound(ref p) if p == "/issues/9.json"
        ));
        assert!(matches!(
            status_error(403, "/x", b""),
            RedmineError::Api { status: 403, .. }
        ));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let transport = Transport::new("https://redmine.example.com/");
        assert_eq!(transport.base_url(), "https://redmine.example.com");
        assert_eq!(transport.url("/issues.json"), "https://redmine.example.com/issues.json");
    }
}
