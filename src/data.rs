//! Mock user data source.
//!
//! Template previews render against a synthetic user object fetched from a
//! public mock-data endpoint. The source sits behind a trait so tests (and
//! future deployments) can substitute their own. The HTTP implementation
//! does no caching, no retry and sets no timeout.

use anyhow::{Context, Result};
use serde_json::Value;

/// Public endpoint returning one synthetic user per call
pub const DEFAULT_USER_ENDPOINT: &str = "https://random-data-api.com/api/v2/users";

/// Source of the synthetic user object injected into template renders
pub trait UserSource: Send + Sync {
    fn fetch_user(&self) -> Result<Value>;
}

/// Fetches the user object over HTTP, once per render
pub struct HttpUserSource {
    endpoint: String,
}

impl HttpUserSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl UserSource for HttpUserSource {
    fn fetch_user(&self) -> Result<Value> {
        let resp = ureq::get(&self.endpoint)
            .call()
            .with_context(|| format!("GET {}", self.endpoint))?;
        let body = resp
            .into_body()
            .read_to_string()
            .context("failed to read mock user response")?;
        let user = serde_json::from_str(&body).context("mock user response is not JSON")?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetches_json_from_endpoint() {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let handle = std::thread::spawn(move || {
            let request = server.recv().unwrap();
            let response = tiny_http::Response::from_string(
                r#"{"first_name":"Jane","email":"jane@example.com"}"#,
            );
            request.respond(response).unwrap();
        });

        let source = HttpUserSource::new(format!("http://{addr}"));
        let user = source.fetch_user().unwrap();
        assert_eq!(user["first_name"], "Jane");
        assert_eq!(user["email"], "jane@example.com");
        handle.join().unwrap();
    }

    #[test]
    fn test_unreachable_endpoint_is_an_error() {
        // Port 1 is never listening locally
        let source = HttpUserSource::new("http://127.0.0.1:1");
        assert!(source.fetch_user().is_err());
    }

    #[test]
    fn test_non_json_body_is_an_error() {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let handle = std::thread::spawn(move || {
            let request = server.recv().unwrap();
            request
                .respond(tiny_http::Response::from_string("<html>not json</html>"))
                .unwrap();
        });

        let source = HttpUserSource::new(format!("http://{addr}"));
        assert!(source.fetch_user().is_err());
        handle.join().unwrap();
    }
}
