//! Template rendering for theme previews.
//!
//! Templates are read from disk on every request (they change under the
//! developer's editor) and rendered with a fresh mock user object plus the
//! `devserver` flag. The mock-data fetch happens per render, uncached; a
//! failing fetch fails the request rather than rendering without data.

use std::fs;

use anyhow::{Context, Result};
use minijinja::{Environment, context};
use tiny_http::Request;

use super::{content, response};
use crate::config::Config;
use crate::data::UserSource;
use crate::utils::mime::types::HTML;

/// Render `<theme>/<name>` and respond with the result.
pub fn respond_template(
    request: Request,
    name: &str,
    config: &Config,
    users: &dyn UserSource,
) -> Result<()> {
    let path = config.theme_dir().join(name);

    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return response::respond_not_found(request);
        }
        Err(e) => {
            let err = anyhow::Error::new(e).context(format!("failed to read {}", path.display()));
            return response::respond_render_error(request, &err);
        }
    };

    match render_template(name, &source, users) {
        Ok(html) => {
            let body = content::maybe_inject_livereload(html.into_bytes(), HTML);
            response::send_body(request, 200, HTML, body)
        }
        Err(e) => {
            crate::log!("serve"; "render {} failed: {:#}", name, e);
            response::respond_render_error(request, &e)
        }
    }
}

/// Render a template source with the preview context `{ user, devserver }`.
fn render_template(name: &str, source: &str, users: &dyn UserSource) -> Result<String> {
    let user = users.fetch_user().context("mock user fetch failed")?;

    let env = Environment::new();
    let html = env
        .render_named_str(name, source, context! { user => user, devserver => true })
        .with_context(|| format!("failed to render {name}"))?;
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StubUsers(serde_json::Value);

    impl UserSource for StubUsers {
        fn fetch_user(&self) -> Result<serde_json::Value> {
            Ok(self.0.clone())
        }
    }

    struct FailingUsers;

    impl UserSource for FailingUsers {
        fn fetch_user(&self) -> Result<serde_json::Value> {
            anyhow::bail!("connection refused")
        }
    }

    #[test]
    fn test_render_with_user_context() {
        let users = StubUsers(json!({
            "first_name": "Jane",
            "last_name": "Doe",
            "email": "jane@example.com",
        }));
        let source = "<html><body>\
            <h1>{{ user.first_name }} {{ user.last_name }}</h1>\
            {% if devserver %}<p>dev</p>{% endif %}\
            </body></html>";

        let html = render_template("home.liquid", source, &users).unwrap();
        assert!(html.contains("<h1>Jane Doe</h1>"));
        assert!(html.contains("<p>dev</p>"));
    }

    #[test]
    fn test_fetch_failure_fails_render() {
        // The render must fail rather than fall back to an empty user
        let err = render_template("home.liquid", "{{ user.email }}", &FailingUsers).unwrap_err();
        assert!(format!("{err:#}").contains("mock user fetch failed"));
    }

    #[test]
    fn test_template_error_reported() {
        let users = StubUsers(json!({"first_name": "Jane"}));
        let err = render_template("broken.liquid", "{% if %}", &users).unwrap_err();
        assert!(format!("{err:#}").contains("broken.liquid"));
    }
}
