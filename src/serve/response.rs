//! HTTP response handlers.

use super::content::maybe_inject_livereload;
use crate::embed;
use crate::utils::mime;
use anyhow::{Context, Result};
use std::{fs, path::Path};
use tiny_http::{Header, Method, Request, Response, StatusCode};

/// Respond with a static file, injecting the live-reload script into HTML.
pub fn respond_file(request: Request, path: &Path) -> Result<()> {
    let content_type = mime::from_path(path);

    if is_head_request(&request) {
        return send_head(request, 200, content_type);
    }

    let body = match fs::read(path) {
        Ok(body) => body,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return respond_not_found(request);
        }
        Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
    };
    let body = maybe_inject_livereload(body, content_type);

    send_body(request, 200, content_type, body)
}

/// Respond with the default 404 body.
pub fn respond_not_found(request: Request) -> Result<()> {
    use crate::utils::mime::types::PLAIN;

    if is_head_request(&request) {
        return send_head(request, 404, PLAIN);
    }
    send_body(request, 404, PLAIN, b"404 Not Found".to_vec())
}

/// Respond with a render failure (500), live-reload included so the page
/// refreshes itself once the template is fixed.
pub fn respond_render_error(request: Request, error: &anyhow::Error) -> Result<()> {
    use crate::utils::mime::types::HTML;

    let error_str = format!("{error:#}");
    let msg = crate::utils::html::escape(&error_str);
    let body = format!("<html><body><h1>Render Error</h1><pre>{msg}</pre></body></html>");
    let body = maybe_inject_livereload(body.into_bytes(), HTML);
    send_body(request, 500, HTML, body)
}

/// Respond with livereload.js from memory.
pub fn respond_livereload_js(request: Request) -> Result<()> {
    use crate::utils::mime::types::JAVASCRIPT;

    let body = embed::livereload_js();
    send_body(request, 200, JAVASCRIPT, body.into_bytes())
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(request: Request, status: u16, content_type: &'static str) -> Result<()> {
    let response = Response::empty(StatusCode(status))
        .with_header(make_header("Content-Type", content_type));
    request.respond(response)?;
    Ok(())
}

pub fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type));
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    Header::from_bytes(key, value).unwrap()
}
