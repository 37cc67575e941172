//! Template server.
//!
//! HTTP server for theme previews. Dispatch is by path shape:
//!
//! - `/livereload.js` - embedded client script from memory
//! - `/<template>.liquid` - rendered with mock user data
//! - anything else - static passthrough under the theme directory

mod content;
mod path;
mod render;
pub mod report;
mod response;

use std::sync::Arc;

use anyhow::Result;
use tiny_http::{Request, Server};

use crate::config::{Config, TEMPLATE_SUFFIX};
use crate::data::UserSource;
use crate::embed;

/// Bind the HTTP server and run the request loop (blocking).
pub fn run(config: Arc<Config>, users: Arc<dyn UserSource>) -> Result<()> {
    let addr = format!("127.0.0.1:{}", config.port);
    let server = Server::http(&addr)
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", addr, e))?;
    let server = Arc::new(server);

    // Ctrl+C unblocks the request loop through this handle
    crate::core::register_server(Arc::clone(&server));

    crate::log!("serve"; "http://localhost:{}", config.port);
    report::print_templates(&config);

    run_request_loop(&server, &config, &users);
    Ok(())
}

fn run_request_loop(server: &Server, config: &Arc<Config>, users: &Arc<dyn UserSource>) {
    // Thread pool keeps a slow mock-data fetch from blocking other requests
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .expect("failed to create thread pool");

    for request in server.incoming_requests() {
        if crate::core::is_shutdown() {
            break;
        }
        let config = Arc::clone(config);
        let users = Arc::clone(users);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &config, users.as_ref()) {
                crate::log!("serve"; "request error: {e}");
            }
        });
    }
}

/// Handle a single HTTP request
fn handle_request(request: Request, config: &Config, users: &dyn UserSource) -> Result<()> {
    // Serve the live-reload client script from memory
    if request.url() == embed::LIVERELOAD_JS_PATH {
        return response::respond_livereload_js(request);
    }

    let clean = path::normalize_url(request.url());
    if clean.is_empty() {
        return response::respond_not_found(request);
    }

    // Single-segment template paths render; everything else is a static
    // passthrough (images, fonts, nested assets)
    let single_segment = !clean.contains('/');
    if single_segment && clean.ends_with(TEMPLATE_SUFFIX) {
        return render::respond_template(request, &clean, config, users);
    }

    match path::resolve_static(&clean, &config.theme_dir()) {
        Some(file) => response::respond_file(request, &file),
        None => response::respond_not_found(request),
    }
}
