//! Embedded static resources.
//!
//! The browser-side live-reload client ships inside the binary and is
//! served from memory at [`LIVERELOAD_JS_PATH`]; the fixed WebSocket port
//! is substituted into it at serve time.

use std::marker::PhantomData;

use crate::reload::RELOAD_PORT;

/// URL path the client script is served under
pub const LIVERELOAD_JS_PATH: &str = "/livereload.js";

/// Script tag injected before `</body>` in HTML responses
pub const LIVERELOAD_SCRIPT_TAG: &str = r#"<script src="/livereload.js" async></script>"#;

/// Trait for template variable sets
pub trait TemplateVars {
    fn apply(&self, content: &str) -> String;
}

/// Template with typed variable injection
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    content: &'static str,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content,
            _marker: PhantomData,
        }
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.apply(self.content)
    }
}

/// Variables for livereload.js
pub struct LivereloadVars {
    pub ws_port: u16,
}

impl TemplateVars for LivereloadVars {
    fn apply(&self, content: &str) -> String {
        content.replace("__SHOPDEV_WS_PORT__", &self.ws_port.to_string())
    }
}

/// Browser-side live-reload client
pub const LIVERELOAD_JS: Template<LivereloadVars> = Template::new(include_str!("livereload.js"));

/// Client script with the fixed reload port applied
pub fn livereload_js() -> String {
    LIVERELOAD_JS.render(&LivereloadVars {
        ws_port: RELOAD_PORT,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_substitution() {
        let js = livereload_js();
        assert!(js.contains("ws://localhost:3001/"));
        assert!(!js.contains("__SHOPDEV_WS_PORT__"));
    }

    #[test]
    fn test_script_tag_references_served_path() {
        assert!(LIVERELOAD_SCRIPT_TAG.contains(LIVERELOAD_JS_PATH));
    }
}
