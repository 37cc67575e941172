//! SCSS compilation pipeline.
//!
//! `grass` expands SCSS to plain CSS, `lightningcss` minifies it and emits
//! the source map. Both output files are overwritten on every successful
//! run; on failure the previous outputs stay in place.

use std::fs;
use std::path::{Path, PathBuf};

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use parcel_sourcemap::SourceMap;
use thiserror::Error;

use crate::config::Config;

/// Style compilation errors
#[derive(Debug, Error)]
pub enum CompileError {
    /// SCSS error; grass formats the location (file:line:column) into the message
    #[error("{0}")]
    Scss(String),

    #[error("failed to {action} `{path}`")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("css post-processing failed: {0}")]
    Postprocess(String),
}

/// Compiled stylesheet text plus its source map; nothing retained across runs
pub struct CompiledStyles {
    pub css: String,
    pub map: String,
}

/// Compile the entry stylesheet to minified CSS and a source map.
pub fn compile_entry(entry: &Path) -> Result<CompiledStyles, CompileError> {
    let expanded = grass::from_path(entry, &grass::Options::default())
        .map_err(|e| CompileError::Scss(e.to_string()))?;
    postprocess(&expanded, entry)
}

/// Minify and attach a source map referencing the entry stylesheet.
fn postprocess(css: &str, entry: &Path) -> Result<CompiledStyles, CompileError> {
    let filename = entry.display().to_string();
    let stylesheet = StyleSheet::parse(
        css,
        ParserOptions {
            filename,
            ..ParserOptions::default()
        },
    )
    .map_err(|e| CompileError::Postprocess(e.to_string()))?;

    let mut source_map = SourceMap::new("/");
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            source_map: Some(&mut source_map),
            ..PrinterOptions::default()
        })
        .map_err(|e| CompileError::Postprocess(e.to_string()))?;

    let map = source_map
        .to_json(None)
        .map_err(|e| CompileError::Postprocess(format!("{e:?}")))?;

    Ok(CompiledStyles {
        css: result.code,
        map,
    })
}

/// Compile the theme's entry stylesheet and flush both output files.
pub fn compile_theme(config: &Config) -> Result<(), CompileError> {
    let out_dir = config.css_dir();
    fs::create_dir_all(&out_dir).map_err(|e| CompileError::Io {
        action: "create",
        path: out_dir,
        source: e,
    })?;

    let styles = compile_entry(&config.scss_entry())?;

    let css_out = config.css_out();
    fs::write(&css_out, styles.css).map_err(|e| CompileError::Io {
        action: "write",
        path: css_out.clone(),
        source: e,
    })?;

    let map_out = config.css_map_out();
    fs::write(&map_out, styles.map).map_err(|e| CompileError::Io {
        action: "write",
        path: map_out.clone(),
        source: e,
    })?;

    Ok(())
}
