//! Style compiler trigger.
//!
//! Watches the theme's `scss/` directory and recompiles the fixed entry
//! stylesheet into minified CSS plus a source map on every settled change.
//! One compile runs unconditionally at startup.

mod compile;
mod watch;

pub use compile::{CompileError, CompiledStyles, compile_entry, compile_theme};
pub use watch::start;
