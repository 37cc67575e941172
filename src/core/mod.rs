//! Core process state shared across components.

mod state;

pub use state::{is_shutdown, register_server, setup_shutdown_handler};
