//! Board web server
//!
//! Serves the derived sales pipeline board as JSON and accepts board events
//! (drag, drop, sort, search) from a browser front end.

pub mod error;
pub mod state;
pub mod web;
pub mod webserver_impl;

// Re-export main types
pub use error::{WebServerError, WebServerResult};
pub use state::{BoardPipeline, WebServerState};
pub use webserver_impl::WebServer;
