//! HTTP surface of the board

pub mod handlers;
