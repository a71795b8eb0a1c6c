//! Service implementations
//!
//! This module contains real implementations of all service traits.
//! These are the production implementations that handle actual I/O operations.

pub mod deals_api;
pub mod dictionary;
pub mod notifier;

#[cfg(test)]
mod tests;

// Re-export all service implementations
pub use deals_api::RealDealsApi;
pub use dictionary::RealStageDictionary;
pub use notifier::BufferedNotifier;
