//! Sales pipeline board engine
//!
//! Turns a page of deals and a stage dictionary into kanban lanes, and moves
//! deals between stages optimistically: the cache changes at once and is
//! rolled back when the server rejects the update.

pub mod config;
pub mod core;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use core::{BoardEvent, BoardState, BoardView, MoveOutcome, Text, Translator};
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{PendingMove, Pipeline};
pub use render::render_board;
pub use traits::{DealsApi, Notifier, StageDictionarySource};
