//! Webserver state shared with every handler

use pipeline::services::BufferedNotifier;
use pipeline::traits::{DealsApi, StageDictionarySource};
use pipeline::Pipeline;

pub type BoardPipeline<A, D> = Pipeline<A, D, BufferedNotifier>;

/// Board engine plus the notice buffer the UI polls
pub struct WebServerState<A, D>
where
    A: DealsApi + 'static,
    D: StageDictionarySource + 'static,
{
    pub pipeline: BoardPipeline<A, D>,
    pub notices: BufferedNotifier,
}

impl<A, D> WebServerState<A, D>
where
    A: DealsApi + 'static,
    D: StageDictionarySource + 'static,
{
    /// `notices` must be the notifier the pipeline was built with
    pub fn new(pipeline: BoardPipeline<A, D>, notices: BufferedNotifier) -> Self {
        Self { pipeline, notices }
    }
}

impl<A, D> Clone for WebServerState<A, D>
where
    A: DealsApi + 'static,
    D: StageDictionarySource + 'static,
{
    fn clone(&self) -> Self {
        Self {
            pipeline: self.pipeline.clone(),
            notices: self.notices.clone(),
        }
    }
}
