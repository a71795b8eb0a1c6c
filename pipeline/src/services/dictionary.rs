//! HTTP client for the pipeline-stage dictionary

use reqwest::Client;
use shared::messages::PIPELINE_STAGES_PATH;
use shared::{process_debug, DictionaryEntry, DictionaryResponse, ProcessId};
use url::Url;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::services::deals_api::read_body;
use crate::traits::StageDictionarySource;

pub struct RealStageDictionary {
    client: Client,
    stages_url: Url,
}

impl RealStageDictionary {
    pub fn new(config: &PipelineConfig) -> PipelineResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| PipelineError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            stages_url: config.endpoint(PIPELINE_STAGES_PATH)?,
        })
    }
}

#[async_trait::async_trait]
impl StageDictionarySource for RealStageDictionary {
    async fn fetch_stages(&self) -> PipelineResult<Vec<DictionaryEntry>> {
        process_debug!(ProcessId::current(), "GET {}", self.stages_url);

        let response = self.client.get(self.stages_url.clone()).send().await?;
        let body = read_body(response).await?;
        Ok(DictionaryResponse::from_value(&body).entries)
    }
}
