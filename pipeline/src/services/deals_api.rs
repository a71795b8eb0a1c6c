//! HTTP client for the deals resource
//!
//! - `GET {base}/api/customers/deals?page=1&pageSize=N&sortField=createdAt&sortDir=desc`
//! - `PUT {base}/api/customers/deals` with `{ id, pipelineStage }`
//!
//! Bodies that are not JSON read as `null`; a 2xx listing with such a body
//! therefore normalizes to an empty page.

use reqwest::{Client, Response};
use serde_json::Value;
use shared::messages::DEALS_PATH;
use shared::{error_message, process_debug, DealsListQuery, ProcessId, UpdateStageRequest};
use url::Url;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::traits::DealsApi;

pub struct RealDealsApi {
    client: Client,
    deals_url: Url,
}

impl RealDealsApi {
    pub fn new(config: &PipelineConfig) -> PipelineResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| PipelineError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            deals_url: config.endpoint(DEALS_PATH)?,
        })
    }
}

/// Status check shared by every API call: non-2xx carries the body's `error`
pub(crate) async fn read_body(response: Response) -> PipelineResult<Value> {
    let status = response.status();
    let body = response.json::<Value>().await.unwrap_or(Value::Null);

    if status.is_success() {
        Ok(body)
    } else {
        Err(PipelineError::ApiRejected {
            status: status.as_u16(),
            server_message: error_message(&body),
        })
    }
}

#[async_trait::async_trait]
impl DealsApi for RealDealsApi {
    async fn fetch_page(&self, query: DealsListQuery) -> PipelineResult<Value> {
        process_debug!(ProcessId::current(), "GET {} page_size={}", self.deals_url, query.page_size);

        let response = self.client.get(self.deals_url.clone()).query(&query).send().await?;
        read_body(response).await
    }

    async fn update_stage(&self, request: UpdateStageRequest) -> PipelineResult<()> {
        process_debug!(
            ProcessId::current(),
            "PUT {} deal={} stage={}",
            self.deals_url,
            request.id,
            request.pipeline_stage
        );

        let response = self.client.put(self.deals_url.clone()).json(&request).send().await?;
        read_body(response).await.map(|_| ())
    }
}
