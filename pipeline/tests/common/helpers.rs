//! Test helpers and builder patterns for pipeline tests
//!
//! `TestBackend` plays the deals API: the mocks it hands out read and write
//! one shared set of deal records, so a committed move shows up on refetch.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pipeline::services::BufferedNotifier;
use pipeline::traits::{MockDealsApi, MockStageDictionarySource};
use pipeline::{BoardView, DealsApi, Pipeline, PipelineConfig, PipelineError, PipelineResult, Translator};
use serde_json::{json, Value};
use shared::{DealsListQuery, DictionaryEntry, NoticeLevel, UpdateStageRequest};
use tokio::sync::oneshot;

use super::fixtures::TestFixtures;

pub type TestPipeline = Pipeline<MockDealsApi, MockStageDictionarySource, BufferedNotifier>;

/// How a backend call should fail
#[derive(Debug, Clone)]
pub enum Failure {
    Rejected { status: u16, message: Option<String> },
    Network,
}

impl Failure {
    pub fn rejected(status: u16, message: &str) -> Self {
        Failure::Rejected {
            status,
            message: Some(message.to_string()),
        }
    }

    fn to_error(&self) -> PipelineError {
        match self {
            Failure::Rejected { status, message } => PipelineError::ApiRejected {
                status: *status,
                server_message: message.clone(),
            },
            Failure::Network => PipelineError::NetworkError {
                message: "connection refused".to_string(),
            },
        }
    }
}

/// In-memory stand-in for the customers API
#[derive(Clone, Default)]
pub struct TestBackend {
    deals: Arc<Mutex<Vec<Value>>>,
    total: Arc<Mutex<Option<u64>>>,
    stages: Arc<Mutex<Option<Vec<DictionaryEntry>>>>,
    fetch_failure: Arc<Mutex<Option<Failure>>>,
    update_failure: Arc<Mutex<Option<Failure>>>,
    fetches: Arc<AtomicUsize>,
    queries: Arc<Mutex<Vec<DealsListQuery>>>,
    updates: Arc<Mutex<Vec<UpdateStageRequest>>>,
}

impl TestBackend {
    /// Backend serving the standard fixtures
    pub fn standard() -> Self {
        let backend = Self::default();
        backend.set_deals(TestFixtures::deal_records());
        backend.set_stages(Some(TestFixtures::dictionary()));
        backend
    }

    pub fn set_deals(&self, deals: Vec<Value>) {
        *self.deals.lock().unwrap() = deals;
    }

    pub fn set_total(&self, total: u64) {
        *self.total.lock().unwrap() = Some(total);
    }

    /// `None` makes the dictionary endpoint fail
    pub fn set_stages(&self, stages: Option<Vec<DictionaryEntry>>) {
        *self.stages.lock().unwrap() = stages;
    }

    pub fn fail_fetches(&self, failure: Option<Failure>) {
        *self.fetch_failure.lock().unwrap() = failure;
    }

    pub fn fail_updates(&self, failure: Option<Failure>) {
        *self.update_failure.lock().unwrap() = failure;
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<DealsListQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<UpdateStageRequest> {
        self.updates.lock().unwrap().clone()
    }

    /// Stage the server holds for a deal
    pub fn stage_on_server(&self, deal_id: &str) -> Option<String> {
        self.deals
            .lock()
            .unwrap()
            .iter()
            .find(|deal| deal["id"] == deal_id)
            .and_then(|deal| deal["pipeline_stage"].as_str().map(str::to_string))
    }

    pub fn deals_api(&self) -> MockDealsApi {
        let mut api = MockDealsApi::new();

        let backend = self.clone();
        api.expect_fetch_page().returning(move |query| backend.respond_to_fetch(query));

        let backend = self.clone();
        api.expect_update_stage().returning(move |request| backend.respond_to_update(request));

        api
    }

    pub fn dictionary_source(&self) -> MockStageDictionarySource {
        let mut source = MockStageDictionarySource::new();
        let stages = Arc::clone(&self.stages);
        source.expect_fetch_stages().returning(move || {
            stages.lock().unwrap().clone().ok_or_else(|| PipelineError::NetworkError {
                message: "dictionary unavailable".to_string(),
            })
        });
        source
    }

    pub fn respond_to_fetch(&self, query: DealsListQuery) -> PipelineResult<Value> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query);

        if let Some(failure) = self.fetch_failure.lock().unwrap().as_ref() {
            return Err(failure.to_error());
        }

        let deals = self.deals.lock().unwrap().clone();
        let total = self.total.lock().unwrap().unwrap_or(deals.len() as u64);
        Ok(json!({ "items": deals, "total": total }))
    }

    pub fn respond_to_update(&self, request: UpdateStageRequest) -> PipelineResult<()> {
        self.updates.lock().unwrap().push(request.clone());

        if let Some(failure) = self.update_failure.lock().unwrap().as_ref() {
            return Err(failure.to_error());
        }

        let mut deals = self.deals.lock().unwrap();
        if let Some(deal) = deals.iter_mut().find(|deal| deal["id"] == request.id.as_str()) {
            deal["pipeline_stage"] = json!(request.pipeline_stage);
        }
        Ok(())
    }
}

/// Signals of one held fetch
pub struct HeldFetch {
    /// Fires once the fetch has read the server state
    pub started: oneshot::Receiver<()>,
    /// Send to let the fetch answer
    pub release: oneshot::Sender<()>,
}

struct FetchGate {
    started: oneshot::Sender<()>,
    release: oneshot::Receiver<()>,
}

/// Deals API over a `TestBackend` whose next fetch can be held back
///
/// A held fetch reads the deals when it is issued and answers only when
/// released, like a slow response still carrying the old state.
#[derive(Clone)]
pub struct GatedDealsApi {
    backend: TestBackend,
    gate: Arc<Mutex<Option<FetchGate>>>,
}

impl GatedDealsApi {
    pub fn new(backend: TestBackend) -> Self {
        Self {
            backend,
            gate: Arc::new(Mutex::new(None)),
        }
    }

    pub fn hold_next_fetch(&self) -> HeldFetch {
        let (started_tx, started_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        *self.gate.lock().unwrap() = Some(FetchGate {
            started: started_tx,
            release: release_rx,
        });
        HeldFetch {
            started: started_rx,
            release: release_tx,
        }
    }
}

#[async_trait::async_trait]
impl DealsApi for GatedDealsApi {
    async fn fetch_page(&self, query: DealsListQuery) -> PipelineResult<Value> {
        let gate = self.gate.lock().unwrap().take();
        let response = self.backend.respond_to_fetch(query);

        if let Some(gate) = gate {
            let _ = gate.started.send(());
            let _ = gate.release.await;
        }
        response
    }

    async fn update_stage(&self, request: UpdateStageRequest) -> PipelineResult<()> {
        self.backend.respond_to_update(request)
    }
}

/// Builder for pipelines wired to a `TestBackend`
pub struct PipelineBuilder {
    backend: TestBackend,
    translator: Translator,
    config: PipelineConfig,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        let mut config = PipelineConfig::from_lookup(|_| None).unwrap();
        config.scope_version = TestFixtures::SCOPE;

        Self {
            backend: TestBackend::standard(),
            translator: Translator::new(),
            config,
        }
    }

    pub fn with_backend(mut self, backend: TestBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = translator;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.config = self.config.with_page_size(page_size).unwrap();
        self
    }

    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.config.stale_after = stale_after;
        self
    }

    pub fn build(self) -> (TestPipeline, BufferedNotifier) {
        let api = self.backend.deals_api();
        self.build_with_api(api)
    }

    /// Same wiring with a custom deals API; the dictionary still comes from
    /// the backend
    pub fn build_with_api<A: DealsApi + 'static>(
        self,
        api: A,
    ) -> (Pipeline<A, MockStageDictionarySource, BufferedNotifier>, BufferedNotifier) {
        let notices = BufferedNotifier::new();
        let pipeline = Pipeline::new(
            api,
            self.backend.dictionary_source(),
            notices.clone(),
            self.translator,
            &self.config,
        );
        (pipeline, notices)
    }
}

/// Assertion helpers over board views
pub struct TestHelpers;

impl TestHelpers {
    /// Loaded pipeline over the given backend
    pub async fn loaded(backend: &TestBackend) -> (TestPipeline, BufferedNotifier) {
        let (pipeline, notices) = PipelineBuilder::new().with_backend(backend.clone()).build();
        pipeline.load().await.unwrap();
        (pipeline, notices)
    }

    pub fn lane_values(view: &BoardView) -> Vec<Option<String>> {
        view.lanes.iter().map(|lane| lane.stage.value.clone()).collect()
    }

    pub fn card_ids(view: &BoardView, stage: Option<&str>) -> Vec<String> {
        view.lane_by_value(stage)
            .map(|lane| lane.cards.iter().map(|card| card.deal.id.clone()).collect())
            .unwrap_or_default()
    }

    /// Stage of the lane currently showing the deal
    pub fn lane_of(view: &BoardView, deal_id: &str) -> Option<Option<String>> {
        view.lanes
            .iter()
            .find(|lane| lane.cards.iter().any(|card| card.deal.id == deal_id))
            .map(|lane| lane.stage.value.clone())
    }

    pub fn lane_id(view: &BoardView, stage: Option<&str>) -> String {
        view.lane_by_value(stage).map(|lane| lane.stage.id.clone()).unwrap()
    }

    pub fn notices(notifier: &BufferedNotifier) -> Vec<(NoticeLevel, String)> {
        notifier
            .drain()
            .into_iter()
            .map(|notice| (notice.level, notice.message))
            .collect()
    }
}
