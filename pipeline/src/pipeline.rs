//! Board coordinator
//!
//! Owns the deal cache, the stage dictionary and the board interaction state,
//! and runs the effects the reducer asks for. Locks are never held across a
//! network call; lock order is dictionary, board, store, load error.

use std::sync::Arc;

use tokio::sync::RwLock;

use shared::{
    logging, process_debug, process_info, process_warn, DealsListQuery, DealsPage, DictionaryEntry, ProcessId,
    QueryKey, ScopeVersion, UpdateStageRequest,
};

use crate::config::PipelineConfig;
use crate::core::normalize::normalize_page;
use crate::core::stages::find_lane_by_value;
use crate::core::{
    build_board, reduce, BoardEffect, BoardEvent, BoardState, BoardView, DealStore, DerivedBoard, MoveOutcome,
    MoveTicket, Settlement, Text, Translator,
};
use crate::error::{PipelineError, PipelineResult};
use crate::traits::{DealsApi, Notifier, StageDictionarySource};

/// A stage move that is applied to the cache but not yet sent
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMove {
    ticket: MoveTicket,
}

impl PendingMove {
    pub fn deal_id(&self) -> &str {
        &self.ticket.deal_id
    }

    pub fn target_stage(&self) -> &str {
        &self.ticket.target_stage
    }

    pub fn ticket(&self) -> &MoveTicket {
        &self.ticket
    }
}

/// Sales pipeline board over injected API, dictionary and notice services
pub struct Pipeline<A, D, N>
where
    A: DealsApi + 'static,
    D: StageDictionarySource + 'static,
    N: Notifier + 'static,
{
    /// Injected services
    api: Arc<A>,
    stages: Arc<D>,
    notifier: Arc<N>,
    translator: Arc<Translator>,

    /// Shared state
    dictionary: Arc<RwLock<Vec<DictionaryEntry>>>,
    board: Arc<RwLock<BoardState>>,
    store: Arc<RwLock<DealStore>>,
    load_error: Arc<RwLock<Option<String>>>,
    scope: Arc<RwLock<ScopeVersion>>,

    query: DealsListQuery,
}

impl<A, D, N> Clone for Pipeline<A, D, N>
where
    A: DealsApi + 'static,
    D: StageDictionarySource + 'static,
    N: Notifier + 'static,
{
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            stages: Arc::clone(&self.stages),
            notifier: Arc::clone(&self.notifier),
            translator: Arc::clone(&self.translator),
            dictionary: Arc::clone(&self.dictionary),
            board: Arc::clone(&self.board),
            store: Arc::clone(&self.store),
            load_error: Arc::clone(&self.load_error),
            scope: Arc::clone(&self.scope),
            query: self.query.clone(),
        }
    }
}

impl<A, D, N> Pipeline<A, D, N>
where
    A: DealsApi + 'static,
    D: StageDictionarySource + 'static,
    N: Notifier + 'static,
{
    /// Create a board with injected dependencies; nothing is fetched yet
    pub fn new(api: A, stages: D, notifier: N, translator: Translator, config: &PipelineConfig) -> Self {
        Self {
            api: Arc::new(api),
            stages: Arc::new(stages),
            notifier: Arc::new(notifier),
            translator: Arc::new(translator),
            dictionary: Arc::new(RwLock::new(Vec::new())),
            board: Arc::new(RwLock::new(BoardState::default())),
            store: Arc::new(RwLock::new(DealStore::new(config.stale_after))),
            load_error: Arc::new(RwLock::new(None)),
            scope: Arc::new(RwLock::new(config.scope_version)),
            query: DealsListQuery::first_page(config.page_size),
        }
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub async fn scope(&self) -> ScopeVersion {
        *self.scope.read().await
    }

    pub async fn query_key(&self) -> QueryKey {
        QueryKey::pipeline_deals(self.scope().await)
    }

    pub async fn board_state(&self) -> BoardState {
        self.board.read().await.clone()
    }

    pub async fn cached_page(&self) -> Option<DealsPage> {
        let key = self.query_key().await;
        self.store.read().await.get(&key).cloned()
    }

    pub async fn load_error(&self) -> Option<String> {
        self.load_error.read().await.clone()
    }

    /// Fetch the stage dictionary and the deals page for the current scope
    ///
    /// A failed deals fetch is recorded as the board's load error (server
    /// message, else the localized fallback) and returned.
    pub async fn load(&self) -> PipelineResult<()> {
        let key = self.query_key().await;
        self.reload_dictionary().await;

        match self.fetch_into_store(&key).await {
            Ok(count) => {
                *self.load_error.write().await = None;
                process_info!(ProcessId::current(), "📥 Loaded {} deals for {}", count, key);
                Ok(())
            }
            Err(e) => {
                let message = e
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| self.translator.text(Text::LoadError));
                logging::log_error(ProcessId::current(), "Deals fetch", &e);
                *self.load_error.write().await = Some(message);
                Err(e)
            }
        }
    }

    /// Explicit reload; also the only way out of a recorded load error
    pub async fn refresh(&self) -> PipelineResult<()> {
        *self.load_error.write().await = None;
        self.load().await
    }

    /// Switch to another organizational scope and load it
    pub async fn set_scope(&self, scope: ScopeVersion) -> PipelineResult<()> {
        *self.scope.write().await = scope;
        {
            let mut board = self.board.write().await;
            board.dragging_id = None;
            board.active_lane = None;
        }
        self.store.write().await.retain_scope(scope);
        *self.load_error.write().await = None;

        process_info!(ProcessId::current(), "🔀 Switched to scope {}", scope);
        self.load().await
    }

    /// Current board, fetching first when the cache is missing or stale
    ///
    /// A recorded load error suppresses the automatic fetch; call `refresh`.
    pub async fn view(&self) -> BoardView {
        let key = self.query_key().await;
        let needs_fetch = self.store.read().await.needs_fetch(&key);
        let has_error = self.load_error.read().await.is_some();

        if needs_fetch && !has_error {
            if let Err(e) = self.load().await {
                process_debug!(ProcessId::current(), "Board rendered with load error: {}", e);
            }
        }

        self.render(&key).await
    }

    /// Apply one board event. Moves it starts are already visible in the
    /// cache; hand each returned move to `complete_move`.
    pub async fn apply(&self, event: BoardEvent) -> Vec<PendingMove> {
        let key = self.query_key().await;
        let (moves, effects) = self.reduce_event(&key, event).await;
        self.run_effects(&key, effects).await;
        moves
    }

    /// Send a pending move and settle it: commit, or roll the cache back
    pub async fn complete_move(&self, pending: PendingMove) -> MoveOutcome {
        let ticket = pending.ticket;
        let request = UpdateStageRequest {
            id: ticket.deal_id.clone(),
            pipeline_stage: ticket.target_stage.clone(),
        };

        let outcome = match self.api.update_stage(request).await {
            Ok(()) => {
                self.store.write().await.commit(&ticket);
                logging::log_success(
                    ProcessId::current(),
                    &format!("Deal {} moved to {}", ticket.deal_id, ticket.target_stage),
                );
                MoveOutcome::Committed
            }
            Err(e) => {
                let settlement = self.store.write().await.rollback(&ticket);
                process_warn!(
                    ProcessId::current(),
                    "↩️ Move of deal {} to {} failed: {} (cache {})",
                    ticket.deal_id,
                    ticket.target_stage,
                    e,
                    describe(settlement)
                );
                MoveOutcome::RolledBack {
                    message: e.server_message().map(str::to_string),
                }
            }
        };

        let settled = BoardEvent::MoveSettled {
            deal_id: ticket.deal_id.clone(),
            outcome: outcome.clone(),
        };
        let (_, effects) = self.reduce_event(&ticket.key, settled).await;
        self.run_effects(&ticket.key, effects).await;

        outcome
    }

    /// Apply an event and run every move it starts to completion
    pub async fn dispatch(&self, event: BoardEvent) -> Vec<MoveOutcome> {
        let mut outcomes = Vec::new();
        for pending in self.apply(event).await {
            outcomes.push(self.complete_move(pending).await);
        }
        outcomes
    }

    /// Move a deal to the lane holding `stage`, as a drag and drop would
    ///
    /// Returns `None` when the drop was a no-op or was rejected with a notice.
    pub async fn move_deal(&self, deal_id: &str, stage: &str) -> PipelineResult<Option<MoveOutcome>> {
        let key = self.query_key().await;
        let lane_id = {
            let dictionary = self.dictionary.read().await;
            let board = self.board.read().await;
            let store = self.store.read().await;
            let empty = DealsPage::default();
            let page = store.get(&key).unwrap_or(&empty);
            let derived = DerivedBoard::derive(&page.deals, &dictionary, &board.search_query, &self.translator);

            if !derived.deal_map.contains_key(deal_id) {
                return Err(PipelineError::UnknownDeal { deal_id: deal_id.to_string() });
            }
            find_lane_by_value(&derived.lanes, stage)
                .map(|lane| lane.id.clone())
                .ok_or_else(|| PipelineError::UnknownStage { stage: stage.to_string() })?
        };

        self.apply(BoardEvent::DragStart { deal_id: deal_id.to_string() }).await;
        let outcomes = self
            .dispatch(BoardEvent::DropOnLane {
                lane_id,
                deal_id: Some(deal_id.to_string()),
            })
            .await;

        Ok(outcomes.into_iter().next())
    }

    async fn reload_dictionary(&self) {
        match self.stages.fetch_stages().await {
            Ok(entries) => {
                process_debug!(ProcessId::current(), "📚 {} pipeline stages declared", entries.len());
                *self.dictionary.write().await = entries;
            }
            Err(e) => {
                process_warn!(
                    ProcessId::current(),
                    "⚠️ Stage dictionary unavailable, keeping cached entries: {}",
                    e
                );
            }
        }
    }

    /// Fetch and cache a page; a response that predates a move begun or
    /// settled meanwhile is discarded
    async fn fetch_into_store(&self, key: &QueryKey) -> PipelineResult<usize> {
        let stamp = self.store.write().await.begin_fetch();
        let body = self.api.fetch_page(self.query.clone()).await?;
        let page = normalize_page(&body, &self.translator.text(Text::Untitled));
        let count = page.deals.len();

        if !self.store.write().await.store_page(key, stamp, page) {
            process_debug!(
                ProcessId::current(),
                "🗑️ Discarded page for {} fetched before the latest move",
                key
            );
        }
        Ok(count)
    }

    /// Reduce under the board lock; moves are begun before the lock is
    /// released so no reader sees a pending deal on its old stage
    async fn reduce_event(&self, key: &QueryKey, event: BoardEvent) -> (Vec<PendingMove>, Vec<BoardEffect>) {
        let dictionary = self.dictionary.read().await;
        let mut board = self.board.write().await;

        let transition = {
            let store = self.store.read().await;
            let empty = DealsPage::default();
            let page = store.get(key).unwrap_or(&empty);
            let derived = DerivedBoard::derive(&page.deals, &dictionary, &board.search_query, &self.translator);
            reduce(std::mem::take(&mut *board), event, &derived, &self.translator)
        };
        *board = transition.state;

        let (starts, effects): (Vec<_>, Vec<_>) = transition
            .effects
            .into_iter()
            .partition(|effect| matches!(effect, BoardEffect::StartMove { .. }));

        let mut moves = Vec::new();
        if !starts.is_empty() {
            let mut store = self.store.write().await;
            for effect in starts {
                if let BoardEffect::StartMove { deal_id, stage } = effect {
                    let ticket = store.begin_move(key, &deal_id, &stage);
                    process_debug!(
                        ProcessId::current(),
                        "🚚 Deal {} moving to {} (token {})",
                        deal_id,
                        stage,
                        ticket.token
                    );
                    moves.push(PendingMove { ticket });
                }
            }
        }

        (moves, effects)
    }

    async fn run_effects(&self, key: &QueryKey, effects: Vec<BoardEffect>) {
        for effect in effects {
            match effect {
                BoardEffect::Notify(notice) => self.notifier.notify(notice),
                BoardEffect::Invalidate => self.refetch_after_settle(key).await,
                BoardEffect::StartMove { .. } => {}
            }
        }
    }

    /// Invalidate and refetch; failures are logged and swallowed
    async fn refetch_after_settle(&self, key: &QueryKey) {
        self.store.write().await.invalidate(key);
        if *key != self.query_key().await {
            return;
        }
        if let Err(e) = self.fetch_into_store(key).await {
            process_warn!(ProcessId::current(), "⚠️ Refetch after move failed for {}: {}", key, e);
        }
    }

    async fn render(&self, key: &QueryKey) -> BoardView {
        let dictionary = self.dictionary.read().await;
        let board = self.board.read().await;
        let store = self.store.read().await;
        let empty = DealsPage::default();
        let page = store.get(key).unwrap_or(&empty);

        build_board(page, &dictionary, &board, &self.translator, key.scope)
            .with_load_error(self.load_error.read().await.clone())
    }
}

fn describe(settlement: Settlement) -> &'static str {
    match settlement {
        Settlement::Committed => "committed",
        Settlement::Restored => "restored from snapshot",
        Settlement::Reverted => "deal reverted",
        Settlement::Superseded => "left to newer state",
    }
}
