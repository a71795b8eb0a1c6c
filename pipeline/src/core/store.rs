//! Versioned deal cache with optimistic stage moves
//!
//! Pages are cached per [`QueryKey`]. A stage move patches the cached page
//! immediately and hands back a [`MoveTicket`] holding the pre-move snapshot
//! and a version token. Settling the ticket either commits (nothing to undo)
//! or rolls back:
//!
//! - the whole snapshot is restored only when no other move overlapped the
//!   ticket and no fetch replaced the page in the meantime
//! - otherwise only the moved deal is reverted, and only while it still
//!   carries the speculative stage
//!
//! Moves in flight are re-applied on top of every freshly stored page, so a
//! refetch landing mid-move does not flash the old stage. Every fetch is
//! stamped when issued; a page whose fetch was issued before the latest move
//! began or settled on its key is discarded, since it predates that move.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use shared::{DealsPage, QueryKey, ScopeVersion};

#[derive(Debug, Clone)]
struct CachedPage {
    page: DealsPage,
    fetched_at: Instant,
    invalidated: bool,
    generation: u64,
}

#[derive(Debug, Clone)]
struct InFlightMove {
    token: u64,
    deal_id: String,
    stage: String,
}

/// Issue order of a deals fetch, taken before the request goes out
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchStamp(u64);

/// Handle for one optimistic move; settle it exactly once
#[derive(Debug, Clone, PartialEq)]
pub struct MoveTicket {
    pub key: QueryKey,
    pub token: u64,
    pub deal_id: String,
    pub target_stage: String,
    pub previous_stage: Option<String>,
    generation: u64,
    overlapped_earlier: bool,
    snapshot: Option<DealsPage>,
}

/// What settling a ticket did to the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Move confirmed; cache keeps the speculative stage until the refetch
    Committed,
    /// Full pre-move snapshot restored
    Restored,
    /// Only the moved deal was put back on its previous stage
    Reverted,
    /// Newer state owns the deal; cache left alone
    Superseded,
}

#[derive(Debug)]
pub struct DealStore {
    entries: HashMap<QueryKey, CachedPage>,
    in_flight: HashMap<QueryKey, Vec<InFlightMove>>,
    latest_token: HashMap<QueryKey, u64>,
    fences: HashMap<QueryKey, u64>,
    next_token: u64,
    next_generation: u64,
    next_sequence: u64,
    stale_after: Duration,
}

impl DealStore {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            in_flight: HashMap::new(),
            latest_token: HashMap::new(),
            fences: HashMap::new(),
            next_token: 0,
            next_generation: 0,
            next_sequence: 0,
            stale_after,
        }
    }

    pub fn get(&self, key: &QueryKey) -> Option<&DealsPage> {
        self.entries.get(key).map(|entry| &entry.page)
    }

    /// Missing, invalidated, or older than the staleness window
    pub fn needs_fetch(&self, key: &QueryKey) -> bool {
        match self.entries.get(key) {
            Some(entry) => entry.invalidated || entry.fetched_at.elapsed() >= self.stale_after,
            None => true,
        }
    }

    /// Stamp a fetch about to be issued
    pub fn begin_fetch(&mut self) -> FetchStamp {
        self.next_sequence += 1;
        FetchStamp(self.next_sequence)
    }

    /// Store a fetched page, re-applying moves still in flight for the key
    ///
    /// Returns `false` and leaves the cache alone when the fetch was issued
    /// before a move on the key began or settled.
    pub fn store_page(&mut self, key: &QueryKey, stamp: FetchStamp, mut page: DealsPage) -> bool {
        if self.fences.get(key).is_some_and(|fence| stamp.0 < *fence) {
            return false;
        }

        if let Some(moves) = self.in_flight.get(key) {
            for pending in moves {
                if let Some(deal) = page.deals.iter_mut().find(|d| d.id == pending.deal_id) {
                    deal.pipeline_stage = Some(pending.stage.clone());
                }
            }
        }

        self.next_generation += 1;
        self.entries.insert(
            key.clone(),
            CachedPage {
                page,
                fetched_at: Instant::now(),
                invalidated: false,
                generation: self.next_generation,
            },
        );
        true
    }

    /// Mark the page for refetch; the cached data stays readable meanwhile
    pub fn invalidate(&mut self, key: &QueryKey) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.invalidated = true;
                true
            }
            None => false,
        }
    }

    /// Drop cached pages of every other scope
    pub fn retain_scope(&mut self, scope: ScopeVersion) {
        self.entries.retain(|key, _| key.scope == scope);
        self.fences.retain(|key, _| key.scope == scope);
    }

    pub fn in_flight_count(&self, key: &QueryKey) -> usize {
        self.in_flight.get(key).map_or(0, Vec::len)
    }

    /// Snapshot the page, patch the deal's stage, and issue a version token
    pub fn begin_move(&mut self, key: &QueryKey, deal_id: &str, target_stage: &str) -> MoveTicket {
        self.next_token += 1;
        let token = self.next_token;
        self.latest_token.insert(key.clone(), token);
        let overlapped_earlier = self.in_flight_count(key) > 0;
        self.fence(key);

        let (snapshot, generation, previous_stage) = match self.entries.get_mut(key) {
            Some(entry) => {
                let snapshot = entry.page.clone();
                let mut previous_stage = None;
                if let Some(deal) = entry.page.deals.iter_mut().find(|d| d.id == deal_id) {
                    previous_stage = deal.pipeline_stage.replace(target_stage.to_string());
                }
                (Some(snapshot), entry.generation, previous_stage)
            }
            None => (None, 0, None),
        };

        self.in_flight.entry(key.clone()).or_default().push(InFlightMove {
            token,
            deal_id: deal_id.to_string(),
            stage: target_stage.to_string(),
        });

        MoveTicket {
            key: key.clone(),
            token,
            deal_id: deal_id.to_string(),
            target_stage: target_stage.to_string(),
            previous_stage,
            generation,
            overlapped_earlier,
            snapshot,
        }
    }

    pub fn commit(&mut self, ticket: &MoveTicket) -> Settlement {
        self.finish(ticket);
        Settlement::Committed
    }

    pub fn rollback(&mut self, ticket: &MoveTicket) -> Settlement {
        self.finish(ticket);

        let is_latest = self.latest_token.get(&ticket.key) == Some(&ticket.token);
        let Some(entry) = self.entries.get_mut(&ticket.key) else {
            return Settlement::Superseded;
        };

        if is_latest && !ticket.overlapped_earlier && entry.generation == ticket.generation {
            if let Some(snapshot) = &ticket.snapshot {
                entry.page = snapshot.clone();
                return Settlement::Restored;
            }
        }

        match entry.page.deals.iter_mut().find(|d| d.id == ticket.deal_id) {
            Some(deal) if deal.pipeline_stage.as_deref() == Some(ticket.target_stage.as_str()) => {
                deal.pipeline_stage = ticket.previous_stage.clone();
                Settlement::Reverted
            }
            _ => Settlement::Superseded,
        }
    }

    /// Pages from fetches issued before this point are outdated for `key`
    fn fence(&mut self, key: &QueryKey) {
        self.next_sequence += 1;
        self.fences.insert(key.clone(), self.next_sequence);
    }

    fn finish(&mut self, ticket: &MoveTicket) {
        self.fence(&ticket.key);
        if let Some(moves) = self.in_flight.get_mut(&ticket.key) {
            moves.retain(|pending| pending.token != ticket.token);
            if moves.is_empty() {
                self.in_flight.remove(&ticket.key);
            }
        }
    }
}
