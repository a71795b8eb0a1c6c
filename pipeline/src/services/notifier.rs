//! Notice sink that keeps the most recent notices for a UI to drain

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use shared::Notice;

use crate::traits::Notifier;

pub const DEFAULT_NOTICE_CAPACITY: usize = 50;

/// Bounded notice queue; the oldest notice is dropped when full
#[derive(Debug, Clone)]
pub struct BufferedNotifier {
    notices: Arc<Mutex<VecDeque<Notice>>>,
    capacity: usize,
}

impl Default for BufferedNotifier {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_NOTICE_CAPACITY)
    }
}

impl BufferedNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            notices: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    /// Take every buffered notice, oldest first
    pub fn drain(&self) -> Vec<Notice> {
        match self.notices.lock() {
            Ok(mut queue) => queue.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        }
    }

    pub fn snapshot(&self) -> Vec<Notice> {
        match self.notices.lock() {
            Ok(queue) => queue.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.notices.lock().map(|queue| queue.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for BufferedNotifier {
    fn notify(&self, notice: Notice) {
        let mut queue = match self.notices.lock() {
            Ok(queue) => queue,
            Err(poisoned) => poisoned.into_inner(),
        };
        if queue.len() >= self.capacity {
            queue.pop_front();
        }
        queue.push_back(notice);
    }
}
