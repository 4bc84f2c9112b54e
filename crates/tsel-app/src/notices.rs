//! User-facing notices (toasts)
//!
//! Notices are queued on the state and rendered by the TUI. Each one is also
//! written to the log so headless and TUI runs leave the same trail.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use tracing::{info, warn};

/// Default number of notices kept before the oldest is dropped
pub const DEFAULT_MAX_NOTICES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Danger,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Monotonic id, unique for the lifetime of the queue
    pub id: u64,
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Local>,
}

/// Bounded notice queue, oldest first.
#[derive(Debug, Clone)]
pub struct Notices {
    items: VecDeque<Notice>,
    next_id: u64,
    max: usize,
}

impl Default for Notices {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NOTICES)
    }
}

impl Notices {
    pub fn new(max: usize) -> Self {
        Self {
            items: VecDeque::new(),
            next_id: 0,
            max: max.max(1),
        }
    }

    pub fn info(&mut self, title: impl Into<String>, message: impl Into<String>) {
        let (title, message) = (title.into(), message.into());
        info!("{}: {}", title, message);
        self.push(NoticeLevel::Info, title, message);
    }

    pub fn danger(&mut self, title: impl Into<String>, message: impl Into<String>) {
        let (title, message) = (title.into(), message.into());
        warn!("{}: {}", title, message);
        self.push(NoticeLevel::Danger, title, message);
    }

    fn push(&mut self, level: NoticeLevel, title: String, message: String) {
        self.items.push_back(Notice {
            id: self.next_id,
            level,
            title,
            message,
            created_at: Local::now(),
        });
        self.next_id += 1;
        while self.items.len() > self.max {
            self.items.pop_front();
        }
    }

    /// Remove the oldest notice
    pub fn dismiss_oldest(&mut self) -> Option<Notice> {
        self.items.pop_front()
    }

    pub fn set_max(&mut self, max: usize) {
        self.max = max.max(1);
        while self.items.len() > self.max {
            self.items.pop_front();
        }
    }

    /// Total notices ever raised (ids below this value have been issued)
    pub fn issued(&self) -> u64 {
        self.next_id
    }

    /// Notices raised with an id at or after `id`, oldest first
    pub fn since(&self, id: u64) -> impl Iterator<Item = &Notice> {
        self.items.iter().filter(move |n| n.id >= id)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Notice> {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.items.back()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn count(&self, level: NoticeLevel) -> usize {
        self.items.iter().filter(|n| n.level == level).count()
    }
}
