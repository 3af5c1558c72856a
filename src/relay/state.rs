//! Loop-owned state: fetch checkpoint and last-seen statuses.

use crate::api::{Homework, HomeworkStatus};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;

/// Point (seconds since the Unix epoch) up to which updates have been fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Checkpoint(i64);

impl Checkpoint {
    /// Checkpoint at the current wall-clock time.
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    /// Checkpoint at `secs` seconds since the epoch.
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    /// Seconds since the epoch.
    pub const fn as_secs(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::<Utc>::from_timestamp(self.0, 0) {
            Some(at) => write!(f, "{} ({})", self.0, at.to_rfc3339()),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Most recently notified status per homework id.
///
/// Only updated after a notification went out, so a failed send is retried
/// the next time the same record is fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastSeen {
    statuses: HashMap<u64, HomeworkStatus>,
}

impl LastSeen {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `homework` carries a status different from the recorded one.
    /// Homeworks never seen before always count as changed.
    pub fn is_changed(&self, homework: &Homework) -> bool {
        self.statuses.get(&homework.id) != Some(&homework.status)
    }

    /// Record `status` as notified for `id`.
    pub fn record(&mut self, id: u64, status: HomeworkStatus) {
        self.statuses.insert(id, status);
    }

    /// Last notified status of `id`.
    pub fn get(&self, id: u64) -> Option<HomeworkStatus> {
        self.statuses.get(&id).copied()
    }

    /// Number of tracked homeworks.
    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    /// Whether nothing has been notified yet.
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}
