//! In-memory fakes for driving the relay without a network.

#![allow(dead_code)]

use homework_relay::api::{Homework, HomeworkApi, HomeworkStatus, StatusPage};
use homework_relay::error::{RelayError, Result};
use homework_relay::messenger::Messenger;
use homework_relay::relay::Checkpoint;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// Statuses API answering from a queue of prepared results.
#[derive(Default)]
pub struct ScriptedApi {
    answers: RefCell<VecDeque<Result<StatusPage>>>,
    requests: RefCell<Vec<Checkpoint>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(self, answer: Result<StatusPage>) -> Self {
        self.answers.borrow_mut().push_back(answer);
        self
    }

    pub fn push(&self, answer: Result<StatusPage>) {
        self.answers.borrow_mut().push_back(answer);
    }

    /// Checkpoints the relay asked for, in order.
    pub fn requests(&self) -> Vec<Checkpoint> {
        self.requests.borrow().clone()
    }
}

impl HomeworkApi for ScriptedApi {
    fn fetch(&self, since: Checkpoint) -> Result<StatusPage> {
        self.requests.borrow_mut().push(since);
        self.answers.borrow_mut().pop_front().unwrap_or_else(|| {
            Err(RelayError::Request {
                api: "scripted",
                details: "no answer prepared".to_string(),
            })
        })
    }

    fn name(&self) -> String {
        "scripted".to_string()
    }
}

/// Messenger recording every delivered text.
#[derive(Default)]
pub struct ChatLog {
    sent: RefCell<Vec<String>>,
    failing: Cell<bool>,
    fail_matching: RefCell<Option<String>>,
    attempts: Cell<usize>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following send fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    /// Make sends whose text contains `needle` fail.
    pub fn fail_matching(&self, needle: Option<&str>) {
        *self.fail_matching.borrow_mut() = needle.map(str::to_string);
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.borrow().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.get()
    }
}

impl Messenger for ChatLog {
    fn send(&self, text: &str) -> Result<()> {
        self.attempts.set(self.attempts.get() + 1);
        let matches = self
            .fail_matching
            .borrow()
            .as_deref()
            .is_some_and(|needle| text.contains(needle));
        if self.failing.get() || matches {
            return Err(RelayError::Delivery("Bad Gateway".to_string()));
        }
        // Same ceiling as Telegram's sendMessage.
        if text.chars().count() > 4096 {
            return Err(RelayError::Delivery("Bad Request: message is too long".to_string()));
        }
        self.sent.borrow_mut().push(text.to_string());
        Ok(())
    }

    fn name(&self) -> String {
        "chat-log".to_string()
    }
}

pub fn homework(id: u64, status: HomeworkStatus) -> Homework {
    Homework {
        id,
        name: format!("student__hw{:02}.zip", id),
        status,
        reviewer_comment: None,
        lesson_name: None,
        date_updated: None,
    }
}

pub fn page(current_date: i64, homeworks: Vec<Homework>) -> Result<StatusPage> {
    Ok(StatusPage {
        homeworks,
        current_date: Checkpoint::from_secs(current_date),
    })
}

/// Page produced the way the HTTP client produces it: validated from JSON.
pub fn json_page(value: serde_json::Value) -> Result<StatusPage> {
    homework_relay::api::check_response(&value)
        .map_err(|e| RelayError::invalid_response("scripted", e))
}
