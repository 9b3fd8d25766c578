//! In-memory JSON source for unit tests

use crate::crawler::JsonSource;
use serde_json::Value;
use std::cell::RefCell;

/// Answers requests from canned payloads and records every URL asked for
///
/// A request is answered by the first registered pattern contained in the
/// URL; unmatched URLs behave like failed fetches.
#[derive(Debug, Default)]
pub struct FakeSource {
    responses: Vec<(String, Value)>,
    requests: RefCell<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, pattern: &str, payload: Value) -> Self {
        self.responses.push((pattern.to_string(), payload));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn count_matching(&self, pattern: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|url| url.contains(pattern))
            .count()
    }
}

impl JsonSource for FakeSource {
    async fn fetch_json(&self, url: &str) -> Option<Value> {
        self.requests.borrow_mut().push(url.to_string());
        self.responses
            .iter()
            .find(|(pattern, _)| url.contains(pattern.as_str()))
            .map(|(_, payload)| payload.clone())
    }
}
