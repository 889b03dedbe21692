#![cfg(test)]

use crate::config::Config;
use crate::error::{ForkScoutError, Result};
use crate::fork::ForkRecord;
use crate::github::client::{RawResponse, Transport};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

pub fn test_config() -> Config {
    Config {
        owners: vec!["alice".to_string(), "bob".to_string()],
        api_base: "https://api.test".to_string(),
        ..Config::default()
    }
}

pub fn api_url(path: &str) -> String {
    format!("https://api.test{path}")
}

pub fn make_record(owner: &str, stars: u64, ahead_by: u64, branch_count: usize) -> ForkRecord {
    ForkRecord {
        owner: owner.to_string(),
        url: format!("https://github.com/{owner}/1code"),
        stars,
        ahead_by,
        branch_count,
        custom_branches: (0..branch_count).map(|i| format!("feature-{i}")).collect(),
        ..ForkRecord::default()
    }
    .finalize()
}

/// Replays queued responses per URL; unscripted URLs answer 404.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<String, VecDeque<std::result::Result<RawResponse, String>>>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, url: &str, status: u16, body: &str) {
        self.enqueue(
            url,
            Ok(RawResponse {
                status,
                body: body.to_string(),
            }),
        );
    }

    pub fn push_failure(&self, url: &str, message: &str) {
        self.enqueue(url, Err(message.to_string()));
    }

    fn enqueue(&self, url: &str, entry: std::result::Result<RawResponse, String>) {
        self.responses
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(entry);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(url.to_string());
        let next = self
            .responses
            .lock()
            .unwrap()
            .get_mut(url)
            .and_then(|queue| queue.pop_front());
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(ForkScoutError::GitHub(message)),
            None => Ok(RawResponse {
                status: 404,
                body: "Not Found".to_string(),
            }),
        }
    }
}
