//! In-memory probe and manual clock for unit tests.

use crate::clock::Clock;
use crate::probe::{FlagProbe, ProbeError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Canned reply for a URL; unlisted URLs answer 404
#[derive(Debug, Clone)]
pub enum Reply {
    Ok,
    Status(u16),
    Json(Value),
    Hang,
}

#[derive(Default)]
pub struct FakeProbe {
    replies: HashMap<String, Reply>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl FakeProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, url: &str, reply: Reply) -> Self {
        self.replies.insert(url.to_string(), reply);
        self
    }

    /// Every probe takes this long (tokio time)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn answer(&self, url: &str) -> Reply {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self.replies.get(url).cloned().unwrap_or(Reply::Status(404));
        if let Reply::Hang = reply {
            std::future::pending::<()>().await;
        }
        reply
    }
}

#[async_trait]
impl FlagProbe for FakeProbe {
    async fn head(&self, url: &str) -> Result<(), ProbeError> {
        match self.answer(url).await {
            Reply::Ok => Ok(()),
            Reply::Status(code) => Err(ProbeError::Status(code)),
            _ => Err(ProbeError::Status(405)),
        }
    }

    async fn fetch_json(&self, url: &str) -> Result<Value, ProbeError> {
        match self.answer(url).await {
            Reply::Json(body) => Ok(body),
            Reply::Status(code) => Err(ProbeError::Status(code)),
            _ => Err(ProbeError::MissingAsset),
        }
    }
}

/// Clock whose time only moves when slept on or advanced by hand
pub struct ManualClock {
    now: Mutex<Instant>,
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        self.advance(duration);
    }
}
