//! Test doubles for the HTTP transport and the clock.

use crate::api::{HttpClient, HttpResponse};
use crate::clock::Clock;
use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

/// Replays scripted responses and records every requested URL
#[derive(Default)]
pub struct FakeHttpClient {
    responses: Mutex<VecDeque<HttpResponse>>,
    fallback: Option<HttpResponse>,
    requests: Mutex<Vec<String>>,
}

impl FakeHttpClient {
    /// A client that fails with a transport error once its script runs out
    pub fn new() -> Self {
        Self::default()
    }

    /// A client that answers with the given response once its script runs out
    pub fn with_fallback(status: u16, body: &str) -> Self {
        Self {
            fallback: Some(HttpResponse::new(status, body)),
            ..Self::default()
        }
    }

    pub fn push(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(HttpResponse::new(status, body));
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl HttpClient for FakeHttpClient {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(url.to_string());

        let scripted = self.responses.lock().unwrap().pop_front();
        scripted.or_else(|| self.fallback.clone()).ok_or_else(|| Error::Transport {
            url: url.to_string(),
            message: "no scripted response".to_string(),
        })
    }
}

/// Settable clock; sleeping records the delay and moves time forward
pub struct FakeClock {
    now: Mutex<SystemTime>,
    sleeps: Mutex<Vec<Duration>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(SystemTime::now()),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn advance(&self, duration: Duration) {
        *self.now.lock().unwrap() += duration;
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> SystemTime {
        *self.now.lock().unwrap()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        self.advance(duration);
    }
}
