//! Testing utilities for the feedback engine workspace
//!
//! Generator doubles, fixtures and small builders shared by integration tests.

#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use async_trait::async_trait;
use feedback_core::{FeedbackGenerator, GenerationError, GenerationRequest};
use feedback_scenario::{BlockPerformance, Language, ParticipantProfile, RawPatterns, ScenarioKey};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Complete raw output; every message embeds `tag`
pub fn generated_patterns(tag: &str) -> RawPatterns {
    ScenarioKey::ALL
        .iter()
        .map(|key| {
            let variants = (1..=3).map(|i| format!("{tag}: {key} #{i}")).collect();
            (key.as_str().to_string(), variants)
        })
        .collect()
}

/// Raw output missing every scenario after the first `keep`
pub fn partial_patterns(keep: usize) -> RawPatterns {
    generated_patterns("partial").into_iter().take(keep).collect()
}

pub fn sample_profile() -> ParticipantProfile {
    ParticipantProfile::new("Mika")
        .with_praise(["effort", "focus"])
        .with_language(Language::En)
}

pub fn block(number: u32, accuracy: f64, average_rt: f64) -> BlockPerformance {
    BlockPerformance::new(number, accuracy, average_rt).unwrap()
}

/// Counts calls and returns a distinct complete set per call
#[derive(Debug, Default)]
pub struct CountingGenerator {
    calls: AtomicUsize,
    delay: Duration,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl CountingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold each call for `delay` before answering
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl FeedbackGenerator for CountingGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<RawPatterns, GenerationError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests.lock().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(generated_patterns(&format!("call {call}")))
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

/// Always fails with the same error
#[derive(Debug)]
pub struct FailingGenerator {
    error: GenerationError,
    calls: AtomicUsize,
}

impl FailingGenerator {
    pub fn new(error: GenerationError) -> Self {
        Self {
            error,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn transport() -> Self {
        Self::new(GenerationError::Transport("connection refused".into()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedbackGenerator for FailingGenerator {
    async fn generate(&self, _: &GenerationRequest) -> Result<RawPatterns, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Answers after a delay, tracking started and finished calls separately
#[derive(Debug)]
pub struct SlowGenerator {
    delay: Duration,
    started: AtomicUsize,
    finished: AtomicUsize,
}

impl SlowGenerator {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            started: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
        }
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedbackGenerator for SlowGenerator {
    async fn generate(&self, _: &GenerationRequest) -> Result<RawPatterns, GenerationError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.finished.fetch_add(1, Ordering::SeqCst);
        Ok(generated_patterns("slow"))
    }

    fn name(&self) -> &'static str {
        "slow"
    }
}

/// Returns the same raw output on every call
#[derive(Debug)]
pub struct FixedGenerator {
    output: RawPatterns,
    calls: AtomicUsize,
}

impl FixedGenerator {
    pub fn new(output: RawPatterns) -> Self {
        Self {
            output,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedbackGenerator for FixedGenerator {
    async fn generate(&self, _: &GenerationRequest) -> Result<RawPatterns, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.output.clone())
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Panics inside the generation flight
#[derive(Debug, Default)]
pub struct PanickingGenerator;

#[async_trait]
impl FeedbackGenerator for PanickingGenerator {
    async fn generate(&self, _: &GenerationRequest) -> Result<RawPatterns, GenerationError> {
        panic!("generator exploded")
    }

    fn name(&self) -> &'static str {
        "panicking"
    }
}
