//! Shared integration-test harness: a scripted fake persistence client
//! that records every patch it receives and replays queued outcomes.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;

use logsource::config::schema::{LogIndexReference, LogSourceConfiguration};
use logsource::error::PersistenceError;
use logsource::patch::ConfigurationPatch;
use logsource::persistence::UpdateConfiguration;

/// Initializes a test tracing subscriber; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// The baseline used throughout the integration tests.
pub fn default_baseline() -> LogSourceConfiguration {
    LogSourceConfiguration {
        name: "A".to_string(),
        log_alias: Some("logs-*".to_string()),
        log_indices: None,
        timestamp_field: "@timestamp".to_string(),
        tiebreaker_field: "_doc".to_string(),
        columns: vec![],
    }
}

/// The configuration the fake server returns after applying an alias
/// change to `indices`.
pub fn updated_baseline(indices: &str) -> LogSourceConfiguration {
    LogSourceConfiguration {
        log_alias: None,
        log_indices: Some(LogIndexReference::IndexName {
            index_name: indices.to_string(),
        }),
        ..default_baseline()
    }
}

type Outcome = Result<LogSourceConfiguration, PersistenceError>;

/// Fake persistence collaborator.
///
/// Outcomes are replayed in FIFO order; when the queue is empty the
/// client reports a transport failure. An optional hold gate keeps a
/// call suspended until [`release`](Self::release) is invoked, which is
/// how the tests keep a commit in flight.
pub struct ScriptedClient {
    outcomes: Mutex<VecDeque<Outcome>>,
    received: Mutex<Vec<Value>>,
    hold: Option<Arc<Notify>>,
}

impl ScriptedClient {
    /// A client whose next call succeeds with the given configuration.
    pub fn succeeding_with(config: LogSourceConfiguration) -> Self {
        let mut client = Self::empty();
        client.push_outcome(Ok(config));
        client
    }

    /// A client whose next call is rejected with the given message.
    pub fn rejecting_with(message: &str) -> Self {
        let mut client = Self::empty();
        client.push_outcome(Err(PersistenceError::Rejected {
            message: message.to_string(),
        }));
        client
    }

    /// A client with no scripted outcomes; every call fails.
    pub fn empty() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            received: Mutex::new(Vec::new()),
            hold: None,
        }
    }

    /// Queues one more outcome.
    pub fn push_outcome(&mut self, outcome: Outcome) {
        self.outcomes
            .lock()
            .expect("outcomes lock poisoned")
            .push_back(outcome);
    }

    /// Makes every call suspend until [`release`](Self::release).
    pub fn held(mut self) -> Self {
        self.hold = Some(Arc::new(Notify::new()));
        self
    }

    /// Lets one held call proceed.
    pub fn release(&self) {
        self.hold
            .as_ref()
            .expect("client was not built with held()")
            .notify_one();
    }

    /// The JSON bodies of every patch received so far, in call order.
    pub fn received_patches(&self) -> Vec<Value> {
        self.received
            .lock()
            .expect("received lock poisoned")
            .clone()
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.received.lock().expect("received lock poisoned").len()
    }
}

#[async_trait]
impl UpdateConfiguration for ScriptedClient {
    async fn update_configuration(
        &self,
        patch: ConfigurationPatch,
    ) -> Result<LogSourceConfiguration, PersistenceError> {
        let body = serde_json::to_value(&patch)?;
        self.received
            .lock()
            .expect("received lock poisoned")
            .push(body);

        if let Some(gate) = &self.hold {
            gate.notified().await;
        }

        self.outcomes
            .lock()
            .expect("outcomes lock poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Err(PersistenceError::Transport {
                    message: "no scripted outcome left".to_string(),
                })
            })
    }
}
