//! Fakes shared by the unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::feat::{BatchUpdateResponse, EventSink, NodeCountInfo, RemoteRefresh, Severity};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SinkEvent {
    Persist,
    Changed,
    User(String, Severity),
}

#[derive(Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub(crate) fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().clone()
    }

    pub(crate) fn persists(&self) -> usize {
        self.count(|e| matches!(e, SinkEvent::Persist))
    }

    pub(crate) fn changes(&self) -> usize {
        self.count(|e| matches!(e, SinkEvent::Changed))
    }

    pub(crate) fn messages(&self) -> Vec<(String, Severity)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                SinkEvent::User(msg, sev) => Some((msg.clone(), *sev)),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn clear(&self) {
        self.events.lock().clear();
    }

    fn count(&self, pred: impl Fn(&SinkEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn notify_persist(&self) {
        self.events.lock().push(SinkEvent::Persist);
    }

    fn mark_changed(&self) {
        self.events.lock().push(SinkEvent::Changed);
    }

    fn notify_user(&self, message: &str, severity: Severity) {
        self.events
            .lock()
            .push(SinkEvent::User(message.to_string(), severity));
    }
}

/// Remote whose answers are scripted per url. A url with a gate blocks
/// until [`ScriptedRemote::release`] is called for it.
#[derive(Default)]
pub(crate) struct ScriptedRemote {
    counts: Mutex<HashMap<String, std::result::Result<NodeCountInfo, String>>>,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
    batch: Mutex<Option<std::result::Result<BatchUpdateResponse, String>>>,
    fetched: Mutex<Vec<String>>,
    batches: Mutex<Vec<Vec<String>>>,
}

impl ScriptedRemote {
    pub(crate) fn answer(&self, url: &str, info: NodeCountInfo) {
        self.counts.lock().insert(url.to_string(), Ok(info));
    }

    pub(crate) fn count(&self, url: &str, count: u64) {
        self.answer(
            url,
            NodeCountInfo {
                count: Some(count),
                user_info: None,
            },
        );
    }

    pub(crate) fn fail(&self, url: &str, message: &str) {
        self.counts
            .lock()
            .insert(url.to_string(), Err(message.to_string()));
    }

    pub(crate) fn gate(&self, url: &str) {
        self.gates
            .lock()
            .insert(url.to_string(), Arc::new(Semaphore::new(0)));
    }

    pub(crate) fn release(&self, url: &str) {
        if let Some(gate) = self.gates.lock().get(url) {
            gate.add_permits(1);
        }
    }

    pub(crate) fn batch_answer(&self, response: BatchUpdateResponse) {
        *self.batch.lock() = Some(Ok(response));
    }

    pub(crate) fn batch_error(&self, message: &str) {
        *self.batch.lock() = Some(Err(message.to_string()));
    }

    pub(crate) fn fetched(&self) -> Vec<String> {
        self.fetched.lock().clone()
    }

    pub(crate) fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().clone()
    }
}

impl RemoteRefresh for ScriptedRemote {
    fn fetch_node_count<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<NodeCountInfo>> {
        Box::pin(async move {
            self.fetched.lock().push(url.to_string());
            let gate = self.gates.lock().get(url).cloned();
            if let Some(gate) = gate {
                gate.acquire().await?.forget();
            }
            match self.counts.lock().get(url) {
                Some(Ok(info)) => Ok(info.clone()),
                Some(Err(msg)) => Err(anyhow!("{msg}")),
                None => Err(anyhow!("no scripted answer for {url}")),
            }
        })
    }

    fn batch_update_nodes<'a>(
        &'a self,
        ids: &'a [String],
    ) -> BoxFuture<'a, Result<BatchUpdateResponse>> {
        Box::pin(async move {
            self.batches.lock().push(ids.to_vec());
            match self.batch.lock().clone() {
                Some(Ok(resp)) => Ok(resp),
                Some(Err(msg)) => Err(anyhow!("{msg}")),
                None => Err(anyhow!("batch endpoint unavailable")),
            }
        })
    }
}

/// Yield to the runtime until `cond` holds.
pub(crate) async fn wait_until(cond: impl Fn() -> bool) {
    for _ in 0..1000 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    assert!(cond(), "condition not reached");
}
