// Copyright 2026, The edge-status Authors
// SPDX-License-Identifier: Apache-2.0

//! Serializes ConfigMap-triggered fan-outs and retries failed namespaces.

use crate::config::Config;
use crate::constants::FANOUT_CHANNEL_CAPACITY;
use crate::status::{namespaces_with_checks, reconcile_all_checks, with_deadline};
use kube::Client;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

/// Events that the ConfigMap reconciler (and the manager itself) send to the FanoutManager
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FanoutEvent {
    /// A ConfigMap was created, updated or deleted
    ConfigMapChanged { namespace: String, name: String },
    /// The ConfigMap watch finished a (re)list; changes made while it was
    /// down are not reported individually
    Resync,
    /// The retry timer of a failed resync fired
    ResyncRetry,
    /// The retry timer of a failed namespace fired
    Retry { namespace: String },
}

/// Single consumer of fan-out work. Because exactly one task drains the
/// queue, no two fan-outs for the same namespace ever overlap.
pub struct FanoutManager {
    client: Client,
    config: Config,
    event_rx: mpsc::Receiver<FanoutEvent>,
    handle: FanoutHandle,
    retries: RetryTracker,
    resync_armed: bool,
}

/// Handle to send events to the FanoutManager
#[derive(Clone)]
pub struct FanoutHandle {
    event_tx: mpsc::Sender<FanoutEvent>,
}

impl FanoutHandle {
    pub async fn send(&self, event: FanoutEvent) {
        if let Err(e) = self.event_tx.send(event).await {
            error!("Failed to send event to FanoutManager: {}", e);
        }
    }
}

impl FanoutManager {
    pub fn new(client: Client, config: Config) -> (Self, FanoutHandle) {
        let (event_tx, event_rx) = mpsc::channel(FANOUT_CHANNEL_CAPACITY);
        let handle = FanoutHandle { event_tx };

        let manager = Self {
            client,
            config,
            event_rx,
            handle: handle.clone(),
            retries: RetryTracker::default(),
            resync_armed: false,
        };

        (manager, handle)
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        info!("FanoutManager started, listening for ConfigMap changes...");

        while let Some(event) = self.event_rx.recv().await {
            let mut pending = PendingNamespaces::default();
            pending.push(event);

            // Fold whatever queued up while the last pass ran into this batch
            while let Ok(event) = self.event_rx.try_recv() {
                pending.push(event);
            }

            if pending.resync_retry_fired {
                self.resync_armed = false;
            }
            if pending.resync || pending.resync_retry_fired {
                self.resync(&mut pending).await;
            }

            for entry in pending.into_entries() {
                if entry.retry_fired {
                    self.retries.disarm(&entry.namespace);
                }
                if entry.changed {
                    self.retries.reset(&entry.namespace);
                }
                self.fan_out(entry.namespace).await;
            }
        }

        Ok(())
    }

    /// Queue every namespace that holds a Check.
    async fn resync(&mut self, pending: &mut PendingNamespaces) {
        let result = with_deadline(
            self.config.reconcile_timeout,
            "Check namespaces",
            namespaces_with_checks(&self.client, self.config.watch_namespace.as_deref()),
        )
        .await;

        match result {
            Ok(namespaces) => {
                info!("Resyncing {} namespaces with Checks", namespaces.len());
                for namespace in namespaces {
                    pending.mark_changed(namespace);
                }
            }
            Err(e) if self.resync_armed => {
                error!("Resync failed, retry already scheduled: {}", e);
            }
            Err(e) => {
                let delay = self.config.fanout_retry_max;
                error!("Resync failed, retrying in {:?}: {}", delay, e);
                self.resync_armed = true;
                self.schedule(FanoutEvent::ResyncRetry, delay);
            }
        }
    }

    #[instrument(skip(self))]
    async fn fan_out(&mut self, namespace: String) {
        let result = with_deadline(
            self.config.reconcile_timeout,
            format!("namespace {}", namespace),
            reconcile_all_checks(&self.client, &namespace),
        )
        .await;

        let Err(e) = result else {
            self.retries.reset(&namespace);
            return;
        };

        let Some(attempt) = self.retries.failed(&namespace) else {
            warn!("Fan-out failed, retry already scheduled: {}", e);
            return;
        };

        let delay = retry_delay(
            attempt,
            self.config.fanout_retry_base,
            self.config.fanout_retry_max,
        );

        if e.is_conflict() {
            warn!("Fan-out hit a conflicting write, retrying in {:?}: {}", delay, e);
        } else {
            error!("Fan-out failed, retrying in {:?}: {}", delay, e);
        }

        self.schedule(FanoutEvent::Retry { namespace }, delay);
    }

    fn schedule(&self, event: FanoutEvent, delay: Duration) {
        let handle = self.handle.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            handle.send(event).await;
        });
    }
}

/// A namespace waiting for a fan-out and what asked for it.
#[derive(Debug, PartialEq, Eq)]
struct PendingFanout {
    namespace: String,
    changed: bool,
    retry_fired: bool,
}

/// Namespaces waiting for a fan-out, in arrival order, plus whether a
/// resync was requested.
#[derive(Debug, Default)]
struct PendingNamespaces {
    entries: Vec<PendingFanout>,
    resync: bool,
    resync_retry_fired: bool,
}

impl PendingNamespaces {
    fn push(&mut self, event: FanoutEvent) {
        match event {
            FanoutEvent::ConfigMapChanged { namespace, name } => {
                debug!("ConfigMap {}/{} changed", namespace, name);
                self.mark_changed(namespace);
            }
            FanoutEvent::Resync => self.resync = true,
            FanoutEvent::ResyncRetry => self.resync_retry_fired = true,
            FanoutEvent::Retry { namespace } => self.entry(namespace).retry_fired = true,
        }
    }

    fn mark_changed(&mut self, namespace: String) {
        self.entry(namespace).changed = true;
    }

    fn entry(&mut self, namespace: String) -> &mut PendingFanout {
        let index = match self.entries.iter().position(|e| e.namespace == namespace) {
            Some(index) => index,
            None => {
                self.entries.push(PendingFanout {
                    namespace,
                    changed: false,
                    retry_fired: false,
                });
                self.entries.len() - 1
            }
        };
        &mut self.entries[index]
    }

    fn into_entries(self) -> Vec<PendingFanout> {
        self.entries
    }
}

/// Per-namespace retry bookkeeping: consecutive failed passes, and which
/// namespaces already have a retry timer armed. At most one timer per
/// namespace is ever in flight.
#[derive(Debug, Default)]
struct RetryTracker {
    failures: HashMap<String, u32>,
    armed: HashSet<String>,
}

impl RetryTracker {
    /// Forget the failure count, after a success or a fresh change.
    fn reset(&mut self, namespace: &str) {
        self.failures.remove(namespace);
    }

    fn disarm(&mut self, namespace: &str) {
        self.armed.remove(namespace);
    }

    /// Record a failed pass. Returns the attempt to back off for, or `None`
    /// when a retry is already armed for the namespace.
    fn failed(&mut self, namespace: &str) -> Option<u32> {
        let failures = self.failures.entry(namespace.to_string()).or_insert(0);
        let attempt = *failures;
        *failures = failures.saturating_add(1);

        self.armed.insert(namespace.to_string()).then_some(attempt)
    }
}

/// Exponential backoff: `base * 2^attempt`, capped at `max`
pub fn retry_delay(attempt: u32, base: Duration, max: Duration) -> Duration {
    let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
    base.saturating_mul(factor).min(max)
}
