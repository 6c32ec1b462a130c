// Copyright 2026, The edge-status Authors
// SPDX-License-Identifier: Apache-2.0

//! Check reconciler - recomputes the status of a Check whenever it changes.

use crate::config::Config;
use crate::error::{EdgeStatusError, Result};
use crate::status::{reconcile_check, with_deadline};
use crate::types::Check;
use futures::StreamExt;
use kube::{
    runtime::{controller::Action, watcher, Controller},
    Api, Client, ResourceExt,
};
use std::sync::Arc;
use tracing::{debug, error, warn};

pub struct CheckReconciler {
    client: Client,
    config: Config,
}

impl CheckReconciler {
    pub fn new(client: Client, config: Config) -> Self {
        Self { client, config }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let checks: Api<Check> = match &self.config.watch_namespace {
            Some(namespace) => Api::namespaced(self.client.clone(), namespace),
            None => Api::all(self.client.clone()),
        };
        let context = Arc::new(self);

        // The controller runs at most one reconcile per Check at a time
        Controller::new(checks, watcher::Config::default())
            .run(reconcile, error_policy, context)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("Reconciled check: {:?}", o),
                    Err(e) => warn!("Reconciliation error: {:?}", e),
                }
            })
            .await;

        Ok(())
    }
}

async fn reconcile(check: Arc<Check>, ctx: Arc<CheckReconciler>) -> Result<Action> {
    let name = check.name_any();
    let namespace = check.namespace().unwrap_or_default();

    debug!("Reconciling check: {}/{}", namespace, name);

    // Re-read through the API so the write is based on the latest resourceVersion
    with_deadline(
        ctx.config.reconcile_timeout,
        format!("Check {}/{}", namespace, name),
        reconcile_check(&ctx.client, &namespace, &name),
    )
    .await?;

    // ConfigMap changes reach this Check through the fan-out, not a requeue
    Ok(Action::await_change())
}

fn error_policy(check: Arc<Check>, error: &EdgeStatusError, ctx: Arc<CheckReconciler>) -> Action {
    let name = check.name_any();
    let namespace = check.namespace().unwrap_or_default();

    if error.is_conflict() {
        warn!("Check {}/{} changed underneath us: {}", namespace, name, error);
    } else {
        error!("Reconciliation error for {}/{}: {}", namespace, name, error);
    }

    Action::requeue(ctx.config.error_requeue)
}
