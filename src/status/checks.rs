// Copyright 2026, The edge-status Authors
// SPDX-License-Identifier: Apache-2.0

//! Writing computed status onto Check objects, one at a time or for a whole namespace.

use crate::error::{EdgeStatusError, Result};
use crate::status::compute::compute_status;
use crate::types::{Check, CheckStatus};
use kube::{
    api::{ListParams, Patch, PatchParams},
    Api, Client, ResourceExt,
};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

/// Recompute and store the status of a single Check.
///
/// A Check that no longer exists is not an error: nothing is written and
/// `Ok(())` is returned.
#[instrument(skip(client))]
pub async fn reconcile_check(client: &Client, namespace: &str, name: &str) -> Result<()> {
    let checks: Api<Check> = Api::namespaced(client.clone(), namespace);

    let check = checks
        .get_opt(name)
        .await
        .map_err(|source| EdgeStatusError::FetchFailed {
            namespace: namespace.to_string(),
            name: name.to_string(),
            source,
        })?;

    let Some(check) = check else {
        debug!("Check {}/{} is gone, nothing to do", namespace, name);
        return Ok(());
    };

    let status = compute_status(client, namespace).await?;
    write_status(&checks, &check, &status).await
}

/// Recompute and store the status of every Check in `namespace`.
///
/// Checks are handled one after another. A failure does not stop the loop;
/// the remaining Checks are still written and the first error is returned
/// once the pass is over.
#[instrument(skip(client))]
pub async fn reconcile_all_checks(client: &Client, namespace: &str) -> Result<()> {
    let checks: Api<Check> = Api::namespaced(client.clone(), namespace);
    let list = checks
        .list(&ListParams::default())
        .await
        .map_err(|source| EdgeStatusError::ListFailed {
            kind: "Check",
            namespace: namespace.to_string(),
            source,
        })?;

    let total = list.items.len();
    if total == 0 {
        debug!("No Checks in namespace {}", namespace);
        return Ok(());
    }

    let mut failed = 0;
    let mut first_error = None;

    for check in &list.items {
        let result = match compute_status(client, namespace).await {
            Ok(status) => write_status(&checks, check, &status).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            warn!("Failed to refresh Check {}/{}: {}", namespace, check.name_any(), e);
            failed += 1;
            if first_error.is_none() {
                first_error = Some(e);
            }
        }
    }

    match first_error {
        Some(source) => Err(EdgeStatusError::FanoutIncomplete {
            namespace: namespace.to_string(),
            failed,
            total,
            source: Box::new(source),
        }),
        None => {
            info!("Refreshed {} Checks in namespace {}", total, namespace);
            Ok(())
        }
    }
}

/// Namespaces that hold at least one Check, sorted. Restricted to
/// `watch_namespace` when one is given.
#[instrument(skip(client))]
pub async fn namespaces_with_checks(
    client: &Client,
    watch_namespace: Option<&str>,
) -> Result<Vec<String>> {
    let checks: Api<Check> = match watch_namespace {
        Some(namespace) => Api::namespaced(client.clone(), namespace),
        None => Api::all(client.clone()),
    };

    let list = checks
        .list(&ListParams::default())
        .await
        .map_err(|source| EdgeStatusError::ListFailed {
            kind: "Check",
            namespace: watch_namespace.unwrap_or("<all>").to_string(),
            source,
        })?;

    let namespaces: BTreeSet<String> = list.items.iter().filter_map(|c| c.namespace()).collect();
    debug!("{} Checks across {} namespaces", list.items.len(), namespaces.len());

    Ok(namespaces.into_iter().collect())
}

/// Merge-patch the status subresource, pinned to the resourceVersion we read
/// so a concurrent writer makes the API server answer 409.
async fn write_status(checks: &Api<Check>, check: &Check, status: &CheckStatus) -> Result<()> {
    let name = check.name_any();
    let namespace = check.namespace().unwrap_or_default();

    if check.current_status() == Some(status) {
        debug!("Status of Check {}/{} already up to date", namespace, name);
        return Ok(());
    }

    let patch = status_patch(check.resource_version(), status);

    match checks
        .patch_status(&name, &PatchParams::default(), &Patch::Merge(&patch))
        .await
    {
        Ok(_) => {
            info!(
                "Updated Check {}/{}: total={}, enabled={}",
                namespace, name, status.total, status.enabled
            );
            Ok(())
        }
        Err(kube::Error::Api(err)) if err.code == 404 => {
            debug!("Check {}/{} was deleted before its status was written", namespace, name);
            Ok(())
        }
        Err(source) if is_conflict(&source) => Err(EdgeStatusError::WriteConflict {
            namespace,
            name,
            source,
        }),
        Err(source) => Err(EdgeStatusError::UpdateFailed {
            namespace,
            name,
            source,
        }),
    }
}

fn is_conflict(error: &kube::Error) -> bool {
    matches!(error, kube::Error::Api(err) if err.code == 409)
}

fn status_patch(resource_version: Option<String>, status: &CheckStatus) -> serde_json::Value {
    match resource_version {
        Some(rv) => serde_json::json!({
            "metadata": { "resourceVersion": rv },
            "status": status,
        }),
        None => serde_json::json!({ "status": status }),
    }
}
