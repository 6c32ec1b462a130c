// Copyright 2026, The edge-status Authors
// SPDX-License-Identifier: Apache-2.0

//! CRD availability checking utilities

use crate::constants::crd::{POLL_INTERVAL_SECS, POLL_MAX_INTERVAL_SECS};
use crate::error::Result;
use kube::{discovery::Discovery, Client, Resource};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Wait for the CRD backing `K` to be served by the API server.
/// This uses exponential backoff starting at POLL_INTERVAL_SECS seconds.
pub async fn wait_for_crd<K>(client: &Client) -> Result<()>
where
    K: Resource<DynamicType = ()>,
{
    let api_version = K::api_version(&());
    let kind = K::kind(&());
    let mut interval = POLL_INTERVAL_SECS;

    loop {
        match crd_exists::<K>(client).await {
            Ok(true) => {
                info!("{} CRD ({}) is available", kind, api_version);
                return Ok(());
            }
            Ok(false) => {
                info!(
                    "{} CRD ({}) not yet available, waiting {} seconds...",
                    kind, api_version, interval
                );
            }
            Err(e) => {
                warn!(
                    "Error checking for {} CRD: {}, retrying in {} seconds...",
                    kind, e, interval
                );
            }
        }

        sleep(Duration::from_secs(interval)).await;

        // Exponential backoff with max cap
        interval = (interval * 2).min(POLL_MAX_INTERVAL_SECS);
    }
}

/// Check whether the API group of `K` serves its kind at its version.
async fn crd_exists<K>(client: &Client) -> Result<bool>
where
    K: Resource<DynamicType = ()>,
{
    let group = K::group(&());
    let version = K::version(&());
    let kind = K::kind(&());

    let discovery = Discovery::new(client.clone())
        .filter(&[&*group])
        .run()
        .await?;

    let served = discovery
        .groups()
        .filter(|g| g.name() == group)
        .flat_map(|g| g.recommended_resources())
        .any(|(ar, _)| ar.kind == kind && ar.version == version);

    Ok(served)
}
