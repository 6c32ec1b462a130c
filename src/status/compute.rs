// Copyright 2026, The edge-status Authors
// SPDX-License-Identifier: Apache-2.0

//! Derives a Check status from the ConfigMaps of a namespace.

use crate::error::{EdgeStatusError, Result};
use crate::types::CheckStatus;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::{api::ListParams, Api, Client, ResourceExt};
use tracing::{debug, instrument};

/// Count the ConfigMaps in `namespace`. Read-only, no retries.
#[instrument(skip(client))]
pub async fn compute_status(client: &Client, namespace: &str) -> Result<CheckStatus> {
    let config_maps: Api<ConfigMap> = Api::namespaced(client.clone(), namespace);
    let list = config_maps
        .list(&ListParams::default())
        .await
        .map_err(|source| EdgeStatusError::ListFailed {
            kind: "ConfigMap",
            namespace: namespace.to_string(),
            source,
        })?;

    for config_map in &list.items {
        debug!("Found ConfigMap {}", config_map.name_any());
    }

    Ok(CheckStatus::from_count(list.items.len()))
}
