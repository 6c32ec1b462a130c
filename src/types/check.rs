// Copyright 2026, The edge-status Authors
// SPDX-License-Identifier: Apache-2.0
use kube::CustomResource;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "probe.mikebz.com", version = "v1", kind = "Check")]
#[kube(namespaced)]
#[kube(status = "CheckStatus")]
#[kube(shortname = "chk")]
#[kube(printcolumn = r#"{"name":"Total", "type":"integer", "jsonPath":".status.total"}"#)]
#[kube(printcolumn = r#"{"name":"Enabled", "type":"boolean", "jsonPath":".status.enabled"}"#)]
#[kube(printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#)]
#[serde(rename_all = "camelCase")]
pub struct CheckSpec {
    /// Free-form note for operators, ignored by the reconciler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Namespace-wide ConfigMap summary. Every Check in a namespace converges to
/// the same value.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckStatus {
    /// Number of ConfigMaps in the Check's namespace
    #[serde(default)]
    pub total: u32,
    /// True when at least one ConfigMap exists
    #[serde(default)]
    pub enabled: bool,
}

impl CheckStatus {
    pub fn from_count(count: usize) -> Self {
        let total = u32::try_from(count).unwrap_or(u32::MAX);
        Self {
            total,
            enabled: total > 0,
        }
    }
}

impl Check {
    /// The status as last written, if any
    pub fn current_status(&self) -> Option<&CheckStatus> {
        self.status.as_ref()
    }
}
