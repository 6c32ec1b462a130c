// Copyright 2026, The edge-status Authors
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EdgeStatusError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to list {kind} in namespace {namespace}: {source}")]
    ListFailed {
        kind: &'static str,
        namespace: String,
        #[source]
        source: kube::Error,
    },

    #[error("Failed to fetch Check {namespace}/{name}: {source}")]
    FetchFailed {
        namespace: String,
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("Check {namespace}/{name} was modified concurrently: {source}")]
    WriteConflict {
        namespace: String,
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("Failed to update status of Check {namespace}/{name}: {source}")]
    UpdateFailed {
        namespace: String,
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("Fan-out in namespace {namespace} failed for {failed} of {total} Checks: {source}")]
    FanoutIncomplete {
        namespace: String,
        failed: usize,
        total: usize,
        #[source]
        source: Box<EdgeStatusError>,
    },

    #[error("Reconciliation of {target} timed out after {timeout:?}")]
    Timeout { target: String, timeout: Duration },
}

impl EdgeStatusError {
    /// Whether the failure was a rejected stale write. For a fan-out this
    /// looks at the first error encountered.
    pub fn is_conflict(&self) -> bool {
        match self {
            EdgeStatusError::WriteConflict { .. } => true,
            EdgeStatusError::FanoutIncomplete { source, .. } => source.is_conflict(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, EdgeStatusError>;
