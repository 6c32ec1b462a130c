// Copyright 2026, The edge-status Authors
// SPDX-License-Identifier: Apache-2.0

//! Status computation, Check status writes and the ConfigMap fan-out.

pub mod checks;
pub mod compute;
pub mod fanout;

pub use checks::{namespaces_with_checks, reconcile_all_checks, reconcile_check};
pub use compute::compute_status;
pub use fanout::{FanoutEvent, FanoutHandle, FanoutManager};

use crate::error::{EdgeStatusError, Result};
use std::future::Future;
use std::time::Duration;

/// Run `work` under a deadline. On expiry the pending store call is dropped.
pub async fn with_deadline<T, F>(timeout: Duration, target: impl Into<String>, work: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, work).await {
        Ok(result) => result,
        Err(_) => Err(EdgeStatusError::Timeout {
            target: target.into(),
            timeout,
        }),
    }
}
