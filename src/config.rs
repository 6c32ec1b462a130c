// Copyright 2026, The edge-status Authors
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::defaults;

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Restrict both watchers to a single namespace, cluster-wide when unset
    pub watch_namespace: Option<String>,
    /// Delay before a failed Check reconciliation is retried
    pub error_requeue: Duration,
    /// Deadline for a single reconciliation or fan-out pass
    pub reconcile_timeout: Duration,
    pub fanout_retry_base: Duration,
    pub fanout_retry_max: Duration,
    /// Block start-up until the Check CRD is served by the API server
    pub wait_for_crd: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            watch_namespace: None,
            error_requeue: Duration::from_secs(defaults::ERROR_REQUEUE_SECS),
            reconcile_timeout: Duration::from_secs(defaults::RECONCILE_TIMEOUT_SECS),
            fanout_retry_base: Duration::from_secs(defaults::FANOUT_RETRY_BASE_SECS),
            fanout_retry_max: Duration::from_secs(defaults::FANOUT_RETRY_MAX_SECS),
            wait_for_crd: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let watch_namespace = lookup("WATCH_NAMESPACE").filter(|ns| !ns.trim().is_empty());

        let error_requeue = parse_or(&lookup, "ERROR_REQUEUE_SECS", defaults::ERROR_REQUEUE_SECS)?;
        let reconcile_timeout =
            parse_or(&lookup, "RECONCILE_TIMEOUT_SECS", defaults::RECONCILE_TIMEOUT_SECS)?;
        let fanout_retry_base =
            parse_or(&lookup, "FANOUT_RETRY_BASE_SECS", defaults::FANOUT_RETRY_BASE_SECS)?;
        let fanout_retry_max =
            parse_or(&lookup, "FANOUT_RETRY_MAX_SECS", defaults::FANOUT_RETRY_MAX_SECS)?;
        let wait_for_crd = parse_or(&lookup, "WAIT_FOR_CRD", true)?;

        Ok(Config {
            watch_namespace,
            error_requeue: Duration::from_secs(error_requeue),
            reconcile_timeout: Duration::from_secs(reconcile_timeout),
            fanout_retry_base: Duration::from_secs(fanout_retry_base),
            fanout_retry_max: Duration::from_secs(fanout_retry_max),
            wait_for_crd,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        None => Ok(default),
    }
}
