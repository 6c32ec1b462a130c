// Copyright 2026, The edge-status Authors
// SPDX-License-Identifier: Apache-2.0

/// Defaults for values that can be overridden from the environment
pub mod defaults {
    pub const ERROR_REQUEUE_SECS: u64 = 60;
    pub const RECONCILE_TIMEOUT_SECS: u64 = 30;
    pub const FANOUT_RETRY_BASE_SECS: u64 = 1;
    pub const FANOUT_RETRY_MAX_SECS: u64 = 60;
}

/// Capacity of the channel feeding the fan-out manager
pub const FANOUT_CHANNEL_CAPACITY: usize = 256;

/// CRD polling configuration
pub mod crd {
    /// Initial polling interval in seconds when waiting for CRD
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}
