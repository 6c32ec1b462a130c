// Copyright 2026, The edge-status Authors
// SPDX-License-Identifier: Apache-2.0
pub mod config;
pub mod constants;
pub mod error;
pub mod kubernetes;
pub mod reconcilers;
pub mod status;
pub mod types;

#[cfg(test)]
pub mod test_utils;
