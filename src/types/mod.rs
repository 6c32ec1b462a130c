// Copyright 2026, The edge-status Authors
// SPDX-License-Identifier: Apache-2.0

//! Custom resource types owned by the operator.

pub mod check;

pub use check::{Check, CheckSpec, CheckStatus};
