// Copyright 2026, The edge-status Authors
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes reconcilers that react to watch events.

pub mod check;
pub mod configmap;

pub use check::CheckReconciler;
pub use configmap::ConfigMapReconciler;
