// Copyright 2026, The edge-status Authors
// SPDX-License-Identifier: Apache-2.0

//! Prints the Check CRD manifest.
//!
//! Usage: cargo run --bin crdgen > deploy/crds/check.yaml

use edge_status::types::Check;
use kube::CustomResourceExt;

fn main() -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(&Check::crd())?);
    Ok(())
}
