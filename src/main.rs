// Copyright 2026, The edge-status Authors
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::Client;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use edge_status::config::Config;
use edge_status::kubernetes::wait_for_crd;
use edge_status::reconcilers::{CheckReconciler, ConfigMapReconciler};
use edge_status::status::FanoutManager;
use edge_status::types::Check;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,kube=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting edge-status operator");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: watch_namespace={}",
        config.watch_namespace.as_deref().unwrap_or("<all>")
    );

    // Create Kubernetes client
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    if config.wait_for_crd {
        info!("Waiting for Check CRD to become available...");
        wait_for_crd::<Check>(&client).await?;
    }

    // Create the fan-out manager and get a handle for the ConfigMap reconciler
    let (fanout_manager, fanout_handle) = FanoutManager::new(client.clone(), config.clone());

    let check_reconciler = CheckReconciler::new(client.clone(), config.clone());
    let config_map_reconciler = ConfigMapReconciler::new(client, config, fanout_handle);

    info!("Starting reconcilers...");

    tokio::try_join!(
        fanout_manager.run(),
        check_reconciler.run(),
        config_map_reconciler.run()
    )?;

    // This should never be reached as reconcilers run forever
    warn!("All reconcilers stopped unexpectedly");
    Ok(())
}
