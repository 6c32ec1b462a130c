// Copyright 2026, The edge-status Authors
// SPDX-License-Identifier: Apache-2.0

//! ConfigMap reconciler - watches ConfigMaps and hands their namespace to the fan-out manager.

use crate::config::Config;
use crate::status::{FanoutEvent, FanoutHandle};
use futures::StreamExt;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::{
    runtime::{watcher, WatchStreamExt},
    Api, Client, ResourceExt,
};
use kube_runtime::watcher::Config as WatcherConfig;
use tracing::{debug, info, warn};

pub struct ConfigMapReconciler {
    client: Client,
    config: Config,
    fanout: FanoutHandle,
}

impl ConfigMapReconciler {
    pub fn new(client: Client, config: Config, fanout: FanoutHandle) -> Self {
        Self {
            client,
            config,
            fanout,
        }
    }

    /// Watch ConfigMaps directly rather than through a Controller: deletions
    /// must trigger a fan-out too, and a Controller never reconciles an
    /// object that is already gone.
    pub async fn run(self) -> anyhow::Result<()> {
        let config_maps: Api<ConfigMap> = match &self.config.watch_namespace {
            Some(namespace) => Api::namespaced(self.client.clone(), namespace),
            None => Api::all(self.client.clone()),
        };

        info!("Watching ConfigMaps...");

        let mut events = watcher(config_maps, WatcherConfig::default())
            .default_backoff()
            .boxed();

        while let Some(event) = events.next().await {
            match event {
                Ok(event) => {
                    if let Some(change) = namespace_change(&event) {
                        self.fanout.send(change).await;
                    }
                }
                Err(e) => warn!("ConfigMap watch error: {}", e),
            }
        }

        warn!("ConfigMap watch stream ended");
        Ok(())
    }
}

/// Map a watch event to the fan-out it requires, if any.
///
/// A (re)list only reports the ConfigMaps that exist now, so a deletion made
/// while the watch was down never shows up on its own. Its end (`InitDone`)
/// therefore resyncs every namespace holding Checks instead.
pub fn namespace_change(event: &watcher::Event<ConfigMap>) -> Option<FanoutEvent> {
    let config_map = match event {
        watcher::Event::Apply(cm) | watcher::Event::Delete(cm) => cm,
        watcher::Event::InitDone => {
            debug!("ConfigMap listing complete, resyncing");
            return Some(FanoutEvent::Resync);
        }
        watcher::Event::Init | watcher::Event::InitApply(_) => return None,
    };

    let name = config_map.name_any();
    let Some(namespace) = config_map.namespace() else {
        debug!("ConfigMap {} has no namespace, ignoring", name);
        return None;
    };

    Some(FanoutEvent::ConfigMapChanged { namespace, name })
}
