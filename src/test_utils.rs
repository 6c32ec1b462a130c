// Copyright 2026, The edge-status Authors
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use http::{Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

const CHECKS_PATH: &str = "/apis/probe.mikebz.com/v1/namespaces";

/// A request the mock received, kept so tests can assert on writes.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// A mock HTTP service that returns predefined responses based on request paths.
///
/// Only exact (method, path) matches are answered; anything else gets a 404 Status.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for PATCH requests matching the exact path
    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, status, body)
    }

    /// Serve `count` ConfigMaps in `namespace`
    pub fn with_config_maps(self, namespace: &str, count: usize) -> Self {
        let names: Vec<String> = (1..=count).map(|i| format!("cm{}", i)).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        self.on_get(
            &config_maps_path(namespace),
            200,
            &config_map_list_json(namespace, &names),
        )
    }

    /// Serve a Check for GET and accept status patches for it
    pub fn with_check(self, namespace: &str, name: &str, resource_version: &str) -> Self {
        let body = check_json(namespace, name, resource_version);
        self.on_get(&check_path(namespace, name), 200, &body)
            .on_patch(&check_status_path(namespace, name), 200, &body)
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    /// Every request received so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Every PATCH received so far, in order
    pub fn patches(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "PATCH")
            .collect()
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        self.responses
            .lock()
            .unwrap()
            .get(&(method.to_string(), path.to_string()))
            .cloned()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let response = self.find_response(&method, &path);
        let requests = self.requests.clone();

        Box::pin(async move {
            let bytes = req.into_body().collect().await?.to_bytes();
            requests.lock().unwrap().push(RecordedRequest {
                method,
                path,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });

            let (status, body) =
                response.unwrap_or_else(|| (404, status_json(404, "NotFound", "not found")));

            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

pub fn config_maps_path(namespace: &str) -> String {
    format!("/api/v1/namespaces/{}/configmaps", namespace)
}

pub fn all_checks_path() -> String {
    "/apis/probe.mikebz.com/v1/checks".to_string()
}

pub fn checks_path(namespace: &str) -> String {
    format!("{}/{}/checks", CHECKS_PATH, namespace)
}

pub fn check_path(namespace: &str, name: &str) -> String {
    format!("{}/{}", checks_path(namespace), name)
}

pub fn check_status_path(namespace: &str, name: &str) -> String {
    format!("{}/status", check_path(namespace, name))
}

fn check_value(namespace: &str, name: &str, resource_version: &str) -> serde_json::Value {
    serde_json::json!({
        "apiVersion": "probe.mikebz.com/v1",
        "kind": "Check",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "resourceVersion": resource_version,
            "uid": format!("uid-{}", name)
        },
        "spec": {}
    })
}

/// Create a mock Check JSON response
pub fn check_json(namespace: &str, name: &str, resource_version: &str) -> String {
    check_value(namespace, name, resource_version).to_string()
}

/// Create a mock Check JSON response carrying a status for `total` ConfigMaps
pub fn check_json_with_status(
    namespace: &str,
    name: &str,
    resource_version: &str,
    total: u32,
) -> String {
    let mut check = check_value(namespace, name, resource_version);
    check["status"] = serde_json::json!({ "total": total, "enabled": total > 0 });
    check.to_string()
}

/// Create a mock CheckList JSON response, one resourceVersion per item
pub fn check_list_json(namespace: &str, names: &[&str]) -> String {
    let items: Vec<serde_json::Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| check_value(namespace, name, &(i + 1).to_string()))
        .collect();

    serde_json::json!({
        "apiVersion": "probe.mikebz.com/v1",
        "kind": "CheckList",
        "metadata": { "resourceVersion": "100" },
        "items": items
    })
    .to_string()
}

/// Create a mock ConfigMapList JSON response
pub fn config_map_list_json(namespace: &str, names: &[&str]) -> String {
    let items: Vec<serde_json::Value> = names
        .iter()
        .map(|name| {
            serde_json::json!({
                "apiVersion": "v1",
                "kind": "ConfigMap",
                "metadata": { "name": name, "namespace": namespace },
                "data": { "key": "value" }
            })
        })
        .collect();

    serde_json::json!({
        "apiVersion": "v1",
        "kind": "ConfigMapList",
        "metadata": { "resourceVersion": "200" },
        "items": items
    })
    .to_string()
}

/// Create a Status failure response with the given code
pub fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

