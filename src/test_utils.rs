// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities: an in-memory Kubernetes API for service accounts and token secrets.

use crate::config::{Config, Mode};
use crate::constants::TOKEN_KEY;
use crate::error::{ProvisionError, Result};
use crate::kubernetes::{ClientResolver, ClusterConnection};
use bytes::Bytes;
use http::{Request, Response};
use http_body_util::BodyExt;
use k8s_openapi::api::core::v1::{ObjectReference, Secret, ServiceAccount};
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;
use kube::client::Body;
use kube::Client;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tower::Service;

const PATH_PREFIX: &str = "/api/v1/namespaces/default/";

#[derive(Default)]
struct FakeState {
    /// service account name -> referenced secret names
    service_accounts: BTreeMap<String, Vec<String>>,
    /// secret name -> token, `None` when the secret carries no token key
    secrets: BTreeMap<String, Option<String>>,
    issued: u32,
    no_minting: bool,
    no_token_field: bool,
    lingering_deletes: bool,
    failing: bool,
    requests: Vec<(String, String)>,
}

impl FakeState {
    /// Issue a new token secret for a service account
    fn mint(&mut self, service_account: &str, token: Option<String>) -> String {
        self.issued += 1;
        let secret_name = format!("{}-token-{}", service_account, self.issued);
        let token = token.unwrap_or_else(|| format!("token-{}", self.issued));
        let value = if self.no_token_field { None } else { Some(token) };
        self.secrets.insert(secret_name.clone(), value);
        secret_name
    }

    fn handle(&mut self, method: &str, path: &str, body: &[u8]) -> (u16, String) {
        self.requests.push((method.to_string(), path.to_string()));

        if self.failing {
            return (500, status_json(500, "InternalError", "internal error"));
        }

        let Some(rest) = path.strip_prefix(PATH_PREFIX) else {
            return (404, not_found_json("resource", path));
        };
        let mut parts = rest.splitn(2, '/');
        let resource = parts.next().unwrap_or_default();
        let name = parts.next();

        match (method, resource, name) {
            ("GET", "serviceaccounts", Some(name)) => match self.service_accounts.get(name) {
                Some(secrets) => (200, service_account_json(name, secrets)),
                None => (404, not_found_json("serviceaccounts", name)),
            },
            ("POST", "serviceaccounts", None) => {
                let Ok(requested) = serde_json::from_slice::<ServiceAccount>(body) else {
                    return (400, status_json(400, "BadRequest", "invalid body"));
                };
                let name = requested.metadata.name.unwrap_or_default();
                if self.service_accounts.contains_key(&name) {
                    return (
                        409,
                        status_json(
                            409,
                            "AlreadyExists",
                            &format!("serviceaccounts \"{}\" already exists", name),
                        ),
                    );
                }
                let secrets = if self.no_minting {
                    vec![]
                } else {
                    vec![self.mint(&name, None)]
                };
                let response = service_account_json(&name, &secrets);
                self.service_accounts.insert(name, secrets);
                (201, response)
            }
            ("DELETE", "serviceaccounts", Some(name)) if self.lingering_deletes => {
                match self.service_accounts.get(name) {
                    Some(secrets) => (200, service_account_json(name, secrets)),
                    None => (404, not_found_json("serviceaccounts", name)),
                }
            }
            ("DELETE", "serviceaccounts", Some(name)) => match self.service_accounts.remove(name) {
                Some(secrets) => {
                    for secret in &secrets {
                        self.secrets.remove(secret);
                    }
                    (200, service_account_json(name, &secrets))
                }
                None => (404, not_found_json("serviceaccounts", name)),
            },
            ("GET", "secrets", Some(name)) => match self.secrets.get(name) {
                Some(token) => (200, secret_json(name, token.as_deref())),
                None => (404, not_found_json("secrets", name)),
            },
            _ => (404, not_found_json(resource, name.unwrap_or_default())),
        }
    }
}

/// A fake API server for one cluster. Clones share the same state.
#[derive(Clone, Default)]
pub struct FakeApiServer {
    state: Arc<Mutex<FakeState>>,
}

impl FakeApiServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Do not attach a token secret to newly created service accounts
    pub fn without_secret_minting(self) -> Self {
        self.state.lock().unwrap().no_minting = true;
        self
    }

    /// Issue token secrets without a token key
    pub fn without_token_field(self) -> Self {
        self.state.lock().unwrap().no_token_field = true;
        self
    }

    /// Acknowledge service account deletes without removing the account
    pub fn with_lingering_deletes(self) -> Self {
        self.state.lock().unwrap().lingering_deletes = true;
        self
    }

    /// Answer every request with a 500
    pub fn failing(self) -> Self {
        self.state.lock().unwrap().failing = true;
        self
    }

    /// Seed an existing service account, with a token secret when `token` is given
    pub fn with_service_account(self, name: &str, token: Option<&str>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let secrets = match token {
                Some(token) => vec![state.mint(name, Some(token.to_string()))],
                None => vec![],
            };
            state.service_accounts.insert(name.to_string(), secrets);
        }
        self
    }

    pub fn client(&self) -> Client {
        Client::new(self.clone(), "default")
    }

    pub fn has_service_account(&self, name: &str) -> bool {
        self.state.lock().unwrap().service_accounts.contains_key(name)
    }

    /// Token of the first secret referenced by a service account
    pub fn token_for(&self, name: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        let secret = state.service_accounts.get(name)?.first()?;
        state.secrets.get(secret).cloned().flatten()
    }

    pub fn request_count(&self, method: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|(m, _)| m == method)
            .count()
    }
}

impl Service<Request<Body>> for FakeApiServer {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<
            dyn std::future::Future<Output = std::result::Result<Self::Response, Self::Error>>
                + Send,
        >,
    >;

    fn poll_ready(
        &mut self,
        _cx: &mut Context<'_>,
    ) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let state = self.state.clone();

        Box::pin(async move {
            let body: Bytes = match req.into_body().collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(_) => Bytes::new(),
            };
            let (status, body) = state.lock().unwrap().handle(&method, &path, &body);

            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Resolves cluster names to fake API servers
#[derive(Clone, Default)]
pub struct StaticResolver {
    clusters: HashMap<String, FakeApiServer>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cluster(mut self, name: &str, server: &FakeApiServer) -> Self {
        self.clusters.insert(name.to_string(), server.clone());
        self
    }
}

impl ClientResolver for StaticResolver {
    async fn resolve(&self, cluster: &str) -> Result<ClusterConnection> {
        let server = self
            .clusters
            .get(cluster)
            .ok_or_else(|| ProvisionError::connection(cluster, "context not found"))?;
        Ok(ClusterConnection {
            client: server.client(),
            server: format!("https://{}.example:6443", cluster),
        })
    }
}

/// Configuration for team `payments` without propagation delay
pub fn test_config(mode: Mode, clusters: &[&str]) -> Config {
    Config {
        team: "payments".to_string(),
        clusters: clusters.iter().map(|c| c.to_string()).collect(),
        mode,
        kubeconfig: None,
        propagation_delay: Duration::ZERO,
        propagation_timeout: Duration::from_secs(1),
    }
}

fn service_account_json(name: &str, secrets: &[String]) -> String {
    let service_account = ServiceAccount {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("default".to_string()),
            uid: Some(format!("uid-{}", name)),
            ..Default::default()
        },
        secrets: Some(
            secrets
                .iter()
                .map(|s| ObjectReference {
                    name: Some(s.clone()),
                    ..Default::default()
                })
                .collect(),
        ),
        ..Default::default()
    };
    serde_json::to_string(&service_account).unwrap()
}

fn secret_json(name: &str, token: Option<&str>) -> String {
    let mut data = BTreeMap::from([("ca.crt".to_string(), ByteString(b"ca".to_vec()))]);
    if let Some(token) = token {
        data.insert(TOKEN_KEY.to_string(), ByteString(token.as_bytes().to_vec()));
    }
    let secret = Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("default".to_string()),
            ..Default::default()
        },
        data: Some(data),
        type_: Some("kubernetes.io/service-account-token".to_string()),
        ..Default::default()
    };
    serde_json::to_string(&secret).unwrap()
}

fn status_json(code: u16, reason: &str, message: &str) -> String {
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

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(
        404,
        "NotFound",
        &format!("{} \"{}\" not found", resource, name),
    )
}
