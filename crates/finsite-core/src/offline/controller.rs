//! Offline cache controller lifecycle.
//!
//! ```text
//! Installing --install()--> Activating --activate()--> Active
//! ```
//!
//! Installing pre-caches the manifest into the static namespace. Activating
//! deletes every namespace that does not belong to this version and only then
//! claims open clients. Only an Active controller intercepts fetches.

use std::sync::Arc;

use futures::future::join_all;
use reqwest::Url;
use tracing::{debug, info, warn};

use super::error::{ControllerError, FetchError};
use super::manifest::{CacheNames, Manifest};
use super::network::Network;
use super::policy::{classify, Route};
use super::request::{Request, Response};
use super::storage::CacheStorage;
use super::strategy::{cache_first, network_first, OnNetworkFailure};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Installing,
    Activating,
    Active,
}

/// Result of handing a request to the controller.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Not intercepted; the caller performs the request itself.
    PassThrough,
    Respond(Result<Response, FetchError>),
}

#[derive(Debug, Default, Clone)]
pub struct InstallReport {
    pub cached: Vec<String>,
    pub failed: Vec<(String, String)>,
}

#[derive(Debug, Default, Clone)]
pub struct ActivationReport {
    pub deleted: Vec<String>,
    pub failed: Vec<(String, String)>,
}

pub struct OfflineController {
    storage: Arc<dyn CacheStorage>,
    network: Arc<dyn Network>,
    names: CacheNames,
    manifest: Manifest,
    origin: Url,
    state: LifecycleState,
    clients_claimed: bool,
}

impl OfflineController {
    pub fn new(
        storage: Arc<dyn CacheStorage>,
        network: Arc<dyn Network>,
        names: CacheNames,
        manifest: Manifest,
        origin: Url,
    ) -> Self {
        Self {
            storage,
            network,
            names,
            manifest,
            origin,
            state: LifecycleState::Installing,
            clients_claimed: false,
        }
    }

    /// A controller for a version already installed and activated in an
    /// earlier run: starts Active with its caches as they are on disk.
    pub fn resume(
        storage: Arc<dyn CacheStorage>,
        network: Arc<dyn Network>,
        names: CacheNames,
        manifest: Manifest,
        origin: Url,
    ) -> Self {
        let mut controller = Self::new(storage, network, names, manifest, origin);
        controller.state = LifecycleState::Active;
        controller.clients_claimed = true;
        controller
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn names(&self) -> &CacheNames {
        &self.names
    }

    pub fn clients_claimed(&self) -> bool {
        self.clients_claimed
    }

    /// Whether this version's namespaces already exist in storage.
    pub async fn is_installed(&self) -> bool {
        match self.storage.namespace_names().await {
            Ok(names) => {
                names.contains(&self.names.primary) || names.contains(&self.names.static_assets)
            }
            Err(e) => {
                warn!(error = %e, "Failed to list cache namespaces");
                false
            }
        }
    }

    fn expect_state(&self, expected: LifecycleState, action: &'static str) -> Result<(), ControllerError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ControllerError::InvalidTransition {
                state: self.state,
                action,
            })
        }
    }

    /// Pre-cache the manifest, then skip waiting. Individual failures are
    /// recorded in the report and never abort installation.
    pub async fn install(&mut self) -> Result<InstallReport, ControllerError> {
        self.expect_state(LifecycleState::Installing, "install")?;
        info!(namespace = %self.names.static_assets, "Installing offline cache");

        let mut report = InstallReport::default();
        let namespace = self.names.static_assets.as_str();

        if let Err(e) = self.storage.open_namespace(namespace).await {
            warn!(namespace, error = %e, "Failed to open static namespace");
            report.failed.push((namespace.to_string(), e.to_string()));
        } else {
            let storage = self.storage.as_ref();
            let network = self.network.as_ref();
            let results = join_all(self.manifest.requests(&self.origin).into_iter().map(
                |(entry, request)| async move {
                    let outcome = Self::prefetch(storage, network, namespace, request).await;
                    (entry, outcome)
                },
            ))
            .await;

            for (entry, outcome) in results {
                match outcome {
                    Ok(()) => report.cached.push(entry),
                    Err(reason) => {
                        debug!(entry = %entry, reason = %reason, "Manifest prefetch failed");
                        report.failed.push((entry, reason));
                    }
                }
            }
        }

        info!(
            cached = report.cached.len(),
            failed = report.failed.len(),
            "Install complete, skipping wait"
        );
        self.state = LifecycleState::Activating;
        Ok(report)
    }

    async fn prefetch(
        storage: &dyn CacheStorage,
        network: &dyn Network,
        namespace: &str,
        request: Result<Request, FetchError>,
    ) -> Result<(), String> {
        let request = request.map_err(|e| e.to_string())?;
        let response = network.fetch(&request).await.map_err(|e| e.to_string())?;
        if !response.is_ok() {
            return Err(format!("status {}", response.status));
        }
        storage
            .put(namespace, &request.key(), response)
            .await
            .map_err(|e| e.to_string())
    }

    /// Delete namespaces from other versions, then claim clients.
    pub async fn activate(&mut self) -> Result<ActivationReport, ControllerError> {
        self.expect_state(LifecycleState::Activating, "activate")?;
        let mut report = ActivationReport::default();

        let existing = match self.storage.namespace_names().await {
            Ok(names) => names,
            Err(e) => {
                warn!(error = %e, "Failed to list cache namespaces, nothing swept");
                Vec::new()
            }
        };

        let stale: Vec<String> = existing
            .into_iter()
            .filter(|name| !self.names.contains(name))
            .collect();

        let storage = self.storage.as_ref();
        let results = join_all(stale.into_iter().map(|name| async move {
            let outcome = storage.delete_namespace(&name).await;
            (name, outcome)
        }))
        .await;

        for (name, outcome) in results {
            match outcome {
                Ok(_) => {
                    info!(namespace = %name, "Deleted stale cache namespace");
                    report.deleted.push(name);
                }
                Err(e) => {
                    warn!(namespace = %name, error = %e, "Failed to delete stale namespace");
                    report.failed.push((name, e.to_string()));
                }
            }
        }

        // Every deletion above has finished before clients are claimed.
        self.clients_claimed = true;
        self.state = LifecycleState::Active;
        info!(deleted = report.deleted.len(), "Activated, clients claimed");
        Ok(report)
    }

    /// Route an intercepted request.
    pub async fn handle_fetch(&self, request: &Request) -> FetchOutcome {
        if self.state != LifecycleState::Active {
            debug!(state = ?self.state, url = %request.url, "Not active, passing through");
            return FetchOutcome::PassThrough;
        }

        let storage = self.storage.as_ref();
        let network = self.network.as_ref();
        let route = classify(request);
        debug!(url = %request.url, ?route, "Routing fetch");

        let result = match route {
            Route::PassThrough => return FetchOutcome::PassThrough,
            Route::Image => {
                cache_first(
                    storage,
                    network,
                    &self.names.static_assets,
                    request,
                    OnNetworkFailure::NotFound,
                )
                .await
            }
            Route::Font => {
                cache_first(
                    storage,
                    network,
                    &self.names.static_assets,
                    request,
                    OnNetworkFailure::Refetch,
                )
                .await
            }
            Route::StaticAsset => {
                cache_first(
                    storage,
                    network,
                    &self.names.primary,
                    request,
                    OnNetworkFailure::Refetch,
                )
                .await
            }
            Route::Page => Ok(network_first(storage, network, &self.names.primary, request).await),
        };
        FetchOutcome::Respond(result)
    }

    /// Resolve a request end to end: intercepted requests go through the
    /// routing policy, pass-through requests straight to the network.
    pub async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        match self.handle_fetch(request).await {
            FetchOutcome::Respond(result) => result,
            FetchOutcome::PassThrough => self.network.fetch(request).await,
        }
    }
}
