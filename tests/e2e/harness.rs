#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chat_quota_tracker::{
    create_router, ApiState, KeyValueStore, ManualClock, MemoryKeyValueStore, QuotaPolicy,
    QuotaStore, QuotaTrackerConfig, SqliteKeyValueStore, StorageBackend,
};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub const HARNESS_STORAGE_KEY: &str = "chat_usage";

/// In-process quota service bound to an ephemeral local port, driven over
/// real HTTP.
pub struct TestHarness {
    addr: SocketAddr,
    pub clock: Arc<ManualClock>,
    http_client: Client,
    server: Option<JoinHandle<()>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestHarness {
    pub async fn start_memory(limit: u64, clock: Arc<ManualClock>) -> Result<Self> {
        Self::start_with_store(Arc::new(MemoryKeyValueStore::new()), limit, clock).await
    }

    pub async fn start_sqlite(data_dir: &Path, limit: u64, clock: Arc<ManualClock>) -> Result<Self> {
        let kv = SqliteKeyValueStore::new(data_dir)
            .with_context(|| format!("opening usage database in {}", data_dir.display()))?;
        Self::start_with_store(Arc::new(kv), limit, clock).await
    }

    pub async fn start_with_store(
        kv: Arc<dyn KeyValueStore>,
        limit: u64,
        clock: Arc<ManualClock>,
    ) -> Result<Self> {
        tracing_subscriber::fmt::try_init().ok();

        let store = QuotaStore::new(kv, clock.clone(), HARNESS_STORAGE_KEY);
        let policy = Arc::new(QuotaPolicy::new(store, limit));
        let config = QuotaTrackerConfig {
            storage_backend: StorageBackend::Memory,
            monthly_message_limit: limit,
            ..QuotaTrackerConfig::default()
        };
        let router = create_router(Arc::new(ApiState::new(policy, config)));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("binding harness listener")?;
        let addr = listener.local_addr().context("reading harness address")?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let server = tokio::spawn(async move {
            let result = axum::serve(listener, router.into_make_service())
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await;
            if let Err(err) = result {
                tracing::error!(error = %err, "harness server failed");
            }
        });

        let http_client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("building reqwest client")?;

        info!(%addr, limit, "quota harness started");

        Ok(Self {
            addr,
            clock,
            http_client,
            server: Some(server),
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn http_client(&self) -> &Client {
        &self.http_client
    }

    pub async fn get_json(&self, path: &str) -> Result<(u16, Value)> {
        let response = self
            .http_client
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("GET {path}"))?;
        let status = response.status().as_u16();
        let body = response.json().await.context("decoding response body")?;
        debug!(path, status, "harness GET");
        Ok((status, body))
    }

    pub async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<(u16, Value)> {
        let response = self
            .http_client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {path}"))?;
        let status = response.status().as_u16();
        let body = response.json().await.context("decoding response body")?;
        debug!(path, status, "harness POST");
        Ok((status, body))
    }

    pub async fn remaining(&self, is_pro: bool, is_deluxe: bool) -> Result<Value> {
        let (status, body) = self
            .get_json(&format!(
                "/api/quota/remaining?is_pro={is_pro}&is_deluxe={is_deluxe}"
            ))
            .await?;
        anyhow::ensure!(status == 200, "remaining returned {status}: {body}");
        Ok(body)
    }

    pub async fn limit_reached(&self, is_pro: bool, is_deluxe: bool) -> Result<bool> {
        let (status, body) = self
            .get_json(&format!(
                "/api/quota/limit-reached?is_pro={is_pro}&is_deluxe={is_deluxe}"
            ))
            .await?;
        anyhow::ensure!(status == 200, "limit-reached returned {status}: {body}");
        body["limit_reached"]
            .as_bool()
            .context("limit_reached missing from response")
    }

    pub async fn increment(&self, is_pro: bool, is_deluxe: bool) -> Result<Value> {
        let (status, body) = self
            .post_json(
                "/api/quota/increment",
                &serde_json::json!({ "is_pro": is_pro, "is_deluxe": is_deluxe }),
            )
            .await?;
        anyhow::ensure!(status == 200, "increment returned {status}: {body}");
        Ok(body)
    }

    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            tx.send(()).ok();
        }
        if let Some(server) = self.server.take() {
            server.await.context("joining harness server")?;
        }
        Ok(())
    }
}

impl Drop for TestHarness {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            tx.send(()).ok();
        }
    }
}
