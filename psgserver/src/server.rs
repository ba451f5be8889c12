//! # Server module - high-level Axum wrapper
//!
//! A small, ergonomic abstraction over Axum for the agent's local HTTP
//! surface, hiding router plumbing behind a handful of `add_*` calls:
//!
//! - **Simple JSON routes** with `add_route()`
//! - **Stateful handlers** (e.g. a watch-channel reader) with
//!   `add_handler_with_state()`
//! - **Static directories** straight from disk with `add_asset_dir()`
//! - **Embedded pages** compiled into the binary with `add_embedded()`
//! - **Graceful shutdown** on Ctrl+C

use anyhow::{Context, Result};
use axum::handler::Handler;
use axum::routing::get;
use axum::{Json, Router};
use axum_embed::ServeEmbed;
use rust_embed::RustEmbed;
use serde::Serialize;
use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::{signal, sync::RwLock, task::JoinHandle};
use tower_http::services::ServeDir;
use tracing::info;

/// The agent's local HTTP server.
///
/// Routes are accumulated with the `add_*` methods, then the server is
/// bound and spawned with [`start`](Self::start) and awaited with
/// [`wait`](Self::wait), which returns once the operator interrupts the
/// process.
pub struct Server {
    name: String,
    http_port: u16,
    router: Arc<RwLock<Router>>,
    join_handle: Option<JoinHandle<()>>,
}

impl Server {
    /// Create a new server instance.
    ///
    /// # Arguments
    ///
    /// * `name` - Server name (for logs)
    /// * `http_port` - HTTP port to listen on
    pub fn new(name: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            http_port,
            router: Arc::new(RwLock::new(Router::new())),
            join_handle: None,
        }
    }

    /// Add a dynamic JSON route.
    ///
    /// The closure is called on every GET of `path` and its return value
    /// serialized as JSON.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use psgserver::Server;
    /// # #[tokio::main]
    /// # async fn main() {
    /// # let mut server = Server::new("Test", 8080);
    /// server.add_route("/api/status", || async {
    ///     serde_json::json!({ "status": "online" })
    /// }).await;
    /// # }
    /// ```
    pub async fn add_route<F, Fut, T>(&mut self, path: &str, f: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Serialize + Send + 'static,
    {
        let f = Arc::new(f);
        let handler = {
            let f = f.clone();
            move || {
                let f = f.clone();
                async move { Json(f().await) }
            }
        };

        self.mount(path, Router::new().route("/", get(handler))).await;
    }

    /// Add a GET handler with state.
    pub async fn add_handler_with_state<H, T, S>(&mut self, path: &str, handler: H, state: S)
    where
        H: Handler<T, S> + Clone + 'static,
        T: 'static,
        S: Clone + Send + Sync + 'static,
    {
        let route = Router::new()
            .route("/", get(handler.clone()))
            .with_state(state.clone());
        self.mount(path, route).await;
    }

    /// Serve a directory from disk.
    ///
    /// Files appearing under `dir` after startup are picked up on the
    /// next request, which is what lets freshly cached assets become
    /// servable without a restart.
    pub async fn add_asset_dir(&mut self, path: &str, dir: &Path) {
        let route = Router::new().fallback_service(ServeDir::new(dir));
        self.mount(path, route).await;
    }

    /// Serve files embedded in the binary via `RustEmbed`.
    pub async fn add_embedded<E>(&mut self, path: &str)
    where
        E: RustEmbed + Clone + Send + Sync + 'static,
    {
        let serve = ServeEmbed::<E>::with_parameters(
            Some("index.html".to_string()),
            axum_embed::FallbackBehavior::Ok,
            Some("index.html".to_string()),
        );
        self.mount(path, Router::new().fallback_service(serve)).await;
    }

    /// Merge at the root or nest under a sub-path.
    async fn mount(&mut self, path: &str, route: Router) {
        let mut r = self.router.write().await;
        *r = if path == "/" {
            std::mem::take(&mut *r).merge(route)
        } else {
            std::mem::take(&mut *r).nest(path, route)
        };
    }

    /// Bind and start the HTTP server.
    ///
    /// Binding happens before anything is spawned: an unavailable port is
    /// a startup-fatal condition and is returned as an error rather than
    /// crashing a background task. After a successful bind the server
    /// runs until Ctrl+C.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use psgserver::Server;
    /// # #[tokio::main]
    /// # async fn main() -> anyhow::Result<()> {
    /// # let mut server = Server::new("Test", 8080);
    /// server.start().await?;
    /// server.wait().await;  // Waits for Ctrl+C
    /// # Ok(())
    /// # }
    /// ```
    pub async fn start(&mut self) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Cannot bind {} on port {}", self.name, self.http_port))?;

        info!(
            "Server {} running at http://0.0.0.0:{}",
            self.name, self.http_port
        );

        let router = self.router.clone();
        let server_task = tokio::spawn(async move {
            let r = router.read().await.clone();
            axum::serve(listener, r.into_make_service()).await.unwrap();
        });

        let shutdown_task = tokio::spawn(async move {
            signal::ctrl_c().await.expect("failed to listen for ctrl_c");
            info!("Ctrl+C received, shutting down");
        });

        self.join_handle = Some(tokio::spawn(async move {
            tokio::select! {
                _ = server_task => {},
                _ = shutdown_task => {},
            }
        }));

        Ok(())
    }

    /// Wait until the server stops (operator interrupt).
    pub async fn wait(&mut self) {
        if let Some(h) = self.join_handle.take() {
            let _ = h.await;
        }
    }

    /// Port the server listens on.
    pub fn http_port(&self) -> u16 {
        self.http_port
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_routes_answer_after_start() {
        // Port 0: let the OS pick, we only exercise the wiring here.
        let mut server = Server::new("test", 0);
        server
            .add_route("/api/status", || async { serde_json::json!({ "ok": true }) })
            .await;

        // Building the router twice (route + start) must not panic.
        assert!(server.start().await.is_ok());
    }

    #[tokio::test]
    async fn test_port_conflict_is_an_error() {
        let listener = tokio::net::TcpListener::bind("0.0.0.0:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let mut server = Server::new("test", port);
        let result = server.start().await;
        assert!(result.is_err(), "expected bind failure on busy port");
    }
}
