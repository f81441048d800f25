//! HTTP exposition endpoint and signal listener.
//!
//! Both run on a Tokio runtime owned by a dedicated thread, so the sampling
//! loop on the main thread stays synchronous.

use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::JoinHandle;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use tracing::{error, info};

use smart_exporter_core::ExporterError;
use smart_exporter_core::daemon::{ControlFlags, MetricsServer};
use smart_exporter_core::error::Result;
use smart_exporter_core::metrics::MetricRegistry;

const INDEX_PAGE: &str = "<html>
<head><title>SMART Exporter</title></head>
<body>
<h1>SMART Exporter</h1>
<p><a href=\"/metrics\">Metrics</a></p>
</body>
</html>
";

/// Serves `/metrics` and `/` on a background thread.
pub struct HttpServer {
    addr: SocketAddr,
    handle: Option<JoinHandle<()>>,
}

impl HttpServer {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr, handle: None }
    }
}

impl MetricsServer for HttpServer {
    fn start(&mut self, registry: Arc<MetricRegistry>, flags: ControlFlags) -> Result<()> {
        if self.handle.is_some() {
            return Err(ExporterError::Server("server already started".into()));
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("smart-exporter-http")
            .enable_all()
            .build()?;

        // Listener bound and signals installed before the first cycle.
        let addr = self.addr;
        let (listener, signals) = runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .map_err(|e| ExporterError::Server(format!("failed to bind {addr}: {e}")))?;
            let signals = Signals::install()?;
            Ok::<_, ExporterError>((listener, signals))
        })?;
        info!(%addr, "listening");

        let app = router(registry);
        let handle = std::thread::Builder::new()
            .name("http".into())
            .spawn(move || {
                runtime.block_on(async move {
                    tokio::spawn(signals.forward(flags));
                    if let Err(e) = axum::serve(listener, app).await {
                        error!(error = %e, "metrics server stopped");
                    }
                });
            })?;

        self.handle = Some(handle);
        Ok(())
    }
}

/// Builds the exposition router.
pub fn router(registry: Arc<MetricRegistry>) -> Router {
    Router::new()
        .route("/metrics", get(handle_metrics))
        .route("/", get(handle_index))
        .with_state(registry)
}

async fn handle_metrics(State(registry): State<Arc<MetricRegistry>>) -> Response {
    match registry.encode() {
        Ok(body) => ([(header::CONTENT_TYPE, registry.content_type())], body).into_response(),
        Err(e) => {
            error!(error = %e, "failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn handle_index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

#[cfg(unix)]
struct Signals {
    terminate: tokio::signal::unix::Signal,
    interrupt: tokio::signal::unix::Signal,
    hangup: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Signals {
    fn install() -> Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};
        Ok(Self {
            terminate: signal(SignalKind::terminate())?,
            interrupt: signal(SignalKind::interrupt())?,
            hangup: signal(SignalKind::hangup())?,
        })
    }

    /// SIGTERM and SIGINT request termination; SIGHUP requests a reload.
    async fn forward(mut self, flags: ControlFlags) {
        loop {
            tokio::select! {
                _ = self.terminate.recv() => {
                    info!("Received SIGTERM");
                    flags.request_terminate();
                }
                _ = self.interrupt.recv() => {
                    info!("Received SIGINT");
                    flags.request_terminate();
                }
                _ = self.hangup.recv() => {
                    info!("Received SIGHUP");
                    flags.request_reload();
                }
            }
        }
    }
}

#[cfg(not(unix))]
struct Signals;

#[cfg(not(unix))]
impl Signals {
    fn install() -> Result<Self> {
        Ok(Self)
    }

    async fn forward(self, flags: ControlFlags) {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "cannot listen for Ctrl-C");
                return;
            }
            info!("Received Ctrl-C");
            flags.request_terminate();
        }
    }
}
