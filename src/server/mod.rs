//! REST service adapter over a shared prefix index.
//!
//! The adapter maps HTTP method × path shape onto the core operations:
//!
//! | Method | Path            | Operation       |
//! |--------|-----------------|-----------------|
//! | GET    | `/`             | status          |
//! | POST   | `/`             | batch lookup    |
//! | GET    | `/{ip}`         | single lookup   |
//! | GET    | `/{ip}/{p}`     | verify          |
//! | PUT    | `/{ip}/{p}`     | add + commit    |
//! | DELETE | `/{ip}/{p}`     | remove + commit |
//!
//! Concurrent lookups run under a shared read lock; add/delete hold the
//! write lock across both the mutation and the commit, so a reader of
//! the database file always observes a consistent snapshot.

mod handlers;
mod response;

pub use response::{Format, Operation, MIME_JSON, MIME_YAML, X_OPERATION};

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use parking_lot::RwLock;

use crate::index::PrefixIndex;
use crate::store::Store;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    index: Arc<RwLock<PrefixIndex>>,
    store: Arc<Store>,
}

impl AppState {
    /// Wrap an index together with the store it persists to.
    pub fn new(index: PrefixIndex, store: Store) -> Self {
        Self {
            index: Arc::new(RwLock::new(index)),
            store: Arc::new(store),
        }
    }
}

/// Build the service router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::status).post(handlers::batch_lookup))
        .route("/:ip", get(handlers::single_lookup))
        .route(
            "/:ip/:prefix",
            get(handlers::verify)
                .put(handlers::add)
                .delete(handlers::remove),
        )
        .with_state(state)
}

/// Bind and serve until SIGINT, SIGQUIT or SIGTERM, then drain in-flight
/// requests before returning.
pub async fn serve(router: Router, address: &str, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind((address, port)).await?;
    log::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        let mut sigquit = signal(SignalKind::quit()).expect("failed to install SIGQUIT handler");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigquit.recv() => {}
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("received SIGINT, shutting down"),
        _ = terminate => log::info!("received termination signal, shutting down"),
    }
}
