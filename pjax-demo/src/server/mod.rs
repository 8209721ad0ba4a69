use std::{future::Future, pin::Pin};

#[cfg(feature = "auto-reload")]
pub mod auto_reload;

mod controller_router;
mod options;

use axum::Router;
pub use controller_router::{ControllerRouter, IncomingRequest};
pub use options::{DEFAULT_LISTEN_ADDR, ServerOptions, ServerOptionsFromEnvError};

use crate::PageController;

type ShutdownSignal = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Collects what a [`Server`] needs before it can serve.
pub struct ServerBuilder {
    listener: tokio::net::TcpListener,
    graceful_shutdown: Option<ShutdownSignal>,
    options: ServerOptions,
}

/// The demo server, bound to its listener.
pub struct Server {
    listener: tokio::net::TcpListener,

    /// Serving stops once this resolves. Without one, the server runs forever.
    graceful_shutdown: Option<ShutdownSignal>,

    options: ServerOptions,
}

/// An error that can occur while serving.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    /// The listener failed while accepting connections.
    #[error("failed to serve the application: {0}")]
    Io(#[from] std::io::Error),

    /// The listener has no local address.
    #[error("failed to get the local address of the listener: {0}")]
    LocalAddr(std::io::Error),
}

impl ServerBuilder {
    /// Replace the default options.
    pub fn with_options(mut self, options: ServerOptions) -> Self {
        self.options = options;
        self
    }

    /// Stop serving once `signal` resolves.
    ///
    /// In-flight requests are allowed to complete.
    pub fn with_graceful_shutdown(
        mut self,
        signal: impl Future<Output = ()> + Send + 'static,
    ) -> Self {
        self.graceful_shutdown = Some(Box::pin(signal));
        self
    }

    /// Stop serving on `ctrl-c`.
    pub fn with_ctrl_c_graceful_shutdown(self) -> Self {
        self.with_graceful_shutdown(async move {
            tracing::info!("Press `ctrl-c` to stop the server.");

            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to register for `ctrl-c` signal: {err}");
            }

            tracing::info!("Received `ctrl-c` signal, shutting down gracefully.");
        })
    }

    pub fn build(self) -> Server {
        Server {
            listener: self.listener,
            graceful_shutdown: self.graceful_shutdown,
            options: self.options,
        }
    }
}

impl Server {
    /// Start building a server around an already bound listener.
    pub fn builder(listener: tokio::net::TcpListener) -> ServerBuilder {
        ServerBuilder {
            listener,
            graceful_shutdown: None,
            options: Default::default(),
        }
    }

    pub fn options(&self) -> &ServerOptions {
        &self.options
    }

    /// The page controller that [`Server::serve`] routes requests to.
    pub fn controller(&self) -> PageController {
        PageController::new().with_pjax_detection(self.options.pjax_detection)
    }

    /// Serve the pages, configured from the server options.
    pub async fn serve(self) -> Result<(), ServeError> {
        let router = ControllerRouter::new(self.controller());

        self.serve_with_router(router).await
    }

    /// Serve a router built by the caller, possibly with extra routes or layers.
    pub async fn serve_with_router(self, router: ControllerRouter) -> Result<(), ServeError> {
        let local_addr = self.listener.local_addr().map_err(ServeError::LocalAddr)?;

        tracing::info!("Now serving Pjax demo at `http://{local_addr}`...");

        let router: Router = router.into();
        let serve = axum::serve(self.listener, router);

        match self.graceful_shutdown {
            Some(signal) => serve.with_graceful_shutdown(signal).await,
            None => serve.await,
        }
        .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn local_listener() -> tokio::net::TcpListener {
        tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap()
    }

    #[tokio::test]
    async fn test_serve_stops_on_shutdown_signal() {
        let server = Server::builder(local_listener().await)
            .with_graceful_shutdown(async {})
            .build();

        server
            .serve_with_router(ControllerRouter::new(PageController::new()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_serve_uses_options() {
        let server = Server::builder(local_listener().await).build();

        assert!(!server.options().pjax_detection);
        assert!(!server.controller().pjax_detection());

        let server = Server::builder(local_listener().await)
            .with_options(ServerOptions {
                pjax_detection: true,
                ..Default::default()
            })
            .with_graceful_shutdown(async {})
            .build();

        assert!(server.options().pjax_detection);
        assert!(server.controller().pjax_detection());

        server.serve().await.unwrap();
    }
}
