//! Auto-reload facilities.
//!
//! Run the server under [systemfd](https://github.com/mitsuhiko/systemfd) to keep the listening
//! socket open across restarts, for instance with
//! `systemfd --no-pid -s http::3000 -- cargo watch -x run`.

use listenfd::ListenFd;
use tokio::net::{TcpListener, ToSocketAddrs};

/// An error that can occur when acquiring the server's TCP listener.
#[derive(Debug, thiserror::Error)]
pub enum GetTcpListenerError {
    /// The socket passed through `listenfd` could not be taken.
    #[error("failed to take the socket passed through `listenfd`: {0}")]
    ListenFd(std::io::Error),

    /// The inherited socket could not be switched to non-blocking mode.
    #[error("failed to make the inherited socket non-blocking: {0}")]
    SetNonblocking(std::io::Error),

    /// The inherited socket could not be registered with tokio.
    #[error("failed to register the inherited socket with tokio: {0}")]
    FromStd(std::io::Error),

    /// No socket was inherited and binding a new one failed.
    #[error("failed to bind the listening socket: {0}")]
    Bind(std::io::Error),
}

/// Take the first TCP listener passed down by `systemfd`, or bind to `addr` when there is none.
pub async fn get_or_bind_tcp_listener(
    addr: impl ToSocketAddrs,
) -> Result<TcpListener, GetTcpListenerError> {
    let inherited = ListenFd::from_env()
        .take_tcp_listener(0)
        .map_err(GetTcpListenerError::ListenFd)?;

    let Some(listener) = inherited else {
        tracing::debug!("No listener passed through `listenfd`, binding a new one.");

        return TcpListener::bind(addr)
            .await
            .map_err(GetTcpListenerError::Bind);
    };

    tracing::info!("Reusing the listener passed through `listenfd`.");

    listener
        .set_nonblocking(true)
        .map_err(GetTcpListenerError::SetNonblocking)?;

    TcpListener::from_std(listener).map_err(GetTcpListenerError::FromStd)
}
