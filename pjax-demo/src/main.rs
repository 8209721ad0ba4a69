//! Run with
//!
//! ```not_rust
//! PJAX_DEMO_PJAX_DETECTION=true cargo run
//! ```

use pjax_demo::{Server, ServerOptions};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    info!("Starting `{}`...", env!("CARGO_BIN_NAME"));

    let options = ServerOptions::from_env()?;

    // Reuse the socket handed down by `systemfd` if there is one.
    #[cfg(feature = "auto-reload")]
    let listener = pjax_demo::auto_reload::get_or_bind_tcp_listener(options.listen_addr).await?;

    #[cfg(not(feature = "auto-reload"))]
    let listener = tokio::net::TcpListener::bind(options.listen_addr).await?;

    let server = Server::builder(listener)
        .with_options(options)
        .with_ctrl_c_graceful_shutdown()
        .build();

    server.serve().await.map_err(Into::into)
}
