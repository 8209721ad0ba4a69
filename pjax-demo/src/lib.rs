//! Pjax demo
//!
//! A server-rendered page demo with two views: a home page and a generic page keyed by a path
//! parameter. Pages are rendered in full, or only their content block for Pjax requests when Pjax
//! detection is enabled.
//!
//! # Features
//!
//! - `auto-reload`: Reuse a listening socket passed down by `systemfd`, so that the server can be
//!   restarted without dropping connections. Useful for development. **Enabled by default.**

pub mod pjax;
pub mod templating;

mod context;
mod controller;
mod server;

pub use context::{RenderContext, RenderInstruction, RenderMode};
pub use controller::{
    HOME_TITLE, INDEX_TEMPLATE, PAGE_TEMPLATE, PageController, Request, ResponseSink,
};
pub use server::{
    ControllerRouter, DEFAULT_LISTEN_ADDR, IncomingRequest, ServeError, Server, ServerBuilder,
    ServerOptions, ServerOptionsFromEnvError,
};
pub use templating::{RenderError, TemplateSink};

#[cfg(feature = "auto-reload")]
pub use server::auto_reload;
