//! Server options.

use std::net::SocketAddr;

/// The default address the server listens on.
pub const DEFAULT_LISTEN_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST), 3000);

/// The options for the server.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// The address to listen on.
    ///
    /// If `PJAX_DEMO_LISTEN_ADDR` is set in the environment, it will be read and used when calling
    /// `ServerOptions::from_env`.
    pub listen_addr: SocketAddr,

    /// Whether requests carrying an `X-PJAX` header get a partial render.
    ///
    /// Off by default: every request gets the complete page.
    ///
    /// If `PJAX_DEMO_PJAX_DETECTION` is set in the environment, it will be read and used when
    /// calling `ServerOptions::from_env`.
    pub pjax_detection: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR,
            pjax_detection: false,
        }
    }
}

/// An error that can occur when trying to get the server options from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ServerOptionsFromEnvError {
    /// An environment variable was not unicode.
    #[error("environment variable {name} was not unicode")]
    NotUnicode {
        /// The name of the environment variable.
        name: &'static str,
    },

    /// An error occurred while trying to get the listen address from the environment.
    #[error(
        "failed to parse the listen address from environment variable {name} (was `{addr}`): {err}"
    )]
    ListenAddr {
        /// The name of the environment variable.
        name: &'static str,

        /// The address that was attempted to be parsed.
        addr: String,

        /// The error that occurred.
        #[source]
        err: std::net::AddrParseError,
    },

    /// A flag environment variable held something else than a boolean.
    #[error("environment variable {name} must be a boolean (was `{value}`)")]
    Flag {
        /// The name of the environment variable.
        name: &'static str,

        /// The value that was attempted to be parsed.
        value: String,
    },
}

/// Parse a boolean flag, case-insensitively.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl ServerOptions {
    /// The environment variable name for the listen address.
    pub const PJAX_DEMO_LISTEN_ADDR: &'static str = "PJAX_DEMO_LISTEN_ADDR";

    /// The environment variable name for the Pjax detection flag.
    pub const PJAX_DEMO_PJAX_DETECTION: &'static str = "PJAX_DEMO_PJAX_DETECTION";

    fn env_var(name: &'static str) -> Result<Option<String>, ServerOptionsFromEnvError> {
        Self::env_value(name, std::env::var(name))
    }

    /// Interpret an environment lookup: empty and missing values both count as unset.
    fn env_value(
        name: &'static str,
        lookup: Result<String, std::env::VarError>,
    ) -> Result<Option<String>, ServerOptionsFromEnvError> {
        match lookup {
            Ok(value) => Ok(if value.is_empty() { None } else { Some(value) }),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => {
                Err(ServerOptionsFromEnvError::NotUnicode { name })
            }
        }
    }

    /// Get the server options from the environment.
    pub fn from_env() -> Result<Self, ServerOptionsFromEnvError> {
        tracing::info!("Reading server options from the environment...");

        Self::from_values(
            Self::env_var(Self::PJAX_DEMO_LISTEN_ADDR)?,
            Self::env_var(Self::PJAX_DEMO_PJAX_DETECTION)?,
        )
    }

    /// Build the server options from raw values, as read from the environment.
    fn from_values(
        listen_addr: Option<String>,
        pjax_detection: Option<String>,
    ) -> Result<Self, ServerOptionsFromEnvError> {
        let defaults = Self::default();

        let listen_addr = match listen_addr {
            Some(addr) => {
                let listen_addr = addr.parse::<SocketAddr>().map_err(|err| {
                    ServerOptionsFromEnvError::ListenAddr {
                        name: Self::PJAX_DEMO_LISTEN_ADDR,
                        addr: addr.clone(),
                        err,
                    }
                })?;

                tracing::info!(
                    "{} was set: listening on `{listen_addr}`.",
                    Self::PJAX_DEMO_LISTEN_ADDR
                );

                listen_addr
            }
            None => {
                tracing::warn!(
                    "{} was not set: listening on `{}`.",
                    Self::PJAX_DEMO_LISTEN_ADDR,
                    defaults.listen_addr
                );

                defaults.listen_addr
            }
        };

        let pjax_detection = match pjax_detection {
            Some(value) => parse_flag(&value).ok_or_else(|| ServerOptionsFromEnvError::Flag {
                name: Self::PJAX_DEMO_PJAX_DETECTION,
                value: value.clone(),
            })?,
            None => defaults.pjax_detection,
        };

        tracing::info!(
            "Pjax detection is {}.",
            if pjax_detection { "enabled" } else { "disabled" }
        );

        Ok(Self {
            listen_addr,
            pjax_detection,
        })
    }
}
