//! HTTP server configuration object and helpers.

use std::env;
use std::net::SocketAddr;

/// Listener configuration for the HTTP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    bind_addr: SocketAddr,
}

const DEFAULT_PORT: u16 = 8080;

impl ServerConfig {
    /// Construct a configuration binding the given address.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self { bind_addr }
    }

    /// Read configuration from the environment.
    ///
    /// `BIND_ADDR` takes a full socket address; otherwise `PORT` selects the
    /// port on all interfaces. Malformed values are fatal rather than
    /// silently replaced.
    pub fn from_env() -> std::io::Result<Self> {
        if let Ok(raw) = env::var("BIND_ADDR") {
            let bind_addr = raw
                .parse()
                .map_err(|err| std::io::Error::other(format!("invalid BIND_ADDR {raw}: {err}")))?;
            return Ok(Self::new(bind_addr));
        }

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|err| std::io::Error::other(format!("invalid PORT {raw}: {err}")))?,
            Err(_) => DEFAULT_PORT,
        };
        Ok(Self::new(SocketAddr::from(([0, 0, 0, 0], port))))
    }

    /// Return the socket address the server will bind to.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
