//! Listen-address configuration for HTTP services.
//!
//! # Example
//!
//! ```ignore
//! use saturi_common::listen::ListenArgs;
//! use clap::Parser;
//!
//! #[derive(Parser)]
//! struct Args {
//!     #[command(flatten)]
//!     listen: ListenArgs,
//! }
//!
//! let args = Args::parse();
//! let addr = args.listen.into_addr();
//! ```

use clap::Args;
use std::fmt;

/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 8080;

/// Host and port an HTTP service binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenAddr {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl ListenAddr {
    /// Create a new listen address.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Loopback address on the given port. Port 0 asks the OS for a free port.
    pub fn localhost(port: u16) -> Self {
        Self::new("127.0.0.1", port)
    }

    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenAddr {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl fmt::Display for ListenAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http://{}:{}", self.host, self.port)
    }
}

/// Command-line arguments for the listen address.
#[derive(Args, Debug, Clone)]
pub struct ListenArgs {
    /// Interface to bind (default: 0.0.0.0, or from HOST env var)
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on (default: 8080, or from PORT env var)
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

impl ListenArgs {
    /// Convert command-line arguments into a listen address.
    pub fn into_addr(self) -> ListenAddr {
        ListenAddr::new(self.host, self.port)
    }
}

impl Default for ListenArgs {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}
