//! Saturi Common Library
//!
//! Shared utilities for configuration, error handling, tracing, listen-address
//! arguments and the HTTP server lifecycle used by the saturi services.

pub mod config;
pub mod error;
pub mod listen;
pub mod server;
pub mod tracing;


pub use config::{Config, RuntimeMode};
pub use error::{ConfigError, Error, ErrorKind};
pub use listen::{ListenAddr, ListenArgs};
pub use server::{HttpServerBuilder, ServerError, shutdown_channel};
