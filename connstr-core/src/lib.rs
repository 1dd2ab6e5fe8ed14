//! # connstr-core
//!
//! Parsing and validation of document-database connection strings.
//!
//! This crate provides:
//! - A parser for `mongodb://` and `mongodb+srv://` URIs and the scheme-less
//!   legacy `host[:port][,host[:port]...][/database]` form
//! - A classified error for every way a connection string can be malformed
//! - Case-insensitive option maps with typed accessors
//! - Client configuration resolved from URI options
//! - Environment variable expansion
//! - A pluggable [`Connector`] for reaching the parsed hosts
//!
//! ## Example
//!
//! ```rust
//! use connstr_core::{ConnectionString, ParseError};
//!
//! let conn = ConnectionString::parse("mongodb://db1:27017,db2:27017/app?replicaSet=rs0").unwrap();
//! assert_eq!(conn.hosts().len(), 2);
//! assert_eq!(conn.replica_set(), Some("rs0"));
//!
//! let err = ConnectionString::parse("mongodb://localhost:/test").unwrap_err();
//! assert!(matches!(err, ParseError::NoPortDigits { .. }));
//! assert!(err.to_string().starts_with("No digits"));
//! ```
//!
//! ## Untyped input
//!
//! Values from dynamically typed sources go through [`parse`], which
//! distinguishes a missing value from a value of the wrong type:
//!
//! ```rust
//! use connstr_core::{ParseError, parse};
//! use serde_json::Value;
//!
//! let value: Option<&Value> = None;
//! assert_eq!(parse(value).unwrap_err(), ParseError::MissingConnectionString);
//! assert!(parse(&Value::Null).unwrap_err().to_string().starts_with("Incorrect type"));
//! ```

pub mod config;
pub mod connect;
pub mod encoding;
pub mod env;
pub mod error;
pub mod host;
pub mod input;
pub mod logging;
pub mod options;
pub mod uri;

pub use config::{ClientConfig, ClientConfigBuilder};
pub use connect::{Connection, Connector, Dialer, HostSetConnector, TcpDialer, connect};
pub use env::{EnvExpander, EnvSource, MapEnvSource, StdEnvSource};
pub use error::{ConnectError, ConnectResult, ErrorCode, ParseError, ParseResult};
pub use host::{DEFAULT_PORT, HostSpec};
pub use input::ConnectionInput;
pub use options::{ReadPreference, UriOptions, WriteConcern};
pub use uri::{ConnectionString, Credentials, DEFAULT_ENV_VAR, ParsedUri, Scheme, parse};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{ClientConfig, ClientConfigBuilder};
    pub use crate::connect::{Connector, HostSetConnector, TcpDialer, connect};
    pub use crate::error::{ConnectError, ErrorCode, ParseError, ParseResult};
    pub use crate::host::HostSpec;
    pub use crate::uri::{ConnectionString, parse};
}
