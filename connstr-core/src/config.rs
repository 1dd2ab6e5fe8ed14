//! Client configuration resolved from a connection string.

use std::time::Duration;

use crate::error::{ParseError, ParseResult};
use crate::options::{ReadPreference, WriteConcern};
use crate::uri::ConnectionString;

const DEFAULT_APP_NAME: &str = "connstr";
const DEFAULT_MAX_POOL_SIZE: u32 = 10;
const DEFAULT_MAX_IDLE_TIME: Duration = Duration::from_secs(300);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings a client would use for a connection string.
///
/// Values come from, in increasing precedence: built-in defaults, the
/// connection string's options, and explicit builder calls.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// The parsed connection string.
    pub connection_string: ConnectionString,
    /// Database to use.
    pub database: Option<String>,
    /// Application name (shown in server logs).
    pub app_name: Option<String>,
    /// Required replica set name.
    pub replica_set: Option<String>,
    /// Minimum connection pool size.
    pub min_pool_size: Option<u32>,
    /// Maximum connection pool size.
    pub max_pool_size: Option<u32>,
    /// Maximum idle time for pooled connections.
    pub max_idle_time: Option<Duration>,
    /// Per-host connection timeout.
    pub connect_timeout: Option<Duration>,
    /// Server selection timeout.
    pub server_selection_timeout: Option<Duration>,
    /// Socket timeout.
    pub socket_timeout: Option<Duration>,
    /// Wire compressors, in preference order.
    pub compressors: Option<Vec<String>>,
    /// Whether to use TLS.
    pub tls: Option<bool>,
    /// Read preference.
    pub read_preference: Option<ReadPreference>,
    /// Write concern.
    pub write_concern: Option<WriteConcern>,
    /// Retry writes.
    pub retry_writes: Option<bool>,
    /// Retry reads.
    pub retry_reads: Option<bool>,
    /// Connect to the first host only, skipping discovery.
    pub direct_connection: Option<bool>,
}

impl ClientConfig {
    /// Resolve the configuration for a parsed connection string.
    pub fn from_connection_string(connection_string: ConnectionString) -> ParseResult<Self> {
        let options = connection_string.options();

        Ok(Self {
            database: connection_string.database().map(str::to_string),
            app_name: Some(
                options
                    .app_name()
                    .unwrap_or(DEFAULT_APP_NAME)
                    .to_string(),
            ),
            replica_set: options.replica_set().map(str::to_string),
            min_pool_size: options.min_pool_size()?,
            max_pool_size: options.max_pool_size()?.or(Some(DEFAULT_MAX_POOL_SIZE)),
            max_idle_time: Some(DEFAULT_MAX_IDLE_TIME),
            connect_timeout: options.connect_timeout()?.or(Some(DEFAULT_CONNECT_TIMEOUT)),
            server_selection_timeout: options
                .server_selection_timeout()?
                .or(Some(DEFAULT_SERVER_SELECTION_TIMEOUT)),
            socket_timeout: options.socket_timeout()?,
            compressors: options.compressors()?,
            tls: options.tls()?,
            read_preference: options.read_preference()?.or(Some(ReadPreference::Primary)),
            write_concern: options.write_concern(),
            retry_writes: options.retry_writes()?.or(Some(true)),
            retry_reads: options.retry_reads()?.or(Some(true)),
            direct_connection: options.direct_connection()?,
            connection_string,
        })
    }

    /// Parse a connection string and resolve its configuration.
    pub fn from_uri(uri: &str) -> ParseResult<Self> {
        Self::from_connection_string(ConnectionString::parse(uri)?)
    }

    /// Create a builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    uri: Option<String>,
    database: Option<String>,
    app_name: Option<String>,
    replica_set: Option<String>,
    min_pool_size: Option<u32>,
    max_pool_size: Option<u32>,
    max_idle_time: Option<Duration>,
    connect_timeout: Option<Duration>,
    server_selection_timeout: Option<Duration>,
    socket_timeout: Option<Duration>,
    compressors: Option<Vec<String>>,
    tls: Option<bool>,
    read_preference: Option<ReadPreference>,
    write_concern: Option<WriteConcern>,
    retry_writes: Option<bool>,
    retry_reads: Option<bool>,
    direct_connection: Option<bool>,
}

impl ClientConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connection string.
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Override the database.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Override the application name.
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    /// Override the replica set name.
    pub fn replica_set(mut self, name: impl Into<String>) -> Self {
        self.replica_set = Some(name.into());
        self
    }

    /// Set the minimum pool size.
    pub fn min_pool_size(mut self, size: u32) -> Self {
        self.min_pool_size = Some(size);
        self
    }

    /// Set the maximum pool size.
    pub fn max_pool_size(mut self, size: u32) -> Self {
        self.max_pool_size = Some(size);
        self
    }

    /// Set the maximum idle time.
    pub fn max_idle_time(mut self, duration: Duration) -> Self {
        self.max_idle_time = Some(duration);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = Some(duration);
        self
    }

    /// Set the server selection timeout.
    pub fn server_selection_timeout(mut self, duration: Duration) -> Self {
        self.server_selection_timeout = Some(duration);
        self
    }

    /// Set the socket timeout.
    pub fn socket_timeout(mut self, duration: Duration) -> Self {
        self.socket_timeout = Some(duration);
        self
    }

    /// Set the compressors (snappy, zlib, or zstd).
    pub fn compressors(mut self, compressors: Vec<String>) -> Self {
        self.compressors = Some(compressors);
        self
    }

    /// Enable or disable TLS.
    pub fn tls(mut self, enabled: bool) -> Self {
        self.tls = Some(enabled);
        self
    }

    /// Set the read preference.
    pub fn read_preference(mut self, pref: ReadPreference) -> Self {
        self.read_preference = Some(pref);
        self
    }

    /// Set the write concern.
    pub fn write_concern(mut self, wc: WriteConcern) -> Self {
        self.write_concern = Some(wc);
        self
    }

    /// Enable or disable retry writes.
    pub fn retry_writes(mut self, enabled: bool) -> Self {
        self.retry_writes = Some(enabled);
        self
    }

    /// Enable or disable retry reads.
    pub fn retry_reads(mut self, enabled: bool) -> Self {
        self.retry_reads = Some(enabled);
        self
    }

    /// Enable or disable direct connection.
    pub fn direct_connection(mut self, enabled: bool) -> Self {
        self.direct_connection = Some(enabled);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ParseResult<ClientConfig> {
        let uri = self.uri.ok_or(ParseError::MissingConnectionString)?;
        let mut config = ClientConfig::from_uri(&uri)?;

        if self.database.is_some() {
            config.database = self.database;
        }
        if self.app_name.is_some() {
            config.app_name = self.app_name;
        }
        if self.replica_set.is_some() {
            config.replica_set = self.replica_set;
        }
        config.min_pool_size = self.min_pool_size.or(config.min_pool_size);
        config.max_pool_size = self.max_pool_size.or(config.max_pool_size);
        config.max_idle_time = self.max_idle_time.or(config.max_idle_time);
        config.connect_timeout = self.connect_timeout.or(config.connect_timeout);
        config.server_selection_timeout = self
            .server_selection_timeout
            .or(config.server_selection_timeout);
        config.socket_timeout = self.socket_timeout.or(config.socket_timeout);
        if self.compressors.is_some() {
            config.compressors = self.compressors;
        }
        config.tls = self.tls.or(config.tls);
        config.read_preference = self.read_preference.or(config.read_preference);
        if self.write_concern.is_some() {
            config.write_concern = self.write_concern;
        }
        config.retry_writes = self.retry_writes.or(config.retry_writes);
        config.retry_reads = self.retry_reads.or(config.retry_reads);
        config.direct_connection = self.direct_connection.or(config.direct_connection);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_uri("mongodb://localhost/app").unwrap();
        assert_eq!(config.database.as_deref(), Some("app"));
        assert_eq!(config.app_name.as_deref(), Some("connstr"));
        assert_eq!(config.max_pool_size, Some(10));
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.read_preference, Some(ReadPreference::Primary));
        assert_eq!(config.retry_writes, Some(true));
        assert_eq!(config.replica_set, None);
    }

    #[test]
    fn test_uri_options_override_defaults() {
        let config = ClientConfig::from_uri(
            "mongodb://a,b/app?replicaSet=rs0&maxPoolSize=50&connectTimeoutMS=500\
             &readPreference=nearest&w=2&retryReads=false",
        )
        .unwrap();
        assert_eq!(config.replica_set.as_deref(), Some("rs0"));
        assert_eq!(config.max_pool_size, Some(50));
        assert_eq!(config.connect_timeout, Some(Duration::from_millis(500)));
        assert_eq!(config.read_preference, Some(ReadPreference::Nearest));
        assert_eq!(config.write_concern, Some(WriteConcern::W(2)));
        assert_eq!(config.retry_reads, Some(false));
    }

    #[test]
    fn test_builder_overrides_uri() {
        let config = ClientConfig::builder()
            .uri("mongodb://localhost/app?appName=from-uri&maxPoolSize=5")
            .database("other")
            .app_name("from-builder")
            .connect_timeout(Duration::from_secs(1))
            .build()
            .unwrap();

        assert_eq!(config.database.as_deref(), Some("other"));
        assert_eq!(config.app_name.as_deref(), Some("from-builder"));
        assert_eq!(config.max_pool_size, Some(5));
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_builder_missing_uri() {
        let result = ClientConfig::builder().database("app").build();
        assert!(matches!(result, Err(ParseError::MissingConnectionString)));
    }

    #[test]
    fn test_builder_propagates_parse_errors() {
        let result = ClientConfig::builder().uri("mongodb://:27017/").build();
        assert!(matches!(result, Err(ParseError::EmptyHostComponent { .. })));
    }
}
