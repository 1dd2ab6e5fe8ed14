//! Connecting to the hosts of a parsed connection string.
//!
//! Establishing a session is not this crate's job. A [`Connector`] is the
//! seam where callers plug that in; [`HostSetConnector`] is a reference
//! implementation that only checks reachability, one host at a time, in the
//! order the hosts were written.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ConnectError, ConnectResult};
use crate::host::HostSpec;
use crate::input::ConnectionInput;
use crate::uri::{self, ConnectionString};

/// A reachable endpoint for a connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// The host that answered.
    pub host: HostSpec,
    /// The socket address that answered.
    pub peer: SocketAddr,
    /// Database from the connection string.
    pub database: Option<String>,
    /// Replica set from the connection string.
    pub replica_set: Option<String>,
}

/// Turns a parsed connection string into a connection.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connect to one of the hosts in `conn`.
    async fn connect(&self, conn: &ConnectionString) -> ConnectResult<Connection>;
}

/// Opens a transport to a single host.
#[async_trait]
pub trait Dialer: Send + Sync {
    /// Dial `host`, returning the address that answered.
    async fn dial(&self, host: &HostSpec) -> io::Result<SocketAddr>;
}

/// Dials hosts over TCP with a per-host timeout.
#[derive(Debug, Clone, Copy)]
pub struct TcpDialer {
    timeout: Duration,
}

impl TcpDialer {
    /// Create a dialer with the given per-host timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Create a dialer using a client configuration's connect timeout.
    pub fn from_config(config: &ClientConfig) -> Self {
        config
            .connect_timeout
            .map(Self::new)
            .unwrap_or_default()
    }

    /// Get the per-host timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for TcpDialer {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

#[async_trait]
impl Dialer for TcpDialer {
    async fn dial(&self, host: &HostSpec) -> io::Result<SocketAddr> {
        let target = (host.host.as_str(), host.port_or_default());
        let stream = tokio::time::timeout(self.timeout, TcpStream::connect(target))
            .await
            .map_err(|_| {
                io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("timed out after {}ms", self.timeout.as_millis()),
                )
            })??;
        stream.peer_addr()
    }
}

/// Tries every host of a connection string in order.
///
/// The first host that answers wins. When none answers, a connection
/// string naming a replica set fails with
/// [`ConnectError::ReplicaSetConnectFailed`]; any other fails with
/// [`ConnectError::HostUnreachable`].
#[derive(Debug, Clone, Default)]
pub struct HostSetConnector<D: Dialer = TcpDialer> {
    dialer: D,
}

impl<D: Dialer> HostSetConnector<D> {
    /// Create a connector over a dialer.
    pub fn new(dialer: D) -> Self {
        Self { dialer }
    }

    /// Get the dialer.
    pub fn dialer(&self) -> &D {
        &self.dialer
    }
}

#[async_trait]
impl<D: Dialer> Connector for HostSetConnector<D> {
    async fn connect(&self, conn: &ConnectionString) -> ConnectResult<Connection> {
        if conn.is_srv() {
            return Err(ConnectError::config(
                "mongodb+srv:// requires DNS SRV resolution, which this connector does not perform",
            ));
        }

        let mut last_error = None;
        for host in conn.hosts() {
            debug!(host = %host, "Dialing host");
            match self.dialer.dial(host).await {
                Ok(peer) => {
                    info!(host = %host, peer = %peer, "Connected");
                    return Ok(Connection {
                        host: host.clone(),
                        peer,
                        database: conn.database().map(str::to_string),
                        replica_set: conn.replica_set().map(str::to_string),
                    });
                }
                Err(e) => {
                    warn!(host = %host, error = %e, "Host unreachable");
                    last_error = Some(e);
                }
            }
        }

        let hosts = conn.seed_list();
        Err(match conn.replica_set() {
            Some(set) => ConnectError::ReplicaSetConnectFailed {
                set: set.to_string(),
                hosts,
            },
            None => ConnectError::HostUnreachable {
                hosts,
                message: last_error.map(|e| e.to_string()).unwrap_or_default(),
            },
        })
    }
}

/// Parse `input` and connect with `connector`.
pub async fn connect<C>(input: impl Into<ConnectionInput>, connector: &C) -> ConnectResult<Connection>
where
    C: Connector + ?Sized,
{
    let conn = uri::parse(input)?;
    connector.connect(&conn).await
}
