//! Connection string options.
//!
//! Options arrive as the `?key=value&key=value` suffix of a URI. Keys are
//! matched case-insensitively and a repeated key replaces the earlier value
//! while keeping its original position.

use std::time::Duration;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::encoding::{percent_decode, percent_encode};
use crate::error::{ParseError, ParseResult};

/// Well-known option keys.
pub mod keys {
    pub const REPLICA_SET: &str = "replicaSet";
    pub const APP_NAME: &str = "appName";
    pub const AUTH_SOURCE: &str = "authSource";
    pub const AUTH_MECHANISM: &str = "authMechanism";
    pub const TLS: &str = "tls";
    pub const SSL: &str = "ssl";
    pub const CONNECT_TIMEOUT_MS: &str = "connectTimeoutMS";
    pub const SERVER_SELECTION_TIMEOUT_MS: &str = "serverSelectionTimeoutMS";
    pub const SOCKET_TIMEOUT_MS: &str = "socketTimeoutMS";
    pub const MIN_POOL_SIZE: &str = "minPoolSize";
    pub const MAX_POOL_SIZE: &str = "maxPoolSize";
    pub const READ_PREFERENCE: &str = "readPreference";
    pub const W: &str = "w";
    pub const RETRY_WRITES: &str = "retryWrites";
    pub const RETRY_READS: &str = "retryReads";
    pub const DIRECT_CONNECTION: &str = "directConnection";
    pub const COMPRESSORS: &str = "compressors";
}

const AUTH_MECHANISMS: &[&str] = &[
    "SCRAM-SHA-1",
    "SCRAM-SHA-256",
    "MONGODB-X509",
    "MONGODB-AWS",
    "MONGODB-OIDC",
    "GSSAPI",
    "PLAIN",
];

const COMPRESSORS: &[&str] = &["snappy", "zlib", "zstd"];

/// Read preference named by the `readPreference` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadPreference {
    /// Read from primary only.
    #[default]
    Primary,
    /// Read from primary, fall back to a secondary.
    PrimaryPreferred,
    /// Read from secondaries only.
    Secondary,
    /// Read from a secondary, fall back to the primary.
    SecondaryPreferred,
    /// Read from the lowest-latency member.
    Nearest,
}

impl ReadPreference {
    /// Parse from the option value (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "primary" => Some(Self::Primary),
            "primarypreferred" => Some(Self::PrimaryPreferred),
            "secondary" => Some(Self::Secondary),
            "secondarypreferred" => Some(Self::SecondaryPreferred),
            "nearest" => Some(Self::Nearest),
            _ => None,
        }
    }

    /// Get the canonical option value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::PrimaryPreferred => "primaryPreferred",
            Self::Secondary => "secondary",
            Self::SecondaryPreferred => "secondaryPreferred",
            Self::Nearest => "nearest",
        }
    }
}

/// Write concern named by the `w` option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteConcern {
    /// Acknowledge from this many nodes.
    W(u32),
    /// Acknowledge from a majority of nodes.
    Majority,
    /// Acknowledge from a tagged set.
    Custom(String),
}

impl WriteConcern {
    /// Parse from the option value.
    pub fn parse(s: &str) -> Self {
        if s == "majority" {
            Self::Majority
        } else if let Ok(n) = s.parse() {
            Self::W(n)
        } else {
            Self::Custom(s.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OptionEntry {
    key: String,
    value: String,
}

/// Ordered, case-insensitive option map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UriOptions {
    entries: IndexMap<String, OptionEntry>,
}

impl UriOptions {
    /// Create an empty option map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `key=value&key=value` query string.
    ///
    /// Empty segments (`a=1&&b=2`, a trailing `&`) are skipped.
    pub fn parse_query(query: &str) -> ParseResult<Self> {
        let mut options = Self::new();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let Some((key, value)) = pair.split_once('=') else {
                return Err(ParseError::invalid_option(pair, "expected key=value"));
            };
            if key.is_empty() {
                return Err(ParseError::invalid_option(pair, "option key is empty"));
            }
            options.insert(percent_decode(key), percent_decode(value));
        }
        Ok(options)
    }

    /// Set an option, replacing any value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.entries.insert(
            key.to_ascii_lowercase(),
            OptionEntry {
                key,
                value: value.into(),
            },
        );
    }

    /// Get an option value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&key.to_ascii_lowercase())
            .map(|e| e.value.as_str())
    }

    /// Check if an option is set.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&key.to_ascii_lowercase())
    }

    /// Remove an option, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries
            .shift_remove(&key.to_ascii_lowercase())
            .map(|e| e.value)
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no options.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs, keys as first written.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|e| (e.key.as_str(), e.value.as_str()))
    }

    /// Render as a query string (without the leading `?`).
    pub fn to_query(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Validate every well-known option.
    pub fn validate(&self) -> ParseResult<()> {
        self.auth_mechanism()?;
        self.tls()?;
        self.connect_timeout()?;
        self.server_selection_timeout()?;
        self.socket_timeout()?;
        self.read_preference()?;
        self.retry_writes()?;
        self.retry_reads()?;
        self.direct_connection()?;
        self.compressors()?;

        if let (Some(min), Some(max)) = (self.min_pool_size()?, self.max_pool_size()?) {
            if max != 0 && min > max {
                return Err(ParseError::invalid_option(
                    keys::MIN_POOL_SIZE,
                    format!("minPoolSize ({}) exceeds maxPoolSize ({})", min, max),
                ));
            }
        }
        Ok(())
    }

    /// Name of the replica set, if one is required.
    pub fn replica_set(&self) -> Option<&str> {
        self.get(keys::REPLICA_SET)
    }

    /// Application name reported to the server.
    pub fn app_name(&self) -> Option<&str> {
        self.get(keys::APP_NAME)
    }

    /// Database used for authentication.
    pub fn auth_source(&self) -> Option<&str> {
        self.get(keys::AUTH_SOURCE)
    }

    /// Authentication mechanism, validated against the known set.
    pub fn auth_mechanism(&self) -> ParseResult<Option<&str>> {
        match self.get(keys::AUTH_MECHANISM) {
            Some(m) if !AUTH_MECHANISMS.contains(&m) => Err(ParseError::invalid_option(
                keys::AUTH_MECHANISM,
                format!("unknown authentication mechanism '{}'", m),
            )),
            other => Ok(other),
        }
    }

    /// TLS flag. `ssl` is an alias; the two must agree when both are set.
    pub fn tls(&self) -> ParseResult<Option<bool>> {
        let tls = self.bool_option(keys::TLS)?;
        let ssl = self.bool_option(keys::SSL)?;
        match (tls, ssl) {
            (Some(a), Some(b)) if a != b => Err(ParseError::invalid_option(
                keys::TLS,
                "tls and ssl must have the same value",
            )),
            (a, b) => Ok(a.or(b)),
        }
    }

    /// Connection timeout.
    pub fn connect_timeout(&self) -> ParseResult<Option<Duration>> {
        self.millis_option(keys::CONNECT_TIMEOUT_MS)
    }

    /// Server selection timeout.
    pub fn server_selection_timeout(&self) -> ParseResult<Option<Duration>> {
        self.millis_option(keys::SERVER_SELECTION_TIMEOUT_MS)
    }

    /// Socket timeout.
    pub fn socket_timeout(&self) -> ParseResult<Option<Duration>> {
        self.millis_option(keys::SOCKET_TIMEOUT_MS)
    }

    /// Minimum pool size.
    pub fn min_pool_size(&self) -> ParseResult<Option<u32>> {
        self.u32_option(keys::MIN_POOL_SIZE)
    }

    /// Maximum pool size. Zero means unbounded.
    pub fn max_pool_size(&self) -> ParseResult<Option<u32>> {
        self.u32_option(keys::MAX_POOL_SIZE)
    }

    /// Read preference.
    pub fn read_preference(&self) -> ParseResult<Option<ReadPreference>> {
        self.get(keys::READ_PREFERENCE)
            .map(|v| {
                ReadPreference::from_str(v).ok_or_else(|| {
                    ParseError::invalid_option(
                        keys::READ_PREFERENCE,
                        format!("unknown read preference '{}'", v),
                    )
                })
            })
            .transpose()
    }

    /// Write concern.
    pub fn write_concern(&self) -> Option<WriteConcern> {
        self.get(keys::W).map(WriteConcern::parse)
    }

    /// Retry writes flag.
    pub fn retry_writes(&self) -> ParseResult<Option<bool>> {
        self.bool_option(keys::RETRY_WRITES)
    }

    /// Retry reads flag.
    pub fn retry_reads(&self) -> ParseResult<Option<bool>> {
        self.bool_option(keys::RETRY_READS)
    }

    /// Direct connection flag.
    pub fn direct_connection(&self) -> ParseResult<Option<bool>> {
        self.bool_option(keys::DIRECT_CONNECTION)
    }

    /// Requested wire compressors, in preference order.
    pub fn compressors(&self) -> ParseResult<Option<Vec<String>>> {
        let Some(value) = self.get(keys::COMPRESSORS) else {
            return Ok(None);
        };
        value
            .split(',')
            .map(|c| {
                let c = c.trim();
                if COMPRESSORS.contains(&c) {
                    Ok(c.to_string())
                } else {
                    Err(ParseError::invalid_option(
                        keys::COMPRESSORS,
                        format!("unsupported compressor '{}'", c),
                    ))
                }
            })
            .collect::<ParseResult<Vec<_>>>()
            .map(Some)
    }

    fn bool_option(&self, key: &str) -> ParseResult<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some("true") => Ok(Some(true)),
            Some("false") => Ok(Some(false)),
            Some(other) => Err(ParseError::invalid_option(
                key,
                format!("expected 'true' or 'false', found '{}'", other),
            )),
        }
    }

    fn u32_option(&self, key: &str) -> ParseResult<Option<u32>> {
        self.get(key)
            .map(|v| {
                v.parse().map_err(|_| {
                    ParseError::invalid_option(
                        key,
                        format!("expected a non-negative integer, found '{}'", v),
                    )
                })
            })
            .transpose()
    }

    fn millis_option(&self, key: &str) -> ParseResult<Option<Duration>> {
        self.get(key)
            .map(|v| {
                v.parse::<u64>().map(Duration::from_millis).map_err(|_| {
                    ParseError::invalid_option(
                        key,
                        format!("expected milliseconds, found '{}'", v),
                    )
                })
            })
            .transpose()
    }
}

impl Serialize for UriOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_query() {
        let options = UriOptions::parse_query("replicaSet=rs0&appName=my%20app&").unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options.replica_set(), Some("rs0"));
        assert_eq!(options.app_name(), Some("my app"));
    }

    #[test]
    fn test_keys_case_insensitive() {
        let options = UriOptions::parse_query("REPLICASET=rs0").unwrap();
        assert_eq!(options.get("replicaSet"), Some("rs0"));
        assert!(options.contains("replicaset"));
        assert_eq!(options.iter().next(), Some(("REPLICASET", "rs0")));
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let options = UriOptions::parse_query("w=1&appName=a&W=majority").unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options.write_concern(), Some(WriteConcern::Majority));
        // Position of the first occurrence is kept.
        assert_eq!(options.to_query(), "W=majority&appName=a");
    }

    #[test]
    fn test_invalid_pairs() {
        assert!(matches!(
            UriOptions::parse_query("replicaSet"),
            Err(ParseError::InvalidOption { .. })
        ));
        assert!(matches!(
            UriOptions::parse_query("=value"),
            Err(ParseError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_typed_options() {
        let options = UriOptions::parse_query(
            "tls=true&connectTimeoutMS=2500&maxPoolSize=50&minPoolSize=5\
             &readPreference=secondaryPreferred&retryWrites=false&compressors=zstd,snappy",
        )
        .unwrap();
        options.validate().unwrap();

        assert_eq!(options.tls().unwrap(), Some(true));
        assert_eq!(
            options.connect_timeout().unwrap(),
            Some(Duration::from_millis(2500))
        );
        assert_eq!(options.max_pool_size().unwrap(), Some(50));
        assert_eq!(
            options.read_preference().unwrap(),
            Some(ReadPreference::SecondaryPreferred)
        );
        assert_eq!(options.retry_writes().unwrap(), Some(false));
        assert_eq!(
            options.compressors().unwrap(),
            Some(vec!["zstd".to_string(), "snappy".to_string()])
        );
    }

    #[test]
    fn test_invalid_typed_options() {
        for query in [
            "tls=yes",
            "tls=true&ssl=false",
            "connectTimeoutMS=-5",
            "readPreference=closest",
            "authMechanism=MAGIC",
            "compressors=lz4",
            "minPoolSize=20&maxPoolSize=10",
        ] {
            let options = UriOptions::parse_query(query).unwrap();
            assert!(
                matches!(options.validate(), Err(ParseError::InvalidOption { .. })),
                "{query}"
            );
        }
    }

    #[test]
    fn test_write_concern() {
        assert_eq!(WriteConcern::parse("majority"), WriteConcern::Majority);
        assert_eq!(WriteConcern::parse("2"), WriteConcern::W(2));
        assert_eq!(
            WriteConcern::parse("dc-east"),
            WriteConcern::Custom("dc-east".into())
        );
    }

    #[test]
    fn test_remove() {
        let mut options = UriOptions::parse_query("a=1&b=2").unwrap();
        assert_eq!(options.remove("A"), Some("1".to_string()));
        assert_eq!(options.to_query(), "b=2");
    }
}
