//! Host token parsing.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{ParseError, ParseResult};

/// Port used when a host omits one.
pub const DEFAULT_PORT: u16 = 27017;

/// A single `host[:port]` entry of a host list.
///
/// IPv6 literals are stored without their brackets and regain them when
/// displayed. Build one from text with [`FromStr`], which applies the same
/// checks as the connection string parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct HostSpec {
    /// Hostname, IPv4 literal, or IPv6 literal.
    pub host: String,
    /// Explicit port, if one was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl HostSpec {
    /// Create a host without a port.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
        }
    }

    /// Create a host with a port.
    pub fn with_port(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port: Some(port),
        }
    }

    /// Check if the host is an IPv6 literal.
    pub fn is_ipv6(&self) -> bool {
        self.host.contains(':')
    }

    /// Get the port, falling back to [`DEFAULT_PORT`].
    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Get `host:port` with the default port filled in.
    pub fn address(&self) -> String {
        let mut addr = self.display_host();
        addr.push(':');
        addr.push_str(&self.port_or_default().to_string());
        addr
    }

    fn display_host(&self) -> String {
        if self.is_ipv6() {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        }
    }
}

impl fmt::Display for HostSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_host())?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        Ok(())
    }
}

impl FromStr for HostSpec {
    type Err = ParseError;

    fn from_str(s: &str) -> ParseResult<Self> {
        parse_host_token(s)
    }
}

/// Parse a comma-separated host list. The first failing token wins.
pub(crate) fn parse_host_list(list: &str) -> ParseResult<Vec<HostSpec>> {
    list.split(',').map(parse_host_token).collect()
}

/// Parse one `host[:port]` token.
pub(crate) fn parse_host_token(token: &str) -> ParseResult<HostSpec> {
    if let Some(rest) = token.strip_prefix('[') {
        return parse_bracketed(token, rest);
    }

    if token.matches(':').count() > 1 {
        return Err(ParseError::MultipleColonsInHost {
            token: token.to_string(),
        });
    }

    let (host, port_text) = match token.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (token, None),
    };

    if host.is_empty() {
        return Err(ParseError::empty_host(token));
    }
    if !host.chars().all(is_host_char) {
        return Err(ParseError::bad_host(token));
    }

    let port = port_text.map(|p| parse_port(p, token)).transpose()?;
    Ok(HostSpec {
        host: host.to_string(),
        port,
    })
}

// `token` is the whole token, `rest` is everything after the opening bracket.
fn parse_bracketed(token: &str, rest: &str) -> ParseResult<HostSpec> {
    let Some(end) = rest.find(']') else {
        return Err(ParseError::bad_host(token));
    };

    let addr = &rest[..end];
    if !is_ipv6_literal(addr) {
        return Err(ParseError::bad_host(token));
    }

    let port = match &rest[end + 1..] {
        "" => None,
        after => match after.strip_prefix(':') {
            Some(port) => Some(parse_port(port, token)?),
            None => return Err(ParseError::bad_host(token)),
        },
    };

    Ok(HostSpec {
        host: addr.to_string(),
        port,
    })
}

fn parse_port(text: &str, token: &str) -> ParseResult<u16> {
    if text.is_empty() {
        return Err(ParseError::NoPortDigits {
            token: token.to_string(),
        });
    }
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::FailedToParsePort {
            port: text.to_string(),
        });
    }

    // Overflowing digit strings are out of range as well.
    match text.parse::<u32>() {
        Ok(port @ 1..=65535) => Ok(port as u16),
        _ => Err(ParseError::PortOutOfRange {
            port: text.to_string(),
            token: token.to_string(),
        }),
    }
}

// Hex groups, colons and dots, with an optional `%zone` suffix.
fn is_ipv6_literal(addr: &str) -> bool {
    let (ip, zone) = match addr.split_once('%') {
        Some((ip, zone)) => (ip, Some(zone)),
        None => (addr, None),
    };
    !ip.is_empty()
        && ip.chars().all(|c| c.is_ascii_hexdigit() || matches!(c, ':' | '.'))
        && zone.is_none_or(|z| !z.is_empty() && z.chars().all(|c| c.is_ascii_alphanumeric()))
}

fn is_host_char(c: char) -> bool {
    !c.is_whitespace() && !c.is_control() && !matches!(c, '/' | '?' | '#' | '@' | '[' | ']' | '\\')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_host_and_port() {
        let host: HostSpec = "localhost:27017".parse().unwrap();
        assert_eq!(host, HostSpec::with_port("localhost", 27017));

        let host: HostSpec = "db.example.com".parse().unwrap();
        assert_eq!(host.port, None);
        assert_eq!(host.port_or_default(), DEFAULT_PORT);
    }

    #[test]
    fn test_parse_ipv6() {
        let host: HostSpec = "[::1]:27018".parse().unwrap();
        assert_eq!(host.host, "::1");
        assert_eq!(host.port, Some(27018));
        assert!(host.is_ipv6());
        assert_eq!(host.to_string(), "[::1]:27018");

        let host: HostSpec = "[fe80::1%eth0]".parse().unwrap();
        assert_eq!(host.port, None);
        assert_eq!(host.address(), "[fe80::1%eth0]:27017");
    }

    #[test]
    fn test_bad_ipv6() {
        for token in ["[::1", "[]", "[::1]x", "[::1]27017", "[zz::1]"] {
            assert!(
                matches!(token.parse::<HostSpec>(), Err(ParseError::FailedToParseHost { .. })),
                "{token}"
            );
        }
    }

    #[test]
    fn test_multiple_colons() {
        for token in ["::1", "::1:65536", "a:b:c"] {
            assert!(
                matches!(token.parse::<HostSpec>(), Err(ParseError::MultipleColonsInHost { .. })),
                "{token}"
            );
        }
    }

    #[test]
    fn test_empty_host() {
        for token in ["", ":", ":27017"] {
            assert!(
                matches!(token.parse::<HostSpec>(), Err(ParseError::EmptyHostComponent { .. })),
                "{token}"
            );
        }
    }

    #[test]
    fn test_port_errors() {
        assert!(matches!(
            "localhost:".parse::<HostSpec>(),
            Err(ParseError::NoPortDigits { .. })
        ));
        assert!(matches!(
            "localhost:cat".parse::<HostSpec>(),
            Err(ParseError::FailedToParsePort { .. })
        ));
        assert!(matches!(
            "localhost:1cat".parse::<HostSpec>(),
            Err(ParseError::FailedToParsePort { .. })
        ));
        assert!(matches!(
            "localhost:-1".parse::<HostSpec>(),
            Err(ParseError::FailedToParsePort { .. })
        ));
        for port in ["0", "65536", "123456", "99999999999999999999"] {
            let token = format!("localhost:{port}");
            let err = token.parse::<HostSpec>().unwrap_err();
            assert!(matches!(err, ParseError::PortOutOfRange { .. }), "{token}");
            assert!(err.to_string().starts_with(&format!("Port number {port} out of range")));
        }
        assert_eq!(
            "localhost:65535".parse::<HostSpec>().unwrap().port,
            Some(65535)
        );
        assert_eq!("localhost:1".parse::<HostSpec>().unwrap().port, Some(1));
    }

    #[test]
    fn test_serialize_only_through_parser() {
        let host: HostSpec = "[::1]:27018".parse().unwrap();
        let json = serde_json::to_value(&host).unwrap();
        assert_eq!(json, serde_json::json!({ "host": "::1", "port": 27018 }));

        let json = serde_json::to_value(HostSpec::new("db")).unwrap();
        assert!(json.get("port").is_none());
    }

    #[test]
    fn test_host_list() {
        let hosts = parse_host_list("a:1,b,[::1]:3").unwrap();
        assert_eq!(hosts.len(), 3);
        assert_eq!(hosts[1], HostSpec::new("b"));

        assert!(matches!(
            parse_host_list("a:1,,b"),
            Err(ParseError::EmptyHostComponent { .. })
        ));
        assert!(matches!(
            parse_host_list("a b"),
            Err(ParseError::FailedToParseHost { .. })
        ));
    }
}
