//! Error types for connection string parsing and connecting.

use thiserror::Error;

/// Result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for connect operations.
pub type ConnectResult<T> = Result<T, ConnectError>;

/// Numeric error codes attached to parse failures.
///
/// Values match the codes a document-database server reports for the same
/// conditions, so callers can match on either the message or the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    /// The input value itself was unusable.
    BadValue = 2,
    /// The low-level tokenizer could not parse the input.
    FailedToParse = 9,
}

impl ErrorCode {
    /// Get the numeric value of this code.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the symbolic name of this code.
    pub fn name(self) -> &'static str {
        match self {
            Self::BadValue => "BadValue",
            Self::FailedToParse => "FailedToParse",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_i32())
    }
}

/// Errors that can occur while parsing a connection string.
///
/// Variants are ordered by the priority in which the parser checks them;
/// exactly one is reported per call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No input was given at all.
    #[error("Missing connection string")]
    MissingConnectionString,

    /// The input was present but was not text.
    #[error("Incorrect type: expected a string, found {found}")]
    IncorrectType {
        /// Name of the type that was supplied.
        found: &'static str,
    },

    /// The input was empty or only whitespace.
    #[error("Empty connection string")]
    EmptyConnectionString,

    /// A `<scheme>://` prefix other than the supported ones.
    #[error("Invalid connection string scheme '{0}': expected mongodb:// or mongodb+srv://")]
    UnsupportedScheme(String),

    /// The string is not shaped like a host list at all.
    #[error("Failed to parse mongodb:// URL: {input}")]
    FailedToParseHost {
        /// The offending input.
        input: String,
    },

    /// The user information before `@` could not be used.
    #[error("Invalid credentials in connection string: {0}")]
    InvalidCredentials(String),

    /// More than one colon in a host token outside IPv6 brackets.
    #[error("More than one ':' detected. If this is an ipv6 address, it needs to be surrounded by '[' and ']': {token}")]
    MultipleColonsInHost {
        /// The offending host token.
        token: String,
    },

    /// A host token, or the whole host list, was empty.
    #[error("Empty host component parsing HostAndPort from \"{token}\"")]
    EmptyHostComponent {
        /// The offending host token.
        token: String,
    },

    /// A colon was present but no port followed it.
    #[error("No digits in port of host \"{token}\"")]
    NoPortDigits {
        /// The offending host token.
        token: String,
    },

    /// The port contained characters other than digits.
    #[error("Port '{port}' is not a valid number")]
    FailedToParsePort {
        /// The offending port text.
        port: String,
    },

    /// The port was numeric but outside 1..=65535.
    #[error("Port number {port} out of range parsing HostAndPort from \"{token}\"")]
    PortOutOfRange {
        /// The port digits as written.
        port: String,
        /// The offending host token.
        token: String,
    },

    /// The database segment contained whitespace or control characters.
    #[error("Invalid database name \"{0}\": whitespace and control characters are not allowed")]
    InvalidDatabaseName(String),

    /// An `mongodb+srv://` string violated the SRV shape rules.
    #[error("Invalid mongodb+srv:// URL: {0}")]
    InvalidSrvUri(String),

    /// An option pair or option value was invalid.
    #[error("Invalid option '{key}': {message}")]
    InvalidOption {
        /// The option key as written.
        key: String,
        /// What was wrong with it.
        message: String,
    },

    /// An environment variable referenced by the string was not set.
    #[error("Environment variable not found: {0}")]
    EnvNotFound(String),

    /// An environment variable reference could not be expanded.
    #[error("Invalid environment variable '{name}': {message}")]
    InvalidEnvValue {
        /// Variable name.
        name: String,
        /// What was wrong with it.
        message: String,
    },
}

impl ParseError {
    /// Create a host-shape error for the given input.
    pub fn bad_host(input: impl Into<String>) -> Self {
        Self::FailedToParseHost {
            input: input.into(),
        }
    }

    /// Create an empty-host error for the given token.
    pub fn empty_host(token: impl Into<String>) -> Self {
        Self::EmptyHostComponent {
            token: token.into(),
        }
    }

    /// Create an invalid option error.
    pub fn invalid_option(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Get the numeric code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingConnectionString
            | Self::IncorrectType { .. }
            | Self::EmptyConnectionString
            | Self::EnvNotFound(_)
            | Self::InvalidEnvValue { .. } => ErrorCode::BadValue,
            _ => ErrorCode::FailedToParse,
        }
    }

    /// Get the stable name of this error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingConnectionString => "MissingConnectionString",
            Self::IncorrectType { .. } => "IncorrectType",
            Self::EmptyConnectionString => "EmptyConnectionString",
            Self::UnsupportedScheme(_) => "UnsupportedScheme",
            Self::FailedToParseHost { .. } => "FailedToParseHost",
            Self::InvalidCredentials(_) => "InvalidCredentials",
            Self::MultipleColonsInHost { .. } => "MultipleColonsInHost",
            Self::EmptyHostComponent { .. } => "EmptyHostComponent",
            Self::NoPortDigits { .. } => "NoPortDigits",
            Self::FailedToParsePort { .. } => "FailedToParsePort",
            Self::PortOutOfRange { .. } => "PortOutOfRange",
            Self::InvalidDatabaseName(_) => "InvalidDatabaseName",
            Self::InvalidSrvUri(_) => "InvalidSrvUri",
            Self::InvalidOption { .. } => "InvalidOption",
            Self::EnvNotFound(_) => "EnvNotFound",
            Self::InvalidEnvValue { .. } => "InvalidEnvValue",
        }
    }

    /// Check if this error was raised before any text was parsed.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MissingConnectionString
                | Self::IncorrectType { .. }
                | Self::EmptyConnectionString
        )
    }

    /// Check if this error concerns a host token.
    pub fn is_host_error(&self) -> bool {
        matches!(
            self,
            Self::FailedToParseHost { .. }
                | Self::MultipleColonsInHost { .. }
                | Self::EmptyHostComponent { .. }
                | Self::NoPortDigits { .. }
                | Self::FailedToParsePort { .. }
                | Self::PortOutOfRange { .. }
        )
    }
}

/// Errors that can occur while connecting to a parsed connection string.
#[derive(Error, Debug)]
pub enum ConnectError {
    /// The connection string did not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Every member of a named replica set was unreachable.
    #[error("connect failed to replica set {set}/{hosts}")]
    ReplicaSetConnectFailed {
        /// Replica set name.
        set: String,
        /// Comma-separated seed list that was tried.
        hosts: String,
    },

    /// No host in a plain host list was reachable.
    #[error("couldn't connect to server {hosts}: {message}")]
    HostUnreachable {
        /// Comma-separated host list that was tried.
        hosts: String,
        /// Last dial failure.
        message: String,
    },

    /// The connector could not be configured.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ConnectError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this error came from parsing.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    /// Check if this is a replica set failure.
    pub fn is_replica_set_failure(&self) -> bool {
        matches!(self, Self::ReplicaSetConnectFailed { .. })
    }

    /// Get the numeric code, if the error came from parsing.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Parse(e) => Some(e.code()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ParseError::MissingConnectionString.code(), ErrorCode::BadValue);
        assert_eq!(
            ParseError::FailedToParsePort {
                port: "cat".into()
            }
            .code()
            .as_i32(),
            9
        );
        assert_eq!(ErrorCode::BadValue.as_i32(), 2);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ParseError::MissingConnectionString.to_string(),
            "Missing connection string"
        );
        assert_eq!(
            ParseError::EmptyConnectionString.to_string(),
            "Empty connection string"
        );
        assert!(
            ParseError::IncorrectType { found: "number" }
                .to_string()
                .starts_with("Incorrect type")
        );

        let err = ParseError::PortOutOfRange {
            port: "65536".into(),
            token: "127.0.0.1:65536".into(),
        };
        assert!(err.to_string().starts_with("Port number 65536 out of range"));

        let err = ParseError::MultipleColonsInHost {
            token: "::1:65536".into(),
        };
        assert!(err.to_string().starts_with("More than one ':' detected."));
    }

    #[test]
    fn test_error_classification() {
        assert!(ParseError::EmptyConnectionString.is_input_error());
        assert!(ParseError::empty_host(":").is_host_error());
        assert!(!ParseError::invalid_option("w", "bad").is_host_error());
        assert_eq!(ParseError::bad_host("/").kind(), "FailedToParseHost");
    }

    #[test]
    fn test_connect_error() {
        let err = ConnectError::ReplicaSetConnectFailed {
            set: "rs0".into(),
            hosts: "a:1,b:2".into(),
        };
        assert!(err.is_replica_set_failure());
        assert!(err.to_string().starts_with("connect failed to replica set"));
        assert_eq!(err.code(), None);

        let err: ConnectError = ParseError::EmptyConnectionString.into();
        assert!(err.is_parse_error());
        assert_eq!(err.to_string(), "Empty connection string");
        assert_eq!(err.code(), Some(ErrorCode::BadValue));
    }
}
