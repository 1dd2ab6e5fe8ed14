//! Environment variable expansion in connection strings.

use std::collections::HashMap;

use crate::error::{ParseError, ParseResult};

/// Where variable values come from.
pub trait EnvSource: Send + Sync {
    /// Look up a variable.
    fn get(&self, name: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// A fixed set of variables.
#[derive(Debug, Clone, Default)]
pub struct MapEnvSource {
    vars: HashMap<String, String>,
}

impl MapEnvSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvSource for MapEnvSource {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Expands variable references.
///
/// Supported forms:
/// - `$VAR`
/// - `${VAR}`
/// - `${VAR:-default}`, used when `VAR` is unset or empty
/// - `${VAR:?message}`, fails with `message` when `VAR` is unset or empty
///
/// A `$` not followed by a name or `{` is kept literally.
#[derive(Debug, Clone)]
pub struct EnvExpander<S: EnvSource = StdEnvSource> {
    source: S,
}

impl EnvExpander<StdEnvSource> {
    /// Create an expander over the process environment.
    pub fn new() -> Self {
        Self {
            source: StdEnvSource,
        }
    }
}

impl Default for EnvExpander<StdEnvSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EnvSource> EnvExpander<S> {
    /// Create an expander over a custom source.
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Get the variable source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Check if a string contains anything to expand.
    pub fn has_variables(input: &str) -> bool {
        input.contains('$')
    }

    /// Expand every variable reference in `input`.
    pub fn expand(&self, input: &str) -> ParseResult<String> {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(dollar) = rest.find('$') {
            out.push_str(&rest[..dollar]);
            let after = &rest[dollar + 1..];

            if let Some(body) = after.strip_prefix('{') {
                let end = body.find('}').ok_or_else(|| ParseError::InvalidEnvValue {
                    name: body.to_string(),
                    message: "unterminated '${'".to_string(),
                })?;
                out.push_str(&self.expand_braced(&body[..end])?);
                rest = &body[end + 1..];
            } else {
                let name_len = after
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(after.len());
                let name = &after[..name_len];
                if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
                    out.push('$');
                    rest = after;
                    continue;
                }
                let value = self
                    .source
                    .get(name)
                    .ok_or_else(|| ParseError::EnvNotFound(name.to_string()))?;
                out.push_str(&value);
                rest = &after[name_len..];
            }
        }

        out.push_str(rest);
        Ok(out)
    }

    fn expand_braced(&self, body: &str) -> ParseResult<String> {
        let (name, modifier) = match body.split_once(':') {
            Some((name, modifier)) => (name, Some(modifier)),
            None => (body, None),
        };
        if name.is_empty() {
            return Err(ParseError::InvalidEnvValue {
                name: String::new(),
                message: "empty variable name".to_string(),
            });
        }

        let value = self.source.get(name).filter(|v| !v.is_empty());
        match (value, modifier) {
            (Some(value), _) => Ok(value),
            (None, Some(m)) if m.starts_with('-') => Ok(m[1..].to_string()),
            (None, Some(m)) if m.starts_with('?') => Err(ParseError::InvalidEnvValue {
                name: name.to_string(),
                message: if m.len() > 1 {
                    m[1..].to_string()
                } else {
                    format!("required variable '{}' is not set", name)
                },
            }),
            (None, _) => Err(ParseError::EnvNotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn expander() -> EnvExpander<MapEnvSource> {
        EnvExpander::with_source(
            MapEnvSource::new()
                .set("HOST", "db.internal")
                .set("PORT", "27018")
                .set("EMPTY", ""),
        )
    }

    #[test]
    fn test_expand_simple_and_braced() {
        assert_eq!(
            expander().expand("mongodb://$HOST:${PORT}/app").unwrap(),
            "mongodb://db.internal:27018/app"
        );
    }

    #[test]
    fn test_expand_default() {
        let e = expander();
        assert_eq!(e.expand("${MISSING:-localhost}").unwrap(), "localhost");
        assert_eq!(e.expand("${EMPTY:-localhost}").unwrap(), "localhost");
        assert_eq!(e.expand("${HOST:-localhost}").unwrap(), "db.internal");
    }

    #[test]
    fn test_expand_required() {
        let err = expander().expand("${MISSING:?set MISSING first}").unwrap_err();
        assert!(err.to_string().contains("set MISSING first"));
    }

    #[test]
    fn test_missing_variable() {
        assert_eq!(
            expander().expand("$NOPE").unwrap_err(),
            ParseError::EnvNotFound("NOPE".to_string())
        );
        assert!(matches!(
            expander().expand("${HOST"),
            Err(ParseError::InvalidEnvValue { .. })
        ));
    }

    #[test]
    fn test_literal_dollar() {
        assert_eq!(expander().expand("cost: $5 $").unwrap(), "cost: $5 $");
        assert!(!EnvExpander::<StdEnvSource>::has_variables("mongodb://localhost"));
    }
}
