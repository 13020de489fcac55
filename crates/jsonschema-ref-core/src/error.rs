//! Error types for URI parsing and reference resolution.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable, machine-readable error codes.
///
/// Variant names and their serialized `snake_case` strings are part of the
/// public contract and must not change across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorCode {
    /// The parent scope is not a syntactically valid URI reference.
    MalformedScope,
    /// The encountered `$ref` text is not a syntactically valid URI reference.
    MalformedReference,
}

/// URI component in which a syntax error was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Scheme,
    Authority,
    Path,
    Query,
    Fragment,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Component::Scheme => "scheme",
            Component::Authority => "authority",
            Component::Path => "path",
            Component::Query => "query",
            Component::Fragment => "fragment",
        };
        f.write_str(name)
    }
}

/// What exactly was wrong at the reported index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SyntaxErrorKind {
    #[error("Illegal character in scheme name")]
    InvalidScheme,

    #[error("Illegal character {ch:?} in {component}")]
    IllegalCharacter { component: Component, ch: char },

    #[error("Malformed escape pair in {component}")]
    InvalidPercentEncoding { component: Component },

    #[error("Illegal character in port number")]
    InvalidPort,
}

/// A string that does not parse as an RFC 3986 URI reference.
///
/// `index` is the byte offset into `input` where parsing gave up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at index {index}: {input}")]
pub struct UriSyntaxError {
    input: String,
    index: usize,
    kind: SyntaxErrorKind,
}

impl UriSyntaxError {
    pub(crate) fn new(input: &str, index: usize, kind: SyntaxErrorKind) -> Self {
        Self {
            input: input.to_string(),
            index,
            kind,
        }
    }

    /// The text that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Byte offset of the offending character.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> &SyntaxErrorKind {
        &self.kind
    }
}

/// Which argument of a resolve call was malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UriRole {
    /// The parent resolution scope.
    Scope,
    /// The encountered `$ref` / `$id` segment.
    Reference,
}

impl fmt::Display for UriRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UriRole::Scope => f.write_str("resolution scope"),
            UriRole::Reference => f.write_str("reference"),
        }
    }
}

/// Failure to resolve a reference against a scope.
///
/// The underlying [`UriSyntaxError`] is always attached as the error source.
#[derive(Debug, Clone, Error)]
#[error("Malformed {role} {input:?}")]
pub struct ResolveError {
    role: UriRole,
    input: String,
    #[source]
    source: UriSyntaxError,
}

impl ResolveError {
    pub(crate) fn new(role: UriRole, source: UriSyntaxError) -> Self {
        Self {
            role,
            input: source.input().to_string(),
            source,
        }
    }

    /// Which input was malformed.
    pub fn role(&self) -> UriRole {
        self.role
    }

    /// The malformed text as it was passed in.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn syntax_error(&self) -> &UriSyntaxError {
        &self.source
    }

    /// Returns the stable error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self.role {
            UriRole::Scope => ErrorCode::MalformedScope,
            UriRole::Reference => ErrorCode::MalformedReference,
        }
    }

    /// Produces a structured JSON error for tooling.
    ///
    /// Format: `{"code": "...", "message": "...", "input": "...", "index": n}`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.error_code(),
            "message": format!("{}: {}", self, self.source),
            "input": self.input,
            "index": self.source.index(),
        })
    }
}

// ===========================================================================
// Tests
// ===========================================================================
