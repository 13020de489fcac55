//! Structured URI references (RFC 3986 §4.1).
//!
//! [`UriRef`] keeps every component exactly as written so that rendering a
//! parsed reference gives back the original text. The authority is an
//! `Option`: `classpath:/a/b` has none, `classpath://a/b` has `"a"` and
//! `file:///a/b` has an empty one. Resolution treats those three shapes
//! differently, so they are never collapsed.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

use crate::error::{Component, SyntaxErrorKind, UriSyntaxError};

/// A parsed absolute URI or relative reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UriRef {
    pub(crate) scheme: Option<String>,
    pub(crate) authority: Option<String>,
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) fragment: Option<String>,
}

impl UriRef {
    /// Parse `input` as a URI reference.
    ///
    /// ## Errors
    ///
    /// Returns [`UriSyntaxError`] with the byte index of the first character
    /// that is not allowed in its component.
    pub fn parse(input: &str) -> Result<Self, UriSyntaxError> {
        // Appendix B split: scheme ":" "//" authority path "?" query "#" fragment
        let (before_fragment, fragment) = match input.find('#') {
            Some(i) => (&input[..i], Some((i + 1, &input[i + 1..]))),
            None => (input, None),
        };
        let (before_query, query) = match before_fragment.find('?') {
            Some(i) => (&before_fragment[..i], Some((i + 1, &before_fragment[i + 1..]))),
            None => (before_fragment, None),
        };

        let (scheme, hier_start) = match before_query.find([':', '/']) {
            Some(i) if before_query.as_bytes()[i] == b':' => {
                let candidate = &before_query[..i];
                validate_scheme(input, candidate)?;
                (Some(candidate), i + 1)
            }
            _ => (None, 0),
        };
        let hier = &before_query[hier_start..];

        let (authority, path, path_start) = match hier.strip_prefix("//") {
            Some(rest) => {
                let end = rest.find('/').unwrap_or(rest.len());
                let authority_start = hier_start + 2;
                validate_authority(input, &rest[..end], authority_start)?;
                (Some(&rest[..end]), &rest[end..], authority_start + end)
            }
            None => (None, hier, hier_start),
        };

        validate(input, path, path_start, Component::Path, |c| {
            is_pchar(c) || c == '/'
        })?;
        if let Some((start, query)) = query {
            validate(input, query, start, Component::Query, is_query_char)?;
        }
        if let Some((start, fragment)) = fragment {
            validate(input, fragment, start, Component::Fragment, is_query_char)?;
        }

        Ok(Self {
            scheme: scheme.map(str::to_string),
            authority: authority.map(str::to_string),
            path: path.to_string(),
            query: query.map(|(_, q)| q.to_string()),
            fragment: fragment.map(|(_, f)| f.to_string()),
        })
    }

    /// The scheme without its trailing `:`.
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// The authority, if present. `Some("")` for `scheme:///path`.
    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    /// The path, possibly empty.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The query without its leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// The fragment without its leading `#`. `Some("")` for a bare `#`.
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// True when the reference carries its own scheme.
    pub fn is_absolute(&self) -> bool {
        self.scheme.is_some()
    }

    /// True when the reference has a `//` authority, even an empty one.
    pub fn has_authority(&self) -> bool {
        self.authority.is_some()
    }

    /// True for references like `#foo` or `#/definitions/A`.
    pub fn is_fragment_only(&self) -> bool {
        self.scheme.is_none()
            && self.authority.is_none()
            && self.path.is_empty()
            && self.query.is_none()
            && self.fragment.is_some()
    }

    /// True for the empty reference `""`.
    pub fn is_empty(&self) -> bool {
        self.scheme.is_none()
            && self.authority.is_none()
            && self.path.is_empty()
            && self.query.is_none()
            && self.fragment.is_none()
    }

    /// Copy of this reference with the fragment replaced (or removed).
    pub fn with_fragment(&self, fragment: Option<&str>) -> Self {
        Self {
            fragment: fragment.map(str::to_string),
            ..self.clone()
        }
    }

    /// The document part of this reference, i.e. everything before `#`.
    pub fn without_fragment(&self) -> Self {
        self.with_fragment(None)
    }

    /// Convert to a [`Url`]. Fails for relative references.
    pub fn to_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.to_string())
    }
}

impl fmt::Display for UriRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{}:", scheme)?;
        }
        if let Some(authority) = &self.authority {
            write!(f, "//{}", authority)?;
        }
        f.write_str(&self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{}", query)?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}

impl FromStr for UriRef {
    type Err = UriSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&Url> for UriRef {
    type Error = UriSyntaxError;

    fn try_from(url: &Url) -> Result<Self, Self::Error> {
        Self::parse(url.as_str())
    }
}

impl Serialize for UriRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UriRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Character classes (RFC 3986 §2, §3)
// ---------------------------------------------------------------------------

fn is_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

fn is_sub_delim(c: char) -> bool {
    matches!(
        c,
        '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '='
    )
}

fn is_pchar(c: char) -> bool {
    is_unreserved(c) || is_sub_delim(c) || matches!(c, ':' | '@')
}

fn is_query_char(c: char) -> bool {
    is_pchar(c) || matches!(c, '/' | '?')
}

fn is_authority_char(c: char) -> bool {
    is_unreserved(c) || is_sub_delim(c) || matches!(c, ':' | '@' | '[' | ']')
}

fn validate_scheme(input: &str, scheme: &str) -> Result<(), UriSyntaxError> {
    let mut chars = scheme.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() => {}
        _ => return Err(UriSyntaxError::new(input, 0, SyntaxErrorKind::InvalidScheme)),
    }
    for (i, c) in chars {
        if !(c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
            return Err(UriSyntaxError::new(input, i, SyntaxErrorKind::InvalidScheme));
        }
    }
    Ok(())
}

fn validate_authority(input: &str, authority: &str, offset: usize) -> Result<(), UriSyntaxError> {
    validate(input, authority, offset, Component::Authority, is_authority_char)?;

    let host_start = authority.rfind('@').map_or(0, |i| i + 1);
    let host_port = &authority[host_start..];
    let port_search_from = if host_port.starts_with('[') {
        host_port.find(']').map_or(host_port.len(), |i| i + 1)
    } else {
        0
    };
    if let Some(colon) = host_port[port_search_from..].rfind(':') {
        let port_start = port_search_from + colon + 1;
        let port = &host_port[port_start..];
        if let Some(bad) = port.find(|c: char| !c.is_ascii_digit()) {
            let index = offset + host_start + port_start + bad;
            return Err(UriSyntaxError::new(input, index, SyntaxErrorKind::InvalidPort));
        }
    }
    Ok(())
}

/// Check every character of `part` (found at byte `offset` of `input`).
///
/// Non-ASCII characters pass unless they are control or whitespace
/// characters, so IRI-style `$ref` values are accepted.
fn validate(
    input: &str,
    part: &str,
    offset: usize,
    component: Component,
    allowed: fn(char) -> bool,
) -> Result<(), UriSyntaxError> {
    let bytes = part.as_bytes();
    for (i, c) in part.char_indices() {
        let ok = if c == '%' {
            let valid = bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit);
            if !valid {
                return Err(UriSyntaxError::new(
                    input,
                    offset + i,
                    SyntaxErrorKind::InvalidPercentEncoding { component },
                ));
            }
            true
        } else if c.is_ascii() {
            allowed(c)
        } else {
            !c.is_control() && !c.is_whitespace()
        };
        if !ok {
            return Err(UriSyntaxError::new(
                input,
                offset + i,
                SyntaxErrorKind::IllegalCharacter { component, ch: c },
            ));
        }
    }
    Ok(())
}

// ===========================================================================
// Tests
// ===========================================================================
