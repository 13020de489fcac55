//! JSON Schema reference resolution.
//!
//! Every schema node has a resolution scope, and every `$ref` / `$id` is
//! resolved against the scope of its enclosing node. [`ReferenceResolver`]
//! computes the absolute URI a reference designates; it never fetches or
//! dereferences anything.
//!
//! There is one structural algorithm, [`ReferenceResolver::resolve_uri`].
//! The textual entry point parses, delegates and renders.

use crate::config::{DotSegments, ResolveOptions};
use crate::error::{ResolveError, UriRole};
use crate::path_utils::{merge_paths, remove_dot_segments, remove_relative_dot_segments};
use crate::uri::UriRef;

/// Resolve `encountered` against a textual parent scope.
///
/// An absent scope returns `encountered` unchanged, making it the new root.
///
/// ```
/// use jsonschema_ref_core::resolve;
/// let resolved = resolve(Some("http://x.y.z/schema/parent.json"), "child.json").unwrap();
/// assert_eq!(resolved, "http://x.y.z/schema/child.json");
/// ```
pub fn resolve(parent_scope: Option<&str>, encountered: &str) -> Result<String, ResolveError> {
    ReferenceResolver::default().resolve(parent_scope, encountered)
}

/// Resolve `encountered` against an already-parsed parent scope.
pub fn resolve_uri(
    parent_scope: Option<&UriRef>,
    encountered: &str,
) -> Result<UriRef, ResolveError> {
    ReferenceResolver::default().resolve_uri(parent_scope, encountered)
}

/// Stateless reference resolver carrying [`ResolveOptions`].
#[derive(Debug, Clone, Default)]
pub struct ReferenceResolver {
    options: ResolveOptions,
}

impl ReferenceResolver {
    /// Create a resolver that applies `options` to every call.
    pub fn new(options: ResolveOptions) -> Self {
        Self { options }
    }

    /// The options this resolver was built with.
    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Textual form of [`resolve_uri`](Self::resolve_uri).
    ///
    /// ## Errors
    ///
    /// A non-absent `parent_scope` that does not parse fails with
    /// [`UriRole::Scope`]; it is never treated as absent. A malformed
    /// `encountered` fails with [`UriRole::Reference`], also when the scope
    /// is absent.
    pub fn resolve(
        &self,
        parent_scope: Option<&str>,
        encountered: &str,
    ) -> Result<String, ResolveError> {
        let Some(scope) = parent_scope else {
            parse_reference(encountered)?;
            return Ok(encountered.to_string());
        };
        let scope = UriRef::parse(scope).map_err(|e| ResolveError::new(UriRole::Scope, e))?;
        Ok(self.resolve_uri(Some(&scope), encountered)?.to_string())
    }

    /// Resolve `encountered` against `parent_scope`.
    ///
    /// Cases, first match wins:
    /// * no parent: the parsed reference (a new root scope);
    /// * fragment-only reference: the parent with its fragment replaced;
    /// * reference with a scheme: the reference verbatim;
    /// * anything else: RFC 3986 §5.2.2 merging against the parent.
    pub fn resolve_uri(
        &self,
        parent_scope: Option<&UriRef>,
        encountered: &str,
    ) -> Result<UriRef, ResolveError> {
        let reference = parse_reference(encountered)?;
        let Some(base) = parent_scope else {
            tracing::trace!(reference = %reference, "no parent scope, reference is the new root");
            return Ok(reference);
        };
        Ok(self.resolve_parsed(base, &reference))
    }

    /// Resolve two already-parsed references. Cannot fail.
    pub fn resolve_parsed(&self, base: &UriRef, reference: &UriRef) -> UriRef {
        if reference.is_fragment_only() {
            tracing::trace!(%base, %reference, "fragment-only reference");
            return base.with_fragment(reference.fragment());
        }
        if reference.is_absolute() {
            tracing::trace!(%base, %reference, "absolute reference replaces scope");
            return reference.clone();
        }

        let (authority, path, query) = if reference.has_authority() {
            (
                reference.authority.clone(),
                self.normalize(&reference.path, false),
                reference.query.clone(),
            )
        } else if reference.path.is_empty() {
            (
                base.authority.clone(),
                base.path.clone(),
                reference.query.clone().or_else(|| base.query.clone()),
            )
        } else if reference.path.starts_with('/') {
            (
                base.authority.clone(),
                self.normalize(&reference.path, false),
                reference.query.clone(),
            )
        } else {
            let merged = merge_paths(base.has_authority(), &base.path, &reference.path);
            let relative = !base.is_absolute() && !base.has_authority() && !merged.starts_with('/');
            (
                base.authority.clone(),
                self.normalize(&merged, relative),
                reference.query.clone(),
            )
        };

        let resolved = UriRef {
            scheme: base.scheme.clone(),
            path: guard_path(base.is_absolute(), authority.is_some(), path),
            authority,
            query,
            fragment: reference.fragment.clone(),
        };
        tracing::trace!(%base, %reference, %resolved, "merged relative reference");
        resolved
    }

    /// `relative` marks a rootless path under a relative base, where `..`
    /// segments with nothing to cancel must survive.
    fn normalize(&self, path: &str, relative: bool) -> String {
        match self.options.dot_segments {
            DotSegments::Remove if relative => remove_relative_dot_segments(path),
            DotSegments::Remove => remove_dot_segments(path),
            DotSegments::Preserve => path.to_string(),
        }
    }
}

fn parse_reference(encountered: &str) -> Result<UriRef, ResolveError> {
    UriRef::parse(encountered).map_err(|e| ResolveError::new(UriRole::Reference, e))
}

/// Keep the rendered result parseable as the same structure.
///
/// Without an authority a path must not start with `//`, or it would be read
/// back as one. Without a scheme either, a `:` in the first segment would be
/// read back as a scheme delimiter.
fn guard_path(has_scheme: bool, has_authority: bool, path: String) -> String {
    if has_authority {
        return path;
    }
    if path.starts_with("//") {
        return format!("/.{}", path);
    }
    let first_segment = path.split('/').next().unwrap_or_default();
    if !has_scheme && first_segment.contains(':') {
        return format!("./{}", path);
    }
    path
}

// ===========================================================================
// Tests
// ===========================================================================
