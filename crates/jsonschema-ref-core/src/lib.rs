//! Resolve JSON Schema `$ref` / `$id` segments against a resolution scope.
//!
//! A schema graph spread over many documents is stitched into one address
//! space by giving each node a resolution scope and resolving every `$ref`
//! relative to it. This crate only computes the resulting URI; fetching,
//! caching and dereferencing belong to the loader.
//!
//! ```
//! use jsonschema_ref_core::{resolve, resolve_uri, UriRef};
//!
//! assert_eq!(
//!     resolve(Some("classpath:/hello/world.json/"), "definitions/A").unwrap(),
//!     "classpath:/hello/world.json/definitions/A"
//! );
//!
//! let scope: UriRef = "http://x.y.z/root.json".parse().unwrap();
//! let target = resolve_uri(Some(&scope), "#foo").unwrap();
//! assert_eq!(target.to_string(), "http://x.y.z/root.json#foo");
//! ```

pub mod config;
pub mod error;
mod path_utils;
pub mod resolver;
pub mod uri;

pub use config::{DotSegments, ResolveOptions};
pub use error::{ErrorCode, ResolveError, UriRole, UriSyntaxError};
pub use resolver::{resolve, resolve_uri, ReferenceResolver};
pub use uri::UriRef;
