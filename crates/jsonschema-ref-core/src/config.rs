//! Configuration for reference resolution.

use serde::{Deserialize, Serialize};

/// How `.` and `..` segments in merged paths are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DotSegments {
    /// Remove them as RFC 3986 §5.2.4 describes (default).
    #[default]
    Remove,
    /// Keep the merged path textually as-is.
    Preserve,
}

/// Options for reference resolution.
///
/// ## Serialization Format
///
/// Fields are serialized in `kebab-case` (e.g., `dot-segments`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ResolveOptions {
    /// Dot-segment handling for merged and absolute-path references.
    pub dot_segments: DotSegments,
}
