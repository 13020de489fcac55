//! Path merging and dot-segment removal (RFC 3986 §5.2.3, §5.2.4).

/// Merge a relative-path reference with the base path.
///
/// Everything after the last `/` of the base (the base "file name") is
/// dropped and `reference_path` is appended. A base with an authority and an
/// empty path behaves like `/`.
pub(crate) fn merge_paths(base_has_authority: bool, base_path: &str, reference_path: &str) -> String {
    if base_has_authority && base_path.is_empty() {
        return format!("/{}", reference_path);
    }
    match base_path.rfind('/') {
        Some(i) => format!("{}{}", &base_path[..=i], reference_path),
        None => reference_path.to_string(),
    }
}

/// Interpret and remove `.` and `..` segments.
pub(crate) fn remove_dot_segments(path: &str) -> String {
    let mut input = path;
    let mut output = String::with_capacity(path.len());

    while !input.is_empty() {
        if let Some(rest) = input.strip_prefix("../") {
            input = rest;
        } else if let Some(rest) = input.strip_prefix("./") {
            input = rest;
        } else if input.starts_with("/./") {
            input = &input[2..];
        } else if input == "/." {
            input = "/";
        } else if input.starts_with("/../") {
            input = &input[3..];
            pop_last_segment(&mut output);
        } else if input == "/.." {
            input = "/";
            pop_last_segment(&mut output);
        } else if input == "." || input == ".." {
            input = "";
        } else {
            let start = usize::from(input.starts_with('/'));
            let end = input[start..].find('/').map_or(input.len(), |i| i + start);
            output.push_str(&input[..end]);
            input = &input[end..];
        }
    }

    output
}

/// Dot-segment removal for a rootless path resolved against a relative base.
///
/// Unlike [`remove_dot_segments`], a `..` with nothing left to cancel is kept,
/// so `a/../../x` becomes `../x` rather than `x` or `/x`.
pub(crate) fn remove_relative_dot_segments(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    let ends_in_directory = matches!(segments.last(), Some(&"." | &".."));
    let mut stack: Vec<&str> = Vec::with_capacity(segments.len());

    for segment in segments {
        match segment {
            "." => {}
            ".." => match stack.last() {
                Some(&last) if last != ".." => {
                    stack.pop();
                }
                _ => stack.push(".."),
            },
            other => stack.push(other),
        }
    }

    let mut output = stack.join("/");
    if ends_in_directory && !output.is_empty() && !output.ends_with('/') {
        output.push('/');
    }
    if output.is_empty() && !path.is_empty() {
        // An empty path would read back as "the same document".
        output.push_str("./");
    }
    output
}

fn pop_last_segment(output: &mut String) {
    match output.rfind('/') {
        Some(i) => output.truncate(i),
        None => output.clear(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_replaces_file_name() {
        assert_eq!(
            merge_paths(true, "/schema/parent.json", "child.json"),
            "/schema/child.json"
        );
    }

    #[test]
    fn test_merge_appends_to_directory() {
        assert_eq!(merge_paths(true, "/schema/", "child.json"), "/schema/child.json");
        assert_eq!(
            merge_paths(false, "/hello/world.json/", "definitions/A"),
            "/hello/world.json/definitions/A"
        );
    }

    #[test]
    fn test_merge_with_empty_base_path() {
        assert_eq!(merge_paths(true, "", "foo"), "/foo");
        assert_eq!(merge_paths(false, "", "foo"), "foo");
    }

    #[test]
    fn test_merge_with_slashless_base_path() {
        assert_eq!(merge_paths(false, "example:schema", "other"), "other");
    }

    // Examples from RFC 3986 §5.2.4.
    #[test]
    fn test_remove_dot_segments_rfc_examples() {
        assert_eq!(remove_dot_segments("/a/b/c/./../../g"), "/a/g");
        assert_eq!(remove_dot_segments("mid/content=5/../6"), "mid/6");
    }

    #[test]
    fn test_remove_dot_segments_edges() {
        assert_eq!(remove_dot_segments(""), "");
        assert_eq!(remove_dot_segments("/"), "/");
        assert_eq!(remove_dot_segments("/.."), "/");
        assert_eq!(remove_dot_segments("/a/.."), "/");
        assert_eq!(remove_dot_segments("/a/b/."), "/a/b/");
        assert_eq!(remove_dot_segments("../../x"), "x");
        assert_eq!(remove_dot_segments("."), "");
        assert_eq!(remove_dot_segments("/a/b/../../../c"), "/c");
    }

    #[test]
    fn test_relative_dot_segments_keep_unmatched_parents() {
        assert_eq!(remove_relative_dot_segments("../schemas/child.json"), "../schemas/child.json");
        assert_eq!(remove_relative_dot_segments("a/../../x"), "../x");
        assert_eq!(remove_relative_dot_segments("../../a/b/../c"), "../../a/c");
    }

    #[test]
    fn test_relative_dot_segments_edges() {
        assert_eq!(remove_relative_dot_segments("./a"), "a");
        assert_eq!(remove_relative_dot_segments("a/b/."), "a/b/");
        assert_eq!(remove_relative_dot_segments("a/b/"), "a/b/");
        assert_eq!(remove_relative_dot_segments("a/.."), "./");
        assert_eq!(remove_relative_dot_segments("a/../.."), "../");
        assert_eq!(remove_relative_dot_segments(""), "");
    }

    #[test]
    fn test_remove_dot_segments_keeps_dotted_names() {
        assert_eq!(remove_dot_segments("/a/.hidden/..b/c."), "/a/.hidden/..b/c.");
    }
}
