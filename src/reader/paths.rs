//! Joining class and method path fragments into document path keys.

use crate::error::{ErrorKind, Result};
use std::collections::HashSet;

/// Join a class base path and a method fragment, normalize the slashes and
/// check that the path-parameter braces are well formed.
pub fn resolve_path(base: Option<&str>, fragment: Option<&str>) -> Result<String> {
    let path = join_paths(base.unwrap_or(""), fragment.unwrap_or(""));
    validate_template(&path)?;
    Ok(path)
}

/// Concatenate fragments with exactly one slash between non-empty segments.
///
/// The result always starts with `/` and never ends with one (except the
/// root path itself). Brace contents are kept verbatim.
pub fn join_paths(base: &str, fragment: &str) -> String {
    let segments: Vec<&str> = base
        .split('/')
        .chain(fragment.split('/'))
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Reject templates whose path-parameter braces cannot be resolved.
pub fn validate_template(path: &str) -> Result<()> {
    let malformed = |reason: String| ErrorKind::MalformedPathExpression {
        path: path.to_string(),
        reason,
    };

    let mut names = HashSet::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, c) in path.char_indices() {
        match c {
            '{' => {
                if depth == 0 {
                    start = idx;
                }
                depth += 1;
            }
            '}' => {
                if depth == 0 {
                    return Err(malformed("unmatched `}`".to_string()));
                }
                depth -= 1;
                if depth > 0 {
                    // closes a brace of the parameter's pattern, e.g. `[0-9]{3}`
                    continue;
                }
                let body = &path[start + 1..idx];
                // `{id:[0-9]+}` declares the parameter `id`
                let name = body.split(':').next().unwrap_or("").trim();
                if name.is_empty() {
                    return Err(malformed("empty path parameter".to_string()));
                }
                if name.contains(['{', '}']) {
                    return Err(malformed("nested `{` in parameter name".to_string()));
                }
                if !names.insert(name.to_string()) {
                    return Err(malformed(format!("path parameter `{}` is declared twice", name)));
                }
            }
            _ => {}
        }
    }

    if depth > 0 {
        return Err(malformed("unclosed `{`".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_paths_normalizes_slashes() {
        assert_eq!(join_paths("/pets/", "/{petId}"), "/pets/{petId}");
        assert_eq!(join_paths("pets", "owners//"), "/pets/owners");
        assert_eq!(join_paths("", ""), "/");
        assert_eq!(join_paths("/", "/"), "/");
        assert_eq!(join_paths("", "status"), "/status");
    }

    #[test]
    fn test_resolve_path_without_fragment() {
        assert_eq!(resolve_path(Some("/pets"), None).unwrap(), "/pets");
        assert_eq!(resolve_path(None, None).unwrap(), "/");
    }

    #[test]
    fn test_validate_template_accepts_regex_parameters() {
        assert!(validate_template("/files/{name:.+}").is_ok());
        assert!(validate_template("/users/{userId}/posts/{postId}").is_ok());
    }

    #[test]
    fn test_validate_template_accepts_quantifier_braces() {
        assert!(validate_template("/codes/{code: [0-9]{3}}").is_ok());
        assert!(validate_template("/v/{major:[0-9]{1,2}}/{minor:[0-9]{1,2}}").is_ok());
        assert_eq!(
            resolve_path(Some("/codes"), Some("/{code: [0-9]{3}}")).unwrap(),
            "/codes/{code: [0-9]{3}}"
        );
    }

    #[test]
    fn test_validate_template_rejects_repeated_pattern_name() {
        let err = validate_template("/a/{id:[0-9]{2}}/b/{id:[a-z]+}").unwrap_err();
        assert!(matches!(
            err,
            ErrorKind::MalformedPathExpression { reason, .. } if reason.contains("`id`")
        ));
        assert!(validate_template("/a/{id:[0-9]{2}").is_err());
    }

    #[test]
    fn test_validate_template_rejects_bad_braces() {
        for bad in ["/a/{id", "/a/id}", "/a/{{id}}", "/a/{}", "/a/{id}/b/{id}"] {
            let err = resolve_path(Some(bad), None).unwrap_err();
            assert!(
                matches!(err, ErrorKind::MalformedPathExpression { .. }),
                "{} should be rejected",
                bad
            );
        }
    }
}
