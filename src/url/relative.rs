//! Relative path computation between `/`-separated document paths

use thiserror::Error;

/// Reasons a relative path cannot be computed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelativePathError {
    #[error("path escapes the document root: {0}")]
    EscapesRoot(String),

    #[error("not a server-rooted path: {0}")]
    NotRooted(String),
}

/// Splits a path into normalized segments, resolving `.` and `..`
fn clean_segments(path: &str) -> Result<Vec<&str>, RelativePathError> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(RelativePathError::EscapesRoot(path.to_string()));
                }
            }
            other => segments.push(other),
        }
    }
    Ok(segments)
}

/// Computes the path of `target` relative to the directory `base`
///
/// Both arguments are relative to the same root. Returns `"."` when they are
/// the same location.
///
/// ```
/// use godocset::url::relative_path;
///
/// assert_eq!(relative_path("pkg/foo", "lib/godoc/style.css").unwrap(), "../../lib/godoc/style.css");
/// assert_eq!(relative_path("lib", "lib/godoc/x.js").unwrap(), "godoc/x.js");
/// ```
pub fn relative_path(base: &str, target: &str) -> Result<String, RelativePathError> {
    let base = clean_segments(base)?;
    let target = clean_segments(target)?;

    let common = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::with_capacity(base.len() - common + target.len() - common);
    parts.extend(std::iter::repeat("..").take(base.len() - common));
    parts.extend(&target[common..]);

    if parts.is_empty() {
        Ok(".".to_string())
    } else {
        Ok(parts.join("/"))
    }
}

/// Computes the reference a document in `document_dir` should use for a
/// server-rooted resource such as `/lib/godoc/style.css`
pub fn relative_to_document(document_dir: &str, rooted: &str) -> Result<String, RelativePathError> {
    if rooted.starts_with("//") || !rooted.starts_with('/') {
        return Err(RelativePathError::NotRooted(rooted.to_string()));
    }
    relative_path(document_dir, rooted.trim_start_matches('/'))
}
