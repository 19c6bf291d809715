/// Prefix stripped from wildcard filters before matching
const WILDCARD_HOST_PREFIX: &str = "github.com/";

/// Checks if a package name matches any configured filter
///
/// Supports two kinds of filters:
/// 1. Plain: "user/pkg" matches any name containing "user/pkg"
/// 2. Wildcard: "github.com/user/*" has the `github.com/` prefix and the `*`
///    stripped, then matches any name containing "user/"
///
/// An empty filter list matches everything.
///
/// # Examples
///
/// ```
/// use godocset::url::matches_filter;
///
/// assert!(matches_filter("github.com/user/pkg/", &[]));
/// assert!(matches_filter("github.com/user/pkg/", &["user/pkg".to_string()]));
/// assert!(matches_filter("gitlab.com/user/tool/", &["github.com/user/*".to_string()]));
/// assert!(!matches_filter("github.com/other/pkg/", &["user/*".to_string()]));
/// ```
pub fn matches_filter(name: &str, filters: &[String]) -> bool {
    if filters.is_empty() {
        return true;
    }

    filters.iter().any(|filter| {
        if let Some(stem) = filter.strip_suffix('*') {
            let fragment = stem.strip_prefix(WILDCARD_HOST_PREFIX).unwrap_or(stem);
            if name.contains(fragment) {
                return true;
            }
        }
        name.contains(filter.as_str())
    })
}

/// Checks whether a listed package is a third-party one
///
/// Standard library import paths never contain a dot; third-party paths start
/// with a host name. Packages failing this check are left to the official Go
/// docset.
pub fn is_third_party(name: &str) -> bool {
    name.contains('.')
}
