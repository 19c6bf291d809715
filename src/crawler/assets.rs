//! Recursive mirroring of the server's static asset tree
//!
//! The asset root (`lib/godoc/` by default) is served as plain directory
//! listings. Stylesheets and scripts are copied verbatim; subdirectories are
//! walked concurrently, one task per entry, joined at each level.

use crate::crawler::fetcher::{fetch_bytes, fetch_page};
use crate::crawler::parser::parse_directory_listing;
use crate::docset::DocsetLayout;
use crate::url::ServerRoot;
use futures::future::{BoxFuture, FutureExt};
use reqwest::Client;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Files copied and rows that failed during a mirror run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorReport {
    pub files: usize,
    pub failures: usize,
}

impl MirrorReport {
    fn merge(&mut self, other: MirrorReport) {
        self.files += other.files;
        self.failures += other.failures;
    }

    fn failure() -> Self {
        Self {
            files: 0,
            failures: 1,
        }
    }
}

/// Returns true for hrefs mirrored as files rather than walked
fn is_asset_leaf(href: &str) -> bool {
    href.ends_with(".css") || href.ends_with(".js")
}

/// Rejects hrefs that would leave the listed directory
fn is_local_entry(href: &str) -> bool {
    !href.is_empty() && !href.starts_with('/') && !href.contains("..") && !href.contains(':')
}

/// Mirrors the asset tree of one server into a docset
pub struct AssetMirror {
    client: Client,
    root: ServerRoot,
    layout: Arc<DocsetLayout>,
    asset_root: String,
}

impl AssetMirror {
    /// Creates a mirror of `asset_root`, a server-relative directory ending in `/`
    pub fn new(
        client: Client,
        root: ServerRoot,
        layout: Arc<DocsetLayout>,
        asset_root: &str,
    ) -> Arc<Self> {
        let mut asset_root = asset_root.trim_start_matches('/').to_string();
        if !asset_root.ends_with('/') {
            asset_root.push('/');
        }
        Arc::new(Self {
            client,
            root,
            layout,
            asset_root,
        })
    }

    /// Walks the whole tree; never fails, failures are counted and logged
    pub async fn run(self: Arc<Self>) -> MirrorReport {
        let start = self.asset_root.clone();
        tracing::info!("Mirroring assets under /{}", start);
        let report = self.walk(start).await;
        tracing::info!(
            "Mirrored {} asset files ({} failures)",
            report.files,
            report.failures
        );
        report
    }

    /// Mirrors one directory listing, `dir` being server-relative with a trailing `/`
    fn walk(self: Arc<Self>, dir: String) -> BoxFuture<'static, MirrorReport> {
        async move {
            let html = match self.root.join(&dir) {
                Ok(url) => match fetch_page(&self.client, &url).await {
                    Ok(html) => html,
                    Err(e) => {
                        tracing::warn!("Skipping asset directory {}: {}", dir, e);
                        return MirrorReport::failure();
                    }
                },
                Err(e) => {
                    tracing::warn!("Skipping asset directory {}: {}", dir, e);
                    return MirrorReport::failure();
                }
            };

            let mut tasks = JoinSet::new();
            for href in parse_directory_listing(&html) {
                if !is_local_entry(&href) {
                    tracing::debug!("Ignoring listing entry {} in {}", href, dir);
                    continue;
                }
                let path = format!("{}{}", dir, href);
                if is_asset_leaf(&href) {
                    tasks.spawn(self.clone().copy_leaf(path));
                } else if href.ends_with('/') {
                    tasks.spawn(self.clone().walk(path));
                } else {
                    tracing::debug!("Ignoring non-asset file {}", path);
                }
            }

            let mut report = MirrorReport::default();
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(sub) => report.merge(sub),
                    Err(e) => {
                        tracing::error!("Asset task in {} failed to complete: {}", dir, e);
                        report.merge(MirrorReport::failure());
                    }
                }
            }
            report
        }
        .boxed()
    }

    async fn copy_leaf(self: Arc<Self>, path: String) -> MirrorReport {
        let url = match self.root.join(&path) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Skipping asset {}: {}", path, e);
                return MirrorReport::failure();
            }
        };

        let bytes = match fetch_bytes(&self.client, &url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Skipping asset {}: {}", path, e);
                return MirrorReport::failure();
            }
        };

        match self.layout.write_document(&path, &bytes).await {
            Ok(written) => {
                tracing::debug!("Mirrored {} to {}", url, written.display());
                MirrorReport {
                    files: 1,
                    failures: 0,
                }
            }
            Err(e) => {
                tracing::warn!("Failed to write asset {}: {}", path, e);
                MirrorReport::failure()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::build_http_client;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn listing(entries: &[&str]) -> String {
        let mut rows = String::from(r#"<tr><td><a href="..">..</a></td></tr>"#);
        for entry in entries {
            rows.push_str(&format!(
                r#"<tr><td><a href="{0}">{0}</a></td><td>100</td></tr>"#,
                entry
            ));
        }
        format!("<html><body><table><tbody>{}</tbody></table></body></html>", rows)
    }

    async fn serve(server: &MockServer, at: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    #[test]
    fn test_leaf_classification() {
        assert!(is_asset_leaf("style.css"));
        assert!(is_asset_leaf("jquery.js"));
        assert!(!is_asset_leaf("images/"));
        assert!(!is_asset_leaf("logo.png"));
    }

    #[test]
    fn test_local_entries() {
        assert!(is_local_entry("style.css"));
        assert!(is_local_entry("images/"));
        assert!(!is_local_entry("../"));
        assert!(!is_local_entry("/etc/passwd"));
        assert!(!is_local_entry("http://elsewhere/x.js"));
        assert!(!is_local_entry(""));
    }

    #[tokio::test]
    async fn test_mirrors_tree() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/lib/godoc/",
            200,
            &listing(&["style.css", "godocs.js", "images/", "README"]),
        )
        .await;
        serve(&server, "/lib/godoc/style.css", 200, "body { margin: 0 }").await;
        serve(&server, "/lib/godoc/godocs.js", 200, "var x = 1;").await;
        serve(&server, "/lib/godoc/images/", 200, &listing(&["nested/"])).await;
        serve(&server, "/lib/godoc/images/nested/", 200, &listing(&["deep.js"])).await;
        serve(&server, "/lib/godoc/images/nested/deep.js", 200, "deep();").await;

        let dir = TempDir::new().unwrap();
        let layout = Arc::new(DocsetLayout::new(dir.path().join("Test.docset")));
        let root = ServerRoot::parse(&server.uri()).unwrap();
        let mirror = AssetMirror::new(build_http_client().unwrap(), root, layout.clone(), "lib/godoc/");

        let report = mirror.run().await;
        assert_eq!(report, MirrorReport { files: 3, failures: 0 });

        let read = |rel: &str| std::fs::read_to_string(layout.document_file(rel).unwrap()).unwrap();
        assert_eq!(read("lib/godoc/style.css"), "body { margin: 0 }");
        assert_eq!(read("lib/godoc/godocs.js"), "var x = 1;");
        assert_eq!(read("lib/godoc/images/nested/deep.js"), "deep();");
        assert!(!layout.document_file("lib/godoc/README").unwrap().exists());
    }

    #[tokio::test]
    async fn test_failed_rows_do_not_stop_siblings() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/lib/godoc/",
            200,
            &listing(&["missing.css", "ok.js", "gone/"]),
        )
        .await;
        serve(&server, "/lib/godoc/missing.css", 404, "").await;
        serve(&server, "/lib/godoc/ok.js", 200, "ok();").await;
        serve(&server, "/lib/godoc/gone/", 500, "").await;

        let dir = TempDir::new().unwrap();
        let layout = Arc::new(DocsetLayout::new(dir.path().join("Test.docset")));
        let root = ServerRoot::parse(&server.uri()).unwrap();
        let mirror = AssetMirror::new(build_http_client().unwrap(), root, layout.clone(), "/lib/godoc");

        let report = mirror.run().await;
        assert_eq!(report, MirrorReport { files: 1, failures: 2 });
        assert!(layout.document_file("lib/godoc/ok.js").unwrap().exists());
    }

    #[tokio::test]
    async fn test_unreachable_root_is_counted() {
        let server = MockServer::start().await;
        serve(&server, "/lib/godoc/", 404, "").await;

        let dir = TempDir::new().unwrap();
        let root = ServerRoot::parse(&server.uri()).unwrap();
        let mirror = AssetMirror::new(
            build_http_client().unwrap(),
            root,
            Arc::new(DocsetLayout::new(dir.path())),
            "lib/godoc/",
        );

        assert_eq!(mirror.run().await, MirrorReport { files: 0, failures: 1 });
    }
}
