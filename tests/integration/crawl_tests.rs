//! Integration tests for the docset pipeline
//!
//! These tests use wiremock to stand in for a godoc server and run the full
//! discover, crawl, mirror, commit cycle end-to-end into temporary directories.

use godocset::config::Config;
use godocset::state::PackageError;
use godocset::storage::SearchIndex;
use godocset::url::ServerRoot;
use godocset::{Pipeline, SymbolEntry, SymbolKind};
use std::collections::BTreeMap;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING: &str = r#"<html><body>
<div class="pkg-dir">
  <table>
    <tr><th class="pkg-name">Name</th><th class="pkg-synopsis">Synopsis</th></tr>
    <tr><td class="pkg-name"><a href="fmt/">fmt</a></td><td>Formatted I/O</td></tr>
    <tr><td class="pkg-name"><a href="github.com/acme/widget/">widget</a></td><td></td></tr>
    <tr><td class="pkg-name"><a href="github.com/acme/tools/">tools</a></td><td></td></tr>
    <tr><td class="pkg-name"><a href="github.com/acme/broken/">broken</a></td><td></td></tr>
    <tr><td class="pkg-name"><a href="github.com/other/thing/">thing</a></td><td></td></tr>
  </table>
</div>
</body></html>"#;

const WIDGET_PAGE: &str = r##"<html><head>
<link type="text/css" rel="stylesheet" href="/lib/godoc/style.css">
<script src="/lib/godoc/jquery.js" defer></script>
</head><body>
<h1>Package widget</h1>
<h2 id="pkg-overview">Overview</h2>
<h2 id="pkg-constants">Constants</h2>
<pre>const (
    <span id="Small">Small</span> = 1
    <span id="Large">Large</span> = 2
)</pre>
<h2 id="pkg-variables">Variables</h2>
<pre>var <span id="ErrJammed">ErrJammed</span> = errors.New("jammed")</pre>
<h2 id="Spin">func <a href="#">Spin</a></h2>
<h2 id="Spin">func <a href="#">Spin</a></h2>
<h2 id="Widget">type <a href="#">Widget</a></h2>
<pre>type Widget struct {
    <span id="Widget.Size"></span>Size int
}</pre>
<h3 id="NewWidget">func <a href="#">NewWidget</a></h3>
<h3 id="Widget.Turn">func (w *Widget) <a href="#">Turn</a></h3>
</body></html>"##;

const THING_PAGE: &str = r##"<html><body>
<h1>Package thing</h1>
<h2 id="Do">func <a href="#">Do</a></h2>
</body></html>"##;

const TOOLS_DIRECTORY: &str =
    r#"<html><body><h1>Directory /src/github.com/acme/tools</h1></body></html>"#;

const ASSET_LISTING: &str = r#"<html><body><table><tbody>
<tr><td><a href="..">..</a></td></tr>
<tr><td><a href="style.css">style.css</a></td><td>22</td></tr>
<tr><td><a href="jquery.js">jquery.js</a></td><td>14</td></tr>
<tr><td><a href="images/">images/</a></td><td></td></tr>
</tbody></table></body></html>"#;

const IMAGES_LISTING: &str = r#"<html><body><table><tbody>
<tr><td><a href="..">..</a></td></tr>
<tr><td><a href="treeview.css">treeview.css</a></td><td>9</td></tr>
<tr><td><a href="logo.png">logo.png</a></td><td>512</td></tr>
</tbody></table></body></html>"#;

async fn serve(server: &MockServer, at: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Starts a mock godoc server with every page the tests need
async fn start_godoc() -> MockServer {
    let server = MockServer::start().await;
    serve(&server, "/pkg/", 200, LISTING).await;
    serve(&server, "/pkg/github.com/acme/widget/", 200, WIDGET_PAGE).await;
    serve(&server, "/pkg/github.com/acme/tools/", 200, TOOLS_DIRECTORY).await;
    serve(&server, "/pkg/github.com/acme/broken/", 500, "internal error").await;
    serve(&server, "/pkg/github.com/other/thing/", 200, THING_PAGE).await;
    serve(&server, "/lib/godoc/", 200, ASSET_LISTING).await;
    serve(&server, "/lib/godoc/style.css", 200, "body { color: black }").await;
    serve(&server, "/lib/godoc/jquery.js", 200, "window.$ = {};").await;
    serve(&server, "/lib/godoc/images/", 200, IMAGES_LISTING).await;
    serve(&server, "/lib/godoc/images/treeview.css", 200, ".tree {}").await;
    server
}

/// Creates a test configuration writing into `output`
fn create_test_config(output: &Path, filters: &[&str]) -> Config {
    let mut config = Config::default();
    config.options.silent = true;
    config.docset.name = "GoDoc".to_string();
    config.docset.output = Some(output.display().to_string());
    config.docset.filters = filters.iter().map(|f| f.to_string()).collect();
    config.crawl.retry_delay_ms = 10; // Very short for testing
    config
}

fn root_of(server: &MockServer) -> ServerRoot {
    ServerRoot::parse(&server.uri()).expect("Failed to parse mock server root")
}

/// Every file below `dir`, keyed by its relative path
fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    fn walk(base: &Path, dir: &Path, files: &mut BTreeMap<String, Vec<u8>>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(base, &path, files);
            } else {
                let relative = path.strip_prefix(base).unwrap().display().to_string();
                files.insert(relative, std::fs::read(&path).unwrap());
            }
        }
    }

    let mut files = BTreeMap::new();
    walk(dir, dir, &mut files);
    files
}

fn entries_for(index: &SearchIndex, document: &str) -> Vec<SymbolEntry> {
    index
        .entries()
        .unwrap()
        .into_iter()
        .filter(|e| e.path.starts_with(document))
        .collect()
}

#[tokio::test]
async fn test_full_pipeline() {
    let server = start_godoc().await;
    let dir = TempDir::new().unwrap();

    let pipeline = Pipeline::new(create_test_config(dir.path(), &[])).unwrap();
    let report = pipeline.run(&root_of(&server)).await.unwrap();

    // fmt is standard library and never considered
    assert_eq!(report.discovered, 4);
    assert_eq!(report.indexed, 2);
    assert_eq!(report.not_a_package, 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].name, "github.com/acme/broken");

    let layout = pipeline.layout();
    assert!(layout.plist_path().exists());
    assert!(layout.icon_path().exists());
    assert!(layout.root().join("icon.png").exists());

    let widget = std::fs::read_to_string(
        layout
            .document_file("pkg/github.com/acme/widget/index.html")
            .unwrap(),
    )
    .unwrap();
    assert!(widget.contains(r#"href="../../../../lib/godoc/style.css""#));
    assert!(widget.contains(r#"src="../../../../lib/godoc/jquery.js""#));

    let index = SearchIndex::open(&layout.index_path()).unwrap();
    let doc = "pkg/github.com/acme/widget/index.html";
    let entries = entries_for(&index, doc);
    let expected = [
        ("github.com/acme/widget", SymbolKind::Package, doc.to_string()),
        ("Small", SymbolKind::Constant, format!("{}#Small", doc)),
        ("Large", SymbolKind::Constant, format!("{}#Large", doc)),
        ("ErrJammed", SymbolKind::Variable, format!("{}#ErrJammed", doc)),
        ("Spin", SymbolKind::Function, format!("{}#Spin", doc)),
        ("Widget", SymbolKind::Type, format!("{}#Widget", doc)),
        ("NewWidget", SymbolKind::Function, format!("{}#NewWidget", doc)),
        ("Widget.Turn", SymbolKind::Method, format!("{}#Widget.Turn", doc)),
    ];
    for (name, kind, path) in &expected {
        assert!(
            entries
                .iter()
                .any(|e| e.name == *name && e.kind == *kind && e.path == *path),
            "missing {} {:?}",
            name,
            kind
        );
    }
    assert_eq!(entries.len(), expected.len());
    assert_eq!(report.total_entries, index.count_entries().unwrap());
}

#[tokio::test]
async fn test_duplicate_symbols_are_indexed_once() {
    let server = start_godoc().await;
    let dir = TempDir::new().unwrap();

    let pipeline = Pipeline::new(create_test_config(dir.path(), &["acme/widget"])).unwrap();
    pipeline.run(&root_of(&server)).await.unwrap();

    // the widget page documents Spin twice
    let index = SearchIndex::open(&pipeline.layout().index_path()).unwrap();
    let spins = index
        .entries()
        .unwrap()
        .into_iter()
        .filter(|e| e.name == "Spin")
        .count();
    assert_eq!(spins, 1);
}

#[tokio::test]
async fn test_filters_exclude_packages() {
    let server = start_godoc().await;
    let dir = TempDir::new().unwrap();

    let pipeline = Pipeline::new(create_test_config(dir.path(), &["github.com/other/*"])).unwrap();
    let report = pipeline.run(&root_of(&server)).await.unwrap();

    assert_eq!(report.discovered, 1);
    assert_eq!(report.indexed, 1);

    let layout = pipeline.layout();
    assert!(layout
        .document_file("pkg/github.com/other/thing/index.html")
        .unwrap()
        .exists());
    assert!(!layout
        .document_file("pkg/github.com/acme/widget/index.html")
        .unwrap()
        .exists());

    let index = SearchIndex::open(&layout.index_path()).unwrap();
    assert!(index
        .entries()
        .unwrap()
        .iter()
        .all(|e| e.path.starts_with("pkg/github.com/other/thing/")));
    assert!(entries_for(&index, "pkg/github.com/acme/").is_empty());
}

#[tokio::test]
async fn test_directory_page_is_a_benign_skip() {
    let server = start_godoc().await;
    let dir = TempDir::new().unwrap();

    let pipeline = Pipeline::new(create_test_config(dir.path(), &["acme/tools"])).unwrap();
    let report = pipeline.run(&root_of(&server)).await.unwrap();

    assert_eq!(report.not_a_package, 1);
    assert!(report.failed.is_empty());

    // fetched once, never retried
    let tools_requests = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/pkg/github.com/acme/tools/")
        .count();
    assert_eq!(tools_requests, 1);
    assert!(!pipeline
        .layout()
        .document_file("pkg/github.com/acme/tools/index.html")
        .unwrap()
        .exists());
}

#[tokio::test]
async fn test_failing_package_is_retried_and_reported() {
    let server = start_godoc().await;
    let dir = TempDir::new().unwrap();

    let pipeline = Pipeline::new(create_test_config(dir.path(), &["acme/broken"])).unwrap();
    let report = pipeline.run(&root_of(&server)).await.unwrap();

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].attempts, 5);
    assert_eq!(report.failed[0].error, Some(PackageError::Status(500)));

    let broken_requests = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/pkg/github.com/acme/broken/")
        .count();
    assert_eq!(broken_requests, 5);

    let index = SearchIndex::open(&pipeline.layout().index_path()).unwrap();
    assert_eq!(index.count_entries().unwrap(), 0);
}

#[tokio::test]
async fn test_assets_are_mirrored() {
    let server = start_godoc().await;
    let dir = TempDir::new().unwrap();

    let pipeline = Pipeline::new(create_test_config(dir.path(), &["acme/widget"])).unwrap();
    let report = pipeline.run(&root_of(&server)).await.unwrap();

    assert_eq!(report.assets.files, 3);
    assert_eq!(report.assets.failures, 0);

    let layout = pipeline.layout();
    let read = |rel: &str| std::fs::read_to_string(layout.document_file(rel).unwrap()).unwrap();
    assert_eq!(read("lib/godoc/style.css"), "body { color: black }");
    assert_eq!(read("lib/godoc/jquery.js"), "window.$ = {};");
    assert_eq!(read("lib/godoc/images/treeview.css"), ".tree {}");
    assert!(!layout
        .document_file("lib/godoc/images/logo.png")
        .unwrap()
        .exists());
}

#[tokio::test]
async fn test_rerun_produces_identical_docset() {
    let server = start_godoc().await;
    let dir = TempDir::new().unwrap();
    let root = root_of(&server);

    let first = Pipeline::new(create_test_config(dir.path(), &[])).unwrap();
    let first_report = first.run(&root).await.unwrap();
    let documents = first.layout().documents_dir();
    let first_tree = snapshot(&documents);
    let first_entries = SearchIndex::open(&first.layout().index_path())
        .unwrap()
        .entries()
        .unwrap();

    let second = Pipeline::new(create_test_config(dir.path(), &[])).unwrap();
    let second_report = second.run(&root).await.unwrap();
    let second_entries = SearchIndex::open(&second.layout().index_path())
        .unwrap()
        .entries()
        .unwrap();

    assert!(!first_report.index_digest.is_empty());
    assert_eq!(first_report.index_digest, second_report.index_digest);
    assert_eq!(first_entries, second_entries);
    assert_eq!(first_tree, snapshot(&documents));
}
