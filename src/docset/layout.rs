use crate::config::Config;
use crate::docset::plist::render_plist;
use std::io;
use std::path::{Path, PathBuf};

/// Icon written when the user does not supply one
const DEFAULT_ICON: &[u8] = include_bytes!("../../assets/godoc.png");

/// On-disk layout of a `.docset` bundle
///
/// ```text
/// <name>.docset/
///   icon.png
///   Contents/Info.plist
///   Contents/Resources/icon.png
///   Contents/Resources/docSet.dsidx
///   Contents/Resources/Documents/...
/// ```
#[derive(Debug, Clone)]
pub struct DocsetLayout {
    root: PathBuf,
}

impl DocsetLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.docset_root())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn contents_dir(&self) -> PathBuf {
        self.root.join("Contents")
    }

    pub fn resources_dir(&self) -> PathBuf {
        self.contents_dir().join("Resources")
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.resources_dir().join("Documents")
    }

    pub fn plist_path(&self) -> PathBuf {
        self.contents_dir().join("Info.plist")
    }

    pub fn index_path(&self) -> PathBuf {
        self.resources_dir().join("docSet.dsidx")
    }

    pub fn icon_path(&self) -> PathBuf {
        self.resources_dir().join("icon.png")
    }

    /// Resolves a `/`-separated document path below `Documents`
    ///
    /// Paths that would leave the document tree are rejected.
    pub fn document_file(&self, relative: &str) -> io::Result<PathBuf> {
        let mut path = self.documents_dir();
        for segment in relative.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("document path escapes the docset: {}", relative),
                    ))
                }
                other => path.push(other),
            }
        }
        if path == self.documents_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("empty document path: '{}'", relative),
            ));
        }
        Ok(path)
    }

    /// Writes `Contents/Info.plist`
    pub fn write_plist(&self, name: &str) -> io::Result<()> {
        std::fs::create_dir_all(self.contents_dir())?;
        std::fs::write(self.plist_path(), render_plist(name))
    }

    /// Writes the icon, copying `source` or falling back to the bundled one
    ///
    /// The icon goes to `Contents/Resources/icon.png` and to the bundle root.
    pub fn write_icon(&self, source: Option<&Path>) -> io::Result<()> {
        let bytes = match source {
            Some(path) => std::fs::read(path)?,
            None => DEFAULT_ICON.to_vec(),
        };

        std::fs::create_dir_all(self.resources_dir())?;
        std::fs::write(self.icon_path(), &bytes)?;
        std::fs::write(self.root.join("icon.png"), &bytes)
    }

    /// Writes a document below `Documents`, creating parent directories
    pub async fn write_document(&self, relative: &str, contents: &[u8]) -> io::Result<PathBuf> {
        let path = self.document_file(relative)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, contents).await?;
        Ok(path)
    }
}
