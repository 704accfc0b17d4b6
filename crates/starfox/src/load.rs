//! URI opening and streaming collaborators used by [`Engine::load`](crate::Engine::load).
//!
//! Loading is the only asynchronous step: the document is opened, read to a
//! string, and only then handed to the synchronous renderer.

use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use tokio::io::AsyncReadExt;

/// Scheme prefix stripped by [`FileOpener`].
pub const FILE_SCHEME: &str = "file://";

// ── Traits ────────────────────────────────────────────────────────────────

/// An opened markup source.
pub trait MarkupStream {
    fn read_as_string(self) -> impl Future<Output = io::Result<String>>;
}

/// Opens a URI into a [`MarkupStream`].
pub trait UriOpener {
    type Stream: MarkupStream;

    fn open(&self, uri: &str) -> impl Future<Output = io::Result<Self::Stream>>;
}

// ── FileOpener ────────────────────────────────────────────────────────────

/// Opens plain paths and `file://` URIs with `tokio::fs`.
///
/// Relative paths resolve against `root` when one is set.
#[derive(Debug, Clone, Default)]
pub struct FileOpener {
    root: Option<PathBuf>,
}

impl FileOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: Some(root.into()) }
    }

    fn resolve(&self, uri: &str) -> PathBuf {
        let path = Path::new(uri.strip_prefix(FILE_SCHEME).unwrap_or(uri));
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

pub struct FileStream {
    file: tokio::fs::File,
}

impl MarkupStream for FileStream {
    async fn read_as_string(mut self) -> io::Result<String> {
        let mut text = String::new();
        self.file.read_to_string(&mut text).await?;
        Ok(text)
    }
}

impl UriOpener for FileOpener {
    type Stream = FileStream;

    async fn open(&self, uri: &str) -> io::Result<FileStream> {
        let path = self.resolve(uri);
        log::debug!("opening {}", path.display());
        let file = tokio::fs::File::open(&path).await?;
        Ok(FileStream { file })
    }
}

// ── MemoryOpener ──────────────────────────────────────────────────────────

/// Serves documents from memory, e.g. markup embedded with `include_str!`.
#[derive(Debug, Clone, Default)]
pub struct MemoryOpener {
    documents: HashMap<String, String>,
}

impl MemoryOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, uri: impl Into<String>, markup: impl Into<String>) -> Self {
        self.documents.insert(uri.into(), markup.into());
        self
    }
}

pub struct MemoryStream(String);

impl MarkupStream for MemoryStream {
    async fn read_as_string(self) -> io::Result<String> {
        Ok(self.0)
    }
}

impl UriOpener for MemoryOpener {
    type Stream = MemoryStream;

    async fn open(&self, uri: &str) -> io::Result<MemoryStream> {
        self.documents
            .get(uri)
            .cloned()
            .map(MemoryStream)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no document at '{uri}'")))
    }
}
