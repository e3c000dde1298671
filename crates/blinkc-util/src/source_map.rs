//! Registry of loaded source files.
//!
//! The lexer registers the root file and every resolved include here; the
//! resulting [`FileId`]s flow through token spans so diagnostics can name
//! the file a construct came from long after the file's text is gone.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::span::FileId;

/// One loaded source file.
#[derive(Clone, Debug)]
pub struct SourceFile {
    /// Path the file was opened from.
    pub path: PathBuf,
    /// Full file contents.
    pub src: Arc<str>,
}

/// All files touched by one compiler invocation.
#[derive(Debug, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Registers a file and returns its id.
    pub fn add_file(&mut self, path: PathBuf, src: String) -> FileId {
        let id = FileId::new(self.files.len() as u32);
        self.files.push(SourceFile {
            path,
            src: src.into(),
        });
        id
    }

    /// Returns the file registered under `id`, if any.
    pub fn get(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.index())
    }

    /// Returns the path for `id`, falling back to `<unknown>` for ids that
    /// were never registered (e.g. [`Span::DUMMY`](crate::Span::DUMMY) on an
    /// empty map).
    pub fn path(&self, id: FileId) -> &Path {
        self.get(id)
            .map(|f| f.path.as_path())
            .unwrap_or_else(|| Path::new("<unknown>"))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
