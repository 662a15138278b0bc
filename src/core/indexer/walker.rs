//! Directory walker.
//!
//! Order contract: entries of a directory are sorted by file name;
//! every file of the directory is reported before any of its
//! subdirectories is entered; subdirectories are then walked in name
//! order, each one completely before its next sibling.
//!
//! Symlinks are not followed. Directory trees are assumed to be
//! acyclic; there is no cycle detection.

use std::cmp::Ordering;
use std::io;
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{IndexerError, Result, TraversalError};
use crate::core::types::FsEntry;

/// Counts gathered during a walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub directories: usize,
    pub files: usize,
}

/// Recursive directory walker
#[derive(Debug, Clone, Default)]
pub struct DirectoryWalker {
    cancel: CancellationToken,
}

impl DirectoryWalker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walker that stops with `Cancelled` once `cancel` fires
    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// Call `on_file` once per non-directory entry under `root`
    pub fn walk<F>(&self, root: &Path, mut on_file: F) -> Result<WalkStats>
    where
        F: FnMut(&Path) -> Result<()>,
    {
        self.walk_entries(root, |entry| {
            if entry.is_dir {
                Ok(())
            } else {
                on_file(&entry.path)
            }
        })
    }

    /// Like [`walk`](Self::walk), but also reports each directory
    /// (root included) as it is entered
    pub fn walk_entries<F>(&self, root: &Path, mut on_entry: F) -> Result<WalkStats>
    where
        F: FnMut(&FsEntry) -> Result<()>,
    {
        self.check_cancelled()?;

        if !root.is_dir() {
            return Err(TraversalError::NotADirectory(root.to_path_buf()).into());
        }
        let root = std::path::absolute(root).map_err(|source| {
            TraversalError::UnreadableDirectory {
                path: root.to_path_buf(),
                source,
            }
        })?;

        let mut stats = WalkStats::default();

        for entry in WalkDir::new(&root)
            .follow_links(false)
            .sort_by(files_first_by_name)
        {
            self.check_cancelled()?;

            let entry = entry.map_err(unreadable)?;
            let is_dir = entry.file_type().is_dir();
            on_entry(&FsEntry {
                path: entry.into_path(),
                is_dir,
            })?;

            if is_dir {
                stats.directories += 1;
            } else {
                stats.files += 1;
            }
        }

        Ok(stats)
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(IndexerError::Cancelled);
        }
        Ok(())
    }
}

/// Non-directories before directories, then by file name
fn files_first_by_name(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

fn unreadable(err: walkdir::Error) -> IndexerError {
    let path = err.path().map(PathBuf::from).unwrap_or_default();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other("filesystem loop"));
    TraversalError::UnreadableDirectory { path, source }.into()
}
