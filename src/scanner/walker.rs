//! Directory walker implementation using jwalk.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for enumerating every regular
//! file below one root. Children of each directory are sorted by name, so the
//! enumeration order is stable for one run regardless of how the filesystem
//! orders its entries.
//!
//! Listing is fail-fast: the first unreadable directory or entry stops the
//! walk with a [`ScanError`]. A comparison built from a partial listing would
//! misreport files as unique to the other side.
//!
//! # Example
//!
//! ```no_run
//! use dirmatch::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Photos"), WalkerConfig::default());
//! match walker.scan() {
//!     Ok(files) => println!("Found {} files", files.len()),
//!     Err(e) => eprintln!("Listing failed: {}", e),
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use jwalk::WalkDir;

use super::{FileHandle, ScanError, WalkerConfig};

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for cancellation
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for cancellation.
    ///
    /// When the flag is set to `true`, the walk stops at the next entry and
    /// yields [`ScanError::Interrupted`].
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Enumerate every file under the root, failing on the first error.
    ///
    /// # Errors
    ///
    /// - [`ScanError::NotFound`] / [`ScanError::NotADirectory`] for a bad root
    /// - [`ScanError::PermissionDenied`] / [`ScanError::Io`] for any entry
    ///   that cannot be read
    /// - [`ScanError::Interrupted`] if the shutdown flag was raised
    pub fn scan(&self) -> Result<Vec<FileHandle>, ScanError> {
        if !self.root.exists() {
            return Err(ScanError::NotFound(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(ScanError::NotADirectory(self.root.clone()));
        }

        let files = self.walk().collect::<Result<Vec<_>, _>>()?;
        log::debug!("Listed {} files under {}", files.len(), self.root.display());
        Ok(files)
    }

    /// Walk the directory tree, yielding file handles in sorted order.
    ///
    /// Errors are yielded in place; [`Walker::scan`] stops at the first one.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileHandle, ScanError>> + '_ {
        let walk_dir = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .skip_hidden(false)
            .process_read_dir(|_depth, _path, _read_dir_state, children| {
                // Sort children for deterministic output
                children.sort_by(|a, b| match (a, b) {
                    (Ok(a), Ok(b)) => a.file_name().cmp(b.file_name()),
                    (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                    (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                    (Err(_), Err(_)) => std::cmp::Ordering::Equal,
                });
            });

        let mut stopped = false;
        walk_dir.into_iter().filter_map(move |entry_result| {
            if stopped {
                return None;
            }
            if self.is_shutdown_requested() {
                log::debug!("Walker: Shutdown requested, stopping iteration");
                stopped = true;
                return Some(Err(ScanError::Interrupted));
            }

            match entry_result {
                Ok(entry) => {
                    let path = entry.path();

                    if let Some(err) = entry.read_children_error.as_ref() {
                        return Some(Err(self.handle_jwalk_error(path, err)));
                    }

                    let file_type = entry.file_type();
                    if file_type.is_dir() {
                        return None;
                    }

                    if file_type.is_symlink() && !self.config.follow_symlinks {
                        log::trace!("Skipping symlink: {}", path.display());
                        return None;
                    }

                    let metadata = if self.config.follow_symlinks {
                        std::fs::metadata(&path)
                    } else {
                        std::fs::symlink_metadata(&path)
                    };

                    match metadata {
                        Ok(m) if m.is_file() => {
                            log::trace!("Listed: {}", path.display());
                            Some(Ok(FileHandle::new(path, m.len())))
                        }
                        Ok(_) => None,
                        Err(e) => Some(Err(self.handle_io_error(&path, e))),
                    }
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), std::borrow::ToOwned::to_owned);
                    Some(Err(self.handle_jwalk_error(path, &e)))
                }
            }
        })
    }

    /// Handle I/O errors during file access.
    fn handle_io_error(&self, path: &Path, error: std::io::Error) -> ScanError {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::PermissionDenied => {
                log::warn!("Permission denied: {}", path.display());
                ScanError::PermissionDenied(path.to_path_buf())
            }
            ErrorKind::NotFound => {
                log::warn!("File disappeared during listing: {}", path.display());
                ScanError::NotFound(path.to_path_buf())
            }
            _ => {
                log::warn!("I/O error for {}: {}", path.display(), error);
                ScanError::Io {
                    path: path.to_path_buf(),
                    source: error,
                }
            }
        }
    }

    /// Handle jwalk errors, keeping the I/O error kind when one is available.
    fn handle_jwalk_error(&self, path: PathBuf, error: &jwalk::Error) -> ScanError {
        match error.io_error() {
            Some(io) => {
                let kind = io.kind();
                self.handle_io_error(&path, std::io::Error::new(kind, error.to_string()))
            }
            None => {
                log::warn!("Walker error for {}: {}", path.display(), error);
                ScanError::Io {
                    path,
                    source: std::io::Error::other(error.to_string()),
                }
            }
        }
    }
}
