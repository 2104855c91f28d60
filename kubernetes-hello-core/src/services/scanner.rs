//! Recursive directory scanning
//!
//! Kubernetes projects secrets and config maps as symlink farms
//! (`token -> ..data/token`, `..data -> ..2024_01_01...`), so links are
//! followed; the dot-prefixed internals are skipped as hidden entries.

use std::fs::Metadata;
use std::path::{Component, Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::config::ScanPolicy;
use crate::error::{CoreError, CoreResult};
use crate::types::{NameValuePair, NameValuePairs};

use super::classifier::ContentClassifier;

/// A regular file found by the walk, before classification.
#[derive(Debug)]
struct ScannedFile {
    /// `<mode> <uid> <gid> <relative path>`
    name: String,
    contents: Result<Vec<u8>, String>,
}

/// Scans a root directory into sorted `(metadata, decoded content)` pairs.
#[derive(Clone)]
pub struct DirectoryScanner {
    classifier: ContentClassifier,
    policy: ScanPolicy,
}

impl DirectoryScanner {
    pub fn new(classifier: ContentClassifier, policy: ScanPolicy) -> Self {
        Self { classifier, policy }
    }

    /// Missing or unreadable roots yield an empty list.
    pub async fn scan(&self, root: &Path) -> CoreResult<Vec<NameValuePair>> {
        let walk_root = root.to_path_buf();
        let policy = self.policy;
        let files = tokio::task::spawn_blocking(move || walk(&walk_root, policy))
            .await
            .map_err(|e| CoreError::Io(format!("scan task failed: {e}")))??;

        let pairs = self.pairs(files).await;
        log::debug!("Scanned {} files under {}", pairs.len(), root.display());
        Ok(pairs)
    }

    async fn pairs(&self, files: Vec<ScannedFile>) -> Vec<NameValuePair> {
        let mut pairs = NameValuePairs::new();
        for file in files {
            let value = match file.contents {
                Ok(bytes) => self.classifier.classify(&bytes).await,
                Err(message) => format!("ERROR {message}"),
            };
            pairs.insert(NameValuePair::new(file.name, value));
        }
        pairs.sorted()
    }
}

/// Blocking part of the scan: enumerate, stat and read.
fn walk(root: &Path, policy: ScanPolicy) -> CoreResult<Vec<ScannedFile>> {
    if !root.is_dir() {
        log::debug!("Scan root {} is not a directory, skipping", root.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| !is_hidden(root, entry.path()));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                if e.loop_ancestor().is_some() {
                    log::debug!("Skipping symlink loop: {e}");
                    continue;
                }
                let path = e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                if path == root {
                    log::warn!("Failed to enumerate {}: {e}", root.display());
                    return Ok(Vec::new());
                }
                let message = e
                    .io_error()
                    .map_or_else(|| e.to_string(), ToString::to_string);
                match policy {
                    ScanPolicy::FailFast => {
                        return Err(CoreError::Scan {
                            path: path.display().to_string(),
                            message,
                        });
                    }
                    ScanPolicy::Degrade => {
                        log::warn!("Failed to stat {}: {message}", path.display());
                        files.push(unreadable_entry(root, &path, message));
                        continue;
                    }
                }
            }
        };

        if let Some(file) = scan_entry(root, &entry, policy)? {
            files.push(file);
        }
    }

    Ok(files)
}

fn scan_entry(root: &Path, entry: &DirEntry, policy: ScanPolicy) -> CoreResult<Option<ScannedFile>> {
    let path = entry.path();

    // Follows symlinks, so a link to a regular file counts as one
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) => {
            return match policy {
                ScanPolicy::FailFast => Err(scan_error(path, &e)),
                ScanPolicy::Degrade => {
                    log::warn!("Failed to stat {}: {e}", path.display());
                    Ok(Some(unreadable_entry(root, path, e.to_string())))
                }
            };
        }
    };
    if !metadata.is_file() {
        return Ok(None);
    }

    let name = entry_name(&metadata, &relative_path(root, path));
    let contents = read_contents(path, policy)?;
    Ok(Some(ScannedFile { name, contents }))
}

/// Inner `Err` carries the message rendered as `ERROR <message>`.
fn read_contents(path: &Path, policy: ScanPolicy) -> CoreResult<Result<Vec<u8>, String>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Ok(bytes)),
        Err(e) => match policy {
            ScanPolicy::FailFast => Err(scan_error(path, &e)),
            ScanPolicy::Degrade => {
                log::warn!("Failed to read {}: {e}", path.display());
                Ok(Err(e.to_string()))
            }
        },
    }
}

/// Entry whose target could not be stat'ed. The name uses `lstat` fields
/// when the link itself is readable, placeholders otherwise.
fn unreadable_entry(root: &Path, path: &Path, message: String) -> ScannedFile {
    let relative = relative_path(root, path);
    let name = match std::fs::symlink_metadata(path) {
        Ok(metadata) => entry_name(&metadata, &relative),
        Err(_) => format!("{UNKNOWN_MODE} ? ? {relative}"),
    };
    ScannedFile {
        name,
        contents: Err(message),
    }
}

const UNKNOWN_MODE: &str = "?---------";

fn entry_name(metadata: &Metadata, relative: &str) -> String {
    format!(
        "{} {} {} {}",
        mode_string(metadata),
        owner_uid(metadata),
        owner_gid(metadata),
        relative
    )
}

fn scan_error(path: &Path, e: &std::io::Error) -> CoreError {
    CoreError::Scan {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

/// Whether any component below `root` starts with a dot.
fn is_hidden(root: &Path, path: &Path) -> bool {
    path.strip_prefix(root).is_ok_and(|relative| {
        relative.components().any(|component| match component {
            Component::Normal(name) => name.as_encoded_bytes().starts_with(b"."),
            _ => false,
        })
    })
}

fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .map_or_else(|_| PathBuf::from(path), Path::to_path_buf)
        .to_string_lossy()
        .into_owned()
}

/// `ls -l` style mode string, e.g. `-rw-r--r--` or `Lrwxrwxrwx`.
#[cfg(unix)]
fn mode_string(metadata: &Metadata) -> String {
    use std::os::unix::fs::MetadataExt;

    format_mode(metadata.mode())
}

#[cfg(not(unix))]
fn mode_string(metadata: &Metadata) -> String {
    let kind = if metadata.is_symlink() {
        'L'
    } else if metadata.is_dir() {
        'd'
    } else {
        '-'
    };
    let perms = if metadata.permissions().readonly() { "r--r--r--" } else { "rw-rw-rw-" };
    format!("{kind}{perms}")
}

#[cfg(unix)]
fn owner_uid(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;

    metadata.uid()
}

#[cfg(not(unix))]
fn owner_uid(_metadata: &Metadata) -> u32 {
    0
}

#[cfg(unix)]
fn owner_gid(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;

    metadata.gid()
}

#[cfg(not(unix))]
fn owner_gid(_metadata: &Metadata) -> u32 {
    0
}

/// File type letter, then permission bits with setuid/setgid/sticky folded
/// into the execute slots. A mode without type bits reads as a regular file.
fn format_mode(mode: u32) -> String {
    const SETUID: u32 = 0o4000;
    const SETGID: u32 = 0o2000;
    const STICKY: u32 = 0o1000;

    let triplet = |shift: u32, special: bool, special_char: char| {
        let bits = (mode >> shift) & 0o7;
        let read = if bits & 0o4 != 0 { 'r' } else { '-' };
        let write = if bits & 0o2 != 0 { 'w' } else { '-' };
        let exec = match (bits & 0o1 != 0, special) {
            (true, true) => special_char,
            (false, true) => special_char.to_ascii_uppercase(),
            (true, false) => 'x',
            (false, false) => '-',
        };
        [read, write, exec]
    };

    let kind = match mode & 0o170_000 {
        0o120_000 => 'L',
        0o040_000 => 'd',
        0o010_000 => 'p',
        0o140_000 => 'S',
        0o060_000 => 'D',
        0o020_000 => 'c',
        _ => '-',
    };

    let mut out = String::with_capacity(10);
    out.push(kind);
    out.extend(triplet(6, mode & SETUID != 0, 's'));
    out.extend(triplet(3, mode & SETGID != 0, 's'));
    out.extend(triplet(0, mode & STICKY != 0, 't'));
    out
}
