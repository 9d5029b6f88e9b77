//! Finds the schema files below a root directory.

use crate::{Path, PathBuf, SCHEMA_EXTENSION};
use std::io;
use tracing::{debug, error, warn};
use walkdir::WalkDir;

/// What to do when part of the tree can't be listed
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum DiscoveryPolicy {
    /// The first listing failure is logged and the whole scan yields nothing,
    /// even if some schema files were already found.
    #[default]
    FailOpen,
    /// Listing failures are logged and collected in [`Discovery::errors`],
    /// the rest of the tree is still scanned.
    Partial,
}

/// A directory or entry that could not be listed or stat'ed
#[derive(Debug, thiserror::Error)]
#[error("failed to list `{path}`")]
pub struct DiscoveryError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl DiscoveryError {
    fn from_walkdir(root: &Path, err: walkdir::Error) -> Self {
        let path = err
            .path()
            .map(|path| {
                PathBuf::from_path_buf(path.to_owned())
                    .unwrap_or_else(|path| path.to_string_lossy().into_owned().into())
            })
            .unwrap_or_else(|| root.to_owned());

        Self {
            path,
            source: err.into(),
        }
    }
}

/// The result of a [`scan`]
#[derive(Debug, Default)]
pub struct Discovery {
    /// Schema files in the order they were encountered, depth first
    pub files: Vec<PathBuf>,
    /// Only ever populated with [`DiscoveryPolicy::Partial`]
    pub errors: Vec<DiscoveryError>,
}

impl Discovery {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Recursively collects every non-directory entry whose name ends with
/// `.json` below `root`.
///
/// Entries are visited in the order the OS lists them, nothing is sorted.
/// Symlinks are never followed, so a symlink named `*.json` is a match while
/// a symlink to a directory is not descended into.
pub fn scan(root: &Path, policy: DiscoveryPolicy) -> Discovery {
    let mut discovery = Discovery::default();

    if let Err(err) = check_root(root) {
        fail(policy, &err);
        if policy == DiscoveryPolicy::Partial {
            discovery.errors.push(err);
        }
        return discovery;
    }

    let walker = WalkDir::new(root).min_depth(1).follow_links(false);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let err = DiscoveryError::from_walkdir(root, err);
                fail(policy, &err);
                match policy {
                    DiscoveryPolicy::FailOpen => return Discovery::default(),
                    DiscoveryPolicy::Partial => {
                        discovery.errors.push(err);
                        continue;
                    }
                }
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let path = match PathBuf::from_path_buf(entry.into_path()) {
            Ok(path) => path,
            Err(path) => {
                if path.to_string_lossy().ends_with(SCHEMA_EXTENSION) {
                    warn!("{} contains invalid utf-8, skipping", path.display());
                }
                continue;
            }
        };

        if !path.as_str().ends_with(SCHEMA_EXTENSION) {
            continue;
        }

        debug!(%path, "Discovered schema file");
        discovery.files.push(path);
    }

    discovery
}

fn check_root(root: &Path) -> Result<(), DiscoveryError> {
    let metadata = fs::metadata(root).map_err(|source| DiscoveryError {
        path: root.to_owned(),
        source,
    })?;

    if !metadata.is_dir() {
        return Err(DiscoveryError {
            path: root.to_owned(),
            source: io::Error::new(io::ErrorKind::Other, "not a directory"),
        });
    }

    Ok(())
}

fn fail(policy: DiscoveryPolicy, err: &DiscoveryError) {
    match policy {
        DiscoveryPolicy::FailOpen => error!(
            path = %err.path,
            err = %err.source,
            "Schema discovery failed, no schema files will be processed"
        ),
        DiscoveryPolicy::Partial => warn!(
            path = %err.path,
            err = %err.source,
            "Skipping a part of the schema tree that could not be listed"
        ),
    }
}
