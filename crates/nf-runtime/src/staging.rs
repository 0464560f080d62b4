//! Materialize the pipeline's working tree on the shared volume.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::RuntimeError;
use crate::Result;

/// Counters from one staging pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageStats {
    pub directories: u64,
    pub files: u64,
    pub bytes: u64,
    pub dangling_links: u64,
}

/// Copy `source` into `dest`, skipping ignored names at any depth.
///
/// Symlinks are followed and their targets copied. Links that cannot be
/// resolved (missing target, self-reference, loop) are skipped.
/// Existing content under `dest` is merged: files are overwritten, extra
/// files are left in place.
pub fn stage_workdir(source: &Path, dest: &Path, ignore_list: &[String]) -> Result<StageStats> {
    info!(source = %source.display(), dest = %dest.display(), "Staging working directory");

    let staging_error = |path: &Path, reason: String| RuntimeError::Staging {
        path: path.display().to_string(),
        reason,
    };

    std::fs::create_dir_all(dest).map_err(|e| staging_error(dest, e.to_string()))?;

    let mut stats = StageStats::default();
    let walker = WalkDir::new(source)
        .follow_links(true)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| !is_ignored(entry.file_name().to_string_lossy().as_ref(), ignore_list));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if is_dangling_link(&err) {
                    debug!(path = ?err.path(), "Skipping unresolvable symlink");
                    stats.dangling_links += 1;
                    continue;
                }
                let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| source.to_path_buf());
                return Err(staging_error(&path, err.to_string()));
            }
        };

        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| staging_error(entry.path(), e.to_string()))?;
        let target: PathBuf = dest.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| staging_error(&target, e.to_string()))?;
            stats.directories += 1;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| staging_error(parent, e.to_string()))?;
            }
            let copied = std::fs::copy(entry.path(), &target)
                .map_err(|e| staging_error(entry.path(), e.to_string()))?;
            stats.files += 1;
            stats.bytes += copied;
        }
    }

    info!(
        files = stats.files,
        directories = stats.directories,
        bytes = stats.bytes,
        "Working directory staged"
    );
    Ok(stats)
}

fn is_ignored(name: &str, ignore_list: &[String]) -> bool {
    ignore_list.iter().any(|ignored| ignored == name)
}

/// A link whose target cannot be resolved: missing, or part of a loop.
fn is_dangling_link(err: &walkdir::Error) -> bool {
    if err.io_error().is_none() && err.loop_ancestor().is_none() {
        return false;
    }
    err.path()
        .and_then(|p| std::fs::symlink_metadata(p).ok())
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}
