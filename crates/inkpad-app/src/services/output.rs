// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Atomic artifact output.
//
// Artifacts are written to a temporary file in the target directory and then
// renamed over the final name, so readers never observe a partial file.

use std::io::Write;
use std::path::{Path, PathBuf};

use inkpad_core::error::{InkpadError, Result};
use inkpad_engine::ExportArtifact;
use tempfile::NamedTempFile;
use tracing::{info, instrument};

/// Write `artifact` into `dir` under its conventional file name.
#[instrument(skip(artifact), fields(dir = %dir.display(), file = artifact.file_name()))]
pub fn write_artifact(dir: &Path, artifact: &ExportArtifact) -> Result<PathBuf> {
    let path = write_atomically(dir, artifact.file_name(), &artifact.bytes)?;
    info!(
        path = %path.display(),
        bytes = artifact.bytes.len(),
        digest = %artifact.digest,
        "artifact written"
    );
    Ok(path)
}

/// Write `bytes` to `dir/file_name` through a temporary file.
pub fn write_atomically(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let target = dir.join(file_name);

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(&target)
        .map_err(|err| InkpadError::Io(err.error))?;
    Ok(target)
}
