use std::io::Write;

use crate::errors::{TextBufferError, TextBufferResult};
use crate::piece_table::table::PieceTable;

/*

====================================
============== SAVE ================
====================================

*/

impl PieceTable {
    /// Atomically writes the current document to `path`.
    ///
    /// The bytes go to `"<path>.<random>"` in the same directory first, are
    /// flushed to stable storage, and the temporary file is then renamed over
    /// `path`. A crash at any point leaves either the old file or the new one,
    /// never a mix. Pieces and backing stores are only read.
    ///
    /// # Errors
    ///
    /// Returns `TextBufferError::System` if the temporary file cannot be
    /// created, written or flushed, or if the rename fails. The temporary
    /// file is removed on every failure path.
    pub fn save(&mut self, path: impl AsRef<std::path::Path>) -> TextBufferResult<()> {
        let path = path.as_ref();
        let file_name = path.file_name().ok_or_else(|| {
            TextBufferError::system(
                format!("Cannot save to {}", path.display()),
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
            )
        })?;
        // An atomic rename only works within one filesystem, so the temporary
        // file must live next to the target.
        let parent_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => std::path::Path::new("."),
        };
        let mut prefix = file_name.to_os_string();

        prefix.push(".");

        let mut temp_save_file = tempfile::Builder::new()
            .prefix(&prefix)
            .rand_bytes(crate::piece_table::SAVE_SUFFIX_LEN)
            .tempfile_in(parent_dir)
            .map_err(|err| {
                TextBufferError::system(
                    format!("Error opening temp file for {} while trying to save", path.display()),
                    err,
                )
            })?;
        let temp_path = temp_save_file.path().to_path_buf();

        // Keep the permissions of the file being replaced.
        if let Ok(metadata) = std::fs::metadata(path) {
            temp_save_file
                .as_file()
                .set_permissions(metadata.permissions())
                .map_err(|err| {
                    TextBufferError::system(
                        format!("Error copying permissions to {}", temp_path.display()),
                        err,
                    )
                })?;
        }

        let mut written = 0;

        for chunk in self.chunks() {
            temp_save_file.write_all(chunk).map_err(|err| {
                TextBufferError::system(
                    format!("Error writing to file {} while trying to save", temp_path.display()),
                    err,
                )
            })?;
            written += chunk.len();
        }

        temp_save_file.as_file().sync_all().map_err(|err| {
            TextBufferError::system(
                format!("Error flushing temp file {} while trying to save", temp_path.display()),
                err,
            )
        })?;
        temp_save_file.persist(path).map_err(|err| {
            TextBufferError::system(
                format!(
                    "Error renaming temp file {} to {} while trying to save",
                    temp_path.display(),
                    path.display()
                ),
                err.error,
            )
        })?;

        tracing::debug!(path = %path.display(), bytes = written, "saved document");

        self.mark_clean();

        Ok(())
    }
}
