/// Read-only, zero-copy view over the bytes of a file as it was when opened.
///
/// The file handle is kept alongside the map so both are released together
/// when the view is dropped.
#[derive(Debug)]
pub struct MmapFile {
    _file: std::fs::File,
    mmap: memmap2::Mmap,
}

impl MmapFile {
    /// Maps an already opened file. The caller is expected to have checked
    /// that the file is non-empty; mapping zero bytes is rejected by some
    /// platforms.
    ///
    /// # Errors
    ///
    /// - `std::io::Error` if the operating system refuses the mapping.
    pub fn from_file(
        file: std::fs::File,
        path: impl AsRef<std::path::Path>,
    ) -> std::io::Result<Self> {
        // SAFETY:
        // - File is opened read-only
        // - We keep the file handle alive in struct
        // - Caller only gets immutable &[u8]
        let mmap = unsafe { memmap2::Mmap::map(&file)? };

        tracing::trace!(
            path = %path.as_ref().display(),
            len = mmap.len(),
            "mapped original file"
        );

        Ok(Self { _file: file, mmap })
    }

    /// Gets an exact slice of bytes.
    /// Returns `None` if the requested range goes out of bounds or overflows.
    #[inline]
    #[must_use]
    pub fn get_bytes_exact(&self, start: usize, length: usize) -> Option<&[u8]> {
        let end = start.checked_add(length)?;

        self.mmap.get(start..end)
    }

    /// File length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

}
