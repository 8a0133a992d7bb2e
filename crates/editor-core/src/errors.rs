pub type TextBufferResult<T> = Result<T, TextBufferError>;

/// Every failure the storage core can report.
#[derive(Debug, thiserror::Error)]
pub enum TextBufferError {
    /// An operating system call failed (open, map, write, flush, rename).
    #[error("{message}: {source}")]
    System {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// A cursor was dereferenced, stepped or used outside the document.
    #[error("invalid position: {0}")]
    InvalidPosition(&'static str),

    /// An absolute byte offset lies past the end of the document.
    #[error("offset {offset} out of bounds (len={len})")]
    OutOfBounds { offset: usize, len: usize },
}

impl TextBufferError {
    pub fn system(message: impl Into<String>, source: std::io::Error) -> Self {
        TextBufferError::System {
            message: message.into(),
            source,
        }
    }

    /// Platform error code of the underlying OS failure, if there was one.
    ///
    /// Wrapped I/O errors (for example ones annotated with a path) are
    /// searched through their source chain.
    #[must_use]
    pub fn code(&self) -> Option<i32> {
        let TextBufferError::System { source, .. } = self else {
            return None;
        };

        if let Some(code) = source.raw_os_error() {
            return Some(code);
        }

        let mut cause: Option<&(dyn std::error::Error + 'static)> = source
            .get_ref()
            .map(|inner| inner as &(dyn std::error::Error + 'static));

        while let Some(err) = cause {
            if let Some(code) = err
                .downcast_ref::<std::io::Error>()
                .and_then(std::io::Error::raw_os_error)
            {
                return Some(code);
            }

            cause = std::error::Error::source(err);
        }

        None
    }
}

impl From<std::io::Error> for TextBufferError {
    fn from(value: std::io::Error) -> Self {
        TextBufferError::system("I/O error", value)
    }
}
