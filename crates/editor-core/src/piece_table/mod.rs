/// # Piece Table Module.
///
/// The document is an ordered list of pieces, each pointing into either the
/// read-only original file view or the append-only add buffer.
pub mod list;
pub mod persist;
pub mod piece;
pub mod table;

/// Initial capacity reserved for the add buffer.
pub const BASELINE_CAPACITY: usize = 4096;

/// Number of random characters in the temporary file name used by `save`.
pub const SAVE_SUFFIX_LEN: usize = 6;
