/// # Line Index Module.
///
/// Lines are computed on demand by scanning forward from the nearest cached
/// line, and cached by line number until the next edit clears them.
pub mod cache;
pub mod line;
pub mod lookup;

/// Whether `byte` terminates a line.
#[inline]
#[must_use]
pub fn is_eol(byte: u8) -> bool {
    byte == b'\r' || byte == b'\n'
}
