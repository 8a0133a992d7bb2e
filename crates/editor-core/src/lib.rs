//! Piece table text buffer.
//!
//! - [`piece_table`] owns the document: an ordered list of pieces over a
//!   memory-mapped original file and an append-only add buffer.
//! - [`cursor`] addresses single bytes and walks across piece boundaries.
//! - [`line_index`] answers line queries lazily and caches the results until
//!   the next edit.
//! - [`search`] finds literal byte sequences between two cursors.

pub mod cursor;
pub mod enums;
pub mod errors;
pub mod history;
pub mod line_index;
pub mod piece_table;
pub mod search;

pub use cursor::{Bytes, Cursor};
pub use errors::{TextBufferError, TextBufferResult};
pub use line_index::line::Line;
pub use piece_table::table::PieceTable;
