//! Row/column editing surface over the editor core.
//!
//! [`document::Document`] pairs a [`editor_core::PieceTable`] with the path
//! it was opened from and translates `(row, column)` positions into cursors.

pub mod document;
