//! File-backed storage shared by the editor crates.
pub mod mmap;
