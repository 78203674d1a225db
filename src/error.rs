use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while converting a dataset file. Every variant is fatal:
/// nothing in this crate catches or retries, the first failure aborts the
/// conversion and propagates to the caller.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("could not open {}: {}", .path.display(), .source)]
    FileOpen { path: PathBuf, source: io::Error },

    #[error("header ended while reading {field}")]
    TruncatedHeader { field: &'static str },

    #[error("unrecognized magic number {found:#010x} (expected {expected:#010x})")]
    BadMagic { found: u32, expected: u32 },

    #[error("input ended early: item {index} of {count} is incomplete")]
    TruncatedStream { index: u32, count: u32 },

    #[error(transparent)]
    Io(#[from] io::Error),
}
