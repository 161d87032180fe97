//! Error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A capability probe failed during preflight.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PreflightError {
    #[error("{capability} is not usable: {reason}")]
    Probe {
        capability: &'static str,
        reason: String,
    },
}

/// Errors from the primary conversion path.
///
/// Any of these makes the converter try the fallback thumbnailer.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("error reading file \"{}\": {source}", .path.display())]
    ReadInput { path: PathBuf, source: io::Error },

    #[error("error parsing SVG: {0}")]
    Parse(String),

    #[error("error rendering SVG: {0}")]
    Render(String),

    /// The requested raster cannot be allocated.
    #[error("the resulting image would be too large to allocate ({w} x {h})")]
    InvalidSize { w: f64, h: f64 },

    #[error("error decoding rasterized image: {0}")]
    Decode(String),

    #[error("error encoding PNG: {0}")]
    Encode(String),

    #[error("error writing output \"{}\": {source}", .path.display())]
    WriteOutput { path: PathBuf, source: io::Error },
}

impl From<png::DecodingError> for ConvertError {
    fn from(e: png::DecodingError) -> Self {
        ConvertError::Decode(format!("{e}"))
    }
}

impl From<png::EncodingError> for ConvertError {
    fn from(e: png::EncodingError) -> Self {
        ConvertError::Encode(format!("{e}"))
    }
}

/// Errors from the fallback thumbnailer.
#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("no thumbnailing utility is available on this platform")]
    Unsupported,

    #[error("the fallback is disabled")]
    Disabled,

    #[error("could not run {program}: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("{program} exited with {}", exit_description(.code))]
    Exited { program: String, code: Option<i32> },
}

fn exit_description(code: &Option<i32>) -> String {
    match *code {
        Some(c) => format!("status {c}"),
        None => String::from("a signal"),
    }
}
