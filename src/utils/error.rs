//! Error types for the entire crate.
//!
//! `thiserror` enums per concern; the host-facing `Player` converts these
//! into plain `Status` outcomes at the boundary, so nothing here ever
//! crosses to the host as a panic or an error type.

use std::path::PathBuf;

use thiserror::Error;

use crate::player::variables::VarCategory;
use crate::source::MessageKind;

/// Errors that can occur while opening or reading a trace source
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported trace format: .{0}")]
    UnsupportedFormat(String),

    #[error("truncated record at offset {offset}")]
    TruncatedRecord { offset: u64 },

    #[error("malformed trace: {0}")]
    Malformed(String),

    #[error("payload decoding failed: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("invalid trace line: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid payload encoding: {0}")]
    Payload(String),
}

/// Errors that can occur inside the playback lifecycle
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("no trace file found in {0}")]
    NoTraceFile(PathBuf),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("message kind {0} not supported for output")]
    UnsupportedMessage(MessageKind),

    #[error("{category} reference {reference} out of range (capacity {capacity})")]
    InvalidReference {
        category: VarCategory,
        reference: usize,
        capacity: usize,
    },

    #[error("{op} not valid in state {state}")]
    InvalidTransition { op: &'static str, state: &'static str },
}
