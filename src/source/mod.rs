//! Trace source abstraction and format resolution.
//!
//! This module handles:
//! - The uniform `{open, has_next, read_next}` capability over a physical
//!   trace encoding
//! - Extension-based resolution to a concrete reader (fail-closed)
//! - Classification of decoded payloads into message kinds

pub mod binary;
pub mod container;
pub mod text;

use std::fmt;
use std::path::Path;

use crate::utils::config::RECOGNIZED_EXTENSIONS;
use crate::utils::error::SourceError;

/// Classified kind of one recorded message.
///
/// The lifecycle depends on this tag, not on the payload bytes: view and
/// data frames are published to the host, everything else is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    SensorView,
    SensorData,
    GroundTruth,
    Unknown,
}

impl MessageKind {
    /// Classify a single-channel trace by the sigil embedded in its file
    /// name (`_sv_`, `_sd_`, `_gt_`). Files without a sigil play back as
    /// `Unknown` and fail at step time, not at open time.
    pub fn from_file_sigil(file_name: &str) -> Self {
        if file_name.contains("_sv_") {
            MessageKind::SensorView
        } else if file_name.contains("_sd_") {
            MessageKind::SensorData
        } else if file_name.contains("_gt_") {
            MessageKind::GroundTruth
        } else {
            MessageKind::Unknown
        }
    }

    /// Classify a container record by its kind tag byte.
    pub fn from_container_tag(tag: u8) -> Self {
        match tag {
            1 => MessageKind::SensorView,
            2 => MessageKind::SensorData,
            3 => MessageKind::GroundTruth,
            _ => MessageKind::Unknown,
        }
    }

    /// Classify a textual record by its kind label. Unrecognized labels
    /// fall back to `Unknown` rather than erroring.
    pub fn from_label(label: &str) -> Self {
        match label {
            "sensor_view" => MessageKind::SensorView,
            "sensor_data" => MessageKind::SensorData,
            "ground_truth" => MessageKind::GroundTruth,
            _ => MessageKind::Unknown,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MessageKind::SensorView => "sensor_view",
            MessageKind::SensorData => "sensor_data",
            MessageKind::GroundTruth => "ground_truth",
            MessageKind::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// One classified, decoded unit of recorded data
#[derive(Debug, Clone)]
pub struct DecodedMessage {
    pub kind: MessageKind,
    /// Serialized message bytes, published verbatim to the host
    pub payload: Vec<u8>,
    /// Nested object count, when the kind carries one
    pub object_count: Option<usize>,
}

/// Polymorphic reader over a physical trace encoding.
///
/// Sources are lazy, finite and non-restartable: each message is delivered
/// at most once, strictly in recorded order. Implementations track their
/// own read cursor and hide all framing behind this capability.
pub trait TraceSource: std::fmt::Debug {
    /// Open the underlying file. Called exactly once, during
    /// initialization-exit; sources are never reopened or rewound.
    fn open(&mut self) -> Result<(), SourceError>;

    /// Whether at least one more message can be read.
    fn has_next(&mut self) -> bool;

    /// Read and classify exactly one message, advancing the cursor.
    fn read_next(&mut self) -> Result<DecodedMessage, SourceError>;

    /// Release the underlying file handle. Reads after close fail.
    fn close(&mut self);
}

/// Resolve a trace path to a concrete reader by its extension.
///
/// **Public** - the format-resolver entry point. Closed registry: an
/// extension outside [`RECOGNIZED_EXTENSIONS`] is a construction-time
/// `UnsupportedFormat` failure, never a runtime read failure.
pub fn create_source(path: &Path) -> Result<Box<dyn TraceSource>, SourceError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "osi" => Ok(Box::new(binary::BinaryTraceSource::new(path))),
        "osc" => Ok(Box::new(container::ContainerTraceSource::new(path))),
        "jsonl" => Ok(Box::new(text::TextTraceSource::new(path))),
        other => Err(SourceError::UnsupportedFormat(other.to_string())),
    }
}

/// Whether a directory entry carries a recognized trace extension.
pub fn is_recognized_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| RECOGNIZED_EXTENSIONS.contains(&e.as_str()))
}
