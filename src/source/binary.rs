//! Single-channel length-prefixed binary reader (`.osi`).
//!
//! Framing: each record is a 4-byte little-endian payload size followed by
//! that many payload bytes. The whole file carries one message kind, taken
//! from the sigil in its file name (see [`MessageKind::from_file_sigil`]).

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use log::debug;

use super::{DecodedMessage, MessageKind, TraceSource};
use crate::schema;
use crate::utils::error::SourceError;

#[derive(Debug)]
pub struct BinaryTraceSource {
    path: PathBuf,
    kind: MessageKind,
    reader: Option<BufReader<File>>,
    /// Byte offset of the next unread record, for diagnostics
    offset: u64,
}

impl BinaryTraceSource {
    pub fn new(path: &Path) -> Self {
        let kind = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(MessageKind::from_file_sigil)
            .unwrap_or(MessageKind::Unknown);
        Self {
            path: path.to_path_buf(),
            kind,
            reader: None,
            offset: 0,
        }
    }

    fn read_exact_or_truncated(&mut self, buf: &mut [u8]) -> Result<(), SourceError> {
        let reader = self
            .reader
            .as_mut()
            .ok_or_else(|| SourceError::Malformed("source not open".to_string()))?;
        reader.read_exact(buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                SourceError::TruncatedRecord { offset: self.offset }
            } else {
                SourceError::Io(e)
            }
        })
    }
}

impl TraceSource for BinaryTraceSource {
    fn open(&mut self) -> Result<(), SourceError> {
        debug!("opening binary trace {:?} (kind {})", self.path, self.kind);
        let file = File::open(&self.path)?;
        self.reader = Some(BufReader::new(file));
        self.offset = 0;
        Ok(())
    }

    fn has_next(&mut self) -> bool {
        match self.reader.as_mut() {
            Some(reader) => reader.fill_buf().map(|b| !b.is_empty()).unwrap_or(false),
            None => false,
        }
    }

    fn read_next(&mut self) -> Result<DecodedMessage, SourceError> {
        let mut len_bytes = [0u8; 4];
        self.read_exact_or_truncated(&mut len_bytes)?;
        let len = u32::from_le_bytes(len_bytes) as usize;

        let mut payload = vec![0u8; len];
        self.read_exact_or_truncated(&mut payload)?;
        self.offset += 4 + len as u64;

        let object_count = schema::encoded_object_count(self.kind, &payload)?;
        Ok(DecodedMessage {
            kind: self.kind,
            payload,
            object_count,
        })
    }

    fn close(&mut self) {
        self.reader = None;
    }
}
