//! Multiplexed container reader (`.osc`).
//!
//! Layout: 4-byte magic `OSCT`, one version byte, then a record stream of
//! `[kind: u8][channel: u16 LE][len: u32 LE][payload]`. Kind tags outside
//! the known set classify as `Unknown` rather than failing the read; a bad
//! magic or version fails at open time.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use log::debug;

use super::{DecodedMessage, MessageKind, TraceSource};
use crate::schema;
use crate::utils::config::{CONTAINER_MAGIC, CONTAINER_VERSION};
use crate::utils::error::SourceError;

const RECORD_HEADER_LEN: usize = 7;

#[derive(Debug)]
pub struct ContainerTraceSource {
    path: PathBuf,
    reader: Option<BufReader<File>>,
    offset: u64,
}

impl ContainerTraceSource {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
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

impl TraceSource for ContainerTraceSource {
    fn open(&mut self) -> Result<(), SourceError> {
        debug!("opening container trace {:?}", self.path);
        let file = File::open(&self.path)?;
        let mut reader = BufReader::new(file);

        let mut header = [0u8; 5];
        reader
            .read_exact(&mut header)
            .map_err(|_| SourceError::Malformed("container header too short".to_string()))?;
        if &header[..4] != CONTAINER_MAGIC {
            return Err(SourceError::Malformed("bad container magic".to_string()));
        }
        let version = header[4];
        if version != CONTAINER_VERSION {
            return Err(SourceError::Malformed(format!(
                "unsupported container version {version}"
            )));
        }

        self.reader = Some(reader);
        self.offset = header.len() as u64;
        Ok(())
    }

    fn has_next(&mut self) -> bool {
        match self.reader.as_mut() {
            Some(reader) => reader.fill_buf().map(|b| !b.is_empty()).unwrap_or(false),
            None => false,
        }
    }

    fn read_next(&mut self) -> Result<DecodedMessage, SourceError> {
        let mut header = [0u8; RECORD_HEADER_LEN];
        self.read_exact_or_truncated(&mut header)?;

        let kind = MessageKind::from_container_tag(header[0]);
        let channel = u16::from_le_bytes([header[1], header[2]]);
        let len = u32::from_le_bytes([header[3], header[4], header[5], header[6]]) as usize;

        let mut payload = vec![0u8; len];
        self.read_exact_or_truncated(&mut payload)?;
        self.offset += (RECORD_HEADER_LEN + len) as u64;

        debug!("container record: kind {kind}, channel {channel}, {len} bytes");

        let object_count = schema::encoded_object_count(kind, &payload)?;
        Ok(DecodedMessage {
            kind,
            payload,
            object_count,
        })
    }

    fn close(&mut self) {
        self.reader = None;
    }
}
