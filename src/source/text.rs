//! Textual structured reader (`.jsonl`).
//!
//! One JSON object per line: `{"kind": "sensor_view", "payload": "<base64>"}`.
//! Blank lines are skipped. Unrecognized kind labels classify as `Unknown`;
//! malformed JSON or bad base64 is a read failure.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::debug;
use serde::Deserialize;

use super::{DecodedMessage, MessageKind, TraceSource};
use crate::schema;
use crate::utils::error::SourceError;

#[derive(Deserialize)]
struct TraceLine {
    kind: String,
    payload: String,
}

#[derive(Debug)]
pub struct TextTraceSource {
    path: PathBuf,
    lines: Option<Lines<BufReader<File>>>,
    /// Line already pulled by `has_next` but not yet consumed
    pending: Option<String>,
    line_no: usize,
}

impl TextTraceSource {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            lines: None,
            pending: None,
            line_no: 0,
        }
    }

    fn next_nonblank(&mut self) -> Result<Option<String>, SourceError> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }
        let lines = match self.lines.as_mut() {
            Some(lines) => lines,
            None => return Ok(None),
        };
        for line in lines {
            let line = line?;
            self.line_no += 1;
            if !line.trim().is_empty() {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }
}

impl TraceSource for TextTraceSource {
    fn open(&mut self) -> Result<(), SourceError> {
        debug!("opening text trace {:?}", self.path);
        let file = File::open(&self.path)?;
        self.lines = Some(BufReader::new(file).lines());
        self.pending = None;
        self.line_no = 0;
        Ok(())
    }

    fn has_next(&mut self) -> bool {
        match self.next_nonblank() {
            Ok(Some(line)) => {
                self.pending = Some(line);
                true
            }
            _ => false,
        }
    }

    fn read_next(&mut self) -> Result<DecodedMessage, SourceError> {
        let line = self
            .next_nonblank()?
            .ok_or_else(|| SourceError::Malformed("read past end of trace".to_string()))?;

        let record: TraceLine = serde_json::from_str(&line)?;
        let kind = MessageKind::from_label(&record.kind);
        let payload = BASE64.decode(record.payload.as_bytes()).map_err(|e| {
            SourceError::Payload(format!("line {}: {}", self.line_no, e))
        })?;

        let object_count = schema::encoded_object_count(kind, &payload)?;
        Ok(DecodedMessage {
            kind,
            payload,
            object_count,
        })
    }

    fn close(&mut self) {
        self.lines = None;
        self.pending = None;
    }
}
