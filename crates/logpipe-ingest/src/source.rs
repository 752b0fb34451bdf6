//! Streaming line reader
//!
//! [`LineSource`] reads one buffer at a time and yields trimmed lines, so a
//! file of any size is processed in constant memory. The underlying file is
//! closed when the source is dropped, whether it was exhausted, abandoned
//! mid-way, or unwound past by a failure further down the pipeline.

use crate::error::{IngestError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Single-pass sequence of trimmed lines from one input stream
pub struct LineSource<R = BufReader<File>> {
    origin: PathBuf,
    reader: R,
    buf: String,
    line_number: u64,
    failed: bool,
}

impl LineSource<BufReader<File>> {
    /// Open `path` for streaming
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
        Ok(Self::from_reader(BufReader::new(file), path))
    }
}

impl<R: BufRead> LineSource<R> {
    /// Wrap an already open reader; `origin` names it in errors
    pub fn from_reader(reader: R, origin: impl Into<PathBuf>) -> Self {
        Self {
            origin: origin.into(),
            reader,
            buf: String::new(),
            line_number: 0,
            failed: false,
        }
    }

    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// Lines produced so far
    pub fn line_number(&self) -> u64 {
        self.line_number
    }
}

impl<R: BufRead> Iterator for LineSource<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        // A read error ends the sequence; the reader position is unreliable after it
        if self.failed {
            return None;
        }

        self.buf.clear();
        match self.reader.read_line(&mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                self.line_number += 1;
                Some(Ok(self.buf.trim().to_owned()))
            },
            Err(e) => {
                self.failed = true;
                Some(Err(IngestError::io(&self.origin, e)))
            },
        }
    }
}
