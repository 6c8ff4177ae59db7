//! Line-oriented element input format
//!
//! Each non-blank line of an input file is one JSON element payload:
//!
//! ```text
//! {"type":"vertex","id":1,"label":"person","properties":{"name":["marko"]}}
//! {"type":"edge","id":7,"label":"knows","out_vertex":{"id":1,"label":"person"},"in_vertex":{"id":2,"label":"person"}}
//! ```
//!
//! Uncompressed files are cut into byte-range splits that can be read
//! independently. A split that does not start at offset 0 skips its first
//! (partial) line, and every split reads the line that straddles its end, so
//! each line is read by exactly one split. Compressed files can not be cut and
//! always form a single split. Payloads from different splits carry no
//! ordering guarantee relative to each other.

use crate::config::InputConfig;
use crate::error::{StructureError, StructureResult};
use crate::graph::DetachedElement;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Compression codec detected from a file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Gzip,
}

impl Codec {
    /// Codec for `path`, `None` for plain files
    pub fn for_path(path: &Path) -> Option<Codec> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "gz" | "gzip" => Some(Codec::Gzip),
            _ => None,
        }
    }
}

/// A byte range of one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSplit {
    pub path: PathBuf,
    pub start: u64,
    pub length: u64,
}

impl InputSplit {
    pub fn end(&self) -> u64 {
        self.start + self.length
    }
}

/// Plans splits over element files and creates readers for them
#[derive(Debug, Clone)]
pub struct ElementInputFormat {
    config: InputConfig,
}

impl ElementInputFormat {
    pub fn new(config: InputConfig) -> StructureResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// A file can be split unless it is compressed
    pub fn is_splittable(&self, path: &Path) -> bool {
        Codec::for_path(path).is_none()
    }

    /// Cut a file into splits of at most `split_size` bytes
    pub fn splits(&self, path: impl AsRef<Path>) -> StructureResult<Vec<InputSplit>> {
        let path = path.as_ref();
        let length = std::fs::metadata(path)?.len();

        if !self.is_splittable(path) || length == 0 {
            debug!("Single split for {:?} ({} bytes)", path, length);
            return Ok(vec![InputSplit {
                path: path.to_path_buf(),
                start: 0,
                length,
            }]);
        }

        let mut splits = Vec::new();
        let mut start = 0;
        while start < length {
            let split_length = self.config.split_size.min(length - start);
            splits.push(InputSplit {
                path: path.to_path_buf(),
                start,
                length: split_length,
            });
            start += split_length;
        }
        debug!("Planned {} splits for {:?} ({} bytes)", splits.len(), path, length);
        Ok(splits)
    }

    /// Open a reader over one split
    pub fn create_record_reader(&self, split: &InputSplit) -> StructureResult<RecordReader> {
        RecordReader::open(split, self.config.max_record_bytes)
    }

    /// Read every payload of a file, split by split
    pub fn read_all(&self, path: impl AsRef<Path>) -> StructureResult<Vec<DetachedElement>> {
        let path = path.as_ref();
        let mut elements = Vec::new();
        for split in self.splits(path)? {
            for element in self.create_record_reader(&split)? {
                elements.push(element?);
            }
        }
        info!("Read {} elements from {:?}", elements.len(), path);
        Ok(elements)
    }
}

/// Reads element payloads from one split
pub struct RecordReader {
    reader: Box<dyn BufRead>,
    /// Byte offset of the next line, in decompressed bytes for compressed input
    pos: u64,
    /// Lines starting after this offset belong to the next split
    end: u64,
    max_record_bytes: usize,
    buffer: Vec<u8>,
    records_read: u64,
    records_skipped: u64,
}

impl RecordReader {
    fn open(split: &InputSplit, max_record_bytes: usize) -> StructureResult<Self> {
        let mut file = File::open(&split.path)?;

        let mut reader = match Codec::for_path(&split.path) {
            Some(Codec::Gzip) => RecordReader {
                reader: Box::new(BufReader::new(GzDecoder::new(file))),
                pos: 0,
                end: u64::MAX,
                max_record_bytes,
                buffer: Vec::new(),
                records_read: 0,
                records_skipped: 0,
            },
            None => {
                file.seek(SeekFrom::Start(split.start))?;
                RecordReader {
                    reader: Box::new(BufReader::new(file)),
                    pos: split.start,
                    end: split.end(),
                    max_record_bytes,
                    buffer: Vec::new(),
                    records_read: 0,
                    records_skipped: 0,
                }
            }
        };

        if reader.pos != 0 {
            // The previous split owns the line we landed in
            let (skipped, _) = read_line_capped(&mut *reader.reader, &mut reader.buffer, 0)?;
            reader.pos += skipped;
        }
        Ok(reader)
    }

    /// Read the next payload, `None` once the split is exhausted
    pub fn next_record(&mut self) -> StructureResult<Option<DetachedElement>> {
        loop {
            if self.pos > self.end {
                return Ok(None);
            }

            self.buffer.clear();
            // Two spare bytes so a record of exactly max_record_bytes keeps its \r\n
            let limit = self.max_record_bytes.saturating_add(2);
            let (read, truncated) = read_line_capped(&mut *self.reader, &mut self.buffer, limit)?;
            if read == 0 {
                return Ok(None);
            }
            let offset = self.pos;
            self.pos += read;

            if truncated || strip_line_terminator(&self.buffer).len() > self.max_record_bytes {
                warn!("Skipped record of {} bytes at byte {}", read, offset);
                self.records_skipped += 1;
                continue;
            }

            let line = std::str::from_utf8(&self.buffer)
                .map_err(|e| StructureError::MalformedRecord {
                    offset,
                    reason: e.to_string(),
                })?
                .trim();
            if line.is_empty() {
                continue;
            }

            let element = serde_json::from_str(line).map_err(|e| StructureError::MalformedRecord {
                offset,
                reason: e.to_string(),
            })?;
            self.records_read += 1;
            return Ok(Some(element));
        }
    }

    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    pub fn records_skipped(&self) -> u64 {
        self.records_skipped
    }
}

/// Consume one line from `reader`, keeping at most `limit` of its bytes in
/// `buffer`.
///
/// Returns the full length of the line including its terminator, and whether
/// bytes were dropped.
fn read_line_capped(
    reader: &mut dyn BufRead,
    buffer: &mut Vec<u8>,
    limit: usize,
) -> std::io::Result<(u64, bool)> {
    let mut consumed = 0u64;
    let mut truncated = false;
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            break;
        }
        let (chunk, done) = match available.iter().position(|&b| b == b'\n') {
            Some(newline) => (&available[..=newline], true),
            None => (available, false),
        };
        let room = limit.saturating_sub(buffer.len());
        if chunk.len() > room {
            truncated = true;
        }
        buffer.extend_from_slice(&chunk[..chunk.len().min(room)]);

        let used = chunk.len();
        reader.consume(used);
        consumed += used as u64;
        if done {
            break;
        }
    }
    Ok((consumed, truncated))
}

fn strip_line_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

impl Iterator for RecordReader {
    type Item = StructureResult<DetachedElement>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}
