use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, trace, warn};

use crate::errors::{SearchError, SearchResult};

/// Default number of bytes a buffer can hold
pub const DEFAULT_CAPACITY: usize = 10_000_000;

/// Fill byte for the unused tail of a buffer
pub const SENTINEL: u8 = b'.';

const BUFFER_CAPACITY: usize = 65536;
pub(crate) const SMALL_FILE_THRESHOLD: u64 = 32 * 1024; // 32KB
pub(crate) const LARGE_FILE_THRESHOLD: u64 = 10 * 1024 * 1024; // 10MB

/// A fixed-capacity text arena.
///
/// The whole capacity is allocated up front and filled with [`SENTINEL`]; the
/// first `len` bytes hold the text. Searches only ever look at `as_bytes()`,
/// which is bounded by the logical length.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    data: Box<[u8]>,
    len: usize,
    truncated: bool,
}

impl TextBuffer {
    /// Creates an empty buffer of the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![SENTINEL; capacity].into_boxed_slice(),
            len: 0,
            truncated: false,
        }
    }

    /// Copies `bytes` into a new buffer, keeping at most `capacity` of them
    pub fn from_bytes(bytes: &[u8], capacity: usize) -> Self {
        let mut buffer = Self::with_capacity(capacity);
        buffer.fill(bytes);
        buffer
    }

    fn fill(&mut self, bytes: &[u8]) {
        let len = bytes.len().min(self.data.len());
        self.data[..len].copy_from_slice(&bytes[..len]);
        self.data[len..].fill(SENTINEL);
        self.len = len;
        self.truncated = bytes.len() > len;
    }

    /// Loads a file into a buffer of the given capacity.
    ///
    /// Files longer than the capacity are cut off; [`TextBuffer::is_truncated`]
    /// reports when that happened.
    pub fn load(path: &Path, capacity: usize) -> SearchResult<Self> {
        trace!("Loading text from: {}", path.display());
        let mut buffer = Self::with_capacity(capacity);

        match path.metadata() {
            Ok(metadata) if metadata.len() >= LARGE_FILE_THRESHOLD => {
                let file = open(path)?;
                let mmap = unsafe { Mmap::map(&file) }.map_err(SearchError::IoError)?;
                buffer.fill(&mmap);
            }
            Ok(metadata) if metadata.len() < SMALL_FILE_THRESHOLD => {
                let bytes = std::fs::read(path).map_err(|e| io_error(path, e))?;
                buffer.fill(&bytes);
            }
            Ok(_) => buffer.fill(&read_buffered(path, capacity)?),
            Err(e) => {
                warn!("Failed to get metadata for {}: {}", path.display(), e);
                buffer.fill(&read_buffered(path, capacity)?);
            }
        }

        if buffer.truncated {
            warn!(
                "{} truncated to {} bytes",
                path.display(),
                buffer.capacity()
            );
        }
        debug!("Loaded {} bytes from {}", buffer.len, path.display());
        Ok(buffer)
    }

    /// The logical text, without padding
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// The full arena including sentinel padding
    #[cfg(test)]
    fn raw(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Whether the source was longer than the capacity
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

fn io_error(path: &Path, e: std::io::Error) -> SearchError {
    match e.kind() {
        std::io::ErrorKind::NotFound => SearchError::file_not_found(path),
        std::io::ErrorKind::PermissionDenied => SearchError::permission_denied(path),
        _ => SearchError::IoError(e),
    }
}

fn open(path: &Path) -> SearchResult<File> {
    File::open(path).map_err(|e| io_error(path, e))
}

/// Reads at most `capacity + 1` bytes, enough to detect truncation
fn read_buffered(path: &Path, capacity: usize) -> SearchResult<Vec<u8>> {
    let file = open(path)?;
    let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file).take(capacity as u64 + 1);
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(SearchError::IoError)?;
    Ok(bytes)
}
