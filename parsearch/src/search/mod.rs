//! Partitioned exact substring search.
//!
//! A text of length `len` is split into contiguous partitions. Each partition
//! owns a range of start offsets and scans a window that extends
//! `pattern_len - 1` bytes past its owned range, so a match that begins in one
//! partition and ends in the next is still found, and found only by the
//! partition that owns its first byte. Concatenating the per-partition results
//! in partition order therefore yields the same list as one sequential scan:
//!
//! ```rust
//! use parsearch::search::{find_in_window, merge, partition, SearchTask};
//! use parsearch::TextBuffer;
//! use std::sync::Arc;
//!
//! let text = Arc::new(TextBuffer::from_bytes(b"abcabcabc", 16));
//! let pattern: Arc<[u8]> = Arc::from(&b"bca"[..]);
//!
//! let results = partition(text.len(), pattern.len(), 3)
//!     .unwrap()
//!     .into_iter()
//!     .map(|p| SearchTask::new(text.clone(), pattern.clone(), p).call())
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//!
//! let positions = merge(results).unwrap();
//! assert_eq!(positions, find_in_window(text.as_bytes(), &pattern, 0, text.len()).unwrap());
//! assert_eq!(positions, vec![1, 4]);
//! ```
pub mod matcher;
pub mod merge;
pub mod partition;
pub mod task;

pub use matcher::find_in_window;
pub use merge::merge;
pub use partition::{partition, Partition};
pub use task::SearchTask;
